use crate::models::{Product, PRODUCT_FIELDS};
use crate::scrapers::error::ScrapeResult;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Write `products` as CSV, header first, replacing any existing file.
/// The header is written even when there are no rows.
pub fn write_products(path: &Path, products: &[Product]) -> ScrapeResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    write_products_to(file, products)
}

/// Same as `write_products`, into any writer
pub fn write_products_to<W: Write>(writer: W, products: &[Product]) -> ScrapeResult<()> {
    let mut csv = csv::WriterBuilder::new().has_headers(false).from_writer(writer);

    csv.write_record(PRODUCT_FIELDS)?;
    for product in products {
        csv.serialize(product)?;
    }
    csv.flush()?;
    Ok(())
}
