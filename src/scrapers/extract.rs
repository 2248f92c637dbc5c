use crate::models::Product;
use crate::scrapers::error::{ScrapeError, ScrapeResult};
use crate::scrapers::types::{selectors, RatingStyle};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

fn parse_selector(css: &str) -> ScrapeResult<Selector> {
    Selector::parse(css).map_err(|_| ScrapeError::InvalidSelector(css.to_string()))
}

/// Reads the five product fields out of a listing card.
///
/// The demo shop renders ratings two ways: grid views carry a numeric
/// `data-rating` attribute, the "load more" views draw one icon per star.
/// The extractor is built for one of them and never guesses.
pub struct ListingExtractor {
    style: RatingStyle,
    card: Selector,
    title: Selector,
    description: Selector,
    price: Selector,
    rating: Selector,
    review_count: Selector,
}

impl ListingExtractor {
    pub fn new(style: RatingStyle) -> ScrapeResult<Self> {
        let (rating, review_count) = match style {
            RatingStyle::DataAttribute => ("p[data-rating]", ".review-count"),
            RatingStyle::IconCount => (
                ".ratings p span.ws-icon",
                ".ratings > .review-count.float-end.pull-right",
            ),
        };

        Ok(Self {
            style,
            card: parse_selector(selectors::LISTING_CARD)?,
            title: parse_selector(".title")?,
            description: parse_selector(".description")?,
            price: parse_selector(".price")?,
            rating: parse_selector(rating)?,
            review_count: parse_selector(review_count)?,
        })
    }

    /// Extract every listing card of a captured page, in document order
    pub fn extract_page(&self, html: &str) -> ScrapeResult<Vec<Product>> {
        let document = Html::parse_document(html);
        let products = document
            .select(&self.card)
            .map(|card| self.extract(card))
            .collect::<ScrapeResult<Vec<_>>>()?;

        debug!("Extracted {} listings ({:?})", products.len(), self.style);
        Ok(products)
    }

    pub fn extract(&self, card: ElementRef<'_>) -> ScrapeResult<Product> {
        let title = first(card, &self.title, "title")?
            .value()
            .attr("title")
            .ok_or(ScrapeError::MissingField { field: "title" })?
            .to_string();

        let description = text_of(first(card, &self.description, "description")?);
        let price = parse_price(&text_of(first(card, &self.price, "price")?))?;

        let rating = match self.style {
            RatingStyle::DataAttribute => {
                let raw = first(card, &self.rating, "rating")?
                    .value()
                    .attr("data-rating")
                    .ok_or(ScrapeError::MissingField { field: "rating" })?;
                parse_count("rating", raw)?
            }
            RatingStyle::IconCount => {
                let icons = card.select(&self.rating).count();
                u32::try_from(icons).map_err(|_| ScrapeError::FieldParse {
                    field: "rating",
                    value: icons.to_string(),
                })?
            }
        };

        let review_count = parse_count(
            "num_of_reviews",
            &text_of(first(card, &self.review_count, "num_of_reviews")?),
        )?;

        Ok(Product {
            title,
            description,
            price,
            rating,
            review_count,
        })
    }
}

/// Extract all listings of a page with a one-off extractor
pub fn extract_listings(html: &str, style: RatingStyle) -> ScrapeResult<Vec<Product>> {
    ListingExtractor::new(style)?.extract_page(html)
}

fn first<'a>(
    card: ElementRef<'a>,
    selector: &Selector,
    field: &'static str,
) -> ScrapeResult<ElementRef<'a>> {
    card.select(selector)
        .next()
        .ok_or(ScrapeError::MissingField { field })
}

/// Rendered text with whitespace runs collapsed, like a browser reports it
fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_price(text: &str) -> ScrapeResult<f64> {
    let cleaned = text.replace('$', "");
    match cleaned.trim().parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err(ScrapeError::FieldParse {
            field: "price",
            value: text.to_string(),
        }),
    }
}

/// Leading integer of texts like "12 reviews"
fn parse_count(field: &'static str, text: &str) -> ScrapeResult<u32> {
    text.split_whitespace()
        .next()
        .and_then(|token| token.parse::<u32>().ok())
        .ok_or_else(|| ScrapeError::FieldParse {
            field,
            value: text.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_card(title: &str, price: &str, rating: &str, reviews: &str) -> String {
        format!(
            r#"<div class="col-md-4 col-xl-4 col-lg-4">
                <div class="card thumbnail"><div class="product-wrapper card-body">
                  <div class="caption">
                    <h4 class="price float-end card-title pull-right">{price}</h4>
                    <h4><a href="/product/1" class="title" title="{title}">{title}</a></h4>
                    <p class="description card-text">Aluminium body,
                       15.6" screen</p>
                  </div>
                  <div class="ratings">
                    <p class="review-count float-end">{reviews}</p>
                    <p data-rating="{rating}"><span class="ws-icon ws-icon-star"></span></p>
                  </div>
                </div></div>
              </div>"#
        )
    }

    fn more_card(title: &str, price: &str, stars: usize, reviews: &str) -> String {
        let icons = r#"<span class="ws-icon ws-icon-star"></span>"#.repeat(stars);
        format!(
            r#"<div class="col-md-4 col-xl-4 col-lg-4">
                <div class="caption">
                  <h4 class="price float-end pull-right">{price}</h4>
                  <h4><a class="title" title="{title}">{title}</a></h4>
                  <p class="description">Fresh and crisp</p>
                </div>
                <div class="ratings">
                  <p class="review-count float-end pull-right">{reviews}</p>
                  <p>{icons}</p>
                </div>
              </div>"#
        )
    }

    fn page(cards: &[String]) -> String {
        format!(
            r#"<html><body><div class="row ecomerce-items ecomerce-items-more">{}</div>
               </body></html>"#,
            cards.concat()
        )
    }

    #[test]
    fn test_icon_count_listing() {
        let html = page(&[more_card("Apple", "$100", 4, "12 reviews")]);
        let products = extract_listings(&html, RatingStyle::IconCount).unwrap();

        assert_eq!(
            products,
            vec![Product {
                title: "Apple".to_string(),
                description: "Fresh and crisp".to_string(),
                price: 100.0,
                rating: 4,
                review_count: 12,
            }]
        );
    }

    #[test]
    fn test_data_attribute_listing() {
        let html = page(&[grid_card("Packard 255 G2", "$416.99", "2", "2 reviews")]);
        let products = extract_listings(&html, RatingStyle::DataAttribute).unwrap();

        assert_eq!(products.len(), 1);
        let product = &products[0];
        assert_eq!(product.title, "Packard 255 G2");
        assert_eq!(product.description, "Aluminium body, 15.6\" screen");
        assert_eq!(product.price, 416.99);
        // one icon is rendered, but the attribute is authoritative here
        assert_eq!(product.rating, 2);
        assert_eq!(product.review_count, 2);
    }

    #[test]
    fn test_keeps_document_order() {
        let html = page(&[
            more_card("First", "$1", 1, "1 reviews"),
            more_card("Second", "$2", 2, "2 reviews"),
            more_card("Third", "$3", 3, "3 reviews"),
        ]);
        let titles: Vec<_> = extract_listings(&html, RatingStyle::IconCount)
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, ["First", "Second", "Third"]);
    }

    #[test]
    fn test_page_without_cards_is_empty() {
        let html = "<html><body></body></html>";
        let products = extract_listings(html, RatingStyle::DataAttribute).unwrap();
        assert!(products.is_empty());
    }

    #[test]
    fn test_zero_icons_is_zero_rating() {
        let html = page(&[more_card("Nokia", "$24.99", 0, "0 reviews")]);
        let products = extract_listings(&html, RatingStyle::IconCount).unwrap();
        assert_eq!(products[0].rating, 0);
        assert_eq!(products[0].review_count, 0);
    }

    #[test]
    fn test_missing_rating_attribute_names_field() {
        let html = page(&[more_card("Apple", "$100", 4, "12 reviews")]);
        let err = extract_listings(&html, RatingStyle::DataAttribute).unwrap_err();
        assert!(matches!(err, ScrapeError::MissingField { field: "rating" }), "{err}");
    }

    #[test]
    fn test_unparseable_price_fails_listing() {
        let html = page(&[grid_card("Apple", "call us", "3", "1 reviews")]);
        let err = extract_listings(&html, RatingStyle::DataAttribute).unwrap_err();
        match err {
            ScrapeError::FieldParse { field, value } => {
                assert_eq!(field, "price");
                assert_eq!(value, "call us");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_negative_price_rejected() {
        let html = page(&[grid_card("Apple", "$-5.00", "3", "1 reviews")]);
        let err = extract_listings(&html, RatingStyle::DataAttribute).unwrap_err();
        assert!(matches!(err, ScrapeError::FieldParse { field: "price", .. }));
    }

    #[test]
    fn test_review_count_needs_leading_number() {
        let html = page(&[more_card("Apple", "$100", 4, "no reviews")]);
        let err = extract_listings(&html, RatingStyle::IconCount).unwrap_err();
        assert!(matches!(err, ScrapeError::FieldParse { field: "num_of_reviews", .. }));
    }

    #[test]
    fn test_parse_price_strips_currency_and_spaces() {
        assert!(parse_price(" $1,5 ").is_err());
        assert_eq!(parse_price("$ 1178.99").unwrap(), 1178.99);
        assert_eq!(parse_price("0").unwrap(), 0.0);
    }
}
