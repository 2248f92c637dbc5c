use serde::{Deserialize, Serialize};

/// Column order of every exported file.
pub const PRODUCT_FIELDS: [&str; 5] = ["title", "description", "price", "rating", "num_of_reviews"];

/// One product card as rendered in a listing grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub rating: u32,
    #[serde(rename = "num_of_reviews")]
    pub review_count: u32,
}
