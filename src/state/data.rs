//! Shared data structures for the application state
//!
//! These structs represent the data model that flows between
//! the server, the database layer and the UI layer.

use serde::Deserialize;
use serde_json::{Map, Value};

/// A product as served by the product server
///
/// Only `index` is required. `name` is typed; every other display attribute
/// (`region`, `wineType`, `price`, `year`, ...) is kept verbatim in `extra`
/// and read through [`Product::attribute`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    /// Server-assigned index (identity)
    pub index: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Wine #{}", self.index))
    }

    /// Render an extra attribute as display text
    pub fn attribute(&self, key: &str) -> Option<String> {
        match self.extra.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// One row of the wishlist table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WishlistEntry {
    /// Row id (1-based, product position + 1)
    pub id: i64,
    /// 1 = liked, 0 = not liked
    pub liked: i64,
}

/// Red or white. The server encodes these as 0 and 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WineType {
    #[default]
    Red,
    White,
}

impl WineType {
    pub const ALL: [WineType; 2] = [WineType::Red, WineType::White];

    pub fn index(self) -> i64 {
        match self {
            WineType::Red => 0,
            WineType::White => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WineType::Red => "Red",
            WineType::White => "White",
        }
    }

    /// Parse the stored text form. Accepts the numeric encoding too.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "White" | "white" | "1" => WineType::White,
            _ => WineType::Red,
        }
    }
}

impl std::fmt::Display for WineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A wine in the user's cellar, with its tasting note
#[derive(Debug, Clone, PartialEq)]
pub struct Wine {
    pub wine_index: i64,
    pub name: String,
    /// Text fields hold whatever the user typed
    pub year: String,
    pub price: String,
    pub alcohol: String,
    pub wine_type: WineType,
    /// Sliders (0.0 to 100.0)
    pub sugar: f64,
    pub body: f64,
    pub tannin: f64,
    pub ph: f64,
    pub note: String,
}

impl Wine {
    /// Start a cellar entry from a product listing
    pub fn from_product(product: &Product) -> Self {
        let wine_type = product
            .attribute("wineType")
            .map(|raw| WineType::parse(&raw))
            .unwrap_or_default();

        Self {
            wine_index: product.index,
            name: product.display_name(),
            year: product.attribute("year").unwrap_or_default(),
            price: product.attribute("price").unwrap_or_default(),
            alcohol: product.attribute("alcohol").unwrap_or_default(),
            wine_type,
            sugar: 0.0,
            body: 0.0,
            tannin: 0.0,
            ph: 0.0,
            note: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_keeps_unknown_attributes() {
        let product: Product = serde_json::from_str(
            r#"{"index": 7, "name": "Chateau Margaux", "price": 35000, "wineType": 1}"#,
        )
        .unwrap();

        assert_eq!(product.index, 7);
        assert_eq!(product.display_name(), "Chateau Margaux");
        assert_eq!(product.attribute("price").as_deref(), Some("35000"));
        assert_eq!(product.attribute("wineType").as_deref(), Some("1"));
        assert_eq!(product.attribute("missing"), None);
    }

    #[test]
    fn test_wine_from_product() {
        let product: Product = serde_json::from_str(
            r#"{"index": 3, "wineType": "1", "year": "2015", "alcohol": 13.5}"#,
        )
        .unwrap();

        let wine = Wine::from_product(&product);
        assert_eq!(wine.wine_index, 3);
        assert_eq!(wine.name, "Wine #3");
        assert_eq!(wine.wine_type, WineType::White);
        assert_eq!(wine.year, "2015");
        assert_eq!(wine.alcohol, "13.5");
        assert!(wine.note.is_empty());
    }

    #[test]
    fn test_wine_type_encoding() {
        assert_eq!(WineType::parse("1"), WineType::White);
        assert_eq!(WineType::parse("White"), WineType::White);
        assert_eq!(WineType::parse("Rose"), WineType::Red);
        assert_eq!(WineType::White.index(), 1);
    }
}
