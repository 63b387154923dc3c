use std::collections::BTreeMap;
use std::str::FromStr;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "product_condition", rename_all = "lowercase")]
pub enum Condition {
    New,
    Used,
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Condition::New),
            "used" => Ok(Condition::Used),
            other => Err(format!("unknown condition '{}'", other)),
        }
    }
}

/// Catalog product. Money columns hold integer minor units (cents); decimal
/// input is converted at the boundary and never kept as floating point.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub category_id: i32,
    pub name: String,
    pub description: String,
    pub brand: String,
    pub cost: i64,
    pub price: i64,
    pub stock: i32,
    pub low_stock: i32,
    pub condition: Condition,
    pub status: bool,
    pub features: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.low_stock
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Picture {
    pub id: i32,
    pub product_id: i32,
    pub path: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

/// One uploaded picture, consumed from the multipart body.
#[derive(Debug, Clone)]
pub struct PictureUpload {
    pub content_type: String,
    pub bytes: Bytes,
}

/// Decoded create/update submission. Money fields stay raw decimal strings
/// until the service normalizes them.
#[derive(Debug, Clone)]
pub struct ProductSubmission {
    pub category_id: i32,
    pub name: String,
    pub description: String,
    pub brand: String,
    pub cost: String,
    pub price: String,
    pub stock: i32,
    pub low_stock: i32,
    pub condition: Condition,
    pub status: bool,
    pub features: BTreeMap<String, String>,
    pub pictures: Vec<PictureUpload>,
}

/// Normalized write model handed to the catalog store.
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub category_id: i32,
    pub name: String,
    pub description: String,
    pub brand: String,
    pub cost: i64,
    pub price: i64,
    pub stock: i32,
    pub low_stock: i32,
    pub condition: Condition,
    pub status: bool,
    pub features: serde_json::Value,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ProductListing {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub product: Product,
    pub category_name: String,
    #[sqlx(skip)]
    pub low_stock_alert: bool,
}

#[derive(Debug, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub low_stock_alert: bool,
    pub pictures: Vec<Picture>,
}

impl ProductDetail {
    pub fn new(product: Product, pictures: Vec<Picture>) -> Self {
        let low_stock_alert = product.is_low_stock();
        Self {
            product,
            low_stock_alert,
            pictures,
        }
    }
}

/// Context for rendering the create or edit form: selectable categories,
/// plus the current field values when editing.
#[derive(Debug, Serialize)]
pub struct ProductForm {
    pub categories: Vec<Category>,
    pub product: Option<ProductDetail>,
}
