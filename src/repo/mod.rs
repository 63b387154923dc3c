mod memory;
mod pg;

pub use memory::MemoryCatalog;
pub use pg::PgCatalog;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Category, Picture, Product, ProductListing, ProductRecord, Seller};

/// Persistence seam for the product catalog. The Postgres implementation
/// backs the running application; the in-memory one backs tests.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn ping(&self) -> Result<()>;

    async fn find_seller_by_email(&self, email: &str) -> Result<Option<Seller>>;

    async fn category_exists(&self, id: i32) -> Result<bool>;

    async fn list_categories(&self) -> Result<Vec<Category>>;

    /// All products joined with their category name, in insertion order.
    async fn list_products(&self) -> Result<Vec<ProductListing>>;

    async fn find_product(&self, id: i32) -> Result<Option<Product>>;

    /// Pictures owned by a product, in upload order.
    async fn product_pictures(&self, product_id: i32) -> Result<Vec<Picture>>;

    /// Persist a new product together with its picture rows. The whole write
    /// is atomic: either the product and all pictures commit, or nothing.
    async fn insert_product(
        &self,
        record: &ProductRecord,
        picture_paths: &[String],
    ) -> Result<Product>;

    /// Overwrite every scalar field of an existing product and append picture
    /// rows for the newly stored paths, atomically.
    async fn update_product(
        &self,
        id: i32,
        record: &ProductRecord,
        picture_paths: &[String],
    ) -> Result<Product>;
}
