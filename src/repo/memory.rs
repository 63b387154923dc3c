use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::Result;
use crate::models::{Category, Picture, Product, ProductListing, ProductRecord, Seller};
use crate::repo::Catalog;

/// In-memory catalog fake for tests. Mirrors the Postgres implementation's
/// observable behavior: serial ids, insertion-ordered listings, pictures
/// ordered by position.
#[derive(Default)]
pub struct MemoryCatalog {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    sellers: Vec<Seller>,
    categories: Vec<Category>,
    products: BTreeMap<i32, Product>,
    pictures: BTreeMap<i32, Vec<Picture>>,
    next_seller_id: i32,
    next_category_id: i32,
    next_product_id: i32,
    next_picture_id: i32,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_seller(&self, email: &str, name: &str, password_hash: &str) -> i32 {
        let mut inner = self.inner.write().unwrap();
        inner.next_seller_id += 1;
        let id = inner.next_seller_id;
        inner.sellers.push(Seller {
            id,
            email: email.to_string(),
            name: name.to_string(),
            password: Some(password_hash.to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        id
    }

    pub fn add_category(&self, name: &str) -> i32 {
        let mut inner = self.inner.write().unwrap();
        inner.next_category_id += 1;
        let id = inner.next_category_id;
        inner.categories.push(Category {
            id,
            name: name.to_string(),
            created_at: Utc::now(),
        });
        id
    }

    pub fn product_count(&self) -> usize {
        self.inner.read().unwrap().products.len()
    }

    pub fn picture_count(&self) -> usize {
        self.inner.read().unwrap().pictures.values().map(Vec::len).sum()
    }
}

fn apply_record(product: &mut Product, record: &ProductRecord) {
    product.category_id = record.category_id;
    product.name = record.name.clone();
    product.description = record.description.clone();
    product.brand = record.brand.clone();
    product.cost = record.cost;
    product.price = record.price;
    product.stock = record.stock;
    product.low_stock = record.low_stock;
    product.condition = record.condition;
    product.status = record.status;
    product.features = record.features.clone();
    product.updated_at = Utc::now();
}

impl Inner {
    fn append_pictures(&mut self, product_id: i32, paths: &[String]) {
        let owned = self.pictures.entry(product_id).or_default();
        let start = owned.len() as i32;
        for (offset, path) in paths.iter().enumerate() {
            self.next_picture_id += 1;
            owned.push(Picture {
                id: self.next_picture_id,
                product_id,
                path: path.clone(),
                position: start + offset as i32,
                created_at: Utc::now(),
            });
        }
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn find_seller_by_email(&self, email: &str) -> Result<Option<Seller>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.sellers.iter().find(|s| s.email == email).cloned())
    }

    async fn category_exists(&self, id: i32) -> Result<bool> {
        let inner = self.inner.read().unwrap();
        Ok(inner.categories.iter().any(|c| c.id == id))
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let inner = self.inner.read().unwrap();
        let mut categories = inner.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn list_products(&self) -> Result<Vec<ProductListing>> {
        let inner = self.inner.read().unwrap();
        let listings = inner
            .products
            .values()
            .map(|product| {
                let category_name = inner
                    .categories
                    .iter()
                    .find(|c| c.id == product.category_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_default();
                ProductListing {
                    low_stock_alert: product.is_low_stock(),
                    category_name,
                    product: product.clone(),
                }
            })
            .collect();
        Ok(listings)
    }

    async fn find_product(&self, id: i32) -> Result<Option<Product>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.products.get(&id).cloned())
    }

    async fn product_pictures(&self, product_id: i32) -> Result<Vec<Picture>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.pictures.get(&product_id).cloned().unwrap_or_default())
    }

    async fn insert_product(
        &self,
        record: &ProductRecord,
        picture_paths: &[String],
    ) -> Result<Product> {
        let mut inner = self.inner.write().unwrap();
        inner.next_product_id += 1;
        let id = inner.next_product_id;

        let mut product = Product {
            id,
            category_id: record.category_id,
            name: String::new(),
            description: String::new(),
            brand: String::new(),
            cost: 0,
            price: 0,
            stock: 0,
            low_stock: 0,
            condition: record.condition,
            status: false,
            features: serde_json::Value::Null,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        apply_record(&mut product, record);

        inner.products.insert(id, product.clone());
        inner.append_pictures(id, picture_paths);

        Ok(product)
    }

    async fn update_product(
        &self,
        id: i32,
        record: &ProductRecord,
        picture_paths: &[String],
    ) -> Result<Product> {
        let mut inner = self.inner.write().unwrap();

        let mut product = inner
            .products
            .get(&id)
            .cloned()
            .ok_or_else(|| sqlx::Error::RowNotFound)?;
        apply_record(&mut product, record);
        inner.products.insert(id, product.clone());
        inner.append_pictures(id, picture_paths);

        Ok(product)
    }
}
