use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::Result;
use crate::models::{Category, Picture, Product, ProductListing, ProductRecord, Seller};
use crate::repo::Catalog;

pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn append_pictures(
        tx: &mut Transaction<'_, Postgres>,
        product_id: i32,
        paths: &[String],
    ) -> Result<()> {
        let start: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM product_pictures WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_one(&mut **tx)
        .await?;

        for (offset, path) in paths.iter().enumerate() {
            sqlx::query(
                "INSERT INTO product_pictures (product_id, path, position) VALUES ($1, $2, $3)",
            )
            .bind(product_id)
            .bind(path)
            .bind(start + offset as i32)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}

#[async_trait]
impl Catalog for PgCatalog {
    async fn ping(&self) -> Result<()> {
        crate::database::check_health(&self.pool).await
    }

    async fn find_seller_by_email(&self, email: &str) -> Result<Option<Seller>> {
        let seller = sqlx::query_as::<_, Seller>("SELECT * FROM sellers WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(seller)
    }

    async fn category_exists(&self, id: i32) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(categories)
    }

    async fn list_products(&self) -> Result<Vec<ProductListing>> {
        let mut listings = sqlx::query_as::<_, ProductListing>(
            r#"
            SELECT p.*, c.name AS category_name
            FROM products p
            JOIN categories c ON c.id = p.category_id
            ORDER BY p.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        for listing in &mut listings {
            listing.low_stock_alert = listing.product.is_low_stock();
        }

        Ok(listings)
    }

    async fn find_product(&self, id: i32) -> Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    async fn product_pictures(&self, product_id: i32) -> Result<Vec<Picture>> {
        let pictures = sqlx::query_as::<_, Picture>(
            "SELECT * FROM product_pictures WHERE product_id = $1 ORDER BY position ASC",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(pictures)
    }

    async fn insert_product(
        &self,
        record: &ProductRecord,
        picture_paths: &[String],
    ) -> Result<Product> {
        let mut tx = self.pool.begin().await?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (
                category_id, name, description, brand, cost, price,
                stock, low_stock, condition, status, features
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(record.category_id)
        .bind(&record.name)
        .bind(&record.description)
        .bind(&record.brand)
        .bind(record.cost)
        .bind(record.price)
        .bind(record.stock)
        .bind(record.low_stock)
        .bind(record.condition)
        .bind(record.status)
        .bind(&record.features)
        .fetch_one(&mut *tx)
        .await?;

        Self::append_pictures(&mut tx, product.id, picture_paths).await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn update_product(
        &self,
        id: i32,
        record: &ProductRecord,
        picture_paths: &[String],
    ) -> Result<Product> {
        let mut tx = self.pool.begin().await?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET
                category_id = $1,
                name = $2,
                description = $3,
                brand = $4,
                cost = $5,
                price = $6,
                stock = $7,
                low_stock = $8,
                condition = $9,
                status = $10,
                features = $11,
                updated_at = NOW()
            WHERE id = $12
            RETURNING *
            "#,
        )
        .bind(record.category_id)
        .bind(&record.name)
        .bind(&record.description)
        .bind(&record.brand)
        .bind(record.cost)
        .bind(record.price)
        .bind(record.stock)
        .bind(record.low_stock)
        .bind(record.condition)
        .bind(record.status)
        .bind(&record.features)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        Self::append_pictures(&mut tx, product.id, picture_paths).await?;

        tx.commit().await?;

        Ok(product)
    }
}
