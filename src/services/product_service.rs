use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{
    Actor, PictureUpload, ProductDetail, ProductForm, ProductListing, ProductRecord,
    ProductSubmission,
};
use crate::repo::Catalog;
use crate::services::money;
use crate::storage::{FileStore, PICTURE_NAMESPACE};

const REQUIRED_FEATURES: [&str; 3] = ["weight", "dimensions", "color"];

/// Validates and normalizes product submissions, maps them onto the Product
/// aggregate, and enforces seller authorization. Every operation takes the
/// current actor explicitly; an absent actor is rejected before anything else
/// runs.
#[derive(Clone)]
pub struct ProductService {
    catalog: Arc<dyn Catalog>,
    files: Arc<dyn FileStore>,
}

impl ProductService {
    pub fn new(catalog: Arc<dyn Catalog>, files: Arc<dyn FileStore>) -> Self {
        Self { catalog, files }
    }

    pub async fn submit_create(
        &self,
        actor: Option<&Actor>,
        submission: ProductSubmission,
    ) -> Result<ProductDetail> {
        let actor = require_actor(actor)?;
        let record = normalize(&submission)?;

        if !self.catalog.category_exists(record.category_id).await? {
            return Err(AppError::NotFound(format!(
                "Category {} not found",
                record.category_id
            )));
        }

        let paths = self.store_pictures(&submission.pictures).await?;

        let product = match self.catalog.insert_product(&record, &paths).await {
            Ok(product) => product,
            Err(err) => {
                self.discard_stored(&paths).await;
                return Err(err);
            }
        };

        tracing::info!(
            seller_id = actor.id,
            product_id = product.id,
            pictures = paths.len(),
            "product created"
        );

        let pictures = self.catalog.product_pictures(product.id).await?;
        Ok(ProductDetail::new(product, pictures))
    }

    pub async fn submit_update(
        &self,
        actor: Option<&Actor>,
        id: i32,
        submission: ProductSubmission,
    ) -> Result<ProductDetail> {
        let actor = require_actor(actor)?;

        if self.catalog.find_product(id).await?.is_none() {
            return Err(AppError::NotFound(format!("Product {} not found", id)));
        }

        let record = normalize(&submission)?;

        if !self.catalog.category_exists(record.category_id).await? {
            return Err(AppError::NotFound(format!(
                "Category {} not found",
                record.category_id
            )));
        }

        let paths = self.store_pictures(&submission.pictures).await?;

        let product = match self.catalog.update_product(id, &record, &paths).await {
            Ok(product) => product,
            Err(err) => {
                self.discard_stored(&paths).await;
                return Err(err);
            }
        };

        tracing::info!(
            seller_id = actor.id,
            product_id = product.id,
            pictures = paths.len(),
            "product updated"
        );

        let pictures = self.catalog.product_pictures(product.id).await?;
        Ok(ProductDetail::new(product, pictures))
    }

    pub async fn list_for_seller(&self, actor: Option<&Actor>) -> Result<Vec<ProductListing>> {
        require_actor(actor)?;
        self.catalog.list_products().await
    }

    pub async fn create_form(&self, actor: Option<&Actor>) -> Result<ProductForm> {
        require_actor(actor)?;

        Ok(ProductForm {
            categories: self.catalog.list_categories().await?,
            product: None,
        })
    }

    pub async fn edit_form(&self, actor: Option<&Actor>, id: i32) -> Result<ProductForm> {
        require_actor(actor)?;

        let product = self
            .catalog
            .find_product(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))?;
        let pictures = self.catalog.product_pictures(id).await?;

        Ok(ProductForm {
            categories: self.catalog.list_categories().await?,
            product: Some(ProductDetail::new(product, pictures)),
        })
    }

    /// Store every upload, returning the recorded paths. If one store fails,
    /// the earlier ones are removed so no partial-write state stays visible.
    async fn store_pictures(&self, uploads: &[PictureUpload]) -> Result<Vec<String>> {
        let mut paths = Vec::with_capacity(uploads.len());

        for upload in uploads {
            match self
                .files
                .store(PICTURE_NAMESPACE, &upload.content_type, upload.bytes.clone())
                .await
            {
                Ok(path) => paths.push(path),
                Err(err) => {
                    self.discard_stored(&paths).await;
                    return Err(err);
                }
            }
        }

        Ok(paths)
    }

    async fn discard_stored(&self, paths: &[String]) {
        for path in paths {
            if let Err(err) = self.files.remove(path).await {
                tracing::warn!("Failed to remove stored picture {}: {}", path, err);
            }
        }
    }
}

fn require_actor<'a>(actor: Option<&'a Actor>) -> Result<&'a Actor> {
    actor.ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
}

fn normalize(submission: &ProductSubmission) -> Result<ProductRecord> {
    require_text(&submission.name, "name")?;
    require_text(&submission.description, "description")?;
    require_text(&submission.brand, "brand")?;

    let cost = money::to_minor_units(&submission.cost, "cost")?;
    let price = money::to_minor_units(&submission.price, "price")?;

    if submission.stock < 0 {
        return Err(AppError::Validation("stock must not be negative".to_string()));
    }
    if submission.low_stock < 0 {
        return Err(AppError::Validation(
            "low_stock must not be negative".to_string(),
        ));
    }

    for key in REQUIRED_FEATURES {
        match submission.features.get(key) {
            Some(value) if !value.trim().is_empty() => {}
            _ => {
                return Err(AppError::Validation(format!(
                    "features.{} is required",
                    key
                )))
            }
        }
    }

    Ok(ProductRecord {
        category_id: submission.category_id,
        name: submission.name.trim().to_string(),
        description: submission.description.trim().to_string(),
        brand: submission.brand.trim().to_string(),
        cost,
        price,
        stock: submission.stock,
        low_stock: submission.low_stock,
        condition: submission.condition,
        status: submission.status,
        features: serde_json::to_value(&submission.features)
            .map_err(|e| AppError::InternalError(format!("Failed to encode features: {}", e)))?,
    })
}

fn require_text(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}
