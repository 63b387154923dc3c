use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        Condition, PictureUpload, ProductDetail, ProductForm, ProductListing, ProductSubmission,
    },
    utils::extractors::CurrentSeller,
};

pub async fn list_products(
    State(state): State<AppState>,
    actor: Option<CurrentSeller>,
) -> Result<Json<Vec<ProductListing>>> {
    let products = state
        .products
        .list_for_seller(actor.as_ref().map(|a| &a.0))
        .await?;

    Ok(Json(products))
}

pub async fn create_form(
    State(state): State<AppState>,
    actor: Option<CurrentSeller>,
) -> Result<Json<ProductForm>> {
    let form = state
        .products
        .create_form(actor.as_ref().map(|a| &a.0))
        .await?;

    Ok(Json(form))
}

pub async fn edit_form(
    State(state): State<AppState>,
    actor: Option<CurrentSeller>,
    Path(id): Path<i32>,
) -> Result<Json<ProductForm>> {
    let form = state
        .products
        .edit_form(actor.as_ref().map(|a| &a.0), id)
        .await?;

    Ok(Json(form))
}

pub async fn create_product(
    State(state): State<AppState>,
    actor: Option<CurrentSeller>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ProductDetail>)> {
    // anonymous callers are turned away before the body is even read
    require_seller(&actor)?;
    let submission = read_submission(multipart).await?;

    let detail = state
        .products
        .submit_create(actor.as_ref().map(|a| &a.0), submission)
        .await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

pub async fn update_product(
    State(state): State<AppState>,
    actor: Option<CurrentSeller>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<ProductDetail>> {
    require_seller(&actor)?;
    let submission = read_submission(multipart).await?;

    let detail = state
        .products
        .submit_update(actor.as_ref().map(|a| &a.0), id, submission)
        .await?;

    Ok(Json(detail))
}

fn require_seller(actor: &Option<CurrentSeller>) -> Result<()> {
    if actor.is_none() {
        return Err(AppError::Unauthorized("Authentication required".to_string()));
    }
    Ok(())
}

// Multipart boundary decode: scalar fields, `features[...]` bracket keys,
// repeated `pictures` file parts.
async fn read_submission(mut multipart: Multipart) -> Result<ProductSubmission> {
    let mut draft = SubmissionDraft::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "pictures" {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Invalid picture upload: {}", e)))?;
            draft.pictures.push(PictureUpload {
                content_type,
                bytes,
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid field '{}': {}", name, e)))?;

        if let Some(key) = name
            .strip_prefix("features[")
            .and_then(|k| k.strip_suffix(']'))
        {
            draft.features.insert(key.to_string(), value);
        } else {
            draft.set_scalar(&name, value)?;
        }
    }

    draft.finish()
}

#[derive(Default)]
struct SubmissionDraft {
    category_id: Option<i32>,
    name: Option<String>,
    description: Option<String>,
    brand: Option<String>,
    cost: Option<String>,
    price: Option<String>,
    stock: Option<i32>,
    low_stock: Option<i32>,
    condition: Option<Condition>,
    status: Option<bool>,
    features: BTreeMap<String, String>,
    pictures: Vec<PictureUpload>,
}

impl SubmissionDraft {
    fn set_scalar(&mut self, name: &str, value: String) -> Result<()> {
        match name {
            "category_id" => self.category_id = Some(parse_int(&value, "category_id")?),
            "name" => self.name = Some(value),
            "description" => self.description = Some(value),
            "brand" => self.brand = Some(value),
            "cost" => self.cost = Some(value),
            "price" => self.price = Some(value),
            "stock" => self.stock = Some(parse_int(&value, "stock")?),
            "low_stock" => self.low_stock = Some(parse_int(&value, "low_stock")?),
            "condition" => {
                self.condition = Some(value.parse().map_err(AppError::Validation)?);
            }
            "status" => self.status = Some(parse_bool(&value, "status")?),
            // unknown fields are ignored
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<ProductSubmission> {
        Ok(ProductSubmission {
            category_id: self.category_id.ok_or_else(|| missing("category_id"))?,
            name: self.name.ok_or_else(|| missing("name"))?,
            description: self.description.ok_or_else(|| missing("description"))?,
            brand: self.brand.ok_or_else(|| missing("brand"))?,
            cost: self.cost.ok_or_else(|| missing("cost"))?,
            price: self.price.ok_or_else(|| missing("price"))?,
            stock: self.stock.ok_or_else(|| missing("stock"))?,
            low_stock: self.low_stock.ok_or_else(|| missing("low_stock"))?,
            condition: self.condition.ok_or_else(|| missing("condition"))?,
            status: self.status.ok_or_else(|| missing("status"))?,
            features: self.features,
            pictures: self.pictures,
        })
    }
}

fn missing(field: &str) -> AppError {
    AppError::Validation(format!("{} is required", field))
}

fn parse_int(value: &str, field: &str) -> Result<i32> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("{} must be an integer", field)))
}

fn parse_bool(value: &str, field: &str) -> Result<bool> {
    match value.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(AppError::Validation(format!(
            "{} must be a boolean",
            field
        ))),
    }
}
