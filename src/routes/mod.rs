mod auth;
mod health;
mod products;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/auth/login", post(auth::login_seller))
        .route(
            "/seller/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/seller/products/new", get(products::create_form))
        .route("/seller/products/:id/edit", get(products::edit_form))
        .route("/seller/products/:id", put(products::update_product))
}
