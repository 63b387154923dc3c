mod common;

use axum::http::StatusCode;
use serde_json::Value;
use vitrina_back::storage::FileStore;

use common::{TestApp, filled_submission, get_request, multipart_request};

#[tokio::test]
async fn anonymous_callers_are_rejected_without_touching_product_state() {
    let app = TestApp::new();

    let (status, _) = app.send(get_request("/seller/products", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.send(get_request("/seller/products/new", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.send(get_request("/seller/products/1/edit", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let body = filled_submission(app.c1).finish();
    let (status, _) = app
        .send(multipart_request("POST", "/seller/products", None, body))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let body = filled_submission(app.c1).finish();
    let (status, _) = app
        .send(multipart_request("PUT", "/seller/products/1", None, body))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // an incomplete body must not earn field-level validation feedback
    let body = common::MultipartBody::new().text("brand", "Acme").finish();
    let (status, json) = app
        .send(multipart_request("POST", "/seller/products", None, body))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "Authentication required");

    let body = common::MultipartBody::new().text("brand", "Acme").finish();
    let (status, _) = app
        .send(multipart_request("PUT", "/seller/products/1", None, body))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(app.catalog.product_count(), 0);
    assert_eq!(app.files.object_count(), 0);
}

#[tokio::test]
async fn seller_creates_product_with_normalized_money_fields() {
    let app = TestApp::new();

    let body = filled_submission(app.c1)
        .text("name", "New name")
        .text("features[weight]", "New weight")
        .finish();
    let (status, json) = app
        .send(multipart_request(
            "POST",
            "/seller/products",
            Some(&app.token),
            body,
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["category_id"], app.c1);
    assert_eq!(json["name"], "New name");
    assert_eq!(json["cost"], 649);
    assert_eq!(json["price"], 749);
    assert_eq!(json["stock"], 5);
    assert_eq!(json["low_stock"], 1);
    assert_eq!(json["condition"], "new");
    assert_eq!(json["status"], true);
    assert_eq!(json["features"]["weight"], "New weight");
    assert_eq!(app.catalog.product_count(), 1);
}

#[tokio::test]
async fn uploaded_pictures_are_stored_and_owned_by_the_product() {
    let app = TestApp::new();

    let body = filled_submission(app.c1)
        .file("pictures", "front.png", "image/png", b"first-image-bytes")
        .file("pictures", "back.jpg", "image/jpeg", b"second-image-bytes")
        .finish();
    let (status, json) = app
        .send(multipart_request(
            "POST",
            "/seller/products",
            Some(&app.token),
            body,
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);

    let pictures = json["pictures"].as_array().unwrap();
    assert_eq!(pictures.len(), 2);
    assert_eq!(pictures[0]["position"], 0);
    assert_eq!(pictures[1]["position"], 1);

    for picture in pictures {
        let path = picture["path"].as_str().unwrap();
        assert!(path.starts_with("product-pictures/"));
        assert!(app.files.exists(path).await.unwrap());
    }
}

#[tokio::test]
async fn update_fully_replaces_every_field() {
    let app = TestApp::new();

    let body = filled_submission(app.c1).finish();
    let (status, created) = app
        .send(multipart_request(
            "POST",
            "/seller/products",
            Some(&app.token),
            body,
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    let body = filled_submission(app.c2)
        .text("name", "Renamed drill")
        .text("description", "Refurbished unit")
        .text("brand", "Bosch")
        .text("cost", "22.49")
        .text("price", "74.49")
        .text("stock", "10")
        .text("low_stock", "5")
        .text("condition", "used")
        .text("status", "false")
        .text("features[weight]", "1.5kg")
        .finish();
    let (status, updated) = app
        .send(multipart_request(
            "PUT",
            &format!("/seller/products/{}", id),
            Some(&app.token),
            body,
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["category_id"], app.c2);
    assert_eq!(updated["name"], "Renamed drill");
    assert_eq!(updated["description"], "Refurbished unit");
    assert_eq!(updated["brand"], "Bosch");
    assert_eq!(updated["cost"], 2249);
    assert_eq!(updated["price"], 7449);
    assert_eq!(updated["stock"], 10);
    assert_eq!(updated["low_stock"], 5);
    assert_eq!(updated["condition"], "used");
    assert_eq!(updated["status"], false);
    assert_eq!(updated["features"]["weight"], "1.5kg");

    // re-read through the edit form reflects every new value
    let (status, form) = app
        .send(get_request(
            &format!("/seller/products/{}/edit", id),
            Some(&app.token),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    let product = &form["product"];
    assert_eq!(product["category_id"], app.c2);
    assert_eq!(product["cost"], 2249);
    assert_eq!(product["price"], 7449);
    assert_eq!(product["stock"], 10);
    assert_eq!(product["low_stock"], 5);
    assert_eq!(product["condition"], "used");
}

#[tokio::test]
async fn update_appends_new_pictures_to_the_collection() {
    let app = TestApp::new();

    let body = filled_submission(app.c1)
        .file("pictures", "a.png", "image/png", b"aaaa")
        .finish();
    let (_, created) = app
        .send(multipart_request(
            "POST",
            "/seller/products",
            Some(&app.token),
            body,
        ))
        .await;
    let id = created["id"].as_i64().unwrap();

    let body = filled_submission(app.c1)
        .file("pictures", "b.webp", "image/webp", b"bbbb")
        .finish();
    let (status, updated) = app
        .send(multipart_request(
            "PUT",
            &format!("/seller/products/{}", id),
            Some(&app.token),
            body,
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    let pictures = updated["pictures"].as_array().unwrap();
    assert_eq!(pictures.len(), 2);
    assert_eq!(pictures[0]["position"], 0);
    assert_eq!(pictures[1]["position"], 1);
    assert_eq!(app.catalog.picture_count(), 2);
}

#[tokio::test]
async fn listing_resolves_category_names_and_low_stock() {
    let app = TestApp::new();

    let body = filled_submission(app.c1)
        .text("stock", "1")
        .text("low_stock", "3")
        .finish();
    let (status, _) = app
        .send(multipart_request(
            "POST",
            "/seller/products",
            Some(&app.token),
            body,
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = app
        .send(get_request("/seller/products", Some(&app.token)))
        .await;

    assert_eq!(status, StatusCode::OK);
    let listings = json.as_array().unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0]["category_name"], "Electronics");
    assert_eq!(listings[0]["low_stock_alert"], true);
}

#[tokio::test]
async fn create_form_lists_available_categories() {
    let app = TestApp::new();

    let (status, form) = app
        .send(get_request("/seller/products/new", Some(&app.token)))
        .await;

    assert_eq!(status, StatusCode::OK);
    let categories = form["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(form["product"], Value::Null);
}

#[tokio::test]
async fn validation_failure_creates_nothing() {
    let app = TestApp::new();

    // name omitted entirely
    let body = common::MultipartBody::new()
        .text("category_id", &app.c1.to_string())
        .text("description", "whatever")
        .text("brand", "Acme")
        .text("cost", "6.49")
        .text("price", "7.49")
        .text("stock", "5")
        .text("low_stock", "1")
        .text("condition", "new")
        .text("status", "true")
        .text("features[weight]", "1kg")
        .text("features[dimensions]", "1x1x1")
        .text("features[color]", "red")
        .file("pictures", "a.png", "image/png", b"aaaa")
        .finish();
    let (status, _) = app
        .send(multipart_request(
            "POST",
            "/seller/products",
            Some(&app.token),
            body,
        ))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.catalog.product_count(), 0);
    assert_eq!(app.files.object_count(), 0);
}

#[tokio::test]
async fn malformed_money_is_rejected() {
    let app = TestApp::new();

    let body = filled_submission(app.c1).text("cost", "six dollars").finish();
    let (status, _) = app
        .send(multipart_request(
            "POST",
            "/seller/products",
            Some(&app.token),
            body,
        ))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.catalog.product_count(), 0);
}

#[tokio::test]
async fn unknown_category_is_not_found() {
    let app = TestApp::new();

    let body = filled_submission(9999).finish();
    let (status, _) = app
        .send(multipart_request(
            "POST",
            "/seller/products",
            Some(&app.token),
            body,
        ))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.catalog.product_count(), 0);
}

#[tokio::test]
async fn updating_unknown_product_is_not_found() {
    let app = TestApp::new();

    let body = filled_submission(app.c1).finish();
    let (status, _) = app
        .send(multipart_request(
            "PUT",
            "/seller/products/424242",
            Some(&app.token),
            body,
        ))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
