//! HTTP-level integration tests for the admin product endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    access_token_for, admin_token, body_json, build_test_app, delete_auth, get, get_auth,
    post_json_auth, put_json_auth,
};
use serde_json::json;

fn lamp() -> serde_json::Value {
    json!({
        "title": "Desk lamp",
        "desc": "Warm light",
        "price": 25.5,
        "mainImage": "/uploads/products/lamp.png",
        "secondaryImages": ["/uploads/products/lamp-2.png"],
    })
}

const BASE: &str = "/api/admin/product";

#[tokio::test]
async fn non_admin_is_forbidden_and_anonymous_is_unauthorized() {
    let test = build_test_app();
    let (_, user_token) = access_token_for(&test, "carol").await;

    let forbidden = get_auth(test.app(), &format!("{BASE}/products"), &user_token).await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(forbidden).await["message"], "Admins only");

    let anonymous = get(test.app(), &format!("{BASE}/products")).await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_creates_and_lists_products_newest_first() {
    let test = build_test_app();
    let token = admin_token(&test, "root").await;

    let created = post_json_auth(test.app(), &format!("{BASE}/addProduct"), lamp(), &token).await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let created = body_json(created).await;
    assert_eq!(created["status"], "success");
    assert_eq!(created["data"]["title"], "Desk lamp");
    assert_eq!(created["data"]["desc"], "Warm light");
    assert_eq!(created["data"]["status"], "active");

    let mut chair = lamp();
    chair["title"] = json!("Chair");
    post_json_auth(test.app(), &format!("{BASE}/addProduct"), chair, &token).await;

    let list = get_auth(test.app(), &format!("{BASE}/products"), &token).await;
    assert_eq!(list.status(), StatusCode::OK);
    let list = body_json(list).await;
    let titles: Vec<&str> = list["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Chair", "Desk lamp"]);
}

#[tokio::test]
async fn product_input_is_sanitized() {
    let test = build_test_app();
    let token = admin_token(&test, "root").await;
    let mut body = lamp();
    body["title"] = json!("<script>alert(1)</script><b>Lamp</b>");
    body["__proto__"] = json!({ "isAdmin": true });

    let response = post_json_auth(test.app(), &format!("{BASE}/addProduct"), body, &token).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["title"], "Lamp");
}

#[tokio::test]
async fn missing_required_fields_are_rejected() {
    let test = build_test_app();
    let token = admin_token(&test, "root").await;

    let response = post_json_auth(
        test.app(),
        &format!("{BASE}/addProduct"),
        json!({ "title": "", "desc": "d", "price": 1.0, "mainImage": "m.png" }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["status"], "fail");
}

#[tokio::test]
async fn update_is_partial() {
    let test = build_test_app();
    let token = admin_token(&test, "root").await;
    let created = post_json_auth(test.app(), &format!("{BASE}/addProduct"), lamp(), &token).await;
    let id = body_json(created).await["data"]["id"].as_i64().unwrap();

    let response = put_json_auth(
        test.app(),
        &format!("{BASE}/updateProduct/{id}"),
        json!({ "price": 30.0, "status": "inactive" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["price"], 30.0);
    assert_eq!(json["data"]["status"], "inactive");
    assert_eq!(json["data"]["title"], "Desk lamp");
}

#[tokio::test]
async fn update_and_delete_of_missing_product_are_404() {
    let test = build_test_app();
    let token = admin_token(&test, "root").await;

    let update = put_json_auth(
        test.app(),
        &format!("{BASE}/updateProduct/999"),
        json!({ "price": 1.0 }),
        &token,
    )
    .await;
    assert_eq!(update.status(), StatusCode::NOT_FOUND);

    let delete = delete_auth(test.app(), &format!("{BASE}/deleteProduct/999"), &token).await;
    assert_eq!(delete.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(delete).await["message"], "Product with id 999 not found");
}

#[tokio::test]
async fn delete_removes_product() {
    let test = build_test_app();
    let token = admin_token(&test, "root").await;
    let created = post_json_auth(test.app(), &format!("{BASE}/addProduct"), lamp(), &token).await;
    let id = body_json(created).await["data"]["id"].as_i64().unwrap();

    let response = delete_auth(test.app(), &format!("{BASE}/deleteProduct/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Product deleted");
    assert!(json.get("data").is_none());

    let list = body_json(get_auth(test.app(), &format!("{BASE}/products"), &token).await).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 0);
}
