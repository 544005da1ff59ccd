//! Integration tests for the product pages.

use backoffice_integration_tests::{Backend, TestContext, location};
use reqwest::{
    StatusCode,
    multipart::{Form, Part},
};
use serde_json::{Value, json};

fn catalog() -> Backend {
    Backend {
        categories: vec![json!({"_id": "c1", "name": "Shoes"})],
        products: vec![json!({
            "_id": "p1",
            "title": "Botas",
            "description": "Piel genuina",
            "price": 99,
            "images": ["https://cdn.test/a.jpg", "https://cdn.test/b.jpg"],
            "category": {"_id": "c1", "name": "Shoes"}
        })],
        ..Backend::default()
    }
}

fn position(html: &str, needle: &str) -> usize {
    html.find(needle)
        .unwrap_or_else(|| panic!("{needle} not found in page"))
}

#[tokio::test]
async fn test_new_form_lists_categories() {
    let ctx = TestContext::with_backend(catalog()).await;
    ctx.sign_in().await;

    let (status, html) = ctx.get_page("/products/new").await;

    assert_eq!(status, StatusCode::OK);
    assert!(position(&html, "Sin categoria") < position(&html, "Shoes"));
    assert!(html.contains(r#"<option value="c1">Shoes</option>"#));
}

#[tokio::test]
async fn test_category_failure_leaves_only_no_category() {
    let ctx = TestContext::with_backend(Backend {
        fail_reads: true,
        ..catalog()
    })
    .await;
    ctx.sign_in().await;

    let (status, html) = ctx.get_page("/products/new").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Sin categoria"));
    assert!(!html.contains("Shoes"));
}

#[tokio::test]
async fn test_create_product_posts_once_and_redirects() {
    let ctx = TestContext::with_backend(catalog()).await;
    ctx.sign_in().await;

    let response = ctx
        .client
        .post(ctx.url("/products/save"))
        .form(&[
            ("title", "Sandalias"),
            ("description", "Verano"),
            ("category", "c1"),
            ("price", "450"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/products");

    let writes = ctx.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].method, "POST");
    assert_eq!(writes[0].path, "/api/products");
    assert_eq!(
        writes[0].body,
        json!({
            "title": "Sandalias",
            "description": "Verano",
            "price": "450",
            "images": [],
            "category": "c1"
        })
    );

    let (_, html) = ctx.get_page("/products").await;
    assert!(html.contains("Producto guardado exitosamente"));

    // The notice is shown once
    let (_, html) = ctx.get_page("/products").await;
    assert!(!html.contains("Producto guardado exitosamente"));
}

#[tokio::test]
async fn test_create_without_category_sends_null() {
    let ctx = TestContext::with_backend(catalog()).await;
    ctx.sign_in().await;

    let response = ctx
        .client
        .post(ctx.url("/products/save"))
        .form(&[("title", "Gorra"), ("category", ""), ("price", "10")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let writes = ctx.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].body["category"], Value::Null);
}

#[tokio::test]
async fn test_edit_form_is_seeded_from_product() {
    let ctx = TestContext::with_backend(catalog()).await;
    ctx.sign_in().await;

    let (status, html) = ctx.get_page("/products/p1/edit").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"name="_id" value="p1""#));
    assert!(html.contains(r#"value="Botas""#));
    assert!(html.contains(r#"value="99""#));
    assert!(html.contains(r#"<option value="c1" selected>Shoes</option>"#));
    assert!(position(&html, "https://cdn.test/a.jpg") < position(&html, "https://cdn.test/b.jpg"));
}

#[tokio::test]
async fn test_edit_unknown_product_is_not_found() {
    let ctx = TestContext::with_backend(catalog()).await;
    ctx.sign_in().await;

    let (status, _) = ctx.get_page("/products/missing/edit").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_edit_with_failing_api_is_bad_gateway() {
    let ctx = TestContext::with_backend(Backend {
        fail_reads: true,
        ..catalog()
    })
    .await;
    ctx.sign_in().await;

    let (status, _) = ctx.get_page("/products/p1/edit").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_update_sends_put_with_id() {
    let ctx = TestContext::with_backend(catalog()).await;
    ctx.sign_in().await;

    let response = ctx
        .client
        .post(ctx.url("/products/save"))
        .form(&[
            ("_id", "p1"),
            ("title", "Botas altas"),
            ("description", "Piel genuina"),
            ("category", "c1"),
            ("price", "120"),
            ("images", "https://cdn.test/b.jpg"),
            ("images", "https://cdn.test/a.jpg"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let writes = ctx.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].method, "PUT");
    assert_eq!(writes[0].body["_id"], "p1");
    assert_eq!(
        writes[0].body["images"],
        json!(["https://cdn.test/b.jpg", "https://cdn.test/a.jpg"])
    );
}

#[tokio::test]
async fn test_failed_save_keeps_typed_values() {
    let ctx = TestContext::with_backend(Backend {
        fail_writes: true,
        ..catalog()
    })
    .await;
    ctx.sign_in().await;

    let response = ctx
        .client
        .post(ctx.url("/products/save"))
        .form(&[
            ("title", "Sandalias"),
            ("description", "Verano"),
            ("category", "c1"),
            ("price", "450"),
            ("images", "https://cdn.test/a.jpg"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();
    assert!(html.contains("Error guardando el producto"));
    assert!(html.contains(r#"value="Sandalias""#));
    assert!(html.contains(">Verano</textarea>"));
    assert!(html.contains(r#"value="450""#));
    assert!(html.contains(r#"<option value="c1" selected>Shoes</option>"#));
    assert!(html.contains("https://cdn.test/a.jpg"));
}

#[tokio::test]
async fn test_upload_appends_in_upload_order() {
    let ctx = TestContext::with_backend(catalog()).await;
    ctx.sign_in().await;

    let form = Form::new()
        .text("_id", "p1")
        .text("title", "Botas")
        .text("price", "99")
        .text("images", "https://cdn.test/a.jpg")
        .part(
            "file",
            Part::bytes(vec![0xFF, 0xD8, 0xFF])
                .file_name("1.jpg")
                .mime_str("image/jpeg")
                .unwrap(),
        )
        .part(
            "file",
            Part::bytes(vec![0xFF, 0xD8, 0xFF])
                .file_name("2.jpg")
                .mime_str("image/jpeg")
                .unwrap(),
        );

    let response = ctx
        .client
        .post(ctx.url("/products/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();
    let a = position(&html, r#"value="https://cdn.test/a.jpg""#);
    let one = position(&html, r#"value="https://cdn.test/1.jpg""#);
    let two = position(&html, r#"value="https://cdn.test/2.jpg""#);
    assert!(a < one && one < two);
    assert!(html.contains(r#"value="Botas""#));

    let writes = ctx.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].path, "/api/upload");
    assert_eq!(writes[0].body, json!(["1.jpg", "2.jpg"]));
}

#[tokio::test]
async fn test_upload_without_files_sends_nothing() {
    let ctx = TestContext::with_backend(catalog()).await;
    ctx.sign_in().await;

    let form = Form::new()
        .text("title", "Botas")
        .part("file", Part::bytes(Vec::new()).file_name(""));

    let response = ctx
        .client
        .post(ctx.url("/products/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(ctx.writes().is_empty());
}

#[tokio::test]
async fn test_failed_upload_shows_error_and_keeps_images() {
    let ctx = TestContext::with_backend(Backend {
        fail_writes: true,
        ..catalog()
    })
    .await;
    ctx.sign_in().await;

    let form = Form::new()
        .text("title", "Botas")
        .text("images", "https://cdn.test/a.jpg")
        .part("file", Part::bytes(vec![1, 2, 3]).file_name("1.jpg"));

    let html = ctx
        .client
        .post(ctx.url("/products/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(html.contains("Error uploading images. Please try again."));
    assert!(html.contains(r#"value="https://cdn.test/a.jpg""#));
    assert!(!html.contains("https://cdn.test/1.jpg"));
}

#[tokio::test]
async fn test_photo_larger_than_two_mib_uploads() {
    let ctx = TestContext::with_backend(catalog()).await;
    ctx.sign_in().await;

    let photo = vec![0xAB; 3 * 1024 * 1024];
    let form = Form::new()
        .text("title", "Botas")
        .part(
            "file",
            Part::bytes(photo)
                .file_name("big.jpg")
                .mime_str("image/jpeg")
                .unwrap(),
        );

    let response = ctx
        .client
        .post(ctx.url("/products/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();
    assert!(html.contains(r#"value="https://cdn.test/big.jpg""#));
    assert!(!html.contains("Error uploading images"));
    assert_eq!(ctx.writes().len(), 1);
}

#[tokio::test]
async fn test_upload_over_limit_keeps_form_and_shows_error() {
    let ctx = TestContext::with_env(catalog(), &[("UPLOAD_MAX_BYTES", "8192")]).await;
    ctx.sign_in().await;

    let form = Form::new()
        .text("title", "Botas typed")
        .text("category", "c1")
        .text("description", "Piel")
        .text("price", "450")
        .text("images", "https://cdn.test/a.jpg")
        .part(
            "file",
            Part::bytes(vec![0xAB; 32 * 1024])
                .file_name("huge.jpg")
                .mime_str("image/jpeg")
                .unwrap(),
        );

    let response = ctx
        .client
        .post(ctx.url("/products/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();
    assert!(html.contains("Error uploading images. Please try again."));
    assert!(html.contains(r#"value="Botas typed""#));
    assert!(html.contains(">Piel</textarea>"));
    assert!(html.contains(r#"value="450""#));
    assert!(html.contains(r#"<option value="c1" selected>Shoes</option>"#));
    assert!(html.contains(r#"value="https://cdn.test/a.jpg""#));
    assert!(!html.contains("huge.jpg"));
    assert!(ctx.writes().is_empty());
}

#[tokio::test]
async fn test_reorder_accepts_permutation_only() {
    let ctx = TestContext::new().await;
    ctx.sign_in().await;

    let response = ctx
        .client
        .post(ctx.url("/products/images/reorder"))
        .json(&json!({"images": ["a", "b", "c"], "order": ["c", "a", "b"]}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["images"], json!(["c", "a", "b"]));

    let response = ctx
        .client
        .post(ctx.url("/products/images/reorder"))
        .json(&json!({"images": ["a", "b", "c"], "order": ["a", "b", "z"]}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["images"], json!(["a", "b", "c"]));
    assert!(body["error"].is_string());

    assert!(ctx.writes().is_empty());
}
