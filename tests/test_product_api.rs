//! End-to-end HTTP checks of the product endpoints against the in-memory store.

use product_catalog::domain::model::ResolvedProduct;
use product_catalog::{transport, CatalogService, CatalogStore, MemoryCatalogStore};
use serde_json::{json, Value};
use std::sync::Arc;

async fn spawn_api() -> Result<String, Box<dyn std::error::Error>> {
    spawn_api_with(MemoryCatalogStore::new()).await
}

async fn spawn_api_with(store: MemoryCatalogStore) -> Result<String, Box<dyn std::error::Error>> {
    let app_state = transport::http::AppState {
        catalog: Arc::new(CatalogService::new(Arc::new(store))),
    };
    let router = transport::http::create_router(app_state);

    // Bind to an ephemeral port to avoid conflicts with a running server.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Ok(format!("http://127.0.0.1:{}", port))
}

async fn send(
    request: reqwest::RequestBuilder,
) -> Result<(u16, Value), Box<dyn std::error::Error>> {
    let resp = request.send().await?;
    let status = resp.status().as_u16();
    Ok((status, resp.json::<Value>().await?))
}

#[tokio::test]
async fn test_product_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_api().await?;
    let client = reqwest::Client::new();

    let (status, body) = send(
        client
            .post(format!("{}/categories", base_url))
            .json(&json!({ "name": "Peripherals" })),
    )
    .await?;
    assert_eq!(status, 200);
    let category_id = body["data"]["id"].as_i64().unwrap();

    // Supplied code is kept verbatim.
    let (status, body) = send(client.post(format!("{}/products", base_url)).json(&json!({
        "code": "P00100",
        "name": "Keyboard",
        "price": 49.5,
        "categoryID": category_id
    })))
    .await?;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "success");
    assert!(body.get("message").is_none());
    assert_eq!(body["data"]["code"], "P00100");
    assert_eq!(body["data"]["price"], 49.5);
    assert_eq!(body["data"]["category"]["name"], "Peripherals");
    let product_id = body["data"]["id"].as_i64().unwrap();

    // No code: allocated from the latest product (P00100 -> "0010" + 1).
    let (status, body) = send(client.post(format!("{}/products", base_url)).json(&json!({
        "name": "Mouse",
        "price": 19.0
    })))
    .await?;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["code"], "P00011");
    assert_eq!(body["data"]["category"], Value::Null);

    let (status, body) = send(client.get(format!("{}/products/{}", base_url, product_id))).await?;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["name"], "Keyboard");

    // Same code on the same product is not a collision; blank code keeps it.
    let (status, body) = send(
        client
            .put(format!("{}/products/{}", base_url, product_id))
            .json(&json!({ "code": "P00100", "name": "Keyboard v2", "price": 55.0 })),
    )
    .await?;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["name"], "Keyboard v2");
    assert_eq!(body["data"]["category"], Value::Null);

    let (status, body) = send(
        client
            .put(format!("{}/products/{}", base_url, product_id))
            .json(&json!({ "code": "", "name": "Keyboard v3", "price": 56.0, "categoryID": category_id })),
    )
    .await?;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["code"], "P00100");
    assert_eq!(body["data"]["category"]["id"], category_id);

    let (_, first) = send(client.get(format!("{}/products", base_url))).await?;
    let (_, second) = send(client.get(format!("{}/products", base_url))).await?;
    assert_eq!(first, second);
    assert_eq!(first["data"].as_array().unwrap().len(), 2);

    let (status, body) = send(client.delete(format!("{}/products/{}", base_url, product_id))).await?;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "status": "success" }));

    let (status, body) = send(client.get(format!("{}/products/{}", base_url, product_id))).await?;
    assert_eq!(status, 404);
    assert_eq!(body, json!({ "status": "failed", "message": "Product not found." }));

    Ok(())
}

#[tokio::test]
async fn test_product_rejections() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_api().await?;
    let client = reqwest::Client::new();

    let (status, _) = send(client.post(format!("{}/products", base_url)).json(&json!({
        "code": "P00001",
        "name": "Cable",
        "price": 2.0
    })))
    .await?;
    assert_eq!(status, 200);

    let (status, body) = send(client.post(format!("{}/products", base_url)).json(&json!({
        "code": "P00001",
        "name": "Another cable",
        "price": 3.0
    })))
    .await?;
    assert_eq!(status, 400);
    assert_eq!(body["status"], "failed");
    assert_eq!(body["message"], "Product code already exists.");

    let (status, body) = send(client.post(format!("{}/products", base_url)).json(&json!({
        "code": "P00X01",
        "name": "Cable",
        "price": 2.0
    })))
    .await?;
    assert_eq!(status, 400);
    assert_eq!(
        body["message"],
        "Invalid product code. Must follow this format PXXXXX (eg. P00001)."
    );

    let (status, body) = send(client.post(format!("{}/products", base_url)).json(&json!({
        "name": "Cable",
        "price": 2.0,
        "categoryID": 77
    })))
    .await?;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "Category not found.");

    let (status, body) = send(
        client
            .post(format!("{}/products", base_url))
            .json(&json!({ "name": "" })),
    )
    .await?;
    assert_eq!(status, 400);
    assert_eq!(
        body["message"],
        "name: Name cannot be empty., price: Price cannot be empty."
    );

    let (status, body) = send(
        client
            .put(format!("{}/products/999", base_url))
            .json(&json!({ "name": "Ghost", "price": 1.0 })),
    )
    .await?;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "Product not found.");

    let (status, body) = send(
        client
            .post(format!("{}/products", base_url))
            .header("content-type", "application/json")
            .body("{not json"),
    )
    .await?;
    assert_eq!(status, 400);
    assert_eq!(body["status"], "failed");

    let (status, body) = send(client.get(format!("{}/products/abc", base_url))).await?;
    assert_eq!(status, 400);
    assert_eq!(body["status"], "failed");

    // Only the first product survived all of the above.
    let (_, body) = send(client.get(format!("{}/products", base_url))).await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_corrupt_latest_code_fails_allocation() -> Result<(), Box<dyn std::error::Error>> {
    let store = MemoryCatalogStore::new();
    let mut uow = store.begin().await?;
    uow.save_product(
        None,
        &ResolvedProduct {
            code: "PABCDE".into(),
            name: "Legacy import".into(),
            price: 1.0,
            category: None,
        },
    )
    .await?;
    uow.commit().await?;

    let base_url = spawn_api_with(store).await?;
    let client = reqwest::Client::new();

    let (status, body) = send(
        client
            .post(format!("{}/products", base_url))
            .json(&json!({ "name": "Adapter", "price": 1.0 })),
    )
    .await?;
    assert_eq!(status, 500);
    assert_eq!(
        body,
        json!({ "status": "failed", "message": "Error generating product code." })
    );

    // The failed create left only the seeded product behind.
    let (_, body) = send(client.get(format!("{}/products", base_url))).await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    Ok(())
}
