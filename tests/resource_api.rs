mod common;

use reqwest::StatusCode;
use rest_assert::assertions::{
    assert_content_type, assert_empty_body, assert_recent_timestamp, assert_status,
    JSON_CONTENT_TYPE, UPDATE_TOLERANCE,
};
use rest_assert::client::{ApiClient, UpdateMethod};
use rest_assert::models::{ResourceEnvelope, ResourcesPage, UpdateReceipt};

#[tokio::test]
async fn test_get_resources() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/resource")
        .match_query(common::page_query(1, 1))
        .with_status(200)
        .with_header("Content-Type", "application/json")
        .with_body(common::resources_page_single().to_string())
        .create_async()
        .await;

    let client = ApiClient::new(server.url());
    let response = client.get_resources(1, 1).await.unwrap();
    assert_status(&response, StatusCode::OK).unwrap();
    assert_content_type(&response, JSON_CONTENT_TYPE).unwrap();

    let page: ResourcesPage = response.json().await.unwrap();
    assert_eq!(page.total, 12);
    assert_eq!(page.total_pages, 12);
}

#[tokio::test]
async fn test_get_resource() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/resource/1")
        .with_status(200)
        .with_header("Content-Type", "application/json")
        .with_body(common::resource_envelope(common::cerulean()).to_string())
        .create_async()
        .await;

    let client = ApiClient::new(server.url());
    let response = client.get_resource(1).await.unwrap();
    assert_status(&response, StatusCode::OK).unwrap();

    let envelope: ResourceEnvelope = response.json().await.unwrap();
    assert_eq!(envelope.data.id, 1);
    assert_eq!(envelope.data.name, "cerulean");
    assert_eq!(envelope.data.year, 2000);
    assert_eq!(envelope.data.color, "#98B2D1");
}

#[tokio::test]
async fn test_get_nonexistent_resource() {
    let mut server = mockito::Server::new_async().await;
    let client = ApiClient::new(server.url());

    for resource_id in ["55555", "!", "0"] {
        server
            .mock("GET", format!("/resource/{}", resource_id).as_str())
            .with_status(404)
            .create_async()
            .await;

        let response = client.get_resource(resource_id).await.unwrap();
        assert_status(&response, StatusCode::NOT_FOUND).unwrap();
        assert_empty_body(&response.text().await.unwrap()).unwrap();
    }
}

async fn first_resource_ids(client: &ApiClient) -> Vec<i64> {
    let response = client.get_resources(1, 10).await.unwrap();
    let page: ResourcesPage = response.json().await.unwrap();
    page.data.iter().map(|resource| resource.id).collect()
}

#[tokio::test]
async fn test_put_resource() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/resource")
        .match_query(common::page_query(1, 10))
        .with_status(200)
        .with_body(common::resources_page_of_ten().to_string())
        .create_async()
        .await;
    server
        .mock("PUT", "/resource/1")
        .with_status(200)
        .with_body(common::update_receipt().to_string())
        .create_async()
        .await;

    let client = ApiClient::new(server.url());
    let ids = first_resource_ids(&client).await;

    let response = client
        .update_resource(ids[0], UpdateMethod::Put)
        .await
        .unwrap();
    assert_status(&response, StatusCode::OK).unwrap();

    let receipt: UpdateReceipt = response.json().await.unwrap();
    assert_recent_timestamp(&receipt.updated_at, UPDATE_TOLERANCE).unwrap();
}

#[tokio::test]
async fn test_patch_resource() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/resource")
        .match_query(common::page_query(1, 10))
        .with_status(200)
        .with_body(common::resources_page_of_ten().to_string())
        .create_async()
        .await;
    server
        .mock("PATCH", "/resource/2")
        .with_status(200)
        .with_body(common::update_receipt().to_string())
        .create_async()
        .await;

    let client = ApiClient::new(server.url());
    let ids = first_resource_ids(&client).await;
    assert!(ids.len() >= 2);

    let response = client
        .update_resource(ids[1], UpdateMethod::Patch)
        .await
        .unwrap();
    assert_status(&response, StatusCode::OK).unwrap();

    let receipt: UpdateReceipt = response.json().await.unwrap();
    assert_recent_timestamp(&receipt.updated_at, UPDATE_TOLERANCE).unwrap();
}

#[tokio::test]
async fn test_delete_resource() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/resource")
        .match_query(common::page_query(1, 10))
        .with_status(200)
        .with_body(common::resources_page_of_ten().to_string())
        .create_async()
        .await;
    let delete_mock = server
        .mock("DELETE", "/resource/3")
        .with_status(204)
        .create_async()
        .await;

    let client = ApiClient::new(server.url());
    let ids = first_resource_ids(&client).await;
    assert!(ids.len() >= 3);

    let response = client.delete_resource(ids[2]).await.unwrap();
    assert_status(&response, StatusCode::NO_CONTENT).unwrap();
    assert_empty_body(&response.text().await.unwrap()).unwrap();
    delete_mock.assert_async().await;
}
