use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
};
use serde_json::json;

use crate::{error::ErrorVerbosity, server, state::ApiState};

use super::{empty_request, json_request, send, test_store, TestApp};

#[tokio::test]
async fn list_returns_all_books_with_total() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/books").await;
    let body = body.expect("List has a body");

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["total"], json!(2));
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["data"][0]["title"], json!("The Great Gatsby"));
    assert_eq!(body["data"][1]["title"], json!("1984"));
}

#[tokio::test]
async fn list_of_empty_table_is_ok() {
    let app = TestApp::new().await;

    assert_eq!(app.delete("/api/books/1").await.0, StatusCode::NO_CONTENT);
    assert_eq!(app.delete("/api/books/2").await.0, StatusCode::NO_CONTENT);

    let (status, body) = app.get("/api/books").await;
    let body = body.expect("List has a body");

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], json!(0));
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn get_returns_the_book() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/books/1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        Some(json!({
            "success": true,
            "data": {
                "id": 1,
                "title": "The Great Gatsby",
                "author": "F. Scott Fitzgerald",
                "year": 1925
            }
        }))
    );
}

#[tokio::test]
async fn get_unknown_book_is_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/books/999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        Some(json!({ "success": false, "error": "Book not found" }))
    );
}

#[tokio::test]
async fn create_assigns_id_and_persists() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post_json(
            "/api/books",
            json!({ "title": "Brave New World", "author": "Aldous Huxley", "year": 1932 }),
        )
        .await;
    let body = body.expect("Create has a body");

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["id"], json!(3));
    assert_eq!(body["data"]["title"], json!("Brave New World"));

    let (_, fetched) = app.get("/api/books/3").await;
    let fetched = fetched.expect("Get has a body");

    assert_eq!(fetched["data"], body["data"]);

    let (_, list) = app.get("/api/books").await;

    assert_eq!(list.expect("List has a body")["total"], json!(3));
}

#[tokio::test]
async fn create_names_first_missing_field() {
    let app = TestApp::new().await;

    let cases = [
        (json!({}), "title"),
        (json!({ "year": 1900 }), "title"),
        (json!({ "title": "Incomplete Book" }), "author"),
        (json!({ "title": "Incomplete Book", "year": 1900 }), "author"),
        (json!({ "title": "Incomplete Book", "author": "Someone" }), "year"),
        (
            json!({ "title": "Incomplete Book", "author": "Someone", "year": null }),
            "year",
        ),
    ];

    for (payload, field) in cases {
        let (status, body) = app.post_json("/api/books", payload).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            Some(json!({
                "success": false,
                "error": format!("Missing required fields: {field}")
            }))
        );
    }

    assert_eq!(app.store.list().await.expect("List failed").len(), 2);
}

#[tokio::test]
async fn create_without_json_content_type_is_rejected() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/books")
        .header(CONTENT_TYPE, "text/plain")
        .body(Body::from(r#"{"title":"A","author":"B","year":1}"#))
        .expect("Invalid request");

    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        Some(json!({ "success": false, "error": "Content-type must be application/json" }))
    );
    assert_eq!(app.store.list().await.expect("List failed").len(), 2);
}

#[tokio::test]
async fn create_with_malformed_body_is_rejected() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/books")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .expect("Invalid request");

    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        Some(json!({ "success": false, "error": "Failed to parse request body" }))
    );

    let (status, _) = app
        .post_json(
            "/api/books",
            json!({ "title": "A", "author": "B", "year": "nineteen" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_with_empty_fields_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post_json("/api/books", json!({ "title": "", "author": "", "year": 2000 }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        Some(json!({ "success": false, "error": "Invalid fields: author, title" }))
    );
    assert_eq!(app.store.list().await.expect("List failed").len(), 2);
}

#[tokio::test]
async fn update_merges_provided_fields() {
    let app = TestApp::new().await;

    let (status, body) = app
        .put_json("/api/books/1", json!({ "title": "Updated Title" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        Some(json!({
            "success": true,
            "data": {
                "id": 1,
                "title": "Updated Title",
                "author": "F. Scott Fitzgerald",
                "year": 1925
            }
        }))
    );

    let (_, fetched) = app.get("/api/books/1").await;
    let fetched = fetched.expect("Get has a body");

    assert_eq!(fetched["data"], body.expect("Update has a body")["data"]);
}

#[tokio::test]
async fn update_replaces_all_fields() {
    let app = TestApp::new().await;

    let (status, body) = app
        .put_json(
            "/api/books/2",
            json!({ "title": "Animal Farm", "author": "Eric Blair", "year": 1945 }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body.expect("Update has a body")["data"],
        json!({ "id": 2, "title": "Animal Farm", "author": "Eric Blair", "year": 1945 })
    );
}

#[tokio::test]
async fn update_with_empty_body_keeps_book() {
    let app = TestApp::new().await;

    let before = app.store.get(2).await.expect("Get failed");
    let (status, _) = app.put_json("/api/books/2", json!({})).await;
    let after = app.store.get(2).await.expect("Get failed");

    assert_eq!(status, StatusCode::OK);
    assert_eq!(before, after);
}

#[tokio::test]
async fn update_unknown_book_is_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app
        .put_json("/api/books/999", json!({ "title": "Nonexistent" }))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        Some(json!({ "success": false, "error": "Book not found" }))
    );
    assert_eq!(app.store.get(999).await.expect("Get failed"), None);
}

#[tokio::test]
async fn update_without_json_content_type_is_rejected_before_lookup() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method(Method::PUT)
        .uri("/api/books/999")
        .body(Body::from(r#"{"title":"X"}"#))
        .expect("Invalid request");

    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        Some(json!({ "success": false, "error": "Content-type must be application/json" }))
    );
}

#[tokio::test]
async fn update_with_empty_title_keeps_book() {
    let app = TestApp::new().await;

    let before = app.store.get(1).await.expect("Get failed");
    let (status, body) = app.put_json("/api/books/1", json!({ "title": "" })).await;
    let after = app.store.get(1).await.expect("Get failed");

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        Some(json!({ "success": false, "error": "Invalid fields: title" }))
    );
    assert_eq!(before, after);
}

#[tokio::test]
async fn delete_removes_book() {
    let app = TestApp::new().await;

    let (status, body) = app.delete("/api/books/1").await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, None);

    let (status, _) = app.get("/api/books/1").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.store.list().await.expect("List failed").len(), 1);
}

#[tokio::test]
async fn delete_unknown_book_is_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app.delete("/api/books/999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        Some(json!({ "success": false, "error": "Book not found" }))
    );
    assert_eq!(app.store.list().await.expect("List failed").len(), 2);
}

#[tokio::test]
async fn deleting_twice_is_not_found() {
    let app = TestApp::new().await;

    assert_eq!(app.delete("/api/books/2").await.0, StatusCode::NO_CONTENT);
    assert_eq!(app.delete("/api/books/2").await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn library_walkthrough() {
    let app = TestApp::new().await;

    let (_, list) = app.get("/api/books").await;
    assert_eq!(list.expect("List has a body")["total"], json!(2));

    let (status, created) = app
        .post_json(
            "/api/books",
            json!({ "title": "Brave New World", "author": "Aldous Huxley", "year": 1932 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created.expect("Create has a body")["data"]["id"].is_i64());

    let (_, list) = app.get("/api/books").await;
    let list = list.expect("List has a body");
    assert_eq!(list["total"], json!(3));
    assert_eq!(list["data"].as_array().map(Vec::len), Some(3));

    let (status, _) = app
        .put_json("/api/books/1", json!({ "title": "Updated Title" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, fetched) = app.get("/api/books/1").await;
    let fetched = fetched.expect("Get has a body");
    assert_eq!(fetched["data"]["title"], json!("Updated Title"));
    assert_eq!(fetched["data"]["author"], json!("F. Scott Fitzgerald"));
    assert_eq!(fetched["data"]["year"], json!(1925));

    assert_eq!(app.delete("/api/books/1").await.0, StatusCode::NO_CONTENT);
    assert_eq!(app.get("/api/books/1").await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn body_tracing_keeps_responses_intact() {
    let (store, _dir) = test_store().await;
    let router = server::app(ApiState::new(ErrorVerbosity::Message, store), true);

    let (status, body) = send(
        &router,
        json_request(
            Method::POST,
            "/api/books",
            json!({ "title": "Dune", "author": "Frank Herbert", "year": 1965 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.expect("Create has a body")["data"]["id"], json!(1));

    let (status, body) = send(&router, empty_request(Method::DELETE, "/api/books/1")).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, None);
}
