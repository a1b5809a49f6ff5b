use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::{
    book::NewBook,
    error::ErrorVerbosity,
    server::{app, ServerConfig},
    state::ApiState,
    store::{BookStore, DatabaseConfig},
};

mod books;

#[tokio::test]
async fn example_config_is_valid() {
    ServerConfig::from_config_file("config.example.yaml")
        .await
        .expect("Example config is not parsable");
}

/// A router over a fresh database seeded with two books (ids 1 and 2).
struct TestApp {
    router: Router,
    store: BookStore,
    _dir: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        Self::with_verbosity(ErrorVerbosity::Message).await
    }

    async fn with_verbosity(verbosity: ErrorVerbosity) -> Self {
        let (store, dir) = test_store().await;

        for (title, author, year) in [
            ("The Great Gatsby", "F. Scott Fitzgerald", 1925),
            ("1984", "George Orwell", 1949),
        ] {
            store
                .create(&NewBook {
                    title: title.to_string(),
                    author: author.to_string(),
                    year,
                })
                .await
                .expect("Failed to seed book");
        }

        let router = app(ApiState::new(verbosity, store.clone()), false);

        Self {
            router,
            store,
            _dir: dir,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Option<Value>) {
        send(&self.router, request).await
    }

    async fn get(&self, uri: &str) -> (StatusCode, Option<Value>) {
        self.send(empty_request(Method::GET, uri)).await
    }

    async fn delete(&self, uri: &str) -> (StatusCode, Option<Value>) {
        self.send(empty_request(Method::DELETE, uri)).await
    }

    async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Option<Value>) {
        self.send(json_request(Method::POST, uri, body)).await
    }

    async fn put_json(&self, uri: &str, body: Value) -> (StatusCode, Option<Value>) {
        self.send(json_request(Method::PUT, uri, body)).await
    }
}

async fn test_store() -> (BookStore, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = BookStore::new(&DatabaseConfig::new(dir.path().join("books.db")));

    store
        .ensure_schema()
        .await
        .expect("Failed to create schema");

    (store, dir)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Option<Value>) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("Router is infallible");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();

    let body = (!bytes.is_empty())
        .then(|| serde_json::from_slice::<Value>(&bytes).expect("Body is not JSON"));

    (status, body)
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("Invalid request")
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("Invalid request")
}
