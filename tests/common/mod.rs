//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use temploco::config::AppConfig;
use temploco::contacts::{self, ContactFields, ContactStore, MemoryContactStore};
use temploco::http::HttpServer;

/// Build the contacts server over a fresh in-memory store.
pub fn contacts_server(config: AppConfig) -> (HttpServer, Arc<MemoryContactStore>) {
    let store = Arc::new(MemoryContactStore::new());
    let table = contacts::application(&config.routing, store.clone()).unwrap();
    (HttpServer::new(config, Arc::new(table)), store)
}

/// Add a contact directly through the store.
#[allow(dead_code)]
pub fn seed(store: &MemoryContactStore, first: &str, last: &str) -> u64 {
    store
        .create(ContactFields {
            first: first.into(),
            last: last.into(),
            phone: "555-0100".into(),
            email: format!("{}@example.com", first.to_lowercase()),
        })
        .id
}

#[allow(dead_code)]
pub fn get(path: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

#[allow(dead_code)]
pub fn post_form(path: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

#[allow(dead_code)]
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Serve on an ephemeral port. Dropping the returned sender stops the server.
#[allow(dead_code)]
pub async fn start_server(server: HttpServer) -> (SocketAddr, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown = async {
            let _ = rx.await;
        };
        server.run_until(listener, shutdown).await.unwrap();
    });

    (addr, tx)
}
