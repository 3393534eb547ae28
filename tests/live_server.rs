//! Smoke test against a real listener.

use reqwest::redirect::Policy;
use reqwest::StatusCode;

use temploco::config::AppConfig;
use temploco::contacts::ContactStore;

mod common;

#[tokio::test]
async fn test_serves_over_tcp() {
    let (server, store) = common::contacts_server(AppConfig::default());
    let (addr, shutdown) = common::start_server(server).await;
    let client = reqwest::Client::builder()
        .redirect(Policy::none())
        .build()
        .unwrap();

    let res = client
        .get(format!("http://{}/", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    assert!(res.text().await.unwrap().contains("Browse contacts"));

    let res = client
        .post(format!("http://{}/contacts/new", addr))
        .form(&[
            ("first_name", "Grace"),
            ("last_name", "Hopper"),
            ("phone", "555"),
            ("email", "grace@example.com"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()["location"], "/contacts/");
    assert_eq!(store.list(Some("grace")).len(), 1);

    let _ = shutdown.send(());
}
