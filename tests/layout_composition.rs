//! Route trees built through the public API and served over HTTP.

use std::sync::Arc;

use axum::http::{header, HeaderValue, StatusCode};
use tower::ServiceExt;

use temploco::config::AppConfig;
use temploco::http::HttpServer;
use temploco::layout::{DeferredResponse, LayoutFragment, RawResponse};
use temploco::routing::{
    CompileError, CompileOptions, LayoutScope, LeafResult, ReverseError, RouteCompiler, RouteNode,
    RouterTable,
};

mod common;

fn shop() -> RouteNode {
    RouteNode::root()
        .layout(|_, _| Ok(LayoutFragment::new("<A>", "</A>")))
        .children([
            RouteNode::new("x").view(|_, _| Ok(LeafResult::content("x"))),
            RouteNode::new("p/")
                .layout(|_, params| {
                    Ok(LayoutFragment::new(
                        format!("<B params={}>", params.len()),
                        "</B>",
                    ))
                })
                .children([
                    RouteNode::new("<int:id>/")
                        .name("item")
                        .view(|_, params| {
                            let id = params.get_int("id").ok_or("missing id")?;
                            Ok(DeferredResponse::new(format!("id={id}"))
                                .with_status(StatusCode::CREATED)
                                .with_header(header::CACHE_CONTROL, HeaderValue::from_static("no-store"))
                                .into())
                        }),
                    RouteNode::new("gone").view(|_, _| {
                        Ok(RawResponse::new(StatusCode::GONE, "bare").into())
                    }),
                ]),
        ])
}

fn serve(table: RouterTable) -> HttpServer {
    HttpServer::new(AppConfig::default(), Arc::new(table))
}

#[tokio::test]
async fn test_nested_layouts_wrap_outermost_first() {
    let table = RouteCompiler::default().compile(&shop()).unwrap();
    let app = serve(table).router();

    let response = app.clone().oneshot(common::get("/x")).await.unwrap();
    assert_eq!(common::body_string(response).await, "<A>x</A>");

    let response = app.clone().oneshot(common::get("/p/7/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    assert_eq!(
        common::body_string(response).await,
        "<A><B params=0>id=7</B></A>"
    );

    let response = app.oneshot(common::get("/p/gone")).await.unwrap();
    assert_eq!(response.status(), StatusCode::GONE);
    assert_eq!(common::body_string(response).await, "bare");
}

#[tokio::test]
async fn test_full_scope_shows_all_params_to_layouts() {
    let table = RouteCompiler::new(CompileOptions {
        layout_scope: LayoutScope::Full,
    })
    .compile(&shop())
    .unwrap();

    let response = serve(table)
        .router()
        .oneshot(common::get("/p/7/"))
        .await
        .unwrap();
    assert_eq!(
        common::body_string(response).await,
        "<A><B params=1>id=7</B></A>"
    );
}

#[test]
fn test_reverse_named_route() {
    let table = RouteCompiler::default().compile(&shop()).unwrap();
    assert_eq!(table.reverse("item", [("id", 42)]).unwrap(), "/p/42/");
    assert_eq!(
        table.reverse("item", std::iter::empty::<(&str, u64)>()),
        Err(ReverseError::MissingParameter {
            route: "item".into(),
            name: "id".into()
        })
    );
}

#[test]
fn test_malformed_trees_fail_to_compile() {
    let ambiguous = RouteNode::root().child(
        RouteNode::new("a/")
            .view(|_, _| Ok(LeafResult::content("a")))
            .child(RouteNode::new("b").view(|_, _| Ok(LeafResult::content("b")))),
    );
    assert!(matches!(
        RouteCompiler::default().compile(&ambiguous),
        Err(CompileError::AmbiguousRoute { .. })
    ));

    let duplicate = RouteNode::root().children([
        RouteNode::new("a").name("same").view(|_, _| Ok(LeafResult::content("a"))),
        RouteNode::new("b").name("same").view(|_, _| Ok(LeafResult::content("b"))),
    ]);
    assert_eq!(
        RouteCompiler::default().compile(&duplicate).unwrap_err(),
        CompileError::DuplicateRouteName {
            name: "same".into()
        }
    );
}
