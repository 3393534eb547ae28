//! Contacts application.
//!
//! # Data Flow
//! ```text
//! routes() builds the route tree:
//!     ""  (layout: site shell)
//!     ├── ""                          index
//!     ├── "contacts/"                 contacts
//!     ├── "contacts/new"              contacts-new
//!     ├── "contacts/<int:id>/"        contacts-detail
//!     ├── "contacts/<int:id>/edit"    contacts-edit
//!     └── "contacts/<int:id>/delete"  contacts-delete
//!
//! Views → store.rs (records) + templates.rs (HTML)
//! ```

pub mod store;
pub mod templates;
pub mod views;

use std::sync::Arc;

use crate::config::RoutingConfig;
use crate::routing::{
    CompileError, CompileOptions, HandlerResult, LeafResult, PathParams, RequestContext,
    RouteCompiler, RouteNode, RouterTable,
};

pub use store::{Contact, ContactFields, ContactStore, MemoryContactStore, StoreError};
pub use templates::{BuiltinTemplates, TemplateError, TemplateRenderer};
pub use views::{ContactViews, FormError};

type ViewMethod = fn(&ContactViews, &RequestContext, &PathParams) -> HandlerResult<LeafResult>;

fn bind(
    views: &Arc<ContactViews>,
    method: ViewMethod,
) -> impl Fn(&RequestContext, &PathParams) -> HandlerResult<LeafResult> + Send + Sync + 'static {
    let views = Arc::clone(views);
    move |ctx, params| method(&views, ctx, params)
}

/// The contacts route tree.
pub fn routes(views: Arc<ContactViews>) -> RouteNode {
    let shell = Arc::clone(&views);
    RouteNode::root()
        .layout(move |ctx, params| shell.layout(ctx, params))
        .children([
            RouteNode::new("")
                .name("index")
                .view(bind(&views, ContactViews::index)),
            RouteNode::new("contacts/")
                .name("contacts")
                .view(bind(&views, ContactViews::list)),
            RouteNode::new("contacts/new")
                .name("contacts-new")
                .view(bind(&views, ContactViews::new_contact)),
            RouteNode::new("contacts/<int:id>/")
                .name("contacts-detail")
                .view(bind(&views, ContactViews::detail)),
            RouteNode::new("contacts/<int:id>/edit")
                .name("contacts-edit")
                .view(bind(&views, ContactViews::edit)),
            RouteNode::new("contacts/<int:id>/delete")
                .name("contacts-delete")
                .view(bind(&views, ContactViews::delete)),
        ])
}

/// Compile the contacts app against `store` using the routing settings.
pub fn application(
    config: &RoutingConfig,
    store: Arc<dyn ContactStore>,
) -> Result<RouterTable, CompileError> {
    let views = Arc::new(ContactViews::new(
        store,
        Arc::new(BuiltinTemplates),
        config.outlet_marker.clone(),
    ));
    RouteCompiler::new(CompileOptions {
        layout_scope: config.layout_scope,
    })
    .compile(&routes(views))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::http::{header, Method, StatusCode};

    use super::*;
    use crate::routing::ResolveError;

    fn table() -> (Arc<RouterTable>, Arc<MemoryContactStore>) {
        let store = Arc::new(MemoryContactStore::new());
        let table = application(&RoutingConfig::default(), store.clone()).unwrap();
        (Arc::new(table), store)
    }

    fn request(table: &Arc<RouterTable>, method: Method, path: &str) -> RequestContext {
        RequestContext::new(method, path).with_router(Arc::clone(table))
    }

    fn fields(first: &str) -> ContactFields {
        ContactFields {
            first: first.into(),
            last: "Example".into(),
            phone: "555".into(),
            email: "x@example.com".into(),
        }
    }

    #[test]
    fn test_route_names() {
        let (table, _) = table();
        assert_eq!(table.len(), 6);
        assert_eq!(table.reverse("index", std::iter::empty::<(&str, &str)>()).unwrap(), "/");
        assert_eq!(
            table.reverse("contacts-edit", [("id", 3)]).unwrap(),
            "/contacts/3/edit"
        );
    }

    #[test]
    fn test_pages_are_wrapped_in_layout() {
        let (table, store) = table();
        let contact = store.create(fields("Ada"));

        for path in ["/", "/contacts/", "/contacts/new", "/contacts/1/", "/contacts/1/edit"] {
            let response = table
                .dispatch(&request(&table, Method::GET, path))
                .unwrap()
                .response;
            assert_eq!(response.status(), StatusCode::OK, "{path}");
            assert!(response.body().starts_with("<!DOCTYPE html>"), "{path}");
            assert!(response.body().contains("<main>"), "{path}");
        }

        let detail = table
            .dispatch(&request(&table, Method::GET, "/contacts/1/"))
            .unwrap()
            .response;
        assert!(detail.body().contains(&contact.first));
        assert!(detail.body().contains("action=\"/contacts/1/delete\""));
    }

    #[test]
    fn test_search_filters_list() {
        let (table, store) = table();
        store.create(fields("Ada"));
        store.create(fields("Grace"));

        let query = HashMap::from([("q".to_string(), "gra".to_string())]);
        let ctx = request(&table, Method::GET, "/contacts/").with_query(query);
        let body = table.dispatch(&ctx).unwrap().response.body().to_string();
        assert!(body.contains("Grace"));
        assert!(!body.contains("Ada"));
    }

    #[test]
    fn test_create_redirects_without_layout() {
        let (table, store) = table();
        let form = HashMap::from([
            ("first_name".to_string(), "Ada".to_string()),
            ("last_name".to_string(), "Lovelace".to_string()),
            ("phone".to_string(), "555".to_string()),
            ("email".to_string(), "ada@example.com".to_string()),
        ]);
        let ctx = request(&table, Method::POST, "/contacts/new").with_form(form);
        let response = table.dispatch(&ctx).unwrap().response;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/contacts/");
        assert!(response.body().is_empty());
        assert_eq!(store.list(None).len(), 1);
    }

    #[test]
    fn test_missing_contact_is_store_error() {
        let (table, _) = table();
        let err = table
            .dispatch(&request(&table, Method::GET, "/contacts/9/"))
            .unwrap_err();
        match err {
            ResolveError::Handler { route, source } => {
                assert_eq!(route, "contacts-detail");
                assert_eq!(
                    source.downcast_ref::<StoreError>(),
                    Some(&StoreError::NotFound(9))
                );
            }
            other => panic!("expected handler error, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_method() {
        let (table, _) = table();
        let response = table
            .dispatch(&request(&table, Method::GET, "/contacts/1/delete"))
            .unwrap()
            .response;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "POST");
    }
}
