//! Contact route handlers.
//!
//! # Responsibilities
//! - Render the site layout around every contacts page
//! - List, show, create, edit and delete contacts
//! - Redirect after successful form posts
//!
//! # Design Decisions
//! - Pages are returned as deferred responses; redirects bypass layouts
//! - URLs are built by route name through the request's route table
//! - Store and template errors propagate unchanged to the transport

use std::sync::Arc;

use axum::http::Method;
use serde_json::{json, Value};
use thiserror::Error;

use crate::contacts::store::{Contact, ContactFields, ContactStore};
use crate::contacts::templates::TemplateRenderer;
use crate::layout::{DeferredResponse, LayoutFragment, RawResponse};
use crate::routing::{HandlerError, HandlerResult, LeafResult, PathParams, RequestContext};

/// Invalid form submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("missing form field `{0}`")]
    MissingField(&'static str),
}

pub struct ContactViews {
    store: Arc<dyn ContactStore>,
    templates: Arc<dyn TemplateRenderer>,
    outlet: String,
}

impl ContactViews {
    pub fn new(
        store: Arc<dyn ContactStore>,
        templates: Arc<dyn TemplateRenderer>,
        outlet: impl Into<String>,
    ) -> Self {
        Self {
            store,
            templates,
            outlet: outlet.into(),
        }
    }

    fn page(&self, template: &str, context: Value) -> HandlerResult<LeafResult> {
        let html = self.templates.render(template, &context)?;
        Ok(DeferredResponse::new(html).into())
    }

    pub fn layout(&self, ctx: &RequestContext, _params: &PathParams) -> HandlerResult<LayoutFragment> {
        let html = self.templates.render(
            "layout",
            &json!({
                "outlet": self.outlet,
                "title": "Contacts",
                "home_url": ctx.reverse("index", no_params())?,
                "contacts_url": ctx.reverse("contacts", no_params())?,
            }),
        )?;
        Ok(LayoutFragment::from_outlet(&html, &self.outlet)?)
    }

    pub fn index(&self, ctx: &RequestContext, _params: &PathParams) -> HandlerResult<LeafResult> {
        if ctx.method != Method::GET {
            return Ok(RawResponse::method_not_allowed("GET").into());
        }
        self.page(
            "index",
            json!({ "contacts_url": ctx.reverse("contacts", no_params())? }),
        )
    }

    pub fn list(&self, ctx: &RequestContext, _params: &PathParams) -> HandlerResult<LeafResult> {
        if ctx.method != Method::GET {
            return Ok(RawResponse::method_not_allowed("GET").into());
        }
        let query = ctx.query_param("q");
        let contacts = self
            .store
            .list(query)
            .iter()
            .map(|contact| contact_json(ctx, contact))
            .collect::<Result<Vec<_>, _>>()?;

        self.page(
            "contacts/index",
            json!({
                "q": query.unwrap_or_default(),
                "new_url": ctx.reverse("contacts-new", no_params())?,
                "contacts": contacts,
            }),
        )
    }

    pub fn new_contact(&self, ctx: &RequestContext, _params: &PathParams) -> HandlerResult<LeafResult> {
        match ctx.method {
            Method::GET => self.page(
                "contacts/new",
                json!({
                    "action": ctx.reverse("contacts-new", no_params())?,
                    "contact": ContactFields::default(),
                }),
            ),
            Method::POST => {
                let contact = self.store.create(fields_from_form(ctx)?);
                tracing::info!(contact_id = contact.id, "Contact added");
                redirect(&ctx.reverse("contacts", no_params())?)
            }
            _ => Ok(RawResponse::method_not_allowed("GET, POST").into()),
        }
    }

    pub fn detail(&self, ctx: &RequestContext, params: &PathParams) -> HandlerResult<LeafResult> {
        if ctx.method != Method::GET {
            return Ok(RawResponse::method_not_allowed("GET").into());
        }
        let id = contact_id(params)?;
        let contact = self.store.get(id)?;
        self.page(
            "contacts/show",
            json!({
                "contact": contact,
                "edit_url": ctx.reverse("contacts-edit", [("id", id)])?,
                "delete_url": ctx.reverse("contacts-delete", [("id", id)])?,
            }),
        )
    }

    pub fn edit(&self, ctx: &RequestContext, params: &PathParams) -> HandlerResult<LeafResult> {
        let id = contact_id(params)?;
        match ctx.method {
            Method::GET => {
                let contact = self.store.get(id)?;
                self.page(
                    "contacts/edit",
                    json!({
                        "action": ctx.reverse("contacts-edit", [("id", id)])?,
                        "contact": contact,
                    }),
                )
            }
            Method::POST => {
                let contact = self.store.update(id, fields_from_form(ctx)?)?;
                tracing::info!(contact_id = contact.id, "Contact updated");
                redirect(&ctx.reverse("contacts-detail", [("id", contact.id)])?)
            }
            _ => Ok(RawResponse::method_not_allowed("GET, POST").into()),
        }
    }

    pub fn delete(&self, ctx: &RequestContext, params: &PathParams) -> HandlerResult<LeafResult> {
        if ctx.method != Method::POST {
            return Ok(RawResponse::method_not_allowed("POST").into());
        }
        let id = contact_id(params)?;
        self.store.delete(id)?;
        tracing::info!(contact_id = id, "Contact removed");
        redirect(&ctx.reverse("contacts", no_params())?)
    }
}

fn no_params() -> [(&'static str, &'static str); 0] {
    []
}

fn redirect(location: &str) -> HandlerResult<LeafResult> {
    Ok(RawResponse::see_other(location)?.into())
}

fn contact_id(params: &PathParams) -> Result<u64, HandlerError> {
    params
        .get_int("id")
        .ok_or_else(|| "route is missing the `id` parameter".into())
}

fn contact_json(ctx: &RequestContext, contact: &Contact) -> HandlerResult<Value> {
    Ok(json!({
        "first": contact.first,
        "last": contact.last,
        "phone": contact.phone,
        "email": contact.email,
        "url": ctx.reverse("contacts-detail", [("id", contact.id)])?,
    }))
}

fn fields_from_form(ctx: &RequestContext) -> Result<ContactFields, FormError> {
    let field = |name: &'static str| {
        ctx.form_field(name)
            .map(str::to_string)
            .ok_or(FormError::MissingField(name))
    };
    Ok(ContactFields {
        first: field("first_name")?,
        last: field("last_name")?,
        phone: field("phone")?,
        email: field("email")?,
    })
}
