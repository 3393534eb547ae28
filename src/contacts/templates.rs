//! Template rendering for the contacts pages.
//!
//! The layout engine treats rendering as opaque: a template id and a JSON
//! context go in, a string comes out. `BuiltinTemplates` ships the handful of
//! pages the contacts app needs.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unknown template `{0}`")]
    UnknownTemplate(String),

    #[error("template `{template}` requires context field `{field}`")]
    MissingField {
        template: &'static str,
        field: &'static str,
    },
}

pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template_id: &str, context: &Value) -> Result<String, TemplateError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTemplates;

impl TemplateRenderer for BuiltinTemplates {
    fn render(&self, template_id: &str, context: &Value) -> Result<String, TemplateError> {
        match template_id {
            "layout" => layout(context),
            "index" => index(context),
            "contacts/index" => contact_list(context),
            "contacts/new" => contact_form("contacts/new", "New contact", context),
            "contacts/edit" => contact_form("contacts/edit", "Edit contact", context),
            "contacts/show" => contact_detail(context),
            other => Err(TemplateError::UnknownTemplate(other.to_string())),
        }
    }
}

fn field<'a>(
    context: &'a Value,
    template: &'static str,
    name: &'static str,
) -> Result<&'a str, TemplateError> {
    context
        .get(name)
        .and_then(Value::as_str)
        .ok_or(TemplateError::MissingField {
            template,
            field: name,
        })
}

fn optional<'a>(context: &'a Value, name: &str) -> &'a str {
    context.get(name).and_then(Value::as_str).unwrap_or_default()
}

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(context: &Value) -> Result<String, TemplateError> {
    // The outlet marker is markup and must not be escaped.
    let outlet = field(context, "layout", "outlet")?;
    let title = escape(field(context, "layout", "title")?);
    let home = escape(field(context, "layout", "home_url")?);
    let contacts = escape(field(context, "layout", "contacts_url")?);
    Ok(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body>\n<nav><a href=\"{home}\">Home</a> | <a href=\"{contacts}\">Contacts</a></nav>\n\
         <main>{outlet}</main>\n</body>\n</html>\n"
    ))
}

fn index(context: &Value) -> Result<String, TemplateError> {
    let contacts = escape(field(context, "index", "contacts_url")?);
    Ok(format!(
        "<h1>Welcome</h1>\n<p><a href=\"{contacts}\">Browse contacts</a></p>\n"
    ))
}

fn contact_list(context: &Value) -> Result<String, TemplateError> {
    const NAME: &str = "contacts/index";
    let query = escape(optional(context, "q"));
    let new_url = escape(field(context, NAME, "new_url")?);
    let rows = context
        .get("contacts")
        .and_then(Value::as_array)
        .ok_or(TemplateError::MissingField {
            template: NAME,
            field: "contacts",
        })?;

    let mut html = format!(
        "<h1>Contacts</h1>\n<form method=\"get\"><input type=\"search\" name=\"q\" value=\"{query}\">\
         <button>Search</button></form>\n<p><a href=\"{new_url}\">Add contact</a></p>\n"
    );
    if rows.is_empty() {
        html.push_str("<p>No contacts.</p>\n");
        return Ok(html);
    }

    html.push_str("<table>\n<tr><th>Name</th><th>Phone</th><th>Email</th></tr>\n");
    for row in rows {
        html.push_str(&format!(
            "<tr><td><a href=\"{}\">{} {}</a></td><td>{}</td><td>{}</td></tr>\n",
            escape(field(row, NAME, "url")?),
            escape(optional(row, "first")),
            escape(optional(row, "last")),
            escape(optional(row, "phone")),
            escape(optional(row, "email")),
        ));
    }
    html.push_str("</table>\n");
    Ok(html)
}

fn contact_form(
    template: &'static str,
    heading: &str,
    context: &Value,
) -> Result<String, TemplateError> {
    let action = escape(field(context, template, "action")?);
    let contact = context.get("contact").unwrap_or(&Value::Null);
    let input = |label: &str, name: &str, key: &str| {
        format!(
            "<p><label>{label} <input name=\"{name}\" value=\"{}\"></label></p>\n",
            escape(optional(contact, key))
        )
    };

    Ok(format!(
        "<h1>{heading}</h1>\n<form method=\"post\" action=\"{action}\">\n{}{}{}{}<button>Save</button>\n</form>\n",
        input("First name", "first_name", "first"),
        input("Last name", "last_name", "last"),
        input("Phone", "phone", "phone"),
        input("Email", "email", "email"),
    ))
}

fn contact_detail(context: &Value) -> Result<String, TemplateError> {
    const NAME: &str = "contacts/show";
    let contact = context.get("contact").ok_or(TemplateError::MissingField {
        template: NAME,
        field: "contact",
    })?;
    Ok(format!(
        "<h1>{} {}</h1>\n<p>Phone: {}</p>\n<p>Email: {}</p>\n\
         <p><a href=\"{}\">Edit</a></p>\n\
         <form method=\"post\" action=\"{}\"><button>Delete</button></form>\n",
        escape(optional(contact, "first")),
        escape(optional(contact, "last")),
        escape(optional(contact, "phone")),
        escape(optional(contact, "email")),
        escape(field(context, NAME, "edit_url")?),
        escape(field(context, NAME, "delete_url")?),
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::layout::{LayoutFragment, DEFAULT_OUTLET};

    #[test]
    fn test_layout_keeps_outlet_intact() {
        let html = BuiltinTemplates
            .render(
                "layout",
                &json!({
                    "outlet": DEFAULT_OUTLET,
                    "title": "Contacts & Co",
                    "home_url": "/",
                    "contacts_url": "/contacts/",
                }),
            )
            .unwrap();
        assert!(html.contains("<title>Contacts &amp; Co</title>"));

        let fragment = LayoutFragment::from_outlet(&html, DEFAULT_OUTLET).unwrap();
        assert!(fragment.pre().ends_with("<main>"));
        assert!(fragment.post().starts_with("</main>"));
    }

    #[test]
    fn test_list_escapes_values() {
        let html = BuiltinTemplates
            .render(
                "contacts/index",
                &json!({
                    "q": "\"><script>",
                    "new_url": "/contacts/new",
                    "contacts": [{
                        "first": "<b>Ada</b>",
                        "last": "Lovelace",
                        "phone": "",
                        "email": "ada@example.com",
                        "url": "/contacts/1/",
                    }],
                }),
            )
            .unwrap();
        assert!(html.contains("value=\"&quot;&gt;&lt;script&gt;\""));
        assert!(html.contains("&lt;b&gt;Ada&lt;/b&gt; Lovelace"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_empty_list() {
        let html = BuiltinTemplates
            .render(
                "contacts/index",
                &json!({ "new_url": "/contacts/new", "contacts": [] }),
            )
            .unwrap();
        assert!(html.contains("No contacts."));
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            BuiltinTemplates.render("missing", &json!({})),
            Err(TemplateError::UnknownTemplate("missing".into()))
        );
        assert_eq!(
            BuiltinTemplates.render("contacts/show", &json!({})),
            Err(TemplateError::MissingField {
                template: "contacts/show",
                field: "contact"
            })
        );
    }
}
