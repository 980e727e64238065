//! View rendering
//!
//! Handlers describe a page as a template name plus a JSON object and hand
//! it to a [`ViewRenderer`]. The signed-in user (or `null`) is added to every
//! view's data under `user` before rendering.
//!
//! [`ShellRenderer`] is the built-in renderer: it emits a minimal HTML
//! document that embeds the escaped view data, which is enough for tests
//! and for a client-side front end to hydrate from.

use axum::response::Html;
use daybook_shared::auth::context::AuthContext;
use serde_json::{Map, Value};

/// Templates the application renders
pub const TEMPLATES: &[&str] = &[
    "auth/login",
    "auth/signup",
    "dashboard",
    "plan",
    "focus",
    "tasks/index",
    "tasks/new",
    "tasks/edit",
    "search/index",
];

/// Errors produced while rendering a view
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Template name is not known to the renderer
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    /// View data could not be serialized
    #[error("Failed to serialize view data: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Turns a template name and its data into an HTML page
pub trait ViewRenderer: Send + Sync {
    fn render(&self, template: &str, data: &Value) -> Result<String, RenderError>;
}

/// Minimal HTML renderer embedding the view data as JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRenderer;

impl ViewRenderer for ShellRenderer {
    fn render(&self, template: &str, data: &Value) -> Result<String, RenderError> {
        if !TEMPLATES.contains(&template) {
            return Err(RenderError::UnknownTemplate(template.to_string()));
        }

        let json = serde_json::to_string_pretty(data)?;

        Ok(format!(
            "<!DOCTYPE html>\n\
             <html lang=\"en\">\n\
             <head><meta charset=\"utf-8\"><title>Daybook</title></head>\n\
             <body data-template=\"{template}\">\n\
             <pre id=\"view-data\">{data}</pre>\n\
             </body>\n\
             </html>\n",
            template = html_escape(template),
            data = html_escape(&json),
        ))
    }
}

/// Adds `user` to the view data and renders it
///
/// Non-object data is nested under `data` so the `user` key always exists.
pub fn render_view(
    renderer: &dyn ViewRenderer,
    template: &str,
    user: Option<&AuthContext>,
    data: Value,
) -> Result<Html<String>, RenderError> {
    let mut object = match data {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => Map::from_iter([("data".to_string(), other)]),
    };
    object.insert("user".to_string(), serde_json::to_value(user)?);

    let html = renderer.render(template, &Value::Object(object))?;
    Ok(Html(html))
}

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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
