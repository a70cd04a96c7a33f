//! Embedded template rendering
//!
//! Templates ship inside the binary and carry `%NAME%` placeholders that get
//! substituted at render time. Anything fancier is a collaborator concern.

use rust_embed::RustEmbed;

use crate::errors::{FeedbackerError, Result};

#[derive(RustEmbed)]
#[folder = "templates/"]
struct Templates;

/// Render an embedded template, replacing each `%KEY%` with its value.
pub fn render_template(name: &str, vars: &[(&str, String)]) -> Result<String> {
    let file = Templates::get(name)
        .ok_or_else(|| FeedbackerError::template(format!("template not found: {}", name)))?;

    let mut body = String::from_utf8_lossy(file.data.as_ref()).into_owned();
    for (key, value) in vars {
        body = body.replace(&format!("%{}%", key), value);
    }
    Ok(body)
}

/// Escape user-supplied text for inclusion in HTML.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
