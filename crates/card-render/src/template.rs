//! Placeholder interpolation.
//!
//! Templates reference variables as `{{ name }}` or `{{ query.name }}`.
//! Values are escaped before substitution so they can never inject markup.

use card_vars::VariableSet;
use quick_xml::escape::escape;

use crate::error::RenderError;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
/// Scope object exposing the variables to the template.
const SCOPE_PREFIX: &str = "query.";

/// Substitute every placeholder with its escaped variable value.
///
/// Unknown names render as the empty string.
pub fn interpolate(template: &str, vars: &VariableSet) -> Result<String, RenderError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut consumed = 0;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let offset = consumed + start;
        let inner_start = start + OPEN.len();
        let Some(len) = rest[inner_start..].find(CLOSE) else {
            return Err(RenderError::template(offset, "unterminated placeholder"));
        };

        let name = placeholder_name(&rest[inner_start..inner_start + len], offset)?;
        match vars.get(name) {
            Some(value) => out.push_str(&escape(value)),
            None => tracing::debug!(name, "Unknown template variable"),
        }

        let end = inner_start + len + CLOSE.len();
        consumed += end;
        rest = &rest[end..];
    }

    out.push_str(rest);
    Ok(out)
}

fn placeholder_name(inner: &str, offset: usize) -> Result<&str, RenderError> {
    let expr = inner.trim();
    if expr.is_empty() {
        return Err(RenderError::template(offset, "empty placeholder"));
    }
    let name = expr.strip_prefix(SCOPE_PREFIX).unwrap_or(expr);
    if !is_valid_name(name) {
        return Err(RenderError::template(
            offset,
            format!("invalid variable name '{expr}'"),
        ));
    }
    Ok(name)
}

/// `[A-Za-z_][A-Za-z0-9_-]*`
fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
