//! Path templates to route regexes.
//!
//! `/areas/{area_id}/trails/{trail_id}` with a string `area_id` and a numeric
//! `trail_id` becomes `/areas/\w+/trails/\d+$`.

use regex::Regex;
use tracing::debug;

use crate::domain::{MockError, MockResult, Parameter};

pub const WORD_SEGMENT: &str = r"\w+";
pub const DIGIT_SEGMENT: &str = r"\d+";

pub fn segment_pattern(param_type: Option<&str>) -> &'static str {
    match param_type {
        Some("number") | Some("integer") => DIGIT_SEGMENT,
        _ => WORD_SEGMENT,
    }
}

/// Replace every `{name}` slot with the segment regex for its declared type
/// and anchor the result at the end.
pub fn regexify_url(path: &str, parameters: &[Parameter]) -> String {
    let mut pattern = path.to_string();
    for parameter in parameters.iter().filter(|p| p.is_path()) {
        let slot = format!("{{{}}}", parameter.name);
        pattern = pattern.replace(&slot, segment_pattern(parameter.param_type.as_deref()));
    }

    let mut anchored = replace_undeclared_slots(&pattern);
    anchored.push('$');
    anchored
}

fn replace_undeclared_slots(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        debug!(slot = &rest[open..open + close + 1], "Path slot has no declared parameter");
        out.push_str(&rest[..open]);
        out.push_str(WORD_SEGMENT);
        rest = &rest[open + close + 1..];
    }

    out.push_str(rest);
    out
}

/// Prefix a route pattern with the document base path without doubling `/`.
pub fn join_base_path(base_path: &str, pattern: &str) -> String {
    let base = base_path.trim_end_matches('/');
    if pattern.starts_with('/') {
        format!("{}{}", base, pattern)
    } else {
        format!("{}/{}", base, pattern)
    }
}

/// Check that a generated pattern is a valid regex.
pub fn compile_route_pattern(pattern: &str) -> MockResult<Regex> {
    Regex::new(pattern).map_err(|source| MockError::InvalidRoutePattern {
        pattern: pattern.to_string(),
        source,
    })
}
