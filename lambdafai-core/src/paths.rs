// Path templates: matching, substitution and conflict detection
//
// Templates are slash-delimited with `:name` placeholder segments, e.g. `/items/:id`.
// Segments are compared positionally, so empty segments are significant: `//x` is not `/x`.

use std::collections::HashMap;

/// Placeholder bindings extracted from a concrete path.
pub type Params = HashMap<String, String>;

const PLACEHOLDER_MARKER: char = ':';

/// Split a path into its segments, dropping the leading empty segment.
///
/// `""` has no segments, `"/"` has a single empty segment.
pub fn split(path: &str) -> Vec<&str> {
    path.split('/').skip(1).collect()
}

/// Join segments back into a path. Inverse of [`split`] for rooted paths.
pub fn join<S: AsRef<str>>(segments: &[S]) -> String {
    let mut path = String::from("/");
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            path.push('/');
        }
        path.push_str(segment.as_ref());
    }
    path
}

/// Returns the placeholder name if the segment is a placeholder.
///
/// A bare `:` is a literal segment.
pub fn placeholder_name(segment: &str) -> Option<&str> {
    if segment.len() > 1 {
        segment.strip_prefix(PLACEHOLDER_MARKER)
    } else {
        None
    }
}

/// Placeholder names of a template, in order of appearance.
pub fn placeholders(template: &str) -> Vec<&str> {
    split(template)
        .into_iter()
        .filter_map(placeholder_name)
        .collect()
}

/// Match a route template against a concrete path.
///
/// Returns the placeholder bindings (possibly empty) on success, `None` otherwise.
pub fn match_path(template: &str, path: &str) -> Option<Params> {
    let template_parts = split(template);
    let path_parts = split(path);

    if template_parts.len() != path_parts.len() {
        return None;
    }

    let mut params = Params::new();

    for (template_part, path_part) in template_parts.iter().zip(path_parts.iter()) {
        if let Some(name) = placeholder_name(template_part) {
            params.insert(name.to_string(), path_part.to_string());
        } else if template_part != path_part {
            return None;
        }
    }

    Some(params)
}

/// Replace each bound placeholder segment of `template` with its value.
///
/// Placeholders without a binding are left untouched.
pub fn substitute(template: &str, params: &Params) -> String {
    let parts: Vec<&str> = split(template)
        .into_iter()
        .map(|part| match placeholder_name(part).and_then(|name| params.get(name)) {
            Some(value) => value.as_str(),
            None => part,
        })
        .collect();
    join(&parts)
}

/// Whether two templates could both match some concrete path.
///
/// Symmetric: segment counts must agree and every position must hold either a placeholder on
/// one side or the same literal on both.
pub fn conflicts(a: &str, b: &str) -> bool {
    let a_parts = split(a);
    let b_parts = split(b);

    if a_parts.len() != b_parts.len() {
        return false;
    }

    a_parts.iter().zip(b_parts.iter()).all(|(x, y)| {
        placeholder_name(x).is_some() || placeholder_name(y).is_some() || x == y
    })
}

/// Convert API Gateway `{name}` segments into `:name` placeholders.
pub fn gateway_to_template(path: &str) -> String {
    path.split('/')
        .map(|part| {
            if part.len() > 2 && part.starts_with('{') && part.ends_with('}') {
                format!("{}{}", PLACEHOLDER_MARKER, &part[1..part.len() - 1])
            } else {
                part.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Convert `:name` placeholders into API Gateway `{name}` segments.
pub fn template_to_gateway(template: &str) -> String {
    template
        .split('/')
        .map(|part| match placeholder_name(part) {
            Some(name) => format!("{{{}}}", name),
            None => part.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}
