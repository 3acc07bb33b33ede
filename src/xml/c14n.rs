use std::collections::BTreeMap;

use super::element::{Element, NamespaceBindings};

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Perform XML Canonicalization (C14N 1.0, no comments, non-exclusive) over
/// an element subtree.
///
/// `ambient` carries the namespace bindings visible at the root in addition
/// to the elements' own namespaces. The remote verifier recomputes the same
/// ambient set, so both canonicalization calls of a signing round must be
/// given identical bindings. Each call builds its own rendering state.
pub fn canonicalize(root: &Element, ambient: &NamespaceBindings) -> String {
    let mut scope = BTreeMap::new();
    for (prefix, uri) in ambient.iter() {
        scope.insert(prefix.to_string(), uri.to_string());
    }

    let mut out = String::new();
    write_element(&mut out, root, &scope, &BTreeMap::new());
    out
}

fn write_element(
    out: &mut String,
    element: &Element,
    parent_scope: &BTreeMap<String, String>,
    rendered: &BTreeMap<String, String>,
) {
    let mut scope = parent_scope.clone();
    if let Some(uri) = element.namespace() {
        scope.insert(String::new(), uri.to_string());
    }

    out.push('<');
    out.push_str(element.tag());

    // Declarations in scope and not rendered with the same URI by an ancestor.
    // BTreeMap iteration puts the default declaration (empty prefix) first,
    // then prefixes in ascending order.
    let mut now_rendered = rendered.clone();
    for (prefix, uri) in &scope {
        if rendered.get(prefix) == Some(uri) {
            continue;
        }
        if prefix.is_empty() {
            out.push_str(" xmlns=\"");
        } else {
            out.push_str(" xmlns:");
            out.push_str(prefix);
            out.push_str("=\"");
        }
        out.push_str(&escape_attr_value(uri));
        out.push('"');
        now_rendered.insert(prefix.clone(), uri.clone());
    }

    // Attributes ordered by (namespace URI, local name), never by insertion
    // order. Unprefixed attributes carry no namespace and sort first.
    let mut attributes: Vec<(String, String, &str, &str)> = element
        .attributes()
        .map(|(name, value)| {
            let (ns_uri, local) = match name.split_once(':') {
                Some(("xml", local)) => (XML_NAMESPACE.to_string(), local.to_string()),
                Some((prefix, local)) => (
                    scope.get(prefix).cloned().unwrap_or_default(),
                    local.to_string(),
                ),
                None => (String::new(), name.to_string()),
            };
            (ns_uri, local, name, value)
        })
        .collect();
    attributes.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    for (_, _, name, value) in &attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attr_value(value));
        out.push('"');
    }

    out.push('>');

    if element.children().is_empty() {
        if let Some(text) = element.text() {
            out.push_str(&escape_text_value(text));
        }
    } else {
        for child in element.children() {
            write_element(out, child, &scope, &now_rendered);
        }
    }

    out.push_str("</");
    out.push_str(element.tag());
    out.push('>');
}

/// Escape attribute value per C14N rules.
fn escape_attr_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + value.len() / 4);
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape text node value per C14N rules.
fn escape_text_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + value.len() / 4);
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#xD;"),
            _ => out.push(ch),
        }
    }
    out
}
