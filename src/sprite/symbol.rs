//! Icon to `<symbol>` conversion.

use super::namespace::strip_namespaces;
use super::tree::{Element, Node};

/// Presentation attributes copied from an icon's root onto its paths.
pub const INHERITED_ATTRS: &[&str] = &[
    "stroke",
    "fill",
    "color",
    "stroke-width",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-miterlimit",
];

/// Bound to `xlink:` when an icon uses the prefix without declaring it.
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

/// The icon root has no usable `viewBox` (absent, empty or blank), so the
/// symbol cannot be scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingViewBox;

/// Turn a parsed icon into a `<symbol>` with the given id.
///
/// Only `id` and `viewBox` end up on the symbol. Allow-listed presentation
/// attributes of the root are pushed down onto `path` children that do not
/// set them already; every other root attribute is dropped.
///
/// Prefixed attributes kept in the symbol (`xlink:href`) still need their
/// prefix bound, so the root's declarations for the prefixes in use move onto
/// the symbol's [`Element::namespaces`].
pub fn icon_to_symbol(icon: Element, id: &str) -> Result<Element, MissingViewBox> {
    let view_box = icon
        .attr("viewBox")
        .filter(|v| !v.trim().is_empty())
        .ok_or(MissingViewBox)?
        .to_string();

    let inherited: Vec<(&str, String)> = INHERITED_ATTRS
        .iter()
        .filter_map(|&key| icon.attr(key).map(|value| (key, value.to_string())))
        .collect();

    let mut symbol = Element::new("symbol")
        .with_attr("id", id)
        .with_attr("viewBox", view_box);

    let Element {
        namespaces, children, ..
    } = icon;
    for mut child in children {
        if let Node::Element(elem) = &mut child
            && elem.name.ends_with("path")
        {
            for (key, value) in &inherited {
                if !elem.has_attr(key) {
                    elem.set_attr(*key, value.clone());
                }
            }
        }
        symbol.push(child);
    }

    strip_namespaces(&mut symbol);
    declare_used_prefixes(&mut symbol, &namespaces);
    Ok(symbol)
}

fn declare_used_prefixes(symbol: &mut Element, declared: &[(String, String)]) {
    let mut used = Vec::new();
    collect_attr_prefixes(symbol, &mut used);

    for prefix in used {
        let uri = declared
            .iter()
            .find(|(p, _)| *p == prefix)
            .map(|(_, uri)| uri.as_str())
            .or_else(|| (prefix == "xlink").then_some(XLINK_NAMESPACE));
        if let Some(uri) = uri {
            symbol.declare_namespace(prefix, uri);
        }
    }
}

/// Attribute prefixes in document order, without duplicates. `xml:` is
/// bound implicitly and never collected.
fn collect_attr_prefixes(elem: &Element, used: &mut Vec<String>) {
    for (key, _) in &elem.attrs {
        if let Some((prefix, _)) = key.split_once(':')
            && prefix != "xml"
            && !used.iter().any(|p| p == prefix)
        {
            used.push(prefix.to_string());
        }
    }
    for child in elem.child_elements() {
        collect_attr_prefixes(child, used);
    }
}
