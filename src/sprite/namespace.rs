//! Namespace prefix stripping.
//!
//! Inline SVG lives inside an HTML document that declares no namespace
//! aliases, so every tag in a symbol must be a bare local name.

use super::tree::Element;

/// Return the part of a tag name after its first namespace delimiter.
///
/// Handles both qualified names (`svg:path`) and Clark notation
/// (`{http://www.w3.org/2000/svg}path`). Names without a delimiter are
/// returned unchanged.
pub fn local_name(name: &str) -> &str {
    let split = match (name.find('}'), name.find(':')) {
        (Some(brace), _) if name.starts_with('{') => Some(brace),
        (_, colon) => colon,
    };
    match split {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

/// Strip namespace prefixes from every tag in the subtree, root included.
///
/// Attribute names and text content are left alone.
pub fn strip_namespaces(root: &mut Element) {
    root.walk_mut(&mut |elem| {
        let local = local_name(&elem.name);
        if local.len() != elem.name.len() {
            elem.name = local.to_string();
        }
    });
}
