//! Constants and helpers shared by the XML reader and writer.

use std::borrow::Cow;

use quick_xml::name::{Namespace, ResolveResult};

/// XML Schema instance namespace, used for `xsi:nil`.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Prefix the writer binds to [`XSI_NAMESPACE`].
pub const XSI_PREFIX: &str = "xsi";

/// Attribute marking a null element.
pub const NIL_ATTRIBUTE: &str = "xsi:nil";

/// Member name for the text of an element that also carries attributes.
pub const TEXT_MEMBER: &str = "value";

/// Namespace declarations are not data.
pub fn is_namespace_declaration(key: &[u8]) -> bool {
    key == b"xmlns" || key.starts_with(b"xmlns:")
}

/// Whether a resolved attribute namespace is the schema-instance namespace
/// (`nil`, `type`, `schemaLocation`), whatever prefix it was bound to.
pub fn is_schema_instance(namespace: &ResolveResult<'_>) -> bool {
    matches!(namespace, ResolveResult::Bound(Namespace(uri)) if *uri == XSI_NAMESPACE.as_bytes())
}

pub fn is_nil_value(value: &str) -> bool {
    matches!(value.trim(), "true" | "1")
}

/// Resolves the name of a general entity reference (`amp`, `#60`, `#x3C`).
pub fn resolve_entity(name: &str) -> Option<Cow<'static, str>> {
    let resolved = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "apos" => "'",
        "quot" => "\"",
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse::<u32>().ok()?
            };
            return char::from_u32(code).map(|c| Cow::Owned(c.to_string()));
        }
    };
    Some(Cow::Borrowed(resolved))
}

pub fn is_whitespace(text: &str) -> bool {
    text.bytes().all(|b| matches!(b, b' ' | b'\n' | b'\r' | b'\t'))
}
