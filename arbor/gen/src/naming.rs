//! Mapping model names to identifiers, URL segments and tags.
//!
//! Every function here is a pure function of a [`Name`]:
//!
//! | Function | `DiskAttachments` |
//! |---|---|
//! | [`identifier_for`] | `disk_attachments` |
//! | [`url_segment_for`] | `diskattachments` |
//! | [`tag_for`] | `disk_attachments` |
//! | [`type_name_for`] | `DiskAttachments` |
//! | [`service_type_name`] | `DiskAttachmentsService` |

use arbor_define::Name;
use proc_macro2::Ident;
use quote::format_ident;

/// Strict and reserved keywords that need a raw identifier.
const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers.
const NON_RAW_KEYWORDS: &[&str] = &["crate", "self", "super", "Self", "_"];

/// Snake-case identifier, also used as the option key.
pub fn identifier_for(name: &Name) -> String {
    name.join("_")
}

/// URL path segment: the lowercase words concatenated.
pub fn url_segment_for(name: &Name) -> String {
    name.join("")
}

/// Field name used on the wire, for query parameters and action envelopes.
pub fn tag_for(name: &Name) -> String {
    name.join("_")
}

/// CamelCase type name.
pub fn type_name_for(name: &Name) -> String {
    name.to_camel_case()
}

/// Name of the generated struct for a service.
pub fn service_type_name(name: &Name) -> String {
    format!("{}Service", name.to_camel_case())
}

/// Name of the locator accessor method.
pub fn accessor_for(name: &Name) -> String {
    format!("{}_service", identifier_for(name))
}

/// Builds an identifier, escaping Rust keywords.
///
/// ## Examples
///
/// ```
/// use arbor_gen::naming::rust_ident;
///
/// assert_eq!(rust_ident("add").to_string(), "add");
/// assert_eq!(rust_ident("move").to_string(), "r#move");
/// assert_eq!(rust_ident("self").to_string(), "self_");
/// ```
pub fn rust_ident(text: &str) -> Ident {
    if NON_RAW_KEYWORDS.contains(&text) {
        format_ident!("{}_", text)
    } else if RUST_KEYWORDS.contains(&text) {
        format_ident!("r#{}", text)
    } else {
        format_ident!("{}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mappings_for_multi_word_name() {
        let name = Name::parse("DiskAttachments");
        assert_eq!(identifier_for(&name), "disk_attachments");
        assert_eq!(url_segment_for(&name), "diskattachments");
        assert_eq!(tag_for(&name), "disk_attachments");
        assert_eq!(type_name_for(&name), "DiskAttachments");
        assert_eq!(service_type_name(&name), "DiskAttachmentsService");
        assert_eq!(accessor_for(&name), "disk_attachments_service");
    }

    #[test]
    fn mappings_ignore_source_spelling() {
        for spelling in ["storage_domains", "StorageDomains", "storage-domains"] {
            assert_eq!(url_segment_for(&Name::parse(spelling)), "storagedomains");
        }
    }

    #[test]
    fn keyword_identifiers_are_raw() {
        assert_eq!(rust_ident("type").to_string(), "r#type");
        assert_eq!(rust_ident("async").to_string(), "r#async");
        assert_eq!(rust_ident("super").to_string(), "super_");
    }
}
