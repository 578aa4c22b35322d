//! EDM name validation and utilities
//!
//! This module validates the two name shapes CSDL uses everywhere:
//! simple identifiers (`Customer`) and dotted qualified names
//! (`Sales.Model.Customer`).

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length of a simple identifier
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Maximum length of a namespace or qualified name
pub const MAX_QUALIFIED_NAME_LENGTH: usize = 511;

static SIMPLE_IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{L}\p{Nl}_][\p{L}\p{Nl}\p{Nd}\p{Mn}\p{Mc}\p{Pc}\p{Cf}]*$").unwrap()
});

/// Check if a string is a valid EDM simple identifier
pub fn is_valid_simple_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.chars().count() <= MAX_IDENTIFIER_LENGTH
        && SIMPLE_IDENTIFIER.is_match(name)
}

/// Check if a string is a valid dotted qualified name
///
/// A single identifier (no dots) is accepted as well; callers that need at
/// least one namespace segment check [`split_qualified_name`] themselves.
pub fn is_valid_qualified_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_QUALIFIED_NAME_LENGTH
        && name.split('.').all(is_valid_simple_identifier)
}

/// Split `Namespace.Name` at the last dot
pub fn split_qualified_name(name: &str) -> (Option<&str>, &str) {
    match name.rsplit_once('.') {
        Some((namespace, local)) => (Some(namespace), local),
        None => (None, name),
    }
}

/// Join a namespace and a local name
pub fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", namespace, name)
    }
}
