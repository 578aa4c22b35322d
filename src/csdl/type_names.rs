//! The `Collection(T)` / `Ref(T)` type-name grammar
//!
//! A type name is either a bare name or exactly one wrapper around a bare
//! name. Wrappers do not nest and the wrapped name may not contain
//! whitespace. A bare name is a primitive keyword or a dotted qualified
//! name; the degenerate `Collection` on its own is accepted as a name.

use crate::edm::EdmCoreModel;
use crate::names::is_valid_qualified_name;

/// Wrapper prefix for collections
pub const COLLECTION: &str = "Collection";

/// Wrapper prefix for entity references
pub const REFERENCE: &str = "Ref";

/// A syntactically valid type name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeName<'a> {
    /// A bare name
    Named(&'a str),
    /// `Collection(T)`
    Collection(&'a str),
    /// `Ref(T)`
    Reference(&'a str),
}

/// Validate and split a type name
///
/// Returns `None` when the name breaks the grammar.
pub fn parse_type_name(value: &str) -> Option<TypeName<'_>> {
    let opens = value.matches('(').count();
    let closes = value.matches(')').count();

    if opens == 0 && closes == 0 {
        if value == COLLECTION || is_valid_bare_name(value) {
            return Some(TypeName::Named(value));
        }
        return None;
    }
    if opens != 1 || closes != 1 || !value.ends_with(')') {
        return None;
    }

    let open = value.find('(')?;
    let prefix = &value[..open];
    let inner = &value[open + 1..value.len() - 1];
    if inner.is_empty() || inner.chars().any(char::is_whitespace) || !is_valid_bare_name(inner) {
        return None;
    }
    match prefix {
        COLLECTION => Some(TypeName::Collection(inner)),
        REFERENCE => Some(TypeName::Reference(inner)),
        _ => None,
    }
}

/// Whether `value` satisfies the type-name grammar
pub fn is_valid_type_name(value: &str) -> bool {
    parse_type_name(value).is_some()
}

fn is_valid_bare_name(name: &str) -> bool {
    EdmCoreModel::instance().is_primitive_name(name)
        || (name.contains('.') && is_valid_qualified_name(name))
}
