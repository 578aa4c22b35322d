//! XML namespace handling
//!
//! This module provides qualified XML names, grammar versions and the table
//! of CSDL namespaces this crate understands.

use serde::Serialize;
use std::fmt;

/// Qualified XML name - combination of namespace and local name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<String>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Create a QName with a namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

/// A grammar version (`major.minor`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Version {
    /// Major component
    pub major: u16,
    /// Minor component
    pub minor: u16,
}

impl Version {
    /// Create a version
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// CSDL 1.0
    pub const V1: Version = Version::new(1, 0);
    /// CSDL 1.1
    pub const V1_1: Version = Version::new(1, 1);
    /// CSDL 1.2
    pub const V1_2: Version = Version::new(1, 2);
    /// CSDL 2.0
    pub const V2: Version = Version::new(2, 0);
    /// CSDL 3.0
    pub const V3: Version = Version::new(3, 0);
    /// CSDL 4.0
    pub const V4: Version = Version::new(4, 0);
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// CSDL 1.0 namespace
pub const EDM_NAMESPACE_V1: &str = "http://schemas.microsoft.com/ado/2006/04/edm";
/// CSDL 1.1 namespace
pub const EDM_NAMESPACE_V1_1: &str = "http://schemas.microsoft.com/ado/2007/05/edm";
/// CSDL 1.2 namespace
pub const EDM_NAMESPACE_V1_2: &str = "http://schemas.microsoft.com/ado/2008/01/edm";
/// CSDL 2.0 namespace
pub const EDM_NAMESPACE_V2: &str = "http://schemas.microsoft.com/ado/2008/09/edm";
/// CSDL 3.0 namespace
pub const EDM_NAMESPACE_V3: &str = "http://schemas.microsoft.com/ado/2009/11/edm";
/// CSDL 4.0 namespace
pub const EDM_NAMESPACE_V4: &str = "http://docs.oasis-open.org/odata/ns/edm";

/// XML namespace
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// XMLNS namespace
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// Supported CSDL namespaces, ordered from oldest to newest
pub const CSDL_NAMESPACE_VERSIONS: &[(&str, Version)] = &[
    (EDM_NAMESPACE_V1, Version::V1),
    (EDM_NAMESPACE_V1_1, Version::V1_1),
    (EDM_NAMESPACE_V1_2, Version::V1_2),
    (EDM_NAMESPACE_V2, Version::V2),
    (EDM_NAMESPACE_V3, Version::V3),
    (EDM_NAMESPACE_V4, Version::V4),
];

/// Look up the CSDL version of a namespace URI
pub fn csdl_version(namespace: &str) -> Option<Version> {
    CSDL_NAMESPACE_VERSIONS
        .iter()
        .find(|(ns, _)| *ns == namespace)
        .map(|(_, v)| *v)
}

/// The namespace a CSDL version is written in
pub fn csdl_namespace(version: Version) -> Option<&'static str> {
    CSDL_NAMESPACE_VERSIONS
        .iter()
        .find(|(_, v)| *v == version)
        .map(|(ns, _)| *ns)
}

/// Whether a namespace belongs to the CSDL grammar family
///
/// Elements and attributes in these namespaces are never treated as
/// annotations, even when they do not match the document's own version.
pub fn is_csdl_namespace(namespace: &str) -> bool {
    csdl_version(namespace).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qname_display() {
        let qname = QName::namespaced("http://example.com", "element");
        assert_eq!(qname.to_string(), "{http://example.com}element");

        let qname_local = QName::local("element");
        assert_eq!(qname_local.to_string(), "element");
    }

    #[test]
    fn test_version_ordering() {
        assert!(Version::V1 < Version::V1_2);
        assert!(Version::V3 < Version::V4);
        assert_eq!(Version::V2.to_string(), "2.0");
    }

    #[test]
    fn test_csdl_version_table() {
        assert_eq!(csdl_version(EDM_NAMESPACE_V4), Some(Version::V4));
        assert_eq!(csdl_version(EDM_NAMESPACE_V1_1), Some(Version::V1_1));
        assert_eq!(csdl_version("http://example.com"), None);
        assert_eq!(csdl_namespace(Version::V3), Some(EDM_NAMESPACE_V3));
    }

    #[test]
    fn test_all_versions_are_owned() {
        for (ns, _) in CSDL_NAMESPACE_VERSIONS {
            assert!(is_csdl_namespace(ns));
        }
        assert!(!is_csdl_namespace(XML_NAMESPACE));
    }
}
