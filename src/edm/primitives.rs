//! EDM primitive types and the core model
//!
//! The `Edm` namespace is shared by every model. [`EdmCoreModel`] is built
//! once per process and never mutated.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Namespace of the built-in types
pub const EDM_NAMESPACE: &str = "Edm";

/// Default SRID of geography types
pub const GEOGRAPHY_DEFAULT_SRID: i32 = 4326;

/// Default SRID of geometry types
pub const GEOMETRY_DEFAULT_SRID: i32 = 0;

/// Built-in primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[allow(missing_docs)]
pub enum EdmPrimitiveTypeKind {
    Binary,
    Boolean,
    Byte,
    Date,
    DateTime,
    DateTimeOffset,
    Decimal,
    Double,
    Duration,
    Guid,
    Int16,
    Int32,
    Int64,
    SByte,
    Single,
    Stream,
    String,
    Time,
    TimeOfDay,
    Geography,
    GeographyPoint,
    GeographyLineString,
    GeographyPolygon,
    GeographyCollection,
    GeographyMultiPolygon,
    GeographyMultiLineString,
    GeographyMultiPoint,
    Geometry,
    GeometryPoint,
    GeometryLineString,
    GeometryPolygon,
    GeometryCollection,
    GeometryMultiPolygon,
    GeometryMultiLineString,
    GeometryMultiPoint,
}

impl EdmPrimitiveTypeKind {
    /// Every primitive kind
    pub const ALL: &'static [EdmPrimitiveTypeKind] = &[
        Self::Binary,
        Self::Boolean,
        Self::Byte,
        Self::Date,
        Self::DateTime,
        Self::DateTimeOffset,
        Self::Decimal,
        Self::Double,
        Self::Duration,
        Self::Guid,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::SByte,
        Self::Single,
        Self::Stream,
        Self::String,
        Self::Time,
        Self::TimeOfDay,
        Self::Geography,
        Self::GeographyPoint,
        Self::GeographyLineString,
        Self::GeographyPolygon,
        Self::GeographyCollection,
        Self::GeographyMultiPolygon,
        Self::GeographyMultiLineString,
        Self::GeographyMultiPoint,
        Self::Geometry,
        Self::GeometryPoint,
        Self::GeometryLineString,
        Self::GeometryPolygon,
        Self::GeometryCollection,
        Self::GeometryMultiPolygon,
        Self::GeometryMultiLineString,
        Self::GeometryMultiPoint,
    ];

    /// Unqualified name
    pub fn name(&self) -> &'static str {
        use EdmPrimitiveTypeKind::*;
        match self {
            Binary => "Binary",
            Boolean => "Boolean",
            Byte => "Byte",
            Date => "Date",
            DateTime => "DateTime",
            DateTimeOffset => "DateTimeOffset",
            Decimal => "Decimal",
            Double => "Double",
            Duration => "Duration",
            Guid => "Guid",
            Int16 => "Int16",
            Int32 => "Int32",
            Int64 => "Int64",
            SByte => "SByte",
            Single => "Single",
            Stream => "Stream",
            String => "String",
            Time => "Time",
            TimeOfDay => "TimeOfDay",
            Geography => "Geography",
            GeographyPoint => "GeographyPoint",
            GeographyLineString => "GeographyLineString",
            GeographyPolygon => "GeographyPolygon",
            GeographyCollection => "GeographyCollection",
            GeographyMultiPolygon => "GeographyMultiPolygon",
            GeographyMultiLineString => "GeographyMultiLineString",
            GeographyMultiPoint => "GeographyMultiPoint",
            Geometry => "Geometry",
            GeometryPoint => "GeometryPoint",
            GeometryLineString => "GeometryLineString",
            GeometryPolygon => "GeometryPolygon",
            GeometryCollection => "GeometryCollection",
            GeometryMultiPolygon => "GeometryMultiPolygon",
            GeometryMultiLineString => "GeometryMultiLineString",
            GeometryMultiPoint => "GeometryMultiPoint",
        }
    }

    /// `Edm.`-qualified name
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", EDM_NAMESPACE, self.name())
    }

    /// Whether this is a geography type
    pub fn is_geography(&self) -> bool {
        self.name().starts_with("Geography")
    }

    /// Whether this is a geometry type
    pub fn is_geometry(&self) -> bool {
        self.name().starts_with("Geometry")
    }

    /// Whether this is any spatial type
    pub fn is_spatial(&self) -> bool {
        self.is_geography() || self.is_geometry()
    }

    /// SRID a reference gets when it does not declare one
    pub fn default_srid(&self) -> Option<i32> {
        if self.is_geography() {
            Some(GEOGRAPHY_DEFAULT_SRID)
        } else if self.is_geometry() {
            Some(GEOMETRY_DEFAULT_SRID)
        } else {
            None
        }
    }

    /// Value range of integral types
    pub fn integral_range(&self) -> Option<(i64, i64)> {
        match self {
            Self::Byte => Some((u8::MIN as i64, u8::MAX as i64)),
            Self::SByte => Some((i8::MIN as i64, i8::MAX as i64)),
            Self::Int16 => Some((i16::MIN as i64, i16::MAX as i64)),
            Self::Int32 => Some((i32::MIN as i64, i32::MAX as i64)),
            Self::Int64 => Some((i64::MIN, i64::MAX)),
            _ => None,
        }
    }
}

impl fmt::Display for EdmPrimitiveTypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", EDM_NAMESPACE, self.name())
    }
}

static CORE_MODEL: Lazy<EdmCoreModel> = Lazy::new(EdmCoreModel::build);

/// The built-in `Edm` namespace
#[derive(Debug)]
pub struct EdmCoreModel {
    by_name: HashMap<String, EdmPrimitiveTypeKind>,
}

impl EdmCoreModel {
    /// The process-wide instance
    pub fn instance() -> &'static EdmCoreModel {
        &CORE_MODEL
    }

    fn build() -> Self {
        let by_name = EdmPrimitiveTypeKind::ALL
            .iter()
            .map(|kind| (kind.qualified_name(), *kind))
            .collect();
        tracing::debug!(types = EdmPrimitiveTypeKind::ALL.len(), "built core model");
        Self { by_name }
    }

    /// Namespace of the core model
    pub fn namespace(&self) -> &'static str {
        EDM_NAMESPACE
    }

    /// Look up a primitive by `Edm.`-qualified name
    pub fn primitive_kind(&self, qualified_name: &str) -> Option<EdmPrimitiveTypeKind> {
        self.by_name.get(qualified_name).copied()
    }

    /// Whether `name` is a primitive type keyword
    pub fn is_primitive_name(&self, qualified_name: &str) -> bool {
        self.by_name.contains_key(qualified_name)
    }

    /// Number of primitive types
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Always false; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
