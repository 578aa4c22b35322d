//! Typed attribute readers for CSDL elements
//!
//! An [`ElementReader`] borrows the parse context and the element being
//! finalized for the duration of one finalizer call. Every reader reports
//! malformed input to the context and still returns a best-effort value.

use super::ast::{
    ConcurrencyMode, CsdlFacets, CsdlTypeKind, CsdlTypeReference, MaxLength, Multiplicity,
    OnDeleteAction, ParameterMode,
};
use super::context::CsdlParseContext;
use super::type_names::{parse_type_name, TypeName};
use crate::error::{DiagnosticSink, EdmErrorCode};
use crate::locations::Location;
use crate::messages;
use crate::names::{is_valid_qualified_name, is_valid_simple_identifier};
use crate::namespaces::Version;
use crate::xml::{XmlAnnotation, XmlElementInfo};

/// The literal accepted by `Scale` and `SRID` for "no fixed value"
pub const VARIABLE: &str = "variable";

/// The literal accepted by `MaxLength` for "unbounded"
pub const MAX: &str = "max";

/// Reads the attributes of the element a finalizer is working on
pub struct ElementReader<'a> {
    context: &'a mut CsdlParseContext,
    info: &'a mut XmlElementInfo,
}

impl<'a> ElementReader<'a> {
    /// Start reading `info`
    pub fn begin(context: &'a mut CsdlParseContext, info: &'a mut XmlElementInfo) -> Self {
        Self { context, info }
    }

    /// Version of the document
    pub fn version(&self) -> Version {
        self.context.version()
    }

    /// Whether the document uses the 4.0 grammar
    pub fn is_v4(&self) -> bool {
        self.context.is_v4()
    }

    /// Location of the element
    pub fn location(&self) -> Location {
        self.info.location().clone()
    }

    /// Move the element's foreign annotations out
    pub fn take_annotations(&mut self) -> Vec<XmlAnnotation> {
        self.info.take_annotations()
    }

    /// Report a diagnostic at the element's location
    pub fn report(&mut self, code: EdmErrorCode, message: String) {
        let location = self.location();
        self.context.report_error(location, code, message);
    }

    fn attribute(&mut self, name: &str) -> Option<(String, Location)> {
        let attribute = self.info.attribute(name);
        if attribute.is_missing() {
            None
        } else {
            Some((attribute.value().to_string(), attribute.location().clone()))
        }
    }

    fn require(&mut self, name: &str) -> Option<(String, Location)> {
        let attribute = self.attribute(name);
        if attribute.is_none() {
            self.report(EdmErrorCode::MissingAttribute, messages::missing_attribute(name));
        }
        attribute
    }

    fn convert<T>(
        &mut self,
        attribute: Option<(String, Location)>,
        code: EdmErrorCode,
        kind: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Option<T> {
        let (value, location) = attribute?;
        let parsed = parse(value.trim());
        if parsed.is_none() {
            self.context
                .report_error(location, code, messages::invalid_value(kind, &value));
        }
        parsed
    }

    /// A required attribute as written; empty when missing
    pub fn required_string(&mut self, name: &str) -> String {
        self.require(name).map(|(value, _)| value).unwrap_or_default()
    }

    /// An optional attribute as written
    pub fn optional_string(&mut self, name: &str) -> Option<String> {
        self.attribute(name).map(|(value, _)| value)
    }

    /// A required simple identifier
    pub fn required_name(&mut self, name: &str) -> String {
        let attribute = self.require(name);
        self.check_name(attribute).unwrap_or_default()
    }

    /// An optional simple identifier, such as an alias
    pub fn optional_name(&mut self, name: &str) -> Option<String> {
        let attribute = self.attribute(name);
        self.check_name(attribute)
    }

    fn check_name(&mut self, attribute: Option<(String, Location)>) -> Option<String> {
        let (value, location) = attribute?;
        if !is_valid_simple_identifier(&value) {
            self.context
                .report_error(location, EdmErrorCode::InvalidName, messages::invalid_name(&value));
        }
        Some(value)
    }

    /// A required dotted name
    pub fn required_qualified_name(&mut self, name: &str) -> String {
        let attribute = self.require(name);
        self.check_qualified_name(attribute).unwrap_or_default()
    }

    /// An optional dotted name
    pub fn optional_qualified_name(&mut self, name: &str) -> Option<String> {
        let attribute = self.attribute(name);
        self.check_qualified_name(attribute)
    }

    fn check_qualified_name(&mut self, attribute: Option<(String, Location)>) -> Option<String> {
        let (value, location) = attribute?;
        if !is_valid_qualified_name(&value) {
            self.context.report_error(
                location,
                EdmErrorCode::InvalidQualifiedName,
                messages::invalid_qualified_name(&value),
            );
        }
        Some(value)
    }

    /// A required type name, split by the `Collection(T)`/`Ref(T)` grammar
    pub fn required_type(&mut self, name: &str) -> CsdlTypeKind {
        match self.require(name) {
            Some(attribute) => self.type_kind(attribute),
            None => CsdlTypeKind::Named(String::new()),
        }
    }

    /// An optional type name
    pub fn optional_type(&mut self, name: &str) -> Option<CsdlTypeKind> {
        let attribute = self.attribute(name)?;
        Some(self.type_kind(attribute))
    }

    fn type_kind(&mut self, (value, location): (String, Location)) -> CsdlTypeKind {
        match parse_type_name(&value) {
            Some(TypeName::Named(name)) => CsdlTypeKind::Named(name.to_string()),
            Some(TypeName::Collection(element)) => CsdlTypeKind::Collection(Box::new(
                CsdlTypeReference::named(element, location),
            )),
            Some(TypeName::Reference(target)) => CsdlTypeKind::EntityReference(target.to_string()),
            None => {
                self.context.report_error(
                    location,
                    EdmErrorCode::InvalidTypeName,
                    messages::invalid_type_name(&value),
                );
                CsdlTypeKind::Named(value)
            }
        }
    }

    /// Wrap `kind` with this element's `Nullable` and facet attributes
    pub fn type_reference(&mut self, kind: CsdlTypeKind) -> CsdlTypeReference {
        let nullable = self.bool_or("Nullable", true);
        let facets = self.facets();
        CsdlTypeReference {
            kind,
            nullable,
            facets,
            location: self.location(),
        }
    }

    /// Read all facet attributes
    pub fn facets(&mut self) -> CsdlFacets {
        CsdlFacets {
            max_length: self.optional_max_length("MaxLength"),
            fixed_length: self.optional_bool("FixedLength"),
            unicode: self.optional_bool("Unicode"),
            precision: self.optional_precision("Precision"),
            scale: self.optional_scale("Scale"),
            srid: self.optional_srid("SRID"),
        }
    }

    /// An optional `true`/`false`
    pub fn optional_bool(&mut self, name: &str) -> Option<bool> {
        let attribute = self.attribute(name);
        self.convert(attribute, EdmErrorCode::InvalidBoolean, "boolean", parse_bool)
    }

    /// An optional boolean with a default
    pub fn bool_or(&mut self, name: &str, default: bool) -> bool {
        self.optional_bool(name).unwrap_or(default)
    }

    /// A required 32-bit integer
    pub fn required_int(&mut self, name: &str) -> Option<i32> {
        let attribute = self.require(name);
        self.convert(attribute, EdmErrorCode::InvalidInteger, "integer", |v| v.parse().ok())
    }

    /// An optional 32-bit integer
    pub fn optional_int(&mut self, name: &str) -> Option<i32> {
        let attribute = self.attribute(name);
        self.convert(attribute, EdmErrorCode::InvalidInteger, "integer", |v| v.parse().ok())
    }

    /// An optional 64-bit integer
    pub fn optional_long(&mut self, name: &str) -> Option<i64> {
        let attribute = self.attribute(name);
        self.convert(attribute, EdmErrorCode::InvalidLong, "long", |v| v.parse().ok())
    }

    /// `MaxLength`: a non-negative integer or `max`
    pub fn optional_max_length(&mut self, name: &str) -> Option<MaxLength> {
        let attribute = self.attribute(name);
        self.convert(attribute, EdmErrorCode::InvalidMaxLength, "max length", |v| {
            if v.eq_ignore_ascii_case(MAX) {
                Some(MaxLength::Max)
            } else {
                v.parse().ok().map(MaxLength::Value)
            }
        })
    }

    /// `Precision`: a non-negative integer
    pub fn optional_precision(&mut self, name: &str) -> Option<u32> {
        let attribute = self.attribute(name);
        self.convert(attribute, EdmErrorCode::InvalidPrecision, "precision", |v| v.parse().ok())
    }

    /// `Scale`: a non-negative integer, or `variable` mapped to `Some(None)`
    pub fn optional_scale(&mut self, name: &str) -> Option<Option<u32>> {
        let attribute = self.attribute(name);
        self.convert(attribute, EdmErrorCode::InvalidScale, "scale", |v| {
            if v.eq_ignore_ascii_case(VARIABLE) {
                Some(None)
            } else {
                v.parse().ok().map(Some)
            }
        })
    }

    /// `SRID`: a non-negative integer, or `variable` mapped to `Some(None)`
    pub fn optional_srid(&mut self, name: &str) -> Option<Option<i32>> {
        let attribute = self.attribute(name);
        self.convert(attribute, EdmErrorCode::InvalidSrid, "SRID", |v| {
            if v.eq_ignore_ascii_case(VARIABLE) {
                Some(None)
            } else {
                v.parse::<i32>().ok().filter(|srid| *srid >= 0).map(Some)
            }
        })
    }

    /// A required `Multiplicity`; anything unrecognized reads as `One`
    pub fn required_multiplicity(&mut self, name: &str) -> Multiplicity {
        let attribute = self.require(name);
        self.convert(
            attribute,
            EdmErrorCode::InvalidMultiplicity,
            "multiplicity",
            |v| match v {
                "0..1" => Some(Multiplicity::ZeroOrOne),
                "1" => Some(Multiplicity::One),
                "*" => Some(Multiplicity::Many),
                _ => None,
            },
        )
        .unwrap_or(Multiplicity::One)
    }

    /// A required `OnDelete` action; anything unrecognized reads as `None`
    pub fn required_on_delete(&mut self, name: &str) -> OnDeleteAction {
        let attribute = self.require(name);
        self.convert(
            attribute,
            EdmErrorCode::InvalidOnDelete,
            "on-delete action",
            |v| match v {
                "None" => Some(OnDeleteAction::None),
                "Cascade" => Some(OnDeleteAction::Cascade),
                "SetNull" => Some(OnDeleteAction::SetNull),
                "SetDefault" => Some(OnDeleteAction::SetDefault),
                _ => None,
            },
        )
        .unwrap_or(OnDeleteAction::None)
    }

    /// `ConcurrencyMode`, defaulting to `None`
    pub fn concurrency_mode(&mut self, name: &str) -> ConcurrencyMode {
        let attribute = self.attribute(name);
        self.convert(
            attribute,
            EdmErrorCode::InvalidConcurrencyMode,
            "concurrency mode",
            |v| match v {
                "None" => Some(ConcurrencyMode::None),
                "Fixed" => Some(ConcurrencyMode::Fixed),
                _ => None,
            },
        )
        .unwrap_or_default()
    }

    /// An optional parameter `Mode`
    pub fn optional_parameter_mode(&mut self, name: &str) -> Option<ParameterMode> {
        let attribute = self.attribute(name);
        self.convert(
            attribute,
            EdmErrorCode::InvalidParameterMode,
            "parameter mode",
            |v| match v {
                "In" => Some(ParameterMode::In),
                "Out" => Some(ParameterMode::Out),
                "InOut" => Some(ParameterMode::InOut),
                _ => None,
            },
        )
    }

    /// An entity set reference: `Name` or `Container.Qualified/Name`
    ///
    /// A malformed path is reported once and returned as written.
    pub fn optional_entity_set_path(&mut self, name: &str) -> Option<String> {
        let (value, location) = self.attribute(name)?;
        let valid = if value.contains('/') {
            is_valid_entity_set_path(&value)
        } else {
            is_valid_simple_identifier(&value)
        };
        if !valid {
            self.context.report_error(
                location,
                EdmErrorCode::InvalidEntitySetPath,
                messages::invalid_entity_set_path(&value),
            );
        }
        Some(value)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Split `Qualified.Name/Member` into its two segments
///
/// Both segments are validated independently: the first must be a dotted
/// qualified name and the second an undotted identifier.
pub fn split_member_path(value: &str) -> Option<(&str, &str)> {
    let mut segments = value.split('/');
    let (first, second) = (segments.next()?, segments.next()?);
    if segments.next().is_some() {
        return None;
    }
    let first_ok = first.contains('.') && is_valid_qualified_name(first);
    let second_ok = is_valid_simple_identifier(second);
    (first_ok && second_ok).then_some((first, second))
}

/// Whether `value` is `ContainerQualifiedName/EntitySetName`
pub fn is_valid_entity_set_path(value: &str) -> bool {
    split_member_path(value).is_some()
}

/// Whether `value` is `EnumTypeQualifiedName/MemberName`
pub fn is_valid_enum_member_path(value: &str) -> bool {
    split_member_path(value).is_some()
}
