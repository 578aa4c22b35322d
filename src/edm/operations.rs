//! Functions and actions

use super::ambiguous::Binding;
use super::types::EdmTypeReference;
use super::EdmNamedElement;
use crate::csdl::{OperationKind, ParameterMode};
use crate::locations::Location;
use crate::names::qualify;
use std::sync::Arc;

/// An operation parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdmOperationParameter {
    /// Parameter name
    pub name: String,
    /// Parameter type
    pub type_ref: EdmTypeReference,
    /// Direction (legacy function imports only)
    pub mode: Option<ParameterMode>,
}

/// A function or action declared in a schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdmOperation {
    /// Function or action
    pub kind: OperationKind,
    /// Operation name
    pub name: String,
    /// Declaring namespace
    pub namespace: String,
    /// Parameters in order
    pub parameters: Vec<EdmOperationParameter>,
    /// Return type
    pub return_type: Option<EdmTypeReference>,
    /// Bound to its first parameter
    pub is_bound: bool,
    /// Composable (functions only)
    pub is_composable: bool,
    /// Path to the returned entity set
    pub entity_set_path: Option<String>,
    /// Defining expression (legacy functions)
    pub defining_expression: Option<String>,
    /// Source location
    pub location: Location,
}

impl EdmOperation {
    /// `Namespace.Name`
    pub fn qualified_name(&self) -> String {
        qualify(&self.namespace, &self.name)
    }

    /// Find a parameter by name
    pub fn find_parameter(&self, name: &str) -> Option<&EdmOperationParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

impl EdmNamedElement for EdmOperation {
    fn name(&self) -> &str {
        &self.name
    }
}

/// An operation lookup result
pub type OperationBinding = Binding<Arc<EdmOperation>>;

impl Binding<Arc<EdmOperation>> {
    /// The return type; `None` when the binding is ambiguous
    pub fn return_type(&self) -> Option<&EdmTypeReference> {
        match self {
            Binding::Unique(operation) => operation.return_type.as_ref(),
            Binding::Ambiguous(_) => None,
        }
    }

    /// Parameters of the first candidate
    pub fn parameters(&self) -> &[EdmOperationParameter] {
        &self.first().parameters
    }

    /// Whether the first candidate is bound
    pub fn is_bound(&self) -> bool {
        self.first().is_bound
    }

    /// Entity set path of the first candidate
    pub fn entity_set_path(&self) -> Option<&str> {
        self.first().entity_set_path.as_deref()
    }

    /// Kind of the first candidate
    pub fn kind(&self) -> OperationKind {
        self.first().kind
    }

    /// `Namespace.Name` shared by every candidate
    pub fn qualified_name(&self) -> String {
        self.first().qualified_name()
    }
}

impl EdmNamedElement for Binding<Arc<EdmOperation>> {
    fn name(&self) -> &str {
        &self.first().name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edm::{BindingRegistry, EdmPrimitiveTypeKind};

    fn operation(name: &str, return_type: EdmPrimitiveTypeKind) -> Arc<EdmOperation> {
        Arc::new(EdmOperation {
            kind: OperationKind::Function,
            name: name.to_string(),
            namespace: "NS".to_string(),
            parameters: Vec::new(),
            return_type: Some(EdmTypeReference::primitive(return_type, false)),
            is_bound: false,
            is_composable: false,
            entity_set_path: None,
            defining_expression: None,
            location: Location::unknown(),
        })
    }

    #[test]
    fn test_unique_operation_delegates() {
        let binding = Binding::Unique(operation("Count", EdmPrimitiveTypeKind::Int32));
        assert_eq!(binding.name(), "Count");
        assert_eq!(binding.qualified_name(), "NS.Count");
        assert_eq!(
            binding.return_type().and_then(|r| r.primitive_kind()),
            Some(EdmPrimitiveTypeKind::Int32)
        );
    }

    #[test]
    fn test_ambiguous_operation_has_no_return_type() {
        let mut registry = BindingRegistry::new();
        registry.insert(
            "NS.Count()",
            "NS.Count",
            operation("Count", EdmPrimitiveTypeKind::Int32),
            &Location::unknown(),
        );
        registry.insert(
            "NS.Count()",
            "NS.Count",
            operation("Count", EdmPrimitiveTypeKind::Int64),
            &Location::unknown(),
        );
        let binding = registry.get("NS.Count()").unwrap();
        assert!(binding.is_ambiguous());
        assert!(binding.return_type().is_none());
        assert_eq!(binding.name(), "Count");
        assert!(binding.parameters().is_empty());
    }
}
