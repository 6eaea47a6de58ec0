//! Type Descriptors
//!
//! Value categories, recursive generic-type descriptors and lazily grown
//! object schemas.
//!
//! ```text
//! GenericType ::= kind [<schema>] [[nested]]
//!
//! int                 scalar element
//! array[int]          element is itself an int array
//! ref<Foo>            element is a reference to a `Foo` object
//! array[array[bool]]  nested arrays
//! ```
//!
//! The rendering of a [`GenericType`] is the pooling key for arrays, so two
//! descriptors of the same shape always render to the same string.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Object schema name
pub type SchemaName = String;

/// Value category of every symbolic expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Int,
    Float,
    Bool,
    Array,
    Object,
    Ref,
}

impl ValueKind {
    /// All kinds, in declaration order
    pub const ALL: [ValueKind; 6] = [
        ValueKind::Int,
        ValueKind::Float,
        ValueKind::Bool,
        ValueKind::Array,
        ValueKind::Object,
        ValueKind::Ref,
    ];

    /// Int, Float or Bool: the kinds backed by a primitive pool
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Int | Self::Float | Self::Bool)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Array => "array",
            Self::Object => "object",
            Self::Ref => "ref",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Generic Type
// ═══════════════════════════════════════════════════════════════════════════

/// Recursive element-type descriptor
///
/// - `kind == Array` requires `nested` (the element array's own element type)
/// - `kind == Object | Ref` requires `object_schema`
///
/// Equality is structural, which coincides with equality of [`render`](Self::render).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenericType {
    pub kind: ValueKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_schema: Option<SchemaName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested: Option<Box<GenericType>>,
}

impl GenericType {
    pub fn scalar(kind: ValueKind) -> Self {
        Self {
            kind,
            object_schema: None,
            nested: None,
        }
    }

    pub fn int() -> Self {
        Self::scalar(ValueKind::Int)
    }

    pub fn float() -> Self {
        Self::scalar(ValueKind::Float)
    }

    pub fn boolean() -> Self {
        Self::scalar(ValueKind::Bool)
    }

    /// Array whose elements are described by `element`
    pub fn array_of(element: GenericType) -> Self {
        Self {
            kind: ValueKind::Array,
            object_schema: None,
            nested: Some(Box::new(element)),
        }
    }

    /// Reference to an object of schema `schema`
    pub fn reference(schema: impl Into<SchemaName>) -> Self {
        Self {
            kind: ValueKind::Ref,
            object_schema: Some(schema.into()),
            nested: None,
        }
    }

    pub fn object(schema: impl Into<SchemaName>) -> Self {
        Self {
            kind: ValueKind::Object,
            object_schema: Some(schema.into()),
            nested: None,
        }
    }

    pub fn nested(&self) -> Option<&GenericType> {
        self.nested.as_deref()
    }

    /// Check the descriptor invariants recursively
    pub fn is_well_formed(&self) -> bool {
        match self.kind {
            ValueKind::Array => self.nested().is_some_and(GenericType::is_well_formed),
            ValueKind::Object | ValueKind::Ref => {
                self.object_schema.is_some() && self.nested.is_none()
            }
            _ => self.object_schema.is_none() && self.nested.is_none(),
        }
    }

    /// Kind at the bottom of the nesting: `int` for `array[array[int]]`
    pub fn innermost_kind(&self) -> ValueKind {
        match self.nested() {
            Some(nested) => nested.innermost_kind(),
            None => self.kind,
        }
    }

    /// Canonical string rendering, used as the array pooling key
    pub fn render(&self) -> String {
        let mut out = String::from(self.kind.as_str());
        if let Some(schema) = &self.object_schema {
            out.push('<');
            out.push_str(schema);
            out.push('>');
        }
        if let Some(nested) = &self.nested {
            out.push('[');
            out.push_str(&nested.render());
            out.push(']');
        }
        out
    }
}

impl fmt::Display for GenericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Object Schema
// ═══════════════════════════════════════════════════════════════════════════

/// Type of one object field, fixed by the first write to its index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Int,
    Float,
    Bool,
    /// Array field; the descriptor is the element type of the stored arrays
    Array(GenericType),
    /// Reference to an object of the named schema
    Ref(SchemaName),
}

impl FieldType {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Int => ValueKind::Int,
            Self::Float => ValueKind::Float,
            Self::Bool => ValueKind::Bool,
            Self::Array(_) => ValueKind::Array,
            Self::Ref(_) => ValueKind::Ref,
        }
    }

    /// Element type of arrays stored in this field
    pub fn generic(&self) -> Option<&GenericType> {
        match self {
            Self::Array(generic) => Some(generic),
            _ => None,
        }
    }

    pub fn object_schema(&self) -> Option<&str> {
        match self {
            Self::Ref(schema) => Some(schema),
            _ => None,
        }
    }

    /// Scalar field type for a scalar kind
    pub fn scalar(kind: ValueKind) -> Option<Self> {
        match kind {
            ValueKind::Int => Some(Self::Int),
            ValueKind::Float => Some(Self::Float),
            ValueKind::Bool => Some(Self::Bool),
            _ => None,
        }
    }

    /// Element type of the per-field slot array.
    ///
    /// Reference fields hold addresses, so their slot arrays are int-valued.
    pub fn slot_element(&self) -> GenericType {
        match self {
            Self::Int | Self::Ref(_) => GenericType::int(),
            Self::Float => GenericType::float(),
            Self::Bool => GenericType::boolean(),
            Self::Array(generic) => GenericType::array_of(generic.clone()),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array(generic) => write!(f, "array[{}]", generic),
            Self::Ref(schema) => write!(f, "ref<{}>", schema),
            other => f.write_str(other.kind().as_str()),
        }
    }
}

/// A second write to a field index with a different type than the first
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field {index} of '{schema}' is {existing}, cannot store {requested}")]
pub struct FieldConflict {
    pub schema: SchemaName,
    pub index: usize,
    pub existing: FieldType,
    pub requested: FieldType,
}

/// Outcome of [`ObjectSchema::ensure_field`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEstablishment {
    /// This write fixed the field type
    New,
    /// The field already had the same type
    Existing,
}

/// Named object layout with a sparse, append-only field list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSchema {
    name: SchemaName,
    fields: Vec<Option<FieldType>>,
}

impl ObjectSchema {
    pub fn new(name: impl Into<SchemaName>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field list; `None` marks an index skipped by a later write
    pub fn fields(&self) -> &[Option<FieldType>] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&FieldType> {
        self.fields.get(index).and_then(Option::as_ref)
    }

    /// Number of field positions, including unset placeholders
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Extend the schema up to `index` and fix the field type if unset.
    ///
    /// A conflicting type for an established field is rejected.
    pub fn ensure_field(
        &mut self,
        index: usize,
        field: FieldType,
    ) -> Result<FieldEstablishment, FieldConflict> {
        if self.fields.len() <= index {
            self.fields.resize(index + 1, None);
        }

        match &self.fields[index] {
            Some(existing) if *existing == field => Ok(FieldEstablishment::Existing),
            Some(existing) => Err(FieldConflict {
                schema: self.name.clone(),
                index,
                existing: existing.clone(),
                requested: field,
            }),
            None => {
                self.fields[index] = Some(field);
                Ok(FieldEstablishment::New)
            }
        }
    }
}
