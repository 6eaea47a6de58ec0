//! Memory error types
//!
//! Every variant is a fatal condition for the current execution path: the
//! caller broke an invariant of the heap model and the path must be dropped.

use crate::features::symbolic::domain::{FieldConflict, ProvenanceError, SchemaName, ValueKind};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// Allocation of a kind that has no pool (bare Ref)
    #[error("cannot allocate a location of kind {kind}")]
    UnsupportedKind { kind: ValueKind },

    /// Operation applied to a reference of the wrong target kind
    #[error("{operation} needs a reference to {expected}, got a reference to {found}")]
    WrongTarget {
        operation: &'static str,
        expected: &'static str,
        found: ValueKind,
    },

    #[error("object allocation needs a schema name")]
    MissingTypeName,

    #[error("array allocation needs an element type")]
    MissingGeneric,

    #[error("element type '{generic}' is malformed")]
    MalformedGeneric { generic: String },

    /// Array pools hold scalars or arrays; references are stored by address
    #[error("arrays of '{generic}' elements are not supported")]
    UnsupportedElement { generic: String },

    #[error("no object pool for schema '{schema}'")]
    UnknownObjectPool { schema: SchemaName },

    #[error("no array pool for element type '{key}'")]
    UnknownArrayPool { key: String },

    #[error("field {index} of '{schema}' was never written")]
    FieldNotWritten { schema: SchemaName, index: usize },

    #[error(transparent)]
    FieldKindConflict(#[from] FieldConflict),

    #[error("a {kind} value '{expr}' cannot be stored in an object field")]
    UnsupportedFieldValue { kind: ValueKind, expr: String },

    #[error("expected a {expected} value, found {found} value '{expr}'")]
    KindMismatch {
        expected: ValueKind,
        found: ValueKind,
        expr: String,
    },

    #[error(transparent)]
    Provenance(#[from] ProvenanceError),

    #[error("address space exhausted after {limit} addresses")]
    AddressSpaceExhausted { limit: usize },

    #[error("pool '{pool}' has no slot-identities left")]
    SlotSpaceExhausted { pool: String },
}

pub type MemoryResult<T> = Result<T, MemoryError>;
