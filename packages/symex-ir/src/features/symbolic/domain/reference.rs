//! Symbolic references

use super::expression::{ExprRef, SymbolicExpression};
use super::types::{GenericType, SchemaName, ValueKind};
use std::fmt;
use std::sync::Arc;

/// Logical memory address
pub type Address = i64;

/// Opaque handle to a heap location
///
/// `address` is the identity of the location; `deref` evaluates, in the memory
/// world the reference was created in, to the location's slot-identity inside
/// its pool. Two refs with the same address denote the same location.
#[derive(Debug, Clone, PartialEq)]
pub struct Ref {
    address: Address,
    target_kind: ValueKind,
    generic: Option<GenericType>,
    object_schema: Option<SchemaName>,
    deref: ExprRef,
}

impl Ref {
    pub fn new(
        address: Address,
        target_kind: ValueKind,
        generic: Option<GenericType>,
        object_schema: Option<SchemaName>,
        deref: ExprRef,
    ) -> Self {
        Self {
            address,
            target_kind,
            generic,
            object_schema,
            deref,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Kind of the referenced location
    pub fn target_kind(&self) -> ValueKind {
        self.target_kind
    }

    /// Element type, for array references
    pub fn generic(&self) -> Option<&GenericType> {
        self.generic.as_ref()
    }

    /// Schema name, for object references
    pub fn object_schema(&self) -> Option<&str> {
        self.object_schema.as_deref()
    }

    /// Int-kind slot-identity expression
    pub fn deref(&self) -> &ExprRef {
        &self.deref
    }

    /// Int constant holding this reference's address
    pub fn address_term(&self) -> ExprRef {
        SymbolicExpression::int(self.address)
    }

    /// This reference as an expression node
    pub fn to_expr(&self) -> ExprRef {
        Arc::new(SymbolicExpression::Ref(self.clone()))
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.address)
    }
}
