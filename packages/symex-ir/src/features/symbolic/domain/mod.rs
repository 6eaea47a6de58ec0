//! Symbolic Domain Models
//!
//! Type descriptors and the expression AST.

pub mod expression;
pub mod operators;
pub mod reference;
pub mod types;

pub use expression::{
    ArraySelect, ArrayStore, BinaryOperation, ConditionalExpression, ExprRef, FieldRead,
    FieldWrite, Function, FunctionCall, LogicalOperation, ProvenanceError, SymbolicExpression,
    SymbolicVariable, UnaryOperation,
};
pub use operators::{BinaryOperator, LogicalOperator, UnaryOperator};
pub use reference::{Address, Ref};
pub use types::{
    FieldConflict, FieldEstablishment, FieldType, GenericType, ObjectSchema, SchemaName, ValueKind,
};
