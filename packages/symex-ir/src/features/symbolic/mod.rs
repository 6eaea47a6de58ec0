//! Symbolic Expressions
//!
//! ```text
//! domain/          ValueKind, GenericType, ObjectSchema, FieldType,
//!                  operators, SymbolicExpression and its variants, Ref
//! infrastructure/  ExpressionVisitor + accept, VariableCollector,
//!                  SelectStoreSimplifier, ModelEvaluator
//! ```
//!
//! Nodes are immutable and `Send + Sync`; a finished path's expressions can be
//! handed to a translator on another thread.

/// Domain Layer - type descriptors and the AST
pub mod domain;

/// Infrastructure Layer - traversal and consumers
pub mod infrastructure;

pub use domain::*;
pub use infrastructure::*;
