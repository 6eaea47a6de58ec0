/*
 * symex-ir - Symbolic Expression IR and Array-Theory Heap
 *
 * Feature-First Hexagonal Architecture:
 * - config/            : MemoryConfig (serde + YAML), validation
 * - features/symbolic/ : type descriptors, expression AST, traversal protocol
 * - features/heap/     : SymbolicMemory (address chain + per-type pools)
 *
 * Every heap access becomes a select/store term over McCarthy arrays, so any
 * solver with array-theory support can consume the output.
 */

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Configuration
pub mod config;

/// Crate-level errors
pub mod errors;

/// Feature modules (vertical slices)
pub mod features;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{ConfigError, ConfigResult, MemoryConfig, Validatable};
pub use errors::{Result, SymexError};
pub use features::heap::{MemoryError, MemoryPort, MemoryResult, SymbolicMemory};
pub use features::symbolic::domain::{
    Address, ArraySelect, ArrayStore, BinaryOperation, BinaryOperator, ConditionalExpression,
    ExprRef, FieldConflict, FieldEstablishment, FieldRead, FieldType, FieldWrite, Function,
    FunctionCall, GenericType, LogicalOperation, LogicalOperator, ObjectSchema, ProvenanceError,
    Ref, SchemaName, SymbolicExpression, SymbolicVariable, UnaryOperation, UnaryOperator,
    ValueKind,
};
pub use features::symbolic::infrastructure::{
    ConcreteArray, ConcreteValue, EvalError, EvalResult, ExpressionVisitor, Model,
    ModelEvaluator, NodeCache, SelectStoreSimplifier, VariableCollector,
};
