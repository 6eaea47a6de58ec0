//! Expression Traversal Protocol
//!
//! A consumer (solver translator, evaluator, printer) implements one handler per
//! expression variant. [`SymbolicExpression::accept`] routes to exactly the
//! handler matching the node and returns its result unchanged.
//!
//! ```rust,ignore
//! struct DepthCounter;
//!
//! impl ExpressionVisitor for DepthCounter {
//!     type Output = usize;
//!     fn visit_int_constant(&mut self, _: i64) -> usize { 1 }
//!     fn visit_binary_op(&mut self, op: &BinaryOperation) -> usize {
//!         1 + op.left().accept(self).max(op.right().accept(self))
//!     }
//!     // ...
//! }
//! ```
//!
//! ## Shared subterms
//!
//! Expressions are DAGs. Every array-pool write mentions the previous pool head
//! twice, so a plain tree walk doubles its work per write. Consumers recurse
//! through a [`NodeCache`] to handle each shared node once.

use crate::features::symbolic::domain::{
    ArraySelect, ArrayStore, BinaryOperation, ConditionalExpression, ExprRef, FieldRead,
    FieldWrite, Function, FunctionCall, LogicalOperation, Ref, SymbolicExpression,
    SymbolicVariable, UnaryOperation,
};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// One handler per [`SymbolicExpression`] variant
pub trait ExpressionVisitor {
    type Output;

    fn visit_variable(&mut self, variable: &SymbolicVariable) -> Self::Output;

    fn visit_int_constant(&mut self, value: i64) -> Self::Output;

    fn visit_float_constant(&mut self, value: f64) -> Self::Output;

    fn visit_bool_constant(&mut self, value: bool) -> Self::Output;

    fn visit_binary_op(&mut self, op: &BinaryOperation) -> Self::Output;

    fn visit_logical_op(&mut self, op: &LogicalOperation) -> Self::Output;

    fn visit_unary_op(&mut self, op: &UnaryOperation) -> Self::Output;

    fn visit_array_select(&mut self, select: &ArraySelect) -> Self::Output;

    fn visit_array_store(&mut self, store: &ArrayStore) -> Self::Output;

    fn visit_function(&mut self, function: &Function) -> Self::Output;

    fn visit_function_call(&mut self, call: &FunctionCall) -> Self::Output;

    fn visit_conditional(&mut self, conditional: &ConditionalExpression) -> Self::Output;

    fn visit_field_read(&mut self, read: &FieldRead) -> Self::Output;

    fn visit_field_write(&mut self, write: &FieldWrite) -> Self::Output;

    fn visit_ref(&mut self, reference: &Ref) -> Self::Output;
}

impl SymbolicExpression {
    /// Dispatch to the handler matching this node's variant
    pub fn accept<V: ExpressionVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Self::Variable(v) => visitor.visit_variable(v),
            Self::IntConstant(v) => visitor.visit_int_constant(*v),
            Self::FloatConstant(v) => visitor.visit_float_constant(*v),
            Self::BoolConstant(v) => visitor.visit_bool_constant(*v),
            Self::BinaryOp(op) => visitor.visit_binary_op(op),
            Self::LogicalOp(op) => visitor.visit_logical_op(op),
            Self::UnaryOp(op) => visitor.visit_unary_op(op),
            Self::ArraySelect(sel) => visitor.visit_array_select(sel),
            Self::ArrayStore(st) => visitor.visit_array_store(st),
            Self::Function(func) => visitor.visit_function(func),
            Self::FunctionCall(call) => visitor.visit_function_call(call),
            Self::Conditional(cond) => visitor.visit_conditional(cond),
            Self::FieldRead(read) => visitor.visit_field_read(read),
            Self::FieldWrite(write) => visitor.visit_field_write(write),
            Self::Ref(r) => visitor.visit_ref(r),
        }
    }
}

/// Per-traversal results keyed by node identity
///
/// Each entry holds a handle to its node, so a key address cannot be reused
/// by another node while the cache lives.
#[derive(Debug)]
pub struct NodeCache<T> {
    entries: FxHashMap<*const SymbolicExpression, (ExprRef, T)>,
}

impl<T> Default for NodeCache<T> {
    fn default() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }
}

impl<T: Clone> NodeCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, node: &ExprRef) -> Option<T> {
        self.entries
            .get(&Arc::as_ptr(node))
            .map(|(_, value)| value.clone())
    }

    pub fn insert(&mut self, node: &ExprRef, value: T) {
        self.entries
            .insert(Arc::as_ptr(node), (Arc::clone(node), value));
    }

    /// Distinct nodes recorded
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
