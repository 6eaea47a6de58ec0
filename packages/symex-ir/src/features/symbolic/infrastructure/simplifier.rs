//! Read-over-write simplification
//!
//! Rebuilds an expression bottom-up and resolves selects over store chains
//! when the indices can be compared syntactically:
//!
//! ```text
//! select(store(a, i, v), i)  →  v
//! select(store(a, 3, v), 5)  →  select(a, 5)
//! select(store(a, i, v), j)  →  unchanged (i, j symbolic)
//! ```
//!
//! This is the rewrite a solver performs first on array terms; nothing else is
//! folded, and every rebuilt node keeps its kind. Shared input nodes are
//! rewritten once and stay shared in the output.

use super::visitor::{ExpressionVisitor, NodeCache};
use crate::features::symbolic::domain::{
    ArraySelect, ArrayStore, BinaryOperation, ConditionalExpression, ExprRef, FieldRead,
    FieldWrite, Function, FunctionCall, LogicalOperation, Ref, SymbolicExpression,
    SymbolicVariable, UnaryOperation,
};
use std::sync::Arc;

/// How two index terms relate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndexRelation {
    Same,
    Distinct,
    Unknown,
}

fn relate(a: &ExprRef, b: &ExprRef) -> IndexRelation {
    if Arc::ptr_eq(a, b) || a == b {
        return IndexRelation::Same;
    }
    match (a.as_int(), b.as_int()) {
        (Some(x), Some(y)) if x != y => IndexRelation::Distinct,
        _ => IndexRelation::Unknown,
    }
}

#[derive(Debug, Default)]
pub struct SelectStoreSimplifier {
    rewrites: usize,
    rewritten: NodeCache<ExprRef>,
}

impl SelectStoreSimplifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn simplify(expr: &SymbolicExpression) -> ExprRef {
        expr.accept(&mut Self::new())
    }

    /// Number of select-over-store steps resolved so far
    pub fn rewrites(&self) -> usize {
        self.rewrites
    }

    fn rewrite(&mut self, expr: &ExprRef) -> ExprRef {
        if let Some(done) = self.rewritten.get(expr) {
            return done;
        }
        let out = expr.accept(self);
        self.rewritten.insert(expr, out.clone());
        out
    }
}

impl ExpressionVisitor for SelectStoreSimplifier {
    type Output = ExprRef;

    fn visit_variable(&mut self, variable: &SymbolicVariable) -> ExprRef {
        SymbolicExpression::Variable(variable.clone()).shared()
    }

    fn visit_int_constant(&mut self, value: i64) -> ExprRef {
        SymbolicExpression::int(value)
    }

    fn visit_float_constant(&mut self, value: f64) -> ExprRef {
        SymbolicExpression::float(value)
    }

    fn visit_bool_constant(&mut self, value: bool) -> ExprRef {
        SymbolicExpression::boolean(value)
    }

    fn visit_binary_op(&mut self, op: &BinaryOperation) -> ExprRef {
        let left = self.rewrite(op.left());
        let right = self.rewrite(op.right());
        SymbolicExpression::binary(left, right, op.operator())
            .unwrap_or_else(|| SymbolicExpression::BinaryOp(op.clone()).shared())
    }

    fn visit_logical_op(&mut self, op: &LogicalOperation) -> ExprRef {
        let operands = op.operands().iter().map(|e| self.rewrite(e)).collect();
        SymbolicExpression::logical(operands, op.operator())
            .unwrap_or_else(|| SymbolicExpression::LogicalOp(op.clone()).shared())
    }

    fn visit_unary_op(&mut self, op: &UnaryOperation) -> ExprRef {
        let operand = self.rewrite(op.operand());
        SymbolicExpression::unary(operand, op.operator())
            .unwrap_or_else(|| SymbolicExpression::UnaryOp(op.clone()).shared())
    }

    fn visit_array_select(&mut self, select: &ArraySelect) -> ExprRef {
        let index = self.rewrite(select.index());
        let mut array = self.rewrite(select.array());

        loop {
            let SymbolicExpression::ArrayStore(store) = array.as_ref() else {
                break;
            };
            match relate(store.index(), &index) {
                IndexRelation::Same => {
                    self.rewrites += 1;
                    return store.value().clone();
                }
                IndexRelation::Distinct => {
                    self.rewrites += 1;
                    let below = store.array().clone();
                    array = below;
                }
                IndexRelation::Unknown => break,
            }
        }

        SymbolicExpression::select(array, index)
            .unwrap_or_else(|_| SymbolicExpression::ArraySelect(select.clone()).shared())
    }

    fn visit_array_store(&mut self, store: &ArrayStore) -> ExprRef {
        let array = self.rewrite(store.array());
        let index = self.rewrite(store.index());
        let value = self.rewrite(store.value());
        SymbolicExpression::store(array, index, value)
            .unwrap_or_else(|_| SymbolicExpression::ArrayStore(store.clone()).shared())
    }

    fn visit_function(&mut self, function: &Function) -> ExprRef {
        SymbolicExpression::Function(function.clone()).shared()
    }

    fn visit_function_call(&mut self, call: &FunctionCall) -> ExprRef {
        let args = call.args().iter().map(|e| self.rewrite(e)).collect();
        SymbolicExpression::call(call.function_handle(), args)
            .unwrap_or_else(|| SymbolicExpression::FunctionCall(call.clone()).shared())
    }

    fn visit_conditional(&mut self, conditional: &ConditionalExpression) -> ExprRef {
        let condition = self.rewrite(conditional.condition());
        let then_branch = self.rewrite(conditional.then_branch());
        let else_branch = self.rewrite(conditional.else_branch());
        SymbolicExpression::conditional(condition, then_branch, else_branch)
            .unwrap_or_else(|| SymbolicExpression::Conditional(conditional.clone()).shared())
    }

    fn visit_field_read(&mut self, read: &FieldRead) -> ExprRef {
        let raw = self.rewrite(read.raw_value());
        SymbolicExpression::FieldRead(FieldRead::new(
            read.object().clone(),
            read.field_index(),
            read.field_type().clone(),
            raw,
        ))
        .shared()
    }

    fn visit_field_write(&mut self, write: &FieldWrite) -> ExprRef {
        let raw = self.rewrite(write.raw_value());
        SymbolicExpression::FieldWrite(FieldWrite::new(
            write.object().clone(),
            write.field_index(),
            write.value().clone(),
            raw,
        ))
        .shared()
    }

    fn visit_ref(&mut self, reference: &Ref) -> ExprRef {
        let deref = self.rewrite(reference.deref());
        SymbolicExpression::Ref(Ref::new(
            reference.address(),
            reference.target_kind(),
            reference.generic().cloned(),
            reference.object_schema().map(str::to_string),
            deref,
        ))
        .shared()
    }
}
