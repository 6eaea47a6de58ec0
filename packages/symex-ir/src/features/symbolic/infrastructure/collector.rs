//! Free-variable collection
//!
//! Walks an expression and records every [`SymbolicVariable`] it depends on,
//! in first-seen order. Function parameters are formal and not collected.

use super::visitor::{ExpressionVisitor, NodeCache};
use crate::features::symbolic::domain::{
    ArraySelect, ArrayStore, BinaryOperation, ConditionalExpression, ExprRef, FieldRead,
    FieldWrite, Function, FunctionCall, LogicalOperation, Ref, SymbolicExpression,
    SymbolicVariable, UnaryOperation,
};
use rustc_hash::FxHashSet;

#[derive(Debug, Default)]
pub struct VariableCollector {
    seen: FxHashSet<String>,
    variables: Vec<SymbolicVariable>,
    walked: NodeCache<()>,
}

impl VariableCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the free variables of `expr`
    pub fn collect(expr: &SymbolicExpression) -> Vec<SymbolicVariable> {
        let mut collector = Self::new();
        expr.accept(&mut collector);
        collector.into_variables()
    }

    /// Variable names collected so far
    pub fn names(&self) -> Vec<&str> {
        self.variables.iter().map(SymbolicVariable::name).collect()
    }

    pub fn into_variables(self) -> Vec<SymbolicVariable> {
        self.variables
    }

    fn walk(&mut self, expr: &ExprRef) {
        if self.walked.get(expr).is_some() {
            return;
        }
        self.walked.insert(expr, ());
        expr.accept(self);
    }
}

impl ExpressionVisitor for VariableCollector {
    type Output = ();

    fn visit_variable(&mut self, variable: &SymbolicVariable) {
        if self.seen.insert(variable.name().to_string()) {
            self.variables.push(variable.clone());
        }
    }

    fn visit_int_constant(&mut self, _value: i64) {}

    fn visit_float_constant(&mut self, _value: f64) {}

    fn visit_bool_constant(&mut self, _value: bool) {}

    fn visit_binary_op(&mut self, op: &BinaryOperation) {
        self.walk(op.left());
        self.walk(op.right());
    }

    fn visit_logical_op(&mut self, op: &LogicalOperation) {
        for operand in op.operands() {
            self.walk(operand);
        }
    }

    fn visit_unary_op(&mut self, op: &UnaryOperation) {
        self.walk(op.operand());
    }

    fn visit_array_select(&mut self, select: &ArraySelect) {
        self.walk(select.array());
        self.walk(select.index());
    }

    fn visit_array_store(&mut self, store: &ArrayStore) {
        self.walk(store.array());
        self.walk(store.index());
        self.walk(store.value());
    }

    fn visit_function(&mut self, _function: &Function) {}

    fn visit_function_call(&mut self, call: &FunctionCall) {
        for arg in call.args() {
            self.walk(arg);
        }
    }

    fn visit_conditional(&mut self, conditional: &ConditionalExpression) {
        self.walk(conditional.condition());
        self.walk(conditional.then_branch());
        self.walk(conditional.else_branch());
    }

    fn visit_field_read(&mut self, read: &FieldRead) {
        self.walk(read.raw_value());
    }

    fn visit_field_write(&mut self, write: &FieldWrite) {
        self.walk(write.raw_value());
    }

    fn visit_ref(&mut self, reference: &Ref) {
        self.walk(reference.deref());
    }
}
