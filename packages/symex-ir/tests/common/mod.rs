//! Common test utilities for symex-ir
//!
//! Fixtures and assertions shared by the integration tests.

#![allow(dead_code)]

use symex_ir::{
    ConcreteArray, ConcreteValue, ExprRef, GenericType, MemoryPort, Model, ModelEvaluator, Ref,
    SelectStoreSimplifier, SymbolicExpression, SymbolicMemory, ValueKind,
};

/// Allocate a fresh int array
pub fn int_array(memory: &mut SymbolicMemory) -> Ref {
    memory
        .allocate(ValueKind::Array, None, Some(&GenericType::int()))
        .unwrap()
}

pub fn object(memory: &mut SymbolicMemory, schema: &str) -> Ref {
    memory.allocate(ValueKind::Object, Some(schema), None).unwrap()
}

pub fn int(value: i64) -> ExprRef {
    SymbolicExpression::int(value)
}

/// Solver-facing term of a field access
pub fn raw(expr: &ExprRef) -> ExprRef {
    match expr.as_ref() {
        SymbolicExpression::FieldRead(read) => read.raw_value().clone(),
        SymbolicExpression::FieldWrite(write) => write.raw_value().clone(),
        _ => expr.clone(),
    }
}

pub fn eval(model: &Model, expr: &ExprRef) -> ConcreteValue {
    ModelEvaluator::new(model).evaluate(expr).unwrap()
}

/// Address chain in which every unbound address maps to `slot`
pub fn all_addresses_to(slot: i64) -> ConcreteValue {
    ConcreteValue::Array(ConcreteArray::constant(ConcreteValue::Int(slot)))
}

/// Assert that read-over-write simplification reduces `expr` to `expected`
pub fn assert_reduces_to(expr: &ExprRef, expected: i64) {
    let simplified = SelectStoreSimplifier::simplify(expr);
    assert_eq!(
        simplified.as_int(),
        Some(expected),
        "'{}' simplified to '{}'",
        expr,
        simplified
    );
}

/// Assert that simplification leaves a select the solver must decide
pub fn assert_unresolved(expr: &ExprRef) {
    let simplified = SelectStoreSimplifier::simplify(expr);
    assert!(
        matches!(simplified.as_ref(), SymbolicExpression::ArraySelect(_)),
        "'{}' unexpectedly simplified to '{}'",
        expr,
        simplified
    );
}
