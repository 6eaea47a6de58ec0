//! Concrete evaluation under a model
//!
//! Interprets an expression the way an array-theory solver would under a
//! satisfying assignment: scalars are machine values, arrays are total maps
//! given by a default plus finitely many explicit entries.
//!
//! Variables missing from the [`Model`] take the zero of their type, so an
//! unconstrained seed array reads as all zeros.

use super::visitor::{ExpressionVisitor, NodeCache};
use crate::features::symbolic::domain::{
    ArraySelect, ArrayStore, BinaryOperation, BinaryOperator, ConditionalExpression, ExprRef,
    FieldRead, FieldWrite, Function, FunctionCall, GenericType, LogicalOperation,
    LogicalOperator, Ref, SymbolicExpression, SymbolicVariable, UnaryOperation, UnaryOperator,
    ValueKind,
};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("division by zero in '{expr}'")]
    DivisionByZero { expr: String },

    #[error("cannot evaluate {what}")]
    Unsupported { what: String },

    #[error("function '{name}' is uninterpreted")]
    UninterpretedFunction { name: String },

    #[error("type error: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
}

pub type EvalResult<T> = Result<T, EvalError>;

// ═══════════════════════════════════════════════════════════════════════════
// Values
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum ConcreteValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Array(ConcreteArray),
}

impl ConcreteValue {
    /// Zero of `kind`; only scalar kinds have one
    pub fn zero(kind: ValueKind) -> Option<Self> {
        match kind {
            ValueKind::Int | ValueKind::Ref => Some(Self::Int(0)),
            ValueKind::Float => Some(Self::Float(0.0)),
            ValueKind::Bool => Some(Self::Bool(false)),
            ValueKind::Array | ValueKind::Object => None,
        }
    }

    /// Zero of an element descriptor, recursing into nested arrays
    pub fn zero_of(generic: &GenericType) -> EvalResult<Self> {
        match generic.kind {
            ValueKind::Array => {
                let nested = generic.nested().ok_or_else(|| EvalError::Unsupported {
                    what: format!("array element '{}' without nested type", generic),
                })?;
                Ok(Self::Array(ConcreteArray::constant(Self::zero_of(nested)?)))
            }
            kind => Self::zero(kind).ok_or_else(|| EvalError::Unsupported {
                what: format!("{} value", kind),
            }),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Bool(_) => ValueKind::Bool,
            Self::Array(_) => ValueKind::Array,
        }
    }

    pub fn as_int(&self) -> EvalResult<i64> {
        match self {
            Self::Int(v) => Ok(*v),
            other => Err(mismatch("int", other)),
        }
    }

    pub fn as_bool(&self) -> EvalResult<bool> {
        match self {
            Self::Bool(v) => Ok(*v),
            other => Err(mismatch("bool", other)),
        }
    }

    pub fn as_array(&self) -> EvalResult<&ConcreteArray> {
        match self {
            Self::Array(a) => Ok(a),
            other => Err(mismatch("array", other)),
        }
    }

    /// Equality as the array theory sees it: arrays compare pointwise
    pub fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Array(a), Self::Array(b)) => a.same_as(b),
            _ => self == other,
        }
    }
}

impl fmt::Display for ConcreteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{:.6}", v),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Array(a) => fmt::Display::fmt(a, f),
        }
    }
}

fn mismatch(expected: &str, found: &ConcreteValue) -> EvalError {
    EvalError::TypeMismatch {
        expected: expected.to_string(),
        found: found.kind().to_string(),
    }
}

/// Total map from index to value: `default` everywhere except `entries`
#[derive(Debug, Clone, PartialEq)]
pub struct ConcreteArray {
    default: Box<ConcreteValue>,
    entries: BTreeMap<i64, ConcreteValue>,
}

impl ConcreteArray {
    pub fn constant(default: ConcreteValue) -> Self {
        Self {
            default: Box::new(default),
            entries: BTreeMap::new(),
        }
    }

    /// Builder-style explicit entry
    pub fn with(mut self, index: i64, value: ConcreteValue) -> Self {
        self.entries.insert(index, value);
        self
    }

    pub fn get(&self, index: i64) -> &ConcreteValue {
        self.entries.get(&index).unwrap_or(self.default_value())
    }

    /// Functional update
    pub fn store(&self, index: i64, value: ConcreteValue) -> Self {
        self.clone().with(index, value)
    }

    pub fn default_value(&self) -> &ConcreteValue {
        &self.default
    }

    fn same_as(&self, other: &Self) -> bool {
        self.default.same_as(&other.default)
            && self
                .entries
                .keys()
                .chain(other.entries.keys())
                .all(|i| self.get(*i).same_as(other.get(*i)))
    }
}

impl fmt::Display for ConcreteArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in &self.entries {
            write!(f, "{} -> {}, ", i, value)?;
        }
        write!(f, "else -> {}]", self.default)
    }
}

/// Assignment of concrete values to variable names
#[derive(Debug, Clone, Default)]
pub struct Model {
    values: FxHashMap<String, ConcreteValue>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: ConcreteValue) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ConcreteValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ConcreteValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Evaluator
// ═══════════════════════════════════════════════════════════════════════════

pub struct ModelEvaluator<'m> {
    model: &'m Model,
    values: NodeCache<ConcreteValue>,
}

impl<'m> ModelEvaluator<'m> {
    pub fn new(model: &'m Model) -> Self {
        Self {
            model,
            values: NodeCache::new(),
        }
    }

    pub fn evaluate(&mut self, expr: &SymbolicExpression) -> EvalResult<ConcreteValue> {
        expr.accept(self)
    }

    fn value_of(&mut self, expr: &ExprRef) -> EvalResult<ConcreteValue> {
        if let Some(value) = self.values.get(expr) {
            return Ok(value);
        }
        let value = expr.accept(self)?;
        self.values.insert(expr, value.clone());
        Ok(value)
    }

    fn arithmetic(
        &self,
        op: &BinaryOperation,
        l: ConcreteValue,
        r: ConcreteValue,
    ) -> EvalResult<ConcreteValue> {
        let div_zero = || EvalError::DivisionByZero {
            expr: SymbolicExpression::BinaryOp(op.clone()).to_string(),
        };

        match (l, r) {
            (ConcreteValue::Int(a), ConcreteValue::Int(b)) => {
                let v = match op.operator() {
                    BinaryOperator::Add => a.wrapping_add(b),
                    BinaryOperator::Sub => a.wrapping_sub(b),
                    BinaryOperator::Mul => a.wrapping_mul(b),
                    BinaryOperator::Div if b == 0 => return Err(div_zero()),
                    BinaryOperator::Div => a.wrapping_div_euclid(b),
                    BinaryOperator::Mod if b == 0 => return Err(div_zero()),
                    BinaryOperator::Mod => a.wrapping_rem_euclid(b),
                    other => {
                        return Err(EvalError::Unsupported {
                            what: format!("'{}' as arithmetic", other),
                        })
                    }
                };
                Ok(ConcreteValue::Int(v))
            }
            (ConcreteValue::Float(a), ConcreteValue::Float(b)) => {
                let v = match op.operator() {
                    BinaryOperator::Add => a + b,
                    BinaryOperator::Sub => a - b,
                    BinaryOperator::Mul => a * b,
                    BinaryOperator::Div => a / b,
                    other => {
                        return Err(EvalError::Unsupported {
                            what: format!("'{}' on float", other),
                        })
                    }
                };
                Ok(ConcreteValue::Float(v))
            }
            (l, _) => Err(mismatch("int or float", &l)),
        }
    }

    fn compare(op: BinaryOperator, l: &ConcreteValue, r: &ConcreteValue) -> EvalResult<bool> {
        match op {
            BinaryOperator::Eq => return Ok(l.same_as(r)),
            BinaryOperator::Ne => return Ok(!l.same_as(r)),
            _ => {}
        }

        let ordering = match (l, r) {
            (ConcreteValue::Int(a), ConcreteValue::Int(b)) => Some(a.cmp(b)),
            (ConcreteValue::Float(a), ConcreteValue::Float(b)) => a.partial_cmp(b),
            (ConcreteValue::Bool(a), ConcreteValue::Bool(b)) => Some(a.cmp(b)),
            (l, _) => return Err(mismatch("ordered scalar", l)),
        };
        // NaN compares false under every ordering
        let Some(ordering) = ordering else {
            return Ok(false);
        };

        Ok(match op {
            BinaryOperator::Lt => ordering == Ordering::Less,
            BinaryOperator::Le => ordering != Ordering::Greater,
            BinaryOperator::Gt => ordering == Ordering::Greater,
            BinaryOperator::Ge => ordering != Ordering::Less,
            _ => false,
        })
    }
}

impl ExpressionVisitor for ModelEvaluator<'_> {
    type Output = EvalResult<ConcreteValue>;

    fn visit_variable(&mut self, variable: &SymbolicVariable) -> Self::Output {
        if let Some(value) = self.model.get(variable.name()) {
            return Ok(value.clone());
        }
        match variable.generic() {
            Some(element) if variable.kind() == ValueKind::Array => Ok(ConcreteValue::Array(
                ConcreteArray::constant(ConcreteValue::zero_of(element)?),
            )),
            _ => ConcreteValue::zero(variable.kind()).ok_or_else(|| EvalError::Unsupported {
                what: format!("unassigned {} variable '{}'", variable.kind(), variable.name()),
            }),
        }
    }

    fn visit_int_constant(&mut self, value: i64) -> Self::Output {
        Ok(ConcreteValue::Int(value))
    }

    fn visit_float_constant(&mut self, value: f64) -> Self::Output {
        Ok(ConcreteValue::Float(value))
    }

    fn visit_bool_constant(&mut self, value: bool) -> Self::Output {
        Ok(ConcreteValue::Bool(value))
    }

    fn visit_binary_op(&mut self, op: &BinaryOperation) -> Self::Output {
        let l = self.value_of(op.left())?;
        let r = self.value_of(op.right())?;
        if op.operator().is_arithmetic() {
            self.arithmetic(op, l, r)
        } else {
            Self::compare(op.operator(), &l, &r).map(ConcreteValue::Bool)
        }
    }

    fn visit_logical_op(&mut self, op: &LogicalOperation) -> Self::Output {
        let mut values = Vec::with_capacity(op.operands().len());
        for operand in op.operands() {
            values.push(self.value_of(operand)?.as_bool()?);
        }

        let v = match op.operator() {
            LogicalOperator::And => values.iter().all(|b| *b),
            LogicalOperator::Or => values.iter().any(|b| *b),
            LogicalOperator::Not => !values[0],
            LogicalOperator::Implies => !values[0] || values[1],
        };
        Ok(ConcreteValue::Bool(v))
    }

    fn visit_unary_op(&mut self, op: &UnaryOperation) -> Self::Output {
        let v = self.value_of(op.operand())?;
        match (op.operator(), v) {
            (UnaryOperator::Plus, v) => Ok(v),
            (UnaryOperator::Minus, ConcreteValue::Int(i)) => {
                Ok(ConcreteValue::Int(i.wrapping_neg()))
            }
            (UnaryOperator::Minus, ConcreteValue::Float(x)) => Ok(ConcreteValue::Float(-x)),
            (UnaryOperator::Caret, ConcreteValue::Int(i)) => Ok(ConcreteValue::Int(!i)),
            (UnaryOperator::Increment, ConcreteValue::Int(i)) => {
                Ok(ConcreteValue::Int(i.wrapping_add(1)))
            }
            (UnaryOperator::Decrement, ConcreteValue::Int(i)) => {
                Ok(ConcreteValue::Int(i.wrapping_sub(1)))
            }
            (_, v) => Err(mismatch("int", &v)),
        }
    }

    fn visit_array_select(&mut self, select: &ArraySelect) -> Self::Output {
        let array = self.value_of(select.array())?;
        let index = self.value_of(select.index())?.as_int()?;
        Ok(array.as_array()?.get(index).clone())
    }

    fn visit_array_store(&mut self, store: &ArrayStore) -> Self::Output {
        let array = self.value_of(store.array())?;
        let index = self.value_of(store.index())?.as_int()?;
        let value = self.value_of(store.value())?;
        Ok(ConcreteValue::Array(array.as_array()?.store(index, value)))
    }

    fn visit_function(&mut self, function: &Function) -> Self::Output {
        Err(EvalError::Unsupported {
            what: format!("function declaration '{}'", function.name()),
        })
    }

    fn visit_function_call(&mut self, call: &FunctionCall) -> Self::Output {
        Err(EvalError::UninterpretedFunction {
            name: call.function().name().to_string(),
        })
    }

    fn visit_conditional(&mut self, conditional: &ConditionalExpression) -> Self::Output {
        if self.value_of(conditional.condition())?.as_bool()? {
            self.value_of(conditional.then_branch())
        } else {
            self.value_of(conditional.else_branch())
        }
    }

    fn visit_field_read(&mut self, read: &FieldRead) -> Self::Output {
        self.value_of(read.raw_value())
    }

    fn visit_field_write(&mut self, write: &FieldWrite) -> Self::Output {
        self.value_of(write.value())
    }

    fn visit_ref(&mut self, reference: &Ref) -> Self::Output {
        Ok(ConcreteValue::Int(reference.address()))
    }
}
