//! Symbolic Expression AST
//!
//! Closed set of expression nodes. Nodes are immutable once built and shared
//! through [`ExprRef`], so a store chain is a DAG whose every step points at a
//! strictly earlier array.
//!
//! ## Construction
//!
//! - Type-checked constructors (`BinaryOperation::new`, `LogicalOperation::new`,
//!   `UnaryOperation::new`, `ConditionalExpression::new`, `FunctionCall::new`)
//!   return `None` when the operands are ill-typed.
//! - Array nodes (`ArraySelect::new`, `ArrayStore::new`) take the element type
//!   of their array operand once, at construction, and fail with a
//!   [`ProvenanceError`] when the operand carries none.
//!
//! ## Element types
//!
//! Every Array-kind node answers [`SymbolicExpression::element_type`]. Seeds
//! are typed variables; stores inherit from their array; selects from an
//! array of arrays take the nested descriptor; field reads take the field type.

use super::operators::{BinaryOperator, LogicalOperator, UnaryOperator};
use super::reference::Ref;
use super::types::{FieldType, GenericType, SchemaName, ValueKind};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Shared, immutable handle to an expression node
pub type ExprRef = Arc<SymbolicExpression>;

/// Failure to type an array-theory node
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvenanceError {
    #[error("expected an array operand, found {kind} in '{expr}'")]
    NotAnArray { kind: ValueKind, expr: String },

    #[error("array chain '{expr}' is not rooted in a typed seed")]
    UntypedArrayChain { expr: String },

    #[error("array index must be int, found {kind} in '{expr}'")]
    NonIntegerIndex { kind: ValueKind, expr: String },

    #[error("array of {expected} cannot store {found} value '{expr}'")]
    ElementKindMismatch {
        expected: ValueKind,
        found: ValueKind,
        expr: String,
    },
}

// ═══════════════════════════════════════════════════════════════════════════
// Expression Enum
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolicExpression {
    Variable(SymbolicVariable),
    IntConstant(i64),
    FloatConstant(f64),
    BoolConstant(bool),
    BinaryOp(BinaryOperation),
    LogicalOp(LogicalOperation),
    UnaryOp(UnaryOperation),
    ArraySelect(ArraySelect),
    ArrayStore(ArrayStore),
    Function(Function),
    FunctionCall(FunctionCall),
    Conditional(ConditionalExpression),
    FieldRead(FieldRead),
    FieldWrite(FieldWrite),
    Ref(Ref),
}

impl SymbolicExpression {
    pub fn int(value: i64) -> ExprRef {
        Arc::new(Self::IntConstant(value))
    }

    pub fn float(value: f64) -> ExprRef {
        Arc::new(Self::FloatConstant(value))
    }

    pub fn boolean(value: bool) -> ExprRef {
        Arc::new(Self::BoolConstant(value))
    }

    /// Untyped-element variable (scalar unknown)
    pub fn variable(name: impl Into<String>, kind: ValueKind) -> ExprRef {
        Arc::new(Self::Variable(SymbolicVariable::new(name, kind)))
    }

    /// Array variable whose elements are described by `element`
    pub fn array_variable(name: impl Into<String>, element: GenericType) -> ExprRef {
        Arc::new(Self::Variable(SymbolicVariable::array(name, element)))
    }

    pub fn binary(left: ExprRef, right: ExprRef, op: BinaryOperator) -> Option<ExprRef> {
        BinaryOperation::new(left, right, op).map(|node| Arc::new(Self::BinaryOp(node)))
    }

    pub fn logical(operands: Vec<ExprRef>, op: LogicalOperator) -> Option<ExprRef> {
        LogicalOperation::new(operands, op).map(|node| Arc::new(Self::LogicalOp(node)))
    }

    pub fn unary(operand: ExprRef, op: UnaryOperator) -> Option<ExprRef> {
        UnaryOperation::new(operand, op).map(|node| Arc::new(Self::UnaryOp(node)))
    }

    pub fn conditional(
        condition: ExprRef,
        then_branch: ExprRef,
        else_branch: ExprRef,
    ) -> Option<ExprRef> {
        ConditionalExpression::new(condition, then_branch, else_branch)
            .map(|node| Arc::new(Self::Conditional(node)))
    }

    pub fn call(function: Arc<Function>, args: Vec<ExprRef>) -> Option<ExprRef> {
        FunctionCall::new(function, args).map(|node| Arc::new(Self::FunctionCall(node)))
    }

    /// `array[index]`
    pub fn select(array: ExprRef, index: ExprRef) -> Result<ExprRef, ProvenanceError> {
        ArraySelect::new(array, index).map(|node| Arc::new(Self::ArraySelect(node)))
    }

    /// `(array[index] = value)`
    pub fn store(
        array: ExprRef,
        index: ExprRef,
        value: ExprRef,
    ) -> Result<ExprRef, ProvenanceError> {
        ArrayStore::new(array, index, value).map(|node| Arc::new(Self::ArrayStore(node)))
    }

    /// Wrap this node in a shared handle
    pub fn shared(self) -> ExprRef {
        Arc::new(self)
    }

    /// Value category of this expression
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Variable(v) => v.kind(),
            Self::IntConstant(_) => ValueKind::Int,
            Self::FloatConstant(_) => ValueKind::Float,
            Self::BoolConstant(_) => ValueKind::Bool,
            Self::BinaryOp(op) => op.kind(),
            Self::LogicalOp(_) => ValueKind::Bool,
            Self::UnaryOp(op) => op.kind(),
            Self::ArraySelect(sel) => sel.kind(),
            Self::ArrayStore(_) => ValueKind::Array,
            Self::Function(func) => func.kind(),
            Self::FunctionCall(call) => call.kind(),
            Self::Conditional(cond) => cond.kind(),
            Self::FieldRead(read) => read.kind(),
            Self::FieldWrite(write) => write.kind(),
            Self::Ref(_) => ValueKind::Ref,
        }
    }

    /// Element type of an Array-kind expression
    pub fn element_type(&self) -> Option<&GenericType> {
        if self.kind() != ValueKind::Array {
            return None;
        }

        match self {
            Self::Variable(v) => v.generic(),
            Self::ArraySelect(sel) => sel.value_type().nested(),
            Self::ArrayStore(st) => Some(st.element_type()),
            Self::Function(func) => func.return_type().nested(),
            Self::FunctionCall(call) => call.function().return_type().nested(),
            Self::Conditional(cond) => cond.then_branch().element_type(),
            Self::FieldRead(read) => read.field_type().generic(),
            Self::FieldWrite(write) => write.value().element_type(),
            _ => None,
        }
    }

    /// Schema of an object-valued expression
    pub fn object_schema(&self) -> Option<&str> {
        match self {
            Self::Variable(v) => v.object_schema(),
            Self::Ref(r) => r.object_schema(),
            Self::FieldRead(read) => read.field_type().object_schema(),
            Self::Conditional(cond) => cond.then_branch().object_schema(),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::IntConstant(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::BoolConstant(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(
            self,
            Self::IntConstant(_) | Self::FloatConstant(_) | Self::BoolConstant(_)
        )
    }
}

impl fmt::Display for SymbolicExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable(v) => f.write_str(v.name()),
            Self::IntConstant(v) => write!(f, "{}", v),
            Self::FloatConstant(v) => write!(f, "{:.6}", v),
            Self::BoolConstant(v) => write!(f, "{}", v),
            Self::BinaryOp(op) => write!(f, "({} {} {})", op.left, op.operator, op.right),
            Self::LogicalOp(op) => fmt::Display::fmt(op, f),
            Self::UnaryOp(op) => {
                if op.operator.is_prefix() {
                    write!(f, "{}{}", op.operator, op.operand)
                } else {
                    write!(f, "{}{}", op.operand, op.operator)
                }
            }
            Self::ArraySelect(sel) => write!(f, "{}[{}]", sel.array, sel.index),
            Self::ArrayStore(st) => write!(f, "({}[{}] = {})", st.array, st.index, st.value),
            Self::Function(func) => fmt::Display::fmt(func, f),
            Self::FunctionCall(call) => {
                write!(f, "{}(", call.function.name())?;
                write_joined(f, &call.args, ", ")?;
                f.write_str(")")
            }
            Self::Conditional(cond) => write!(
                f,
                "({} ? {} : {})",
                cond.condition, cond.then_branch, cond.else_branch
            ),
            Self::FieldRead(read) => write!(f, "{}.{}", read.object, read.field_index),
            Self::FieldWrite(write) => {
                write!(f, "{}.{} = {}", write.object, write.field_index, write.value)
            }
            Self::Ref(r) => fmt::Display::fmt(r, f),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[ExprRef], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// Leaves
// ═══════════════════════════════════════════════════════════════════════════

/// Named symbolic unknown, also used as the seed of every memory pool
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolicVariable {
    name: String,
    kind: ValueKind,
    generic: Option<GenericType>,
    object_schema: Option<SchemaName>,
}

impl SymbolicVariable {
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            generic: None,
            object_schema: None,
        }
    }

    /// Array-kind variable with element type `element`
    pub fn array(name: impl Into<String>, element: GenericType) -> Self {
        Self {
            name: name.into(),
            kind: ValueKind::Array,
            generic: Some(element),
            object_schema: None,
        }
    }

    /// Object- or Ref-kind variable bound to `schema`
    pub fn object(name: impl Into<String>, kind: ValueKind, schema: impl Into<SchemaName>) -> Self {
        Self {
            name: name.into(),
            kind,
            generic: None,
            object_schema: Some(schema.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Element type, for array variables
    pub fn generic(&self) -> Option<&GenericType> {
        self.generic.as_ref()
    }

    pub fn object_schema(&self) -> Option<&str> {
        self.object_schema.as_deref()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Operations
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOperation {
    left: ExprRef,
    right: ExprRef,
    operator: BinaryOperator,
}

impl BinaryOperation {
    /// Refused when operand kinds differ, when ADD/SUB/MUL/DIV meet Bool or
    /// Array operands, or when MOD meets Float, Bool or Array operands.
    pub fn new(left: ExprRef, right: ExprRef, operator: BinaryOperator) -> Option<Self> {
        let kind = left.kind();
        if kind != right.kind() {
            return None;
        }

        let refused = match operator {
            BinaryOperator::Add
            | BinaryOperator::Sub
            | BinaryOperator::Mul
            | BinaryOperator::Div => matches!(kind, ValueKind::Bool | ValueKind::Array),
            BinaryOperator::Mod => {
                matches!(kind, ValueKind::Float | ValueKind::Bool | ValueKind::Array)
            }
            _ => false,
        };
        if refused {
            return None;
        }

        Some(Self {
            left,
            right,
            operator,
        })
    }

    pub fn left(&self) -> &ExprRef {
        &self.left
    }

    pub fn right(&self) -> &ExprRef {
        &self.right
    }

    pub fn operator(&self) -> BinaryOperator {
        self.operator
    }

    pub fn kind(&self) -> ValueKind {
        if self.operator.is_arithmetic() {
            self.left.kind()
        } else {
            ValueKind::Bool
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogicalOperation {
    operands: Vec<ExprRef>,
    operator: LogicalOperator,
}

impl LogicalOperation {
    /// Refused when any operand is not Bool, or when NOT/IMPLIES get the
    /// wrong operand count (1 and 2 respectively).
    pub fn new(operands: Vec<ExprRef>, operator: LogicalOperator) -> Option<Self> {
        if operands.iter().any(|e| e.kind() != ValueKind::Bool) {
            return None;
        }
        if let Some(arity) = operator.arity() {
            if operands.len() != arity {
                return None;
            }
        }

        Some(Self { operands, operator })
    }

    pub fn not(operand: ExprRef) -> Option<Self> {
        Self::new(vec![operand], LogicalOperator::Not)
    }

    pub fn and(operands: Vec<ExprRef>) -> Option<Self> {
        Self::new(operands, LogicalOperator::And)
    }

    pub fn or(operands: Vec<ExprRef>) -> Option<Self> {
        Self::new(operands, LogicalOperator::Or)
    }

    pub fn implies(premise: ExprRef, conclusion: ExprRef) -> Option<Self> {
        Self::new(vec![premise, conclusion], LogicalOperator::Implies)
    }

    pub fn operands(&self) -> &[ExprRef] {
        &self.operands
    }

    pub fn operator(&self) -> LogicalOperator {
        self.operator
    }
}

impl fmt::Display for LogicalOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operator {
            LogicalOperator::Not => write!(f, "!{}", self.operands[0]),
            LogicalOperator::And | LogicalOperator::Or => {
                f.write_str("(")?;
                let sep = format!(" {} ", self.operator);
                write_joined(f, &self.operands, &sep)?;
                f.write_str(")")
            }
            LogicalOperator::Implies => {
                write!(f, "({} => {})", self.operands[0], self.operands[1])
            }
        }
    }
}

impl From<LogicalOperation> for SymbolicExpression {
    fn from(op: LogicalOperation) -> Self {
        Self::LogicalOp(op)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOperation {
    operand: ExprRef,
    operator: UnaryOperator,
}

impl UnaryOperation {
    /// PLUS/MINUS need Int or Float; CARET, INCREMENT and DECREMENT need Int.
    pub fn new(operand: ExprRef, operator: UnaryOperator) -> Option<Self> {
        let accepted = match operator {
            UnaryOperator::Plus | UnaryOperator::Minus => operand.kind().is_numeric(),
            UnaryOperator::Caret | UnaryOperator::Increment | UnaryOperator::Decrement => {
                operand.kind() == ValueKind::Int
            }
        };

        accepted.then_some(Self { operand, operator })
    }

    pub fn operand(&self) -> &ExprRef {
        &self.operand
    }

    pub fn operator(&self) -> UnaryOperator {
        self.operator
    }

    pub fn kind(&self) -> ValueKind {
        self.operand.kind()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Array Theory
// ═══════════════════════════════════════════════════════════════════════════

fn array_element(array: &ExprRef) -> Result<GenericType, ProvenanceError> {
    if array.kind() != ValueKind::Array {
        return Err(ProvenanceError::NotAnArray {
            kind: array.kind(),
            expr: array.to_string(),
        });
    }

    array
        .element_type()
        .cloned()
        .ok_or_else(|| ProvenanceError::UntypedArrayChain {
            expr: array.to_string(),
        })
}

fn check_index(index: &ExprRef) -> Result<(), ProvenanceError> {
    if index.kind() != ValueKind::Int {
        return Err(ProvenanceError::NonIntegerIndex {
            kind: index.kind(),
            expr: index.to_string(),
        });
    }
    Ok(())
}

/// `array[index]`
#[derive(Debug, Clone, PartialEq)]
pub struct ArraySelect {
    array: ExprRef,
    index: ExprRef,
    value_type: GenericType,
}

impl ArraySelect {
    pub fn new(array: ExprRef, index: ExprRef) -> Result<Self, ProvenanceError> {
        let value_type = array_element(&array)?;
        check_index(&index)?;

        if value_type.kind == ValueKind::Array && value_type.nested().is_none() {
            return Err(ProvenanceError::UntypedArrayChain {
                expr: array.to_string(),
            });
        }

        Ok(Self {
            array,
            index,
            value_type,
        })
    }

    pub fn array(&self) -> &ExprRef {
        &self.array
    }

    pub fn index(&self) -> &ExprRef {
        &self.index
    }

    /// Type of the selected element
    pub fn value_type(&self) -> &GenericType {
        &self.value_type
    }

    pub fn kind(&self) -> ValueKind {
        self.value_type.kind
    }
}

/// `(array[index] = value)`, a new array; `array` is left untouched
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayStore {
    array: ExprRef,
    index: ExprRef,
    value: ExprRef,
    element: GenericType,
}

impl ArrayStore {
    pub fn new(array: ExprRef, index: ExprRef, value: ExprRef) -> Result<Self, ProvenanceError> {
        let element = array_element(&array)?;
        check_index(&index)?;

        if value.kind() != element.kind {
            return Err(ProvenanceError::ElementKindMismatch {
                expected: element.kind,
                found: value.kind(),
                expr: value.to_string(),
            });
        }

        Ok(Self {
            array,
            index,
            value,
            element,
        })
    }

    pub fn array(&self) -> &ExprRef {
        &self.array
    }

    pub fn index(&self) -> &ExprRef {
        &self.index
    }

    pub fn value(&self) -> &ExprRef {
        &self.value
    }

    pub fn element_type(&self) -> &GenericType {
        &self.element
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Functions and Conditionals
// ═══════════════════════════════════════════════════════════════════════════

/// Uninterpreted function declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    name: String,
    parameters: Vec<SymbolicVariable>,
    return_type: GenericType,
}

impl Function {
    pub fn new(
        name: impl Into<String>,
        parameters: Vec<SymbolicVariable>,
        return_type: GenericType,
    ) -> Self {
        Self {
            name: name.into(),
            parameters,
            return_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[SymbolicVariable] {
        &self.parameters
    }

    pub fn return_type(&self) -> &GenericType {
        &self.return_type
    }

    pub fn kind(&self) -> ValueKind {
        self.return_type.kind
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<&str> = self.parameters.iter().map(SymbolicVariable::name).collect();
        write!(f, "{} {}({})", self.return_type, self.name, params.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    function: Arc<Function>,
    args: Vec<ExprRef>,
}

impl FunctionCall {
    /// Refused on arity mismatch or when an argument kind differs from its parameter
    pub fn new(function: Arc<Function>, args: Vec<ExprRef>) -> Option<Self> {
        if args.len() != function.parameters.len() {
            return None;
        }
        let matches = args
            .iter()
            .zip(function.parameters.iter())
            .all(|(arg, param)| arg.kind() == param.kind());
        if !matches {
            return None;
        }

        Some(Self { function, args })
    }

    pub fn function(&self) -> &Function {
        &self.function
    }

    /// Shared handle to the called function
    pub fn function_handle(&self) -> Arc<Function> {
        Arc::clone(&self.function)
    }

    pub fn args(&self) -> &[ExprRef] {
        &self.args
    }

    pub fn kind(&self) -> ValueKind {
        self.function.kind()
    }
}

/// `(condition ? then : else)`
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpression {
    condition: ExprRef,
    then_branch: ExprRef,
    else_branch: ExprRef,
}

impl ConditionalExpression {
    /// Refused when the condition is not Bool or the branches differ in kind,
    /// in element type (arrays) or in schema (objects and references)
    pub fn new(condition: ExprRef, then_branch: ExprRef, else_branch: ExprRef) -> Option<Self> {
        if condition.kind() != ValueKind::Bool || then_branch.kind() != else_branch.kind() {
            return None;
        }
        if then_branch.element_type() != else_branch.element_type()
            || then_branch.object_schema() != else_branch.object_schema()
        {
            return None;
        }

        Some(Self {
            condition,
            then_branch,
            else_branch,
        })
    }

    pub fn condition(&self) -> &ExprRef {
        &self.condition
    }

    pub fn then_branch(&self) -> &ExprRef {
        &self.then_branch
    }

    pub fn else_branch(&self) -> &ExprRef {
        &self.else_branch
    }

    pub fn kind(&self) -> ValueKind {
        self.then_branch.kind()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Object Fields
// ═══════════════════════════════════════════════════════════════════════════

/// `obj.index`, backed by a select from the field's slot array
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRead {
    object: ExprRef,
    field_index: usize,
    field_type: FieldType,
    raw_value: ExprRef,
}

impl FieldRead {
    pub fn new(
        object: ExprRef,
        field_index: usize,
        field_type: FieldType,
        raw_value: ExprRef,
    ) -> Self {
        Self {
            object,
            field_index,
            field_type,
            raw_value,
        }
    }

    pub fn object(&self) -> &ExprRef {
        &self.object
    }

    pub fn field_index(&self) -> usize {
        self.field_index
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    /// Solver-facing select expression
    pub fn raw_value(&self) -> &ExprRef {
        &self.raw_value
    }

    pub fn kind(&self) -> ValueKind {
        self.field_type.kind()
    }
}

impl From<FieldRead> for SymbolicExpression {
    fn from(read: FieldRead) -> Self {
        Self::FieldRead(read)
    }
}

/// `obj.index = value`, carrying the field's slot array after the store
#[derive(Debug, Clone, PartialEq)]
pub struct FieldWrite {
    object: ExprRef,
    field_index: usize,
    value: ExprRef,
    raw_value: ExprRef,
}

impl FieldWrite {
    pub fn new(object: ExprRef, field_index: usize, value: ExprRef, raw_value: ExprRef) -> Self {
        Self {
            object,
            field_index,
            value,
            raw_value,
        }
    }

    pub fn object(&self) -> &ExprRef {
        &self.object
    }

    pub fn field_index(&self) -> usize {
        self.field_index
    }

    pub fn value(&self) -> &ExprRef {
        &self.value
    }

    /// Slot array produced by the store
    pub fn raw_value(&self) -> &ExprRef {
        &self.raw_value
    }

    pub fn kind(&self) -> ValueKind {
        self.value.kind()
    }
}

impl From<FieldWrite> for SymbolicExpression {
    fn from(write: FieldWrite) -> Self {
        Self::FieldWrite(write)
    }
}
