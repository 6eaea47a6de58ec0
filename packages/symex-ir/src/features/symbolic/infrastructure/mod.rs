//! Symbolic Infrastructure - traversal protocol and its in-crate consumers

pub mod collector;
pub mod evaluator;
pub mod simplifier;
pub mod visitor;

pub use collector::VariableCollector;
pub use evaluator::{ConcreteArray, ConcreteValue, EvalError, EvalResult, Model, ModelEvaluator};
pub use simplifier::SelectStoreSimplifier;
pub use visitor::{ExpressionVisitor, NodeCache};
