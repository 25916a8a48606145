//! Aggregation and discretization functions attached to aggregate attributes.

mod discretize;
mod tabular;

pub use discretize::{is_in_range, BoundAssoc, DiscretizeFunction};
pub use tabular::{decode_rule_chars, encode_rule_chars, FunctionError, TabularFunction};

use thiserror::Error;

use crate::value::Value;

/// A function argument vector lies outside the declared dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("arguments {args:?} are outside the function dimensions {dim:?}")]
pub struct DomainError {
    pub args: Vec<usize>,
    pub dim: Vec<usize>,
}

/// Either kind of attribute function.
#[derive(Debug, Clone, PartialEq)]
pub enum Function {
    Tabular(TabularFunction),
    Discretize(DiscretizeFunction),
}

impl Function {
    /// Number of arguments the function expects.
    pub fn nargs(&self) -> usize {
        match self {
            Function::Tabular(f) => f.nargs(),
            Function::Discretize(_) => 1,
        }
    }

    /// Number of defined output cells.
    pub fn nvals(&self) -> usize {
        match self {
            Function::Tabular(f) => f.nvals(),
            Function::Discretize(f) => f.nvals(),
        }
    }

    /// One-line summary of the function.
    pub fn funct_str(&self) -> String {
        match self {
            Function::Tabular(f) => f.funct_str(),
            Function::Discretize(f) => f.funct_str(),
        }
    }

    /// Looks up a discrete argument vector, degrading any failure to
    /// [`Value::Unknown`]. Discretize functions take their single argument
    /// as an index coerced to a float.
    pub fn try_value(&self, args: &[usize]) -> Value {
        match self {
            Function::Tabular(f) => f.try_value(args),
            Function::Discretize(f) => match args {
                [x] => f.value(*x as f64),
                _ => Value::Unknown,
            },
        }
    }
}
