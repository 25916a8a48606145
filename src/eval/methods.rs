//! Aggregation methods and their operator parameters.

use crate::value::{norm_max, norm_none, norm_sum};

/// Folds a slice of memberships or weights into one number.
pub type Operator = fn(&[f64]) -> f64;

/// Rescales a distribution.
pub type Normalization = fn(&[f64]) -> Vec<f64>;

/// The four aggregation semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvalMethod {
    /// Crisp set semantics: every reachable output value is possible.
    #[default]
    Set,
    /// Probabilistic: product conjunction, sum disjunction, sum-normalized.
    Prob,
    /// Fuzzy (possibilistic): min conjunction, max disjunction.
    Fuzzy,
    /// Fuzzy with max-normalized results.
    FuzzyNorm,
}

impl EvalMethod {
    pub const ALL: [EvalMethod; 4] = [
        EvalMethod::Set,
        EvalMethod::Prob,
        EvalMethod::Fuzzy,
        EvalMethod::FuzzyNorm,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EvalMethod::Set => "set",
            EvalMethod::Prob => "prob",
            EvalMethod::Fuzzy => "fuzzy",
            EvalMethod::FuzzyNorm => "fuzzynorm",
        }
    }

    pub fn from_name(name: &str) -> Option<EvalMethod> {
        EvalMethod::ALL.iter().copied().find(|m| m.name() == name)
    }

    /// The method's default operator set.
    pub fn parameters(&self) -> EvalParameters {
        match self {
            EvalMethod::Set => EvalParameters {
                method: *self,
                and_op: op_const_zero,
                or_op: op_const_one,
                norm: norm_none,
            },
            EvalMethod::Prob => EvalParameters {
                method: *self,
                and_op: op_product,
                or_op: op_sum,
                norm: norm_sum,
            },
            EvalMethod::Fuzzy => EvalParameters {
                method: *self,
                and_op: op_min,
                or_op: op_max,
                norm: norm_none,
            },
            EvalMethod::FuzzyNorm => EvalParameters {
                method: *self,
                and_op: op_min,
                or_op: op_max,
                norm: norm_max,
            },
        }
    }
}

/// Operators driving distribution aggregation: conjunction over input
/// memberships, disjunction when accumulating outputs, and the final
/// normalization of evaluated distributions.
#[derive(Debug, Clone, Copy)]
pub struct EvalParameters {
    pub method: EvalMethod,
    pub and_op: Operator,
    pub or_op: Operator,
    pub norm: Normalization,
}

impl EvalParameters {
    pub fn with_and_op(mut self, and_op: Operator) -> EvalParameters {
        self.and_op = and_op;
        self
    }

    pub fn with_or_op(mut self, or_op: Operator) -> EvalParameters {
        self.or_op = or_op;
        self
    }

    pub fn with_norm(mut self, norm: Normalization) -> EvalParameters {
        self.norm = norm;
        self
    }
}

fn op_const_zero(_: &[f64]) -> f64 {
    0.0
}

fn op_const_one(_: &[f64]) -> f64 {
    1.0
}

fn op_product(vals: &[f64]) -> f64 {
    vals.iter().product()
}

fn op_sum(vals: &[f64]) -> f64 {
    vals.iter().sum()
}

fn op_min(vals: &[f64]) -> f64 {
    vals.iter().copied().fold(f64::INFINITY, f64::min)
}

fn op_max(vals: &[f64]) -> f64 {
    vals.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
