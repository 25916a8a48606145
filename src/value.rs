//! The tagged-union representation of DEX values.
//!
//! A value attached to an attribute may be a single scale index, a set of
//! indices, a continuous number, a (possibly sparse) distribution of weights
//! over scale indices, the full-range wildcard, or unknown. Conversions
//! between the set and distribution forms are lossless and order-preserving;
//! [`Value::reduce`] canonicalizes a value to its smallest faithful
//! representation.

use std::collections::{BTreeMap, BTreeSet};

/// Default tolerance used when deciding whether a distribution weight counts
/// as 0.0 or 1.0. Callers with domain-specific tolerances should use the
/// `*_with` variants instead of relying on this constant.
pub const DEFAULT_EPS: f64 = f64::EPSILON;

/// A DEX value.
///
/// `Distribution` weights are indexed by scale value; `Sparse` stores only
/// the non-zero entries. `Wildcard` stands for the owning scale's full range
/// and is resolved during interpretation ([`crate::scale::Scale::interpret`]).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The value is not known or could not be computed.
    Unknown,
    /// A single discrete scale index.
    Index(usize),
    /// A set of discrete scale indices.
    IndexSet(BTreeSet<usize>),
    /// A continuous (floating-point) value.
    Continuous(f64),
    /// A dense weight distribution, one slot per scale index.
    Distribution(Vec<f64>),
    /// A sparse weight distribution, index to weight.
    Sparse(BTreeMap<usize, f64>),
    /// The full range of the owning scale.
    Wildcard,
}

impl Value {
    /// Builds an `IndexSet` from anything iterable over indices.
    pub fn set<I: IntoIterator<Item = usize>>(members: I) -> Value {
        Value::IndexSet(members.into_iter().collect())
    }

    /// Builds a `Distribution` from a weight slice.
    pub fn distr<I: IntoIterator<Item = f64>>(weights: I) -> Value {
        Value::Distribution(weights.into_iter().collect())
    }

    /// Builds a `Sparse` distribution from (index, weight) pairs.
    pub fn sparse<I: IntoIterator<Item = (usize, f64)>>(entries: I) -> Value {
        Value::Sparse(entries.into_iter().collect())
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown)
    }

    /// Returns the index if this is a single-index value.
    pub fn single_index(&self) -> Option<usize> {
        match self {
            Value::Index(i) => Some(*i),
            _ => None,
        }
    }

    /// Converts this value to a set of indices using the default tolerance
    /// and lenient distribution handling.
    ///
    /// See [`Value::as_set_with`].
    pub fn as_set(&self) -> Option<BTreeSet<usize>> {
        self.as_set_with(false, DEFAULT_EPS)
    }

    /// Converts this value to a set of indices.
    ///
    /// - `Index` becomes a singleton, `IndexSet` passes through.
    /// - Distributions convert per `strict`: when lenient, every entry with
    ///   weight greater than `eps` is a member; when strict, entries within
    ///   `eps` of 1.0 are members, entries within `eps` of 0.0 are skipped,
    ///   and any other weight makes the whole conversion fail.
    /// - `Unknown`, `Continuous` and `Wildcard` do not convert.
    ///
    /// # Examples
    ///
    /// ```
    /// use dexeval::value::Value;
    /// let d = Value::distr([0.0, 1.0, 0.5, 1.0]);
    /// assert_eq!(d.as_set_with(true, f64::EPSILON), None);
    /// assert_eq!(d.as_set_with(false, f64::EPSILON), Some([1, 2, 3].into()));
    /// ```
    pub fn as_set_with(&self, strict: bool, eps: f64) -> Option<BTreeSet<usize>> {
        match self {
            Value::Index(i) => Some(BTreeSet::from([*i])),
            Value::IndexSet(s) => Some(s.clone()),
            Value::Distribution(d) => {
                if strict {
                    strict_set(d, eps)
                } else {
                    Some(lenient_set(d, eps))
                }
            }
            Value::Sparse(m) => {
                Value::Distribution(sparse_to_dense(m)).as_set_with(strict, eps)
            }
            _ => None,
        }
    }

    /// Converts this value to a dense distribution.
    ///
    /// `Index` becomes a one-hot vector, `IndexSet` an indicator vector
    /// sized to its maximum member plus one, `Sparse` is densified and
    /// `Distribution` passes through. Other variants do not convert.
    ///
    /// # Examples
    ///
    /// ```
    /// use dexeval::value::Value;
    /// assert_eq!(Value::Index(2).as_distribution(), Some(vec![0.0, 0.0, 1.0]));
    /// assert_eq!(Value::set([1, 2]).as_distribution(), Some(vec![0.0, 1.0, 1.0]));
    /// ```
    pub fn as_distribution(&self) -> Option<Vec<f64>> {
        match self {
            Value::Index(i) => Some(indicator(&BTreeSet::from([*i]))),
            Value::IndexSet(s) => Some(indicator(s)),
            Value::Distribution(d) => Some(d.clone()),
            Value::Sparse(m) => Some(sparse_to_dense(m)),
            _ => None,
        }
    }

    /// Canonicalizes this value to its smallest faithful representation
    /// using the default tolerance.
    ///
    /// See [`Value::reduce_with`].
    pub fn reduce(&self) -> Value {
        self.reduce_with(DEFAULT_EPS)
    }

    /// Canonicalizes this value to its smallest faithful representation.
    ///
    /// - An empty set becomes `Unknown`, a singleton set becomes `Index`.
    /// - A distribution that is a strict 0/1 indicator (within `eps`)
    ///   becomes a set, which is then reduced further.
    /// - A sparse distribution reduces through its dense form.
    /// - Everything else is returned unchanged.
    ///
    /// Reduction is idempotent.
    ///
    /// # Examples
    ///
    /// ```
    /// use dexeval::value::Value;
    /// assert_eq!(Value::set([1]).reduce(), Value::Index(1));
    /// assert_eq!(Value::distr([1.0, 0.0, 1.0]).reduce(), Value::set([0, 2]));
    /// assert_eq!(Value::distr([1.0, 0.5, 1.0]).reduce(), Value::distr([1.0, 0.5, 1.0]));
    /// ```
    pub fn reduce_with(&self, eps: f64) -> Value {
        match self {
            Value::IndexSet(s) => reduce_set(s),
            Value::Distribution(d) => match strict_set(d, eps) {
                Some(s) => reduce_set(&s),
                None => self.clone(),
            },
            Value::Sparse(m) => Value::Distribution(sparse_to_dense(m)).reduce_with(eps),
            _ => self.clone(),
        }
    }
}

fn reduce_set(s: &BTreeSet<usize>) -> Value {
    match s.len() {
        0 => Value::Unknown,
        1 => Value::Index(*s.iter().next().expect("non-empty set")),
        _ => Value::IndexSet(s.clone()),
    }
}

fn lenient_set(distr: &[f64], eps: f64) -> BTreeSet<usize> {
    distr
        .iter()
        .enumerate()
        .filter(|(_, &w)| w > eps)
        .map(|(i, _)| i)
        .collect()
}

fn strict_set(distr: &[f64], eps: f64) -> Option<BTreeSet<usize>> {
    let mut result = BTreeSet::new();
    for (i, &w) in distr.iter().enumerate() {
        if (1.0 - eps..=1.0 + eps).contains(&w) {
            result.insert(i);
        } else if !(-eps..=eps).contains(&w) {
            return None;
        }
    }
    Some(result)
}

fn indicator(s: &BTreeSet<usize>) -> Vec<f64> {
    let len = s.iter().next_back().map_or(0, |&m| m + 1);
    let mut result = vec![0.0; len];
    for &i in s {
        result[i] = 1.0;
    }
    result
}

fn sparse_to_dense(m: &BTreeMap<usize, f64>) -> Vec<f64> {
    let len = m.keys().next_back().map_or(0, |&k| k + 1);
    let mut result = vec![0.0; len];
    for (&i, &w) in m {
        result[i] = w;
    }
    result
}

/// Scales `vals` so that their sum equals 1.0.
///
/// Returns the input unchanged when the sum is zero.
pub fn norm_sum(vals: &[f64]) -> Vec<f64> {
    let total: f64 = vals.iter().sum();
    if total == 0.0 {
        vals.to_vec()
    } else {
        vals.iter().map(|v| v / total).collect()
    }
}

/// Scales `vals` so that their maximum equals 1.0.
///
/// Returns the input unchanged when the maximum is zero or the slice is empty.
pub fn norm_max(vals: &[f64]) -> Vec<f64> {
    let best = vals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if best == 0.0 || vals.is_empty() {
        vals.to_vec()
    } else {
        vals.iter().map(|v| v / best).collect()
    }
}

/// The identity normalization.
pub fn norm_none(vals: &[f64]) -> Vec<f64> {
    vals.to_vec()
}
