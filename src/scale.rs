//! Value scales attached to attributes.
//!
//! A scale defines the domain an attribute's values live in: a finite ordered
//! list of named values ([`DiscreteScale`]) or a real interval split by two
//! breakpoints ([`ContinuousScale`]). Scales also know how to interpret raw
//! alternative cells ([`Scale::interpret`]) and how to parse cell text
//! ([`Scale::parse_value`]).

use std::collections::BTreeSet;

use thiserror::Error;

use crate::value::Value;

/// Preference direction of a scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Higher values are better.
    Ascending,
    /// Lower values are better.
    Descending,
    /// The scale is unordered.
    None,
}

/// Preferential class of a single scale value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Bad,
    None,
    Good,
}

/// Errors raised when a raw value cannot be interpreted or parsed on a scale.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("value name {0:?} is not on the scale")]
    UnknownName(String),
    #[error("continuous value {0} cannot be interpreted on a discrete scale")]
    ContinuousOnDiscrete(f64),
    #[error("value {0:?} cannot be interpreted on a continuous scale")]
    NotContinuous(String),
    #[error("cannot parse value {0:?}")]
    Malformed(String),
    #[error("negative index in {0:?}")]
    NegativeIndex(String),
    #[error("attribute has no scale, cannot interpret {0:?}")]
    NoScale(String),
}

/// A discrete qualitative scale: an ordered list of named values.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteScale {
    order: Order,
    values: Vec<String>,
    descriptions: Vec<String>,
    quality: Vec<Quality>,
}

impl DiscreteScale {
    /// Creates a scale from value names with the default quality assignment
    /// for `order`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dexeval::scale::{DiscreteScale, Order, Quality};
    /// let s = DiscreteScale::new(["low", "medium", "high"], Order::Ascending);
    /// assert_eq!(s.value_quality(0), Some(Quality::Bad));
    /// assert_eq!(s.value_quality(2), Some(Quality::Good));
    /// ```
    pub fn new<I, S>(values: I, order: Order) -> DiscreteScale
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        let n = values.len();
        DiscreteScale {
            order,
            descriptions: vec![String::new(); n],
            quality: DiscreteScale::default_quality(order, n),
            values,
        }
    }

    /// Replaces the per-value descriptions. Padded or truncated to the
    /// number of scale values.
    pub fn with_descriptions<I, S>(mut self, descriptions: I) -> DiscreteScale
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut descriptions: Vec<String> =
            descriptions.into_iter().map(Into::into).collect();
        descriptions.resize(self.values.len(), String::new());
        self.descriptions = descriptions;
        self
    }

    /// Replaces the default quality assignment. Padded with `Quality::None`
    /// or truncated to the number of scale values.
    pub fn with_quality<I>(mut self, quality: I) -> DiscreteScale
    where
        I: IntoIterator<Item = Quality>,
    {
        let mut quality: Vec<Quality> = quality.into_iter().collect();
        quality.resize(self.values.len(), Quality::None);
        self.quality = quality;
        self
    }

    /// The default quality vector for an `n`-value scale: the worst end is
    /// `Bad` and the best end is `Good` when the scale is ordered and has at
    /// least two values, everything else is `None`.
    pub fn default_quality(order: Order, n: usize) -> Vec<Quality> {
        let mut quality = vec![Quality::None; n];
        if n >= 2 {
            match order {
                Order::Ascending => {
                    quality[0] = Quality::Bad;
                    quality[n - 1] = Quality::Good;
                }
                Order::Descending => {
                    quality[0] = Quality::Good;
                    quality[n - 1] = Quality::Bad;
                }
                Order::None => {}
            }
        }
        quality
    }

    pub fn order(&self) -> Order {
        self.order
    }

    /// Number of scale values.
    pub fn count(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn value_name(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    pub fn value_description(&self, index: usize) -> Option<&str> {
        self.descriptions.get(index).map(String::as_str)
    }

    /// Looks up a value name, returning its index.
    pub fn value_index(&self, name: &str) -> Result<usize, ValueError> {
        self.values
            .iter()
            .position(|v| v == name)
            .ok_or_else(|| ValueError::UnknownName(name.to_string()))
    }

    pub fn value_quality(&self, index: usize) -> Option<Quality> {
        self.quality.get(index).copied()
    }

    /// The set of all value indices.
    pub fn full_range(&self) -> BTreeSet<usize> {
        (0..self.values.len()).collect()
    }
}

/// A continuous scale over the extended reals, split into a bad, neutral and
/// good region by two breakpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousScale {
    order: Order,
    low: f64,
    high: f64,
}

impl ContinuousScale {
    pub fn new(low: f64, high: f64, order: Order) -> ContinuousScale {
        ContinuousScale { order, low, high }
    }

    /// An unbounded ascending scale.
    pub fn unbounded() -> ContinuousScale {
        ContinuousScale::new(f64::NEG_INFINITY, f64::INFINITY, Order::Ascending)
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    /// Classifies `x` relative to the breakpoints. Unordered scales classify
    /// everything as neutral.
    pub fn value_quality(&self, x: f64) -> Quality {
        match self.order {
            Order::Ascending => {
                if x < self.low {
                    Quality::Bad
                } else if x > self.high {
                    Quality::Good
                } else {
                    Quality::None
                }
            }
            Order::Descending => {
                if x < self.low {
                    Quality::Good
                } else if x > self.high {
                    Quality::Bad
                } else {
                    Quality::None
                }
            }
            Order::None => Quality::None,
        }
    }
}

/// Either kind of scale.
#[derive(Debug, Clone, PartialEq)]
pub enum Scale {
    Discrete(DiscreteScale),
    Continuous(ContinuousScale),
}

impl Scale {
    pub fn order(&self) -> Order {
        match self {
            Scale::Discrete(s) => s.order(),
            Scale::Continuous(s) => s.order(),
        }
    }

    pub fn is_discrete(&self) -> bool {
        matches!(self, Scale::Discrete(_))
    }

    pub fn is_continuous(&self) -> bool {
        matches!(self, Scale::Continuous(_))
    }

    /// Number of discrete values; zero for continuous scales.
    pub fn count(&self) -> usize {
        match self {
            Scale::Discrete(s) => s.count(),
            Scale::Continuous(_) => 0,
        }
    }

    /// The full index range of a discrete scale.
    pub fn full_range(&self) -> Option<BTreeSet<usize>> {
        match self {
            Scale::Discrete(s) => Some(s.full_range()),
            Scale::Continuous(_) => None,
        }
    }

    /// Quality of a concrete value on this scale.
    pub fn value_quality(&self, value: &Value) -> Option<Quality> {
        match (self, value) {
            (Scale::Discrete(s), Value::Index(i)) => s.value_quality(*i),
            (Scale::Continuous(s), Value::Continuous(x)) => Some(s.value_quality(*x)),
            (Scale::Continuous(s), Value::Index(i)) => Some(s.value_quality(*i as f64)),
            _ => None,
        }
    }

    /// One-line summary of the scale, worst to best.
    pub fn scale_str(&self) -> String {
        match self {
            Scale::Discrete(s) => s.values.join("; "),
            Scale::Continuous(s) => format!("{} .. {}", s.low, s.high),
        }
    }

    /// Interprets a raw alternative cell on this scale.
    ///
    /// On discrete scales the wildcard expands to the full range and sparse
    /// distributions densify; continuous values are rejected. On continuous
    /// scales indices coerce to floats and everything non-scalar is rejected.
    /// `Unknown` always passes through.
    pub fn interpret(&self, value: &Value) -> Result<Value, ValueError> {
        if value.is_unknown() {
            return Ok(Value::Unknown);
        }
        match self {
            Scale::Continuous(_) => match value {
                Value::Continuous(x) => Ok(Value::Continuous(*x)),
                Value::Index(i) => Ok(Value::Continuous(*i as f64)),
                other => Err(ValueError::NotContinuous(format!("{other:?}"))),
            },
            Scale::Discrete(s) => match value {
                Value::Index(i) => Ok(Value::Index(*i)),
                Value::IndexSet(m) => Ok(Value::IndexSet(m.clone())),
                Value::Distribution(d) => Ok(Value::Distribution(d.clone())),
                Value::Sparse(_) => Ok(Value::Distribution(
                    value.as_distribution().unwrap_or_default(),
                )),
                Value::Wildcard => Ok(Value::IndexSet(s.full_range())),
                Value::Continuous(x) => Err(ValueError::ContinuousOnDiscrete(*x)),
                Value::Unknown => Ok(Value::Unknown),
            },
        }
    }

    /// Like [`Scale::interpret`], additionally forcing the result into the
    /// scale bounds: indices clamp to the last value, out-of-range set
    /// members are dropped and distributions are truncated.
    pub fn interpret_bounded(&self, value: &Value) -> Result<Value, ValueError> {
        let value = self.interpret(value)?;
        match self {
            Scale::Continuous(_) => Ok(value),
            Scale::Discrete(s) => {
                let n = s.count();
                Ok(match value {
                    Value::Index(i) => Value::Index(i.min(n.saturating_sub(1))),
                    Value::IndexSet(m) => {
                        Value::IndexSet(m.into_iter().filter(|&i| i < n).collect())
                    }
                    Value::Distribution(mut d) => {
                        d.truncate(n);
                        Value::Distribution(d)
                    }
                    other => other,
                })
            }
        }
    }

    /// Parses cell text into a [`Value`] on this scale.
    ///
    /// The grammar: empty or `undef`-prefixed text is `Unknown`, `*` is the
    /// wildcard, `{a; b}` a set, `<w; w>` a distribution, `i:j` a contiguous
    /// set, a bare integer an index and any other token a value-name lookup.
    /// Continuous scales accept only empty text or a bare float.
    pub fn parse_value(&self, text: &str) -> Result<Value, ValueError> {
        let text = text.trim();
        if text.is_empty() || text.to_ascii_lowercase().starts_with("undef") {
            return Ok(Value::Unknown);
        }
        match self {
            Scale::Continuous(_) => text
                .parse::<f64>()
                .map(Value::Continuous)
                .map_err(|_| ValueError::NotContinuous(text.to_string())),
            Scale::Discrete(s) => {
                if text == "*" {
                    return Ok(Value::Wildcard);
                }
                if let Some(inner) = text.strip_prefix('{').and_then(|t| t.strip_suffix('}')) {
                    let mut members = BTreeSet::new();
                    for item in inner.split(';') {
                        members.insert(parse_index(item.trim(), s)?);
                    }
                    return Ok(Value::IndexSet(members));
                }
                if let Some(inner) = text.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
                    let weights = inner
                        .split(';')
                        .map(|w| {
                            w.trim()
                                .parse::<f64>()
                                .map_err(|_| ValueError::Malformed(text.to_string()))
                        })
                        .collect::<Result<Vec<f64>, ValueError>>()?;
                    return Ok(Value::Distribution(weights));
                }
                if let Some((lo, hi)) = text.split_once(':') {
                    let lo = parse_index(lo.trim(), s)?;
                    let hi = parse_index(hi.trim(), s)?;
                    if lo > hi {
                        return Err(ValueError::Malformed(text.to_string()));
                    }
                    return Ok(Value::IndexSet((lo..=hi).collect()));
                }
                parse_index(text, s).map(Value::Index)
            }
        }
    }
}

fn parse_index(token: &str, scale: &DiscreteScale) -> Result<usize, ValueError> {
    if token.starts_with('-') && token[1..].parse::<i64>().is_ok() {
        return Err(ValueError::NegativeIndex(token.to_string()));
    }
    if let Ok(i) = token.parse::<usize>() {
        return Ok(i);
    }
    if let Ok(x) = token.parse::<f64>() {
        return Err(ValueError::ContinuousOnDiscrete(x));
    }
    scale.value_index(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> Scale {
        Scale::Discrete(DiscreteScale::new(["low", "medium", "high"], Order::Ascending))
    }

    #[test]
    fn test_default_quality_ascending() {
        let s = DiscreteScale::new(["bad", "acc", "good", "exc"], Order::Ascending);
        assert_eq!(s.value_quality(0), Some(Quality::Bad));
        assert_eq!(s.value_quality(1), Some(Quality::None));
        assert_eq!(s.value_quality(2), Some(Quality::None));
        assert_eq!(s.value_quality(3), Some(Quality::Good));
    }

    #[test]
    fn test_default_quality_descending() {
        let s = DiscreteScale::new(["high", "low"], Order::Descending);
        assert_eq!(s.value_quality(0), Some(Quality::Good));
        assert_eq!(s.value_quality(1), Some(Quality::Bad));
    }

    #[test]
    fn test_default_quality_unordered_or_singleton() {
        let s = DiscreteScale::new(["a", "b"], Order::None);
        assert_eq!(s.value_quality(0), Some(Quality::None));
        let s = DiscreteScale::new(["only"], Order::Ascending);
        assert_eq!(s.value_quality(0), Some(Quality::None));
    }

    #[test]
    fn test_custom_quality_and_descriptions() {
        let s = DiscreteScale::new(["no", "yes"], Order::Ascending)
            .with_quality([Quality::None, Quality::None])
            .with_descriptions(["not present"]);
        assert_eq!(s.value_quality(1), Some(Quality::None));
        assert_eq!(s.value_description(0), Some("not present"));
        assert_eq!(s.value_description(1), Some(""));
    }

    #[test]
    fn test_value_index() {
        let s = DiscreteScale::new(["low", "medium", "high"], Order::Ascending);
        assert_eq!(s.value_index("medium"), Ok(1));
        assert!(matches!(s.value_index("huge"), Err(ValueError::UnknownName(_))));
    }

    #[test]
    fn test_structural_equality() {
        let a = DiscreteScale::new(["low", "high"], Order::Ascending);
        let b = DiscreteScale::new(["low", "high"], Order::Ascending);
        let c = DiscreteScale::new(["low", "high"], Order::Descending);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(
            Scale::Discrete(a),
            Scale::Continuous(ContinuousScale::unbounded())
        );
    }

    #[test]
    fn test_continuous_quality() {
        let s = ContinuousScale::new(-1.0, 1.0, Order::Ascending);
        assert_eq!(s.value_quality(-2.0), Quality::Bad);
        assert_eq!(s.value_quality(0.0), Quality::None);
        assert_eq!(s.value_quality(2.0), Quality::Good);
        let d = ContinuousScale::new(-1.0, 1.0, Order::Descending);
        assert_eq!(d.value_quality(-2.0), Quality::Good);
        assert_eq!(d.value_quality(2.0), Quality::Bad);
    }

    #[test]
    fn test_interpret_wildcard_and_sparse() {
        let s = three();
        assert_eq!(s.interpret(&Value::Wildcard), Ok(Value::set([0, 1, 2])));
        assert_eq!(
            s.interpret(&Value::sparse([(1, 0.5), (2, 1.0)])),
            Ok(Value::distr([0.0, 0.5, 1.0]))
        );
    }

    #[test]
    fn test_interpret_rejects_float_on_discrete() {
        let s = three();
        assert!(matches!(
            s.interpret(&Value::Continuous(1.5)),
            Err(ValueError::ContinuousOnDiscrete(_))
        ));
    }

    #[test]
    fn test_interpret_continuous() {
        let s = Scale::Continuous(ContinuousScale::unbounded());
        assert_eq!(s.interpret(&Value::Continuous(2.5)), Ok(Value::Continuous(2.5)));
        assert_eq!(s.interpret(&Value::Index(3)), Ok(Value::Continuous(3.0)));
        assert_eq!(s.interpret(&Value::Unknown), Ok(Value::Unknown));
        assert!(s.interpret(&Value::Wildcard).is_err());
        assert!(s.interpret(&Value::set([0, 1])).is_err());
    }

    #[test]
    fn test_interpret_bounded() {
        let s = three();
        assert_eq!(s.interpret_bounded(&Value::Index(7)), Ok(Value::Index(2)));
        assert_eq!(
            s.interpret_bounded(&Value::set([1, 2, 5])),
            Ok(Value::set([1, 2]))
        );
        assert_eq!(
            s.interpret_bounded(&Value::distr([0.1, 0.2, 0.3, 0.4])),
            Ok(Value::distr([0.1, 0.2, 0.3]))
        );
        assert_eq!(s.interpret_bounded(&Value::Unknown), Ok(Value::Unknown));
    }

    #[test]
    fn test_parse_value_grammar() {
        let s = three();
        assert_eq!(s.parse_value(""), Ok(Value::Unknown));
        assert_eq!(s.parse_value("undefined"), Ok(Value::Unknown));
        assert_eq!(s.parse_value("*"), Ok(Value::Wildcard));
        assert_eq!(s.parse_value("2"), Ok(Value::Index(2)));
        assert_eq!(s.parse_value("medium"), Ok(Value::Index(1)));
        assert_eq!(s.parse_value("{0; high}"), Ok(Value::set([0, 2])));
        assert_eq!(s.parse_value("0:1"), Ok(Value::set([0, 1])));
        assert_eq!(
            s.parse_value("<0.5; 0; 1>"),
            Ok(Value::distr([0.5, 0.0, 1.0]))
        );
        assert!(s.parse_value("-1").is_err());
        assert!(s.parse_value("1.5").is_err());
        assert!(s.parse_value("huge").is_err());
    }

    #[test]
    fn test_parse_value_continuous() {
        let s = Scale::Continuous(ContinuousScale::new(-1.0, 1.0, Order::Ascending));
        assert_eq!(s.parse_value("0.25"), Ok(Value::Continuous(0.25)));
        assert_eq!(s.parse_value(""), Ok(Value::Unknown));
        assert!(s.parse_value("low").is_err());
    }
}
