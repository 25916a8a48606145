//! Decision tables: complete tabular mappings from discrete argument
//! vectors to output values.

use std::collections::BTreeSet;

use thiserror::Error;

use super::DomainError;
use crate::value::Value;

/// Errors raised while constructing a function.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FunctionError {
    #[error("function dimensions must be non-empty and positive, got {0:?}")]
    BadDimension(Vec<usize>),
    #[error("rule string has {got} cells, the dimensions require {expected}")]
    RuleLength { expected: usize, got: usize },
    #[error("rule character {0:?} is not a zero-based value code")]
    BadRuleChar(char),
    #[error("rule bounds {low}..{high} are inverted")]
    InvertedBounds { low: usize, high: usize },
}

/// A decision table over discrete inputs.
///
/// Cells are stored in a flat row-major vector: the last argument varies
/// fastest. Cells may hold any [`Value`], typically an index or a small
/// index set.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularFunction {
    dim: Vec<usize>,
    cells: Vec<Value>,
}

impl TabularFunction {
    /// Creates a table over `dim` with the given cells. The cell vector is
    /// padded with `Unknown` or truncated to the table size.
    ///
    /// # Examples
    ///
    /// ```
    /// use dexeval::function::TabularFunction;
    /// use dexeval::value::Value;
    /// let f = TabularFunction::new(
    ///     vec![2, 2],
    ///     vec![Value::Index(0), Value::Index(0), Value::Index(0), Value::Index(1)],
    /// ).unwrap();
    /// assert_eq!(f.value(&[1, 1]), Ok(Value::Index(1)));
    /// ```
    pub fn new(dim: Vec<usize>, cells: Vec<Value>) -> Result<TabularFunction, FunctionError> {
        if dim.is_empty() || dim.iter().any(|&d| d == 0) {
            return Err(FunctionError::BadDimension(dim));
        }
        let size = dim.iter().product();
        let mut cells = cells;
        cells.resize(size, Value::Unknown);
        Ok(TabularFunction { dim, cells })
    }

    /// Creates a table from compressed rule strings.
    ///
    /// Each character encodes one cell as a zero-based value code (`'0'` is
    /// 0, `'A'` is 17). Where `low` and `high` differ, the cell becomes the
    /// contiguous index set between them.
    ///
    /// # Examples
    ///
    /// ```
    /// use dexeval::function::TabularFunction;
    /// use dexeval::value::Value;
    /// let f = TabularFunction::from_rule_strings(vec![2, 2], "0011", Some("0012")).unwrap();
    /// assert_eq!(f.value(&[1, 1]), Ok(Value::set([1, 2])));
    /// ```
    pub fn from_rule_strings(
        dim: Vec<usize>,
        low: &str,
        high: Option<&str>,
    ) -> Result<TabularFunction, FunctionError> {
        if dim.is_empty() || dim.iter().any(|&d| d == 0) {
            return Err(FunctionError::BadDimension(dim));
        }
        let size: usize = dim.iter().product();
        let low = decode_rule_chars(low)?;
        let high = match high {
            Some(h) => decode_rule_chars(h)?,
            None => low.clone(),
        };
        for codes in [&low, &high] {
            if codes.len() != size {
                return Err(FunctionError::RuleLength {
                    expected: size,
                    got: codes.len(),
                });
            }
        }
        let cells = low
            .iter()
            .zip(&high)
            .map(|(&lo, &hi)| {
                if lo > hi {
                    Err(FunctionError::InvertedBounds { low: lo, high: hi })
                } else if lo == hi {
                    Ok(Value::Index(lo))
                } else {
                    Ok(Value::IndexSet((lo..=hi).collect()))
                }
            })
            .collect::<Result<Vec<Value>, FunctionError>>()?;
        Ok(TabularFunction { dim, cells })
    }

    /// Number of arguments.
    pub fn nargs(&self) -> usize {
        self.dim.len()
    }

    /// Number of cells.
    pub fn nvals(&self) -> usize {
        self.cells.len()
    }

    pub fn dim(&self) -> &[usize] {
        &self.dim
    }

    pub fn cells(&self) -> &[Value] {
        &self.cells
    }

    /// Summary like `"12 3x4"`: cell count and dimensions.
    pub fn funct_str(&self) -> String {
        let dims = self
            .dim
            .iter()
            .map(usize::to_string)
            .collect::<Vec<String>>()
            .join("x");
        format!("{} {}", self.nvals(), dims)
    }

    fn rule_index(&self, args: &[usize]) -> Result<usize, DomainError> {
        if args.len() != self.dim.len()
            || args.iter().zip(&self.dim).any(|(&a, &d)| a >= d)
        {
            return Err(DomainError {
                args: args.to_vec(),
                dim: self.dim.clone(),
            });
        }
        Ok(args
            .iter()
            .zip(&self.dim)
            .fold(0, |idx, (&a, &d)| idx * d + a))
    }

    /// Looks up the cell for an argument vector.
    pub fn value(&self, args: &[usize]) -> Result<Value, DomainError> {
        Ok(self.cells[self.rule_index(args)?].clone())
    }

    /// Looks up the cell for an argument vector, degrading out-of-domain
    /// arguments to `Unknown`.
    pub fn try_value(&self, args: &[usize]) -> Value {
        self.value(args).unwrap_or(Value::Unknown)
    }

    /// Replaces the cell for an argument vector.
    pub fn set_value(&mut self, args: &[usize], value: Value) -> Result<(), DomainError> {
        let idx = self.rule_index(args)?;
        self.cells[idx] = value;
        Ok(())
    }

    /// Encodes the cells back into low/high rule strings. Cells that are
    /// not indices or contiguous sets cannot be encoded.
    pub fn to_rule_strings(&self) -> Option<(String, String)> {
        let mut low = Vec::with_capacity(self.cells.len());
        let mut high = Vec::with_capacity(self.cells.len());
        for cell in &self.cells {
            match cell {
                Value::Index(i) => {
                    low.push(*i);
                    high.push(*i);
                }
                Value::IndexSet(s) if is_contiguous(s) => {
                    low.push(*s.iter().next()?);
                    high.push(*s.iter().next_back()?);
                }
                _ => return None,
            }
        }
        Some((encode_rule_chars(&low), encode_rule_chars(&high)))
    }
}

fn is_contiguous(s: &BTreeSet<usize>) -> bool {
    match (s.iter().next(), s.iter().next_back()) {
        (Some(&lo), Some(&hi)) => hi - lo + 1 == s.len(),
        _ => false,
    }
}

/// Decodes a rule string into zero-based value codes (`'0'` maps to 0).
pub fn decode_rule_chars(s: &str) -> Result<Vec<usize>, FunctionError> {
    s.chars()
        .map(|c| {
            (c as u32)
                .checked_sub('0' as u32)
                .map(|v| v as usize)
                .ok_or(FunctionError::BadRuleChar(c))
        })
        .collect()
}

/// Encodes zero-based value codes into a rule string.
pub fn encode_rule_chars(codes: &[usize]) -> String {
    codes
        .iter()
        .map(|&v| char::from_u32('0' as u32 + v as u32).unwrap_or('?'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn min_table() -> TabularFunction {
        TabularFunction::from_rule_strings(vec![3, 3], "000011012", None).unwrap()
    }

    #[test]
    fn test_crisp_lookup() {
        let f = min_table();
        assert_eq!(f.value(&[0, 2]), Ok(Value::Index(0)));
        assert_eq!(f.value(&[1, 1]), Ok(Value::Index(1)));
        assert_eq!(f.value(&[2, 2]), Ok(Value::Index(2)));
    }

    #[test]
    fn test_out_of_domain() {
        let f = min_table();
        assert!(f.value(&[3, 0]).is_err());
        assert!(f.value(&[0]).is_err());
        assert_eq!(f.try_value(&[3, 0]), Value::Unknown);
    }

    #[test]
    fn test_row_major_order_last_argument_fastest() {
        let cells = (0..6).map(Value::Index).collect();
        let f = TabularFunction::new(vec![2, 3], cells).unwrap();
        assert_eq!(f.value(&[0, 2]), Ok(Value::Index(2)));
        assert_eq!(f.value(&[1, 0]), Ok(Value::Index(3)));
    }

    #[test]
    fn test_rule_string_bounds() {
        let f = TabularFunction::from_rule_strings(vec![2, 2], "0011", Some("0112")).unwrap();
        assert_eq!(f.value(&[0, 0]), Ok(Value::Index(0)));
        assert_eq!(f.value(&[0, 1]), Ok(Value::set([0, 1])));
        assert_eq!(f.value(&[1, 1]), Ok(Value::set([1, 2])));
    }

    #[test]
    fn test_rule_string_alphanumeric_codes() {
        assert_eq!(decode_rule_chars("05A"), Ok(vec![0, 5, 17]));
        assert_eq!(encode_rule_chars(&[0, 5, 17]), "05A");
        assert!(decode_rule_chars("0!").is_err());
    }

    #[test]
    fn test_rule_string_length_mismatch() {
        assert!(matches!(
            TabularFunction::from_rule_strings(vec![2, 2], "001", None),
            Err(FunctionError::RuleLength { expected: 4, got: 3 })
        ));
    }

    #[test]
    fn test_to_rule_strings_round_trip() {
        let f = TabularFunction::from_rule_strings(vec![2, 2], "0011", Some("0112")).unwrap();
        assert_eq!(f.to_rule_strings(), Some(("0011".into(), "0112".into())));
        let mut f = min_table();
        f.set_value(&[0, 0], Value::distr([0.5, 0.5])).unwrap();
        assert_eq!(f.to_rule_strings(), None);
    }

    #[test]
    fn test_padding_and_mutation() {
        let mut f = TabularFunction::new(vec![2, 2], vec![Value::Index(1)]).unwrap();
        assert_eq!(f.value(&[1, 1]), Ok(Value::Unknown));
        f.set_value(&[1, 1], Value::Index(0)).unwrap();
        assert_eq!(f.value(&[1, 1]), Ok(Value::Index(0)));
    }

    #[test]
    fn test_funct_str() {
        assert_eq!(min_table().funct_str(), "9 3x3");
    }
}
