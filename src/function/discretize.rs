//! Discretization functions: mapping a continuous input to discrete output
//! values through a sequence of intervals.

use crate::value::Value;

/// Which neighbouring interval a bound belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundAssoc {
    /// The bound belongs to the interval below it.
    #[default]
    Down,
    /// The bound belongs to the interval above it.
    Up,
}

/// Tests whether `x` lies in the interval `(lb, hb)` extended by the bounds
/// themselves according to their associations.
pub fn is_in_range(x: f64, lb: f64, hb: f64, la: BoundAssoc, ha: BoundAssoc) -> bool {
    (lb < x && x < hb) || (x == lb && la == BoundAssoc::Up) || (x == hb && ha == BoundAssoc::Down)
}

/// A discretization of the real line into `bounds.len() + 1` intervals, each
/// mapped to an output value. The first matching interval wins; with no
/// bounds the function is constant.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscretizeFunction {
    bounds: Vec<f64>,
    assoc: Vec<BoundAssoc>,
    values: Vec<Value>,
}

impl DiscretizeFunction {
    /// Creates a discretization. `assoc` is padded with `Down` and `values`
    /// with `Unknown` to match `bounds`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dexeval::function::{BoundAssoc, DiscretizeFunction};
    /// use dexeval::value::Value;
    /// let f = DiscretizeFunction::new(
    ///     vec![-1.0, 1.0],
    ///     vec![BoundAssoc::Down, BoundAssoc::Down],
    ///     vec![Value::Index(0), Value::Index(1), Value::Index(2)],
    /// );
    /// assert_eq!(f.value(-1.0), Value::Index(0));
    /// assert_eq!(f.value(0.0), Value::Index(1));
    /// assert_eq!(f.value(1.5), Value::Index(2));
    /// ```
    pub fn new(bounds: Vec<f64>, assoc: Vec<BoundAssoc>, values: Vec<Value>) -> DiscretizeFunction {
        let mut assoc = assoc;
        assoc.resize(bounds.len(), BoundAssoc::Down);
        let mut values = values;
        values.resize(bounds.len() + 1, Value::Unknown);
        DiscretizeFunction { bounds, assoc, values }
    }

    /// A constant function of one continuous argument.
    pub fn constant(value: Value) -> DiscretizeFunction {
        DiscretizeFunction::new(Vec::new(), Vec::new(), vec![value])
    }

    /// Number of intervals.
    pub fn nvals(&self) -> usize {
        self.values.len()
    }

    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }

    pub fn bound_assoc(&self, index: usize) -> Option<BoundAssoc> {
        self.assoc.get(index).copied()
    }

    /// Summary like `"low <-1> medium <1> high"` with each bound between its
    /// neighbouring interval values, marked by its association side.
    pub fn funct_str(&self) -> String {
        let mut parts = Vec::with_capacity(2 * self.values.len());
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                let b = self.bounds[i - 1];
                match self.assoc[i - 1] {
                    BoundAssoc::Down => parts.push(format!("{b}>")),
                    BoundAssoc::Up => parts.push(format!("<{b}")),
                }
            }
            parts.push(cell_str(value));
        }
        parts.join(" ")
    }

    /// Maps a continuous input to the value of its interval.
    pub fn value(&self, x: f64) -> Value {
        match self.values.len() {
            0 => Value::Unknown,
            1 => self.values[0].clone(),
            _ => {
                let mut lb = f64::NEG_INFINITY;
                let mut la = BoundAssoc::Up;
                for (i, value) in self.values.iter().enumerate() {
                    let (hb, ha) = match self.bounds.get(i) {
                        Some(&b) => (b, self.assoc[i]),
                        None => (f64::INFINITY, BoundAssoc::Down),
                    };
                    if is_in_range(x, lb, hb, la, ha) {
                        return value.clone();
                    }
                    lb = hb;
                    la = ha;
                }
                Value::Unknown
            }
        }
    }
}

fn cell_str(v: &Value) -> String {
    match v {
        Value::Unknown => "?".to_string(),
        Value::Index(i) => i.to_string(),
        Value::IndexSet(s) => {
            let members = s
                .iter()
                .map(usize::to_string)
                .collect::<Vec<String>>()
                .join("; ");
            format!("{{{members}}}")
        }
        other => format!("{other:?}"),
    }
}
