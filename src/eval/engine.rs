//! The evaluation engine: a single forward pass per alternative.

use std::collections::HashSet;

use thiserror::Error;

use super::methods::{EvalMethod, EvalParameters};
use super::order::evaluation_order;
use crate::function::{Function, TabularFunction};
use crate::model::{Alternative, AttIdx, CheckReport, Model};
use crate::scale::{Scale, ValueError};
use crate::value::{Value, DEFAULT_EPS};

/// Errors aborting an evaluation run. Unknown input values are never
/// errors; they propagate as [`Value::Unknown`].
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("unknown evaluation root {0:?}")]
    UnknownRoot(String),
    #[error("alternatives failed the pre-check:\n{0}")]
    PreCheck(CheckReport),
    #[error("attribute {attribute:?}: {source}")]
    Interpretation {
        attribute: String,
        source: ValueError,
    },
}

/// Configuration of one evaluation run.
///
/// # Examples
///
/// ```
/// use dexeval::eval::{EvalMethod, EvalOptions};
/// let opts = EvalOptions::new(EvalMethod::Prob)
///     .with_prune(["PRICE"])
///     .with_bounding(true);
/// assert_eq!(opts.method, EvalMethod::Prob);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    pub method: EvalMethod,
    /// Id of the topmost evaluated attribute; the model root when `None`.
    pub root: Option<String>,
    /// Ids of attributes treated as inputs, cutting off their subtrees.
    pub prune: Vec<String>,
    /// Validate alternatives first and fail on any error.
    pub pre_check: bool,
    /// Force evaluated values into their scales' bounds.
    pub bounding: bool,
    /// Operator overrides; the method defaults when `None`.
    pub params: Option<EvalParameters>,
}

impl EvalOptions {
    pub fn new(method: EvalMethod) -> EvalOptions {
        EvalOptions {
            method,
            ..EvalOptions::default()
        }
    }

    pub fn with_root(mut self, root: impl Into<String>) -> EvalOptions {
        self.root = Some(root.into());
        self
    }

    pub fn with_prune<I, S>(mut self, prune: I) -> EvalOptions
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prune = prune.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_pre_check(mut self, pre_check: bool) -> EvalOptions {
        self.pre_check = pre_check;
        self
    }

    pub fn with_bounding(mut self, bounding: bool) -> EvalOptions {
        self.bounding = bounding;
        self
    }

    pub fn with_params(mut self, params: EvalParameters) -> EvalOptions {
        self.params = Some(params);
        self
    }
}

/// One resolved evaluation pass, shared by all alternatives of a run.
struct Pass {
    root: AttIdx,
    order: Vec<AttIdx>,
    pruned: HashSet<AttIdx>,
    /// Attributes cut off by pruning; their stored values are cleared.
    nulled: Vec<AttIdx>,
    params: EvalParameters,
    bounding: bool,
}

fn prepare(model: &Model, opts: &EvalOptions) -> Result<Pass, EvalError> {
    let root = match &opts.root {
        Some(id) => model
            .att_index(id)
            .ok_or_else(|| EvalError::UnknownRoot(id.clone()))?,
        None => model.root(),
    };
    let pruned: HashSet<AttIdx> = opts
        .prune
        .iter()
        .filter_map(|id| model.att_index(id))
        .collect();
    let order = evaluation_order(model, root, &pruned);
    let nulled = if pruned.is_empty() {
        Vec::new()
    } else {
        let full = evaluation_order(model, root, &HashSet::new());
        let kept: HashSet<AttIdx> = order.iter().copied().collect();
        full.into_iter()
            .filter(|i| !kept.contains(i) && *i != model.root())
            .collect()
    };
    let params = opts.params.unwrap_or_else(|| opts.method.parameters());
    Ok(Pass {
        root,
        order,
        pruned,
        nulled,
        params,
        bounding: opts.bounding,
    })
}

/// Evaluates alternatives against the model, returning evaluated copies.
///
/// Every attribute in the evaluation order gets a value: basic and pruned
/// attributes by interpreting their stored value on their scale, linked
/// attributes by copying their target, aggregates by applying their
/// function under the configured method. Results are normalized per method
/// and reduced before storing.
pub fn evaluate(
    model: &Model,
    alternatives: &[Alternative],
    opts: &EvalOptions,
) -> Result<Vec<Alternative>, EvalError> {
    let mut alts = alternatives.to_vec();
    evaluate_in_place(model, &mut alts, opts)?;
    Ok(alts)
}

/// Like [`evaluate`], overwriting the given alternatives.
pub fn evaluate_in_place(
    model: &Model,
    alternatives: &mut [Alternative],
    opts: &EvalOptions,
) -> Result<(), EvalError> {
    let pass = prepare(model, opts)?;
    null_pruned(model, &pass, alternatives);
    pre_check(model, opts, alternatives)?;
    for alt in alternatives.iter_mut() {
        evaluate_one(model, &pass, alt)?;
    }
    Ok(())
}

/// Like [`evaluate`], spreading independent alternatives across the rayon
/// thread pool.
#[cfg(feature = "parallel")]
pub fn evaluate_parallel(
    model: &Model,
    alternatives: &[Alternative],
    opts: &EvalOptions,
) -> Result<Vec<Alternative>, EvalError> {
    use rayon::prelude::*;

    let pass = prepare(model, opts)?;
    let mut alts = alternatives.to_vec();
    null_pruned(model, &pass, &mut alts);
    pre_check(model, opts, &alts)?;
    alts.par_iter_mut()
        .try_for_each(|alt| evaluate_one(model, &pass, alt))?;
    Ok(alts)
}

fn null_pruned(model: &Model, pass: &Pass, alternatives: &mut [Alternative]) {
    for alt in alternatives.iter_mut() {
        for &idx in &pass.nulled {
            alt.set(model.attribute(idx).id(), Value::Unknown);
        }
    }
}

fn pre_check(
    model: &Model,
    opts: &EvalOptions,
    alternatives: &[Alternative],
) -> Result<(), EvalError> {
    if opts.pre_check {
        let report = model.check_alternatives(alternatives, false);
        if !report.errors.is_empty() {
            return Err(EvalError::PreCheck(report));
        }
    }
    Ok(())
}

fn evaluate_one(model: &Model, pass: &Pass, alt: &mut Alternative) -> Result<(), EvalError> {
    for &idx in &pass.order {
        if idx == pass.root {
            continue;
        }
        let att = model.attribute(idx);
        let mut value = match &att.scale {
            None => Value::Unknown,
            Some(scale) => {
                if let Some(link) = att.link() {
                    alt.get(model.attribute(link).id())
                } else if att.is_basic() || pass.pruned.contains(&idx) {
                    scale
                        .interpret(&alt.get(att.id()))
                        .map_err(|source| EvalError::Interpretation {
                            attribute: att.id().to_string(),
                            source,
                        })?
                } else {
                    evaluate_aggregate(model, idx, scale, alt, &pass.params)
                }
            }
        };
        if pass.bounding {
            if let Some(scale) = &att.scale {
                value =
                    scale
                        .interpret_bounded(&value)
                        .map_err(|source| EvalError::Interpretation {
                            attribute: att.id().to_string(),
                            source,
                        })?;
            }
        }
        if pass.params.method != EvalMethod::Set {
            if let Value::Distribution(d) = &value {
                value = Value::Distribution((pass.params.norm)(d));
            }
        }
        alt.set(att.id(), value.reduce());
    }
    Ok(())
}

/// Aggregates one attribute from its inputs' stored values. Any unknown
/// input, missing function or failed lookup yields `Unknown`.
fn evaluate_aggregate(
    model: &Model,
    idx: AttIdx,
    scale: &Scale,
    alt: &Alternative,
    params: &EvalParameters,
) -> Value {
    let att = model.attribute(idx);
    let Some(funct) = &att.funct else {
        return Value::Unknown;
    };
    let inputs: Vec<Value> = att
        .inputs()
        .iter()
        .map(|&j| alt.get(model.attribute(j).id()))
        .collect();
    if inputs.iter().any(Value::is_unknown) {
        return Value::Unknown;
    }
    match funct {
        Function::Discretize(f) => match inputs[0] {
            Value::Continuous(x) => f.value(x),
            Value::Index(i) => f.value(i as f64),
            _ => Value::Unknown,
        },
        Function::Tabular(f) => {
            if params.method == EvalMethod::Set {
                let indices: Option<Vec<usize>> =
                    inputs.iter().map(Value::single_index).collect();
                match indices {
                    Some(args) => f.try_value(&args),
                    None => evaluate_as_set(f, &inputs),
                }
            } else {
                evaluate_as_distribution(f, &inputs, scale.count(), params)
            }
        }
    }
}

/// Set-semantics aggregation: the union of function values over the
/// cartesian product of the input sets.
pub fn evaluate_as_set(funct: &TabularFunction, inputs: &[Value]) -> Value {
    let sets: Option<Vec<Vec<usize>>> = inputs
        .iter()
        .map(|v| v.as_set().map(|s| s.into_iter().collect::<Vec<usize>>()))
        .collect();
    let Some(sets) = sets else {
        return Value::Unknown;
    };
    if sets.iter().any(Vec::is_empty) {
        return Value::Unknown;
    }
    let lengths: Vec<usize> = sets.iter().map(Vec::len).collect();
    let mut result = std::collections::BTreeSet::new();
    for combo in Odometer::new(lengths) {
        let args: Vec<usize> = combo.iter().zip(&sets).map(|(&k, s)| s[k]).collect();
        match funct.try_value(&args).as_set() {
            Some(out) => result.extend(out),
            None => return Value::Unknown,
        }
    }
    if result.is_empty() {
        Value::Unknown
    } else {
        Value::IndexSet(result)
    }
}

/// Distribution-semantics aggregation over the cartesian product of the
/// input distributions. Each argument combination contributes its
/// conjunction of input memberships, distributed over the (locally
/// normalized) function value and merged by disjunction. A reached cell
/// carrying no mass makes the whole result `Unknown`. The result has
/// `out_len` slots, growing if a function value reaches beyond them.
pub fn evaluate_as_distribution(
    funct: &TabularFunction,
    inputs: &[Value],
    out_len: usize,
    params: &EvalParameters,
) -> Value {
    let distrs: Option<Vec<Vec<f64>>> = inputs.iter().map(Value::as_distribution).collect();
    let Some(distrs) = distrs else {
        return Value::Unknown;
    };
    if distrs.iter().any(Vec::is_empty) {
        return Value::Unknown;
    }
    let lengths: Vec<usize> = distrs.iter().map(Vec::len).collect();
    let mut result = vec![0.0; out_len];
    for args in Odometer::new(lengths) {
        let mem: Vec<f64> = args.iter().zip(&distrs).map(|(&i, d)| d[i]).collect();
        let and = (params.and_op)(&mem);
        if and == 0.0 {
            continue;
        }
        let Some(out) = funct.try_value(&args).as_distribution() else {
            return Value::Unknown;
        };
        // a cell carrying no mass at all means the function is undefined here
        if !out.iter().any(|&w| w > DEFAULT_EPS) {
            return Value::Unknown;
        }
        let out = (params.norm)(&out);
        if out.len() > result.len() {
            result.resize(out.len(), 0.0);
        }
        for (i, &el) in out.iter().enumerate() {
            result[i] = (params.or_op)(&[result[i], (params.and_op)(&[and, el])]);
        }
    }
    Value::Distribution(result)
}

/// Iterates all index combinations below the given lengths, the last
/// position varying fastest.
struct Odometer {
    lengths: Vec<usize>,
    current: Vec<usize>,
    done: bool,
}

impl Odometer {
    fn new(lengths: Vec<usize>) -> Odometer {
        let done = lengths.iter().any(|&l| l == 0);
        Odometer {
            current: vec![0; lengths.len()],
            lengths,
            done,
        }
    }
}

impl Iterator for Odometer {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        let item = self.current.clone();
        self.done = true;
        for pos in (0..self.current.len()).rev() {
            self.current[pos] += 1;
            if self.current[pos] < self.lengths[pos] {
                self.done = false;
                break;
            }
            self.current[pos] = 0;
        }
        Some(item)
    }
}
