//! Textual rendering of values, alternatives and models.

use std::fmt;

use crate::model::{Alternative, Model};
use crate::scale::Scale;
use crate::value::Value;

/// Renders a value in terms of its scale's value names.
///
/// Sets render as `{a; b}`, distributions either as weight lists or (with
/// `use_dict`) as `{name: weight}` entries skipping zero weights. `decimals`
/// rounds the printed weights. Returns `None` for unknown values.
///
/// # Examples
///
/// ```
/// use dexeval::display::value_text;
/// use dexeval::scale::{DiscreteScale, Order, Scale};
/// use dexeval::value::Value;
/// let s = Scale::Discrete(DiscreteScale::new(["low", "high"], Order::Ascending));
/// assert_eq!(value_text(&Value::Index(1), &s, None, false), Some("high".into()));
/// assert_eq!(
///     value_text(&Value::distr([0.0, 0.5]), &s, None, true),
///     Some("{high: 0.5}".into())
/// );
/// ```
pub fn value_text(
    value: &Value,
    scale: &Scale,
    decimals: Option<usize>,
    use_dict: bool,
) -> Option<String> {
    match value {
        Value::Unknown => None,
        Value::Wildcard => Some("*".to_string()),
        Value::Index(i) => Some(name_of(scale, *i)),
        Value::IndexSet(s) => {
            let members: Vec<String> = s.iter().map(|&i| name_of(scale, i)).collect();
            Some(format!("{{{}}}", members.join("; ")))
        }
        Value::Continuous(x) => Some(fmt_num(*x, decimals)),
        Value::Distribution(d) => Some(distr_text(d, scale, decimals, use_dict)),
        Value::Sparse(_) => {
            let dense = value.as_distribution().unwrap_or_default();
            Some(distr_text(&dense, scale, decimals, use_dict))
        }
    }
}

fn distr_text(d: &[f64], scale: &Scale, decimals: Option<usize>, use_dict: bool) -> String {
    if use_dict {
        let entries: Vec<String> = d
            .iter()
            .enumerate()
            .filter(|(_, &w)| w != 0.0)
            .map(|(i, &w)| format!("{}: {}", name_of(scale, i), fmt_num(w, decimals)))
            .collect();
        format!("{{{}}}", entries.join("; "))
    } else {
        let weights: Vec<String> = d.iter().map(|&w| fmt_num(w, decimals)).collect();
        format!("[{}]", weights.join("; "))
    }
}

fn name_of(scale: &Scale, index: usize) -> String {
    match scale {
        Scale::Discrete(s) => s
            .value_name(index)
            .map(str::to_string)
            .unwrap_or_else(|| index.to_string()),
        Scale::Continuous(_) => index.to_string(),
    }
}

fn fmt_num(x: f64, decimals: Option<usize>) -> String {
    match decimals {
        Some(d) => format!("{x:.d$}"),
        None => format!("{x}"),
    }
}

/// Renders every stored value of an alternative, in model order. Attributes
/// without a scale or without a known value render as `""`.
pub fn textualize_alternative(
    model: &Model,
    alt: &Alternative,
    decimals: Option<usize>,
    use_dict: bool,
) -> Vec<(String, String)> {
    model
        .non_root()
        .iter()
        .map(|&idx| {
            let att = model.attribute(idx);
            let text = att
                .scale
                .as_ref()
                .and_then(|s| value_text(&alt.get(att.id()), s, decimals, use_dict))
                .unwrap_or_default();
            (att.id().to_string(), text)
        })
        .collect()
}

/// Renders alternatives as an aligned text table, one row per alternative.
/// With `transpose`, attributes become the rows instead.
pub fn alt_table(
    model: &Model,
    alts: &[Alternative],
    transpose: bool,
    decimals: Option<usize>,
    use_dict: bool,
) -> String {
    let mut grid: Vec<Vec<String>> = Vec::with_capacity(alts.len() + 1);
    let mut header = vec!["alternative".to_string()];
    header.extend(model.non_root_ids().iter().map(|id| id.to_string()));
    grid.push(header);
    for alt in alts {
        let mut row = vec![alt.name.clone()];
        row.extend(
            textualize_alternative(model, alt, decimals, use_dict)
                .into_iter()
                .map(|(_, text)| text),
        );
        grid.push(row);
    }
    if transpose {
        grid = transpose_grid(grid);
    }
    render_grid(&grid)
}

fn transpose_grid(grid: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let cols = grid.first().map_or(0, Vec::len);
    (0..cols)
        .map(|c| grid.iter().map(|row| row[c].clone()).collect())
        .collect()
}

fn render_grid(grid: &[Vec<String>]) -> String {
    let cols = grid.first().map_or(0, Vec::len);
    let widths: Vec<usize> = (0..cols)
        .map(|c| grid.iter().map(|row| row[c].len()).max().unwrap_or(0))
        .collect();
    grid.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(c, cell)| format!("{cell:<width$}", width = widths[c]))
                .collect::<Vec<String>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<String>>()
        .join("\n")
}

impl Model {
    /// Indentation prefix reflecting an attribute's depth in the tree.
    pub fn tree_indent(&self, idx: usize) -> String {
        "  ".repeat(self.level(idx))
    }

    /// The attribute's name, indented by its depth.
    pub fn structure(&self, idx: usize) -> String {
        format!("{}{}", self.tree_indent(idx), self.attribute(idx).name)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "model: {}", self.name)?;
        if !self.description.is_empty() {
            writeln!(f, "description: {}", self.description)?;
        }
        let mut grid = vec![vec![
            "index".to_string(),
            "id".to_string(),
            "structure".to_string(),
            "link".to_string(),
            "scale".to_string(),
            "funct".to_string(),
        ]];
        for (idx, att) in self.attributes().iter().enumerate() {
            grid.push(vec![
                idx.to_string(),
                att.id().to_string(),
                self.structure(idx),
                att.link()
                    .map(|l| self.attribute(l).id().to_string())
                    .unwrap_or_default(),
                att.scale.as_ref().map(Scale::scale_str).unwrap_or_default(),
                att.funct
                    .as_ref()
                    .map(|fun| fun.funct_str())
                    .unwrap_or_default(),
            ]);
        }
        writeln!(f, "{}", render_grid(&grid))
    }
}
