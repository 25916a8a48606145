//! Decoding models from a serde description.
//!
//! The description mirrors the model structure: a tree of attribute blocks,
//! each with an optional scale, an optional function and per-alternative
//! cell text. Cell and rule values use the same textual grammar the scales
//! parse ([`crate::scale::Scale::parse_value`]).

use serde::Deserialize;

use crate::function::{BoundAssoc, DiscretizeFunction, Function, TabularFunction};
use crate::model::{AttributeNode, Model, ModelError};
use crate::scale::{ContinuousScale, DiscreteScale, Order, Quality, Scale, ValueError};
use crate::value::Value;

/// Top-level model description.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModelDef {
    pub name: String,
    pub description: String,
    pub linking: bool,
    /// Alternative names, in cell order.
    pub alternatives: Vec<String>,
    /// Top-level attributes; a virtual root is added above them.
    pub attributes: Vec<AttributeDef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AttributeDef {
    pub name: String,
    pub description: String,
    pub scale: Option<ScaleDef>,
    pub function: Option<FunctionDef>,
    pub attributes: Vec<AttributeDef>,
    /// Raw cell text, one entry per alternative.
    pub values: Vec<String>,
}

/// A scale block: discrete when `values` is non-empty, continuous otherwise.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScaleDef {
    /// `"asc"`, `"desc"` or `"none"`; ascending by default.
    pub order: Option<String>,
    pub low: Option<f64>,
    pub high: Option<f64>,
    pub values: Vec<ScaleValueDef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScaleValueDef {
    pub name: String,
    pub description: String,
    /// `"bad"`, `"none"` or `"good"`; the order's default when absent.
    pub group: Option<String>,
}

/// A function block: compressed `low`/`high` rule strings, explicit rule
/// `values`, or a `discretize` block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FunctionDef {
    pub low: Option<String>,
    pub high: Option<String>,
    pub values: Vec<String>,
    pub discretize: Option<DiscretizeDef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DiscretizeDef {
    pub bounds: Vec<BoundDef>,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BoundDef {
    pub value: f64,
    /// `"down"` (default) or `"up"`.
    pub associate: Option<String>,
}

/// Decodes and builds a model from JSON text.
pub fn from_json(text: &str) -> Result<Model, ModelError> {
    let def: ModelDef = serde_json::from_str(text)?;
    def.build()
}

impl ModelDef {
    /// Builds the model, parsing scales, functions and cells.
    pub fn build(&self) -> Result<Model, ModelError> {
        let children = self
            .attributes
            .iter()
            .map(build_node)
            .collect::<Result<Vec<AttributeNode>, ModelError>>()?;
        let root = AttributeNode::new("root").with_children(children);
        Model::new(
            self.name.clone(),
            self.description.clone(),
            self.linking,
            root,
            self.alternatives.clone(),
        )
    }
}

fn build_node(def: &AttributeDef) -> Result<AttributeNode, ModelError> {
    let scale = def.scale.as_ref().map(build_scale).transpose()?;
    let children = def
        .attributes
        .iter()
        .map(build_node)
        .collect::<Result<Vec<AttributeNode>, ModelError>>()?;
    let funct = def
        .function
        .as_ref()
        .map(|f| build_funct(def, f, scale.as_ref(), &children))
        .transpose()?;
    let cells = def
        .values
        .iter()
        .map(|text| parse_cell(text, scale.as_ref()))
        .collect::<Result<Vec<Value>, ValueError>>()
        .map_err(|source| ModelError::Cell {
            attribute: def.name.clone(),
            source,
        })?;
    let mut node = AttributeNode::new(def.name.clone())
        .with_description(def.description.clone())
        .with_children(children)
        .with_cells(cells);
    node.scale = scale;
    node.funct = funct;
    Ok(node)
}

fn build_scale(def: &ScaleDef) -> Result<Scale, ModelError> {
    let order = match def.order.as_deref() {
        None | Some("asc") => Order::Ascending,
        Some("desc") => Order::Descending,
        Some("none") => Order::None,
        Some(other) => {
            return Err(ModelError::Description(format!(
                "unknown scale order {other:?}"
            )))
        }
    };
    if def.values.is_empty() {
        return Ok(Scale::Continuous(ContinuousScale::new(
            def.low.unwrap_or(f64::NEG_INFINITY),
            def.high.unwrap_or(f64::INFINITY),
            order,
        )));
    }
    let names: Vec<String> = def.values.iter().map(|v| v.name.clone()).collect();
    let mut scale = DiscreteScale::new(names, order).with_descriptions(
        def.values.iter().map(|v| v.description.clone()),
    );
    if def.values.iter().any(|v| v.group.is_some()) {
        let default = DiscreteScale::default_quality(order, def.values.len());
        let quality = def
            .values
            .iter()
            .zip(default)
            .map(|(v, d)| match v.group.as_deref() {
                None => Ok(d),
                Some("bad") => Ok(Quality::Bad),
                Some("none") => Ok(Quality::None),
                Some("good") => Ok(Quality::Good),
                Some(other) => Err(ModelError::Description(format!(
                    "unknown quality group {other:?}"
                ))),
            })
            .collect::<Result<Vec<Quality>, ModelError>>()?;
        scale = scale.with_quality(quality);
    }
    Ok(Scale::Discrete(scale))
}

fn build_funct(
    att: &AttributeDef,
    def: &FunctionDef,
    scale: Option<&Scale>,
    children: &[AttributeNode],
) -> Result<Function, ModelError> {
    if let Some(d) = &def.discretize {
        let bounds: Vec<f64> = d.bounds.iter().map(|b| b.value).collect();
        let assoc = d
            .bounds
            .iter()
            .map(|b| match b.associate.as_deref() {
                None | Some("down") => Ok(BoundAssoc::Down),
                Some("up") => Ok(BoundAssoc::Up),
                Some(other) => Err(ModelError::Description(format!(
                    "unknown bound association {other:?}"
                ))),
            })
            .collect::<Result<Vec<BoundAssoc>, ModelError>>()?;
        let values = parse_rule_cells(att, &d.values, scale)?;
        return Ok(Function::Discretize(DiscretizeFunction::new(
            bounds, assoc, values,
        )));
    }
    let dim: Vec<usize> = children
        .iter()
        .map(|c| c.scale.as_ref().map_or(0, Scale::count))
        .collect();
    if let Some(low) = &def.low {
        let table = TabularFunction::from_rule_strings(dim, low, def.high.as_deref())
            .map_err(|source| ModelError::Function {
                attribute: att.name.clone(),
                source,
            })?;
        return Ok(Function::Tabular(table));
    }
    if !def.values.is_empty() {
        let cells = parse_rule_cells(att, &def.values, scale)?;
        let table = TabularFunction::new(dim, cells).map_err(|source| ModelError::Function {
            attribute: att.name.clone(),
            source,
        })?;
        return Ok(Function::Tabular(table));
    }
    Err(ModelError::Description(format!(
        "function of attribute {:?} defines no rules",
        att.name
    )))
}

fn parse_rule_cells(
    att: &AttributeDef,
    texts: &[String],
    scale: Option<&Scale>,
) -> Result<Vec<Value>, ModelError> {
    texts
        .iter()
        .map(|text| parse_cell(text, scale))
        .collect::<Result<Vec<Value>, ValueError>>()
        .map_err(|source| ModelError::Cell {
            attribute: att.name.clone(),
            source,
        })
}

/// Parses one cell of raw text. Without a scale only unknown text is
/// accepted.
fn parse_cell(text: &str, scale: Option<&Scale>) -> Result<Value, ValueError> {
    match scale {
        Some(scale) => scale.parse_value(text),
        None => {
            let trimmed = text.trim();
            if trimmed.is_empty() || trimmed.to_ascii_lowercase().starts_with("undef") {
                Ok(Value::Unknown)
            } else {
                Err(ValueError::NoScale(text.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::{evaluate, EvalMethod, EvalOptions};
    use crate::scale::Quality;

    const TWO_LEVEL: &str = r#"{
        "name": "RISK",
        "description": "credit risk screening",
        "alternatives": ["Applicant1", "Applicant2"],
        "attributes": [
            {
                "name": "RISK",
                "scale": {"values": [{"name": "high"}, {"name": "medium"}, {"name": "low"}]},
                "function": {"low": "000011012"},
                "attributes": [
                    {
                        "name": "ASSETS",
                        "scale": {"values": [{"name": "poor"}, {"name": "fair"}, {"name": "rich"}]},
                        "values": ["rich", "1"]
                    },
                    {
                        "name": "INCOME",
                        "scale": {"values": [{"name": "low"}, {"name": "medium"}, {"name": "high"}]},
                        "values": ["{0; 2}", "*"]
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_build_two_level_model() {
        let model = from_json(TWO_LEVEL).unwrap();
        assert_eq!(model.name, "RISK");
        assert_eq!(model.natt(), 4);
        assert_eq!(model.basic_ids(), vec!["ASSETS", "INCOME"]);
        let alt = model.alternative("Applicant1").unwrap();
        assert_eq!(alt.get("ASSETS"), Value::Index(2));
        assert_eq!(alt.get("INCOME"), Value::set([0, 2]));
        assert_eq!(model.alternative("Applicant2").unwrap().get("INCOME"), Value::Wildcard);
    }

    #[test]
    fn test_loaded_model_evaluates() {
        let model = from_json(TWO_LEVEL).unwrap();
        let out = evaluate(
            &model,
            &model.alternatives,
            &EvalOptions::new(EvalMethod::Set),
        )
        .unwrap();
        // min(rich, {low, high}) on an ascending 3x3 min table
        assert_eq!(out[0].get("RISK"), Value::set([0, 2]));
        assert_eq!(out[1].get("RISK"), Value::set([0, 1]));
    }

    #[test]
    fn test_scale_block_variants() {
        let def: ScaleDef = serde_json::from_str(
            r#"{"order": "desc", "values": [
                {"name": "ok", "group": "good"},
                {"name": "flagged", "group": "bad"}
            ]}"#,
        )
        .unwrap();
        let scale = build_scale(&def).unwrap();
        assert_eq!(scale.order(), Order::Descending);
        assert_eq!(scale.value_quality(&Value::Index(0)), Some(Quality::Good));

        let def: ScaleDef = serde_json::from_str(r#"{"low": -1.0, "high": 1.0}"#).unwrap();
        let scale = build_scale(&def).unwrap();
        assert!(scale.is_continuous());

        let def: ScaleDef = serde_json::from_str(r#"{"order": "sideways"}"#).unwrap();
        assert!(build_scale(&def).is_err());
    }

    #[test]
    fn test_discretize_block() {
        let text = r#"{
            "name": "D",
            "attributes": [
                {
                    "name": "X",
                    "scale": {"values": [{"name": "low"}, {"name": "high"}]},
                    "function": {"discretize": {
                        "bounds": [{"value": 0.0, "associate": "up"}],
                        "values": ["low", "high"]
                    }},
                    "attributes": [{"name": "N", "scale": {}}]
                }
            ]
        }"#;
        let model = from_json(text).unwrap();
        let alt = crate::model::Alternative::new("probe").with_value("N", Value::Continuous(0.0));
        let out = evaluate(&model, &[alt], &EvalOptions::new(EvalMethod::Set)).unwrap();
        assert_eq!(out[0].get("X"), Value::Index(1));
    }

    #[test]
    fn test_bad_cell_text_is_fatal() {
        let text = r#"{
            "name": "M",
            "attributes": [
                {
                    "name": "A",
                    "scale": {"values": [{"name": "no"}, {"name": "yes"}]},
                    "values": ["maybe"]
                }
            ]
        }"#;
        assert!(matches!(from_json(text), Err(ModelError::Cell { .. })));
    }

    #[test]
    fn test_rule_length_mismatch_is_fatal() {
        let text = r#"{
            "name": "M",
            "attributes": [
                {
                    "name": "Y",
                    "scale": {"values": [{"name": "no"}, {"name": "yes"}]},
                    "function": {"low": "01"},
                    "attributes": [
                        {"name": "A", "scale": {"values": [{"name": "no"}, {"name": "yes"}]}},
                        {"name": "B", "scale": {"values": [{"name": "no"}, {"name": "yes"}]}}
                    ]
                }
            ]
        }"#;
        assert!(matches!(from_json(text), Err(ModelError::Function { .. })));
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        assert!(matches!(from_json("{"), Err(ModelError::Decode(_))));
    }
}
