//! The model: a flat arena of attributes plus per-alternative storage.
//!
//! A [`Model`] is built once from a tree of [`AttributeNode`]s and is
//! immutable afterwards. Attributes live in a flat `Vec` in depth-first
//! pre-order, with parent, input and link references stored as arena
//! indices. Index 0 is always the virtual root.

mod alternative;
mod attribute;
mod check;

pub use alternative::Alternative;
pub use attribute::{AttIdx, Attribute, AttributeNode};
pub use check::CheckReport;

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::function::{Function, FunctionError};
use crate::scale::ValueError;
use crate::value::Value;

/// Identifier parts that attribute ids must not collide with.
const RESERVED_IDS: [&str; 2] = ["name", "description"];

/// Structural errors, fatal at model construction.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("the model has no attributes")]
    EmptyModel,
    #[error("attribute {attribute:?} is basic but carries a function")]
    FunctionOnBasic { attribute: String },
    #[error(
        "function of attribute {attribute:?} has dimensions {expected:?}, \
         its inputs provide {got:?}"
    )]
    FunctionDimensionMismatch {
        attribute: String,
        expected: Vec<usize>,
        got: Vec<usize>,
    },
    #[error("discretization at attribute {attribute:?} needs a single continuous input")]
    DiscretizeInput { attribute: String },
    #[error("attribute {attribute:?}: {source}")]
    Function {
        attribute: String,
        source: FunctionError,
    },
    #[error("cell of attribute {attribute:?}: {source}")]
    Cell {
        attribute: String,
        source: ValueError,
    },
    #[error("model description: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("model description: {0}")]
    Description(String),
}

/// Attribute counts by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttStat {
    pub all: usize,
    pub basic: usize,
    pub aggregate: usize,
    pub link: usize,
}

/// A hierarchical decision model.
#[derive(Debug, Clone)]
pub struct Model {
    pub name: String,
    pub description: String,
    pub linking: bool,
    attributes: Vec<Attribute>,
    by_id: HashMap<String, AttIdx>,
    non_root: Vec<AttIdx>,
    basic: Vec<AttIdx>,
    aggregate: Vec<AttIdx>,
    links: Vec<AttIdx>,
    pub alternatives: Vec<Alternative>,
}

impl Model {
    /// Builds a model from an attribute tree.
    ///
    /// `root` becomes the virtual root at index 0; its children are the
    /// top-level attributes. `alt_names` are the alternative names; cells
    /// attached to the tree nodes fill the alternatives' values. When
    /// `linking` is set, basic attributes are linked by name to equal-scaled
    /// counterparts elsewhere in the tree.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        linking: bool,
        root: AttributeNode,
        alt_names: Vec<String>,
    ) -> Result<Model, ModelError> {
        let (attributes, cells) = flatten(root);
        if attributes.len() < 2 {
            return Err(ModelError::EmptyModel);
        }
        let mut model = Model {
            name: name.into(),
            description: description.into(),
            linking,
            attributes,
            by_id: HashMap::new(),
            non_root: Vec::new(),
            basic: Vec::new(),
            aggregate: Vec::new(),
            links: Vec::new(),
            alternatives: Vec::new(),
        };
        model.validate_functions()?;
        if linking {
            model.link_attributes();
        }
        model.assign_ids();
        model.collect_subsets();
        model.collect_alternatives(alt_names, &cells);
        Ok(model)
    }

    /// The arena index of the virtual root.
    pub fn root(&self) -> AttIdx {
        0
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, idx: AttIdx) -> &Attribute {
        &self.attributes[idx]
    }

    /// Number of attributes, the root included.
    pub fn natt(&self) -> usize {
        self.attributes.len()
    }

    /// Looks up an attribute index by id.
    pub fn att_index(&self, id: &str) -> Option<AttIdx> {
        self.by_id.get(id).copied()
    }

    /// Looks up an attribute by id.
    pub fn attrib(&self, id: &str) -> Option<&Attribute> {
        self.att_index(id).map(|i| &self.attributes[i])
    }

    pub fn non_root(&self) -> &[AttIdx] {
        &self.non_root
    }

    pub fn basic(&self) -> &[AttIdx] {
        &self.basic
    }

    pub fn aggregate(&self) -> &[AttIdx] {
        &self.aggregate
    }

    pub fn links(&self) -> &[AttIdx] {
        &self.links
    }

    /// Ids of all non-root attributes, in arena order.
    pub fn non_root_ids(&self) -> Vec<&str> {
        self.non_root.iter().map(|&i| self.attributes[i].id()).collect()
    }

    /// Ids of all basic attributes, in arena order.
    pub fn basic_ids(&self) -> Vec<&str> {
        self.basic.iter().map(|&i| self.attributes[i].id()).collect()
    }

    /// Ids of all aggregate attributes, in arena order.
    pub fn aggregate_ids(&self) -> Vec<&str> {
        self.aggregate.iter().map(|&i| self.attributes[i].id()).collect()
    }

    /// Attribute counts by kind, the root excluded.
    pub fn att_stat(&self) -> AttStat {
        AttStat {
            all: self.non_root.len(),
            basic: self.basic.len(),
            aggregate: self.aggregate.len(),
            link: self.links.len(),
        }
    }

    /// Depth of an attribute below the root.
    pub fn level(&self, idx: AttIdx) -> usize {
        let mut level = 0;
        let mut at = idx;
        while let Some(parent) = self.attributes[at].parent {
            level += 1;
            at = parent;
        }
        level
    }

    /// Whether the value of `a` affects the value of `b`, following the
    /// parent chain.
    pub fn affects(&self, a: AttIdx, b: AttIdx) -> bool {
        let mut at = a;
        while let Some(parent) = self.attributes[at].parent {
            if parent == b {
                return true;
            }
            at = parent;
        }
        false
    }

    /// Input dimensions of an aggregate attribute: the discrete value count
    /// per input, `None` where an input has no discrete scale.
    pub fn dim(&self, idx: AttIdx) -> Vec<Option<usize>> {
        self.attributes[idx]
            .inputs
            .iter()
            .map(|&j| match &self.attributes[j].scale {
                Some(s) if s.is_discrete() => Some(s.count()),
                _ => None,
            })
            .collect()
    }

    /// The alternative with the given name.
    pub fn alternative(&self, name: &str) -> Option<&Alternative> {
        self.alternatives.iter().find(|a| a.name == name)
    }

    fn validate_functions(&self) -> Result<(), ModelError> {
        for att in &self.attributes {
            let Some(funct) = &att.funct else { continue };
            if att.inputs.is_empty() {
                return Err(ModelError::FunctionOnBasic {
                    attribute: att.name.clone(),
                });
            }
            match funct {
                Function::Tabular(f) => {
                    let got: Vec<usize> = att
                        .inputs
                        .iter()
                        .map(|&j| {
                            self.attributes[j]
                                .scale
                                .as_ref()
                                .map_or(0, |s| s.count())
                        })
                        .collect();
                    if f.dim() != got.as_slice() {
                        return Err(ModelError::FunctionDimensionMismatch {
                            attribute: att.name.clone(),
                            expected: f.dim().to_vec(),
                            got,
                        });
                    }
                }
                Function::Discretize(_) => {
                    let continuous_input = att.inputs.len() == 1
                        && self.attributes[att.inputs[0]]
                            .scale
                            .as_ref()
                            .map_or(true, |s| s.is_continuous());
                    if !continuous_input {
                        return Err(ModelError::DiscretizeInput {
                            attribute: att.name.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Links basic attributes to equal-named counterparts. A unique
    /// aggregate candidate is preferred, otherwise the last basic one;
    /// self-ancestors and scale mismatches are excluded. Already-linked
    /// attributes are not candidates.
    fn link_attributes(&mut self) {
        for i in 1..self.attributes.len() {
            if self.attributes[i].is_aggregate() {
                continue;
            }
            let mut basics = Vec::new();
            let mut aggregates = Vec::new();
            for j in 1..self.attributes.len() {
                if j == i
                    || self.attributes[j].name != self.attributes[i].name
                    || self.attributes[j].is_link()
                {
                    continue;
                }
                if self.attributes[j].is_aggregate() {
                    aggregates.push(j);
                } else {
                    basics.push(j);
                }
            }
            let target = if aggregates.len() == 1 {
                Some(aggregates[0])
            } else {
                basics.last().copied()
            };
            if let Some(target) = target {
                if !self.affects(i, target)
                    && self.attributes[i].scale == self.attributes[target].scale
                {
                    self.attributes[i].link = Some(target);
                }
            }
        }
    }

    fn assign_ids(&mut self) {
        let names: Vec<String> = self.attributes.iter().map(|a| a.name.clone()).collect();
        let ids = unique_names(&names, &RESERVED_IDS);
        for (att, id) in self.attributes.iter_mut().zip(ids) {
            att.id = id;
        }
        self.by_id = self
            .attributes
            .iter()
            .enumerate()
            .map(|(i, a)| (a.id.clone(), i))
            .collect();
    }

    fn collect_subsets(&mut self) {
        self.non_root = (1..self.attributes.len()).collect();
        self.basic = self
            .non_root
            .iter()
            .copied()
            .filter(|&i| self.attributes[i].is_basic())
            .collect();
        self.aggregate = self
            .non_root
            .iter()
            .copied()
            .filter(|&i| self.attributes[i].is_aggregate())
            .collect();
        self.links = self
            .non_root
            .iter()
            .copied()
            .filter(|&i| self.attributes[i].is_link())
            .collect();
    }

    fn collect_alternatives(&mut self, alt_names: Vec<String>, cells: &[Vec<Value>]) {
        let count = cells
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(alt_names.len());
        let mut names = alt_names;
        names.resize(count, "alternative".to_string());
        let names = unique_names(&names, &[]);
        self.alternatives = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                let mut alt = Alternative::new(name);
                for &att in &self.non_root {
                    if let Some(value) = cells[att].get(i) {
                        alt.set(self.attributes[att].id(), value.clone());
                    }
                }
                alt
            })
            .collect();
    }
}

/// Flattens the builder tree into the arena, depth-first pre-order, wiring
/// parent and input indices. Returns the arena and per-attribute raw cells.
fn flatten(root: AttributeNode) -> (Vec<Attribute>, Vec<Vec<Value>>) {
    let mut attributes = Vec::new();
    let mut cells = Vec::new();
    let mut stack = vec![(root, None::<AttIdx>)];
    while let Some((node, parent)) = stack.pop() {
        let idx = attributes.len();
        attributes.push(Attribute {
            name: node.name,
            description: node.description,
            id: String::new(),
            inputs: Vec::new(),
            parent,
            link: None,
            scale: node.scale,
            funct: node.funct,
        });
        cells.push(node.cells);
        if let Some(parent) = parent {
            attributes[parent].inputs.push(idx);
        }
        for child in node.children.into_iter().rev() {
            stack.push((child, Some(idx)));
        }
    }
    (attributes, cells)
}

/// Makes every name unique by appending `_<n>` suffixes, counting up from 1.
/// Reserved names are treated as already taken.
fn unique_names(names: &[String], reserved: &[&str]) -> Vec<String> {
    let mut seen: HashSet<String> = reserved.iter().map(|s| s.to_string()).collect();
    let mut result = Vec::with_capacity(names.len());
    for name in names {
        let mut candidate = name.clone();
        let mut n = 0;
        while seen.contains(&candidate) {
            n += 1;
            candidate = format!("{name}_{n}");
        }
        seen.insert(candidate.clone());
        result.push(candidate);
    }
    result
}
