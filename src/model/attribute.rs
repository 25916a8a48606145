//! Attributes and the builder-side attribute tree.

use crate::function::Function;
use crate::scale::Scale;
use crate::value::Value;

/// Index of an attribute inside the model arena.
pub type AttIdx = usize;

/// A single attribute of a built model.
///
/// Structural references (parent, inputs, link target) are arena indices
/// into the owning [`crate::model::Model`].
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: String,
    pub description: String,
    pub(crate) id: String,
    pub(crate) inputs: Vec<AttIdx>,
    pub(crate) parent: Option<AttIdx>,
    pub(crate) link: Option<AttIdx>,
    pub scale: Option<Scale>,
    pub funct: Option<Function>,
}

impl Attribute {
    /// The model-unique identifier derived from the attribute name.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn inputs(&self) -> &[AttIdx] {
        &self.inputs
    }

    pub fn parent(&self) -> Option<AttIdx> {
        self.parent
    }

    pub fn link(&self) -> Option<AttIdx> {
        self.link
    }

    /// Number of input attributes.
    pub fn ninp(&self) -> usize {
        self.inputs.len()
    }

    /// An attribute with no inputs. Linked attributes count as basic.
    pub fn is_basic(&self) -> bool {
        self.inputs.is_empty()
    }

    /// An attribute with inputs, aggregating their values.
    pub fn is_aggregate(&self) -> bool {
        !self.inputs.is_empty()
    }

    pub fn is_link(&self) -> bool {
        self.link.is_some()
    }
}

/// Builder-side description of one attribute subtree, consumed by
/// [`crate::model::Model::new`].
#[derive(Debug, Clone, Default)]
pub struct AttributeNode {
    pub name: String,
    pub description: String,
    pub scale: Option<Scale>,
    pub funct: Option<Function>,
    pub children: Vec<AttributeNode>,
    /// Raw per-alternative values of this attribute, one cell per
    /// alternative.
    pub cells: Vec<Value>,
}

impl AttributeNode {
    pub fn new(name: impl Into<String>) -> AttributeNode {
        AttributeNode {
            name: name.into(),
            ..AttributeNode::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> AttributeNode {
        self.description = description.into();
        self
    }

    pub fn with_scale(mut self, scale: Scale) -> AttributeNode {
        self.scale = Some(scale);
        self
    }

    pub fn with_funct(mut self, funct: Function) -> AttributeNode {
        self.funct = Some(funct);
        self
    }

    pub fn with_children<I: IntoIterator<Item = AttributeNode>>(mut self, children: I) -> AttributeNode {
        self.children = children.into_iter().collect();
        self
    }

    pub fn with_cells<I: IntoIterator<Item = Value>>(mut self, cells: I) -> AttributeNode {
        self.cells = cells.into_iter().collect();
        self
    }
}
