//! The process tree
//!
//! Statements build a tree of named processes, each carrying four
//! ordered dependency sets (received inputs, produced outputs, respected
//! guidances, required mechanisms) and an acyclic parent/child
//! composition relation. The tree selects and populates the diagram to
//! render; everything spatial belongs to the layout engine.

use std::collections::HashMap;

use thiserror::Error;

use crate::layout::Diagram;
use crate::parser::ast::{Spanned, Statement, Verb};

/// Errors raised while building the process tree
#[derive(Debug, Error)]
pub enum ModelError {
    /// Adding a child that is already an ancestor of its would-be parent
    #[error("cyclic composition: {child:?} already contains {parent:?}")]
    CyclicComposition { parent: String, child: String },

    /// A process cannot be part of two compositions
    #[error("{child:?} is already composed into {existing_parent:?}")]
    AlreadyComposed {
        child: String,
        existing_parent: String,
    },

    /// The source declared no processes at all
    #[error("no processes declared")]
    Empty,
}

/// One process in the tree
#[derive(Debug, Clone)]
pub struct ProcessNode {
    name: String,
    parent: Option<usize>,
    children: Vec<usize>,
    inputs: Vec<String>,
    outputs: Vec<String>,
    guidances: Vec<String>,
    mechanisms: Vec<String>,
}

impl ProcessNode {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            guidances: Vec::new(),
            mechanisms: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_decomposable(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn children(&self) -> &[usize] {
        &self.children
    }

    fn add_unique(set: &mut Vec<String>, name: &str) {
        if !set.iter().any(|n| n == name) {
            set.push(name.to_string());
        }
    }
}

/// The whole declared decomposition
#[derive(Debug, Clone, Default)]
pub struct ProcessTree {
    nodes: Vec<ProcessNode>,
    index: HashMap<String, usize>,
}

impl ProcessTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the tree from parsed statements
    pub fn from_statements(statements: &[Spanned<Statement>]) -> Result<Self, ModelError> {
        let mut tree = Self::new();
        for statement in statements {
            let subject = statement.node.subject.as_str();
            let object = statement.node.object.as_str();
            match statement.node.verb {
                Verb::IsComposedOf => tree.compose(subject, object)?,
                Verb::Receives => {
                    let node = tree.entry(subject);
                    ProcessNode::add_unique(&mut tree.nodes[node].inputs, object);
                }
                Verb::Produces => {
                    let node = tree.entry(subject);
                    ProcessNode::add_unique(&mut tree.nodes[node].outputs, object);
                }
                Verb::Respects => {
                    let node = tree.entry(subject);
                    ProcessNode::add_unique(&mut tree.nodes[node].guidances, object);
                }
                Verb::Requires => {
                    let node = tree.entry(subject);
                    ProcessNode::add_unique(&mut tree.nodes[node].mechanisms, object);
                }
            }
        }
        Ok(tree)
    }

    fn entry(&mut self, name: &str) -> usize {
        if let Some(&i) = self.index.get(name) {
            return i;
        }
        let i = self.nodes.len();
        self.nodes.push(ProcessNode::new(name));
        self.index.insert(name.to_string(), i);
        i
    }

    /// Record `child` as part of `parent`'s decomposition
    ///
    /// Rejected at the point of addition when the child is already an
    /// ancestor of the parent, or already composed elsewhere.
    pub fn compose(&mut self, parent: &str, child: &str) -> Result<(), ModelError> {
        let p = self.entry(parent);
        let c = self.entry(child);
        if p == c || self.is_ancestor(c, p) {
            return Err(ModelError::CyclicComposition {
                parent: parent.to_string(),
                child: child.to_string(),
            });
        }
        if let Some(existing) = self.nodes[c].parent {
            if existing != p {
                return Err(ModelError::AlreadyComposed {
                    child: child.to_string(),
                    existing_parent: self.nodes[existing].name.clone(),
                });
            }
            return Ok(());
        }
        self.nodes[c].parent = Some(p);
        self.nodes[p].children.push(c);
        Ok(())
    }

    fn is_ancestor(&self, ancestor: usize, node: usize) -> bool {
        let mut current = self.nodes[node].parent;
        while let Some(i) = current {
            if i == ancestor {
                return true;
            }
            current = self.nodes[i].parent;
        }
        false
    }

    pub fn node(&self, index: usize) -> &ProcessNode {
        &self.nodes[index]
    }

    pub fn find(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// The first process declared without a parent
    pub fn root(&self) -> Result<usize, ModelError> {
        self.nodes
            .iter()
            .position(|n| n.is_root())
            .ok_or(ModelError::Empty)
    }

    /// Build the decomposition diagram of the given process
    ///
    /// The boundary declares the node's own dependency sets; each child
    /// becomes an activity box. A leaf renders as a single-box diagram
    /// under the same boundary, so every dependency shows as an external
    /// flow.
    pub fn decomposition(&self, index: usize) -> Diagram {
        let node = &self.nodes[index];
        let mut diagram = Diagram::new(node.name.clone());
        for name in &node.inputs {
            diagram.receives(name);
        }
        for name in &node.outputs {
            diagram.produces(name);
        }
        for name in &node.guidances {
            diagram.respects(name);
        }
        for name in &node.mechanisms {
            diagram.requires(name);
        }

        let members: Vec<usize> = if node.children.is_empty() {
            vec![index]
        } else {
            node.children.clone()
        };
        for &child_index in &members {
            let child = &self.nodes[child_index];
            let process_box = diagram.box_entry(&child.name);
            for name in &child.inputs {
                process_box.receives(name);
            }
            for name in &child.outputs {
                process_box.produces(name);
            }
            for name in &child.guidances {
                process_box.respects(name);
            }
            for name in &child.mechanisms {
                process_box.requires(name);
            }
        }
        diagram
    }
}
