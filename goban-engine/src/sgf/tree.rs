//! Raw SGF syntax tree.
//!
//! Nodes live in an arena owned by [`SgfTree`]; children are listed by id and
//! `parent` is a plain back-index, so ownership only flows downward.

use std::fmt;

pub type NodeId = usize;

/// Id of the synthetic root holding the collection's game trees.
pub const ROOT: NodeId = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    /// A parenthesized branch. The first one among siblings is the main line.
    GameTree,
    /// One `;` node; its children are properties.
    PropList,
    Property { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SgfNode {
    pub kind: NodeKind,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    /// Position among the parent's children.
    pub index: usize,
}

impl SgfNode {
    pub fn key(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Property { key, .. } => Some(key),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Property { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn is_game_tree(&self) -> bool {
        self.kind == NodeKind::GameTree
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SgfTree {
    nodes: Vec<SgfNode>,
    chaff: String,
}

impl SgfTree {
    pub fn new() -> Self {
        SgfTree {
            nodes: vec![SgfNode {
                kind: NodeKind::Root,
                children: Vec::new(),
                parent: None,
                index: 0,
            }],
            chaff: String::new(),
        }
    }

    pub fn add_child(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.nodes.len();
        let index = self.nodes[parent].children.len();
        self.nodes.push(SgfNode {
            kind,
            children: Vec::new(),
            parent: Some(parent),
            index,
        });
        self.nodes[parent].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> &SgfNode {
        &self.nodes[id]
    }

    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[ROOT].children.is_empty()
    }

    /// Characters the parser skipped because they were outside any token.
    pub fn chaff(&self) -> &str {
        &self.chaff
    }

    pub(crate) fn push_chaff(&mut self, s: &str) {
        self.chaff.push_str(s);
    }

    /// Property nodes in document order. With `mainline_only`, only the first
    /// game tree is entered at each branch point.
    pub fn properties(&self, mainline_only: bool) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_properties(ROOT, mainline_only, &mut out);
        out
    }

    fn collect_properties(&self, id: NodeId, mainline_only: bool, out: &mut Vec<NodeId>) {
        for &child in self.children_of(id) {
            match self.nodes[child].kind {
                NodeKind::Property { .. } => out.push(child),
                NodeKind::GameTree if mainline_only => {
                    self.collect_properties(child, mainline_only, out);
                    break;
                }
                _ => self.collect_properties(child, mainline_only, out),
            }
        }
    }

    /// The main line's property nodes, in the order they replay.
    pub fn main_line(&self) -> Vec<NodeId> {
        self.properties(true)
    }

    /// First property with this key.
    pub fn find(&self, key: &str, mainline_only: bool) -> Option<&SgfNode> {
        self.properties(mainline_only)
            .into_iter()
            .map(|id| self.node(id))
            .find(|n| n.key() == Some(key))
    }

    /// Every property with this key.
    pub fn find_all(&self, key: &str, mainline_only: bool) -> Vec<&SgfNode> {
        self.properties(mainline_only)
            .into_iter()
            .map(|id| self.node(id))
            .filter(|n| n.key() == Some(key))
            .collect()
    }

    fn write_branch(&self, id: NodeId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for &child in self.children_of(id) {
            match &self.nodes[child].kind {
                NodeKind::PropList => {
                    write!(f, ";")?;
                    let mut last_key: Option<&str> = None;
                    for &prop in self.children_of(child) {
                        let node = self.node(prop);
                        let (Some(key), Some(value)) = (node.key(), node.value()) else {
                            continue;
                        };
                        if last_key != Some(key) {
                            write!(f, "{key}")?;
                        }
                        write!(f, "[{}]", escape(value))?;
                        last_key = Some(key);
                    }
                }
                NodeKind::GameTree => {
                    self.write_branch(child, f)?;
                    break;
                }
                _ => {}
            }
        }
        write!(f, ")")
    }
}

impl Default for SgfTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints the main line of the first game back as SGF.
impl fmt::Display for SgfTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.children_of(ROOT).first() {
            Some(&first) => self.write_branch(first, f),
            None => Ok(()),
        }
    }
}

pub(crate) fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == ']' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
