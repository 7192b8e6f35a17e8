//! Node identity, node types and the common node interface

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node in the document tree.
///
/// Identity is stable across attribute edits, so it doubles as the key for
/// derived per-node data such as table grid maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Create a new random NodeId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for NodeId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Enumeration of all node types in the document tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Document,
    Paragraph,
    Table,
    TableRow,
    TableCell,
    TableHeader,
}

impl NodeType {
    /// The role this node type plays inside a table, if any
    pub fn table_role(&self) -> Option<TableRole> {
        match self {
            NodeType::Table => Some(TableRole::Table),
            NodeType::TableRow => Some(TableRole::Row),
            NodeType::TableCell => Some(TableRole::Cell),
            NodeType::TableHeader => Some(TableRole::HeaderCell),
            NodeType::Document | NodeType::Paragraph => None,
        }
    }

    /// Whether this is a plain or header cell
    pub fn is_cell(&self) -> bool {
        matches!(self, NodeType::TableCell | NodeType::TableHeader)
    }

    /// Whether the node holds text directly instead of child nodes
    pub fn is_textblock(&self) -> bool {
        matches!(self, NodeType::Paragraph)
    }
}

/// Structural role of a node within a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableRole {
    Table,
    Row,
    Cell,
    HeaderCell,
}

impl TableRole {
    /// Plain and header cells behave identically for geometry purposes
    pub fn is_cell(&self) -> bool {
        matches!(self, TableRole::Cell | TableRole::HeaderCell)
    }
}

/// Common interface for all document nodes
pub trait Node: std::fmt::Debug {
    /// Get the unique ID of this node
    fn id(&self) -> NodeId;

    /// Get the type of this node
    fn node_type(&self) -> NodeType;

    /// Get the IDs of child nodes
    fn children(&self) -> &[NodeId];

    /// Get the ID of the parent node (None for root)
    fn parent(&self) -> Option<NodeId>;

    /// Set the parent node ID
    fn set_parent(&mut self, parent: Option<NodeId>);

    /// Get the text content of this node (if any)
    fn text_content(&self) -> Option<&str> {
        None
    }
}
