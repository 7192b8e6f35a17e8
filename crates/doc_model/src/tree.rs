//! Document tree storage, integer positions, and position resolution
//!
//! Positions count tokens the way a flat serialization of the tree would:
//! entering a node costs one position, leaving it costs one, and every
//! character of paragraph text costs one. Position 0 is the start of the
//! document body.

use crate::{
    CellAttrs, DocModelError, Node, NodeId, NodeType, Paragraph, Result, RowAttrs, Table,
    TableCell, TableRow,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Storage for different node types
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeStorage {
    pub paragraphs: HashMap<NodeId, Paragraph>,
    pub tables: HashMap<NodeId, Table>,
    pub table_rows: HashMap<NodeId, TableRow>,
    pub table_cells: HashMap<NodeId, TableCell>,
}

/// The complete document tree structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTree {
    /// Identity of the document node itself
    root: NodeId,
    /// Top-level blocks (paragraphs and tables)
    body: Vec<NodeId>,
    /// Storage for all nodes
    nodes: NodeStorage,
}

impl DocumentTree {
    /// Create a new empty document tree
    pub fn new() -> Self {
        Self {
            root: NodeId::new(),
            body: Vec::new(),
            nodes: NodeStorage::default(),
        }
    }

    /// Create a document tree with a single empty paragraph
    pub fn with_empty_paragraph() -> Self {
        let mut tree = Self::new();
        let root = tree.root;
        // Inserting into the root of a fresh tree cannot fail
        let _ = tree.insert_paragraph(Paragraph::new(), root, None);
        tree
    }

    /// Get the root node ID
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Top-level blocks
    pub fn body(&self) -> &[NodeId] {
        &self.body
    }

    // =========================================================================
    // Node lookup
    // =========================================================================

    /// Get the type of a node
    pub fn node_type(&self, id: NodeId) -> Option<NodeType> {
        if id == self.root {
            return Some(NodeType::Document);
        }
        if let Some(cell) = self.nodes.table_cells.get(&id) {
            return Some(cell.node_type());
        }
        if self.nodes.paragraphs.contains_key(&id) {
            Some(NodeType::Paragraph)
        } else if self.nodes.tables.contains_key(&id) {
            Some(NodeType::Table)
        } else if self.nodes.table_rows.contains_key(&id) {
            Some(NodeType::TableRow)
        } else {
            None
        }
    }

    /// Child IDs of a node (empty for paragraphs and unknown IDs)
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        if id == self.root {
            return &self.body;
        }
        if let Some(table) = self.nodes.tables.get(&id) {
            table.children()
        } else if let Some(row) = self.nodes.table_rows.get(&id) {
            row.children()
        } else if let Some(cell) = self.nodes.table_cells.get(&id) {
            cell.children()
        } else {
            &[]
        }
    }

    /// Parent ID of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        if let Some(para) = self.nodes.paragraphs.get(&id) {
            para.parent()
        } else if let Some(table) = self.nodes.tables.get(&id) {
            table.parent()
        } else if let Some(row) = self.nodes.table_rows.get(&id) {
            row.parent()
        } else {
            self.nodes.table_cells.get(&id).and_then(|cell| cell.parent())
        }
    }

    pub fn get_paragraph(&self, id: NodeId) -> Option<&Paragraph> {
        self.nodes.paragraphs.get(&id)
    }

    pub fn get_paragraph_mut(&mut self, id: NodeId) -> Option<&mut Paragraph> {
        self.nodes.paragraphs.get_mut(&id)
    }

    pub fn get_table(&self, id: NodeId) -> Option<&Table> {
        self.nodes.tables.get(&id)
    }

    pub fn get_table_row(&self, id: NodeId) -> Option<&TableRow> {
        self.nodes.table_rows.get(&id)
    }

    pub fn get_table_row_mut(&mut self, id: NodeId) -> Option<&mut TableRow> {
        self.nodes.table_rows.get_mut(&id)
    }

    pub fn get_table_cell(&self, id: NodeId) -> Option<&TableCell> {
        self.nodes.table_cells.get(&id)
    }

    pub fn get_table_cell_mut(&mut self, id: NodeId) -> Option<&mut TableCell> {
        self.nodes.table_cells.get_mut(&id)
    }

    /// All tables in the document
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.nodes.tables.values()
    }

    /// The innermost table containing a node (or the node itself)
    pub fn table_for_node(&self, node_id: NodeId) -> Option<NodeId> {
        let mut current = Some(node_id);
        while let Some(id) = current {
            if self.nodes.tables.contains_key(&id) {
                return Some(id);
            }
            current = self.parent(id);
        }
        None
    }

    /// Whether `ancestor` is `node_id` or one of its ancestors
    pub fn is_ancestor(&self, ancestor: NodeId, node_id: NodeId) -> bool {
        let mut current = Some(node_id);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    // =========================================================================
    // Sizes and positions
    // =========================================================================

    /// Size of a node's content
    pub fn content_size(&self, id: NodeId) -> usize {
        if let Some(para) = self.nodes.paragraphs.get(&id) {
            return para.char_len();
        }
        self.children(id)
            .iter()
            .map(|&child| self.node_size(child))
            .sum()
    }

    /// Size of a node including its opening and closing tokens
    pub fn node_size(&self, id: NodeId) -> usize {
        if id == self.root {
            self.content_size(id)
        } else {
            self.content_size(id) + 2
        }
    }

    /// Size of the document body; valid positions are `0..=doc_size()`
    pub fn doc_size(&self) -> usize {
        self.content_size(self.root)
    }

    /// Position directly before a node
    pub fn position_of(&self, id: NodeId) -> Option<usize> {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            chain.push(parent);
            current = parent;
        }
        if current != self.root || id == self.root {
            return None;
        }
        chain.reverse();

        let mut pos = 0;
        for pair in chain.windows(2) {
            let (parent, child) = (pair[0], pair[1]);
            let siblings = self.children(parent);
            let index = siblings.iter().position(|&s| s == child)?;
            pos += siblings[..index]
                .iter()
                .map(|&s| self.node_size(s))
                .sum::<usize>();
            if child != id {
                pos += 1;
            }
        }
        Some(pos)
    }

    /// The node starting directly at `pos`, at any depth
    pub fn node_at(&self, pos: usize) -> Option<NodeId> {
        let mut node = self.root;
        let mut rem = pos;
        loop {
            let mut offset = 0;
            let mut next = None;
            for &child in self.children(node) {
                let size = self.node_size(child);
                if rem < offset + size {
                    next = Some((child, offset));
                    break;
                }
                offset += size;
            }
            let (child, child_offset) = next?;
            if rem == child_offset {
                return Some(child);
            }
            rem -= child_offset + 1;
            node = child;
        }
    }

    /// Resolve a position into its ancestor chain
    pub fn resolve(&self, pos: usize) -> Result<ResolvedPos> {
        let size = self.doc_size();
        if pos > size {
            return Err(DocModelError::InvalidPosition { pos, size });
        }

        let mut path = Vec::new();
        let mut node = self.root;
        let mut start = 0;
        let mut rem = pos;
        loop {
            let children = self.children(node);
            let mut offset = 0;
            let mut index = children.len();
            let mut inside = None;
            for (i, &child) in children.iter().enumerate() {
                let child_size = self.node_size(child);
                if rem < offset + child_size {
                    index = i;
                    if rem > offset {
                        inside = Some((child, offset));
                    }
                    break;
                }
                offset += child_size;
            }
            path.push(PathEntry { node, index, start });
            match inside {
                Some((child, child_offset)) => {
                    start += child_offset + 1;
                    rem -= child_offset + 1;
                    node = child;
                }
                None => break,
            }
        }

        Ok(ResolvedPos {
            pos,
            path,
            parent_offset: rem,
        })
    }

    // =========================================================================
    // Construction
    // =========================================================================

    fn children_mut(&mut self, parent: NodeId) -> Result<&mut Vec<NodeId>> {
        if parent == self.root {
            return Ok(&mut self.body);
        }
        if let Some(table) = self.nodes.tables.get_mut(&parent) {
            Ok(table.children_mut())
        } else if let Some(row) = self.nodes.table_rows.get_mut(&parent) {
            Ok(row.children_mut())
        } else if let Some(cell) = self.nodes.table_cells.get_mut(&parent) {
            Ok(cell.children_mut())
        } else {
            Err(DocModelError::NodeNotFound(parent.as_uuid()))
        }
    }

    fn attach(&mut self, child: NodeId, parent: NodeId, index: Option<usize>) -> Result<()> {
        let children = self.children_mut(parent)?;
        match index {
            Some(i) if i <= children.len() => children.insert(i, child),
            Some(i) => {
                return Err(DocModelError::InvalidOperation(format!(
                    "child index {} out of bounds ({} children)",
                    i,
                    children.len()
                )))
            }
            None => children.push(child),
        }
        Ok(())
    }

    /// Insert a paragraph into the body or into a cell
    pub fn insert_paragraph(
        &mut self,
        mut para: Paragraph,
        parent_id: NodeId,
        index: Option<usize>,
    ) -> Result<NodeId> {
        match self.node_type(parent_id) {
            Some(NodeType::Document) | Some(NodeType::TableCell) | Some(NodeType::TableHeader) => {}
            Some(other) => {
                return Err(DocModelError::TreeStructureError(format!(
                    "paragraphs cannot be placed in {:?}",
                    other
                )))
            }
            None => return Err(DocModelError::NodeNotFound(parent_id.as_uuid())),
        }
        let id = para.id();
        para.set_parent(Some(parent_id));
        self.attach(id, parent_id, index)?;
        self.nodes.paragraphs.insert(id, para);
        Ok(id)
    }

    /// Insert a table into the body
    pub fn insert_table(&mut self, mut table: Table, index: Option<usize>) -> Result<NodeId> {
        let id = table.id();
        let root = self.root;
        table.set_parent(Some(root));
        self.attach(id, root, index)?;
        self.nodes.tables.insert(id, table);
        Ok(id)
    }

    /// Insert a row into a table
    pub fn insert_table_row(
        &mut self,
        mut row: TableRow,
        table_id: NodeId,
        index: Option<usize>,
    ) -> Result<NodeId> {
        if !self.nodes.tables.contains_key(&table_id) {
            return Err(DocModelError::NodeNotFound(table_id.as_uuid()));
        }
        let id = row.id();
        row.set_parent(Some(table_id));
        self.attach(id, table_id, index)?;
        self.nodes.table_rows.insert(id, row);
        Ok(id)
    }

    /// Insert a cell into a row
    pub fn insert_table_cell(
        &mut self,
        mut cell: TableCell,
        row_id: NodeId,
        index: Option<usize>,
    ) -> Result<NodeId> {
        if !self.nodes.table_rows.contains_key(&row_id) {
            return Err(DocModelError::NodeNotFound(row_id.as_uuid()));
        }
        let id = cell.id();
        cell.set_parent(Some(row_id));
        self.attach(id, row_id, index)?;
        self.nodes.table_cells.insert(id, cell);
        Ok(id)
    }

    /// Build a table from rows of cells, giving every cell an empty paragraph
    pub fn insert_table_with_cells(
        &mut self,
        rows: Vec<Vec<TableCell>>,
        index: Option<usize>,
    ) -> Result<NodeId> {
        let rows = rows
            .into_iter()
            .map(|cells| (RowAttrs::default(), cells))
            .collect();
        self.insert_table_with_rows(rows, index)
    }

    /// Build a table from attributed rows of cells
    pub fn insert_table_with_rows(
        &mut self,
        rows: Vec<(RowAttrs, Vec<TableCell>)>,
        index: Option<usize>,
    ) -> Result<NodeId> {
        let table_id = self.insert_table(Table::new(), index)?;
        for (attrs, cells) in rows {
            let row_id = self.insert_table_row(TableRow::with_attrs(attrs), table_id, None)?;
            for cell in cells {
                let cell_id = self.insert_table_cell(cell, row_id, None)?;
                self.insert_paragraph(Paragraph::new(), cell_id, None)?;
            }
        }
        Ok(table_id)
    }

    /// Build a table of `rows x cols` single-span cells
    pub fn insert_simple_table(&mut self, rows: usize, cols: usize) -> Result<NodeId> {
        let cells = (0..rows)
            .map(|_| (0..cols).map(|_| TableCell::with_attrs(CellAttrs::new())).collect())
            .collect();
        self.insert_table_with_cells(cells, None)
    }

    /// Remove a node and everything below it
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(DocModelError::InvalidOperation(
                "the document node cannot be removed".to_string(),
            ));
        }
        let parent = self
            .parent(id)
            .ok_or(DocModelError::NodeNotFound(id.as_uuid()))?;
        self.children_mut(parent)?.retain(|&child| child != id);

        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            pending.extend_from_slice(self.children(next));
            self.nodes.paragraphs.remove(&next);
            self.nodes.tables.remove(&next);
            self.nodes.table_rows.remove(&next);
            self.nodes.table_cells.remove(&next);
        }
        Ok(())
    }
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Resolved Positions
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PathEntry {
    node: NodeId,
    index: usize,
    start: usize,
}

/// A position together with the chain of nodes that contain it.
///
/// Depth 0 is the document; `depth()` is the innermost node whose content
/// contains the position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPos {
    /// The resolved position
    pub pos: usize,
    path: Vec<PathEntry>,
    parent_offset: usize,
}

impl ResolvedPos {
    /// Depth of the innermost containing node
    pub fn depth(&self) -> usize {
        self.path.len() - 1
    }

    /// Ancestor node at `depth`
    pub fn node(&self, depth: usize) -> Option<NodeId> {
        self.path.get(depth).map(|entry| entry.node)
    }

    /// Innermost containing node
    pub fn parent(&self) -> NodeId {
        self.path[self.depth()].node
    }

    /// Index into the ancestor at `depth`
    pub fn index(&self, depth: usize) -> Option<usize> {
        self.path.get(depth).map(|entry| entry.index)
    }

    /// Position where the content of the ancestor at `depth` starts
    pub fn start(&self, depth: usize) -> Option<usize> {
        self.path.get(depth).map(|entry| entry.start)
    }

    /// Position directly before the ancestor at `depth` (not defined for depth 0)
    pub fn before(&self, depth: usize) -> Option<usize> {
        if depth == 0 {
            return None;
        }
        self.start(depth).map(|start| start - 1)
    }

    /// Offset of the position into its parent's content
    pub fn parent_offset(&self) -> usize {
        self.parent_offset
    }

    /// The node directly after the position, if it sits on a node boundary
    pub fn node_after(&self, tree: &DocumentTree) -> Option<NodeId> {
        let parent = self.parent();
        let index = self.path[self.depth()].index;
        tree.children(parent).get(index).copied()
    }

    /// The node directly before the position, if it sits on a node boundary
    pub fn node_before(&self, tree: &DocumentTree) -> Option<NodeId> {
        let index = self.path[self.depth()].index;
        if index == 0 {
            return None;
        }
        tree.children(self.parent()).get(index - 1).copied()
    }

    /// Whether the position sits inside a row, directly before a cell
    pub fn points_at_cell(&self, tree: &DocumentTree) -> bool {
        tree.node_type(self.parent()) == Some(NodeType::TableRow)
            && self.node_after(tree).is_some()
    }

    /// Position directly before the innermost cell containing this position
    pub fn cell_around(&self, tree: &DocumentTree) -> Option<usize> {
        (1..self.depth()).rev().find_map(|depth| {
            let node = self.node(depth)?;
            if tree.node_type(node) == Some(NodeType::TableRow) {
                self.before(depth + 1)
            } else {
                None
            }
        })
    }
}
