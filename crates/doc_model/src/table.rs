//! Table model - Tables, rows, cells, and their attributes
//!
//! A table is a sequence of rows, a row is a sequence of cells. Cells come in
//! two flavours (plain and header) that share the same attributes:
//! - `colspan` / `rowspan`: number of grid columns / rows occupied
//! - `colwidth`: optional per-column pixel widths, one entry per spanned column
//! - `rowheight`: optional per-row pixel heights, one entry per spanned row
//! - host-supplied extra attributes, carried but never interpreted

use crate::{AttrValue, DimensionList, Node, NodeId, NodeType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Cell Attributes
// =============================================================================

/// Whether a cell is a plain data cell or a header cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellKind {
    #[default]
    Data,
    Header,
}

/// Attributes of a table cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellAttrs {
    /// Number of grid columns this cell spans
    pub colspan: u32,
    /// Number of grid rows this cell spans
    pub rowspan: u32,
    /// Explicit widths, one per spanned column
    pub colwidth: Option<DimensionList>,
    /// Explicit heights, one per spanned row
    pub rowheight: Option<DimensionList>,
    /// Host-supplied attributes
    #[serde(default)]
    pub extra: BTreeMap<String, AttrValue>,
}

impl Default for CellAttrs {
    fn default() -> Self {
        Self {
            colspan: 1,
            rowspan: 1,
            colwidth: None,
            rowheight: None,
            extra: BTreeMap::new(),
        }
    }
}

impl CellAttrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes for a cell spanning `colspan` columns and `rowspan` rows
    pub fn spanning(colspan: u32, rowspan: u32) -> Self {
        Self {
            colspan,
            rowspan,
            ..Self::default()
        }
    }

    /// Set explicit column widths
    pub fn with_colwidth(mut self, colwidth: DimensionList) -> Self {
        self.colwidth = Some(colwidth);
        self
    }

    /// Set explicit row heights
    pub fn with_rowheight(mut self, rowheight: DimensionList) -> Self {
        self.rowheight = Some(rowheight);
        self
    }

    /// Set a host-supplied attribute
    pub fn with_extra(mut self, name: impl Into<String>, value: AttrValue) -> Self {
        self.extra.insert(name.into(), value);
        self
    }

    /// Column span, at least 1
    pub fn effective_colspan(&self) -> usize {
        self.colspan.max(1) as usize
    }

    /// Row span, at least 1
    pub fn effective_rowspan(&self) -> usize {
        self.rowspan.max(1) as usize
    }

    /// `colwidth` if its length agrees with the column span
    pub fn valid_colwidth(&self) -> Option<&DimensionList> {
        self.colwidth
            .as_ref()
            .filter(|list| list.len() == self.effective_colspan())
    }

    /// `rowheight` if its length agrees with the row span
    pub fn valid_rowheight(&self) -> Option<&DimensionList> {
        self.rowheight
            .as_ref()
            .filter(|list| list.len() == self.effective_rowspan())
    }
}

// =============================================================================
// Table Cell
// =============================================================================

/// A cell in a table row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCell {
    id: NodeId,
    parent: Option<NodeId>,
    /// IDs of child nodes (paragraphs)
    children: Vec<NodeId>,
    /// Plain or header cell
    pub kind: CellKind,
    /// Cell attributes
    pub attrs: CellAttrs,
}

impl TableCell {
    /// Create a plain cell with default attributes
    pub fn new() -> Self {
        Self::with_attrs(CellAttrs::default())
    }

    /// Create a plain cell with the given attributes
    pub fn with_attrs(attrs: CellAttrs) -> Self {
        Self {
            id: NodeId::new(),
            parent: None,
            children: Vec::new(),
            kind: CellKind::Data,
            attrs,
        }
    }

    /// Create a header cell with the given attributes
    pub fn header(attrs: CellAttrs) -> Self {
        Self {
            kind: CellKind::Header,
            ..Self::with_attrs(attrs)
        }
    }

    /// Create a cell that spans multiple columns and rows
    pub fn spanning(colspan: u32, rowspan: u32) -> Self {
        Self::with_attrs(CellAttrs::spanning(colspan, rowspan))
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<NodeId> {
        &mut self.children
    }
}

impl Default for TableCell {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for TableCell {
    fn id(&self) -> NodeId {
        self.id
    }

    fn node_type(&self) -> NodeType {
        match self.kind {
            CellKind::Data => NodeType::TableCell,
            CellKind::Header => NodeType::TableHeader,
        }
    }

    fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }
}

// =============================================================================
// Table Row
// =============================================================================

/// Attributes of a table row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowAttrs {
    /// Height hints for the row; the first entry applies to the row itself
    pub rowheight: Option<DimensionList>,
}

impl RowAttrs {
    /// Explicit height hint of the row
    pub fn height(&self) -> Option<f32> {
        self.rowheight.as_ref().and_then(|list| list.get(0))
    }
}

/// A row in a table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRow {
    id: NodeId,
    parent: Option<NodeId>,
    /// IDs of child cells
    cells: Vec<NodeId>,
    /// Row attributes
    pub attrs: RowAttrs,
}

impl TableRow {
    /// Create a new empty row
    pub fn new() -> Self {
        Self::with_attrs(RowAttrs::default())
    }

    /// Create a row with attributes
    pub fn with_attrs(attrs: RowAttrs) -> Self {
        Self {
            id: NodeId::new(),
            parent: None,
            cells: Vec::new(),
            attrs,
        }
    }

    /// Get the number of cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<NodeId> {
        &mut self.cells
    }
}

impl Default for TableRow {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for TableRow {
    fn id(&self) -> NodeId {
        self.id
    }

    fn node_type(&self) -> NodeType {
        NodeType::TableRow
    }

    fn children(&self) -> &[NodeId] {
        &self.cells
    }

    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }
}

// =============================================================================
// Table
// =============================================================================

/// A table containing rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    id: NodeId,
    parent: Option<NodeId>,
    /// IDs of rows
    rows: Vec<NodeId>,
}

impl Table {
    /// Create a new empty table
    pub fn new() -> Self {
        Self {
            id: NodeId::new(),
            parent: None,
            rows: Vec::new(),
        }
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the row at a specific index
    pub fn row_at(&self, index: usize) -> Option<NodeId> {
        self.rows.get(index).copied()
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<NodeId> {
        &mut self.rows
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for Table {
    fn id(&self) -> NodeId {
        self.id
    }

    fn node_type(&self) -> NodeType {
        NodeType::Table
    }

    fn children(&self) -> &[NodeId] {
        &self.rows
    }

    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_spans() {
        let mut attrs = CellAttrs::new();
        assert_eq!(attrs.effective_colspan(), 1);
        assert_eq!(attrs.effective_rowspan(), 1);

        attrs.colspan = 3;
        assert_eq!(attrs.effective_colspan(), 3);

        attrs.colspan = 0; // Invalid but handled
        assert_eq!(attrs.effective_colspan(), 1);
    }

    #[test]
    fn test_colwidth_must_match_span() {
        let attrs = CellAttrs::spanning(2, 1).with_colwidth(DimensionList::from_values(&[10.0]));
        assert!(attrs.valid_colwidth().is_none());

        let attrs = CellAttrs::spanning(2, 1).with_colwidth(DimensionList::from_values(&[10.0, 20.0]));
        assert_eq!(attrs.valid_colwidth().map(|l| l.len()), Some(2));
    }

    #[test]
    fn test_header_cells() {
        let cell = TableCell::header(CellAttrs::spanning(2, 1));
        assert_eq!(cell.node_type(), NodeType::TableHeader);
        assert_eq!(cell.kind, CellKind::Header);
        assert_eq!(TableCell::new().node_type(), NodeType::TableCell);
    }

    #[test]
    fn test_row_height_hint() {
        let attrs = RowAttrs {
            rowheight: Some(DimensionList::from_values(&[42.0])),
        };
        assert_eq!(attrs.height(), Some(42.0));
        assert_eq!(RowAttrs::default().height(), None);
    }
}
