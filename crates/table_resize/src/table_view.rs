//! Column and row layout for rendering tables
//!
//! The painter sizes each grid column from the first explicit width found
//! in that column (scanning rows top to bottom), and each grid row likewise
//! from `rowheight`, falling back to the row's own height hint. While a drag
//! is in progress one column or row is overridden by the dragged value.

use crate::{Axis, TableMap};
use doc_model::{DocumentTree, NodeId};
use std::collections::HashMap;

/// Widths of the grid columns of one table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnLayout {
    /// Explicit width per column, `None` when the column sizes itself
    pub widths: Vec<Option<f32>>,
    /// Total width when every column has an explicit width
    pub table_width: Option<f32>,
    /// Lower bound on the table width
    pub min_width: f32,
}

/// Heights of the grid rows of one table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowLayout {
    pub heights: Vec<Option<f32>>,
    pub table_height: Option<f32>,
    pub min_height: f32,
}

/// Dimension of grid line `index` on `axis`, from the first cell that sets it
fn explicit_dimension(tree: &DocumentTree, map: &TableMap, table_start: usize, axis: Axis, index: usize) -> Option<f32> {
    let lines = match axis {
        Axis::Column => map.height,
        Axis::Row => map.width,
    };
    (0..lines).find_map(|line| {
        let (row, col) = match axis {
            Axis::Column => (line, index),
            Axis::Row => (index, line),
        };
        let pos = map.position_at(row, col)?;
        let rect = map.find_cell(pos).filter(|rect| rect.contains(row, col))?;
        let cell = tree.node_at(table_start + pos).and_then(|id| tree.get_table_cell(id))?;
        match axis {
            Axis::Column => cell.attrs.valid_colwidth()?.get(col - rect.left),
            Axis::Row => cell.attrs.valid_rowheight()?.get(row - rect.top),
        }
    })
}

fn totals(dimensions: &[Option<f32>], default_min: f32) -> (Option<f32>, f32) {
    let total: f32 = dimensions.iter().map(|d| d.unwrap_or(default_min)).sum();
    let fixed = dimensions.iter().all(Option::is_some);
    (fixed.then_some(total), total)
}

/// Column widths of a table, with an optional `(column, width)` override
pub fn column_layout(
    tree: &DocumentTree,
    table_id: NodeId,
    map: &TableMap,
    default_min: f32,
    override_column: Option<(usize, f32)>,
) -> ColumnLayout {
    let table_start = tree.position_of(table_id).map_or(0, |pos| pos + 1);
    let widths: Vec<Option<f32>> = (0..map.width)
        .map(|col| match override_column {
            Some((index, width)) if index == col => Some(width),
            _ => explicit_dimension(tree, map, table_start, Axis::Column, col),
        })
        .collect();
    let (table_width, min_width) = totals(&widths, default_min);
    ColumnLayout {
        widths,
        table_width,
        min_width,
    }
}

/// Row heights of a table, with an optional `(row, height)` override
pub fn row_layout(
    tree: &DocumentTree,
    table_id: NodeId,
    map: &TableMap,
    default_min: f32,
    override_row: Option<(usize, f32)>,
) -> RowLayout {
    let table_start = tree.position_of(table_id).map_or(0, |pos| pos + 1);
    let rows = tree.children(table_id);
    let heights: Vec<Option<f32>> = (0..map.height)
        .map(|row| match override_row {
            Some((index, height)) if index == row => Some(height),
            _ => explicit_dimension(tree, map, table_start, Axis::Row, row).or_else(|| {
                rows.get(row)
                    .and_then(|&id| tree.get_table_row(id))
                    .and_then(|r| r.attrs.height())
            }),
        })
        .collect();
    let (table_height, min_height) = totals(&heights, default_min);
    RowLayout {
        heights,
        table_height,
        min_height,
    }
}

/// A dimension change reported to the painter
#[derive(Debug, Clone, Copy)]
pub struct ResizeUpdate<'a> {
    pub tree: &'a DocumentTree,
    pub map: &'a TableMap,
    pub table: NodeId,
    pub axis: Axis,
    /// Grid column or row being resized
    pub index: usize,
    pub value: f32,
}

/// Receiver of live and final resize dimensions
pub trait ResizePreview {
    /// Show `update.value` for the dragged line without touching the document
    fn preview(&mut self, update: &ResizeUpdate<'_>);

    /// Called once when a drag completes, after the document was updated
    fn commit(&mut self, update: &ResizeUpdate<'_>);
}

/// Layout state of one rendered table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableView {
    pub columns: ColumnLayout,
    pub rows: RowLayout,
}

impl TableView {
    /// Recompute both layouts from the document
    pub fn update(&mut self, tree: &DocumentTree, table: NodeId, map: &TableMap, column_min: f32, row_min: f32) {
        self.columns = column_layout(tree, table, map, column_min, None);
        self.rows = row_layout(tree, table, map, row_min, None);
    }
}

/// Layouts of every rendered table, refreshed by resize previews and commits
#[derive(Debug, Clone, Default)]
pub struct TableViews {
    views: HashMap<NodeId, TableView>,
    /// Width assumed for columns without an explicit width
    pub column_min: f32,
    /// Height assumed for rows without an explicit height
    pub row_min: f32,
    commits: u64,
}

impl TableViews {
    pub fn new(column_min: f32, row_min: f32) -> Self {
        Self {
            views: HashMap::new(),
            column_min,
            row_min,
            commits: 0,
        }
    }

    pub fn view(&self, table: NodeId) -> Option<&TableView> {
        self.views.get(&table)
    }

    /// Number of completed drags seen
    pub fn commit_count(&self) -> u64 {
        self.commits
    }

    /// Refresh the layout of a table from the document
    pub fn refresh(&mut self, tree: &DocumentTree, table: NodeId, map: &TableMap) {
        let (column_min, row_min) = (self.column_min, self.row_min);
        self.views
            .entry(table)
            .or_default()
            .update(tree, table, map, column_min, row_min);
    }
}

impl ResizePreview for TableViews {
    fn preview(&mut self, update: &ResizeUpdate<'_>) {
        let (column_min, row_min) = (self.column_min, self.row_min);
        let view = self.views.entry(update.table).or_default();
        let line = Some((update.index, update.value));
        match update.axis {
            Axis::Column => {
                view.columns = column_layout(update.tree, update.table, update.map, column_min, line)
            }
            Axis::Row => view.rows = row_layout(update.tree, update.table, update.map, row_min, line),
        }
    }

    fn commit(&mut self, update: &ResizeUpdate<'_>) {
        self.commits += 1;
        self.refresh(update.tree, update.table, update.map);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::{CellAttrs, DimensionList, RowAttrs, TableCell};

    fn with_width(values: &[f32]) -> TableCell {
        TableCell::with_attrs(
            CellAttrs::spanning(values.len() as u32, 1).with_colwidth(DimensionList::from_values(values)),
        )
    }

    #[test]
    fn test_fixed_table_width() {
        let mut tree = DocumentTree::new();
        let table = tree
            .insert_table_with_cells(vec![vec![with_width(&[100.0]), with_width(&[50.0])]], None)
            .unwrap();
        let map = TableMap::build(&tree, table).unwrap();

        let layout = column_layout(&tree, table, &map, 100.0, None);
        assert_eq!(layout.widths, vec![Some(100.0), Some(50.0)]);
        assert_eq!(layout.table_width, Some(150.0));
        assert_eq!(layout.min_width, 150.0);
    }

    #[test]
    fn test_unset_columns_count_default_min() {
        let mut tree = DocumentTree::new();
        let table = tree
            .insert_table_with_cells(vec![vec![with_width(&[80.0]), TableCell::new()]], None)
            .unwrap();
        let map = TableMap::build(&tree, table).unwrap();

        let layout = column_layout(&tree, table, &map, 100.0, None);
        assert_eq!(layout.widths, vec![Some(80.0), None]);
        assert_eq!(layout.table_width, None);
        assert_eq!(layout.min_width, 180.0);

        let previewed = column_layout(&tree, table, &map, 100.0, Some((1, 60.0)));
        assert_eq!(previewed.table_width, Some(140.0));
    }

    #[test]
    fn test_width_found_in_lower_row() {
        let mut tree = DocumentTree::new();
        let table = tree
            .insert_table_with_cells(
                vec![vec![TableCell::new()], vec![with_width(&[70.0])]],
                None,
            )
            .unwrap();
        let map = TableMap::build(&tree, table).unwrap();
        assert_eq!(column_layout(&tree, table, &map, 100.0, None).widths, vec![Some(70.0)]);
    }

    #[test]
    fn test_row_height_falls_back_to_row_hint() {
        let mut tree = DocumentTree::new();
        let hint = RowAttrs {
            rowheight: Some(DimensionList::from_values(&[45.0])),
        };
        let table = tree
            .insert_table_with_rows(
                vec![(hint, vec![TableCell::new()]), (RowAttrs::default(), vec![TableCell::new()])],
                None,
            )
            .unwrap();
        let map = TableMap::build(&tree, table).unwrap();

        let layout = row_layout(&tree, table, &map, 25.0, None);
        assert_eq!(layout.heights, vec![Some(45.0), None]);
        assert_eq!(layout.min_height, 70.0);
    }

    #[test]
    fn test_table_views_preview_and_commit() {
        let mut tree = DocumentTree::new();
        let table = tree.insert_simple_table(1, 2).unwrap();
        let map = TableMap::build(&tree, table).unwrap();
        let mut views = TableViews::new(100.0, 25.0);

        let update = ResizeUpdate {
            tree: &tree,
            map: &map,
            table,
            axis: Axis::Column,
            index: 0,
            value: 140.0,
        };
        views.preview(&update);
        assert_eq!(views.view(table).unwrap().columns.widths, vec![Some(140.0), None]);

        views.commit(&update);
        assert_eq!(views.commit_count(), 1);
        // the document was not changed, so the committed layout has no widths
        assert_eq!(views.view(table).unwrap().columns.widths, vec![None, None]);
    }
}
