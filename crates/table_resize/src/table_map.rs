//! Table grid maps
//!
//! A `TableMap` projects the rows and cells of a table onto a dense
//! `width x height` grid. Each slot holds the position of the cell covering
//! it, relative to the start of the table's content. Spanning cells cover
//! several slots that all hold the same position.
//!
//! Malformed spans never fail the build. Colspans that run into a slot
//! already taken by a row span are cut to the free run, row spans are cut to
//! the rows that exist, and slots no cell reaches are filled from a
//! neighbouring slot. Every such repair is recorded in `problems`.

use crate::Axis;
use doc_model::{DocModelError, DocumentTree, NodeId, NodeType};
use std::collections::{BTreeMap, HashSet};

/// Grid rectangle covered by a cell; `right` and `bottom` are exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRect {
    pub left: usize,
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
}

impl CellRect {
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.top && row < self.bottom && col >= self.left && col < self.right
    }

    /// Last grid column or row the cell covers on `axis`
    pub fn trailing(&self, axis: Axis) -> usize {
        match axis {
            Axis::Column => self.right - 1,
            Axis::Row => self.bottom - 1,
        }
    }
}

/// A repair made while building a map
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableProblem {
    /// A colspan ran into occupied slots and was cut
    ColspanClamped { pos: usize, declared: usize, placed: usize },
    /// A rowspan ran past the last row and was cut
    RowspanClamped { pos: usize, declared: usize, placed: usize },
    /// `n` slots at the end of row `row` were not covered by any cell
    Missing { row: usize, n: usize },
    /// A cell's colwidth list disagrees with its colspan
    ColwidthMismatch { pos: usize },
}

/// Dense grid index over a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMap {
    /// Number of grid columns
    pub width: usize,
    /// Number of grid rows
    pub height: usize,
    /// Row-major slots holding relative cell positions
    pub map: Vec<usize>,
    cells: BTreeMap<usize, CellRect>,
    problems: Vec<TableProblem>,
}

impl TableMap {
    /// Build the map for a table node
    pub fn build(tree: &DocumentTree, table_id: NodeId) -> Result<Self, DocModelError> {
        if tree.node_type(table_id) != Some(NodeType::Table) {
            return Err(DocModelError::TreeStructureError(format!(
                "{} is not a table",
                table_id
            )));
        }

        let rows = tree.children(table_id);
        let height = rows.len();
        let mut grid: Vec<Vec<Option<usize>>> = vec![Vec::new(); height];
        let mut cells = BTreeMap::new();
        let mut problems = Vec::new();
        let mut width = 0;

        let mut row_pos = 0;
        for (row_idx, &row_id) in rows.iter().enumerate() {
            let mut cell_pos = row_pos + 1;
            let mut col = 0;
            for &cell_id in tree.children(row_id) {
                let size = tree.node_size(cell_id);
                let cell = tree.get_table_cell(cell_id).ok_or_else(|| {
                    DocModelError::TreeStructureError(format!("row child {} is not a cell", cell_id))
                })?;

                col = next_free_col(&grid[row_idx], col);

                let declared_colspan = cell.attrs.effective_colspan();
                let colspan = match free_run(&grid[row_idx], col) {
                    Some(free) => declared_colspan.min(free),
                    None => declared_colspan,
                };
                if colspan < declared_colspan {
                    problems.push(TableProblem::ColspanClamped {
                        pos: cell_pos,
                        declared: declared_colspan,
                        placed: colspan,
                    });
                }

                let declared_rowspan = cell.attrs.effective_rowspan();
                let rowspan = declared_rowspan.min(height - row_idx);
                if rowspan < declared_rowspan {
                    problems.push(TableProblem::RowspanClamped {
                        pos: cell_pos,
                        declared: declared_rowspan,
                        placed: rowspan,
                    });
                }

                if let Some(colwidth) = &cell.attrs.colwidth {
                    if colwidth.len() != declared_colspan {
                        problems.push(TableProblem::ColwidthMismatch { pos: cell_pos });
                    }
                }

                mark_occupied(&mut grid, row_idx, col, rowspan, colspan, cell_pos);
                cells.insert(
                    cell_pos,
                    CellRect {
                        left: col,
                        top: row_idx,
                        right: col + colspan,
                        bottom: row_idx + rowspan,
                    },
                );
                width = width.max(col + colspan);
                col += colspan;
                cell_pos += size;
            }
            row_pos += tree.node_size(row_id);
        }

        let map = fill_holes(grid, width, &mut problems);
        tracing::trace!(width, height, problems = problems.len(), "table map built");

        Ok(Self {
            width,
            height,
            map,
            cells,
            problems,
        })
    }

    /// Repairs made while building
    pub fn problems(&self) -> &[TableProblem] {
        &self.problems
    }

    /// All cells with the rectangles they cover
    pub fn cells(&self) -> impl Iterator<Item = (usize, CellRect)> + '_ {
        self.cells.iter().map(|(&pos, &rect)| (pos, rect))
    }

    /// Rectangle of the cell at relative position `pos`
    pub fn find_cell(&self, pos: usize) -> Option<CellRect> {
        self.cells.get(&pos).copied()
    }

    /// Grid columns strictly left of the cell's top-left slot
    pub fn col_count(&self, pos: usize) -> Option<usize> {
        self.find_cell(pos).map(|rect| rect.left)
    }

    /// Grid rows strictly above the cell's top-left slot
    pub fn row_count(&self, pos: usize) -> Option<usize> {
        self.find_cell(pos).map(|rect| rect.top)
    }

    /// Cell position in slot `(row, col)`
    pub fn position_at(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.map.get(row * self.width + col).copied()
    }

    /// First slot index holding `pos`
    pub fn index_of(&self, pos: usize) -> Option<usize> {
        self.map.iter().position(|&p| p == pos)
    }

    /// The neighbouring cell on `axis`, `dir` < 0 meaning left / up
    pub fn next_cell(&self, pos: usize, axis: Axis, dir: i32) -> Option<usize> {
        let rect = self.find_cell(pos)?;
        match axis {
            Axis::Column => {
                let col = if dir < 0 {
                    rect.left.checked_sub(1)?
                } else {
                    rect.right
                };
                self.position_at(rect.top, col)
            }
            Axis::Row => {
                let row = if dir < 0 {
                    rect.top.checked_sub(1)?
                } else {
                    rect.bottom
                };
                self.position_at(row, rect.left)
            }
        }
    }

    /// Positions of the cells whose top-left slot lies inside `rect`, each once
    pub fn cells_in_rect(&self, rect: CellRect) -> Vec<usize> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for row in rect.top..rect.bottom.min(self.height) {
            for col in rect.left..rect.right.min(self.width) {
                let index = row * self.width + col;
                let pos = self.map[index];
                if !seen.insert(pos) {
                    continue;
                }
                let starts_outside = (col == rect.left && col > 0 && self.map[index - 1] == pos)
                    || (row == rect.top && row > 0 && self.map[index - self.width] == pos);
                if starts_outside {
                    continue;
                }
                result.push(pos);
            }
        }
        result
    }
}

fn next_free_col(row: &[Option<usize>], start: usize) -> usize {
    let mut col = start;
    while row.get(col).map_or(false, Option::is_some) {
        col += 1;
    }
    col
}

/// Free slots from `col` up to the next occupied one; `None` when unbounded
fn free_run(row: &[Option<usize>], col: usize) -> Option<usize> {
    row.iter()
        .skip(col)
        .position(Option::is_some)
}

fn mark_occupied(
    grid: &mut [Vec<Option<usize>>],
    row_idx: usize,
    col: usize,
    rowspan: usize,
    colspan: usize,
    pos: usize,
) {
    for row in grid.iter_mut().skip(row_idx).take(rowspan) {
        if row.len() < col + colspan {
            row.resize(col + colspan, None);
        }
        for slot in &mut row[col..col + colspan] {
            debug_assert!(slot.is_none(), "grid slot claimed twice");
            *slot = Some(pos);
        }
    }
}

/// Flatten the grid, filling uncovered slots from the left, then from
/// above, then from below
fn fill_holes(
    mut grid: Vec<Vec<Option<usize>>>,
    width: usize,
    problems: &mut Vec<TableProblem>,
) -> Vec<usize> {
    for (row_idx, row) in grid.iter_mut().enumerate() {
        row.resize(width, None);
        let missing = row.iter().filter(|slot| slot.is_none()).count();
        if missing > 0 {
            problems.push(TableProblem::Missing { row: row_idx, n: missing });
        }
        for col in 1..width {
            if row[col].is_none() {
                row[col] = row[col - 1];
            }
        }
    }
    for row_idx in 1..grid.len() {
        for col in 0..width {
            if grid[row_idx][col].is_none() {
                grid[row_idx][col] = grid[row_idx - 1][col];
            }
        }
    }
    for row_idx in (0..grid.len().saturating_sub(1)).rev() {
        for col in 0..width {
            if grid[row_idx][col].is_none() {
                grid[row_idx][col] = grid[row_idx + 1][col];
            }
        }
    }

    grid.into_iter()
        .flatten()
        .map(|slot| slot.unwrap_or_default())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::{CellAttrs, DimensionList, TableCell};

    fn build(rows: Vec<Vec<TableCell>>) -> TableMap {
        let mut tree = DocumentTree::new();
        let table = tree.insert_table_with_cells(rows, None).unwrap();
        TableMap::build(&tree, table).unwrap()
    }

    fn cell(colspan: u32, rowspan: u32) -> TableCell {
        TableCell::spanning(colspan, rowspan)
    }

    #[test]
    fn test_simple_grid() {
        let map = build(vec![vec![cell(1, 1), cell(1, 1)], vec![cell(1, 1), cell(1, 1)]]);
        assert_eq!((map.width, map.height), (2, 2));
        // cells are 4 wide, rows 10: row 0 content starts at 1, row 1 at 11
        assert_eq!(map.map, vec![1, 5, 11, 15]);
        assert!(map.problems().is_empty());
    }

    #[test]
    fn test_spanning_cells_share_slots() {
        let map = build(vec![vec![cell(2, 1)], vec![cell(1, 1), cell(1, 1)]]);
        assert_eq!(map.width, 2);
        assert_eq!(map.map[0], map.map[1]);
        assert_eq!(map.find_cell(1), Some(CellRect { left: 0, top: 0, right: 2, bottom: 1 }));
    }

    #[test]
    fn test_rowspan_pushes_next_row_cells_right() {
        let map = build(vec![
            vec![cell(1, 2), cell(1, 1)],
            vec![cell(1, 1)],
        ]);
        assert_eq!(map.width, 2);
        let second_row_cell = map.position_at(1, 1).unwrap();
        assert_eq!(map.col_count(second_row_cell), Some(1));
        assert_eq!(map.row_count(second_row_cell), Some(1));
        assert_eq!(map.position_at(1, 0), map.position_at(0, 0));
    }

    #[test]
    fn test_colspan_clamped_by_pending_rowspan() {
        // row 1: slot 1 is held by the rowspan above, so the colspan 2 cell at
        // column 0 only gets one column
        let map = build(vec![
            vec![cell(1, 1), cell(1, 2)],
            vec![cell(2, 1)],
        ]);
        let clamped = map.position_at(1, 0).unwrap();
        assert_eq!(map.find_cell(clamped).unwrap().right, 1);
        assert!(map
            .problems()
            .iter()
            .any(|p| matches!(p, TableProblem::ColspanClamped { declared: 2, placed: 1, .. })));
    }

    #[test]
    fn test_rowspan_clamped_to_height() {
        let map = build(vec![vec![cell(1, 5)]]);
        assert_eq!(map.height, 1);
        assert_eq!(map.find_cell(1).unwrap().bottom, 1);
        assert!(matches!(
            map.problems()[0],
            TableProblem::RowspanClamped { declared: 5, placed: 1, .. }
        ));
    }

    #[test]
    fn test_zero_spans_are_one() {
        let map = build(vec![vec![cell(0, 0), cell(1, 1)]]);
        assert_eq!(map.width, 2);
        assert!(map.problems().is_empty());
    }

    #[test]
    fn test_short_rows_are_filled() {
        let map = build(vec![vec![cell(1, 1), cell(1, 1), cell(1, 1)], vec![cell(1, 1)]]);
        assert_eq!(map.width, 3);
        assert_eq!(map.map.len(), 6);
        let only = map.position_at(1, 0).unwrap();
        assert_eq!(map.position_at(1, 1), Some(only));
        assert_eq!(map.position_at(1, 2), Some(only));
        assert_eq!(map.problems(), &[TableProblem::Missing { row: 1, n: 2 }]);
    }

    #[test]
    fn test_empty_row_filled_from_above() {
        let map = build(vec![vec![cell(1, 1), cell(1, 1)], vec![]]);
        assert_eq!(map.map.len(), 4);
        assert_eq!(map.position_at(1, 0), map.position_at(0, 0));
        assert_eq!(map.position_at(1, 1), map.position_at(0, 1));
    }

    #[test]
    fn test_colwidth_mismatch_is_reported() {
        let bad = TableCell::with_attrs(
            CellAttrs::spanning(2, 1).with_colwidth(DimensionList::from_values(&[100.0])),
        );
        let map = build(vec![vec![bad]]);
        assert_eq!(map.problems(), &[TableProblem::ColwidthMismatch { pos: 1 }]);
    }

    #[test]
    fn test_next_cell() {
        let map = build(vec![vec![cell(1, 1), cell(1, 1)], vec![cell(1, 1), cell(1, 1)]]);
        assert_eq!(map.next_cell(1, Axis::Column, 1), Some(5));
        assert_eq!(map.next_cell(1, Axis::Column, -1), None);
        assert_eq!(map.next_cell(1, Axis::Row, 1), Some(11));
        assert_eq!(map.next_cell(15, Axis::Row, -1), Some(5));
        assert_eq!(map.next_cell(15, Axis::Column, 1), None);
    }

    #[test]
    fn test_cells_in_rect_skips_cells_starting_outside() {
        let map = build(vec![vec![cell(2, 1), cell(1, 1)], vec![cell(1, 1), cell(1, 1), cell(1, 1)]]);
        let rect = CellRect { left: 1, top: 0, right: 3, bottom: 2 };
        let positions = map.cells_in_rect(rect);
        // the colspan cell begins at column 0 and is excluded
        assert!(!positions.contains(&1));
        assert_eq!(positions.len(), 3);
    }

    #[test]
    fn test_build_rejects_non_table() {
        let tree = DocumentTree::with_empty_paragraph();
        let para = tree.body()[0];
        assert!(TableMap::build(&tree, para).is_err());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn table_shape() -> impl Strategy<Value = Vec<Vec<(u32, u32)>>> {
            prop::collection::vec(prop::collection::vec((0u32..4, 0u32..4), 0..5), 1..5)
        }

        proptest! {
            #[test]
            fn grid_is_total_and_consistent(shape in table_shape()) {
                let rows = shape
                    .iter()
                    .map(|row| row.iter().map(|&(c, r)| cell(c, r)).collect())
                    .collect();
                let map = build(rows);

                prop_assert_eq!(map.map.len(), map.width * map.height);
                for &pos in &map.map {
                    prop_assert!(map.find_cell(pos).is_some());
                }

                let max_right = map.cells().map(|(_, rect)| rect.right).max().unwrap_or(0);
                prop_assert_eq!(map.width, max_right);

                // no two cells claim the same slot
                let rects: Vec<CellRect> = map.cells().map(|(_, rect)| rect).collect();
                for row in 0..map.height {
                    for col in 0..map.width {
                        let claims = rects.iter().filter(|r| r.contains(row, col)).count();
                        prop_assert!(claims <= 1);
                    }
                }

                // a slot inside a cell's rectangle points at that cell
                for (pos, rect) in map.cells() {
                    for row in rect.top..rect.bottom {
                        for col in rect.left..rect.right {
                            prop_assert_eq!(map.position_at(row, col), Some(pos));
                        }
                    }
                }
            }
        }
    }
}
