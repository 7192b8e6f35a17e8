//! Handle markers for the active edge
//!
//! A marker is placed at the end of every cell whose trailing border lies on
//! the active grid line, once per distinct border segment.

use crate::{ActiveEdge, Axis, CellContext, TableMapCache};
use doc_model::DocumentTree;

/// A widget marker placed at a document position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleDecoration {
    /// Position at the end of the owning cell's content
    pub pos: usize,
    pub axis: Axis,
    /// Class of the rendered marker
    pub class: &'static str,
}

/// Markers for every border segment on the active edge's grid line
pub fn handle_decorations(
    tree: &DocumentTree,
    cache: &mut TableMapCache,
    edge: ActiveEdge,
) -> Vec<HandleDecoration> {
    let Some(context) = CellContext::resolve(tree, cache, edge.pos) else {
        return Vec::new();
    };
    let map = &context.map;
    let line = context.rect.trailing(edge.axis);
    let (count, last_line, along_step, across_step) = match edge.axis {
        Axis::Column => (map.height, map.width - 1, map.width, 1),
        Axis::Row => (map.width, map.height - 1, 1, map.width),
    };

    let mut decorations = Vec::new();
    for i in 0..count {
        let index = match edge.axis {
            Axis::Column => i * map.width + line,
            Axis::Row => line * map.width + i,
        };
        let cell = map.map[index];
        let border_differs = line == last_line || map.map[index + across_step] != cell;
        let starts_segment = i == 0 || map.map[index - along_step] != cell;
        if !(border_differs && starts_segment) {
            continue;
        }

        let Some(cell_id) = tree.node_at(context.absolute(cell)) else {
            continue;
        };
        decorations.push(HandleDecoration {
            pos: context.absolute(cell) + tree.node_size(cell_id) - 1,
            axis: edge.axis,
            class: edge.axis.handle_class(),
        });
    }
    decorations
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::TableCell;

    fn tree_with(rows: Vec<Vec<TableCell>>) -> DocumentTree {
        let mut tree = DocumentTree::new();
        tree.insert_table_with_cells(rows, None).unwrap();
        tree
    }

    #[test]
    fn test_one_marker_per_row_for_plain_grid() {
        let mut tree = DocumentTree::new();
        tree.insert_simple_table(2, 2).unwrap();
        let mut cache = TableMapCache::new();
        let edge = ActiveEdge { pos: 2, axis: Axis::Column };

        let decorations = handle_decorations(&tree, &mut cache, edge);
        // cells at 2 and 12, each 4 wide: ends at 5 and 15
        let positions: Vec<usize> = decorations.iter().map(|d| d.pos).collect();
        assert_eq!(positions, vec![5, 15]);
        assert!(decorations.iter().all(|d| d.class == "column-resize-handle"));
    }

    #[test]
    fn test_spanning_cell_gets_single_marker_per_axis() {
        let tree = tree_with(vec![vec![TableCell::spanning(2, 2)], vec![]]);
        let mut cache = TableMapCache::new();

        let columns = handle_decorations(&tree, &mut cache, ActiveEdge { pos: 2, axis: Axis::Column });
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].pos, 5);

        let rows = handle_decorations(&tree, &mut cache, ActiveEdge { pos: 2, axis: Axis::Row });
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].class, "row-resize-handle");
    }

    #[test]
    fn test_spanning_cell_inside_larger_grid() {
        // 3x3 grid with a 2x2 cell at (0,0); relative slots:
        // [1, 1, 5] / [1, 1, 11] / [17, 21, 25]
        let tree = tree_with(vec![
            vec![TableCell::spanning(2, 2), TableCell::new()],
            vec![TableCell::new()],
            vec![TableCell::new(), TableCell::new(), TableCell::new()],
        ]);
        let mut cache = TableMapCache::new();
        let edge_of = |axis| ActiveEdge { pos: 2, axis };

        // the spanning cell ends at 5
        let columns = handle_decorations(&tree, &mut cache, edge_of(Axis::Column));
        let positions: Vec<usize> = columns.iter().map(|d| d.pos).collect();
        assert_eq!(positions, vec![5, 25]);
        assert_eq!(positions.iter().filter(|&&pos| pos == 5).count(), 1);

        let rows = handle_decorations(&tree, &mut cache, edge_of(Axis::Row));
        let positions: Vec<usize> = rows.iter().map(|d| d.pos).collect();
        assert_eq!(positions, vec![5, 15]);
        assert_eq!(positions.iter().filter(|&&pos| pos == 5).count(), 1);
    }

    #[test]
    fn test_border_shared_with_span_is_skipped() {
        // row 0: A | B ; row 1: C spanning both columns
        let tree = tree_with(vec![
            vec![TableCell::new(), TableCell::new()],
            vec![TableCell::spanning(2, 1)],
        ]);
        let mut cache = TableMapCache::new();
        let decorations = handle_decorations(&tree, &mut cache, ActiveEdge { pos: 2, axis: Axis::Column });
        // the border after column 0 exists only in row 0
        assert_eq!(decorations.len(), 1);
        assert_eq!(decorations[0].pos, 5);
    }

    #[test]
    fn test_stale_edge_has_no_markers() {
        let mut tree = DocumentTree::new();
        tree.insert_simple_table(1, 1).unwrap();
        let mut cache = TableMapCache::new();
        assert!(handle_decorations(&tree, &mut cache, ActiveEdge { pos: 1, axis: Axis::Column }).is_empty());
    }
}
