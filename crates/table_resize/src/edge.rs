//! Locating the cell border under the pointer

use crate::{
    cell_element_around, ActiveEdge, Axis, CellRect, EditorView, PointerEvent, ResizeError,
    ResizeOptions, Result, TableMap, TableMapCache,
};
use doc_model::{DocumentTree, NodeId};
use std::sync::Arc;

/// Outcome of hit-testing a pointer position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeHit {
    /// The pointer is on a draggable border
    Edge(ActiveEdge),
    /// The pointer is not on any draggable border
    NoEdge,
    /// The pointer is on a border that must not become active; keep whatever
    /// edge is currently active
    Unchanged,
}

/// A cell together with the grid of its table
#[derive(Debug, Clone)]
pub struct CellContext {
    pub table: NodeId,
    /// Position where the table's content starts
    pub table_start: usize,
    pub map: Arc<TableMap>,
    /// Cell position relative to `table_start`
    pub cell: usize,
    pub rect: CellRect,
}

impl CellContext {
    /// Context of the cell directly after `cell_pos`
    pub fn lookup(tree: &DocumentTree, cache: &mut TableMapCache, cell_pos: usize) -> Result<Self> {
        let not_a_cell = || ResizeError::NotACell(cell_pos);
        let resolved = tree.resolve(cell_pos)?;
        if !resolved.points_at_cell(tree) {
            return Err(not_a_cell());
        }
        let table_depth = resolved.depth().checked_sub(1).ok_or_else(not_a_cell)?;
        let table = resolved.node(table_depth).ok_or_else(not_a_cell)?;
        let table_start = resolved.start(table_depth).ok_or_else(not_a_cell)?;
        let map = cache.get(tree, table)?;
        let cell = cell_pos - table_start;
        let rect = map.find_cell(cell).ok_or_else(not_a_cell)?;
        Ok(Self {
            table,
            table_start,
            map,
            cell,
            rect,
        })
    }

    /// Like `lookup`, for the interaction path where a missing cell is not an error
    pub fn resolve(tree: &DocumentTree, cache: &mut TableMapCache, cell_pos: usize) -> Option<Self> {
        match Self::lookup(tree, cache, cell_pos) {
            Ok(context) => Some(context),
            Err(ResizeError::NotACell(_)) => None,
            Err(err) => {
                tracing::warn!(pos = cell_pos, "cannot resolve cell: {}", err);
                None
            }
        }
    }

    /// Absolute position of a cell given relative to the table
    pub fn absolute(&self, relative: usize) -> usize {
        self.table_start + relative
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    fn axis(self) -> Axis {
        match self {
            Side::Left | Side::Right => Axis::Column,
            Side::Top | Side::Bottom => Axis::Row,
        }
    }
}

/// Find the draggable border under the pointer
pub fn locate_edge(
    view: &dyn EditorView,
    tree: &DocumentTree,
    cache: &mut TableMapCache,
    event: &PointerEvent,
    options: &ResizeOptions,
) -> EdgeHit {
    let Some(cell_element) = event.target.and_then(|target| cell_element_around(view, target)) else {
        return EdgeHit::NoEdge;
    };
    let Some(rect) = view.bounding_rect(cell_element) else {
        return EdgeHit::NoEdge;
    };

    let (x, y) = (event.point.x, event.point.y);
    let threshold = options.handle_width;
    let side = if x - rect.left() <= threshold {
        Side::Left
    } else if rect.right() - x <= threshold {
        Side::Right
    } else if options.row_resizing && rect.top() - y >= -threshold {
        Side::Top
    } else if options.row_resizing && rect.bottom() - y <= threshold {
        Side::Bottom
    } else {
        return EdgeHit::NoEdge;
    };

    let Some(edge) = edge_cell(view, tree, cache, event, side, threshold) else {
        return EdgeHit::NoEdge;
    };

    if !options.last_column_resizable && edge.axis == Axis::Column {
        if let Some(context) = CellContext::resolve(tree, cache, edge.pos) {
            if context.rect.right == context.map.width {
                return EdgeHit::Unchanged;
            }
        }
    }

    EdgeHit::Edge(edge)
}

/// Cell owning the border on `side` of the cell under the pointer
fn edge_cell(
    view: &dyn EditorView,
    tree: &DocumentTree,
    cache: &mut TableMapCache,
    event: &PointerEvent,
    side: Side,
    threshold: f32,
) -> Option<ActiveEdge> {
    let axis = side.axis();
    let inward = match side {
        Side::Left | Side::Top => threshold,
        Side::Right | Side::Bottom => -threshold,
    };
    let pos = view.pos_at_coords(event.point.shifted(axis, inward))?;
    let cell_pos = tree.resolve(pos).ok()?.cell_around(tree)?;

    if matches!(side, Side::Right | Side::Bottom) {
        return Some(ActiveEdge { pos: cell_pos, axis });
    }

    let context = CellContext::resolve(tree, cache, cell_pos)?;
    let map = &context.map;
    let index = context.rect.top * map.width + context.rect.left;
    let neighbour = match side {
        Side::Left if index % map.width == 0 => return None,
        Side::Left => map.map[index - 1],
        _ if index < map.width => return None,
        _ => map.map[index - map.width],
    };
    // a repaired hole can borrow the cell itself across the border
    if neighbour == context.cell {
        return None;
    }
    Some(ActiveEdge {
        pos: context.absolute(neighbour),
        axis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ElementId, Point, Rect};
    use doc_model::TableCell;

    const COL: f32 = 100.0;
    const ROW: f32 = 30.0;

    /// Renders the first table of a document as a grid of 100x30 slots at
    /// the origin. Cell elements are numbered `1000 + relative position`.
    struct GridView {
        table_start: usize,
        map: TableMap,
    }

    impl GridView {
        fn new(tree: &DocumentTree) -> Self {
            let table = tree.body()[0];
            Self {
                table_start: tree.position_of(table).unwrap() + 1,
                map: TableMap::build(tree, table).unwrap(),
            }
        }

        fn cell_rect(&self, relative: usize) -> Option<Rect> {
            let r = self.map.find_cell(relative)?;
            Some(Rect::new(
                r.left as f32 * COL,
                r.top as f32 * ROW,
                (r.right - r.left) as f32 * COL,
                (r.bottom - r.top) as f32 * ROW,
            ))
        }

        fn slot_at(&self, point: Point) -> Option<usize> {
            if point.x < 0.0 || point.y < 0.0 {
                return None;
            }
            self.map
                .position_at((point.y / ROW) as usize, (point.x / COL) as usize)
        }

        fn event(&self, x: f32, y: f32) -> PointerEvent {
            let point = Point::new(x, y);
            let target = self.slot_at(point).map(|rel| ElementId(1000 + rel as u64));
            PointerEvent::new(point, target.or(Some(ElementId(0))), 0)
        }
    }

    impl EditorView for GridView {
        fn element_parent(&self, element: ElementId) -> Option<ElementId> {
            (element.0 != 0).then_some(ElementId(0))
        }

        fn is_editor_root(&self, element: ElementId) -> bool {
            element.0 == 0
        }

        fn is_table_cell(&self, element: ElementId) -> bool {
            element.0 >= 1000
        }

        fn bounding_rect(&self, element: ElementId) -> Option<Rect> {
            self.cell_rect(element.0.checked_sub(1000)? as usize)
        }

        fn pos_at_coords(&self, point: Point) -> Option<usize> {
            // inside the cell's first paragraph
            self.slot_at(point).map(|rel| self.table_start + rel + 2)
        }

        fn node_rect(&self, pos: usize) -> Option<Rect> {
            self.cell_rect(pos.checked_sub(self.table_start)?)
        }
    }

    /// 2x2 table at position 0: cells at 2, 6, 12, 16
    fn setup() -> (DocumentTree, GridView, TableMapCache) {
        let mut tree = DocumentTree::new();
        tree.insert_simple_table(2, 2).unwrap();
        let view = GridView::new(&tree);
        (tree, view, TableMapCache::new())
    }

    fn locate(view: &GridView, tree: &DocumentTree, cache: &mut TableMapCache, x: f32, y: f32, options: &ResizeOptions) -> EdgeHit {
        locate_edge(view, tree, cache, &view.event(x, y), options)
    }

    fn column(pos: usize) -> EdgeHit {
        EdgeHit::Edge(ActiveEdge { pos, axis: Axis::Column })
    }

    fn row(pos: usize) -> EdgeHit {
        EdgeHit::Edge(ActiveEdge { pos, axis: Axis::Row })
    }

    #[test]
    fn test_right_edge_belongs_to_cell() {
        let (tree, view, mut cache) = setup();
        let options = ResizeOptions::default();
        assert_eq!(locate(&view, &tree, &mut cache, 99.0, 15.0, &options), column(2));
        assert_eq!(locate(&view, &tree, &mut cache, 197.0, 45.0, &options), column(16));
    }

    #[test]
    fn test_left_edge_belongs_to_left_neighbour() {
        let (tree, view, mut cache) = setup();
        let options = ResizeOptions::default();
        assert_eq!(locate(&view, &tree, &mut cache, 102.0, 15.0, &options), column(2));
        // outer border of the grid
        assert_eq!(locate(&view, &tree, &mut cache, 2.0, 15.0, &options), EdgeHit::NoEdge);
    }

    #[test]
    fn test_row_edges() {
        let (tree, view, mut cache) = setup();
        let options = ResizeOptions::default();
        assert_eq!(locate(&view, &tree, &mut cache, 50.0, 28.0, &options), row(2));
        assert_eq!(locate(&view, &tree, &mut cache, 50.0, 32.0, &options), row(2));
        assert_eq!(locate(&view, &tree, &mut cache, 50.0, 2.0, &options), EdgeHit::NoEdge);
    }

    #[test]
    fn test_interior_is_no_edge() {
        let (tree, view, mut cache) = setup();
        let options = ResizeOptions::default();
        assert_eq!(locate(&view, &tree, &mut cache, 50.0, 15.0, &options), EdgeHit::NoEdge);
    }

    #[test]
    fn test_row_resizing_disabled() {
        let (tree, view, mut cache) = setup();
        let options = ResizeOptions {
            row_resizing: false,
            ..Default::default()
        };
        assert_eq!(locate(&view, &tree, &mut cache, 50.0, 28.0, &options), EdgeHit::NoEdge);
    }

    #[test]
    fn test_last_column_not_resizable() {
        let (tree, view, mut cache) = setup();
        let options = ResizeOptions {
            last_column_resizable: false,
            ..Default::default()
        };
        assert_eq!(locate(&view, &tree, &mut cache, 199.0, 15.0, &options), EdgeHit::Unchanged);
        assert_eq!(locate(&view, &tree, &mut cache, 99.0, 15.0, &options), column(2));
    }

    #[test]
    fn test_pointer_outside_cells() {
        let (tree, view, mut cache) = setup();
        let event = PointerEvent::new(Point::new(500.0, 500.0), Some(ElementId(0)), 0);
        let options = ResizeOptions::default();
        assert_eq!(locate_edge(&view, &tree, &mut cache, &event, &options), EdgeHit::NoEdge);

        let event = PointerEvent::new(Point::new(99.0, 15.0), None, 0);
        assert_eq!(locate_edge(&view, &tree, &mut cache, &event, &options), EdgeHit::NoEdge);
    }

    #[test]
    fn test_edges_beside_repaired_hole() {
        // row 0 is empty and borrows its slots from the cells at 4 and 8
        let mut tree = DocumentTree::new();
        tree.insert_table_with_cells(vec![vec![], vec![TableCell::new(), TableCell::new()]], None)
            .unwrap();
        let view = GridView::new(&tree);
        let mut cache = TableMapCache::new();
        let options = ResizeOptions::default();

        assert_eq!(locate(&view, &tree, &mut cache, 102.0, 45.0, &options), column(4));
        assert_eq!(locate(&view, &tree, &mut cache, 50.0, 32.0, &options), EdgeHit::NoEdge);
        assert_eq!(locate(&view, &tree, &mut cache, 150.0, 58.0, &options), row(8));
    }

    #[test]
    fn test_cell_context() {
        let (tree, _, mut cache) = setup();
        let context = CellContext::resolve(&tree, &mut cache, 16).unwrap();
        assert_eq!(context.table_start, 1);
        assert_eq!(context.cell, 15);
        assert_eq!(context.rect, CellRect { left: 1, top: 1, right: 2, bottom: 2 });
        assert_eq!(context.absolute(5), 6);
        assert!(CellContext::resolve(&tree, &mut cache, 1).is_none());
        assert!(matches!(
            CellContext::lookup(&tree, &mut cache, 1),
            Err(ResizeError::NotACell(1))
        ));
        assert!(matches!(
            CellContext::lookup(&tree, &mut cache, 500),
            Err(ResizeError::DocModel(_))
        ));
    }
}
