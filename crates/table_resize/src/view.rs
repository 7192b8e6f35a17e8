//! Host view capabilities used for hit-testing
//!
//! The rendered editor is only reachable through `EditorView`: a tree of
//! elements with bounding rectangles, plus translation between screen
//! coordinates and document positions.

use crate::{Point, Rect};

/// Opaque identity of a rendered element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// Read access to the rendered editor
pub trait EditorView {
    /// Parent of a rendered element
    fn element_parent(&self, element: ElementId) -> Option<ElementId>;

    /// Whether the element is the editor's root container
    fn is_editor_root(&self, element: ElementId) -> bool;

    /// Whether the element renders a table cell (plain or header)
    fn is_table_cell(&self, element: ElementId) -> bool;

    /// Bounding rectangle of an element
    fn bounding_rect(&self, element: ElementId) -> Option<Rect>;

    /// Document position nearest to a screen point
    fn pos_at_coords(&self, point: Point) -> Option<usize>;

    /// Rendered rectangle of the node starting at `pos`
    fn node_rect(&self, pos: usize) -> Option<Rect>;
}

/// A pointer event as delivered by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub point: Point,
    /// Element under the pointer
    pub target: Option<ElementId>,
    /// Bit set of pressed buttons; 0 when none are down
    pub buttons: u16,
}

impl PointerEvent {
    pub fn new(point: Point, target: Option<ElementId>, buttons: u16) -> Self {
        Self { point, target, buttons }
    }

    pub fn any_button_pressed(&self) -> bool {
        self.buttons != 0
    }
}

/// Nearest table-cell element at or above `target`, stopping at the editor root
pub fn cell_element_around(view: &dyn EditorView, target: ElementId) -> Option<ElementId> {
    let mut current = Some(target);
    while let Some(element) = current {
        if view.is_editor_root(element) {
            return None;
        }
        if view.is_table_cell(element) {
            return Some(element);
        }
        current = view.element_parent(element);
    }
    None
}
