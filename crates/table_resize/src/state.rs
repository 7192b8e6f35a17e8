//! Resize interaction state

use crate::Axis;
use doc_model::DocumentTree;
use edit_engine::{Assoc, Mapping};

/// A draggable cell border: the cell at `pos` owns its trailing edge on `axis`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveEdge {
    /// Position directly before the owning cell
    pub pos: usize,
    pub axis: Axis,
}

/// Pointer coordinate and cell dimension captured when a drag starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragAnchor {
    pub anchor_coordinate: f32,
    pub anchor_dimension: f32,
}

impl DragAnchor {
    /// Dimension implied by the pointer at `coordinate`, never below `min`
    pub fn dragged_dimension(&self, coordinate: f32, min: f32) -> f32 {
        let offset = coordinate - self.anchor_coordinate;
        (self.anchor_dimension + offset).max(min)
    }
}

/// Phase of the interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizePhase {
    Idle,
    Hover,
    Dragging,
}

/// Explicit state change
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeAction {
    /// Set or clear the active edge; always ends a drag
    SetHandle(Option<ActiveEdge>),
    /// Start or end a drag on the current edge
    SetDragging(Option<DragAnchor>),
}

/// State of the resize interaction for one editor
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResizeState {
    active_edge: Option<ActiveEdge>,
    drag: Option<DragAnchor>,
}

impl ResizeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_edge(&self) -> Option<ActiveEdge> {
        self.active_edge
    }

    pub fn drag(&self) -> Option<DragAnchor> {
        self.drag
    }

    pub fn phase(&self) -> ResizePhase {
        match (self.active_edge, self.drag) {
            (Some(_), Some(_)) => ResizePhase::Dragging,
            (Some(_), None) => ResizePhase::Hover,
            (None, _) => ResizePhase::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.phase() == ResizePhase::Dragging
    }

    /// Apply an explicit action
    pub fn apply(self, action: ResizeAction) -> Self {
        match action {
            ResizeAction::SetHandle(edge) => Self {
                active_edge: edge,
                drag: None,
            },
            ResizeAction::SetDragging(drag) => Self {
                active_edge: self.active_edge,
                drag: drag.filter(|_| self.active_edge.is_some()),
            },
        }
    }

    /// Carry the active edge through a document change.
    ///
    /// The edge is dropped, together with any drag on it, when its cell was
    /// deleted or the mapped position no longer sits before a cell.
    pub fn remap(self, mapping: &Mapping, tree: &DocumentTree) -> Self {
        let Some(edge) = self.active_edge else {
            return self;
        };

        let mapped = mapping.map_result(edge.pos, Assoc::Before);
        let still_cell = !mapped.deleted_after
            && tree
                .resolve(mapped.pos)
                .map(|resolved| resolved.points_at_cell(tree))
                .unwrap_or(false);

        if still_cell {
            Self {
                active_edge: Some(ActiveEdge {
                    pos: mapped.pos,
                    axis: edge.axis,
                }),
                drag: self.drag,
            }
        } else {
            tracing::debug!(pos = edge.pos, "active edge no longer denotes a cell, clearing");
            Self::default()
        }
    }
}
