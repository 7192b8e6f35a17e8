//! The column/row resizing interaction
//!
//! `ColumnResizing` owns the resize state of one editor and reacts to the
//! host's pointer events and document changes. Hover finds the border under
//! the pointer, pointer-down starts a drag session, moves feed the live
//! preview, and release commits one transaction through the editing engine.

use crate::{
    handle_decorations, locate_edge, resize_transaction, try_resize_transaction, ActiveEdge,
    Axis, CellContext, DragAnchor, DragSession, EdgeHit, EditorView, HandleDecoration,
    PointerEvent, PointerEventSource, ResizeAction, ResizeError, ResizeOptions, ResizePhase,
    ResizePreview, ResizeState, ResizeUpdate, Result, TableMap, TableMapCache,
};
use doc_model::{DocumentTree, NodeId, NodeType};
use edit_engine::{DispatchedTransaction, EditingEngine};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Resize interaction for one editor
pub struct ColumnResizing {
    options: ResizeOptions,
    state: ResizeState,
    cache: TableMapCache,
    session: Option<DragSession>,
    pointer_source: Rc<dyn PointerEventSource>,
    preview: Box<dyn ResizePreview>,
}

impl ColumnResizing {
    pub fn new(
        options: ResizeOptions,
        pointer_source: Rc<dyn PointerEventSource>,
        preview: Box<dyn ResizePreview>,
    ) -> Self {
        Self {
            options,
            state: ResizeState::new(),
            cache: TableMapCache::new(),
            session: None,
            pointer_source,
            preview,
        }
    }

    pub fn options(&self) -> &ResizeOptions {
        &self.options
    }

    pub fn state(&self) -> ResizeState {
        self.state
    }

    pub fn phase(&self) -> ResizePhase {
        self.state.phase()
    }

    pub fn cache(&self) -> &TableMapCache {
        &self.cache
    }

    /// Whether a drag session currently holds global listeners
    pub fn has_drag_session(&self) -> bool {
        self.session.is_some()
    }

    fn set_state(&mut self, state: ResizeState) {
        if state != self.state {
            debug!(
                from = ?self.state.phase(),
                to = ?state.phase(),
                edge = ?state.active_edge(),
                "resize state changed"
            );
        }
        self.state = state;
    }

    fn end_session(&mut self) {
        if let Some(session) = self.session.take() {
            session.teardown();
        }
    }

    /// Pointer moved over the editor while no drag is in progress
    pub fn handle_pointer_move(&mut self, view: &dyn EditorView, tree: &DocumentTree, event: &PointerEvent) {
        if self.state.is_dragging() {
            return;
        }
        let next = match locate_edge(view, tree, &mut self.cache, event, &self.options) {
            EdgeHit::Unchanged => return,
            EdgeHit::Edge(edge) => Some(edge),
            EdgeHit::NoEdge => None,
        };
        if next != self.state.active_edge() {
            self.set_state(self.state.apply(ResizeAction::SetHandle(next)));
        }
    }

    /// Pointer left the editor
    pub fn handle_pointer_leave(&mut self) {
        if self.state.active_edge().is_some() && !self.state.is_dragging() {
            self.set_state(self.state.apply(ResizeAction::SetHandle(None)));
        }
    }

    /// Pointer pressed; starts a drag when an edge is active.
    ///
    /// Returns whether the event was consumed.
    pub fn handle_pointer_down(&mut self, view: &dyn EditorView, tree: &DocumentTree, event: &PointerEvent) -> bool {
        let Some(edge) = self.state.active_edge() else {
            return false;
        };
        if self.state.is_dragging() {
            return false;
        }

        let anchor = DragAnchor {
            anchor_coordinate: edge.axis.coordinate(event.point),
            anchor_dimension: self.current_dimension(view, tree, edge),
        };
        self.set_state(self.state.apply(ResizeAction::SetDragging(Some(anchor))));
        self.end_session();
        self.session = Some(DragSession::begin(Rc::clone(&self.pointer_source), edge, anchor));
        true
    }

    /// Global pointer move during a drag. A move with no button pressed
    /// finishes the drag like a release.
    pub fn handle_drag_move(&mut self, engine: &mut EditingEngine, event: &PointerEvent) -> Option<DispatchedTransaction> {
        if !event.any_button_pressed() {
            return self.handle_drag_release(engine, event);
        }
        let (Some(edge), Some(drag)) = (self.state.active_edge(), self.state.drag()) else {
            return None;
        };

        let value = drag.dragged_dimension(edge.axis.coordinate(event.point), self.options.min_size(edge.axis));
        let tree = engine.tree();
        if let Some(context) = CellContext::resolve(tree, &mut self.cache, edge.pos) {
            trace!(pos = edge.pos, value, "drag preview");
            self.preview.preview(&ResizeUpdate {
                tree,
                map: &context.map,
                table: context.table,
                axis: edge.axis,
                index: context.rect.trailing(edge.axis),
                value,
            });
        }
        None
    }

    /// Global pointer release during a drag: commit the dragged dimension.
    ///
    /// The resulting transaction is already folded into this plugin's state
    /// and must not be passed to `on_transaction` again.
    pub fn handle_drag_release(&mut self, engine: &mut EditingEngine, event: &PointerEvent) -> Option<DispatchedTransaction> {
        self.end_session();
        let (Some(edge), Some(drag)) = (self.state.active_edge(), self.state.drag()) else {
            return None;
        };

        let value = drag.dragged_dimension(edge.axis.coordinate(event.point), self.options.min_size(edge.axis));
        let context = CellContext::resolve(engine.tree(), &mut self.cache, edge.pos);
        let transaction = resize_transaction(engine.tree(), &mut self.cache, edge, value);

        let dispatched = match engine.dispatch(transaction) {
            Ok(dispatched) => dispatched,
            Err(err) => {
                warn!(pos = edge.pos, "failed to commit resize: {}", err);
                None
            }
        };
        if let Some(dispatched) = &dispatched {
            self.on_transaction(engine.tree(), dispatched);
        }
        self.set_state(self.state.apply(ResizeAction::SetDragging(None)));

        if let Some(context) = context {
            debug!(pos = edge.pos, axis = ?edge.axis, value, "resize committed");
            let tree = engine.tree();
            match self.cache.get(tree, context.table) {
                Ok(map) => self.preview.commit(&ResizeUpdate {
                    tree,
                    map: &map,
                    table: context.table,
                    axis: edge.axis,
                    index: context.rect.trailing(edge.axis),
                    value,
                }),
                Err(err) => warn!(table = %context.table, "table vanished during commit: {}", err),
            }
        }
        dispatched
    }

    /// Fold a document change into the plugin: invalidate touched grids and
    /// remap the active edge
    pub fn on_transaction(&mut self, tree: &DocumentTree, dispatched: &DispatchedTransaction) {
        self.cache.apply_transaction(dispatched);
        let was_dragging = self.state.is_dragging();
        self.set_state(self.state.remap(&dispatched.mapping, tree));
        if was_dragging && !self.state.is_dragging() {
            warn!("drag target removed by a document change, ending drag");
            self.end_session();
        }
    }

    /// Set the trailing column (or row) of the cell at `edge` to `value`
    /// without a drag. Returns `None` when nothing changed.
    pub fn resize_to(
        &mut self,
        engine: &mut EditingEngine,
        edge: ActiveEdge,
        value: f32,
    ) -> Result<Option<DispatchedTransaction>> {
        let transaction = try_resize_transaction(engine.tree(), &mut self.cache, edge, value)?;
        let dispatched = engine.dispatch(transaction)?;
        if let Some(dispatched) = &dispatched {
            self.on_transaction(engine.tree(), dispatched);
        }
        Ok(dispatched)
    }

    /// Grid map of a table, for painting
    pub fn table_map(&mut self, tree: &DocumentTree, table: NodeId) -> Result<Arc<TableMap>> {
        if tree.node_type(table) != Some(NodeType::Table) {
            return Err(ResizeError::NotATable(table));
        }
        Ok(self.cache.get(tree, table)?)
    }

    /// Handle markers for the active edge
    pub fn decorations(&mut self, tree: &DocumentTree) -> Vec<HandleDecoration> {
        match self.state.active_edge() {
            Some(edge) => handle_decorations(tree, &mut self.cache, edge),
            None => Vec::new(),
        }
    }

    /// Attributes to add to the editor root
    pub fn editor_attributes(&self) -> BTreeMap<String, String> {
        let mut attributes = BTreeMap::new();
        if let Some(edge) = self.state.active_edge() {
            attributes.insert("class".to_string(), edge.axis.cursor_class().to_string());
        }
        attributes
    }

    /// Dimension of the edge cell's trailing slot when the drag starts.
    ///
    /// Uses the last explicit entry if set; otherwise the rendered size minus
    /// the explicit entries, split over the unset ones. A list whose length
    /// disagrees with the span is ignored.
    fn current_dimension(&self, view: &dyn EditorView, tree: &DocumentTree, edge: ActiveEdge) -> f32 {
        let fallback = self.options.min_size(edge.axis);
        let Some(cell) = tree.node_at(edge.pos).and_then(|id| tree.get_table_cell(id)) else {
            return fallback;
        };
        let (span, list) = match edge.axis {
            Axis::Column => (cell.attrs.effective_colspan(), cell.attrs.valid_colwidth()),
            Axis::Row => (cell.attrs.effective_rowspan(), cell.attrs.valid_rowheight()),
        };
        if let Some(last) = list.and_then(|l| l.last()) {
            return last;
        }

        let Some(rect) = view.node_rect(edge.pos) else {
            return fallback;
        };
        let (explicit, unset) = list.map_or((0.0, span), |l| l.explicit_total());
        let parts = unset.max(1);
        (edge.axis.extent(&rect) - explicit) / parts as f32
    }
}

impl Drop for ColumnResizing {
    fn drop(&mut self) {
        self.end_session();
    }
}
