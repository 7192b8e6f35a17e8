//! Drag sessions and the global pointer listeners they hold

use crate::{ActiveEdge, DragAnchor};
use std::rc::Rc;

/// Kind of global pointer event a drag listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Move,
    Release,
}

/// Handle returned by a listener registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub u64);

/// Source of window-wide pointer events.
///
/// While a drag is in progress the host routes the subscribed events to
/// `ColumnResizing::handle_drag_move` and `handle_drag_release`.
pub trait PointerEventSource {
    fn subscribe(&self, kind: PointerEventKind) -> ListenerHandle;
    fn unsubscribe(&self, handle: ListenerHandle);
}

/// One drag in progress.
///
/// Holds the global listeners for exactly its own lifetime: they are released
/// by `teardown` or, failing that, when the session is dropped.
pub struct DragSession {
    source: Rc<dyn PointerEventSource>,
    handles: Vec<ListenerHandle>,
    edge: ActiveEdge,
    anchor: DragAnchor,
}

impl DragSession {
    /// Start a drag and subscribe to global move/release events
    pub fn begin(source: Rc<dyn PointerEventSource>, edge: ActiveEdge, anchor: DragAnchor) -> Self {
        let handles = vec![
            source.subscribe(PointerEventKind::Move),
            source.subscribe(PointerEventKind::Release),
        ];
        tracing::debug!(pos = edge.pos, axis = ?edge.axis, "drag session started");
        Self {
            source,
            handles,
            edge,
            anchor,
        }
    }

    pub fn edge(&self) -> ActiveEdge {
        self.edge
    }

    pub fn anchor(&self) -> DragAnchor {
        self.anchor
    }

    /// Whether the session still holds listeners
    pub fn is_listening(&self) -> bool {
        !self.handles.is_empty()
    }

    /// End the drag and release its listeners
    pub fn teardown(mut self) {
        self.release_listeners();
    }

    fn release_listeners(&mut self) {
        for handle in self.handles.drain(..) {
            self.source.unsubscribe(handle);
        }
    }
}

impl Drop for DragSession {
    fn drop(&mut self) {
        if self.is_listening() {
            tracing::debug!(pos = self.edge.pos, "drag session dropped without teardown");
        }
        self.release_listeners();
    }
}

impl std::fmt::Debug for DragSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragSession")
            .field("handles", &self.handles)
            .field("edge", &self.edge)
            .field("anchor", &self.anchor)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Axis;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingSource {
        next: RefCell<u64>,
        live: RefCell<Vec<(ListenerHandle, PointerEventKind)>>,
    }

    impl PointerEventSource for RecordingSource {
        fn subscribe(&self, kind: PointerEventKind) -> ListenerHandle {
            let mut next = self.next.borrow_mut();
            *next += 1;
            let handle = ListenerHandle(*next);
            self.live.borrow_mut().push((handle, kind));
            handle
        }

        fn unsubscribe(&self, handle: ListenerHandle) {
            self.live.borrow_mut().retain(|(h, _)| *h != handle);
        }
    }

    fn edge() -> ActiveEdge {
        ActiveEdge { pos: 6, axis: Axis::Column }
    }

    fn anchor() -> DragAnchor {
        DragAnchor { anchor_coordinate: 50.0, anchor_dimension: 100.0 }
    }

    #[test]
    fn test_begin_subscribes_move_and_release() {
        let source = Rc::new(RecordingSource::default());
        let session = DragSession::begin(source.clone(), edge(), anchor());
        let kinds: Vec<_> = source.live.borrow().iter().map(|(_, k)| *k).collect();
        assert_eq!(kinds, vec![PointerEventKind::Move, PointerEventKind::Release]);
        assert!(session.is_listening());

        session.teardown();
        assert!(source.live.borrow().is_empty());
    }

    #[test]
    fn test_drop_releases_listeners() {
        let source = Rc::new(RecordingSource::default());
        {
            let _session = DragSession::begin(source.clone(), edge(), anchor());
            assert_eq!(source.live.borrow().len(), 2);
        }
        assert!(source.live.borrow().is_empty());
    }
}
