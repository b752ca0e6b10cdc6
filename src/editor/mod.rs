//! Geometry editor: the live rectangle set and pointer-gesture handling.
//!
//! A gesture is `Idle → pointer_down (hit) → Dragging(mode, id) →
//! pointer_up | pointer_leave → Idle`. A pointer-down that hits nothing
//! leaves the editor idle. Every change to the rectangle set bumps
//! [`Editor::revision`], which the canvas compares against to decide
//! whether to redraw.

mod geometry;
mod rectangle;

pub use geometry::{DragMode, Handle, Point, HANDLE_SIZE, HANDLE_TOLERANCE};
pub use rectangle::{BoxColor, EditableRect, RectId};

use crate::document::LayoutDocument;
use tracing::debug;

/// Transient state of the gesture in progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragState {
    /// The rectangle being manipulated.
    pub selected: Option<RectId>,
    /// What the gesture does.
    pub mode: DragMode,
    /// Pointer position at the previous event.
    pub last_pointer: Option<Point>,
}

/// Owns the editable rectangles of the displayed page.
#[derive(Debug)]
pub struct Editor {
    rects: Vec<EditableRect>,
    drag: DragState,
    next_id: u64,
    revision: u64,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// An empty editor.
    pub const fn new() -> Self {
        Self {
            rects: Vec::new(),
            drag: DragState {
                selected: None,
                mode: DragMode::None,
                last_pointer: None,
            },
            next_id: 0,
            revision: 0,
        }
    }

    /// The live rectangles, in list order.
    pub fn rects(&self) -> &[EditableRect] {
        &self.rects
    }

    /// Look up a rectangle by id.
    pub fn get(&self, id: RectId) -> Option<&EditableRect> {
        self.rects.iter().find(|r| r.id == id)
    }

    /// The gesture state.
    pub const fn drag(&self) -> &DragState {
        &self.drag
    }

    /// Changes whenever the rectangle set changes.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the rectangle set with one derived from the first page of
    /// `document`, one rectangle per block, in order.
    pub fn load_document(&mut self, document: &LayoutDocument) {
        let blocks = document.first_page().map(|page| page.blocks()).unwrap_or_default();
        self.rects = blocks
            .iter()
            .map(|block| {
                let id = RectId(self.next_id);
                self.next_id += 1;
                EditableRect::from_block(id, block)
            })
            .collect();
        self.drag = DragState::default();
        self.revision += 1;
        debug!(count = self.rects.len(), "derived rectangles from layout document");
    }

    /// Drop all rectangles (no page displayed).
    pub fn clear(&mut self) {
        if !self.rects.is_empty() {
            self.rects.clear();
            self.revision += 1;
        }
        self.drag = DragState::default();
    }

    /// The first rectangle (in list order) that a pointer-down at `p` would
    /// grab, and how.
    pub fn hit_test(&self, p: Point) -> Option<(RectId, DragMode)> {
        self.rects.iter().find_map(|rect| match rect.hit(p, HANDLE_TOLERANCE) {
            DragMode::None => None,
            mode => Some((rect.id, mode)),
        })
    }

    /// The mode a pointer-down at `p` would start; [`DragMode::None`] if
    /// nothing is under the pointer.
    pub fn hover(&self, p: Point) -> DragMode {
        self.hit_test(p).map_or(DragMode::None, |(_, mode)| mode)
    }

    /// Start a gesture if `p` hits a handle or body.
    ///
    /// Returns the grabbed rectangle and mode.
    pub fn pointer_down(&mut self, p: Point) -> Option<(RectId, DragMode)> {
        self.drag.last_pointer = Some(p);
        let hit = self.hit_test(p);
        if let Some((id, mode)) = hit {
            self.drag.selected = Some(id);
            self.drag.mode = mode;
            debug!(id = id.0, %mode, x = p.x, y = p.y, "drag started");
        }
        hit
    }

    /// Apply the pointer motion since the previous event to the dragged
    /// rectangle. Returns whether any geometry changed.
    ///
    /// The last pointer position is recorded whether or not a drag is
    /// active.
    pub fn pointer_move(&mut self, p: Point) -> bool {
        let last = self.drag.last_pointer.replace(p);
        let (Some(id), Some(last)) = (self.drag.selected, last) else {
            return false;
        };
        if !self.drag.mode.is_active() {
            return false;
        }
        let delta = p - last;
        if delta == Point::default() {
            return false;
        }
        let Some(rect) = self.rects.iter_mut().find(|r| r.id == id) else {
            return false;
        };
        rect.apply(self.drag.mode, delta);
        self.revision += 1;
        true
    }

    /// End the gesture (pointer released).
    pub fn pointer_up(&mut self) {
        self.end_drag("pointer up");
    }

    /// End the gesture (pointer left the canvas).
    pub fn pointer_leave(&mut self) {
        self.end_drag("pointer left canvas");
    }

    fn end_drag(&mut self, reason: &str) {
        if let Some(id) = self.drag.selected.take() {
            if let Some(rect) = self.get(id) {
                debug!(id = id.0, bbox = ?rect.bbox(), reason, "drag ended");
            }
        }
        self.drag.mode = DragMode::None;
    }
}
