//! Image carousel interaction model.
//!
//! An explicit state machine, independent of any rendering technology: the
//! animation layer consumes the transitions instead of owning them. One
//! instance per mounted carousel.
//!
//! Invariants: `current_index` stays within `[0, photo_count - 1]`,
//! pagination wraps in both directions, and fullscreen entry/exit never
//! changes the index.

use std::collections::HashSet;

use crate::core::config::carousel::DRAG_THRESHOLD_PX;

/// Direction of the last transition, for the animation layer (-1/0/+1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragDirection {
    Back,
    #[default]
    None,
    Forward,
}

impl DragDirection {
    pub fn as_i8(self) -> i8 {
        match self {
            DragDirection::Back => -1,
            DragDirection::None => 0,
            DragDirection::Forward => 1,
        }
    }
}

/// Per-carousel interaction state.
#[derive(Debug, Clone)]
pub struct Carousel {
    photo_count: usize,
    current_index: usize,
    drag_direction: DragDirection,
    /// Indices whose photo finished decoding (or failed — a broken image is
    /// marked loaded too, so the loading indicator never hangs).
    loaded: HashSet<usize>,
    fullscreen: bool,
}

impl Carousel {
    /// Create a carousel over `photo_count` photos.
    ///
    /// Every product carries at least one photo by the gateway's contract;
    /// a zero count is clamped to one so the index invariant still holds.
    pub fn new(photo_count: usize) -> Self {
        Self {
            photo_count: photo_count.max(1),
            current_index: 0,
            drag_direction: DragDirection::None,
            loaded: HashSet::new(),
            fullscreen: false,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn photo_count(&self) -> usize {
        self.photo_count
    }

    pub fn drag_direction(&self) -> DragDirection {
        self.drag_direction
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Step by `direction`, wrapping both ways: index −1 maps to the last
    /// photo. Triggered by arrow keys, the on-screen arrows, or a drag
    /// release past the threshold.
    pub fn paginate(&mut self, direction: i8) {
        if direction == 0 {
            return;
        }
        self.drag_direction = if direction > 0 {
            DragDirection::Forward
        } else {
            DragDirection::Back
        };
        let count = self.photo_count as i64;
        let next = (self.current_index as i64 + direction as i64).rem_euclid(count);
        self.current_index = next as usize;
    }

    /// Jump straight to an indicator dot, bypassing modular stepping.
    /// Out-of-range indices are ignored (dots only exist for valid ones).
    pub fn jump_to(&mut self, index: usize) {
        if index < self.photo_count {
            self.drag_direction = DragDirection::None;
            self.current_index = index;
        }
    }

    /// Handle a drag release with a final horizontal offset in pixels.
    ///
    /// Dragging left (negative offset) past the threshold advances, dragging
    /// right goes back; anything within the threshold snaps back in place.
    /// Returns whether the index changed.
    pub fn release_drag(&mut self, offset_x: f32) -> bool {
        if offset_x < -DRAG_THRESHOLD_PX {
            self.paginate(1);
            true
        } else if offset_x > DRAG_THRESHOLD_PX {
            self.paginate(-1);
            true
        } else {
            self.drag_direction = DragDirection::None;
            false
        }
    }

    /// The indices to preload eagerly after any index change: previous,
    /// current and next, modulo photo count. Deduplicated for one- and
    /// two-photo carousels.
    pub fn preload_neighbors(&self) -> Vec<usize> {
        let count = self.photo_count;
        let prev = (self.current_index + count - 1) % count;
        let next = (self.current_index + 1) % count;
        let mut neighbors = vec![self.current_index, next, prev];
        neighbors.dedup();
        neighbors
    }

    /// Record a finished preload. Failures call this too — one attempt per
    /// index, and a broken image falls back to the placeholder at render.
    pub fn mark_loaded(&mut self, index: usize) {
        if index < self.photo_count {
            self.loaded.insert(index);
        }
    }

    pub fn is_loaded(&self, index: usize) -> bool {
        self.loaded.contains(&index)
    }

    /// Enter the transient fullscreen sub-state at the current index.
    pub fn enter_fullscreen(&mut self) {
        self.fullscreen = true;
    }

    /// Leave fullscreen, back to the carousel, index unchanged.
    pub fn exit_fullscreen(&mut self) {
        self.fullscreen = false;
    }
}
