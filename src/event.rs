//! Pointer lifecycle events consumed by the gesture interpreter.

use serde::{Deserialize, Serialize};

/// Kernel tracking id of a contact; unique while pressed, reused after release.
pub type PointerId = i32;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One step of a contact's lifecycle, in surface-local units.
///
/// A `Move` carries positions for every active contact in the frame so that
/// consumers can resolve each tracked pointer by id.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    Down { id: PointerId, pos: Point },
    Move { batch: MoveBatch },
    Up { id: PointerId },
}

/// Positions of all active pointers within one move notification.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MoveBatch {
    pointers: Vec<(PointerId, Point)>,
}

impl MoveBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pointer's position, replacing any earlier entry for the id.
    pub fn push(&mut self, id: PointerId, pos: Point) {
        match self.pointers.iter_mut().find(|(pid, _)| *pid == id) {
            Some(slot) => slot.1 = pos,
            None => self.pointers.push((id, pos)),
        }
    }

    pub fn position(&self, id: PointerId) -> Option<Point> {
        self.pointers
            .iter()
            .find(|(pid, _)| *pid == id)
            .map(|(_, p)| *p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PointerId, Point)> + '_ {
        self.pointers.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }
}

impl FromIterator<(PointerId, Point)> for MoveBatch {
    fn from_iter<T: IntoIterator<Item = (PointerId, Point)>>(iter: T) -> Self {
        let mut batch = Self::new();
        for (id, pos) in iter {
            batch.push(id, pos);
        }
        batch
    }
}
