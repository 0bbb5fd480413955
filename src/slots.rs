//! Linux MT type-B slot protocol decoding.
//!
//! Feeds on the per-slot ABS_MT_* axis updates between SYN_REPORTs and turns
//! each completed frame into pointer lifecycle events: a tracking-id
//! transition to >= 0 is a down, to -1 an up, and position changes become a
//! single move batch carrying every active contact. Pointer ids are the
//! kernel tracking ids.

use crate::event::{MoveBatch, Point, PointerEvent};

const SLOT_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    None,
    Down,
    Moved,
    Up,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    tracking_id: i32, // -1 = empty
    x: f32,
    y: f32,
    pending: Pending,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            tracking_id: -1,
            x: 0.0,
            y: 0.0,
            pending: Pending::None,
        }
    }
}

#[derive(Debug)]
pub struct SlotDecoder {
    slots: Vec<Slot>,
    cur_slot: usize,
}

impl Default for SlotDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotDecoder {
    pub fn new() -> Self {
        Self {
            slots: vec![Slot::default(); SLOT_COUNT],
            cur_slot: 0,
        }
    }

    pub fn on_slot(&mut self, slot: i32) {
        self.cur_slot = slot.clamp(0, SLOT_COUNT as i32 - 1) as usize;
    }

    pub fn on_tracking_id(&mut self, tracking_id: i32) {
        let s = &mut self.slots[self.cur_slot];
        if tracking_id < 0 {
            if s.tracking_id >= 0 {
                // keep the id until the frame flush emits the up
                s.pending = Pending::Up;
            }
        } else {
            s.tracking_id = tracking_id;
            s.pending = Pending::Down;
        }
    }

    pub fn on_position_x(&mut self, raw: i32) {
        let s = &mut self.slots[self.cur_slot];
        s.x = raw as f32;
        if s.pending == Pending::None && s.tracking_id >= 0 {
            s.pending = Pending::Moved;
        }
    }

    pub fn on_position_y(&mut self, raw: i32) {
        let s = &mut self.slots[self.cur_slot];
        s.y = raw as f32;
        if s.pending == Pending::None && s.tracking_id >= 0 {
            s.pending = Pending::Moved;
        }
    }

    /// Flush the frame on SYN_REPORT. Downs are delivered before the move
    /// batch, ups after it.
    pub fn on_frame(&mut self) -> Vec<PointerEvent> {
        let mut out = Vec::new();

        for s in self.slots.iter().filter(|s| s.pending == Pending::Down) {
            out.push(PointerEvent::Down {
                id: s.tracking_id,
                pos: Point::new(s.x, s.y),
            });
        }

        if self.slots.iter().any(|s| s.pending == Pending::Moved) {
            let batch: MoveBatch = self
                .slots
                .iter()
                .filter(|s| s.tracking_id >= 0)
                .map(|s| (s.tracking_id, Point::new(s.x, s.y)))
                .collect();
            out.push(PointerEvent::Move { batch });
        }

        for s in self.slots.iter_mut() {
            if s.pending == Pending::Up {
                out.push(PointerEvent::Up { id: s.tracking_id });
                s.tracking_id = -1;
            }
            s.pending = Pending::None;
        }

        out
    }
}
