//! Multi-touch gesture interpretation.
//!
//! Converts a chronological stream of pointer events into incremental
//! translation deltas (emitted through a [`DeltaSink`]) and internally
//! accumulated per-axis scale factors and a center point. One tracked
//! pointer translates; two tracked pointers spread/pinch. A third
//! simultaneous pointer freezes scale computation until a fresh
//! two-pointer press re-arms it.

use thiserror::Error;

use crate::event::{MoveBatch, Point, PointerEvent, PointerId};

pub const DEFAULT_SCALE_STEP: f32 = 0.01;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GestureError {
    /// A move batch did not carry a position for a tracked pointer. The
    /// event source guarantees every active contact appears in the batch,
    /// so this is a contract violation, not a recoverable condition.
    #[error("move batch has no position for tracked pointer {id}")]
    MissingPointer { id: PointerId },
}

/// Receiver for incremental translation deltas. Consumers accumulate the
/// deltas into their own persistent offset state.
pub trait DeltaSink {
    fn on_delta(&mut self, dx: f32, dy: f32);
}

impl<F: FnMut(f32, f32)> DeltaSink for F {
    fn on_delta(&mut self, dx: f32, dy: f32) {
        self(dx, dy)
    }
}

/// Whether two-pointer scale computation is currently permitted.
///
/// `Frozen` is entered when a third simultaneous pointer appears and is
/// left only by a fresh down that brings the tracked set to exactly two
/// (re-arm) or by the set emptying (idle). Deliberately not a boolean:
/// dropping back to two pointers alone must not resume scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScaleGate {
    Idle,
    Armed,
    Frozen,
}

#[derive(Debug, Clone, Copy)]
struct TrackedPointer {
    id: PointerId,
    last: Point,
}

#[derive(Debug)]
pub struct GestureInterpreter {
    // insertion order significant; first element is the primary pointer
    tracked: Vec<TrackedPointer>,
    start1: Point,
    start2: Point,
    // per-axis inter-pointer offset magnitudes from the previous frame
    prev_offset: Point,
    prev_pointer_count: usize,
    gate: ScaleGate,
    scale_step: f32,
    sx: f32,
    sy: f32,
    center: Point,
}

impl Default for GestureInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureInterpreter {
    pub fn new() -> Self {
        Self::with_scale_step(DEFAULT_SCALE_STEP)
    }

    pub fn with_scale_step(scale_step: f32) -> Self {
        Self {
            tracked: Vec::new(),
            start1: Point::default(),
            start2: Point::default(),
            prev_offset: Point::default(),
            prev_pointer_count: 0,
            gate: ScaleGate::Idle,
            scale_step,
            sx: 1.0,
            sy: 1.0,
            center: Point::default(),
        }
    }

    /// Accumulated per-axis scale factors. Linear in spread delta and
    /// unclamped: aggressive pinch-in can drive these to zero or negative.
    pub fn scale(&self) -> (f32, f32) {
        (self.sx, self.sy)
    }

    /// Accumulated center point of the translated shape.
    pub fn center(&self) -> Point {
        self.center
    }

    pub fn pointer_count(&self) -> usize {
        self.tracked.len()
    }

    pub fn handle(
        &mut self,
        event: &PointerEvent,
        sink: &mut dyn DeltaSink,
    ) -> Result<(), GestureError> {
        match event {
            PointerEvent::Down { id, pos } => {
                self.on_down(*id, *pos);
                Ok(())
            }
            PointerEvent::Move { batch } => self.on_move(batch, sink),
            PointerEvent::Up { id } => {
                self.on_up(*id);
                Ok(())
            }
        }
    }

    pub fn on_down(&mut self, id: PointerId, pos: Point) {
        match self.tracked.iter_mut().find(|t| t.id == id) {
            // a down for an already-tracked id just refreshes its position
            Some(t) => t.last = pos,
            None => self.tracked.push(TrackedPointer { id, last: pos }),
        }
        match self.tracked.len() {
            1 => {
                self.start1 = pos;
                self.gate = ScaleGate::Idle;
            }
            2 => {
                // re-baseline both pointers; the primary restarts from its
                // last known position so no drift leaks into the spread
                self.start1 = self.tracked[0].last;
                self.start2 = self.tracked[1].last;
                self.prev_offset = Point::new(
                    (self.start2.x - self.start1.x).abs(),
                    (self.start2.y - self.start1.y).abs(),
                );
                self.gate = ScaleGate::Armed;
            }
            _ => self.gate = ScaleGate::Frozen,
        }
    }

    pub fn on_move(
        &mut self,
        batch: &MoveBatch,
        sink: &mut dyn DeltaSink,
    ) -> Result<(), GestureError> {
        for t in &mut self.tracked {
            if let Some(pos) = batch.position(t.id) {
                t.last = pos;
            }
        }

        match self.tracked.len() {
            1 => {
                let id = self.tracked[0].id;
                let cur = batch
                    .position(id)
                    .ok_or(GestureError::MissingPointer { id })?;
                let dx = cur.x - self.start1.x;
                let dy = cur.y - self.start1.y;
                self.center.x += dx;
                self.center.y += dy;
                sink.on_delta(dx, dy);
                // reset the baseline so every move emits an increment
                self.start1 = cur;
            }
            2 if self.gate == ScaleGate::Armed => {
                let (a, b) = (self.tracked[0].id, self.tracked[1].id);
                let p1 = batch
                    .position(a)
                    .ok_or(GestureError::MissingPointer { id: a })?;
                let p2 = batch
                    .position(b)
                    .ok_or(GestureError::MissingPointer { id: b })?;
                let cur = Point::new((p2.x - p1.x).abs(), (p2.y - p1.y).abs());
                let dx = cur.x - self.prev_offset.x;
                let dy = cur.y - self.prev_offset.y;
                sink.on_delta(dx, dy);
                self.sx += dx * self.scale_step;
                self.sy += dy * self.scale_step;
                self.start1 = p1;
                self.start2 = p2;
                self.prev_offset = cur;
            }
            n if n >= 3 => self.gate = ScaleGate::Frozen,
            _ => {}
        }

        self.prev_pointer_count = self.tracked.len();
        Ok(())
    }

    pub fn on_up(&mut self, id: PointerId) {
        // an up for an untracked id is a no-op
        let Some(idx) = self.tracked.iter().position(|t| t.id == id) else {
            return;
        };
        self.tracked.remove(idx);
        if self.prev_pointer_count <= 2 && !self.tracked.is_empty() {
            // re-anchor the remaining primary so the next move does not jump
            self.start1 = self.tracked[0].last;
        }
        if self.tracked.is_empty() {
            // scale and center deliberately persist into the next gesture
            self.gate = ScaleGate::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(pointers: &[(PointerId, f32, f32)]) -> MoveBatch {
        pointers
            .iter()
            .map(|&(id, x, y)| (id, Point::new(x, y)))
            .collect()
    }

    fn move_all(
        interp: &mut GestureInterpreter,
        pointers: &[(PointerId, f32, f32)],
    ) -> Vec<(f32, f32)> {
        let mut deltas = Vec::new();
        interp
            .on_move(&batch(pointers), &mut |dx: f32, dy: f32| {
                deltas.push((dx, dy))
            })
            .unwrap();
        deltas
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn single_pointer_drag_emits_incremental_deltas() {
        let mut g = GestureInterpreter::new();
        g.on_down(1, Point::new(10.0, 10.0));

        assert_eq!(move_all(&mut g, &[(1, 15.0, 18.0)]), vec![(5.0, 8.0)]);
        assert_eq!(move_all(&mut g, &[(1, 15.0, 10.0)]), vec![(0.0, -8.0)]);

        // center accumulated the same increments
        assert_eq!(g.center(), Point::new(5.0, 0.0));
        // no scale change from a one-pointer drag
        assert_eq!(g.scale(), (1.0, 1.0));
    }

    #[test]
    fn two_pointer_spread_emits_delta_and_accumulates_scale() {
        let mut g = GestureInterpreter::new();
        g.on_down(1, Point::new(0.0, 0.0));
        g.on_down(2, Point::new(10.0, 0.0));

        let deltas = move_all(&mut g, &[(1, 0.0, 0.0), (2, 20.0, 0.0)]);
        assert_eq!(deltas, vec![(10.0, 0.0)]);

        let (sx, sy) = g.scale();
        assert!(close(sx, 1.10), "sx = {sx}");
        assert!(close(sy, 1.0), "sy = {sy}");
        // two-pointer moves do not translate the center
        assert_eq!(g.center(), Point::default());
    }

    #[test]
    fn spread_deltas_are_incremental_per_frame() {
        let mut g = GestureInterpreter::new();
        g.on_down(1, Point::new(0.0, 0.0));
        g.on_down(2, Point::new(10.0, 10.0));

        let first = move_all(&mut g, &[(1, 0.0, 0.0), (2, 14.0, 10.0)]);
        assert_eq!(first, vec![(4.0, 0.0)]);
        let second = move_all(&mut g, &[(1, 0.0, 0.0), (2, 14.0, 4.0)]);
        assert_eq!(second, vec![(0.0, -6.0)]);

        let (sx, sy) = g.scale();
        assert!(close(sx, 1.04), "sx = {sx}");
        assert!(close(sy, 0.94), "sy = {sy}");
    }

    #[test]
    fn pinch_in_can_drive_scale_negative() {
        // unclamped by design
        let mut g = GestureInterpreter::new();
        g.on_down(1, Point::new(0.0, 0.0));
        g.on_down(2, Point::new(300.0, 0.0));

        let deltas = move_all(&mut g, &[(1, 0.0, 0.0), (2, 10.0, 0.0)]);
        assert_eq!(deltas, vec![(-290.0, 0.0)]);
        let (sx, _) = g.scale();
        assert!(sx < 0.0, "sx = {sx}");
    }

    #[test]
    fn third_pointer_freezes_scale_and_emission() {
        let mut g = GestureInterpreter::new();
        g.on_down(1, Point::new(0.0, 0.0));
        g.on_down(2, Point::new(10.0, 0.0));
        assert_eq!(
            move_all(&mut g, &[(1, 0.0, 0.0), (2, 12.0, 0.0)]),
            vec![(2.0, 0.0)]
        );
        let scale_before = g.scale();

        g.on_down(3, Point::new(50.0, 50.0));
        let deltas = move_all(&mut g, &[(1, 0.0, 0.0), (2, 30.0, 0.0), (3, 50.0, 50.0)]);
        assert!(deltas.is_empty());
        assert_eq!(g.scale(), scale_before);

        // dropping back to two pointers alone does not re-arm
        g.on_up(3);
        let deltas = move_all(&mut g, &[(1, 0.0, 0.0), (2, 40.0, 0.0)]);
        assert!(deltas.is_empty());
        assert_eq!(g.scale(), scale_before);
    }

    #[test]
    fn fresh_two_pointer_down_re_arms_after_freeze() {
        let mut g = GestureInterpreter::new();
        g.on_down(1, Point::new(0.0, 0.0));
        g.on_down(2, Point::new(10.0, 0.0));
        g.on_down(3, Point::new(50.0, 50.0));
        assert!(move_all(&mut g, &[(1, 0.0, 0.0), (2, 10.0, 0.0), (3, 50.0, 50.0)]).is_empty());

        // drop to one, then a fresh second press recomputes baselines
        g.on_up(3);
        g.on_up(2);
        g.on_down(2, Point::new(30.0, 0.0));

        let deltas = move_all(&mut g, &[(1, 0.0, 0.0), (2, 35.0, 0.0)]);
        assert_eq!(deltas, vec![(5.0, 0.0)]);
        let (sx, _) = g.scale();
        assert!(close(sx, 1.05), "sx = {sx}");
    }

    #[test]
    fn release_to_one_pointer_does_not_jump() {
        let mut g = GestureInterpreter::new();
        g.on_down(1, Point::new(0.0, 0.0));
        g.on_down(2, Point::new(10.0, 0.0));
        // drift both pointers while in two-pointer mode
        move_all(&mut g, &[(1, 5.0, 5.0), (2, 25.0, 5.0)]);

        g.on_up(2);
        // the next delta is relative to pointer 1's position at release time
        let deltas = move_all(&mut g, &[(1, 6.0, 7.0)]);
        assert_eq!(deltas, vec![(1.0, 2.0)]);
    }

    #[test]
    fn scale_and_center_persist_across_gestures() {
        let mut g = GestureInterpreter::new();
        g.on_down(1, Point::new(0.0, 0.0));
        g.on_down(2, Point::new(10.0, 0.0));
        move_all(&mut g, &[(1, 0.0, 0.0), (2, 20.0, 0.0)]);
        g.on_up(1);
        g.on_up(2);
        assert_eq!(g.pointer_count(), 0);

        let (sx_kept, sy_kept) = g.scale();
        assert!(close(sx_kept, 1.10));

        // brand-new single-pointer gesture starts from the kept state
        g.on_down(5, Point::new(100.0, 100.0));
        let deltas = move_all(&mut g, &[(5, 103.0, 100.0)]);
        assert_eq!(deltas, vec![(3.0, 0.0)]);
        assert_eq!(g.scale(), (sx_kept, sy_kept));
        assert_eq!(g.center(), Point::new(3.0, 0.0));
    }

    #[test]
    fn up_for_untracked_id_is_a_no_op() {
        let mut g = GestureInterpreter::new();
        g.on_down(1, Point::new(1.0, 1.0));
        g.on_up(99);
        assert_eq!(g.pointer_count(), 1);
        assert_eq!(move_all(&mut g, &[(1, 2.0, 1.0)]), vec![(1.0, 0.0)]);
    }

    #[test]
    fn duplicate_down_for_tracked_id_keeps_set_size() {
        let mut g = GestureInterpreter::new();
        g.on_down(1, Point::new(0.0, 0.0));
        g.on_down(1, Point::new(5.0, 5.0));
        assert_eq!(g.pointer_count(), 1);
    }

    #[test]
    fn missing_tracked_pointer_in_batch_fails_fast() {
        let mut g = GestureInterpreter::new();
        g.on_down(1, Point::new(0.0, 0.0));
        let err = g
            .on_move(&batch(&[(2, 1.0, 1.0)]), &mut |_: f32, _: f32| {})
            .unwrap_err();
        assert_eq!(err, GestureError::MissingPointer { id: 1 });
    }

    #[test]
    fn custom_scale_step_scales_accumulation() {
        let mut g = GestureInterpreter::with_scale_step(0.1);
        g.on_down(1, Point::new(0.0, 0.0));
        g.on_down(2, Point::new(10.0, 0.0));
        move_all(&mut g, &[(1, 0.0, 0.0), (2, 15.0, 0.0)]);
        let (sx, _) = g.scale();
        assert!(close(sx, 1.5), "sx = {sx}");
    }
}
