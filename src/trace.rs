//! Recorded pointer-event traces.
//!
//! A trace is a JSON array of tagged records, one per pointer event, written
//! by `gesturepad record` and consumed by `gesturepad replay`. Replaying a
//! trace through the interpreter is deterministic.

use std::{fs, path::Path};

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::event::{MoveBatch, Point, PointerEvent, PointerId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracePointer {
    pub id: PointerId,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceRecord {
    Down { id: PointerId, x: f32, y: f32 },
    Move { pointers: Vec<TracePointer> },
    Up { id: PointerId },
}

impl From<&PointerEvent> for TraceRecord {
    fn from(ev: &PointerEvent) -> Self {
        match ev {
            PointerEvent::Down { id, pos } => TraceRecord::Down {
                id: *id,
                x: pos.x,
                y: pos.y,
            },
            PointerEvent::Move { batch } => TraceRecord::Move {
                pointers: batch
                    .iter()
                    .map(|(id, pos)| TracePointer {
                        id,
                        x: pos.x,
                        y: pos.y,
                    })
                    .collect(),
            },
            PointerEvent::Up { id } => TraceRecord::Up { id: *id },
        }
    }
}

impl From<&TraceRecord> for PointerEvent {
    fn from(rec: &TraceRecord) -> Self {
        match rec {
            TraceRecord::Down { id, x, y } => PointerEvent::Down {
                id: *id,
                pos: Point::new(*x, *y),
            },
            TraceRecord::Move { pointers } => PointerEvent::Move {
                batch: pointers
                    .iter()
                    .map(|p| (p.id, Point::new(p.x, p.y)))
                    .collect::<MoveBatch>(),
            },
            TraceRecord::Up { id } => PointerEvent::Up { id: *id },
        }
    }
}

pub fn load(path: &Path) -> Result<Vec<TraceRecord>> {
    let txt =
        fs::read_to_string(path).map_err(|e| anyhow!("failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&txt).map_err(|e| anyhow!("failed to parse {}: {e}", path.display()))
}

pub fn save(path: &Path, records: &[TraceRecord]) -> Result<()> {
    let txt = serde_json::to_string_pretty(records)?;
    fs::write(path, txt).map_err(|e| anyhow!("failed to write {}: {e}", path.display()))?;
    Ok(())
}
