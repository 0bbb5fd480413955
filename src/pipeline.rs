//! Live capture and replay pipelines.
//!
//! `run_live` attaches to every detected multitouch device, decodes the MT
//! slot protocol into pointer events, and drives the gesture interpreter,
//! logging each emitted delta and the resulting scene rectangle. `replay`
//! does the same from a recorded trace, deterministically.

use std::{
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

use anyhow::{Context, Result, anyhow};
use evdev::{AbsoluteAxisCode, EventType, SynchronizationCode};
use log::{debug, info};

use crate::config::Tunables;
use crate::event::PointerEvent;
use crate::input;
use crate::interpreter::GestureInterpreter;
use crate::scene;
use crate::slots::SlotDecoder;
use crate::trace::{self, TraceRecord};

pub fn run_live(tun: &Tunables, record_to: Option<&Path>) -> Result<()> {
    let infos = input::discover_multitouch();
    if infos.is_empty() {
        return Err(anyhow!("no multitouch devices detected"));
    }
    for d in &infos {
        info!("watching {} ({})", d.name, d.path);
    }
    let mut devs = input::open_all(&infos);
    if devs.is_empty() {
        return Err(anyhow!("failed to open all detected devices"));
    }

    let running = Arc::new(AtomicBool::new(true));
    signal_hook::flag::register(signal_hook::consts::SIGINT, running.clone())?;
    signal_hook::flag::register(signal_hook::consts::SIGTERM, running.clone())?;

    let mut decoder = SlotDecoder::new();
    let mut interp = GestureInterpreter::with_scale_step(tun.scale_step);
    let mut offset = (0.0f32, 0.0f32);
    let mut recorded: Vec<TraceRecord> = Vec::new();

    while running.load(Ordering::Relaxed) {
        let mut any_event = false;

        for dev in devs.iter_mut() {
            let Ok(events) = dev.fetch_events() else {
                continue;
            };
            for ev in events {
                any_event = true;
                if ev.event_type() == EventType::ABSOLUTE {
                    match ev.code() {
                        c if c == AbsoluteAxisCode::ABS_MT_SLOT.0 => decoder.on_slot(ev.value()),
                        c if c == AbsoluteAxisCode::ABS_MT_TRACKING_ID.0 => {
                            decoder.on_tracking_id(ev.value())
                        }
                        c if c == AbsoluteAxisCode::ABS_MT_POSITION_X.0 => {
                            decoder.on_position_x(ev.value())
                        }
                        c if c == AbsoluteAxisCode::ABS_MT_POSITION_Y.0 => {
                            decoder.on_position_y(ev.value())
                        }
                        _ => {}
                    }
                } else if ev.event_type() == EventType::SYNCHRONIZATION
                    && ev.code() == SynchronizationCode::SYN_REPORT.0
                {
                    for pev in decoder.on_frame() {
                        if record_to.is_some() {
                            recorded.push(TraceRecord::from(&pev));
                        }
                        step(&mut interp, &pev, &mut offset, tun)?;
                    }
                }
            }
        }

        if !any_event {
            thread::sleep(Duration::from_millis(4));
        }
    }

    if let Some(path) = record_to {
        trace::save(path, &recorded)?;
        info!("wrote {} events to {}", recorded.len(), path.display());
    }
    summarize(&interp, offset, tun);
    Ok(())
}

pub fn replay(path: &Path, tun: &Tunables) -> Result<()> {
    let records = trace::load(path)?;
    let mut interp = GestureInterpreter::with_scale_step(tun.scale_step);
    let mut offset = (0.0f32, 0.0f32);

    for rec in &records {
        let pev = PointerEvent::from(rec);
        step(&mut interp, &pev, &mut offset, tun)
            .with_context(|| format!("replaying {}", path.display()))?;
    }

    info!("replayed {} events", records.len());
    summarize(&interp, offset, tun);
    Ok(())
}

fn step(
    interp: &mut GestureInterpreter,
    event: &PointerEvent,
    offset: &mut (f32, f32),
    tun: &Tunables,
) -> Result<()> {
    let mut sink = |dx: f32, dy: f32| {
        offset.0 += dx;
        offset.1 += dy;
        info!(
            "delta ({dx:+.1}, {dy:+.1}) offset ({:.1}, {:.1})",
            offset.0, offset.1
        );
    };
    interp.handle(event, &mut sink)?;
    let (sx, sy) = interp.scale();
    debug!(
        "pointers {} scale ({sx:.2}, {sy:.2}) {}",
        interp.pointer_count(),
        scene::rect_outline(interp.center(), sx, sy, tun)
    );
    Ok(())
}

fn summarize(interp: &GestureInterpreter, offset: (f32, f32), tun: &Tunables) {
    let (sx, sy) = interp.scale();
    println!(
        "offset ({:.1}, {:.1})  scale ({sx:.3}, {sy:.3})  {}",
        offset.0,
        offset.1,
        scene::rect_outline(interp.center(), sx, sy, tun)
    );
}
