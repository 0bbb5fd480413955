//! Multitouch input device discovery (evdev 0.13.2 compatible).

use evdev::{AbsoluteAxisCode, Device, EventType};
use log::warn;

#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub path: String,
    pub name: String,
}

fn is_multitouch(dev: &Device) -> bool {
    if !dev.supported_events().contains(EventType::ABSOLUTE) {
        return false;
    }
    dev.supported_absolute_axes().map_or(false, |axes| {
        axes.contains(AbsoluteAxisCode::ABS_MT_SLOT)
            && axes.contains(AbsoluteAxisCode::ABS_MT_POSITION_X)
            && axes.contains(AbsoluteAxisCode::ABS_MT_POSITION_Y)
    })
}

/// Probe /dev/input for devices speaking the MT slot protocol.
pub fn discover_multitouch() -> Vec<DeviceInfo> {
    let Ok(rd) = std::fs::read_dir("/dev/input") else {
        return vec![];
    };
    rd.flatten()
        .filter_map(|entry| {
            let path = entry.path();
            let is_event_node = path
                .file_name()
                .and_then(|s| s.to_str())
                .map(|s| s.starts_with("event"))
                .unwrap_or(false);
            if !is_event_node {
                return None;
            }
            let dev = Device::open(&path).ok()?;
            is_multitouch(&dev).then(|| DeviceInfo {
                path: path.display().to_string(),
                name: dev.name().unwrap_or("unknown").to_string(),
            })
        })
        .collect()
}

/// Open the given devices non-blocking; unopenable ones are logged and skipped.
pub fn open_all(devices: &[DeviceInfo]) -> Vec<Device> {
    let mut out = Vec::new();
    for d in devices {
        match Device::open(&d.path) {
            Ok(mut dev) => {
                let _ = dev.set_nonblocking(true);
                out.push(dev);
            }
            Err(e) => warn!("failed to open {}: {e}", d.path),
        }
    }
    out
}
