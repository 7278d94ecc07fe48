// Monkeytrapper Input Layer - Device Location
// Picks the single source device out of the enumerated evdev nodes

use std::path::PathBuf;

use super::filter::DeviceMatch;
use crate::error::{SessionError, SessionResult};

/// Identity of an input device as seen by the locator.
///
/// Implemented for `evdev::Device`; tests implement it for plain structs
/// so selection can be checked without hardware.
pub trait DeviceIdentity {
    fn name(&self) -> Option<&str>;
    fn physical_path(&self) -> Option<&str>;
}

#[cfg(feature = "evdev-backend")]
impl DeviceIdentity for evdev::Device {
    fn name(&self) -> Option<&str> {
        evdev::Device::name(self)
    }

    fn physical_path(&self) -> Option<&str> {
        evdev::Device::physical_path(self)
    }
}

/// A device chosen by the locator, with the node it was opened from
#[derive(Debug)]
pub struct LocatedDevice<D> {
    pub path: PathBuf,
    pub device: D,
}

/// Device information for listing devices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Device node (e.g., "/dev/input/event7")
    pub path: PathBuf,
    /// Device name
    pub name: String,
    /// Physical path, if the driver reports one
    pub phys: Option<String>,
    /// Whether the configured matcher accepts this device
    pub matched: bool,
}

impl DeviceInfo {
    pub fn describe<D: DeviceIdentity>(path: PathBuf, device: &D, matcher: &DeviceMatch) -> Self {
        Self {
            path,
            name: device.name().unwrap_or("Unknown").to_string(),
            phys: device.physical_path().map(str::to_string),
            matched: matcher.matches(device.physical_path(), device.name()),
        }
    }
}

/// Select the first device accepted by `matcher`, in enumeration order.
///
/// Enumeration stops at the first match.
pub fn select_device<D, I>(devices: I, matcher: &DeviceMatch) -> SessionResult<LocatedDevice<D>>
where
    D: DeviceIdentity,
    I: IntoIterator<Item = (PathBuf, D)>,
{
    devices
        .into_iter()
        .find(|(_, device)| matcher.matches(device.physical_path(), device.name()))
        .map(|(path, device)| LocatedDevice { path, device })
        .ok_or_else(|| SessionError::DeviceNotFound {
            phys: matcher.phys.clone(),
            name: matcher.name.clone(),
        })
}

/// Find the source device among all evdev nodes.
#[cfg(feature = "evdev-backend")]
pub fn locate(matcher: &DeviceMatch) -> SessionResult<LocatedDevice<evdev::Device>> {
    let located = select_device(evdev::enumerate(), matcher)?;
    log::info!(
        "Found {} at {} ({})",
        located.device.name().unwrap_or("Unknown"),
        located.path.display(),
        located.device.physical_path().unwrap_or("no physical path")
    );
    Ok(located)
}

/// List all input devices, flagging the ones `matcher` accepts.
///
/// This is useful for the --list-devices CLI flag.
#[cfg(feature = "evdev-backend")]
pub fn list_devices(matcher: &DeviceMatch) -> Vec<DeviceInfo> {
    let mut devices: Vec<DeviceInfo> = evdev::enumerate()
        .map(|(path, device)| DeviceInfo::describe(path, &device, matcher))
        .collect();
    devices.sort_by(|a, b| a.path.cmp(&b.path));
    devices
}
