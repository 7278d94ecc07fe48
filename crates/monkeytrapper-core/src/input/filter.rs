// Monkeytrapper Input Layer - Device Filtering
// Substring matching on physical path and device name

use serde::{Deserialize, Serialize};

/// Identifies the source device by substrings of its physical path and name.
///
/// Both substrings must be contained for a device to match. An empty
/// substring matches anything, including a device with no physical path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceMatch {
    /// Substring of the physical path (e.g., "usb-0000:00:14.0-14.3/input1")
    pub phys: String,
    /// Substring of the device name
    pub name: String,
}

impl DeviceMatch {
    /// Physical path of the Mousetrapper Advance 2.0 on the author's machine
    pub const DEFAULT_PHYS: &'static str = "usb-0000:00:14.0-14.3/input1";
    /// Name the Mousetrapper Advance 2.0 reports through evdev
    pub const DEFAULT_NAME: &'static str = "TRAPPER DATA Mousetrapper Advance 2.0";

    pub fn new(phys: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            phys: phys.into(),
            name: name.into(),
        }
    }

    /// Check whether a device with the given physical path and name matches.
    ///
    /// A missing physical path or name is treated as the empty string.
    pub fn matches(&self, phys: Option<&str>, name: Option<&str>) -> bool {
        phys.unwrap_or_default().contains(self.phys.as_str())
            && name.unwrap_or_default().contains(self.name.as_str())
    }
}

impl Default for DeviceMatch {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PHYS, Self::DEFAULT_NAME)
    }
}
