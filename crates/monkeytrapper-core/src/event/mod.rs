// Monkeytrapper Event Handling
// The read/transform/write loop and the device it reads from

pub mod r#loop;

#[cfg(feature = "evdev-backend")]
pub mod source;

pub use r#loop::{EventLoop, EventSource, Fetched, LoopStats, Termination};

#[cfg(feature = "evdev-backend")]
pub use source::{wait_readable, DeviceSource, Readiness};
