// Monkeytrapper Core Library
// Grab a pointing device, normalize its scroll wheel, re-emit it through uinput

pub mod config;
pub mod error;
pub mod event;
pub mod grab;
pub mod input;
pub mod output;
pub mod session;
pub mod transform;

#[cfg(feature = "evdev-backend")]
pub mod signal;

pub use config::{Config, ConfigError, OutputConfig, ScrollConfig};
pub use error::{SessionError, SessionResult, EXIT_DEVICE_NOT_FOUND, EXIT_FAILURE, EXIT_OK};
pub use event::{EventLoop, EventSource, Fetched, LoopStats, Termination};
pub use grab::{Exclusive, GrabGuard};
pub use input::{select_device, DeviceIdentity, DeviceInfo, DeviceMatch, LocatedDevice, RawEvent};
pub use output::{EventSink, RecordingSink};
pub use session::{run_grabbed, EXIT_NOTICE};
pub use transform::{ScrollMode, ScrollResult, ScrollRule};

#[cfg(feature = "evdev-backend")]
pub use input::{list_devices, locate};
#[cfg(feature = "evdev-backend")]
pub use output::{Emitter, VirtualOutput};
#[cfg(feature = "evdev-backend")]
pub use signal::ShutdownSignal;
