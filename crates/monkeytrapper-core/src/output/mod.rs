// Monkeytrapper Output Layer
// Event sinks: the uinput virtual device and an in-memory recorder

mod sink;

#[cfg(feature = "evdev-backend")]
mod uinput;

pub use sink::{EventSink, RecordingSink};

#[cfg(feature = "evdev-backend")]
pub use uinput::{Emitter, VirtualOutput};
