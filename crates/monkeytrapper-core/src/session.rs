// Monkeytrapper Session
// locate -> grab -> virtual device -> event loop -> release

use crate::error::{SessionError, SessionResult};
use crate::grab::{Exclusive, GrabGuard};

/// Line printed whenever the event loop has been left
pub const EXIT_NOTICE: &str = "Exited";

/// Prints [`EXIT_NOTICE`] when dropped, including during unwinding.
struct ExitNotice;

impl Drop for ExitNotice {
    fn drop(&mut self) {
        println!("{}", EXIT_NOTICE);
    }
}

/// Grab `device`, run `body` with it, then release the grab.
///
/// The completion line is printed once `body` has returned (or unwound),
/// and the grab is released after that, exactly once, whatever `body`
/// returned. Nothing runs and nothing is released if the grab fails.
pub fn run_grabbed<D, T, F>(device: D, body: F) -> SessionResult<T>
where
    D: Exclusive,
    F: FnOnce(&mut D) -> SessionResult<T>,
{
    let mut guard = GrabGuard::acquire(device).map_err(SessionError::GrabFailed)?;
    let result = {
        let _notice = ExitNotice;
        body(&mut *guard)
    };
    // Release failures are logged; the session outcome stays what body returned
    let _ = guard.release();
    result
}

#[cfg(feature = "evdev-backend")]
pub use backend::run;

#[cfg(feature = "evdev-backend")]
mod backend {
    use evdev::Device;

    use super::run_grabbed;
    use crate::config::Config;
    use crate::error::{SessionError, SessionResult};
    use crate::event::{DeviceSource, EventLoop, Termination};
    use crate::input;
    use crate::output::VirtualOutput;
    use crate::signal::ShutdownSignal;

    /// Run a full session against the real device.
    ///
    /// Signal handlers are installed before the grab so that a signal at
    /// any point after it still leaves through the release path.
    pub fn run(config: &Config) -> SessionResult<Termination> {
        let shutdown = ShutdownSignal::install().map_err(SessionError::Signal)?;
        let located = input::locate(&config.device)?;
        run_grabbed(located.device, |device| forward(device, &shutdown, config))
    }

    fn forward(device: &mut Device, shutdown: &ShutdownSignal, config: &Config) -> SessionResult<Termination> {
        let output = VirtualOutput::from_device(device, &config.output.name)
            .map_err(SessionError::VirtualDevice)?;
        let source = DeviceSource::new(device, shutdown);

        let mut event_loop = EventLoop::new(source, output, config.scroll_rule());
        let result = event_loop.run();

        let stats = event_loop.stats();
        log::info!(
            "Processed {} events: {} forwarded, {} remapped, {} suppressed",
            stats.read,
            stats.forwarded,
            stats.remapped,
            stats.suppressed
        );
        // event_loop drops here, destroying the virtual device before the
        // completion line is printed
        result
    }
}
