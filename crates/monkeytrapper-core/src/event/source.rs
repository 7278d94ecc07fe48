// Monkeytrapper Device Source
// Blocking wait on the grabbed device, interruptible by the shutdown pipe

use std::io;
use std::os::unix::io::{AsRawFd, RawFd};

use evdev::Device;

use super::r#loop::{EventSource, Fetched};
use crate::input::RawEvent;
use crate::signal::ShutdownSignal;

/// Which descriptor became ready
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Device,
    Shutdown,
}

/// Block until `device_fd` or `shutdown_fd` is readable.
///
/// There is no timeout. Shutdown wins when both are ready. POLLERR and
/// POLLHUP on the device count as ready so the following read reports
/// the error. EINTR restarts the wait; the signal itself arrives through
/// the shutdown pipe.
pub fn wait_readable(device_fd: RawFd, shutdown_fd: RawFd) -> io::Result<Readiness> {
    let mut poll_fds = [
        libc::pollfd {
            fd: device_fd,
            events: libc::POLLIN,
            revents: 0,
        },
        libc::pollfd {
            fd: shutdown_fd,
            events: libc::POLLIN,
            revents: 0,
        },
    ];

    loop {
        let poll_result =
            unsafe { libc::poll(poll_fds.as_mut_ptr(), poll_fds.len() as libc::nfds_t, -1) };

        if poll_result < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }

        if poll_fds[1].revents != 0 {
            return Ok(Readiness::Shutdown);
        }
        if poll_fds[0].revents != 0 {
            return Ok(Readiness::Device);
        }
    }
}

/// The grabbed evdev device as an [`EventSource`]
pub struct DeviceSource<'a> {
    device: &'a mut Device,
    shutdown: &'a ShutdownSignal,
}

impl<'a> DeviceSource<'a> {
    pub fn new(device: &'a mut Device, shutdown: &'a ShutdownSignal) -> Self {
        Self { device, shutdown }
    }
}

impl EventSource for DeviceSource<'_> {
    fn fetch(&mut self) -> io::Result<Fetched> {
        match wait_readable(self.device.as_raw_fd(), self.shutdown.as_raw_fd())? {
            Readiness::Shutdown => {
                // Drain the byte the handler wrote
                self.shutdown.triggered();
                Ok(Fetched::Shutdown)
            }
            Readiness::Device => {
                let events = self.device.fetch_events()?.map(RawEvent::from).collect();
                Ok(Fetched::Events(events))
            }
        }
    }
}
