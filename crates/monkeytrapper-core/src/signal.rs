// Monkeytrapper Shutdown Signal
// SIGINT/SIGTERM delivered as a readable pipe for the event wait

use std::io::{self, Read};
use std::os::unix::io::{AsRawFd, RawFd};
use std::os::unix::net::UnixStream;

use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::SigId;

/// Readable end of a self-pipe written to from the signal handler.
///
/// The event wait polls this next to the source device, so a signal ends
/// the otherwise unbounded wait without a timeout. The handlers are
/// unregistered when this is dropped.
pub struct ShutdownSignal {
    reader: UnixStream,
    ids: Vec<SigId>,
}

impl ShutdownSignal {
    /// Signals that request an orderly shutdown
    pub const SIGNALS: [libc::c_int; 2] = [SIGINT, SIGTERM];

    /// Install handlers for SIGINT and SIGTERM
    pub fn install() -> io::Result<Self> {
        Self::install_for(&Self::SIGNALS)
    }

    /// Install handlers for an explicit list of signals
    pub fn install_for(signals: &[libc::c_int]) -> io::Result<Self> {
        let (reader, writer) = UnixStream::pair()?;
        reader.set_nonblocking(true)?;
        writer.set_nonblocking(true)?;

        let mut shutdown = Self {
            reader,
            ids: Vec::with_capacity(signals.len()),
        };
        for &signal in signals {
            let id = signal_hook::low_level::pipe::register(signal, writer.try_clone()?)?;
            shutdown.ids.push(id);
        }
        log::debug!("Installed shutdown handlers for signals {:?}", signals);
        Ok(shutdown)
    }

    /// Wrap an already connected stream; writing to its peer requests shutdown.
    pub fn from_stream(reader: UnixStream) -> io::Result<Self> {
        reader.set_nonblocking(true)?;
        Ok(Self {
            reader,
            ids: Vec::new(),
        })
    }

    /// Whether a shutdown was requested. Does not block.
    pub fn triggered(&self) -> bool {
        let mut buf = [0u8; 8];
        // WouldBlock means nothing was written yet
        matches!((&self.reader).read(&mut buf), Ok(n) if n > 0)
    }
}

impl AsRawFd for ShutdownSignal {
    fn as_raw_fd(&self) -> RawFd {
        self.reader.as_raw_fd()
    }
}

impl Drop for ShutdownSignal {
    fn drop(&mut self) {
        for id in self.ids.drain(..) {
            signal_hook::low_level::unregister(id);
        }
    }
}
