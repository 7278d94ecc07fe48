// Monkeytrapper Exclusive Grab
// Scoped EVIOCGRAB ownership of the source device

use std::io;
use std::ops::{Deref, DerefMut};

/// A device that can be grabbed for exclusive access
pub trait Exclusive {
    fn grab(&mut self) -> io::Result<()>;
    fn ungrab(&mut self) -> io::Result<()>;
}

#[cfg(feature = "evdev-backend")]
impl Exclusive for evdev::Device {
    fn grab(&mut self) -> io::Result<()> {
        evdev::Device::grab(self)
    }

    fn ungrab(&mut self) -> io::Result<()> {
        evdev::Device::ungrab(self)
    }
}

/// Owns a grabbed device and releases the grab exactly once.
///
/// The guard only exists after a successful grab, so release can never run
/// before acquisition. Release happens on [`GrabGuard::release`] or on drop,
/// whichever comes first; the drop path also covers early returns and panic
/// unwinding. If the device stays grabbed after this process is gone, the
/// desktop loses the device until it is re-plugged.
pub struct GrabGuard<D: Exclusive> {
    device: D,
    held: bool,
}

impl<D: Exclusive> GrabGuard<D> {
    /// Grab `device`. On failure the device is dropped ungrabbed.
    pub fn acquire(mut device: D) -> io::Result<Self> {
        device.grab()?;
        log::info!("Grabbed source device");
        Ok(Self { device, held: true })
    }

    /// Whether the grab is still held
    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Release the grab now and report the result.
    ///
    /// Calling this more than once, or dropping afterwards, does not
    /// ungrab again.
    pub fn release(&mut self) -> io::Result<()> {
        if !self.held {
            return Ok(());
        }
        self.held = false;
        let result = self.device.ungrab();
        match &result {
            Ok(()) => log::info!("Released source device"),
            Err(e) => log::warn!("Failed to release source device: {}", e),
        }
        result
    }
}

impl<D: Exclusive> Deref for GrabGuard<D> {
    type Target = D;

    fn deref(&self) -> &D {
        &self.device
    }
}

impl<D: Exclusive> DerefMut for GrabGuard<D> {
    fn deref_mut(&mut self) -> &mut D {
        &mut self.device
    }
}

impl<D: Exclusive> Drop for GrabGuard<D> {
    fn drop(&mut self) {
        // Errors are already logged by release()
        let _ = self.release();
    }
}
