// Monkeytrapper uinput Output Layer
// Virtual device cloned from the source device

use std::io;

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AbsInfo, AbsoluteAxisType, Device, InputEvent, UinputAbsSetup};

use super::sink::EventSink;
use crate::input::RawEvent;

/// Posts one batch of events, closing it with `SYN_REPORT`
pub trait Emitter {
    fn emit(&mut self, events: &[InputEvent]) -> io::Result<()>;
}

impl Emitter for VirtualDevice {
    fn emit(&mut self, events: &[InputEvent]) -> io::Result<()> {
        VirtualDevice::emit(self, events)
    }
}

/// Virtual uinput device standing in for the grabbed source device.
///
/// Events are collected until a sync marker and then posted in one
/// `emit` call, which appends the `SYN_REPORT` itself. The kernel only
/// publishes a batch at its `SYN_REPORT`, so consumers see the same
/// stream as if every event had been written separately.
///
/// Dropping this closes the uinput handle, which unregisters the device.
pub struct VirtualOutput<E = VirtualDevice> {
    device: E,
    pending: Vec<InputEvent>,
}

impl VirtualOutput<VirtualDevice> {
    /// Create a virtual device with the capabilities of `source`.
    ///
    /// Every capability group the uinput builder accepts is cloned, along
    /// with the input id; the name is replaced by `name`. Force feedback
    /// is left out since nothing forwards effect uploads. LEDs cannot be
    /// declared through the builder.
    pub fn from_device(source: &Device, name: &str) -> io::Result<Self> {
        let mut builder = VirtualDeviceBuilder::new()?
            .name(name)
            .input_id(source.input_id())
            .with_properties(source.properties())?;

        if let Some(keys) = source.supported_keys() {
            log::debug!("  -> {} key capabilities", keys.iter().count());
            builder = builder.with_keys(keys)?;
        }

        if let Some(axes) = source.supported_relative_axes() {
            log::debug!("  -> {} relative axes", axes.iter().count());
            builder = builder.with_relative_axes(axes)?;
        } else {
            log::warn!("Source device has no relative axes, nothing to rewrite");
        }

        if let Some(axes) = source.supported_absolute_axes() {
            let setups = abs_setups(axes.iter(), &source.get_abs_state()?);
            log::debug!("  -> {} absolute axes", setups.len());
            for setup in &setups {
                builder = builder.with_absolute_axis(setup)?;
            }
        }

        if let Some(misc) = source.misc_properties() {
            builder = builder.with_msc(misc)?;
        }

        if let Some(switches) = source.supported_switches() {
            builder = builder.with_switches(switches)?;
        }

        if source.supported_leds().is_some() {
            log::debug!("Source device has LEDs; they are not mirrored");
        }

        let device = builder.build()?;
        log::info!("Virtual device '{}' created", name);

        Ok(Self::with_emitter(device))
    }
}

/// Uinput setup for each axis, with range and resolution from `state`
fn abs_setups(
    axes: impl Iterator<Item = AbsoluteAxisType>,
    state: &[libc::input_absinfo],
) -> Vec<UinputAbsSetup> {
    axes.filter_map(|axis| {
        let info = state.get(axis.0 as usize)?;
        Some(UinputAbsSetup::new(
            axis,
            AbsInfo::new(info.value, info.minimum, info.maximum, info.fuzz, info.flat, info.resolution),
        ))
    })
    .collect()
}

impl<E: Emitter> VirtualOutput<E> {
    /// Batch events on top of an existing emitter
    pub fn with_emitter(device: E) -> Self {
        Self {
            device,
            pending: Vec::with_capacity(8),
        }
    }
}

impl<E: Emitter> EventSink for VirtualOutput<E> {
    fn write(&mut self, event: RawEvent) -> io::Result<()> {
        if event.is_sync_report() {
            return self.sync();
        }
        self.pending.push(event.into());
        Ok(())
    }

    fn sync(&mut self) -> io::Result<()> {
        let result = self.device.emit(&self.pending);
        self.pending.clear();
        result
    }
}
