// Monkeytrapper Input Layer - Event Record
// Fixed tagged record for evdev events and the codes the scroll rule cares about

use std::fmt;

/// EV_SYN event type code from input-event-codes.h
pub const EV_SYN: u16 = 0x00;
/// EV_KEY event type code
pub const EV_KEY: u16 = 0x01;
/// EV_REL event type code
pub const EV_REL: u16 = 0x02;

/// SYN_REPORT code (end of an atomic batch)
pub const SYN_REPORT: u16 = 0x00;

/// REL_HWHEEL code
pub const REL_HWHEEL: u16 = 0x06;
/// REL_WHEEL code
pub const REL_WHEEL: u16 = 0x08;
/// REL_WHEEL_HI_RES code
pub const REL_WHEEL_HI_RES: u16 = 0x0b;
/// REL_HWHEEL_HI_RES code
pub const REL_HWHEEL_HI_RES: u16 = 0x0c;

/// Hi-res wheel units per detent of the standard wheel axis.
pub const HI_RES_PER_DETENT: i32 = 120;

/// A single input event: type tag, code and value.
///
/// Timestamps are not carried; the kernel stamps events again when they
/// are injected through uinput.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawEvent {
    pub kind: u16,
    pub code: u16,
    pub value: i32,
}

impl RawEvent {
    pub const fn new(kind: u16, code: u16, value: i32) -> Self {
        Self { kind, code, value }
    }

    /// Relative motion event on `code`
    pub const fn rel(code: u16, value: i32) -> Self {
        Self::new(EV_REL, code, value)
    }

    /// Standard wheel event
    pub const fn wheel(value: i32) -> Self {
        Self::rel(REL_WHEEL, value)
    }

    /// High-resolution wheel event
    pub const fn wheel_hi_res(value: i32) -> Self {
        Self::rel(REL_WHEEL_HI_RES, value)
    }

    /// SYN_REPORT marker
    pub const fn sync() -> Self {
        Self::new(EV_SYN, SYN_REPORT, 0)
    }

    pub fn is_relative(&self) -> bool {
        self.kind == EV_REL
    }

    /// True for the vertical wheel axes (standard and hi-res).
    ///
    /// Horizontal wheels are not included.
    pub fn is_wheel(&self) -> bool {
        self.is_relative() && matches!(self.code, REL_WHEEL | REL_WHEEL_HI_RES)
    }

    pub fn is_sync_report(&self) -> bool {
        self.kind == EV_SYN && self.code == SYN_REPORT
    }
}

impl fmt::Display for RawEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            EV_SYN => "SYN",
            EV_KEY => "KEY",
            EV_REL => "REL",
            _ => return write!(f, "type={} code={} value={}", self.kind, self.code, self.value),
        };
        write!(f, "{} code={} value={}", kind, self.code, self.value)
    }
}

#[cfg(feature = "evdev-backend")]
impl From<evdev::InputEvent> for RawEvent {
    fn from(event: evdev::InputEvent) -> Self {
        Self::new(event.event_type().0, event.code(), event.value())
    }
}

#[cfg(feature = "evdev-backend")]
impl From<RawEvent> for evdev::InputEvent {
    fn from(event: RawEvent) -> Self {
        evdev::InputEvent::new(evdev::EventType(event.kind), event.code, event.value)
    }
}
