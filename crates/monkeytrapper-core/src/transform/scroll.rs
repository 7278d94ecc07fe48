// Monkeytrapper Scroll Rule
// Normalizes wheel events from the source device to a fixed step

use smallvec::{smallvec, SmallVec};
use strum_macros::{Display, EnumString};

use crate::input::{RawEvent, HI_RES_PER_DETENT, REL_WHEEL};

/// Standard wheel value the Mousetrapper reports when the finger is
/// dragged fast along the edge of the plate.
pub const EDGE_WHEEL: i32 = 75;
/// Hi-res counterpart of [`EDGE_WHEEL`]
pub const EDGE_WHEEL_HI_RES: i32 = EDGE_WHEEL * HI_RES_PER_DETENT;

/// How wheel events are rewritten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ScrollMode {
    /// Every wheel step becomes a fixed step
    Fixed,
    /// Only fast-edge steps are rewritten; everything below passes through
    /// so the native acceleration stays intact
    Threshold,
}

impl ScrollMode {
    pub fn from_allow_accel(allow_accel: bool) -> Self {
        if allow_accel {
            ScrollMode::Threshold
        } else {
            ScrollMode::Fixed
        }
    }
}

/// Outcome of applying the rule to one source event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollResult {
    /// Forward the event unchanged
    Passthrough(RawEvent),
    /// Drop the event, write the wheel/hi-res pair and a sync marker
    Remapped([RawEvent; 2]),
    /// Drop the event without writing anything
    Suppress,
}

impl ScrollResult {
    /// Events this result puts on the virtual device, in order, with the
    /// sync marker of a remapped pair included.
    pub fn output(&self) -> SmallVec<[RawEvent; 3]> {
        match *self {
            ScrollResult::Passthrough(event) => smallvec![event],
            ScrollResult::Remapped([wheel, hi_res]) => smallvec![wheel, hi_res, RawEvent::sync()],
            ScrollResult::Suppress => SmallVec::new(),
        }
    }
}

/// Scroll normalization rule, fixed at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRule {
    mode: ScrollMode,
    step: i32,
}

impl ScrollRule {
    /// `step` is the wheel value written per rewritten event; the hi-res
    /// event carries `120 * step`.
    pub fn new(mode: ScrollMode, step: i32) -> Self {
        Self { mode, step }
    }

    pub fn mode(&self) -> ScrollMode {
        self.mode
    }

    pub fn step(&self) -> i32 {
        self.step
    }

    /// Apply the rule to a single event.
    ///
    /// Non-wheel events always pass through. A standard wheel event of
    /// value 0 passes through in both modes.
    pub fn apply(&self, event: RawEvent) -> ScrollResult {
        if !event.is_wheel() {
            return ScrollResult::Passthrough(event);
        }

        match self.mode {
            ScrollMode::Fixed => match event.code {
                REL_WHEEL if event.value == 0 => ScrollResult::Passthrough(event),
                REL_WHEEL => self.remap(event.value.signum()),
                // One notch reports on both axes; the pair is built from REL_WHEEL only
                _ => ScrollResult::Suppress,
            },
            ScrollMode::Threshold => {
                if !is_edge_value(event.value) {
                    return ScrollResult::Passthrough(event);
                }
                match (event.code, event.value) {
                    (REL_WHEEL, EDGE_WHEEL) => self.remap(1),
                    (REL_WHEEL, value) if value == -EDGE_WHEEL => self.remap(-1),
                    _ => ScrollResult::Suppress,
                }
            }
        }
    }

    fn remap(&self, direction: i32) -> ScrollResult {
        let step = self.step.saturating_mul(direction);
        ScrollResult::Remapped([
            RawEvent::wheel(step),
            RawEvent::wheel_hi_res(step.saturating_mul(HI_RES_PER_DETENT)),
        ])
    }
}

/// Wheel values (either axis, either direction) that mark a fast-edge step
fn is_edge_value(value: i32) -> bool {
    [EDGE_WHEEL, -EDGE_WHEEL, EDGE_WHEEL_HI_RES, -EDGE_WHEEL_HI_RES].contains(&value)
}
