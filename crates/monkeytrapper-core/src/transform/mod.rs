// Monkeytrapper Transform Module
// Pure rewrite rule applied to every event read from the source device

pub mod scroll;

pub use scroll::{ScrollMode, ScrollResult, ScrollRule, EDGE_WHEEL, EDGE_WHEEL_HI_RES};
