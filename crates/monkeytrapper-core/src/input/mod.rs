// Monkeytrapper Input Layer
// Event record, device matching and source device location

mod device;
mod event;
mod filter;

pub use device::{select_device, DeviceIdentity, DeviceInfo, LocatedDevice};
#[cfg(feature = "evdev-backend")]
pub use device::{list_devices, locate};
pub use event::{
    RawEvent, EV_KEY, EV_REL, EV_SYN, HI_RES_PER_DETENT, REL_HWHEEL, REL_HWHEEL_HI_RES, REL_WHEEL,
    REL_WHEEL_HI_RES, SYN_REPORT,
};
pub use filter::DeviceMatch;
