//! Zoomer keymap: everything the pad does between "a key moved" and
//! "a report goes to the host".

#![cfg_attr(not(test), no_std)]

pub mod conf;
pub mod key;
pub mod keypad;
pub mod layers;
pub mod leds;
pub mod matrix;
pub mod status;
pub mod typer;

pub use key::{Chord, Key, Os};
pub use keypad::{Host, Keypad};
pub use layers::Layer;
pub use matrix::{KeyEvent, Matrix};
pub use status::{Status, StatusError};
pub use typer::Typer;

/// Millisecond timestamps fed in by the firmware tick.
pub type Instant = fugit::TimerInstantU32<1000>;
pub type Duration = fugit::MillisDurationU32;

#[cfg(feature = "defmt")]
mod logging {
    pub use defmt::{debug, info, warn};
}

#[cfg(all(not(feature = "defmt"), not(feature = "log")))]
compile_error!("zoomer-keymap needs either the `log` or the `defmt` feature");

#[cfg(all(not(feature = "defmt"), feature = "log"))]
mod logging {
    pub use log::{debug, info, warn};
}
