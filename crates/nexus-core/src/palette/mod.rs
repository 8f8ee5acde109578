//! Command palette interaction.
//!
//! # Module Structure
//!
//! - `controller`: the `Closed`/`Open` state machine driven by keys and pointer
//!   activations (`PaletteController`)

mod controller;

pub use controller::{PaletteController, PaletteKey, PaletteOutcome, PaletteSession, PaletteState};
