//! Ampel Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert Typen, Traits, Pure Functions und den generischen Sequencer.

#![no_std]

pub mod logic;
pub mod sequencer;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use logic::{Transition, cycle_phases, pin_function_bits, transition, with_pin_function};
pub use sequencer::Sequencer;
pub use traits::{Delay, GpioRegisters};
pub use types::{
    Lamps, LightState, Phase, Pin, PinFunction, PinMask, Register, Timing, TrafficLightPins,
};
