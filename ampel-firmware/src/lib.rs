// Library-Root: Wiederverwendbare Logik und Module

// Module
pub mod config;
pub mod hal;
pub mod tasks;

// Re-exports von ampel-core
pub use ampel_core::{
    Delay, GpioRegisters, Lamps, LightState, Pin, PinMask, Register, Sequencer, Timing,
    TrafficLightPins,
};
