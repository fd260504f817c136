//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Register-Zugriff und Wartezeiten
//! ohne konkrete Implementierung.

use core::time::Duration;

use crate::types::Register;

/// Trait für Zugriff auf die GPIO-Register
///
/// # Implementierungen
/// - **Production:** `RegisterWindow` (`/dev/mem`, volatile Zugriffe)
/// - **Testing:** `MockRegisters` (in-memory Mock)
///
/// Zugriffe sind unfehlbar: es gibt nur die Offsets aus [`Register`].
pub trait GpioRegisters {
    /// Liest den aktuellen Wert eines Registers
    fn read(&self, register: Register) -> u32;

    /// Schreibt einen Wert in ein Register
    ///
    /// Jeder Aufruf muss als eigener Speicherzugriff bei der Hardware
    /// ankommen, in Aufrufreihenfolge.
    fn write(&mut self, register: Register, value: u32);
}

/// Trait für blockierende Wartezeiten
pub trait Delay {
    fn delay(&mut self, duration: Duration);
}
