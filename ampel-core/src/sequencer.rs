//! Ampel-Sequencer
//!
//! Zeitgesteuerte Zustandsmaschine Rot → Rot-Gelb → Grün → Gelb-Blinken.
//!
//! # Trait-basierte Abstraktion
//! Die generischen Parameter ermöglichen:
//! - Real Hardware (`RegisterWindow` + `ThreadDelay`) im Production-Code
//! - Mock Implementierungen in den Host-Tests

use log::{debug, info, trace};

use crate::logic::{Transition, cycle_phases, transition, with_pin_function};
use crate::traits::{Delay, GpioRegisters};
use crate::types::{
    Lamps, LightState, Phase, PinFunction, PinMask, Register, Timing, TrafficLightPins,
};

/// Treibt die drei Ampel-LEDs über die GPIO-Register
pub struct Sequencer<R, D> {
    registers: R,
    delay: D,
    pins: TrafficLightPins,
    timing: Timing,
    /// Bits, die der Sequencer zuletzt gesetzt hat
    lit: PinMask,
    state: Option<LightState>,
}

impl<R: GpioRegisters, D: Delay> Sequencer<R, D> {
    /// Erstellt den Sequencer und führt die Init-Phase aus
    ///
    /// - Schaltet die drei LED-Pins per read-modify-write auf Ausgang,
    ///   alle anderen Felder im Function-Select-Register bleiben erhalten
    /// - Löscht alle drei LED-Bits
    pub fn init(registers: R, delay: D, pins: TrafficLightPins, timing: Timing) -> Self {
        let mut sequencer = Self {
            registers,
            delay,
            pins,
            timing,
            lit: PinMask::EMPTY,
            state: None,
        };
        sequencer.configure_outputs();
        sequencer.write(Register::Clear0, pins.mask());
        sequencer
    }

    fn configure_outputs(&mut self) {
        for pin in self.pins.all() {
            let register = pin.function_select_register();
            let before = self.registers.read(register);
            let after = with_pin_function(before, pin, PinFunction::Output);
            info!("{} as output: {}: {:#034b} -> {:#034b}", pin, register, before, after);
            self.registers.write(register, after);
        }
    }

    fn write(&mut self, register: Register, mask: PinMask) {
        trace!("{} <- {:#010x}", register, mask.bits());
        self.registers.write(register, mask.bits());
    }

    /// Schaltet auf die Lampen der Phase um und hält sie `phase.hold` lang
    pub fn step(&mut self, phase: &Phase) {
        let target = self.pins.mask_of(phase.lamps);
        let Transition { clear, set } = transition(self.lit, target);

        // Erst löschen, dann setzen: Rot und Grün leuchten nie gleichzeitig
        if !clear.is_empty() {
            self.write(Register::Clear0, clear);
        }
        if !set.is_empty() {
            self.write(Register::Set0, set);
        }
        self.lit = target;

        if self.state != Some(phase.state) {
            debug!("{} {}", phase.state, phase.lamps);
        }
        self.state = Some(phase.state);

        self.delay.delay(phase.hold);
    }

    /// Läuft genau einen Zyklus durch, endet nach der letzten Aus-Phase
    pub fn run_cycle(&mut self) {
        for phase in cycle_phases(self.timing) {
            self.step(&phase);
        }
    }

    /// Läuft Zyklen, bis `keep_running` false liefert
    ///
    /// Die Bedingung wird vor jeder Phase geprüft, eine laufende Haltezeit
    /// wird nicht abgebrochen. Gibt die Anzahl vollständiger Zyklen zurück.
    pub fn run_while<F: FnMut() -> bool>(&mut self, mut keep_running: F) -> u64 {
        let mut cycles = 0;
        loop {
            for phase in cycle_phases(self.timing) {
                if !keep_running() {
                    return cycles;
                }
                self.step(&phase);
            }
            cycles += 1;
        }
    }

    pub fn lamps(&self) -> Lamps {
        self.pins.lamps_of(self.lit)
    }

    /// Zustand der zuletzt begonnenen Phase, `None` direkt nach Init
    pub fn state(&self) -> Option<LightState> {
        self.state
    }

    pub fn registers(&self) -> &R {
        &self.registers
    }

    pub fn into_parts(self) -> (R, D) {
        (self.registers, self.delay)
    }
}
