// Ampel Task - Steuert die drei LEDs über die GPIO-Register
use log::info;

use ampel_core::{GpioRegisters, Sequencer};

use crate::config::{AMPEL_PINS, AMPEL_TIMING};
use crate::hal::ThreadDelay;

/// Ampel Task - Init-Phase und Hauptschleife
///
/// Konfiguriert die Pins, läuft dann Zyklen bis `keep_running` false liefert
/// und gibt die Register zurück, damit der Aufrufer sie freigeben kann.
///
/// # Parameter
/// - `registers`: GPIO-Register (`RegisterWindow` oder Mock)
/// - `keep_running`: wird vor jeder Phase geprüft
pub fn ampel_task<R: GpioRegisters, F: FnMut() -> bool>(registers: R, keep_running: F) -> R {
    info!("Setting mode for each pin");
    let mut sequencer = Sequencer::init(registers, ThreadDelay, AMPEL_PINS, AMPEL_TIMING);

    info!("Starting traffic light cycle");
    let cycles = sequencer.run_while(keep_running);
    info!("Stopped after {} full cycles", cycles);

    let (registers, _delay) = sequencer.into_parts();
    registers
}
