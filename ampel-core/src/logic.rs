//! Pure Business Logic Functions
//!
//! Funktionen ohne Hardware-Dependencies (testbar!)

use crate::types::{Lamps, LightState, Phase, Pin, PinFunction, PinMask, Timing};

/// Setzt das Function-Select-Feld eines Pins in einem Registerwert
///
/// Read-modify-write auf dem Wert: alle Bits außerhalb des 3-Bit-Feldes
/// von `pin` bleiben unverändert.
///
/// ```
/// # use ampel_core::{Pin, PinFunction, with_pin_function};
/// let before = 0b111_000_111_000;
/// let after = with_pin_function(before, Pin::new(11), PinFunction::Output);
/// assert_eq!(after, 0b111_000_001_000);
/// ```
pub fn with_pin_function(value: u32, pin: Pin, function: PinFunction) -> u32 {
    let shift = pin.function_select_shift();
    (value & !(PinFunction::FIELD_MASK << shift)) | (function.bits() << shift)
}

/// Liest das rohe 3-Bit-Feld eines Pins aus einem Function-Select-Wert
pub fn pin_function_bits(value: u32, pin: Pin) -> u32 {
    (value >> pin.function_select_shift()) & PinFunction::FIELD_MASK
}

/// Register-Schreibzugriffe für einen Lampenwechsel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Bits für GPCLR0
    pub clear: PinMask,
    /// Bits für GPSET0
    pub set: PinMask,
}

/// Berechnet, welche Bits gelöscht und welche gesetzt werden müssen,
/// um von `lit` nach `target` zu kommen
///
/// Bits, die in beiden leuchten, werden nicht angefasst.
pub fn transition(lit: PinMask, target: PinMask) -> Transition {
    Transition {
        clear: lit.difference(target),
        set: target.difference(lit),
    }
}

/// Ein kompletter Ampelzyklus: Rot → Rot-Gelb → Grün → n × (Gelb an, Gelb aus)
///
/// Danach beginnt der nächste Zyklus wieder mit Rot.
pub fn cycle_phases(timing: Timing) -> impl Iterator<Item = Phase> + Clone {
    let main = [
        Phase {
            state: LightState::Red,
            lamps: Lamps::RED,
            hold: timing.long_hold,
        },
        Phase {
            state: LightState::RedYellow,
            lamps: Lamps::RED_YELLOW,
            hold: timing.short_hold,
        },
        Phase {
            state: LightState::Green,
            lamps: Lamps::GREEN,
            hold: timing.long_hold,
        },
    ];

    let blink = (0..timing.blink_count).flat_map(move |_| {
        [
            Phase {
                state: LightState::YellowBlink,
                lamps: Lamps::YELLOW,
                hold: timing.blink_phase,
            },
            Phase {
                state: LightState::YellowBlink,
                lamps: Lamps::OFF,
                hold: timing.blink_phase,
            },
        ]
    });

    main.into_iter().chain(blink)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use core::time::Duration;
    use std::vec::Vec;

    const TIMING: Timing = Timing {
        long_hold: Duration::from_secs(3),
        short_hold: Duration::from_millis(500),
        blink_phase: Duration::from_millis(500),
        blink_count: 5,
    };

    #[test]
    fn test_with_pin_function_keeps_other_bits() {
        let before = 0xFFFF_FFFF;
        let after = with_pin_function(before, Pin::new(10), PinFunction::Output);
        assert_eq!(after, 0xFFFF_FFF9);
        assert_eq!(pin_function_bits(after, Pin::new(10)), 0b001);
        assert_eq!(pin_function_bits(after, Pin::new(11)), 0b111);
    }

    #[test]
    fn test_with_pin_function_from_zero() {
        let mut value = 0;
        for n in [10, 11, 13] {
            value = with_pin_function(value, Pin::new(n), PinFunction::Output);
        }
        // Ausgabe-Modus für GPIO10, GPIO11 und GPIO13
        assert_eq!(value, 0b001_000_001_001);
    }

    #[test]
    fn test_with_pin_function_input_clears_field() {
        let value = with_pin_function(0b101_000, Pin::new(11), PinFunction::Input);
        assert_eq!(value, 0);
    }

    #[test]
    fn test_transition_keeps_shared_bits() {
        let red = Pin::new(10);
        let yellow = Pin::new(11);
        let green = Pin::new(13);

        let t = transition(red.mask(), red | yellow);
        assert_eq!(t.clear, PinMask::EMPTY);
        assert_eq!(t.set, yellow.mask());

        let t = transition(red | yellow, green.mask());
        assert_eq!(t.clear, red | yellow);
        assert_eq!(t.set, green.mask());
    }

    #[test]
    fn test_transition_same_state_is_empty() {
        let mask = Pin::new(11).mask();
        let t = transition(mask, mask);
        assert!(t.clear.is_empty());
        assert!(t.set.is_empty());
    }

    #[test]
    fn test_cycle_phases_order() {
        let states: [LightState; 4] = [
            LightState::Red,
            LightState::RedYellow,
            LightState::Green,
            LightState::YellowBlink,
        ];
        let phases: Vec<Phase> = cycle_phases(TIMING).collect();
        assert_eq!(phases.len(), 3 + 2 * 5);
        assert_eq!(phases[0].state, states[0]);
        assert_eq!(phases[1].state, states[1]);
        assert_eq!(phases[2].state, states[2]);
        for (i, phase) in phases.iter().enumerate().skip(3) {
            assert_eq!(phase.state, states[3]);
            let expected = if (i - 3) % 2 == 0 { Lamps::YELLOW } else { Lamps::OFF };
            assert_eq!(phase.lamps, expected);
            assert_eq!(phase.hold, TIMING.blink_phase);
        }
    }

    #[test]
    fn test_cycle_never_lights_red_and_green() {
        assert!(cycle_phases(TIMING).all(|p| !(p.lamps.red && p.lamps.green)));
    }
}
