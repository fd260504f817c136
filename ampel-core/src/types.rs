//! Core Types für die Ampel-Steuerung
//!
//! Datenstrukturen ohne Hardware-Dependencies: Pins, Bitmasken,
//! Register-Offsets und die Zustände der Ampel.

use core::fmt;
use core::ops::BitOr;
use core::time::Duration;

// ============================================================================
// GPIO Register
// ============================================================================

/// GPIO-Register des BCM2711 (Raspberry Pi 4), die die Ampel benutzt
///
/// Geschlossene Menge: es gibt keinen Weg, einen beliebigen Offset
/// von außen einzuschleusen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    /// GPFSEL0 - Function Select für Pins 0-9
    FunctionSelect0,
    /// GPFSEL1 - Function Select für Pins 10-19
    FunctionSelect1,
    /// GPFSEL2 - Function Select für Pins 20-29
    FunctionSelect2,
    /// GPSET0 - Write-1-to-set für Pins 0-31
    Set0,
    /// GPCLR0 - Write-1-to-clear für Pins 0-31
    Clear0,
}

impl Register {
    /// Offset in 32-Bit-Worten ab der GPIO-Basisadresse
    pub const fn offset(self) -> usize {
        match self {
            Register::FunctionSelect0 => 0,
            Register::FunctionSelect1 => 1,
            Register::FunctionSelect2 => 2,
            Register::Set0 => 7,
            Register::Clear0 => 10,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Register::FunctionSelect0 => "GPFSEL0",
            Register::FunctionSelect1 => "GPFSEL1",
            Register::FunctionSelect2 => "GPFSEL2",
            Register::Set0 => "GPSET0",
            Register::Clear0 => "GPCLR0",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Pins
// ============================================================================

/// GPIO-Pin-Nummer (BCM-Nummerierung)
///
/// Nur Pins 0-29 sind erlaubt: deren Function-Select-Felder liegen in
/// GPFSEL0-2, ihre Set/Clear-Bits in GPSET0/GPCLR0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pin(u8);

impl Pin {
    /// Höchste unterstützte Pin-Nummer
    pub const MAX: u8 = 29;

    /// Erstellt einen Pin
    ///
    /// # Panics
    /// Bei `number > Pin::MAX`. In `const`-Kontexten ist das ein
    /// Compile-Fehler.
    pub const fn new(number: u8) -> Self {
        assert!(number <= Self::MAX, "GPIO pin out of range");
        Self(number)
    }

    pub const fn number(self) -> u8 {
        self.0
    }

    /// Bit des Pins in GPSET0/GPCLR0 (`1 << pin`)
    pub const fn mask(self) -> PinMask {
        PinMask(1 << self.0)
    }

    /// Function-Select-Register, das das 3-Bit-Feld dieses Pins enthält
    pub const fn function_select_register(self) -> Register {
        match self.0 / 10 {
            0 => Register::FunctionSelect0,
            1 => Register::FunctionSelect1,
            _ => Register::FunctionSelect2,
        }
    }

    /// Bit-Position des 3-Bit-Feldes im Function-Select-Register
    pub const fn function_select_shift(self) -> u32 {
        (self.0 as u32 % 10) * 3
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{}", self.number())
    }
}

/// Menge von Pins als Bitmaske für GPSET0/GPCLR0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PinMask(u32);

impl PinMask {
    pub const EMPTY: PinMask = PinMask(0);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, pin: Pin) -> bool {
        self.0 & pin.mask().0 != 0
    }

    pub const fn union(self, other: PinMask) -> PinMask {
        PinMask(self.0 | other.0)
    }

    /// Pins in `self`, die nicht in `other` sind
    pub const fn difference(self, other: PinMask) -> PinMask {
        PinMask(self.0 & !other.0)
    }
}

impl BitOr for PinMask {
    type Output = PinMask;

    fn bitor(self, rhs: PinMask) -> PinMask {
        self.union(rhs)
    }
}

impl BitOr<Pin> for PinMask {
    type Output = PinMask;

    fn bitor(self, rhs: Pin) -> PinMask {
        self.union(rhs.mask())
    }
}

impl BitOr for Pin {
    type Output = PinMask;

    fn bitor(self, rhs: Pin) -> PinMask {
        self.mask().union(rhs.mask())
    }
}

/// Pin-Funktion im 3-Bit-Feld von GPFSELn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinFunction {
    Input,
    Output,
}

impl PinFunction {
    /// Maske eines Feldes (vor dem Shift)
    pub const FIELD_MASK: u32 = 0b111;

    pub const fn bits(self) -> u32 {
        match self {
            PinFunction::Input => 0b000,
            PinFunction::Output => 0b001,
        }
    }
}

// ============================================================================
// Ampel
// ============================================================================

/// Pin-Zuordnung der drei Ampel-LEDs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrafficLightPins {
    pub red: Pin,
    pub yellow: Pin,
    pub green: Pin,
}

impl TrafficLightPins {
    pub const fn all(&self) -> [Pin; 3] {
        [self.red, self.yellow, self.green]
    }

    /// Alle drei LED-Bits
    pub const fn mask(&self) -> PinMask {
        self.red.mask().union(self.yellow.mask()).union(self.green.mask())
    }

    /// Bitmaske der leuchtenden Lampen
    pub const fn mask_of(&self, lamps: Lamps) -> PinMask {
        let mut mask = PinMask::EMPTY;
        if lamps.red {
            mask = mask.union(self.red.mask());
        }
        if lamps.yellow {
            mask = mask.union(self.yellow.mask());
        }
        if lamps.green {
            mask = mask.union(self.green.mask());
        }
        mask
    }

    /// Logischer Lampenzustand aus einer Bitmaske (fremde Bits werden ignoriert)
    pub const fn lamps_of(&self, mask: PinMask) -> Lamps {
        Lamps {
            red: mask.contains(self.red),
            yellow: mask.contains(self.yellow),
            green: mask.contains(self.green),
        }
    }
}

/// Welche Lampen leuchten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Lamps {
    pub red: bool,
    pub yellow: bool,
    pub green: bool,
}

impl Lamps {
    pub const OFF: Lamps = Lamps::new(false, false, false);
    pub const RED: Lamps = Lamps::new(true, false, false);
    pub const RED_YELLOW: Lamps = Lamps::new(true, true, false);
    pub const GREEN: Lamps = Lamps::new(false, false, true);
    pub const YELLOW: Lamps = Lamps::new(false, true, false);

    pub const fn new(red: bool, yellow: bool, green: bool) -> Self {
        Self { red, yellow, green }
    }
}

impl fmt::Display for Lamps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let on = |lit: bool, c: char| if lit { c } else { '-' };
        write!(
            f,
            "[{}{}{}]",
            on(self.red, 'R'),
            on(self.yellow, 'Y'),
            on(self.green, 'G')
        )
    }
}

/// Zustand der Ampel-Zustandsmaschine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightState {
    Red,
    RedYellow,
    Green,
    YellowBlink,
}

impl LightState {
    pub const fn name(self) -> &'static str {
        match self {
            LightState::Red => "Red",
            LightState::RedYellow => "RedYellow",
            LightState::Green => "Green",
            LightState::YellowBlink => "YellowBlink",
        }
    }
}

impl fmt::Display for LightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ein Schritt im Zyklus: Lampen setzen, dann `hold` lang halten
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    pub state: LightState,
    pub lamps: Lamps,
    pub hold: Duration,
}

/// Zeitkonstanten des Zyklus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Haltezeit für Rot und Grün
    pub long_hold: Duration,
    /// Haltezeit für Rot-Gelb
    pub short_hold: Duration,
    /// Dauer einer An- bzw. Aus-Phase beim Gelb-Blinken
    pub blink_phase: Duration,
    /// Anzahl der An/Aus-Paare beim Gelb-Blinken
    pub blink_count: u8,
}
