// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
//
// Pins und Zeiten sind fest, es gibt keine Laufzeit-Konfiguration.

use core::time::Duration;

use ampel_core::{Pin, Timing, TrafficLightPins};

// ============================================================================
// GPIO Konfiguration (Raspberry Pi 4 / BCM2711)
// ============================================================================

/// Gerätedatei für den physischen Speicher (braucht root)
pub const GPIO_DEVICE_PATH: &str = "/dev/mem";

/// Physische Basisadresse des GPIO-Blocks
pub const GPIO_BASE: u64 = 0xFE20_0000;

/// Größe des gemappten GPIO-Blocks in Bytes (eine Page)
pub const GPIO_BLOCK_SIZE: usize = 4096;

// ============================================================================
// LED Konfiguration
// ============================================================================

/// GPIO-Pin der roten LED
pub const RED_LED_PIN: Pin = Pin::new(10);

/// GPIO-Pin der gelben LED
pub const YELLOW_LED_PIN: Pin = Pin::new(11);

/// GPIO-Pin der grünen LED
pub const GREEN_LED_PIN: Pin = Pin::new(13);

pub const AMPEL_PINS: TrafficLightPins = TrafficLightPins {
    red: RED_LED_PIN,
    yellow: YELLOW_LED_PIN,
    green: GREEN_LED_PIN,
};

// ============================================================================
// Timing Konfiguration
// ============================================================================

/// Haltezeit für Rot und Grün
pub const LONG_HOLD: Duration = Duration::from_secs(3);

/// Haltezeit für Rot-Gelb
pub const RED_YELLOW_HOLD: Duration = Duration::from_millis(500);

/// Dauer einer An- bzw. Aus-Phase beim Gelb-Blinken
pub const BLINK_PHASE: Duration = Duration::from_millis(500);

/// Anzahl der An/Aus-Paare beim Gelb-Blinken
pub const BLINK_COUNT: u8 = 5;

pub const AMPEL_TIMING: Timing = Timing {
    long_hold: LONG_HOLD,
    short_hold: RED_YELLOW_HOLD,
    blink_phase: BLINK_PHASE,
    blink_count: BLINK_COUNT,
};

// ============================================================================
// Logging
// ============================================================================

/// Log-Filter, falls `RUST_LOG` nicht gesetzt ist
pub const DEFAULT_LOG_FILTER: &str = "info";
