// Blockierende Wartezeit über den Betriebssystem-Scheduler

use std::time::Duration;

use ampel_core::Delay;

/// Delay-Implementierung mit `std::thread::sleep`
///
/// Blockiert den aufrufenden Thread ohne Busy-Waiting. Ein Signal bricht die
/// Wartezeit nicht ab, `sleep` schläft nach `EINTR` die Restzeit weiter.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadDelay;

impl Delay for ThreadDelay {
    fn delay(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
