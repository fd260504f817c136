// Ampel-Steuerung: Raspberry Pi 4, LEDs an GPIO10 (rot), GPIO11 (gelb), GPIO13 (grün)
//
// Läuft bis SIGINT/SIGTERM. Exit-Codes: 0 = beendet, 1 = /dev/mem nicht
// geöffnet, 2 = Mapping fehlgeschlagen.

use std::process::ExitCode;

use log::{error, info, warn};

use ampel_steuerung::config::DEFAULT_LOG_FILTER;
use ampel_steuerung::hal::{RegisterWindow, install_stop_handler, stop_requested};
use ampel_steuerung::tasks::ampel_task;

fn main() -> ExitCode {
    // Logger initialisieren (stderr, RUST_LOG überschreibt den Default)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER))
        .init();

    info!("Getting gpio");
    let window = match RegisterWindow::open() {
        Ok(window) => window,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(e.exit_code());
        }
    };

    // Ohne Handler läuft die Ampel trotzdem, dann räumt der Kernel beim Kill auf
    if let Err(e) = install_stop_handler() {
        warn!("Unable to install stop handler: {}", e);
    }

    let window = ampel_task(window, || !stop_requested());

    // Drop: munmap() + close()
    drop(window);
    info!("Released gpio");
    ExitCode::SUCCESS
}
