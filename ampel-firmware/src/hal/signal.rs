// Termination-Handler für SIGINT und SIGTERM
//
// Der Handler setzt nur ein statisches Flag (async-signal-safe). Die
// Hauptschleife prüft das Flag vor jeder Phase und kehrt dann zurück, sodass
// `RegisterWindow` ganz normal gedroppt wird (munmap + close).

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;

static STOP_REQUESTED: AtomicBool = AtomicBool::new(false);

extern "C" fn on_terminate(_signal: libc::c_int) {
    STOP_REQUESTED.store(true, Ordering::SeqCst);
}

/// Installiert den Handler für SIGINT und SIGTERM
pub fn install_stop_handler() -> io::Result<()> {
    for signal in [libc::SIGINT, libc::SIGTERM] {
        // SAFETY: sigaction-Struktur wird vollständig initialisiert, der
        // Handler greift nur auf ein Atomic zu
        let rc = unsafe {
            let mut action: libc::sigaction = std::mem::zeroed();
            action.sa_sigaction = on_terminate as extern "C" fn(libc::c_int) as libc::sighandler_t;
            libc::sigemptyset(&mut action.sa_mask);
            libc::sigaction(signal, &action, std::ptr::null_mut())
        };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }
        debug!("Installed stop handler for signal {}", signal);
    }
    Ok(())
}

/// Wurde SIGINT oder SIGTERM empfangen?
pub fn stop_requested() -> bool {
    STOP_REQUESTED.load(Ordering::SeqCst)
}
