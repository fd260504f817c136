// Hardware Abstraction Layer (HAL) Module
//
// Dieses Modul kapselt die Zugriffe auf Linux (/dev/mem, Signale, sleep)
// hinter den Traits aus ampel-core.

pub mod delay;
pub mod register_window;
pub mod signal;

pub use delay::ThreadDelay;
pub use register_window::{RegisterWindow, WindowError};
pub use signal::{install_stop_handler, stop_requested};
