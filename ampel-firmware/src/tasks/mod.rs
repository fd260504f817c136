// Task-Modul: Enthält die Ampel-Steuerschleife
//
// Es gibt genau einen Task, er läuft synchron im Hauptthread.

pub mod ampel;

// Re-export Task für einfachen Import
pub use ampel::ampel_task;
