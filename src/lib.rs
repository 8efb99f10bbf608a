//! Per-channel power spectra drawn on a topographic sensor layout.
pub mod config;
pub mod drivers;
pub mod gui;
pub mod types;
