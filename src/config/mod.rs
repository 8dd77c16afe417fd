//! Project configuration (`.duressvault.toml`).

pub mod settings;

pub use settings::Settings;
