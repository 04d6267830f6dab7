//! Project configuration (`.gitvault.toml`).

pub mod settings;

pub use settings::Settings;
