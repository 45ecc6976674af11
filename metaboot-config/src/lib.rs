//! Configuration values for metadata bootstrap sessions
//!
//! This crate supplies the flat key/value settings consulted while the
//! metadata model is being built. Settings are merged from several sources
//! using figment:
//!
//! - **Defaults**: in-code values (lowest precedence)
//! - **Files**: TOML, YAML or JSON, format chosen from the extension
//! - **Environment**: variables prefixed with `METABOOT_`
//! - **Overrides**: values applied in code, including arbitrary objects
//!
//! # Quick Start
//!
//! ```no_run
//! use metaboot_config::{keys, SettingsProvider};
//!
//! let settings = SettingsProvider::new()
//!     .with_file("metaboot.toml")
//!     .with_override(keys::SCANNER_DISCOVERY, "class,hbm")
//!     .load()?;
//!
//! if let Some(scanner) = settings.get_string(keys::SCANNER) {
//!     println!("Scanner: {}", scanner);
//! }
//! # Ok::<(), metaboot_config::ConfigError>(())
//! ```
//!
//! Nested tables and dotted keys are equivalent. This TOML file
//!
//! ```toml
//! [metaboot.archive]
//! autodetection = "class"
//! interpreter = "standard"
//! ```
//!
//! yields the settings `metaboot.archive.autodetection` and
//! `metaboot.archive.interpreter`.

/// Error types and handling
pub mod error;
/// Well-known setting keys
pub mod keys;
/// Layered settings provider
pub mod provider;
/// Flat settings store
pub mod settings;
/// Opaque setting values
pub mod value;

pub use error::{ConfigError, ConfigResult};
pub use provider::{ConfigFormat, SettingsProvider, ENV_PREFIX};
pub use settings::Settings;
pub use value::SettingValue;
