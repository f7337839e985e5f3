//! Kernel utilities shared across slices.
//! Keep this crate lightweight; it re-exports the domain models and loads configuration.
//!
//! ## Config loading
//! ```rust,no_run
//! use rosetta_kernel::config::load_config;
//! use rosetta_kernel::domain::config::AppConfig;
//!
//! let cfg: AppConfig = load_config::<AppConfig>(Some("rosetta.toml")).unwrap();
//! println!("{:?}", cfg.translator.cache_dir);
//! ```
pub mod config;

pub use rosetta_domain as domain;
