//! Configuration loading.
//!
//! bfclient reads a single user-wide TOML file; see [`GlobalConfig`].

mod global;

pub use global::GlobalConfig;
