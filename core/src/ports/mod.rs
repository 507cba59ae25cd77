//! Ports layer - Trait definitions (interfaces).
//!
//! This module defines the interfaces that the application layer uses
//! to interact with external systems. Implementations live next to the
//! systems they wrap (see [`crate::config::ConfigStore`]).

mod config;

pub use config::ConfigRepository;
