//! devport Core Library
//!
//! Declarative port forwarding rules for a development config.
//! Provides functionality to:
//! - Parse `key=value` label selectors and `local:remote` port mappings
//! - Merge new port mappings into the rule with the same selector
//! - Remove port mappings by port number
//! - Load and save the config as JSON
//!
//! # Architecture
//! This library follows hexagonal architecture (ports & adapters):
//! - `domain`: Pure business logic and data models
//! - `ports`: Trait definitions (interfaces)
//! - `application`: Use case services
//! - `config`: Config model and the file-backed store

// Hexagonal architecture layers
pub mod application;
pub mod domain;
pub mod ports;

pub mod config;
pub mod error;

// Re-export domain types (primary API)
pub use domain::{
    parse_port_mappings, parse_selectors, ForwardTarget, ForwardingRule, LabelSelector,
    PortMapping,
};

// Re-export other commonly used types
pub use application::{AddPortRequest, PortForwardEntry, PortForwardService, RemovePortRequest};
pub use config::{Config, ConfigStore};
pub use error::{Error, ParseError, Result};
pub use ports::ConfigRepository;
