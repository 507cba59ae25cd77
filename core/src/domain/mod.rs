//! Domain layer - Pure business logic and data models.
//!
//! This module contains the selector and port-mapping grammars and the
//! rule merge/removal logic. These types have no I/O dependencies and can be
//! tested in isolation.

mod mapping;
mod rule;
mod selector;

// Re-export all domain types
pub use mapping::{parse_port_mappings, PortMapping};
pub use rule::{insert_or_merge, remove_mappings, ForwardTarget, ForwardingRule, ForwardingRuleJson};
pub use selector::{parse_selectors, LabelSelector};
