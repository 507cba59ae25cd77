//! Application layer - Use case services.
//!
//! This module contains application services that orchestrate
//! domain logic and repository interactions.
//!
//! Services are designed to be thin orchestrators that:
//! - Accept a borrowed config and plain request values as inputs
//! - Use ports (traits) for persistence
//! - Leave parsing and rule logic to the domain layer

mod port_forward_service;

pub use port_forward_service::{
    AddPortRequest, PortForwardEntry, PortForwardService, RemovePortRequest,
};
