// Copyright (c) 2026 Veca Project Authors
// Licensed under the MIT License

//! VECA cloud server: registration authority and handshake validator.
//!
//! Holds the system master secret, registers vehicles and fog nodes, and
//! validates the middle leg of every handshake (M2 in, M3 out). By design
//! the master secret gives the server full key escrow: every fog node's
//! private scalar and shared secret is recomputable from its registry entry.

/// Vehicle and fog-node registration flows.
mod registration;
/// M2 validation and M3 emission.
mod authentication;
/// Server state, registry records, and message containers.
mod state;

pub use authentication::handle_m2;
pub use registration::{register_fog_node, register_vehicle};
pub use state::{CloudServer, FogRecord, M3Message, VehicleRecord};
