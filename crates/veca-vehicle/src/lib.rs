// Copyright (c) 2026 Veca Project Authors
// Licensed under the MIT License

//! VECA vehicle: handshake initiator.
//!
//! A vehicle registers once with the cloud server over a secure channel and
//! receives a smart card. Afterwards it can authenticate to any enrolled fog
//! node with the four-message handshake: it sends M1, waits for M4, and on
//! success holds the session key. Per-handshake scratch lives in an explicit
//! [`VehicleState`] owned by the caller.

/// Login verification, M1 generation, and session key establishment.
mod authentication;
/// Registration request and smart card issuance.
mod registration;
/// Vehicle identity, smart card, and message containers.
mod state;

pub use authentication::{establish_session_key, generate_m1, verify_login};
pub use registration::{create_registration_request, finalize_registration};
pub use state::{
    M1Message, PendingRegistration, RegistrationRequest, SmartCard, Vehicle, VehiclePhase,
    VehicleState,
};
