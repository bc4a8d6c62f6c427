// Copyright (c) 2026 Veca Project Authors
// Licensed under the MIT License

//! VECA fog node: relay and co-authenticator.
//!
//! Registers once with the cloud server to obtain a private scalar, a
//! pseudo-identity, and a shared secret, then bridges each handshake between
//! its vehicle-facing leg (M1 in, M4 out) and its server-facing leg (M2 out,
//! M3 in). Per-handshake scratch lives in an explicit [`FogState`] owned by
//! the caller, so one node can serve concurrent handshakes.

/// M2 and M4 generation.
mod authentication;
/// Node identity, obfuscated key storage, and message containers.
mod state;

pub use authentication::{generate_m2, generate_m4};
pub use state::{FogNode, FogPhase, FogState, M2Message, M4Message};
