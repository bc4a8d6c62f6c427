// Copyright (c) 2026 Veca Project Authors
// Licensed under the MIT License

//! Core library for the VECA vehicular edge authentication protocol.
//!
//! Implements the primitive layer shared by all three protocol actors: a
//! truncated 160-bit one-way hash, fixed-width XOR masking, NIST P-256
//! scalar multiplication, timestamp freshness checks, and the fixed wire
//! layout of the four handshake messages M1 through M4.
//!
//! # Crate layout
//!
//! * [`types`] -- length constants, error types, identifier newtypes, and key containers.
//! * [`crypto`] -- hash, XOR, padding, randomness, and timestamp helpers.
//! * [`curve`] -- P-256 scalar and point operations with SEC1 encoding.
//! * [`protocol`] -- wire-format serialization and parsing for M1 through M4.

/// Hash, XOR, padding, randomness, and timestamp helpers.
pub mod crypto;
/// P-256 scalar and point operations.
pub mod curve;
/// Wire-format serialization and parsing for protocol messages.
pub mod protocol;
/// Shared constants, error types, and key containers.
pub mod types;
