// Copyright (c) 2026 Veca Project Authors
// Licensed under the MIT License

use core::fmt;
use subtle::ConstantTimeEq;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of the truncated one-way hash output in bytes (160 bits).
pub const DIGEST_LENGTH: usize = 20;
/// Length of a vehicle, password, or fog-node identifier in bytes.
pub const ID_LENGTH: usize = 8;
/// Length of a random nonce in bytes.
pub const NONCE_LENGTH: usize = 20;
/// Length of a big-endian seconds-since-epoch timestamp in bytes.
pub const TIMESTAMP_LENGTH: usize = 4;
/// Length of a SEC1 compressed P-256 point encoding in bytes.
pub const POINT_LENGTH: usize = 33;
/// Length of the cloud server master secret in bytes.
pub const MASTER_SECRET_LENGTH: usize = DIGEST_LENGTH;
/// Length of a derived session key in bytes.
pub const SESSION_KEY_LENGTH: usize = DIGEST_LENGTH;
/// Maximum tolerated clock skew between message emission and verification, in seconds.
pub const FRESHNESS_WINDOW_SECS: u64 = 10;

/// Length of message M1 (vehicle to fog node) in bytes.
pub const M1_LENGTH: usize = ID_LENGTH + POINT_LENGTH + NONCE_LENGTH + TIMESTAMP_LENGTH;
/// Length of message M2 (fog node to cloud server) in bytes.
pub const M2_LENGTH: usize = 4 * DIGEST_LENGTH + TIMESTAMP_LENGTH;
/// Length of message M3 (cloud server to fog node) in bytes.
pub const M3_LENGTH: usize = 2 * DIGEST_LENGTH + TIMESTAMP_LENGTH;
/// Length of message M4 (fog node to vehicle) in bytes.
pub const M4_LENGTH: usize = 2 * DIGEST_LENGTH + TIMESTAMP_LENGTH;

const _: () = assert!(DIGEST_LENGTH == NONCE_LENGTH);
const _: () = assert!(SESSION_KEY_LENGTH == DIGEST_LENGTH);
const _: () = assert!(ID_LENGTH < DIGEST_LENGTH);
const _: () = assert!(M1_LENGTH == 65);
const _: () = assert!(M2_LENGTH == 84);
const _: () = assert!(M3_LENGTH == 44);
const _: () = assert!(M4_LENGTH == 44);

/// Enumerates all error conditions that can arise during VECA protocol operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VecaError {
    /// XOR or truncation invoked on operands of mismatched length.
    #[error("operands have mismatched lengths")]
    LengthMismatch,
    /// A timestamp is outside the tolerated freshness window.
    #[error("timestamp is outside the freshness window")]
    Freshness,
    /// A computed verifier does not match the one presented.
    #[error("verifier mismatch, peer not authenticated")]
    Authentication,
    /// The referenced fog-node identifier is absent from the registry.
    #[error("fog node is not registered")]
    UnknownFogNode,
    /// The referenced vehicle identifier is absent from the registry.
    ///
    /// Reserved for callers that query the vehicle registry directly. The
    /// handshake itself never returns it: `handle_m2` treats an unmatched
    /// vehicle identity as a cache miss, not an error.
    #[error("vehicle is not registered")]
    UnknownVehicle,
    /// A byte string is not a valid non-identity curve point.
    #[error("invalid curve point encoding")]
    InvalidPoint,
    /// A protocol message has an unexpected length or field layout.
    #[error("protocol message has invalid format or length")]
    InvalidMessage,
    /// The operation does not match the current handshake phase.
    #[error("operation does not match the handshake phase")]
    InvalidState,
}

/// Convenience alias for `Result<T, VecaError>`.
pub type VecaResult<T> = Result<T, VecaError>;

fn pad_identifier(raw: &[u8]) -> [u8; ID_LENGTH] {
    let mut out = [0u8; ID_LENGTH];
    let n = raw.len().min(ID_LENGTH);
    out[..n].copy_from_slice(&raw[..n]);
    out
}

/// A vehicle identifier, normalized to exactly [`ID_LENGTH`] bytes.
///
/// Text or raw-byte input is zero-padded or truncated once at construction;
/// all protocol arithmetic then operates on the fixed-width form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VehicleId([u8; ID_LENGTH]);

impl VehicleId {
    /// Normalizes `raw` to a fixed-width vehicle identifier.
    pub fn new(raw: &[u8]) -> Self {
        Self(pad_identifier(raw))
    }

    /// Returns the fixed-width identifier bytes.
    pub fn as_bytes(&self) -> &[u8; ID_LENGTH] {
        &self.0
    }
}

impl From<&str> for VehicleId {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes())
    }
}

/// A fog-node identifier, normalized to exactly [`ID_LENGTH`] bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FogId([u8; ID_LENGTH]);

impl FogId {
    /// Normalizes `raw` to a fixed-width fog-node identifier.
    pub fn new(raw: &[u8]) -> Self {
        Self(pad_identifier(raw))
    }

    /// Returns the fixed-width identifier bytes.
    pub fn as_bytes(&self) -> &[u8; ID_LENGTH] {
        &self.0
    }
}

impl From<&str> for FogId {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes())
    }
}

/// A vehicle password, normalized to exactly [`ID_LENGTH`] bytes.
///
/// Zeroized on drop; the `Debug` implementation redacts the contents.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Password([u8; ID_LENGTH]);

impl Password {
    /// Normalizes `raw` to a fixed-width password.
    pub fn new(raw: &[u8]) -> Self {
        Self(pad_identifier(raw))
    }

    /// Returns the fixed-width password bytes.
    pub fn as_bytes(&self) -> &[u8; ID_LENGTH] {
        &self.0
    }
}

impl From<&str> for Password {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes())
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Password([REDACTED])")
    }
}

/// A symmetric session key derived independently by two handshake parties.
///
/// Zeroized on drop; equality is evaluated in constant time and the `Debug`
/// implementation redacts the contents.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SessionKey([u8; SESSION_KEY_LENGTH]);

impl SessionKey {
    /// Wraps raw key bytes.
    pub fn from_bytes(bytes: [u8; SESSION_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Returns the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; SESSION_KEY_LENGTH] {
        &self.0
    }
}

impl PartialEq for SessionKey {
    fn eq(&self, other: &Self) -> bool {
        constant_time_eq(&self.0, &other.0)
    }
}

impl Eq for SessionKey {}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionKey([REDACTED; {}])", SESSION_KEY_LENGTH)
    }
}

/// Secrets provisioned to a fog node at registration.
///
/// The only transport of `private_scalar` and `shared_secret`: the cloud
/// server returns this bundle to the registering node, which masks the
/// contents for at-rest storage. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct FogEnrollment {
    /// Pseudo-identity PFD_j.
    pub pseudo_identity: [u8; DIGEST_LENGTH],
    /// Private scalar b_j, as the digest it is derived from.
    pub private_scalar: [u8; DIGEST_LENGTH],
    /// Secret K_cf shared with the cloud server.
    pub shared_secret: [u8; DIGEST_LENGTH],
    /// Public key B_j = b_j * G, SEC1 compressed.
    #[zeroize(skip)]
    pub public_key: [u8; POINT_LENGTH],
}

/// Compares two byte slices in constant time.
///
/// Returns `true` if the slices are equal. If the lengths differ, returns
/// `false` immediately (length itself is not secret).
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
