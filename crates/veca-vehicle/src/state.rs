// Copyright (c) 2026 Veca Project Authors
// Licensed under the MIT License

use veca_core::types::{
    Password, VehicleId, DIGEST_LENGTH, ID_LENGTH, NONCE_LENGTH, POINT_LENGTH, TIMESTAMP_LENGTH,
};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A vehicle's long-term identity and password.
pub struct Vehicle {
    vehicle_id: VehicleId,
    password: Password,
}

impl Vehicle {
    /// Creates a vehicle; identifier and password are normalized to their
    /// fixed widths at construction.
    pub fn new(vehicle_id: impl Into<VehicleId>, password: impl Into<Password>) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            password: password.into(),
        }
    }

    /// Returns the vehicle identifier.
    pub fn vehicle_id(&self) -> &VehicleId {
        &self.vehicle_id
    }

    pub(crate) fn password(&self) -> &Password {
        &self.password
    }
}

/// Registration request sent to the cloud server: the identifier plus the
/// password verifier `PV_i = h(VID_i || VPW_i || r_1)`. The password itself
/// never leaves the vehicle.
pub struct RegistrationRequest {
    pub vehicle_id: VehicleId,
    pub password_verifier: [u8; DIGEST_LENGTH],
}

/// Vehicle-side scratch held between issuing the registration request and
/// receiving the masked secret. Zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PendingRegistration {
    pub(crate) password_verifier: [u8; DIGEST_LENGTH],
    pub(crate) nonce: [u8; NONCE_LENGTH],
}

/// The card-like secret bundle provisioned at registration.
///
/// `{TV_i, MV_i, r_1}`: login verifier, masked secret, and registration
/// nonce. Immutable after creation, zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SmartCard {
    /// Login verifier TV_i = h((VID_i XOR VPW_i) || a_i).
    pub verifier: [u8; DIGEST_LENGTH],
    /// Masked secret MV_i = a_i XOR PV_i.
    pub masked_secret: [u8; DIGEST_LENGTH],
    /// Registration nonce r_1.
    pub nonce: [u8; NONCE_LENGTH],
}

/// Phases of one vehicle-side handshake. Rejection is terminal: a failed
/// handshake restarts from a fresh state with fresh randomness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehiclePhase {
    Created,
    M1Generated,
    Established,
    Rejected,
}

/// Per-handshake vehicle scratch, valid between M1 emission and M4 receipt.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct VehicleState {
    #[zeroize(skip)]
    pub phase: VehiclePhase,
    /// Masked identity RID_i as sent in M1.
    pub pseudo_identity: [u8; ID_LENGTH],
    /// Ephemeral nonce r'_3.
    pub nonce: [u8; NONCE_LENGTH],
    /// First twenty bytes of the x-coordinate of Q_i = r_3 * B_j.
    pub shared_x_prefix: [u8; DIGEST_LENGTH],
}

impl VehicleState {
    pub fn new() -> Self {
        Self {
            phase: VehiclePhase::Created,
            pseudo_identity: [0u8; ID_LENGTH],
            nonce: [0u8; NONCE_LENGTH],
            shared_x_prefix: [0u8; DIGEST_LENGTH],
        }
    }
}

impl Default for VehicleState {
    fn default() -> Self {
        Self::new()
    }
}

/// Message M1 (vehicle to fog node).
pub struct M1Message {
    /// Masked vehicle identity RID_i.
    pub masked_identity: [u8; ID_LENGTH],
    /// Ephemeral point P_i = r_3 * G, SEC1 compressed.
    pub ephemeral_point: [u8; POINT_LENGTH],
    /// Masked nonce F_i.
    pub masked_nonce: [u8; NONCE_LENGTH],
    /// Timestamp T_1.
    pub timestamp: [u8; TIMESTAMP_LENGTH],
}

impl M1Message {
    pub fn new() -> Self {
        Self {
            masked_identity: [0u8; ID_LENGTH],
            ephemeral_point: [0u8; POINT_LENGTH],
            masked_nonce: [0u8; NONCE_LENGTH],
            timestamp: [0u8; TIMESTAMP_LENGTH],
        }
    }
}

impl Default for M1Message {
    fn default() -> Self {
        Self::new()
    }
}
