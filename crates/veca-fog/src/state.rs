// Copyright (c) 2026 Veca Project Authors
// Licensed under the MIT License

use veca_core::crypto;
use veca_core::types::{
    FogEnrollment, FogId, DIGEST_LENGTH, ID_LENGTH, NONCE_LENGTH, POINT_LENGTH, TIMESTAMP_LENGTH,
};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A registered fog node.
///
/// The provisioned secrets are obfuscated at rest (`Rb_j = b_j XOR
/// h(FID_j || K_cf)`, `RK_cf = K_cf XOR pad20(FID_j)`) and recovered at the
/// start of each protocol step that needs them. The unmasking key is
/// derivable from data the node already holds, so this is a round-trip
/// transform rather than a confidentiality boundary.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct FogNode {
    #[zeroize(skip)]
    fog_id: FogId,
    pseudo_identity: [u8; DIGEST_LENGTH],
    masked_scalar: [u8; DIGEST_LENGTH],
    masked_shared: [u8; DIGEST_LENGTH],
    #[zeroize(skip)]
    public_key: [u8; POINT_LENGTH],
}

impl FogNode {
    /// Builds a fog node from the enrollment bundle returned by the cloud
    /// server, masking the secrets for at-rest storage.
    pub fn enroll(fog_id: FogId, enrollment: &FogEnrollment) -> Self {
        let masked_shared = crypto::xor(
            &enrollment.shared_secret,
            &crypto::pad::<DIGEST_LENGTH>(fog_id.as_bytes()),
        );
        let masked_scalar = crypto::xor(
            &enrollment.private_scalar,
            &crypto::digest(&[fog_id.as_bytes(), &enrollment.shared_secret]),
        );
        Self {
            fog_id,
            pseudo_identity: enrollment.pseudo_identity,
            masked_scalar,
            masked_shared,
            public_key: enrollment.public_key,
        }
    }

    /// Returns the node's identifier.
    pub fn fog_id(&self) -> &FogId {
        &self.fog_id
    }

    /// Returns the pseudo-identity PFD_j.
    pub fn pseudo_identity(&self) -> &[u8; DIGEST_LENGTH] {
        &self.pseudo_identity
    }

    /// Returns the public key B_j, SEC1 compressed.
    pub fn public_key(&self) -> &[u8; POINT_LENGTH] {
        &self.public_key
    }

    /// Recovers `(K_cf, b_j)` from the obfuscated storage.
    pub(crate) fn recover_secrets(&self) -> ([u8; DIGEST_LENGTH], [u8; DIGEST_LENGTH]) {
        let shared_secret = crypto::xor(
            &self.masked_shared,
            &crypto::pad::<DIGEST_LENGTH>(self.fog_id.as_bytes()),
        );
        let private_scalar = crypto::xor(
            &self.masked_scalar,
            &crypto::digest(&[self.fog_id.as_bytes(), &shared_secret]),
        );
        (shared_secret, private_scalar)
    }
}

/// Phases of one fog-side handshake. Rejection is terminal: a failed
/// handshake restarts from a fresh state with fresh randomness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FogPhase {
    Created,
    M2Generated,
    Established,
    Rejected,
}

/// Per-handshake fog scratch, valid between M1 receipt and M4 emission.
///
/// One value per concurrent handshake; the transport keys them by its own
/// session identifier.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct FogState {
    #[zeroize(skip)]
    pub phase: FogPhase,
    /// Session nonce r_4.
    pub nonce: [u8; NONCE_LENGTH],
    /// Masked vehicle identity R_i.
    pub masked_vehicle_id: [u8; ID_LENGTH],
    /// First twenty bytes of the x-coordinate of Q_i.
    pub shared_x_prefix: [u8; DIGEST_LENGTH],
    /// Vehicle pseudo-identity RID_i as received in M1.
    pub vehicle_pseudo_identity: [u8; ID_LENGTH],
    /// Recovered vehicle nonce r'_3.
    pub vehicle_nonce: [u8; NONCE_LENGTH],
}

impl FogState {
    pub fn new() -> Self {
        Self {
            phase: FogPhase::Created,
            nonce: [0u8; NONCE_LENGTH],
            masked_vehicle_id: [0u8; ID_LENGTH],
            shared_x_prefix: [0u8; DIGEST_LENGTH],
            vehicle_pseudo_identity: [0u8; ID_LENGTH],
            vehicle_nonce: [0u8; NONCE_LENGTH],
        }
    }
}

impl Default for FogState {
    fn default() -> Self {
        Self::new()
    }
}

/// Message M2 (fog node to cloud server).
pub struct M2Message {
    /// Masked nonce W_i.
    pub masked_nonce: [u8; DIGEST_LENGTH],
    /// Masked pseudo-identity X_i.
    pub masked_pseudo_identity: [u8; DIGEST_LENGTH],
    /// Masked vehicle identity Y_i.
    pub masked_identity: [u8; DIGEST_LENGTH],
    /// Binding checksum D.
    pub checksum: [u8; DIGEST_LENGTH],
    /// Timestamp T_2.
    pub timestamp: [u8; TIMESTAMP_LENGTH],
}

impl M2Message {
    pub fn new() -> Self {
        Self {
            masked_nonce: [0u8; DIGEST_LENGTH],
            masked_pseudo_identity: [0u8; DIGEST_LENGTH],
            masked_identity: [0u8; DIGEST_LENGTH],
            checksum: [0u8; DIGEST_LENGTH],
            timestamp: [0u8; TIMESTAMP_LENGTH],
        }
    }
}

impl Default for M2Message {
    fn default() -> Self {
        Self::new()
    }
}

/// Message M4 (fog node to vehicle).
pub struct M4Message {
    /// Masked session key N_i.
    pub masked_session_key: [u8; DIGEST_LENGTH],
    /// Verifier J_i.
    pub verifier: [u8; DIGEST_LENGTH],
    /// Timestamp T_4.
    pub timestamp: [u8; TIMESTAMP_LENGTH],
}

impl M4Message {
    pub fn new() -> Self {
        Self {
            masked_session_key: [0u8; DIGEST_LENGTH],
            verifier: [0u8; DIGEST_LENGTH],
            timestamp: [0u8; TIMESTAMP_LENGTH],
        }
    }
}

impl Default for M4Message {
    fn default() -> Self {
        Self::new()
    }
}
