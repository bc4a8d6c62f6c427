// Copyright (c) 2026 Veca Project Authors
// Licensed under the MIT License

use std::collections::HashMap;

use rand_core::{CryptoRng, RngCore};
use veca_core::crypto;
use veca_core::types::{
    FogId, SessionKey, VehicleId, DIGEST_LENGTH, MASTER_SECRET_LENGTH, TIMESTAMP_LENGTH,
};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Registry entry for a vehicle, keyed by its identifier.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct VehicleRecord {
    /// Password verifier PV_i presented at registration.
    pub password_verifier: [u8; DIGEST_LENGTH],
    /// Derived secret a_i = h(VID_i || PV_i || K_c).
    pub derived_secret: [u8; DIGEST_LENGTH],
    /// Session key cached during `handle_m2`. Advisory only: the binding is
    /// unauthenticated and may attach to the wrong record under collision.
    pub cached_session_key: Option<SessionKey>,
}

/// Registry entry for a fog node, keyed by its identifier.
///
/// Every field is recomputable from the master secret, so the cloud server
/// holds full escrow over each node's key material.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct FogRecord {
    /// Pseudo-identity PFD_j = h(FID_j || r_2).
    pub pseudo_identity: [u8; DIGEST_LENGTH],
    /// Private scalar b_j = h(PFD_j || K_c), as digest bytes.
    pub private_scalar: [u8; DIGEST_LENGTH],
    /// Shared secret K_cf = h(pad20(FID_j) XOR K_c).
    pub shared_secret: [u8; DIGEST_LENGTH],
}

/// Message M3 (cloud server to fog node).
pub struct M3Message {
    /// Masked nonce L_i.
    pub masked_nonce: [u8; DIGEST_LENGTH],
    /// Key confirmation Z_i.
    pub key_confirmation: [u8; DIGEST_LENGTH],
    /// Timestamp T_3.
    pub timestamp: [u8; TIMESTAMP_LENGTH],
}

impl M3Message {
    pub fn new() -> Self {
        Self {
            masked_nonce: [0u8; DIGEST_LENGTH],
            key_confirmation: [0u8; DIGEST_LENGTH],
            timestamp: [0u8; TIMESTAMP_LENGTH],
        }
    }
}

impl Default for M3Message {
    fn default() -> Self {
        Self::new()
    }
}

/// The cloud server: owner of the master secret and both registries.
///
/// Registry mutation goes through `&mut self`; callers running concurrent
/// handshakes serialize access with a lock per operation.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct CloudServer {
    master_secret: [u8; MASTER_SECRET_LENGTH],
    #[zeroize(skip)]
    pub(crate) vehicle_records: HashMap<VehicleId, VehicleRecord>,
    #[zeroize(skip)]
    pub(crate) fog_records: HashMap<FogId, FogRecord>,
}

impl CloudServer {
    /// Creates a server holding the given master secret K_c.
    pub fn new(master_secret: [u8; MASTER_SECRET_LENGTH]) -> Self {
        Self {
            master_secret,
            vehicle_records: HashMap::new(),
            fog_records: HashMap::new(),
        }
    }

    /// Creates a server with a freshly generated master secret.
    pub fn generate(rng: &mut (impl RngCore + CryptoRng)) -> Self {
        let mut master_secret = [0u8; MASTER_SECRET_LENGTH];
        crypto::random_bytes(rng, &mut master_secret);
        Self::new(master_secret)
    }

    pub(crate) fn master_secret(&self) -> &[u8; MASTER_SECRET_LENGTH] {
        &self.master_secret
    }

    /// Returns the registry entry for a fog node, if registered.
    pub fn fog_record(&self, fog_id: &FogId) -> Option<&FogRecord> {
        self.fog_records.get(fog_id)
    }

    /// Returns `true` if the vehicle identifier is registered.
    pub fn vehicle_registered(&self, vehicle_id: &VehicleId) -> bool {
        self.vehicle_records.contains_key(vehicle_id)
    }

    /// Returns the session key cached against a vehicle record, if any.
    ///
    /// Observability data only: the cache is written on an unauthenticated
    /// identity recovered during `handle_m2` and must never drive an
    /// authorization decision.
    pub fn cached_session_key(&self, vehicle_id: &VehicleId) -> Option<&SessionKey> {
        self.vehicle_records
            .get(vehicle_id)
            .and_then(|record| record.cached_session_key.as_ref())
    }
}
