// Copyright (c) 2026 Veca Project Authors
// Licensed under the MIT License

use rand_core::{CryptoRng, RngCore};
use veca_core::types::{FogEnrollment, FogId, VecaResult, VehicleId, DIGEST_LENGTH};
use veca_core::{crypto, curve};

use crate::state::{CloudServer, FogRecord, VehicleRecord};

/// Registers a vehicle under `vehicle_id` and returns the masked secret MV_i.
///
/// Derives `a_i = h(VID_i || PV_i || K_c)` and masks it with the password
/// verifier: `MV_i = a_i XOR PV_i`. Only the verifier reaches the server;
/// the password never does. Re-registration overwrites the previous record.
pub fn register_vehicle(
    server: &mut CloudServer,
    vehicle_id: VehicleId,
    password_verifier: &[u8; DIGEST_LENGTH],
) -> [u8; DIGEST_LENGTH] {
    let derived_secret = crypto::digest(&[
        vehicle_id.as_bytes(),
        password_verifier,
        server.master_secret(),
    ]);
    let masked_secret = crypto::xor(&derived_secret, password_verifier);

    server.vehicle_records.insert(
        vehicle_id,
        VehicleRecord {
            password_verifier: *password_verifier,
            derived_secret,
            cached_session_key: None,
        },
    );

    masked_secret
}

/// Registers a fog node and returns its provisioned secrets.
///
/// Draws a fresh nonce r_2 and derives the pseudo-identity
/// `PFD_j = h(FID_j || r_2)`, private scalar `b_j = h(PFD_j || K_c)`, public
/// key `B_j = b_j * G`, and shared secret `K_cf = h(pad20(FID_j) XOR K_c)`.
/// The returned [`FogEnrollment`] is the only transport of `b_j` and `K_cf`;
/// everything in it stays recomputable from the master secret (full escrow).
///
/// # Errors
///
/// Returns [`veca_core::types::VecaError::InvalidPoint`] if the derived
/// public key cannot be encoded (the scalar hashed to zero).
pub fn register_fog_node(
    server: &mut CloudServer,
    fog_id: FogId,
    rng: &mut (impl RngCore + CryptoRng),
) -> VecaResult<FogEnrollment> {
    let r2 = crypto::random_nonce(rng);
    let pseudo_identity = crypto::digest(&[fog_id.as_bytes(), &r2]);
    let private_scalar = crypto::digest(&[&pseudo_identity, server.master_secret()]);
    let public_key =
        curve::encode_point(&curve::mul_base(&curve::scalar_from_digest(&private_scalar)))?;
    let shared_secret = crypto::digest(&[&crypto::xor(
        &crypto::pad::<DIGEST_LENGTH>(fog_id.as_bytes()),
        server.master_secret(),
    )]);

    server.fog_records.insert(
        fog_id,
        FogRecord {
            pseudo_identity,
            private_scalar,
            shared_secret,
        },
    );

    Ok(FogEnrollment {
        pseudo_identity,
        private_scalar,
        shared_secret,
        public_key,
    })
}
