// Copyright (c) 2026 Veca Project Authors
// Licensed under the MIT License

use rand_core::{CryptoRng, RngCore};
use veca_core::crypto;
use veca_core::types::DIGEST_LENGTH;

use crate::state::{PendingRegistration, RegistrationRequest, SmartCard, Vehicle};

/// Begins registration: draws the nonce r_1 and derives the password
/// verifier `PV_i = h(VID_i || VPW_i || r_1)`.
///
/// The request carries only the identifier and verifier; the returned
/// pending value holds what [`finalize_registration`] needs.
pub fn create_registration_request(
    vehicle: &Vehicle,
    rng: &mut (impl RngCore + CryptoRng),
) -> (RegistrationRequest, PendingRegistration) {
    let nonce = crypto::random_nonce(rng);
    let password_verifier = crypto::digest(&[
        vehicle.vehicle_id().as_bytes(),
        vehicle.password().as_bytes(),
        &nonce,
    ]);
    (
        RegistrationRequest {
            vehicle_id: *vehicle.vehicle_id(),
            password_verifier,
        },
        PendingRegistration {
            password_verifier,
            nonce,
        },
    )
}

/// Completes registration from the cloud server's masked secret MV_i,
/// producing the immutable smart card.
///
/// Unmasks `a_i = MV_i XOR PV_i` and seals the login verifier
/// `TV_i = h((VID_i XOR VPW_i) || a_i)` into the card together with MV_i
/// and r_1.
pub fn finalize_registration(
    vehicle: &Vehicle,
    pending: PendingRegistration,
    masked_secret: &[u8; DIGEST_LENGTH],
) -> SmartCard {
    let derived_secret = crypto::xor(masked_secret, &pending.password_verifier);
    let identity_mask = crypto::xor(
        vehicle.vehicle_id().as_bytes(),
        vehicle.password().as_bytes(),
    );
    let verifier = crypto::digest(&[&identity_mask, &derived_secret]);
    SmartCard {
        verifier,
        masked_secret: *masked_secret,
        nonce: pending.nonce,
    }
}
