// Copyright (c) 2026 Veca Project Authors
// Licensed under the MIT License

use rand_core::{CryptoRng, RngCore};
use veca_core::types::{
    constant_time_eq, FogId, Password, SessionKey, VecaError, VecaResult, VehicleId,
    DIGEST_LENGTH, ID_LENGTH, TIMESTAMP_LENGTH,
};
use veca_core::{crypto, curve, protocol};

use crate::state::{M1Message, SmartCard, Vehicle, VehiclePhase, VehicleState};

/// Verifies presented credentials against the smart card and returns a_i.
///
/// Recomputes `PV_i*`, unmasks `a_i* = MV_i XOR PV_i*`, recomputes `TV_i*`,
/// and compares it in constant time against the card's verifier. The check
/// uses only card-local data; no other party participates, and the returned
/// secret feeds into nothing downstream.
///
/// # Errors
///
/// Returns [`VecaError::Authentication`] if the verifier does not match.
pub fn verify_login(
    card: &SmartCard,
    vehicle_id: &VehicleId,
    password: &Password,
) -> VecaResult<[u8; DIGEST_LENGTH]> {
    let password_verifier = crypto::digest(&[
        vehicle_id.as_bytes(),
        password.as_bytes(),
        &card.nonce,
    ]);
    let derived_secret = crypto::xor(&card.masked_secret, &password_verifier);
    let verifier = crypto::digest(&[
        &crypto::xor(vehicle_id.as_bytes(), password.as_bytes()),
        &derived_secret,
    ]);
    if !constant_time_eq(&verifier, &card.verifier) {
        return Err(VecaError::Authentication);
    }
    Ok(derived_secret)
}

/// Initiates a handshake toward the fog node `fog_id`, producing M1.
///
/// Draws the ephemeral scalar r_3 and nonce r'_3, computes `P_i = r_3 * G`
/// and `Q_i = r_3 * B_j`, and masks the vehicle identity and nonce under the
/// x-coordinate of Q_i. The scratch [`establish_session_key`] needs is
/// retained in `state`.
///
/// # Errors
///
/// Returns [`VecaError::InvalidState`] unless `state` is fresh and
/// [`VecaError::InvalidPoint`] if `fog_public_key` does not decode. Any
/// failure moves `state` to [`VehiclePhase::Rejected`].
pub fn generate_m1(
    vehicle: &Vehicle,
    fog_id: &FogId,
    fog_public_key: &[u8],
    now: u64,
    rng: &mut (impl RngCore + CryptoRng),
    m1: &mut M1Message,
    state: &mut VehicleState,
) -> VecaResult<()> {
    if state.phase != VehiclePhase::Created {
        return Err(VecaError::InvalidState);
    }
    match m1_inner(vehicle, fog_id, fog_public_key, now, rng, m1, state) {
        Ok(()) => {
            state.phase = VehiclePhase::M1Generated;
            Ok(())
        }
        Err(err) => {
            state.phase = VehiclePhase::Rejected;
            Err(err)
        }
    }
}

fn m1_inner(
    vehicle: &Vehicle,
    fog_id: &FogId,
    fog_public_key: &[u8],
    now: u64,
    rng: &mut (impl RngCore + CryptoRng),
    m1: &mut M1Message,
    state: &mut VehicleState,
) -> VecaResult<()> {
    let fog_point = curve::decode_point(fog_public_key)?;

    let ephemeral_scalar = curve::random_scalar(rng);
    let ephemeral_nonce = crypto::random_nonce(rng);

    let ephemeral_point = curve::mul_base(&ephemeral_scalar);
    let shared_point = curve::mul_point(&ephemeral_scalar, &fog_point);
    let x_prefix = curve::x_prefix::<DIGEST_LENGTH>(&shared_point)?;
    let mut x_prefix_short = [0u8; ID_LENGTH];
    x_prefix_short.copy_from_slice(&x_prefix[..ID_LENGTH]);

    m1.masked_identity = crypto::xor(
        vehicle.vehicle_id().as_bytes(),
        &crypto::xor(&x_prefix_short, fog_id.as_bytes()),
    );
    m1.ephemeral_point = curve::encode_point(&ephemeral_point)?;
    m1.masked_nonce = crypto::xor(&ephemeral_nonce, &x_prefix);
    m1.timestamp = crypto::encode_timestamp(now);

    state.pseudo_identity = m1.masked_identity;
    state.nonce = ephemeral_nonce;
    state.shared_x_prefix = x_prefix;

    Ok(())
}

/// Processes message M4 from the fog node and establishes the session key.
///
/// Recomputes the verifier `J_i*` from the retained scratch and compares it
/// in constant time; on a match the session key is unmasked from N_i and
/// committed.
///
/// # Errors
///
/// Returns [`VecaError::InvalidState`] unless `state` holds an M1-generated
/// handshake, [`VecaError::Freshness`] if T_4 is stale relative to `now`,
/// and [`VecaError::Authentication`] on verifier mismatch. Any failure moves
/// `state` to [`VehiclePhase::Rejected`].
pub fn establish_session_key(
    vehicle: &Vehicle,
    fog_id: &FogId,
    m4_data: &[u8],
    now: u64,
    state: &mut VehicleState,
) -> VecaResult<SessionKey> {
    if state.phase != VehiclePhase::M1Generated {
        return Err(VecaError::InvalidState);
    }
    match session_key_inner(vehicle, fog_id, m4_data, now, state) {
        Ok(session_key) => {
            state.phase = VehiclePhase::Established;
            Ok(session_key)
        }
        Err(err) => {
            state.phase = VehiclePhase::Rejected;
            Err(err)
        }
    }
}

fn session_key_inner(
    vehicle: &Vehicle,
    fog_id: &FogId,
    m4_data: &[u8],
    now: u64,
    state: &mut VehicleState,
) -> VecaResult<SessionKey> {
    let m4 = protocol::parse_m4(m4_data)?;

    let t4: &[u8; TIMESTAMP_LENGTH] = m4
        .timestamp
        .try_into()
        .map_err(|_| VecaError::InvalidMessage)?;
    crypto::check_freshness(t4, now)?;

    let expected_verifier = crypto::digest(&[
        &state.pseudo_identity,
        &crypto::xor(&state.nonce, &state.shared_x_prefix),
    ]);
    if !constant_time_eq(&expected_verifier, m4.verifier) {
        return Err(VecaError::Authentication);
    }

    let masked_session_key: &[u8; DIGEST_LENGTH] = m4
        .masked_session_key
        .try_into()
        .map_err(|_| VecaError::InvalidMessage)?;
    let padded_fog_id = crypto::pad::<DIGEST_LENGTH>(fog_id.as_bytes());
    let identity_mask = crypto::xor(vehicle.vehicle_id().as_bytes(), fog_id.as_bytes());
    let session_key = crypto::xor(
        masked_session_key,
        &crypto::digest(&[
            &crypto::xor(&padded_fog_id, &state.shared_x_prefix),
            &identity_mask,
        ]),
    );

    Ok(SessionKey::from_bytes(session_key))
}
