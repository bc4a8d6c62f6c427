// Copyright (c) 2026 Veca Project Authors
// Licensed under the MIT License

use rand_core::{CryptoRng, RngCore};
use veca_core::types::{
    constant_time_eq, SessionKey, VecaError, VecaResult, DIGEST_LENGTH, ID_LENGTH, NONCE_LENGTH,
    TIMESTAMP_LENGTH,
};
use veca_core::{crypto, curve, protocol};

use crate::state::{FogNode, FogPhase, FogState, M2Message, M4Message};

/// Processes message M1 from a vehicle and produces M2 for the cloud server.
///
/// Recovers the at-rest secrets, computes `Q_i = b_j * P_i` (the same point
/// the vehicle derived as `r_3 * B_j`), unmasks the vehicle nonce and
/// identity, then masks the session nonce r_4, the pseudo-identity, and the
/// recovered identity under K_cf for the server leg. The scratch needed by
/// [`generate_m4`] is retained in `state`.
///
/// # Errors
///
/// Returns [`VecaError::InvalidState`] unless `state` is fresh,
/// [`VecaError::InvalidMessage`] for a malformed M1, [`VecaError::Freshness`]
/// if T_1 is stale relative to `now`, and [`VecaError::InvalidPoint`] if P_i
/// does not decode. Any failure moves `state` to [`FogPhase::Rejected`].
pub fn generate_m2(
    fog: &FogNode,
    m1_data: &[u8],
    now: u64,
    rng: &mut (impl RngCore + CryptoRng),
    m2: &mut M2Message,
    state: &mut FogState,
) -> VecaResult<()> {
    if state.phase != FogPhase::Created {
        return Err(VecaError::InvalidState);
    }
    match m2_inner(fog, m1_data, now, rng, m2, state) {
        Ok(()) => {
            state.phase = FogPhase::M2Generated;
            Ok(())
        }
        Err(err) => {
            state.phase = FogPhase::Rejected;
            Err(err)
        }
    }
}

fn m2_inner(
    fog: &FogNode,
    m1_data: &[u8],
    now: u64,
    rng: &mut (impl RngCore + CryptoRng),
    m2: &mut M2Message,
    state: &mut FogState,
) -> VecaResult<()> {
    let m1 = protocol::parse_m1(m1_data)?;

    let t1: &[u8; TIMESTAMP_LENGTH] = m1
        .timestamp
        .try_into()
        .map_err(|_| VecaError::InvalidMessage)?;
    crypto::check_freshness(t1, now)?;

    let (shared_secret, private_scalar) = fog.recover_secrets();

    let ephemeral_point = curve::decode_point(m1.ephemeral_point)?;
    let shared_point = curve::mul_point(
        &curve::scalar_from_digest(&private_scalar),
        &ephemeral_point,
    );
    let x_prefix = curve::x_prefix::<DIGEST_LENGTH>(&shared_point)?;
    let mut x_prefix_short = [0u8; ID_LENGTH];
    x_prefix_short.copy_from_slice(&x_prefix[..ID_LENGTH]);

    let masked_identity: &[u8; ID_LENGTH] = m1
        .masked_identity
        .try_into()
        .map_err(|_| VecaError::InvalidMessage)?;
    let masked_nonce: &[u8; NONCE_LENGTH] = m1
        .masked_nonce
        .try_into()
        .map_err(|_| VecaError::InvalidMessage)?;

    state.vehicle_nonce = crypto::xor(masked_nonce, &x_prefix);
    state.masked_vehicle_id = crypto::xor(masked_identity, &x_prefix_short);
    state.vehicle_pseudo_identity = *masked_identity;
    state.shared_x_prefix = x_prefix;
    state.nonce = crypto::random_nonce(rng);

    let padded_fog_id = crypto::pad::<DIGEST_LENGTH>(fog.fog_id().as_bytes());
    let padded_vehicle_id = crypto::pad::<DIGEST_LENGTH>(&state.masked_vehicle_id);

    m2.masked_nonce = crypto::xor(
        &state.nonce,
        &crypto::digest(&[&shared_secret, &padded_fog_id]),
    );
    m2.masked_pseudo_identity = crypto::xor(
        fog.pseudo_identity(),
        &crypto::digest(&[
            fog.fog_id().as_bytes(),
            &crypto::xor(&shared_secret, &state.nonce),
        ]),
    );
    m2.masked_identity = crypto::xor(
        &padded_vehicle_id,
        &crypto::digest(&[&shared_secret, &state.nonce]),
    );
    m2.checksum = crypto::digest(&[
        fog.pseudo_identity(),
        &state.nonce,
        &crypto::xor(&padded_vehicle_id, &shared_secret),
    ]);
    m2.timestamp = crypto::encode_timestamp(now);

    Ok(())
}

/// Processes message M3 from the cloud server and produces M4 for the vehicle.
///
/// Unmasks the confirmation nonce r_5*, independently derives the session
/// key, and verifies the server's key confirmation Z_i in constant time;
/// that check is the node's proof that the server derived the matching key.
/// On success the key is committed and returned alongside M4, which carries
/// the vehicle-facing verifier J_i and the masked key N_i.
///
/// # Errors
///
/// Returns [`VecaError::InvalidState`] unless `state` holds an M2-generated
/// handshake, [`VecaError::Freshness`] if T_3 is stale, and
/// [`VecaError::Authentication`] on confirmation mismatch. Any failure moves
/// `state` to [`FogPhase::Rejected`].
pub fn generate_m4(
    fog: &FogNode,
    m3_data: &[u8],
    now: u64,
    m4: &mut M4Message,
    state: &mut FogState,
) -> VecaResult<SessionKey> {
    if state.phase != FogPhase::M2Generated {
        return Err(VecaError::InvalidState);
    }
    match m4_inner(fog, m3_data, now, m4, state) {
        Ok(session_key) => {
            state.phase = FogPhase::Established;
            Ok(session_key)
        }
        Err(err) => {
            state.phase = FogPhase::Rejected;
            Err(err)
        }
    }
}

fn m4_inner(
    fog: &FogNode,
    m3_data: &[u8],
    now: u64,
    m4: &mut M4Message,
    state: &mut FogState,
) -> VecaResult<SessionKey> {
    let m3 = protocol::parse_m3(m3_data)?;

    let t3: &[u8; TIMESTAMP_LENGTH] = m3
        .timestamp
        .try_into()
        .map_err(|_| VecaError::InvalidMessage)?;
    crypto::check_freshness(t3, now)?;

    let (shared_secret, _) = fog.recover_secrets();
    let padded_fog_id = crypto::pad::<DIGEST_LENGTH>(fog.fog_id().as_bytes());
    let shared_xor_id = crypto::xor(&shared_secret, &padded_fog_id);

    let masked_nonce: &[u8; DIGEST_LENGTH] = m3
        .masked_nonce
        .try_into()
        .map_err(|_| VecaError::InvalidMessage)?;
    let confirmation_nonce = crypto::xor(
        masked_nonce,
        &crypto::digest(&[&shared_xor_id, &state.nonce]),
    );

    let padded_vehicle_id = crypto::pad::<DIGEST_LENGTH>(&state.masked_vehicle_id);
    let session_key = crypto::digest(&[
        fog.pseudo_identity(),
        &padded_vehicle_id,
        &state.nonce,
        &crypto::xor(&confirmation_nonce, &shared_secret),
    ]);

    let expected_confirmation = crypto::digest(&[&session_key, &shared_xor_id]);
    if !constant_time_eq(&expected_confirmation, m3.key_confirmation) {
        return Err(VecaError::Authentication);
    }

    m4.verifier = crypto::digest(&[
        &state.vehicle_pseudo_identity,
        &crypto::xor(&state.vehicle_nonce, &state.shared_x_prefix),
    ]);
    m4.masked_session_key = crypto::xor(
        &crypto::digest(&[
            &crypto::xor(&padded_fog_id, &state.shared_x_prefix),
            &state.masked_vehicle_id,
        ]),
        &session_key,
    );
    m4.timestamp = crypto::encode_timestamp(now);

    Ok(SessionKey::from_bytes(session_key))
}
