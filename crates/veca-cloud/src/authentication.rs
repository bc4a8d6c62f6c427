// Copyright (c) 2026 Veca Project Authors
// Licensed under the MIT License

use rand_core::{CryptoRng, RngCore};
use veca_core::types::{
    constant_time_eq, FogId, SessionKey, VecaError, VecaResult, VehicleId, DIGEST_LENGTH,
    ID_LENGTH, TIMESTAMP_LENGTH,
};
use veca_core::{crypto, protocol};

use crate::state::{CloudServer, M3Message};

/// Validates message M2 from a fog node and emits M3.
///
/// Unmasks `r_4*`, `PFD_j*`, and `R_i*` using the shared secret K_cf on
/// record for `fog_id`, then recomputes the checksum `D*` and compares it in
/// constant time against the presented one. This is the sole check binding
/// the message to the registered fog secret. On success a fresh nonce r_5 is
/// drawn, the session key `SK = h(PFD_j* || R_i* || r_4* || (r_5 XOR K_cf))`
/// is derived, and M3 carries the key confirmation `Z_i` plus the masked
/// nonce `L_i`.
///
/// The candidate vehicle identity `R_i*[0..8] XOR FID_j` is recovered and,
/// when a matching record exists, the session key is cached there. The
/// binding is unauthenticated and advisory only.
///
/// # Errors
///
/// Returns [`VecaError::InvalidMessage`] for a malformed M2,
/// [`VecaError::Freshness`] if T_2 falls outside the window around `now`,
/// [`VecaError::UnknownFogNode`] if `fog_id` is unregistered, and
/// [`VecaError::Authentication`] on checksum mismatch. No state is committed
/// on failure.
pub fn handle_m2(
    server: &mut CloudServer,
    m2_data: &[u8],
    fog_id: &FogId,
    now: u64,
    rng: &mut (impl RngCore + CryptoRng),
    m3: &mut M3Message,
) -> VecaResult<()> {
    let m2 = protocol::parse_m2(m2_data)?;

    let t2: &[u8; TIMESTAMP_LENGTH] = m2
        .timestamp
        .try_into()
        .map_err(|_| VecaError::InvalidMessage)?;
    crypto::check_freshness(t2, now)?;

    let record = server
        .fog_records
        .get(fog_id)
        .ok_or(VecaError::UnknownFogNode)?;
    let shared_secret = record.shared_secret;

    let masked_nonce: &[u8; DIGEST_LENGTH] = m2
        .masked_nonce
        .try_into()
        .map_err(|_| VecaError::InvalidMessage)?;
    let masked_pseudo: &[u8; DIGEST_LENGTH] = m2
        .masked_pseudo_identity
        .try_into()
        .map_err(|_| VecaError::InvalidMessage)?;
    let masked_identity: &[u8; DIGEST_LENGTH] = m2
        .masked_identity
        .try_into()
        .map_err(|_| VecaError::InvalidMessage)?;

    let padded_fog_id = crypto::pad::<DIGEST_LENGTH>(fog_id.as_bytes());

    let nonce = crypto::xor(
        masked_nonce,
        &crypto::digest(&[&shared_secret, &padded_fog_id]),
    );
    let pseudo_identity = crypto::xor(
        masked_pseudo,
        &crypto::digest(&[fog_id.as_bytes(), &crypto::xor(&shared_secret, &nonce)]),
    );
    let vehicle_mask = crypto::xor(masked_identity, &crypto::digest(&[&shared_secret, &nonce]));

    let expected_checksum = crypto::digest(&[
        &pseudo_identity,
        &nonce,
        &crypto::xor(&vehicle_mask, &shared_secret),
    ]);
    if !constant_time_eq(&expected_checksum, m2.checksum) {
        return Err(VecaError::Authentication);
    }

    let confirmation_nonce = crypto::random_nonce(rng);
    let session_key = crypto::digest(&[
        &pseudo_identity,
        &vehicle_mask,
        &nonce,
        &crypto::xor(&confirmation_nonce, &shared_secret),
    ]);

    // Best-effort cache: R_i*[0..8] XOR FID_j names the vehicle only if the
    // handshake was honest; a collision silently binds the wrong record.
    let mut recovered_id = [0u8; ID_LENGTH];
    recovered_id.copy_from_slice(&vehicle_mask[..ID_LENGTH]);
    let candidate = VehicleId::new(&crypto::xor(&recovered_id, fog_id.as_bytes()));
    if let Some(vehicle_record) = server.vehicle_records.get_mut(&candidate) {
        vehicle_record.cached_session_key = Some(SessionKey::from_bytes(session_key));
    }

    let shared_xor_id = crypto::xor(&shared_secret, &padded_fog_id);
    m3.key_confirmation = crypto::digest(&[&session_key, &shared_xor_id]);
    m3.masked_nonce = crypto::xor(
        &confirmation_nonce,
        &crypto::digest(&[&shared_xor_id, &nonce]),
    );
    m3.timestamp = crypto::encode_timestamp(now);

    Ok(())
}
