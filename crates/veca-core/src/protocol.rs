// Copyright (c) 2026 Veca Project Authors
// Licensed under the MIT License

//! Wire-format serialization and parsing for the four handshake messages.
//!
//! All fields are fixed-width, laid out in the order of the message tables;
//! parsing returns zero-copy views into the input buffer.

use crate::types::{
    VecaError, VecaResult, DIGEST_LENGTH, ID_LENGTH, M1_LENGTH, M2_LENGTH, M3_LENGTH, M4_LENGTH,
    NONCE_LENGTH, POINT_LENGTH, TIMESTAMP_LENGTH,
};

const M1_IDENTITY_OFFSET: usize = 0;
const M1_POINT_OFFSET: usize = ID_LENGTH;
const M1_NONCE_OFFSET: usize = ID_LENGTH + POINT_LENGTH;
const M1_TIMESTAMP_OFFSET: usize = ID_LENGTH + POINT_LENGTH + NONCE_LENGTH;

const M2_NONCE_OFFSET: usize = 0;
const M2_PSEUDO_OFFSET: usize = DIGEST_LENGTH;
const M2_IDENTITY_OFFSET: usize = 2 * DIGEST_LENGTH;
const M2_CHECKSUM_OFFSET: usize = 3 * DIGEST_LENGTH;
const M2_TIMESTAMP_OFFSET: usize = 4 * DIGEST_LENGTH;

const M3_NONCE_OFFSET: usize = 0;
const M3_CONFIRMATION_OFFSET: usize = DIGEST_LENGTH;
const M3_TIMESTAMP_OFFSET: usize = 2 * DIGEST_LENGTH;

const M4_KEY_OFFSET: usize = 0;
const M4_VERIFIER_OFFSET: usize = DIGEST_LENGTH;
const M4_TIMESTAMP_OFFSET: usize = 2 * DIGEST_LENGTH;

/// Parsed view of message M1 (vehicle to fog node).
pub struct M1Ref<'a> {
    /// Masked vehicle identity RID_i.
    pub masked_identity: &'a [u8],
    /// Ephemeral point P_i, SEC1 compressed.
    pub ephemeral_point: &'a [u8],
    /// Masked nonce F_i.
    pub masked_nonce: &'a [u8],
    /// Timestamp T_1.
    pub timestamp: &'a [u8],
}

/// Parsed view of message M2 (fog node to cloud server).
pub struct M2Ref<'a> {
    /// Masked nonce W_i.
    pub masked_nonce: &'a [u8],
    /// Masked pseudo-identity X_i.
    pub masked_pseudo_identity: &'a [u8],
    /// Masked vehicle identity Y_i.
    pub masked_identity: &'a [u8],
    /// Binding checksum D.
    pub checksum: &'a [u8],
    /// Timestamp T_2.
    pub timestamp: &'a [u8],
}

/// Parsed view of message M3 (cloud server to fog node).
pub struct M3Ref<'a> {
    /// Masked nonce L_i.
    pub masked_nonce: &'a [u8],
    /// Key confirmation Z_i.
    pub key_confirmation: &'a [u8],
    /// Timestamp T_3.
    pub timestamp: &'a [u8],
}

/// Parsed view of message M4 (fog node to vehicle).
pub struct M4Ref<'a> {
    /// Masked session key N_i.
    pub masked_session_key: &'a [u8],
    /// Verifier J_i.
    pub verifier: &'a [u8],
    /// Timestamp T_4.
    pub timestamp: &'a [u8],
}

pub fn parse_m1(data: &[u8]) -> VecaResult<M1Ref<'_>> {
    if data.len() != M1_LENGTH {
        return Err(VecaError::InvalidMessage);
    }
    Ok(M1Ref {
        masked_identity: &data[M1_IDENTITY_OFFSET..M1_POINT_OFFSET],
        ephemeral_point: &data[M1_POINT_OFFSET..M1_NONCE_OFFSET],
        masked_nonce: &data[M1_NONCE_OFFSET..M1_TIMESTAMP_OFFSET],
        timestamp: &data[M1_TIMESTAMP_OFFSET..],
    })
}

pub fn parse_m2(data: &[u8]) -> VecaResult<M2Ref<'_>> {
    if data.len() != M2_LENGTH {
        return Err(VecaError::InvalidMessage);
    }
    Ok(M2Ref {
        masked_nonce: &data[M2_NONCE_OFFSET..M2_PSEUDO_OFFSET],
        masked_pseudo_identity: &data[M2_PSEUDO_OFFSET..M2_IDENTITY_OFFSET],
        masked_identity: &data[M2_IDENTITY_OFFSET..M2_CHECKSUM_OFFSET],
        checksum: &data[M2_CHECKSUM_OFFSET..M2_TIMESTAMP_OFFSET],
        timestamp: &data[M2_TIMESTAMP_OFFSET..],
    })
}

pub fn parse_m3(data: &[u8]) -> VecaResult<M3Ref<'_>> {
    if data.len() != M3_LENGTH {
        return Err(VecaError::InvalidMessage);
    }
    Ok(M3Ref {
        masked_nonce: &data[M3_NONCE_OFFSET..M3_CONFIRMATION_OFFSET],
        key_confirmation: &data[M3_CONFIRMATION_OFFSET..M3_TIMESTAMP_OFFSET],
        timestamp: &data[M3_TIMESTAMP_OFFSET..],
    })
}

pub fn parse_m4(data: &[u8]) -> VecaResult<M4Ref<'_>> {
    if data.len() != M4_LENGTH {
        return Err(VecaError::InvalidMessage);
    }
    Ok(M4Ref {
        masked_session_key: &data[M4_KEY_OFFSET..M4_VERIFIER_OFFSET],
        verifier: &data[M4_VERIFIER_OFFSET..M4_TIMESTAMP_OFFSET],
        timestamp: &data[M4_TIMESTAMP_OFFSET..],
    })
}

pub fn write_m1(
    masked_identity: &[u8],
    ephemeral_point: &[u8],
    masked_nonce: &[u8],
    timestamp: &[u8],
    out: &mut [u8],
) -> VecaResult<()> {
    if masked_identity.len() != ID_LENGTH
        || ephemeral_point.len() != POINT_LENGTH
        || masked_nonce.len() != NONCE_LENGTH
        || timestamp.len() != TIMESTAMP_LENGTH
        || out.len() < M1_LENGTH
    {
        return Err(VecaError::InvalidMessage);
    }
    out[M1_IDENTITY_OFFSET..M1_POINT_OFFSET].copy_from_slice(masked_identity);
    out[M1_POINT_OFFSET..M1_NONCE_OFFSET].copy_from_slice(ephemeral_point);
    out[M1_NONCE_OFFSET..M1_TIMESTAMP_OFFSET].copy_from_slice(masked_nonce);
    out[M1_TIMESTAMP_OFFSET..M1_LENGTH].copy_from_slice(timestamp);
    Ok(())
}

pub fn write_m2(
    masked_nonce: &[u8],
    masked_pseudo_identity: &[u8],
    masked_identity: &[u8],
    checksum: &[u8],
    timestamp: &[u8],
    out: &mut [u8],
) -> VecaResult<()> {
    if masked_nonce.len() != DIGEST_LENGTH
        || masked_pseudo_identity.len() != DIGEST_LENGTH
        || masked_identity.len() != DIGEST_LENGTH
        || checksum.len() != DIGEST_LENGTH
        || timestamp.len() != TIMESTAMP_LENGTH
        || out.len() < M2_LENGTH
    {
        return Err(VecaError::InvalidMessage);
    }
    out[M2_NONCE_OFFSET..M2_PSEUDO_OFFSET].copy_from_slice(masked_nonce);
    out[M2_PSEUDO_OFFSET..M2_IDENTITY_OFFSET].copy_from_slice(masked_pseudo_identity);
    out[M2_IDENTITY_OFFSET..M2_CHECKSUM_OFFSET].copy_from_slice(masked_identity);
    out[M2_CHECKSUM_OFFSET..M2_TIMESTAMP_OFFSET].copy_from_slice(checksum);
    out[M2_TIMESTAMP_OFFSET..M2_LENGTH].copy_from_slice(timestamp);
    Ok(())
}

pub fn write_m3(
    masked_nonce: &[u8],
    key_confirmation: &[u8],
    timestamp: &[u8],
    out: &mut [u8],
) -> VecaResult<()> {
    if masked_nonce.len() != DIGEST_LENGTH
        || key_confirmation.len() != DIGEST_LENGTH
        || timestamp.len() != TIMESTAMP_LENGTH
        || out.len() < M3_LENGTH
    {
        return Err(VecaError::InvalidMessage);
    }
    out[M3_NONCE_OFFSET..M3_CONFIRMATION_OFFSET].copy_from_slice(masked_nonce);
    out[M3_CONFIRMATION_OFFSET..M3_TIMESTAMP_OFFSET].copy_from_slice(key_confirmation);
    out[M3_TIMESTAMP_OFFSET..M3_LENGTH].copy_from_slice(timestamp);
    Ok(())
}

pub fn write_m4(
    masked_session_key: &[u8],
    verifier: &[u8],
    timestamp: &[u8],
    out: &mut [u8],
) -> VecaResult<()> {
    if masked_session_key.len() != DIGEST_LENGTH
        || verifier.len() != DIGEST_LENGTH
        || timestamp.len() != TIMESTAMP_LENGTH
        || out.len() < M4_LENGTH
    {
        return Err(VecaError::InvalidMessage);
    }
    out[M4_KEY_OFFSET..M4_VERIFIER_OFFSET].copy_from_slice(masked_session_key);
    out[M4_VERIFIER_OFFSET..M4_TIMESTAMP_OFFSET].copy_from_slice(verifier);
    out[M4_TIMESTAMP_OFFSET..M4_LENGTH].copy_from_slice(timestamp);
    Ok(())
}
