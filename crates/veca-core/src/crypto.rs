// Copyright (c) 2026 Veca Project Authors
// Licensed under the MIT License

use crate::types::{
    VecaError, VecaResult, DIGEST_LENGTH, FRESHNESS_WINDOW_SECS, NONCE_LENGTH, TIMESTAMP_LENGTH,
};
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};

/// Computes the truncated one-way hash over the concatenation of all `parts`.
///
/// SHA-256, truncated to the first [`DIGEST_LENGTH`] bytes (160 bits). The
/// truncation width is a fixed protocol contract; every verifier and masking
/// pad in the handshake is exactly this wide.
pub fn digest(parts: &[&[u8]]) -> [u8; DIGEST_LENGTH] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    let full = hasher.finalize();
    let mut out = [0u8; DIGEST_LENGTH];
    out.copy_from_slice(&full[..DIGEST_LENGTH]);
    out
}

/// XORs two equal-length byte slices.
///
/// # Errors
///
/// Returns [`VecaError::LengthMismatch`] if the lengths differ. A mismatch is
/// a programming defect, not a protocol event.
pub fn xor_bytes(a: &[u8], b: &[u8]) -> VecaResult<Vec<u8>> {
    if a.len() != b.len() {
        return Err(VecaError::LengthMismatch);
    }
    Ok(a.iter().zip(b.iter()).map(|(x, y)| x ^ y).collect())
}

/// XORs two equal-width byte arrays.
///
/// Fixed-width protocol values (8/20/4 bytes by role) use this form so that
/// operand-length agreement is enforced at compile time.
pub fn xor<const N: usize>(a: &[u8; N], b: &[u8; N]) -> [u8; N] {
    let mut out = [0u8; N];
    for i in 0..N {
        out[i] = a[i] ^ b[i];
    }
    out
}

/// Zero-pads or truncates `data` to exactly `N` bytes.
pub fn pad<const N: usize>(data: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    let n = data.len().min(N);
    out[..n].copy_from_slice(&data[..n]);
    out
}

/// Fills `buf` with cryptographically secure random bytes.
pub fn random_bytes(rng: &mut (impl RngCore + CryptoRng), buf: &mut [u8]) {
    rng.fill_bytes(buf);
}

/// Generates a fresh [`NONCE_LENGTH`]-byte random nonce.
pub fn random_nonce(rng: &mut (impl RngCore + CryptoRng)) -> [u8; NONCE_LENGTH] {
    let mut out = [0u8; NONCE_LENGTH];
    rng.fill_bytes(&mut out);
    out
}

/// Encodes seconds-since-epoch as a 4-byte big-endian timestamp.
pub fn encode_timestamp(secs: u64) -> [u8; TIMESTAMP_LENGTH] {
    (secs as u32).to_be_bytes()
}

/// Decodes a 4-byte big-endian timestamp to seconds-since-epoch.
pub fn decode_timestamp(raw: &[u8; TIMESTAMP_LENGTH]) -> u64 {
    u32::from_be_bytes(*raw) as u64
}

/// Verifies that a timestamp is within the freshness window of `now`.
///
/// # Errors
///
/// Returns [`VecaError::Freshness`] if the absolute skew exceeds
/// [`FRESHNESS_WINDOW_SECS`].
pub fn check_freshness(raw: &[u8; TIMESTAMP_LENGTH], now: u64) -> VecaResult<()> {
    if now.abs_diff(decode_timestamp(raw)) > FRESHNESS_WINDOW_SECS {
        return Err(VecaError::Freshness);
    }
    Ok(())
}

/// Returns the current wall-clock time as seconds since the Unix epoch.
///
/// Drivers pass this to operations that emit or verify timestamps; tests
/// substitute fixed values to probe freshness behavior.
pub fn unix_time() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
