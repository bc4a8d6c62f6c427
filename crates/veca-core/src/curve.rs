// Copyright (c) 2026 Veca Project Authors
// Licensed under the MIT License

use crate::types::{VecaError, VecaResult, DIGEST_LENGTH, POINT_LENGTH};
use p256::elliptic_curve::bigint::U256;
use p256::elliptic_curve::ops::Reduce;
use p256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use p256::elliptic_curve::Field;
use p256::{AffinePoint, EncodedPoint, ProjectivePoint, Scalar};
use rand_core::{CryptoRng, RngCore};

const FIELD_LENGTH: usize = 32;

/// Generates a uniformly random P-256 scalar.
pub fn random_scalar(rng: &mut (impl RngCore + CryptoRng)) -> Scalar {
    Scalar::random(rng)
}

/// Interprets a truncated digest as a P-256 scalar.
///
/// The digest is read as a big-endian integer and reduced modulo the group
/// order; a 160-bit value is always below the order, so the reduction is the
/// identity and the mapping is injective.
pub fn scalar_from_digest(digest: &[u8; DIGEST_LENGTH]) -> Scalar {
    let mut wide = [0u8; FIELD_LENGTH];
    wide[FIELD_LENGTH - DIGEST_LENGTH..].copy_from_slice(digest);
    <Scalar as Reduce<U256>>::reduce(U256::from_be_slice(&wide))
}

/// Computes the base-point multiplication `scalar * G`.
pub fn mul_base(scalar: &Scalar) -> AffinePoint {
    (ProjectivePoint::GENERATOR * scalar).to_affine()
}

/// Computes the scalar multiplication `scalar * point`.
pub fn mul_point(scalar: &Scalar, point: &AffinePoint) -> AffinePoint {
    (ProjectivePoint::from(*point) * scalar).to_affine()
}

/// Encodes a point in SEC1 compressed form ([`POINT_LENGTH`] bytes).
///
/// # Errors
///
/// Returns [`VecaError::InvalidPoint`] for the identity, whose compressed
/// encoding is a single byte.
pub fn encode_point(point: &AffinePoint) -> VecaResult<[u8; POINT_LENGTH]> {
    let encoded = point.to_encoded_point(true);
    let bytes = encoded.as_bytes();
    if bytes.len() != POINT_LENGTH {
        return Err(VecaError::InvalidPoint);
    }
    let mut out = [0u8; POINT_LENGTH];
    out.copy_from_slice(bytes);
    Ok(out)
}

/// Decodes a SEC1-encoded point, rejecting the identity.
///
/// # Errors
///
/// Returns [`VecaError::InvalidPoint`] if `raw` is not a canonical encoding
/// of a non-identity point on the curve.
pub fn decode_point(raw: &[u8]) -> VecaResult<AffinePoint> {
    let encoded = EncodedPoint::from_bytes(raw).map_err(|_| VecaError::InvalidPoint)?;
    let point = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
        .ok_or(VecaError::InvalidPoint)?;
    if point == AffinePoint::IDENTITY {
        return Err(VecaError::InvalidPoint);
    }
    Ok(point)
}

/// Extracts the first `N` bytes of a point's affine x-coordinate.
///
/// The coordinate is taken in its minimal big-endian integer encoding
/// (leading zero bytes stripped) before truncation, matching the protocol's
/// integer-to-bytes convention.
///
/// # Errors
///
/// Returns [`VecaError::InvalidPoint`] for the identity and
/// [`VecaError::LengthMismatch`] if fewer than `N` bytes remain after
/// stripping.
pub fn x_prefix<const N: usize>(point: &AffinePoint) -> VecaResult<[u8; N]> {
    let encoded = point.to_encoded_point(false);
    let x = encoded.x().ok_or(VecaError::InvalidPoint)?;
    let start = x.iter().position(|&b| b != 0).unwrap_or(x.len());
    let minimal = &x[start..];
    if minimal.len() < N {
        return Err(VecaError::LengthMismatch);
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&minimal[..N]);
    Ok(out)
}
