use veca_core::protocol;
use veca_core::types::*;

#[test]
fn wire_format_sizes() {
    assert_eq!(M1_LENGTH, 65);
    assert_eq!(M2_LENGTH, 84);
    assert_eq!(M3_LENGTH, 44);
    assert_eq!(M4_LENGTH, 44);
}

#[test]
fn m1_write_parse_roundtrip() {
    let masked_identity = [0x11u8; ID_LENGTH];
    let mut ephemeral_point = [0x22u8; POINT_LENGTH];
    ephemeral_point[0] = 0x02;
    let masked_nonce = [0x33u8; NONCE_LENGTH];
    let timestamp = [0x44u8; TIMESTAMP_LENGTH];

    let mut buf = vec![0u8; M1_LENGTH];
    protocol::write_m1(
        &masked_identity,
        &ephemeral_point,
        &masked_nonce,
        &timestamp,
        &mut buf,
    )
    .unwrap();

    let m1 = protocol::parse_m1(&buf).unwrap();
    assert_eq!(m1.masked_identity, &masked_identity);
    assert_eq!(m1.ephemeral_point, &ephemeral_point);
    assert_eq!(m1.masked_nonce, &masked_nonce);
    assert_eq!(m1.timestamp, &timestamp);
}

#[test]
fn m2_write_parse_roundtrip() {
    let masked_nonce = [0xA1u8; DIGEST_LENGTH];
    let masked_pseudo = [0xA2u8; DIGEST_LENGTH];
    let masked_identity = [0xA3u8; DIGEST_LENGTH];
    let checksum = [0xA4u8; DIGEST_LENGTH];
    let timestamp = [0xA5u8; TIMESTAMP_LENGTH];

    let mut buf = vec![0u8; M2_LENGTH];
    protocol::write_m2(
        &masked_nonce,
        &masked_pseudo,
        &masked_identity,
        &checksum,
        &timestamp,
        &mut buf,
    )
    .unwrap();

    let m2 = protocol::parse_m2(&buf).unwrap();
    assert_eq!(m2.masked_nonce, &masked_nonce);
    assert_eq!(m2.masked_pseudo_identity, &masked_pseudo);
    assert_eq!(m2.masked_identity, &masked_identity);
    assert_eq!(m2.checksum, &checksum);
    assert_eq!(m2.timestamp, &timestamp);
}

#[test]
fn m3_write_parse_roundtrip() {
    let masked_nonce = [0xB1u8; DIGEST_LENGTH];
    let key_confirmation = [0xB2u8; DIGEST_LENGTH];
    let timestamp = [0xB3u8; TIMESTAMP_LENGTH];

    let mut buf = vec![0u8; M3_LENGTH];
    protocol::write_m3(&masked_nonce, &key_confirmation, &timestamp, &mut buf).unwrap();

    let m3 = protocol::parse_m3(&buf).unwrap();
    assert_eq!(m3.masked_nonce, &masked_nonce);
    assert_eq!(m3.key_confirmation, &key_confirmation);
    assert_eq!(m3.timestamp, &timestamp);
}

#[test]
fn m4_write_parse_roundtrip() {
    let masked_session_key = [0xC1u8; DIGEST_LENGTH];
    let verifier = [0xC2u8; DIGEST_LENGTH];
    let timestamp = [0xC3u8; TIMESTAMP_LENGTH];

    let mut buf = vec![0u8; M4_LENGTH];
    protocol::write_m4(&masked_session_key, &verifier, &timestamp, &mut buf).unwrap();

    let m4 = protocol::parse_m4(&buf).unwrap();
    assert_eq!(m4.masked_session_key, &masked_session_key);
    assert_eq!(m4.verifier, &verifier);
    assert_eq!(m4.timestamp, &timestamp);
}

#[test]
fn parse_rejects_short_and_long_input() {
    assert_eq!(
        protocol::parse_m1(&[0u8; M1_LENGTH - 1]).err(),
        Some(VecaError::InvalidMessage)
    );
    assert!(protocol::parse_m1(&[0u8; M1_LENGTH + 1]).is_err());
    assert!(protocol::parse_m2(&[0u8; M2_LENGTH - 1]).is_err());
    assert!(protocol::parse_m3(&[0u8; M3_LENGTH + 1]).is_err());
    assert!(protocol::parse_m4(&[0u8; M4_LENGTH - 1]).is_err());
    assert!(protocol::parse_m4(&[]).is_err());
}

#[test]
fn write_rejects_wrong_field_widths() {
    let mut buf = vec![0u8; M1_LENGTH];
    assert!(protocol::write_m1(
        &[0u8; ID_LENGTH + 1],
        &[0u8; POINT_LENGTH],
        &[0u8; NONCE_LENGTH],
        &[0u8; TIMESTAMP_LENGTH],
        &mut buf,
    )
    .is_err());

    let mut buf = vec![0u8; M3_LENGTH];
    assert!(protocol::write_m3(
        &[0u8; DIGEST_LENGTH],
        &[0u8; DIGEST_LENGTH - 1],
        &[0u8; TIMESTAMP_LENGTH],
        &mut buf,
    )
    .is_err());
}

#[test]
fn write_rejects_short_output_buffer() {
    let mut buf = vec![0u8; M4_LENGTH - 1];
    assert!(protocol::write_m4(
        &[0u8; DIGEST_LENGTH],
        &[0u8; DIGEST_LENGTH],
        &[0u8; TIMESTAMP_LENGTH],
        &mut buf,
    )
    .is_err());
}
