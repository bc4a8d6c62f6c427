use rand::rngs::OsRng;
use veca_cloud::*;
use veca_core::types::*;
use veca_core::{crypto, curve, protocol};

const NOW: u64 = 1_700_000_000;

fn test_server() -> CloudServer {
    CloudServer::new(*b"master secret 20byte")
}

/// Builds an honest M2 the way an enrolled fog node would, from the secrets
/// the server holds on record.
fn build_m2(
    record: &FogRecord,
    fog_id: &FogId,
    nonce: &[u8; NONCE_LENGTH],
    vehicle_mask: &[u8; ID_LENGTH],
    now: u64,
) -> Vec<u8> {
    let padded_fog_id = crypto::pad::<DIGEST_LENGTH>(fog_id.as_bytes());
    let padded_vehicle = crypto::pad::<DIGEST_LENGTH>(vehicle_mask);

    let masked_nonce = crypto::xor(
        nonce,
        &crypto::digest(&[&record.shared_secret, &padded_fog_id]),
    );
    let masked_pseudo = crypto::xor(
        &record.pseudo_identity,
        &crypto::digest(&[
            fog_id.as_bytes(),
            &crypto::xor(&record.shared_secret, nonce),
        ]),
    );
    let masked_identity = crypto::xor(
        &padded_vehicle,
        &crypto::digest(&[&record.shared_secret, nonce]),
    );
    let checksum = crypto::digest(&[
        &record.pseudo_identity,
        nonce,
        &crypto::xor(&padded_vehicle, &record.shared_secret),
    ]);

    let mut buf = vec![0u8; M2_LENGTH];
    protocol::write_m2(
        &masked_nonce,
        &masked_pseudo,
        &masked_identity,
        &checksum,
        &crypto::encode_timestamp(now),
        &mut buf,
    )
    .unwrap();
    buf
}

#[test]
fn register_vehicle_stores_record_and_masks_secret() {
    let mut server = test_server();
    let vehicle_id = VehicleId::from("VID00001");
    let password_verifier = crypto::digest(&[b"PV for VID00001"]);

    let masked_secret = register_vehicle(&mut server, vehicle_id, &password_verifier);

    assert!(server.vehicle_registered(&vehicle_id));
    // The server can reconstruct a_i from its master secret alone.
    let derived = crypto::digest(&[
        vehicle_id.as_bytes(),
        &password_verifier,
        b"master secret 20byte",
    ]);
    assert_eq!(crypto::xor(&masked_secret, &password_verifier), derived);
}

#[test]
fn reregistration_overwrites_previous_record() {
    let mut server = test_server();
    let vehicle_id = VehicleId::from("VID00001");
    let pv1 = crypto::digest(&[b"first verifier"]);
    let pv2 = crypto::digest(&[b"second verifier"]);

    let masked1 = register_vehicle(&mut server, vehicle_id, &pv1);
    let masked2 = register_vehicle(&mut server, vehicle_id, &pv2);

    assert_ne!(masked1, masked2);
    assert!(server.vehicle_registered(&vehicle_id));
}

#[test]
fn fog_registration_derives_from_master_secret() {
    let mut server = test_server();
    let fog_id = FogId::from("FOG00001");

    let enrollment = register_fog_node(&mut server, fog_id, &mut OsRng).unwrap();

    assert_eq!(
        enrollment.private_scalar,
        crypto::digest(&[&enrollment.pseudo_identity, b"master secret 20byte"])
    );
    assert_eq!(
        enrollment.shared_secret,
        crypto::digest(&[&crypto::xor(
            &crypto::pad::<DIGEST_LENGTH>(fog_id.as_bytes()),
            b"master secret 20byte",
        )])
    );
    let expected_public = curve::encode_point(&curve::mul_base(&curve::scalar_from_digest(
        &enrollment.private_scalar,
    )))
    .unwrap();
    assert_eq!(enrollment.public_key, expected_public);

    let record = server.fog_record(&fog_id).unwrap();
    assert_eq!(record.pseudo_identity, enrollment.pseudo_identity);
    assert_eq!(record.private_scalar, enrollment.private_scalar);
    assert_eq!(record.shared_secret, enrollment.shared_secret);
}

#[test]
fn fog_registrations_draw_unique_pseudo_identities() {
    let mut server = test_server();
    let fog_id = FogId::from("FOG00001");
    let e1 = register_fog_node(&mut server, fog_id, &mut OsRng).unwrap();
    let e2 = register_fog_node(&mut server, fog_id, &mut OsRng).unwrap();
    assert_ne!(e1.pseudo_identity, e2.pseudo_identity);
}

#[test]
fn handle_m2_accepts_honest_message_and_confirms_key() {
    let mut server = test_server();
    let fog_id = FogId::from("FOG00001");
    register_fog_node(&mut server, fog_id, &mut OsRng).unwrap();
    let record = server.fog_record(&fog_id).unwrap().clone();

    let nonce = crypto::random_nonce(&mut OsRng);
    let vehicle_mask = crypto::xor(VehicleId::from("VID00001").as_bytes(), fog_id.as_bytes());
    let m2 = build_m2(&record, &fog_id, &nonce, &vehicle_mask, NOW);

    let mut m3 = M3Message::new();
    handle_m2(&mut server, &m2, &fog_id, NOW, &mut OsRng, &mut m3).unwrap();

    // Replay the fog node's side of M3: unmask r_5 and check Z_i.
    let padded_fog_id = crypto::pad::<DIGEST_LENGTH>(fog_id.as_bytes());
    let shared_xor_id = crypto::xor(&record.shared_secret, &padded_fog_id);
    let confirmation_nonce = crypto::xor(
        &m3.masked_nonce,
        &crypto::digest(&[&shared_xor_id, &nonce]),
    );
    let session_key = crypto::digest(&[
        &record.pseudo_identity,
        &crypto::pad::<DIGEST_LENGTH>(&vehicle_mask),
        &nonce,
        &crypto::xor(&confirmation_nonce, &record.shared_secret),
    ]);
    assert_eq!(
        m3.key_confirmation,
        crypto::digest(&[&session_key, &shared_xor_id])
    );
    assert_eq!(crypto::decode_timestamp(&m3.timestamp), NOW);
}

#[test]
fn handle_m2_caches_key_for_registered_vehicle() {
    let mut server = test_server();
    let fog_id = FogId::from("FOG00001");
    let vehicle_id = VehicleId::from("VID00001");
    register_fog_node(&mut server, fog_id, &mut OsRng).unwrap();
    register_vehicle(&mut server, vehicle_id, &crypto::digest(&[b"pv"]));
    let record = server.fog_record(&fog_id).unwrap().clone();

    let nonce = crypto::random_nonce(&mut OsRng);
    let vehicle_mask = crypto::xor(vehicle_id.as_bytes(), fog_id.as_bytes());
    let m2 = build_m2(&record, &fog_id, &nonce, &vehicle_mask, NOW);

    assert!(server.cached_session_key(&vehicle_id).is_none());
    let mut m3 = M3Message::new();
    handle_m2(&mut server, &m2, &fog_id, NOW, &mut OsRng, &mut m3).unwrap();
    assert!(server.cached_session_key(&vehicle_id).is_some());
}

#[test]
fn handle_m2_skips_cache_for_unknown_vehicle() {
    let mut server = test_server();
    let fog_id = FogId::from("FOG00001");
    let vehicle_id = VehicleId::from("VID-GONE");
    register_fog_node(&mut server, fog_id, &mut OsRng).unwrap();
    let record = server.fog_record(&fog_id).unwrap().clone();

    let nonce = crypto::random_nonce(&mut OsRng);
    let vehicle_mask = crypto::xor(vehicle_id.as_bytes(), fog_id.as_bytes());
    let m2 = build_m2(&record, &fog_id, &nonce, &vehicle_mask, NOW);

    let mut m3 = M3Message::new();
    handle_m2(&mut server, &m2, &fog_id, NOW, &mut OsRng, &mut m3).unwrap();
    assert!(server.cached_session_key(&vehicle_id).is_none());
}

#[test]
fn handle_m2_rejects_unknown_fog_node() {
    let mut server = test_server();
    let fog_id = FogId::from("FOG00001");
    register_fog_node(&mut server, fog_id, &mut OsRng).unwrap();
    let record = server.fog_record(&fog_id).unwrap().clone();

    let nonce = crypto::random_nonce(&mut OsRng);
    let vehicle_mask = [0u8; ID_LENGTH];
    let m2 = build_m2(&record, &fog_id, &nonce, &vehicle_mask, NOW);

    let mut m3 = M3Message::new();
    let unknown = FogId::from("FOG-GONE");
    assert_eq!(
        handle_m2(&mut server, &m2, &unknown, NOW, &mut OsRng, &mut m3),
        Err(VecaError::UnknownFogNode)
    );
}

#[test]
fn handle_m2_rejects_malformed_message() {
    let mut server = test_server();
    let fog_id = FogId::from("FOG00001");
    register_fog_node(&mut server, fog_id, &mut OsRng).unwrap();

    let mut m3 = M3Message::new();
    assert_eq!(
        handle_m2(
            &mut server,
            &[0u8; M2_LENGTH - 1],
            &fog_id,
            NOW,
            &mut OsRng,
            &mut m3,
        ),
        Err(VecaError::InvalidMessage)
    );
}

#[test]
fn handle_m2_rejects_stale_timestamp() {
    let mut server = test_server();
    let fog_id = FogId::from("FOG00001");
    register_fog_node(&mut server, fog_id, &mut OsRng).unwrap();
    let record = server.fog_record(&fog_id).unwrap().clone();

    let nonce = crypto::random_nonce(&mut OsRng);
    let m2 = build_m2(&record, &fog_id, &nonce, &[0u8; ID_LENGTH], NOW);

    let mut m3 = M3Message::new();
    assert_eq!(
        handle_m2(
            &mut server,
            &m2,
            &fog_id,
            NOW + FRESHNESS_WINDOW_SECS + 1,
            &mut OsRng,
            &mut m3,
        ),
        Err(VecaError::Freshness)
    );
}

#[test]
fn handle_m2_rejects_tampered_checksum() {
    let mut server = test_server();
    let fog_id = FogId::from("FOG00001");
    register_fog_node(&mut server, fog_id, &mut OsRng).unwrap();
    let record = server.fog_record(&fog_id).unwrap().clone();

    let nonce = crypto::random_nonce(&mut OsRng);
    let mut m2 = build_m2(&record, &fog_id, &nonce, &[0u8; ID_LENGTH], NOW);
    m2[3 * DIGEST_LENGTH] ^= 0xFF;

    let mut m3 = M3Message::new();
    assert_eq!(
        handle_m2(&mut server, &m2, &fog_id, NOW, &mut OsRng, &mut m3),
        Err(VecaError::Authentication)
    );
}
