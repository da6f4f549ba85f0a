use cookie_guard::{
    Cookie, Signer,
    crypto::{Key, MacAlgorithm},
    errors::{DecodeError, EncodeError},
    marker::MARKER_LEN,
};

use crate::helpers::{cookie, key};

fn signer() -> Signer {
    Signer::new(key())
}

#[test]
fn round_trip() {
    for algorithm in [MacAlgorithm::Sha256, MacAlgorithm::Sha384, MacAlgorithm::Sha512] {
        let signer = Signer::with_algorithm(key(), algorithm);
        for value in ["en", "", "with spaces; and = signs", "ünïcödé ✓"] {
            let original = cookie("language", value);
            let signed = signer.sign(&original).unwrap();
            assert!(signer.is_signed(&signed));
            assert_eq!(signer.validate(&signed).unwrap(), original);
        }
    }
}

#[test]
fn signed_values_stay_readable() {
    let signer = signer();
    let signed = signer.sign(&cookie("language", "en")).unwrap();
    let marker = signer.marker("language");

    // <marker><hex-encoded HMAC-SHA256 tag><marker><value>
    let value = signed.value();
    assert_eq!(value.len(), MARKER_LEN + 64 + MARKER_LEN + 2);
    assert!(value.starts_with(marker.as_str()));
    assert!(value.ends_with(&format!("{}en", marker.as_str())));
    assert!(signed.encodes_value());
}

#[test]
fn signing_twice_fails() {
    let signer = signer();
    let signed = signer.sign(&cookie("a", "value")).unwrap();
    assert!(matches!(
        signer.sign(&signed).unwrap_err(),
        EncodeError::AlreadyProtected(_)
    ));
}

#[test]
fn validating_a_plain_value_fails() {
    let err = signer().validate(&cookie("a", "value")).unwrap_err();
    assert!(matches!(err, DecodeError::NotProtected(_)));
}

#[test]
fn any_change_after_the_marker_is_detected() {
    let signer = signer();
    let signed = signer.sign(&cookie("a", "value")).unwrap();
    let value = signed.value();

    for i in MARKER_LEN..value.len() {
        let mut bytes = value.as_bytes().to_vec();
        bytes[i] = if bytes[i] == b'x' { b'y' } else { b'x' };
        let tampered = signed.with_value(String::from_utf8(bytes).unwrap());
        let err = signer.validate(&tampered).unwrap_err();
        assert!(
            matches!(err, DecodeError::Tampered(_)),
            "Changing byte {i} was not detected: {err:?}"
        );
    }

    let extended = signed.with_value(format!("{value}!"));
    assert!(matches!(
        signer.validate(&extended).unwrap_err(),
        DecodeError::Tampered(_)
    ));
}

#[test]
fn signatures_cannot_be_replayed_under_a_different_name() {
    let signer = signer();
    let signed_b = signer.sign(&cookie("b", "admin")).unwrap();

    // Same value, different name: the marker doesn't match.
    let moved = Cookie::new("a", signed_b.value()).unwrap();
    assert!(matches!(
        signer.validate(&moved).unwrap_err(),
        DecodeError::NotProtected(_)
    ));

    // Swapping the outer marker isn't enough: the authenticated message
    // is bound to the original name.
    let envelope = &signed_b.value()[MARKER_LEN..];
    let forged = Cookie::new("a", format!("{}{envelope}", signer.marker("a").as_str())).unwrap();
    assert!(signer.is_signed(&forged));
    assert!(matches!(
        signer.validate(&forged).unwrap_err(),
        DecodeError::Tampered(_)
    ));
}

#[test]
fn a_different_key_or_algorithm_fails_validation() {
    let signed = signer().sign(&cookie("a", "value")).unwrap();

    let other_key = Signer::new(Key::try_from_bytes("another key").unwrap());
    assert!(matches!(
        other_key.validate(&signed).unwrap_err(),
        DecodeError::Tampered(_)
    ));

    let other_algorithm = Signer::with_algorithm(key(), MacAlgorithm::Sha512);
    assert!(matches!(
        other_algorithm.validate(&signed).unwrap_err(),
        DecodeError::Tampered(_)
    ));
}

#[test]
fn signed_cookies_survive_the_wire() {
    let signer = signer();
    let signed = signer.sign(&cookie("a", "hello world")).unwrap();
    let parsed = Cookie::parse(&signed.to_string()).unwrap();
    assert_eq!(signer.validate(&parsed).unwrap().value(), "hello world");
}

#[test]
fn encryptor_and_signer_markers_differ() {
    let encryptor = cookie_guard::Encryptor::new(key());
    assert_ne!(encryptor.marker("a"), signer().marker("a"));
}
