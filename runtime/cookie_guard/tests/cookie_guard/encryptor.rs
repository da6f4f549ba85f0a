use cookie_guard::{
    Cookie, Encryptor, SameSite,
    crypto::Key,
    errors::{DecodeError, EncodeError},
    marker::MARKER_LEN,
};

use crate::helpers::{cookie, key};

fn encryptor() -> Encryptor {
    Encryptor::new(key())
}

#[test]
fn round_trip() {
    let encryptor = encryptor();
    for value in ["raw123", "", "with spaces; and = signs", "ünïcödé ✓"] {
        let original = cookie("secretToken", value);
        let encrypted = encryptor.encode(&original).unwrap();
        assert_ne!(encrypted.value(), value);
        assert!(encryptor.is_protected(&encrypted));

        let decrypted = encryptor.decode(&encrypted).unwrap();
        assert_eq!(decrypted.value(), value);
    }
}

#[test]
fn encrypted_values_start_with_the_marker_and_are_wire_safe() {
    let encryptor = encryptor();
    let encrypted = encryptor.encode(&cookie("a", "value")).unwrap();
    let marker = encryptor.marker("a");
    assert!(encrypted.value().starts_with(marker.as_str()));
    assert!(encrypted.value().len() > MARKER_LEN);
    assert!(!encrypted.encodes_value());
    assert!(
        encrypted.value()[MARKER_LEN..]
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    );
}

#[test]
fn attributes_are_preserved() {
    let encryptor = encryptor();
    let original = cookie("a", "value")
        .with_domain("example.com")
        .unwrap()
        .with_same_site(SameSite::Strict);
    let encrypted = encryptor.encode(&original).unwrap();
    assert_eq!(encrypted.domain(), Some("example.com"));
    assert_eq!(encrypted.same_site(), Some(SameSite::Strict));

    let decrypted = encryptor.decode(&encrypted).unwrap();
    assert_eq!(decrypted, original);
}

#[test]
fn encryption_is_randomized() {
    let encryptor = encryptor();
    let original = cookie("a", "value");
    let first = encryptor.encode(&original).unwrap();
    let second = encryptor.encode(&original).unwrap();
    assert_ne!(first.value(), second.value());
}

#[test]
fn encoding_twice_fails() {
    let encryptor = encryptor();
    let encrypted = encryptor.encode(&cookie("a", "value")).unwrap();
    let err = encryptor.encode(&encrypted).unwrap_err();
    assert!(matches!(err, EncodeError::AlreadyProtected(_)));
}

#[test]
fn decoding_a_plain_value_fails() {
    let encryptor = encryptor();
    let err = encryptor.decode(&cookie("a", "raw123")).unwrap_err();
    assert!(matches!(err, DecodeError::NotProtected(_)));
    insta::assert_snapshot!(err.to_string(), @"The value of the `a` cookie is not protected");

    // A bare marker, with no payload, is not a protected value either.
    let bare = cookie("a", encryptor.marker("a").as_str());
    assert!(!encryptor.is_protected(&bare));
    assert!(matches!(
        encryptor.decode(&bare).unwrap_err(),
        DecodeError::NotProtected(_)
    ));
}

#[test]
fn any_change_to_the_payload_is_detected() {
    let encryptor = encryptor();
    let encrypted = encryptor.encode(&cookie("a", "value")).unwrap();
    let value = encrypted.value();

    for i in MARKER_LEN..value.len() {
        let mut bytes = value.as_bytes().to_vec();
        bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
        let tampered = encrypted.with_raw_value(String::from_utf8(bytes).unwrap());
        let err = encryptor.decode(&tampered).unwrap_err();
        assert!(
            matches!(err, DecodeError::Tampered(_)),
            "Changing byte {i} was not detected: {err:?}"
        );
    }

    for suffix in ["A", "%41", "=="] {
        let tampered = encrypted.with_raw_value(format!("{value}{suffix}"));
        let err = encryptor.decode(&tampered).unwrap_err();
        assert!(matches!(err, DecodeError::Tampered(_)));
    }

    let truncated = encrypted.with_raw_value(&value[..value.len() - 1]);
    assert!(matches!(
        encryptor.decode(&truncated).unwrap_err(),
        DecodeError::Tampered(_)
    ));
}

#[test]
fn any_change_to_the_marker_makes_the_value_unprotected() {
    let encryptor = encryptor();
    let encrypted = encryptor.encode(&cookie("a", "value")).unwrap();
    let mut bytes = encrypted.value().as_bytes().to_vec();
    bytes[0] = if bytes[0] == b'0' { b'1' } else { b'0' };
    let tampered = encrypted.with_raw_value(String::from_utf8(bytes).unwrap());
    assert!(!encryptor.is_protected(&tampered));
    assert!(matches!(
        encryptor.decode(&tampered).unwrap_err(),
        DecodeError::NotProtected(_)
    ));
}

#[test]
fn values_cannot_be_moved_across_cookie_names() {
    let encryptor = encryptor();
    let encrypted = encryptor.encode(&cookie("a", "value")).unwrap();
    let moved = Cookie::new("b", "").unwrap().with_raw_value(encrypted.value());
    assert!(!encryptor.is_protected(&moved));
    assert!(matches!(
        encryptor.decode(&moved).unwrap_err(),
        DecodeError::NotProtected(_)
    ));
}

#[test]
fn a_different_key_cannot_decrypt() {
    let encrypted = encryptor().encode(&cookie("a", "value")).unwrap();
    let other = Encryptor::new(Key::try_from_bytes("another key").unwrap());
    // The marker doesn't depend on the key.
    assert!(other.is_protected(&encrypted));
    let err = other.decode(&encrypted).unwrap_err();
    assert!(matches!(err, DecodeError::Tampered(_)));
    insta::assert_snapshot!(err.to_string(), @"The value of the `a` cookie was tampered with");
}

#[test]
fn encrypted_cookies_survive_the_wire() {
    let encryptor = encryptor();
    let encrypted = encryptor.encode(&cookie("a", "value")).unwrap();
    let parsed = Cookie::parse(&encrypted.to_string()).unwrap();
    assert_eq!(encryptor.decode(&parsed).unwrap().value(), "value");
}
