use cookie_guard::crypto::MacAlgorithm;
use cookie_guard::{CookieGuardConfig, ProtectionAction, ProtectionPolicy, ProtectionRule, Signer};
use figment::Figment;
use figment::providers::{Format, Yaml};
use googletest::prelude::*;

use crate::helpers::{KEY, cookie, key};

fn extract(yaml: &str) -> std::result::Result<CookieGuardConfig, figment::Error> {
    Figment::new().merge(Yaml::string(yaml)).extract()
}

#[googletest::test]
fn the_full_configuration_can_be_deserialized() {
    let config = extract(&format!(
        r#"
key: "{KEY}"
mac_algorithm: sha512
rules:
  - pattern: "secret*"
    action: encrypt
  - pattern: "name_[1-9]"
    action: sign
"#
    ))
    .unwrap();

    expect_that!(config.mac_algorithm == MacAlgorithm::Sha512, eq(true));
    let expected = vec![
        ProtectionRule::encrypt("secret*"),
        ProtectionRule::sign("name_[1-9]"),
    ];
    expect_that!(config.rules == expected, eq(true));
}

#[googletest::test]
fn only_the_key_is_required() {
    let config = extract(&format!("key: \"{KEY}\"")).unwrap();
    expect_that!(config.mac_algorithm == MacAlgorithm::Sha256, eq(true));
    expect_that!(config.rules.is_empty(), eq(true));

    expect_that!(extract("rules: []").is_err(), eq(true));
    expect_that!(extract("key: \"\"").is_err(), eq(true));
}

#[googletest::test]
fn unknown_algorithms_and_actions_are_rejected() {
    expect_that!(
        extract(&format!("key: \"{KEY}\"\nmac_algorithm: md5")).is_err(),
        eq(true)
    );
    expect_that!(
        extract(&format!(
            "key: \"{KEY}\"\nrules:\n  - pattern: \"a\"\n    action: hide"
        ))
        .is_err(),
        eq(true)
    );
}

#[googletest::test]
fn a_policy_can_be_built_from_configuration() {
    let config = CookieGuardConfig::new(key())
        .mac_algorithm(MacAlgorithm::Sha384)
        .rule(ProtectionRule::encrypt("secret*"))
        .rule(ProtectionRule::sign("*"));
    let policy = ProtectionPolicy::try_from(&config).unwrap();

    expect_that!(
        policy.action_for("secretToken") == Some(ProtectionAction::Encrypt),
        eq(true)
    );
    expect_that!(
        policy.action_for("theme") == Some(ProtectionAction::Sign),
        eq(true)
    );

    let signed = policy.signer().sign(&cookie("theme", "dark")).unwrap();
    let sha384 = Signer::with_algorithm(key(), MacAlgorithm::Sha384);
    expect_that!(sha384.validate(&signed).is_ok(), eq(true));
    expect_that!(policy.decode(signed).unwrap().value(), eq("dark"));
}

#[googletest::test]
fn rules_use_snake_case_on_the_wire() {
    let rule: ProtectionRule =
        serde_json::from_value(serde_json::json!({ "pattern": "id_*", "action": "sign" })).unwrap();
    expect_that!(rule == ProtectionRule::sign("id_*"), eq(true));

    let json = serde_json::to_string(&ProtectionRule::encrypt("secret*")).unwrap();
    expect_that!(json.as_str(), eq(r#"{"pattern":"secret*","action":"encrypt"}"#));
}
