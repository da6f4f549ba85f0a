use cookie_guard::CookieCollection;
use googletest::{
    expect_that,
    prelude::{eq, none, some},
};
use http::HeaderMap;
use itertools::Itertools;

use crate::helpers::{cookie, set_cookie_headers, set_cookies};

#[googletest::test]
fn basic_operations() {
    let mut cookies = CookieCollection::new();
    expect_that!(cookies.is_empty(), eq(true));

    cookies.add(cookie("a", "1"));
    cookies.add(cookie("b", "2"));
    expect_that!(cookies.len(), eq(2));
    expect_that!(cookies.has("a"), eq(true));
    expect_that!(cookies.has("c"), eq(false));
    expect_that!(cookies.value("b"), some(eq("2")));
    expect_that!(cookies.value("c"), none());
    expect_that!(cookies.value_or("c", "fallback"), eq("fallback"));

    let removed = cookies.remove("a");
    expect_that!(removed.as_ref().map(|c| c.value()), some(eq("1")));
    expect_that!(cookies.has("a"), eq(false));
    expect_that!(cookies.remove("a").is_none(), eq(true));

    cookies.clear();
    expect_that!(cookies.is_empty(), eq(true));
}

#[test]
fn adding_a_cookie_with_an_existing_name_replaces_it() {
    let mut cookies = CookieCollection::new();
    cookies.add(cookie("a", "1"));
    cookies.add(cookie("a", "2"));
    assert_eq!(cookies.len(), 1);
    assert_eq!(cookies.value("a"), Some("2"));
}

#[test]
fn contains_compares_every_attribute() {
    let mut cookies = CookieCollection::new();
    cookies.add(cookie("a", "1"));
    assert!(cookies.contains(&cookie("a", "1")));
    assert!(!cookies.contains(&cookie("a", "2")));
    assert!(!cookies.contains(&cookie("a", "1").with_domain("example.com").unwrap()));
}

#[test]
fn exists_checks_a_predicate() {
    let cookies = CookieCollection::from_pairs([("a", "1"), ("b", "2")]).unwrap();
    assert!(cookies.exists(|c| c.value() == "2"));
    assert!(!cookies.exists(|c| c.value() == "3"));
}

#[test]
fn expire_only_touches_the_named_cookie() {
    let mut cookies = CookieCollection::from_pairs([("a", "1"), ("b", "2")]).unwrap();
    cookies.expire("a");
    cookies.expire("missing");
    assert!(cookies.get("a").unwrap().is_expired());
    assert!(!cookies.get("b").unwrap().is_expired());
    assert_eq!(cookies.len(), 2);
}

#[test]
fn bulk_mutation() {
    let mut cookies = CookieCollection::from_pairs([("a", "1"), ("b", "2")]).unwrap();
    cookies.for_each_mut(|c| c.with_value(format!("{}!", c.value())));
    assert_eq!(cookies.value("a"), Some("1!"));
    assert_eq!(cookies.value("b"), Some("2!"));

    cookies.retain(|c| c.name() != "a");
    assert_eq!(cookies.names().collect_vec(), vec!["b"]);
}

#[test]
fn names_follow_insertion_order() {
    let cookies = CookieCollection::from_pairs([("z", "1"), ("a", "2"), ("m", "3")]).unwrap();
    assert_eq!(cookies.names().collect_vec(), vec!["z", "a", "m"]);
    assert_eq!(
        cookies.iter().map(|c| c.value()).collect_vec(),
        vec!["1", "2", "3"]
    );
}

#[test]
fn from_pairs_rejects_invalid_names() {
    assert!(CookieCollection::from_pairs([("ok", "1"), ("not ok", "2")]).is_err());
}

#[test]
fn from_headers_parses_every_set_cookie_header() {
    let headers = set_cookie_headers(&["a=1; Path=/", "b=hello%20world; Secure"]);
    let cookies = CookieCollection::from_headers(&headers).unwrap();
    assert_eq!(cookies.len(), 2);
    assert_eq!(cookies.get("a").unwrap().path(), Some("/"));
    assert_eq!(cookies.value("b"), Some("hello world"));
    assert!(cookies.get("b").unwrap().is_secure());
}

#[test]
fn from_headers_fails_on_malformed_headers() {
    let headers = set_cookie_headers(&["a=1", "=2"]);
    assert!(CookieCollection::from_headers(&headers).is_err());
}

#[test]
fn append_to_keeps_existing_headers() {
    let mut headers = set_cookie_headers(&["existing=1"]);
    let cookies = CookieCollection::from_pairs([("a", "1")]).unwrap();
    cookies.append_to(&mut headers).unwrap();
    assert_eq!(
        set_cookies(&headers),
        vec![
            "existing=1".to_owned(),
            "a=1; Path=/; Secure; HttpOnly; SameSite=Lax".to_owned()
        ]
    );
}

#[test]
fn set_to_replaces_existing_headers() {
    let mut headers = set_cookie_headers(&["existing=1"]);
    let cookies = CookieCollection::from_pairs([("a", "1")]).unwrap();
    cookies.set_to(&mut headers).unwrap();
    assert_eq!(
        set_cookies(&headers),
        vec!["a=1; Path=/; Secure; HttpOnly; SameSite=Lax".to_owned()]
    );

    CookieCollection::new().set_to(&mut headers).unwrap();
    assert_eq!(headers, HeaderMap::new());
}
