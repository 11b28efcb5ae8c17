use fieldmap::Keyed;
use fieldmap_reflect::{DataError, GenericData, NameCase};
use fieldmap_testhelpers::test;

#[derive(Keyed, Debug, Default, PartialEq)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Keyed, Debug)]
#[allow(dead_code)]
enum GrantType {
    Password,
}

#[test]
fn declared_keys_hit_fields_and_others_overflow() {
    let mut data = GenericData::new(TokenResponse::default()).unwrap();

    assert!(data.insert("access_token", String::from("abc")).unwrap().is_some());
    assert!(data.insert("scope", String::from("read")).unwrap().is_none());
    assert!(data.insert("refresh_token", 7_u32).unwrap().is_none());

    assert_eq!(data.value().access_token, "abc");
    assert_eq!(data.get_as::<String>("scope").map(String::as_str), Some("read"));
    assert_eq!(data.get_as::<u32>("refresh_token"), Some(&7));
    assert_eq!(
        data.keys().collect::<Vec<_>>(),
        ["access_token", "expires_in", "scope", "refresh_token"]
    );
    assert_eq!(data.len(), 4);
}

#[test]
fn overwriting_an_unknown_key_returns_the_old_value() {
    let mut data = GenericData::new(TokenResponse::default()).unwrap();
    data.insert("scope", "a").unwrap();
    let old = data.insert("scope", "b").unwrap().unwrap();
    assert_eq!(old.downcast_ref::<&str>(), Some(&"a"));
    assert_eq!(data.unknown().len(), 1);

    let removed = data.remove_unknown("scope").unwrap();
    assert_eq!(removed.downcast_ref::<&str>(), Some(&"b"));
    assert!(data.get("scope").is_none());
    assert!(data.remove_unknown("access_token").is_none());
}

#[test]
fn declared_keys_still_check_the_type() {
    let mut data = GenericData::new(TokenResponse::default()).unwrap();
    let err = data.insert("expires_in", "soon").unwrap_err();
    assert_eq!(
        err,
        DataError::WrongType {
            key: "expires_in".into(),
            expected: "u64",
        }
    );
    assert!(data.unknown().is_empty());
    assert_eq!(data.into_inner(), TokenResponse::default());
}

#[test]
fn unknown_keys_follow_the_case_mode() {
    let mut data = GenericData::with_case(TokenResponse::default(), NameCase::Insensitive).unwrap();
    data.insert("Token_Type", String::from("bearer")).unwrap();
    data.insert("EXPIRES_IN", 3600_u64).unwrap();

    assert_eq!(data.value().expires_in, 3600);
    assert_eq!(
        data.get_as::<String>("TOKEN_TYPE").map(String::as_str),
        Some("bearer")
    );
    assert_eq!(data.unknown().keys().collect::<Vec<_>>(), ["token_type"]);
}

#[test]
fn data_ref_sees_only_declared_fields() {
    let mut data = GenericData::new(TokenResponse::default()).unwrap();
    data.insert("extra", 1_i8).unwrap();
    data.value_mut().expires_in = 60;

    let view = data.as_data_ref();
    assert_eq!(view.len(), 2);
    assert_eq!(view.get_as::<u64>("expires_in"), Some(&60));
    assert!(view.get("extra").is_none());
    assert!(std::sync::Arc::ptr_eq(view.type_info(), data.type_info()));
}

#[test]
fn enums_are_rejected() {
    let err = GenericData::new(GrantType::Password).unwrap_err();
    assert_eq!(err, DataError::NotAStruct { type_name: "GrantType" });
}
