//! Tests for user value types.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(0)]
#[case(-7)]
fn user_id_rejects_non_positive_values(#[case] raw: i64) {
    assert_eq!(UserId::new(raw), Err(UserValidationError::NonPositiveId));
}

#[rstest]
fn user_id_deserialisation_validates() {
    let ok: UserId = serde_json::from_value(json!(42)).expect("positive id");
    assert_eq!(ok.get(), 42);
    let bad: Result<UserId, _> = serde_json::from_value(json!(0));
    assert!(bad.is_err());
}

#[rstest]
fn user_round_trips_through_json() {
    let user = User::new(UserId::new(3).expect("id"), Username::new("carol"));
    let value = serde_json::to_value(&user).expect("serialise");
    assert_eq!(value, json!({ "id": 3, "username": "carol" }));
    let decoded: User = serde_json::from_value(value).expect("deserialise");
    assert_eq!(decoded, user);
}

#[rstest]
fn user_rejects_unknown_fields() {
    let result: Result<User, _> =
        serde_json::from_value(json!({ "id": 1, "username": "a", "password": "x" }));
    assert!(result.is_err());
}

#[rstest]
#[case("")]
#[case("  ")]
fn password_hash_rejects_blank(#[case] raw: &str) {
    assert_eq!(
        PasswordHash::new(raw),
        Err(UserValidationError::EmptyPasswordHash)
    );
}

#[rstest]
fn password_hash_debug_is_redacted() {
    let hash = PasswordHash::new("$argon2id$v=19$secret").expect("hash");
    let rendered = format!("{hash:?}");
    assert!(!rendered.contains("secret"));
}

#[rstest]
fn new_user_into_record_keeps_fields() {
    let hash = PasswordHash::new("$argon2id$stub").expect("hash");
    let record = NewUser::new(Username::new("dave"), hash.clone())
        .into_record(UserId::new(9).expect("id"));
    assert_eq!(record.user().id().get(), 9);
    assert_eq!(record.user().username().as_str(), "dave");
    assert_eq!(record.password_hash(), &hash);
}
