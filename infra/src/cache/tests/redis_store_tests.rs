use crate::cache::redis_store::namespaced;

#[test]
fn test_keys_without_prefix_are_unchanged() {
    assert_eq!(namespaced(None, "otp:alice@gmail.com"), "otp:alice@gmail.com");
}

#[test]
fn test_prefix_is_joined_once() {
    assert_eq!(namespaced(Some("staging"), "block:1.2.3.4"), "staging:block:1.2.3.4");
    assert_eq!(namespaced(Some("staging:"), "block:1.2.3.4"), "staging:block:1.2.3.4");
}
