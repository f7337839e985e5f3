use rosetta_domain::constants::{DATABASE_FORMAT, DEFAULT_DOMAIN, DEFAULT_LOCALE, ENV_PREFIX};

#[test]
fn constants_match_wire_strings() {
    assert_eq!(DEFAULT_LOCALE, "en");
    assert_eq!(DEFAULT_DOMAIN, "messages");
    assert_eq!(DATABASE_FORMAT, "database");
    assert_eq!(ENV_PREFIX, "ROSETTA");
}
