use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        RunanimeError::decode("x")
            .to_string()
            .contains("decode error:")
    );
    assert!(
        RunanimeError::config("x")
            .to_string()
            .contains("config error:")
    );
    assert!(
        RunanimeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
}

#[test]
fn class_predicates_match_variants() {
    assert!(RunanimeError::decode("x").is_decode());
    assert!(!RunanimeError::decode("x").is_config());
    assert!(RunanimeError::config("x").is_config());
    assert!(!RunanimeError::validation("x").is_decode());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = RunanimeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
