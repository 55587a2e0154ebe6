use windbridge::BridgeError;
use windbridge::core::protocol::{NULL_VALUE, parse_line};

#[test]
fn test_parse_valid_line() {
    let update = parse_line("Property Wind.Center double 0.753").unwrap();
    assert_eq!(update.name, "Wind.Center");
    assert_eq!(update.type_tag, "double");
    assert_eq!(update.raw_value, "0.753");
    assert!(!update.is_null());
    assert_eq!(update.numeric_value().unwrap(), 0.753);
}

#[test]
fn test_value_keeps_internal_whitespace() {
    let update = parse_line("Property Session.Name string Race at Monza").unwrap();
    assert_eq!(update.name, "Session.Name");
    assert_eq!(update.type_tag, "string");
    assert_eq!(update.raw_value, "Race at Monza");
}

#[test]
fn test_whitespace_runs_between_fields_are_tolerated() {
    let update = parse_line("Property  Wind.Center   double  1.5").unwrap();
    assert_eq!(update.name, "Wind.Center");
    assert_eq!(update.type_tag, "double");
    assert_eq!(update.raw_value, "1.5");
}

#[test]
fn test_null_sentinel_is_recognized() {
    let update = parse_line("Property Wind.Center double (null)").unwrap();
    assert!(update.is_null());
    assert_eq!(update.raw_value, NULL_VALUE);
}

#[test]
fn test_non_property_lines_yield_no_update() {
    assert!(parse_line("").is_none());
    assert!(parse_line("Prop Wind.Center double 1").is_none());
    assert!(parse_line("property Wind.Center double 1").is_none());
    assert!(parse_line("PropertyWind.Center double 1").is_none());
    assert!(parse_line("Subscribed Wind.Center").is_none());
}

#[test]
fn test_short_lines_yield_no_update() {
    assert!(parse_line("Property").is_none());
    assert!(parse_line("Property Wind.Center").is_none());
    assert!(parse_line("Property Wind.Center double").is_none());
    assert!(parse_line("Property Wind.Center double ").is_none());
}

#[test]
fn test_non_numeric_value_is_a_typed_error() {
    let update = parse_line("Property Wind.Center double oops").unwrap();
    let err = update.numeric_value().unwrap_err();
    assert!(matches!(err, BridgeError::InvalidValue(v) if v == "oops"));
}

#[test]
fn test_negative_and_integer_values_parse() {
    let update = parse_line("Property Wind.Center double -1").unwrap();
    assert_eq!(update.numeric_value().unwrap(), -1.0);
    let update = parse_line("Property Wind.Center int 42").unwrap();
    assert_eq!(update.numeric_value().unwrap(), 42.0);
}
