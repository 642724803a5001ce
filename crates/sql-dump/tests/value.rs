//! Tests for writing values as SQL literals
//!

use sql_dump::{SqlValue, quote_identifier};

#[test]
fn null_is_bare() {
    assert_eq!(SqlValue::Null.to_string(), "NULL");
    assert_eq!(SqlValue::Text("NULL".to_string()).to_string(), "'NULL'");
}

#[test]
fn numbers_are_unquoted_without_grouping() {
    assert_eq!(SqlValue::Int(1000).to_string(), "1000");
    assert_eq!(SqlValue::Int(-42).to_string(), "-42");
    assert_eq!(SqlValue::UInt(18_446_744_073_709_551_615).to_string(), "18446744073709551615");
    assert_eq!(SqlValue::Float(12.5).to_string(), "12.5");
    assert!(SqlValue::Int(7).is_numeric());
}

#[test]
fn whole_floats_keep_a_decimal_point() {
    assert_eq!(SqlValue::Float(1000.0).to_string(), "1000.0");
    assert_eq!(SqlValue::Float(-3.0).to_string(), "-3.0");
    assert_eq!(SqlValue::Float(0.0).to_string(), "0.0");
    assert_eq!(SqlValue::Float(1e20).to_string(), "100000000000000000000.0");
}

#[test]
fn non_finite_floats_are_quoted() {
    assert_eq!(SqlValue::Float(f64::NAN).to_string(), "'NaN'");
    assert_eq!(SqlValue::Float(f64::INFINITY).to_string(), "'inf'");
    assert!(!SqlValue::Float(f64::NAN).is_numeric());
}

#[test]
fn single_quotes_are_doubled() {
    assert_eq!(SqlValue::Text("O'Brien".to_string()).to_string(), "'O''Brien'");
    assert_eq!(SqlValue::Text("''".to_string()).to_string(), "''''''");
}

#[test]
fn nothing_else_is_escaped() {
    assert_eq!(
        SqlValue::Text("back\\slash \"double\"\nnewline".to_string()).to_string(),
        "'back\\slash \"double\"\nnewline'"
    );
}

#[test]
fn bytes_are_written_as_text() {
    assert_eq!(SqlValue::Bytes(b"it's".to_vec()).to_string(), "'it''s'");
    assert_eq!(SqlValue::Bytes(vec![0xff]).to_string(), "'\u{fffd}'");
}

#[test]
fn identifiers_are_backticked() {
    assert_eq!(quote_identifier("orders"), "`orders`");
    assert_eq!(quote_identifier("odd`name"), "`odd``name`");
}
