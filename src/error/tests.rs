//! Unit tests for error handling

use super::*;
use std::io;

#[test]
fn test_json_error_conversion() {
    let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
    let error = FfdbError::from(json_error);

    match error {
        FfdbError::Json(_) => (),
        _ => panic!("Expected Json error variant"),
    }
}

#[test]
fn test_io_error_conversion() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
    let error = FfdbError::from(io_error);

    match error {
        FfdbError::Io(_) => (),
        _ => panic!("Expected Io error variant"),
    }
}

#[test]
fn test_database_error_conversion() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    let db_error = conn.execute("SELECT * FROM missing_table", []).unwrap_err();
    let error = FfdbError::from(db_error);

    match error {
        FfdbError::Database(_) => (),
        _ => panic!("Expected Database error variant"),
    }
}

#[test]
fn test_parse_int_error_conversion() {
    let parse_error = "abc".parse::<u16>().unwrap_err();
    let error = FfdbError::from(parse_error);

    match error {
        FfdbError::ParseInt(_) => (),
        _ => panic!("Expected ParseInt error variant"),
    }
}

#[test]
fn test_csv_error_conversion() {
    #[derive(Debug, serde::Deserialize)]
    #[allow(dead_code)]
    struct Row {
        value: u32,
    }

    let mut reader = csv::Reader::from_reader("value\nnot-a-number\n".as_bytes());
    let csv_error = reader.deserialize::<Row>().next().unwrap().unwrap_err();
    let error = FfdbError::from(csv_error);

    match error {
        FfdbError::Csv(_) => (),
        _ => panic!("Expected Csv error variant"),
    }
}

#[test]
fn test_invalid_parameter_message() {
    let error = FfdbError::invalid_parameter("week", "must be between 1 and 22");
    assert_eq!(
        error.to_string(),
        "Invalid value for 'week': must be between 1 and 22"
    );
    assert!(error.is_client_error());
}

#[test]
fn test_server_side_errors_are_not_client_errors() {
    let errors = vec![
        FfdbError::LockPoisoned,
        FfdbError::Config {
            message: "bad".to_string(),
        },
        FfdbError::Provider {
            provider: "nflverse".to_string(),
            message: "empty".to_string(),
        },
        FfdbError::Job {
            message: "panicked".to_string(),
        },
    ];

    for error in errors {
        assert!(!error.is_client_error(), "{error} should be a server error");
    }
}

#[test]
fn test_provider_error_display() {
    let error = FfdbError::Provider {
        provider: "salary API".to_string(),
        message: "missing salary column".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "salary API returned an unusable payload: missing salary column"
    );
}
