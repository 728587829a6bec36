pub use masterror::{AppError, AppResult};

/// Create file read error
pub fn file_read_error(path: &str, source: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to read file '{}': {}", path, source))
}

/// Create file write error
pub fn file_write_error(path: &str, source: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to write file '{}': {}", path, source))
}

/// Create ruleset parse error
pub fn ruleset_parse_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(format!("Ruleset parse error:\n  {}", message.into()))
}

/// Create config error
pub fn config_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}

/// Create external engine error
pub fn engine_error(message: impl Into<String>) -> AppError {
    AppError::service(message.into())
}

/// Create engine report parse error
pub fn report_parse_error(message: impl Into<String>) -> AppError {
    AppError::service(format!("Engine report parse error: {}", message.into()))
}

/// Create test synthesis error
pub fn testgen_error(message: impl Into<String>) -> AppError {
    AppError::internal(message.into())
}
