// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use xpath_rule_coverage::error::{
    config_error, engine_error, file_read_error, file_write_error, report_parse_error,
    ruleset_parse_error, testgen_error
};

#[test]
fn test_file_read_error() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error = file_read_error("/path/to/rules.xml", io_error);
    let _msg = error.to_string();
}

#[test]
fn test_file_write_error() {
    let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let error = file_write_error("/path/to/coverage.lcov", io_error);
    let _msg = error.to_string();
}

#[test]
fn test_ruleset_parse_error() {
    let error = ruleset_parse_error("no <rule> elements found in 'rules.xml'");
    let _msg = error.to_string();
}

#[test]
fn test_config_error() {
    let error = config_error("XPATH_COVERAGE_ENGINE_TIMEOUT must be a number");
    let _msg = error.to_string();
}

#[test]
fn test_engine_error() {
    let error = engine_error("Engine exited with code 2: bad ruleset");
    let _msg = error.to_string();
}

#[test]
fn test_report_parse_error() {
    let error = report_parse_error("expected value at line 1 column 1");
    let _msg = error.to_string();
}

#[test]
fn test_testgen_error() {
    let error = testgen_error("Failed to create source directory: disk full");
    let _msg = error.to_string();
}
