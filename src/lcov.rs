//! LCOV export of ruleset line coverage.
//!
//! Serializes the line numbers collected during coverage verification
//! into the standard LCOV tracefile format, one record per ruleset
//! file, so generic coverage viewers can annotate rule definitions:
//!
//! ```text
//! TN:
//! SF:rules/custom.xml
//! DA:14,1
//! LF:1
//! LH:1
//! end_of_record
//! ```

use std::{collections::BTreeSet, path::PathBuf};

/// Render one record for a ruleset file.
pub fn render_record(rule_file: &std::path::Path, lines: &BTreeSet<usize>) -> String {
    let mut record = String::from("TN:\n");
    record.push_str(&format!("SF:{}\n", rule_file.display()));
    for line in lines {
        record.push_str(&format!("DA:{line},1\n"));
    }
    record.push_str(&format!("LF:{}\n", lines.len()));
    record.push_str(&format!("LH:{}\n", lines.len()));
    record.push_str("end_of_record\n");
    record
}

/// Render records for every verified ruleset into one tracefile.
pub fn render_report(entries: &[(PathBuf, BTreeSet<usize>)]) -> String {
    let mut report = String::new();
    for (path, lines) in entries {
        report.push_str(&render_record(path, lines));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_lists_each_line_once() {
        let lines: BTreeSet<usize> = [14, 7, 14].into_iter().collect();
        let record = render_record(std::path::Path::new("rules/custom.xml"), &lines);
        assert_eq!(
            record,
            "TN:\nSF:rules/custom.xml\nDA:7,1\nDA:14,1\nLF:2\nLH:2\nend_of_record\n"
        );
    }

    #[test]
    fn empty_line_set_still_closes_record() {
        let record = render_record(std::path::Path::new("r.xml"), &BTreeSet::new());
        assert!(record.starts_with("TN:\n"));
        assert!(record.ends_with("LF:0\nLH:0\nend_of_record\n"));
    }
}
