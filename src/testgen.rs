//! Test source synthesis from rule examples.
//!
//! The external engine analyzes files on disk, so every example snippet
//! is written out as a parseable compilation unit. Snippets that already
//! declare a type pass through untouched; member-level snippets gain a
//! wrapping class; statement-level snippets gain a wrapping class and
//! method. Violation labels are read back from the wrapped text, so the
//! line shift introduced by wrapping never skews the comparison.

use std::{
    path::{Path, PathBuf},
    sync::LazyLock
};

use regex::Regex;
use tempfile::TempDir;

use crate::error::{AppResult, testgen_error};

/// Snippet already declares a type.
static TYPE_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:class|interface|enum|record)\s+\w+")
        .expect("valid regex")
});

/// Snippet starts at member level (a method or constructor with a body).
static MEMBER_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\w<>\[\]]+\s+\w+\s*\([^)]*\)\s*\{")
        .expect("valid regex")
});

/// One synthesized source file.
#[derive(Debug)]
pub struct GeneratedFile {
    /// Where the file was written
    pub path: PathBuf,
    /// Full written text, annotations included
    pub text: String
}

/// Synthesized sources for one rule, removed with the temp directory.
#[derive(Debug)]
pub struct GeneratedSources {
    dir:       TempDir,
    /// Files in example order
    pub files: Vec<GeneratedFile>
}

impl GeneratedSources {
    /// Directory the engine should be pointed at.
    pub fn dir_path(&self) -> &Path {
        self.dir.path()
    }
}

/// Write each example of a rule as a compilable source file.
pub fn synthesize(rule_name: &str, examples: &[String]) -> AppResult<GeneratedSources> {
    let dir = TempDir::new()
        .map_err(|e| testgen_error(format!("Failed to create source directory: {e}")))?;
    let mut files = Vec::with_capacity(examples.len());
    for (index, example) in examples.iter().enumerate() {
        let class_name = format!("{}Example{index}", sanitize_identifier(rule_name));
        let text = wrap_snippet(example, &class_name);
        let path = dir.path().join(format!("{class_name}.java"));
        std::fs::write(&path, &text)
            .map_err(|e| testgen_error(format!("Failed to write '{}': {e}", path.display())))?;
        files.push(GeneratedFile {
            path,
            text
        });
    }
    Ok(GeneratedSources {
        dir,
        files
    })
}

/// Wrap a snippet into a parseable compilation unit.
pub fn wrap_snippet(snippet: &str, class_name: &str) -> String {
    let trimmed = snippet.trim_end();
    if TYPE_DECL.is_match(trimmed) {
        return format!("{trimmed}\n");
    }
    if MEMBER_DECL.is_match(trimmed) {
        return format!("class {class_name} {{\n{trimmed}\n}}\n");
    }
    format!("class {class_name} {{\n    void example() {{\n{trimmed}\n    }}\n}}\n")
}

fn sanitize_identifier(name: &str) -> String {
    let cleaned: String = name.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    if cleaned.is_empty() {
        String::from("Rule")
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_snippet_passes_through() {
        let snippet = "class Foo {\n    int x;\n}";
        assert_eq!(wrap_snippet(snippet, "Demo"), "class Foo {\n    int x;\n}\n");
    }

    #[test]
    fn member_snippet_gains_class() {
        let snippet = "void run() {\n    int x = 1; // violation\n}";
        let wrapped = wrap_snippet(snippet, "Demo");
        assert!(wrapped.starts_with("class Demo {"));
        assert!(wrapped.contains("void run()"));
        assert!(wrapped.trim_end().ends_with('}'));
    }

    #[test]
    fn statement_snippet_gains_class_and_method() {
        let wrapped = wrap_snippet("while (true) { } // violation", "Demo");
        assert!(wrapped.contains("void example()"));
        assert!(wrapped.contains("while (true)"));
    }

    #[test]
    fn sanitizer_strips_non_identifier_chars() {
        assert_eq!(sanitize_identifier("No-While.Loops"), "NoWhileLoops");
        assert_eq!(sanitize_identifier("--"), "Rule");
    }
}
