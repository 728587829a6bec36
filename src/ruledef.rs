//! Ruleset definition reading.
//!
//! Extracts rule metadata, XPath expressions and worked examples from
//! PMD-style ruleset XML. The file is treated as text: targeted patterns
//! pull out the handful of elements the engine needs, so rulesets with
//! unrelated extensions still read fine and nothing here depends on a
//! full XML parser.
//!
//! # Example
//!
//! ```
//! use xpath_rule_coverage::ruledef::RuleSet;
//!
//! let xml = r#"<ruleset name="demo">
//! <rule name="NoWhile" language="java" message="avoid while loops">
//!   <properties>
//!     <property name="xpath"><value><![CDATA[//WhileStatement]]></value></property>
//!   </properties>
//!   <example><![CDATA[while (true) { } // violation]]></example>
//! </rule>
//! </ruleset>"#;
//!
//! let ruleset = RuleSet::parse(xml, "demo.xml".into()).unwrap();
//! assert_eq!(ruleset.rules.len(), 1);
//! assert_eq!(ruleset.rules[0].xpath, "//WhileStatement");
//! ```

use std::{path::PathBuf, sync::LazyLock};

use compact_str::CompactString;
use regex::Regex;

use crate::error::{AppResult, file_read_error, ruleset_parse_error};

/// Rule blocks with attributes and body. Self-closing references
/// (`<rule ref="..."/>`) carry no body and never match.
static RULE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<rule\s([^>]*)>(.*?)</rule>").expect("valid regex")
});

static RULESET_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<ruleset[^>]*?name="([^"]*)""#).expect("valid regex")
});

static NAME_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"name="([^"]*)""#).expect("valid regex")
});

static LANGUAGE_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"language="([^"]*)""#).expect("valid regex")
});

static MESSAGE_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"message="([^"]*)""#).expect("valid regex")
});

static XPATH_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<property[^>]*name="xpath"[^>]*>.*?<value>(.*?)</value>"#)
        .expect("valid regex")
});

static EXAMPLE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<example>(.*?)</example>").expect("valid regex")
});

static DESCRIPTION_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<description>(.*?)</description>")
        .expect("valid regex")
});

static PRIORITY_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<priority>\s*(\d+)\s*</priority>").expect("valid regex")
});

/// A ruleset file with its XPath-based rules.
#[derive(Debug, Clone)]
pub struct RuleSet {
    /// Ruleset display name
    pub name:  CompactString,
    /// Path the ruleset was read from, reused for line location
    pub path:  PathBuf,
    /// Rules in declaration order
    pub rules: Vec<RuleDefinition>
}

/// One rule extracted from a ruleset file.
#[derive(Debug, Clone)]
pub struct RuleDefinition {
    /// Rule name attribute
    pub name:        CompactString,
    /// Target language attribute, empty when absent
    pub language:    CompactString,
    /// Violation message attribute, empty when absent
    pub message:     String,
    /// Rule description element, empty when absent
    pub description: String,
    /// Priority element when present
    pub priority:    Option<u8>,
    /// Trimmed XPath expression from the xpath property, empty when the
    /// rule declares none
    pub xpath:       String,
    /// Worked example snippets in declaration order
    pub examples:    Vec<String>
}

impl RuleSet {
    /// Read and parse a ruleset file.
    pub fn load(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let text = std::fs::read_to_string(&path)
            .map_err(|e| file_read_error(&path.to_string_lossy(), e))?;
        Self::parse(&text, path)
    }

    /// Parse ruleset text. Fails only when no rule elements are present;
    /// individual rules missing an xpath property are kept and reported
    /// by the caller.
    pub fn parse(text: &str, path: PathBuf) -> AppResult<Self> {
        let rules: Vec<RuleDefinition> = RULE_BLOCK
            .captures_iter(text)
            .map(|caps| {
                let attrs = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                let body = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
                parse_rule(attrs, body)
            })
            .collect();
        if rules.is_empty() {
            return Err(ruleset_parse_error(format!(
                "no <rule> elements found in '{}'",
                path.display()
            )));
        }
        let name = first_capture(&RULESET_NAME, text)
            .map(CompactString::from)
            .unwrap_or_else(|| CompactString::const_new("unnamed"));
        Ok(Self {
            name,
            path,
            rules
        })
    }

    /// Rules that declare an XPath expression.
    pub fn xpath_rules(&self) -> impl Iterator<Item = &RuleDefinition> {
        self.rules.iter().filter(|rule| !rule.xpath.is_empty())
    }
}

impl RuleDefinition {
    /// All example snippets joined into the single corpus the coverage
    /// checkers match against.
    pub fn aggregated_examples(&self) -> String {
        self.examples.join("\n")
    }

    pub fn has_examples(&self) -> bool {
        !self.examples.is_empty()
    }
}

fn parse_rule(attrs: &str, body: &str) -> RuleDefinition {
    let xpath = first_capture(&XPATH_VALUE, body)
        .map(|value| strip_cdata(value).to_string())
        .unwrap_or_default();
    let examples = EXAMPLE_BLOCK
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|m| strip_cdata(m.as_str()).to_string())
        .filter(|example| !example.is_empty())
        .collect();
    RuleDefinition {
        name: first_capture(&NAME_ATTR, attrs)
            .map(CompactString::from)
            .unwrap_or_else(|| CompactString::const_new("unnamed")),
        language: first_capture(&LANGUAGE_ATTR, attrs)
            .map(CompactString::from)
            .unwrap_or_default(),
        message: first_capture(&MESSAGE_ATTR, attrs)
            .map(str::to_string)
            .unwrap_or_default(),
        description: first_capture(&DESCRIPTION_BLOCK, body)
            .map(|d| d.trim().to_string())
            .unwrap_or_default(),
        priority: first_capture(&PRIORITY_VALUE, body).and_then(|p| p.parse().ok()),
        xpath,
        examples
    }
}

fn first_capture<'a>(pattern: &Regex, text: &'a str) -> Option<&'a str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Inner text of an optional CDATA wrapper, trimmed either way.
fn strip_cdata(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("<![CDATA[")
        .and_then(|rest| rest.strip_suffix("]]>"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

/// 1-based lines of an example snippet flagged as violations.
///
/// A line commented `// violation` is a flagged case; `// no violation`
/// marks clean code and is excluded.
pub fn example_violation_lines(example: &str) -> Vec<usize> {
    example
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let lowered = line.to_lowercase();
            lowered.contains("violation") && !lowered.contains("no violation")
        })
        .map(|(index, _)| index + 1)
        .collect()
}
