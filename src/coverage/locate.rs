//! Line location for uncovered features.
//!
//! Maps a structural feature of an XPath expression back to the 1-based
//! line in the ruleset file where it was declared. Three strategies run
//! in sequence, first hit wins:
//!
//! | Tier | Strategy | Works when |
//! |------|----------|------------|
//! | 1 | [`same_line_strategy`] | declaration, value and token share one line |
//! | 2 | [`section_strategy`] | token sits on its own line inside the xpath property |
//! | 3 | [`offset_strategy`] | token offset in the expression maps onto the CDATA block |
//!
//! Every failure mode (missing file, unfamiliar markup, token not found)
//! yields `None`; a feature without a line annotation is still reported.

use std::path::Path;

use crate::{cache, xpath::Conditional};

/// Attribute marking the xpath property element
const XPATH_PROPERTY: &str = "name=\"xpath\"";
/// Opening marker of the expression value element
const VALUE_OPEN: &str = "<value>";
/// Closing marker of the expression value element
const VALUE_CLOSE: &str = "</value>";
/// Raw-text wrapper that may precede the expression body
const CDATA_OPEN: &str = "<![CDATA[";

/// Where a rule's expression lives on disk, paired with the expression
/// itself for the offset fallback.
#[derive(Debug, Clone, Copy)]
pub struct LocatorContext<'a> {
    rule_path:  &'a Path,
    expression: &'a str
}

impl<'a> LocatorContext<'a> {
    pub fn new(rule_path: &'a Path, expression: &'a str) -> Self {
        Self {
            rule_path,
            expression
        }
    }

    /// Line of a node-type, attribute or operator token.
    pub fn locate_token(&self, token: &str) -> Option<usize> {
        let text = cache::file_text(self.rule_path)?;
        same_line_strategy(&text, token)
            .or_else(|| section_strategy(&text, token))
            .or_else(|| {
                let offset = self.expression.trim().find(token)?;
                offset_strategy(&text, self.expression, offset)
            })
    }

    /// Line of a conditional clause.
    ///
    /// Connective-carrying kinds search for the clause prefixed with its
    /// keyword, and the section scan runs backward so the innermost of
    /// nested clauses wins.
    pub fn locate_conditional(&self, conditional: &Conditional) -> Option<usize> {
        let text = cache::file_text(self.rule_path)?;
        let pattern = match conditional.kind.connective() {
            Some(connective) => format!("{connective} {}", conditional.expression),
            None => conditional.expression.clone()
        };
        section_strategy_backward(&text, &pattern)
            .or_else(|| offset_strategy(&text, self.expression, conditional.position))
    }
}

/// Tier 1: a single line carrying the property marker, the value marker
/// and the token verbatim.
fn same_line_strategy(text: &str, token: &str) -> Option<usize> {
    text.lines()
        .position(|line| {
            line.contains(XPATH_PROPERTY) && line.contains(VALUE_OPEN) && line.contains(token)
        })
        .map(|index| index + 1)
}

/// Tier 2: first line containing the token between the property marker
/// and the closing value marker.
fn section_strategy(text: &str, token: &str) -> Option<usize> {
    let mut inside = false;
    for (index, line) in text.lines().enumerate() {
        if line.contains(XPATH_PROPERTY) {
            inside = true;
            continue;
        }
        if inside {
            if line.contains(token) {
                return Some(index + 1);
            }
            if line.contains(VALUE_CLOSE) {
                inside = false;
            }
        }
    }
    None
}

/// Tier 2 for conditionals: same section bounds, scanned from the end of
/// the file toward the start. The markers flip roles when walking
/// backward, a section is entered at its closing value marker.
fn section_strategy_backward(text: &str, pattern: &str) -> Option<usize> {
    let lines: Vec<&str> = text.lines().collect();
    let mut inside = false;
    for (index, line) in lines.iter().enumerate().rev() {
        if line.contains(VALUE_CLOSE) {
            inside = true;
            continue;
        }
        if line.contains(XPATH_PROPERTY) {
            inside = false;
            continue;
        }
        if inside && line.contains(pattern) {
            return Some(index + 1);
        }
    }
    None
}

/// Tier 3: map a character offset in the trimmed expression onto the
/// file by counting the newlines before it and adding the line where the
/// value content begins.
fn offset_strategy(text: &str, expression: &str, offset: usize) -> Option<usize> {
    let trimmed = expression.trim();
    if offset > trimmed.len() {
        return None;
    }
    let newlines = trimmed[..offset].matches('\n').count();
    Some(value_content_line(text)? + newlines)
}

/// 1-based line where the expression body starts: the line after the
/// value marker, skipping a raw-text wrapper that sits alone on it.
fn value_content_line(text: &str) -> Option<usize> {
    let lines: Vec<&str> = text.lines().collect();
    let property = lines.iter().position(|line| line.contains(XPATH_PROPERTY))?;
    let value = lines[property..]
        .iter()
        .position(|line| line.contains(VALUE_OPEN))?
        + property;
    let mut content = value + 1;
    if lines.get(content).is_some_and(|line| line.trim() == CDATA_OPEN) {
        content += 1;
    }
    Some(content + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULESET: &str = r#"<rule name="NoStaticFields">
  <properties>
    <property name="xpath">
      <value>
<![CDATA[
//FieldDeclaration
    [@Static = true()
    and @Final = true()]
]]>
      </value>
    </property>
  </properties>
</rule>"#;

    #[test]
    fn section_scan_finds_token_line() {
        assert_eq!(section_strategy(RULESET, "FieldDeclaration"), Some(6));
    }

    #[test]
    fn section_scan_stops_at_value_close() {
        assert_eq!(section_strategy(RULESET, "properties"), None);
    }

    #[test]
    fn backward_scan_prefers_later_line() {
        assert_eq!(section_strategy_backward(RULESET, "and @Final = true()"), Some(8));
    }

    #[test]
    fn offset_maps_through_cdata_wrapper() {
        let expression = "\n//FieldDeclaration\n    [@Static = true()\n    and @Final = true()]\n";
        let trimmed = expression.trim();
        let offset = trimmed.find("@Final").unwrap();
        assert_eq!(offset_strategy(RULESET, expression, offset), Some(8));
    }

    #[test]
    fn same_line_requires_all_three_markers() {
        let compact =
            r#"<property name="xpath"><value><![CDATA[//WhileStatement]]></value></property>"#;
        assert_eq!(same_line_strategy(compact, "WhileStatement"), Some(1));
        assert_eq!(same_line_strategy(RULESET, "FieldDeclaration"), None);
    }
}
