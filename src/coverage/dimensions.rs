//! Coverage checkers for the node-type, attribute and operator dimensions.
//!
//! Coverage is established against the lower-cased concatenation of all
//! example snippets. Well-known names carry their own demonstration
//! heuristic; every other name falls through to the default arm of the
//! same table, a case-insensitive substring search:
//!
//! | Name shape | Demonstrated by |
//! |------------|-----------------|
//! | `InfixExpression`, `UnaryExpression` | any operator symbol |
//! | `*Literal` | numeric, string, boolean or null literal syntax |
//! | `*Modifier*` | a modifier keyword (`static`, `final`, ...) |
//! | `*Annotation*` | an `@word` token |
//! | `ForStatement`, `WhileStatement`, ... | the loop keyword |
//! | `ConditionalExpression` | a `? ... :` ternary pattern |
//! | `MethodDeclaration` | a `type name(` signature pattern |
//! | nested/inner class names | brace-depth class nesting scan |
//! | anything else | the name itself as substring |
//!
//! Missing items are reported as a "Missing:" bullet list; when a
//! [`LocatorContext`] is supplied each missing item is annotated with
//! its ruleset line and the line is recorded in the [`LineAccumulator`].

use std::sync::LazyLock;

use regex::Regex;

use super::{
    locate::LocatorContext,
    types::{CoverageEvidence, Dimension, LineAccumulator}
};
use crate::xpath::FeatureSet;

const OPERATOR_SYMBOLS: [&str; 9] = ["+", "-", "*", "/", "%", "<", ">", "=", "!"];
const MODIFIER_KEYWORDS: [&str; 5] = ["static", "final", "public", "private", "protected"];

static ANNOTATION_USE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@[a-z_][a-z0-9_]*").expect("valid regex")
});

static TERNARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\?[^:\n?]*:").expect("valid regex")
});

static METHOD_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-z_][a-z0-9_<>\[\], ]*\s+[a-z_][a-z0-9_]*\s*\(")
        .expect("valid regex")
});

static CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-z_][a-z0-9_]*\s*\(").expect("valid regex")
});

static CAST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\s*[a-z_][a-z0-9_]*\s*\)\s*[a-z_(]")
        .expect("valid regex")
});

static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-z_][a-z0-9_<>\[\]]*\s+[a-z_][a-z0-9_]*\s*[=;]")
        .expect("valid regex")
});

/// Check that every extracted node type is demonstrated by the examples
pub fn check_node_types(
    node_types: &FeatureSet,
    example_text: &str,
    locator: Option<&LocatorContext<'_>>,
    lines: &mut LineAccumulator
) -> CoverageEvidence {
    let corpus = example_text.to_lowercase();
    check_dimension(Dimension::NodeType, node_types, "", locator, lines, |name| {
        demonstrates_node_type(name, &corpus)
    })
}

/// Check that every referenced attribute is demonstrated by the examples
pub fn check_attributes(
    attributes: &FeatureSet,
    example_text: &str,
    locator: Option<&LocatorContext<'_>>,
    lines: &mut LineAccumulator
) -> CoverageEvidence {
    let corpus = example_text.to_lowercase();
    check_dimension(Dimension::Attribute, attributes, "@", locator, lines, |name| {
        demonstrates_attribute(name, &corpus)
    })
}

/// Check that every operator token appears in the examples
pub fn check_operators(
    operators: &FeatureSet,
    example_text: &str,
    locator: Option<&LocatorContext<'_>>,
    lines: &mut LineAccumulator
) -> CoverageEvidence {
    let corpus = example_text.to_lowercase();
    check_dimension(Dimension::Operator, operators, "", locator, lines, |op| {
        corpus.contains(&op.to_lowercase())
    })
}

/// Shared found/missing accounting for the three plain dimensions.
///
/// `token_prefix` restores the syntax the item carries in the ruleset
/// (`@` for attributes) so the locator searches for the spelled form.
fn check_dimension<F>(
    dimension: Dimension,
    items: &FeatureSet,
    token_prefix: &str,
    locator: Option<&LocatorContext<'_>>,
    lines: &mut LineAccumulator,
    demonstrates: F
) -> CoverageEvidence
where
    F: Fn(&str) -> bool
{
    let mut missing = Vec::new();
    let mut found = 0usize;
    for item in items {
        if demonstrates(item) {
            found += 1;
            continue;
        }
        let token = format!("{token_prefix}{item}");
        let line = locator.and_then(|context| context.locate_token(&token));
        if let Some(number) = line {
            lines.record(number);
        }
        missing.push((token, line));
    }
    CoverageEvidence::new(dimension, found, items.len(), missing_description(&missing))
}

/// Render the "Missing:" bullet list, empty when nothing is missing.
fn missing_description(missing: &[(String, Option<usize>)]) -> String {
    if missing.is_empty() {
        return String::new();
    }
    let mut description = String::from("Missing:");
    for (token, line) in missing {
        match line {
            Some(number) => description.push_str(&format!("\n  - {token} (line {number})")),
            None => description.push_str(&format!("\n  - {token}"))
        }
    }
    description
}

/// Per-name demonstration table for node types. The final arm is the
/// substring fallback; keeping it inside the same match keeps known and
/// unknown names on one dispatch path.
///
/// Shared with the conditional sub-clause checker, which meets node
/// types inside conjunction clauses.
pub(super) fn demonstrates_node_type(name: &str, corpus: &str) -> bool {
    let lowered = name.to_lowercase();
    match lowered.as_str() {
        "numericliteral" => corpus.chars().any(|c| c.is_ascii_digit()),
        "stringliteral" => corpus.contains('"'),
        "booleanliteral" => corpus.contains("true") || corpus.contains("false"),
        "nullliteral" => corpus.contains("null"),
        "forstatement" | "foreachstatement" | "forinit" | "forupdate" => corpus.contains("for"),
        "whilestatement" => corpus.contains("while"),
        "dostatement" => corpus.contains("do"),
        "ifstatement" => corpus.contains("if"),
        "switchstatement" | "switchexpression" | "switchlabel" => corpus.contains("switch"),
        "trystatement" => corpus.contains("try"),
        "catchclause" | "catchparameter" => corpus.contains("catch"),
        "finallyclause" => corpus.contains("finally"),
        "throwstatement" => corpus.contains("throw"),
        "returnstatement" => corpus.contains("return"),
        "breakstatement" => corpus.contains("break"),
        "continuestatement" => corpus.contains("continue"),
        "synchronizedstatement" => corpus.contains("synchronized"),
        "assertstatement" => corpus.contains("assert"),
        "instanceofexpression" => corpus.contains("instanceof"),
        "conditionalexpression" | "ternaryexpression" => TERNARY.is_match(corpus),
        "methoddeclaration" | "constructordeclaration" => METHOD_SIGNATURE.is_match(corpus),
        "methodcall" | "constructorcall" => CALL.is_match(corpus),
        "fieldaccess" => corpus.contains('.'),
        "castexpression" | "casttype" => CAST.is_match(corpus),
        "classdeclaration" | "classorinterfacedeclaration" => {
            corpus.contains("class") || corpus.contains("interface")
        }
        "enumdeclaration" => corpus.contains("enum"),
        "importdeclaration" => corpus.contains("import"),
        "packagedeclaration" => corpus.contains("package"),
        "fielddeclaration" | "localvariabledeclaration" | "variabledeclarator"
        | "variabledeclaratorid" => DECLARATION.is_match(corpus),
        "lambdaexpression" | "lambdaparameter" => corpus.contains("->"),
        n if n.contains("infix") || n.contains("binary") || n.contains("unary") => {
            OPERATOR_SYMBOLS.iter().any(|symbol| corpus.contains(symbol))
        }
        n if n.contains("literal") => has_literal_syntax(corpus),
        n if n.contains("modifier") => {
            MODIFIER_KEYWORDS.iter().any(|keyword| corpus.contains(keyword))
        }
        n if n.contains("annotation") => ANNOTATION_USE.is_match(corpus),
        n if n.contains("assignment") => corpus.contains('='),
        n if n.contains("array") => corpus.contains('['),
        n if n.contains("nested") || n.contains("inner") => has_nested_class(corpus),
        other => corpus.contains(other)
    }
}

/// Per-name demonstration table for attributes, same default-arm layout.
pub(super) fn demonstrates_attribute(name: &str, corpus: &str) -> bool {
    let lowered = name.to_lowercase();
    match lowered.as_str() {
        "static" | "final" | "public" | "private" | "protected" | "abstract" | "native"
        | "synchronized" | "volatile" | "transient" | "default" | "strictfp" => {
            corpus.contains(lowered.as_str())
        }
        "visibility" => MODIFIER_KEYWORDS.iter().any(|keyword| corpus.contains(keyword)),
        "arraytype" => corpus.contains('['),
        other => corpus.contains(other)
    }
}

fn has_literal_syntax(corpus: &str) -> bool {
    corpus.chars().any(|c| c.is_ascii_digit())
        || corpus.contains('"')
        || corpus.contains('\'')
        || corpus.contains("true")
        || corpus.contains("false")
        || corpus.contains("null")
}

/// Brace-depth scan: a `class` keyword opening inside the braces of an
/// earlier `class` keyword means the examples nest classes.
fn has_nested_class(corpus: &str) -> bool {
    let mut depth = 0usize;
    let mut outer_class_depth: Option<usize> = None;
    let bytes = corpus.as_bytes();
    let mut index = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b'c' if corpus[index..].starts_with("class") && is_word_bounded(corpus, index, 5) => {
                match outer_class_depth {
                    Some(outer) if depth > outer => return true,
                    Some(_) => {}
                    None => outer_class_depth = Some(depth)
                }
                index += 5;
                continue;
            }
            _ => {}
        }
        index += 1;
    }
    false
}

fn is_word_bounded(corpus: &str, start: usize, len: usize) -> bool {
    let before_ok = start == 0
        || !corpus[..start]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
    let after_ok = !corpus[start + len..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
    before_ok && after_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_class_requires_depth_increase() {
        assert!(has_nested_class("class a { class b { } }"));
        assert!(!has_nested_class("class a { } class b { }"));
        assert!(!has_nested_class("class a { void m() { } }"));
    }

    #[test]
    fn nested_class_ignores_identifier_substrings() {
        assert!(!has_nested_class("class a { int classcount; }"));
    }

    #[test]
    fn literal_syntax_detects_each_form() {
        assert!(has_literal_syntax("int x = 5;"));
        assert!(has_literal_syntax(r#"string s = "hi";"#));
        assert!(has_literal_syntax("object o = null;"));
        assert!(!has_literal_syntax("void m() {}"));
    }
}
