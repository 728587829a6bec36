use std::sync::LazyLock;

use regex::Regex;

use super::types::{Conditional, ConditionalKind, FeatureSet, XPathStructure};

/// Node names that follow the primary grammar suffix convention.
static PRIMARY_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:[A-Z][A-Za-z0-9]*)?(?:Statement|Expression|Declaration|Declarator|Node|Block)"
    )
    .expect("valid regex")
});

/// Secondary suffix family (more collision-prone, still boundary-checked).
static SECONDARY_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[A-Z][A-Za-z0-9]*)?(?:Type|Literal|Clause|Body|List|Label)")
        .expect("valid regex")
});

/// Compound camel-case names with at least two humps (`VariableDeclaratorId`).
static COMPOUND_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Z][a-z0-9]*(?:[A-Z][a-z0-9]*)+")
        .expect("valid regex")
});

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@([A-Za-z][A-Za-z0-9]*)").expect("valid regex")
});

static CONNECTIVE_AND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\band\b").expect("valid regex"));

static CONNECTIVE_OR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bor\b").expect("valid regex"));

static NEGATION_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bnot\s*\(").expect("valid regex"));

static IF_FORM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bif\s*\(").expect("valid regex"));

static QUANTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:some|every)\b\s*\$").expect("valid regex")
});

static WORD_OPERATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(div|mod)\b").expect("valid regex"));

static CONNECTIVE_ANY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:and|or|not|if|some|every)\b")
        .expect("valid regex")
});

/// Short node names that carry no grammar suffix.
const KNOWN_SHORT_NAMES: [&str; 12] = [
    "Method",
    "Field",
    "Class",
    "Interface",
    "Enum",
    "Parameter",
    "Variable",
    "Modifier",
    "Annotation",
    "Argument",
    "Resource",
    "Constructor"
];

/// Engine-specific node names missed by the generic families.
const ENGINE_NODE_NAMES: [&str; 14] = [
    "MethodCall",
    "ConstructorCall",
    "FieldAccess",
    "VariableAccess",
    "ArrayAccess",
    "FormalParameter",
    "LambdaParameter",
    "TypeParameter",
    "CatchParameter",
    "EnumConstant",
    "ForInit",
    "ForUpdate",
    "SwitchLabel",
    "CompilationUnit"
];

/// Names that sit in node position syntactically but are really attributes
/// (positional/location/type metadata). Subtracted after every pass.
const ATTRIBUTE_STYLE_NAMES: [&str; 10] = [
    "Image",
    "Name",
    "SimpleName",
    "Type",
    "BeginLine",
    "EndLine",
    "BeginColumn",
    "EndColumn",
    "Line",
    "Column"
];

/// Boolean functions recognized as conditionals.
const BOOLEAN_FUNCTIONS: [&str; 6] =
    ["exists", "empty", "contains", "starts-with", "ends-with", "matches"];

/// Decompose a raw XPath expression into its testable structural features.
///
/// The expression is trimmed first; every reported position is an offset into
/// the trimmed text. Extraction never fails; expressions the patterns do not
/// anticipate simply contribute fewer features.
pub fn extract_structure(expression: &str) -> XPathStructure {
    let expr = expression.trim();
    if expr.is_empty() {
        return XPathStructure::default();
    }
    let mask = quoted_mask(expr);
    XPathStructure {
        node_types:   extract_node_types(expr, &mask),
        attributes:   extract_attributes(expr, &mask),
        operators:    extract_operators(expr, &mask),
        conditionals: extract_conditionals(expr, &mask)
    }
}

/// Per-byte map of string-literal regions so pattern passes never match
/// inside quoted values.
fn quoted_mask(expr: &str) -> Vec<bool> {
    let mut mask = vec![false; expr.len()];
    let mut in_single = false;
    let mut in_double = false;
    for (i, b) in expr.bytes().enumerate() {
        match b {
            b'\'' if !in_double => {
                mask[i] = true;
                in_single = !in_single;
            }
            b'"' if !in_single => {
                mask[i] = true;
                in_double = !in_double;
            }
            _ => mask[i] = in_single || in_double
        }
    }
    mask
}

fn masked(mask: &[bool], index: usize) -> bool {
    mask.get(index).copied().unwrap_or(false)
}

/// Boundary rule shared by every node-type pass: the candidate must follow an
/// axis or structural delimiter (never `@` or a word character) and must end
/// at a delimiter, operator or the end of the expression.
fn node_boundary_ok(expr: &str, start: usize, end: usize) -> bool {
    let before_ok = match expr[..start].chars().next_back() {
        None => true,
        Some(c) => matches!(c, '/' | ':' | '[' | '(' | '|' | ',') || c.is_whitespace()
    };
    let after_ok = match expr[end..].chars().next() {
        None => true,
        Some(c) => !c.is_ascii_alphanumeric() && c != '_' && c != '-' && c != '.'
    };
    before_ok && after_ok
}

fn extract_node_types(expr: &str, mask: &[bool]) -> FeatureSet {
    let mut names = FeatureSet::new();
    for pattern in [&*PRIMARY_SUFFIX, &*SECONDARY_SUFFIX, &*COMPOUND_NAME] {
        for m in pattern.find_iter(expr) {
            if masked(mask, m.start()) || !node_boundary_ok(expr, m.start(), m.end()) {
                continue;
            }
            names.insert(m.as_str().into());
        }
    }
    for token in identifier_tokens(expr) {
        let (word, start, end) = token;
        if masked(mask, start) || !node_boundary_ok(expr, start, end) {
            continue;
        }
        if KNOWN_SHORT_NAMES.contains(&word) || ENGINE_NODE_NAMES.contains(&word) {
            names.insert(word.into());
        }
    }
    for denied in ATTRIBUTE_STYLE_NAMES {
        names.shift_remove(denied);
    }
    names
}

/// Maximal identifier tokens with their byte spans.
fn identifier_tokens(expr: &str) -> Vec<(&str, usize, usize)> {
    let mut tokens = Vec::new();
    let mut start = None;
    for (i, c) in expr.char_indices() {
        let wordish = c.is_ascii_alphanumeric() || c == '_';
        match (start, wordish) {
            (None, true) => start = Some(i),
            (Some(s), false) => {
                tokens.push((&expr[s..i], s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        tokens.push((&expr[s..], s, expr.len()));
    }
    tokens
}

fn extract_attributes(expr: &str, mask: &[bool]) -> FeatureSet {
    let mut attrs = FeatureSet::new();
    for caps in ATTRIBUTE.captures_iter(expr) {
        if let Some(m) = caps.get(1)
            && !masked(mask, m.start())
        {
            attrs.insert(m.as_str().into());
        }
    }
    attrs
}

/// Fixed operator vocabulary. Two-character tokens claim their characters
/// first so `!=` never also reports `=`.
fn extract_operators(expr: &str, mask: &[bool]) -> FeatureSet {
    let mut ops = FeatureSet::new();
    let bytes = expr.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if masked(mask, i) {
            continue;
        }
        let next = bytes.get(i + 1).copied();
        match b {
            b'!' if next == Some(b'=') => {
                ops.insert("!=".into());
            }
            b'<' => {
                ops.insert(if next == Some(b'=') { "<=".into() } else { "<".into() });
            }
            b'>' => {
                ops.insert(if next == Some(b'=') { ">=".into() } else { ">".into() });
            }
            b'=' => {
                let prev = i.checked_sub(1).map(|p| bytes[p]);
                if !matches!(prev, Some(b'!') | Some(b'<') | Some(b'>')) {
                    ops.insert("=".into());
                }
            }
            b'+' => {
                ops.insert("+".into());
            }
            // `*` doubles as the wildcard node test; only the spaced form
            // counts as multiplication. Same for `-`, a legal name character.
            b'*' | b'-' => {
                let prev_space = i.checked_sub(1).map(|p| bytes[p] == b' ').unwrap_or(false);
                let next_space = next == Some(b' ');
                if prev_space && next_space {
                    ops.insert(expr[i..=i].into());
                }
            }
            _ => {}
        }
    }
    for caps in WORD_OPERATOR.captures_iter(expr) {
        if let Some(m) = caps.get(1)
            && !masked(mask, m.start())
        {
            ops.insert(m.as_str().into());
        }
    }
    ops
}

/// Balanced delimiter spans (outside string literals), as `(open, close)`
/// byte indices.
fn delimiter_spans(expr: &str, mask: &[bool], open: u8, close: u8) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut stack = Vec::new();
    for (i, b) in expr.bytes().enumerate() {
        if masked(mask, i) {
            continue;
        }
        if b == open {
            stack.push(i);
        } else if b == close
            && let Some(start) = stack.pop()
        {
            spans.push((start, i));
        }
    }
    spans
}

/// Innermost span containing `pos`, if any.
fn innermost(spans: &[(usize, usize)], pos: usize) -> Option<(usize, usize)> {
    spans
        .iter()
        .filter(|(s, e)| *s < pos && pos < *e)
        .min_by_key(|(s, e)| e - s)
        .copied()
}

fn clause_text(expr: &str, span: Option<(usize, usize)>) -> String {
    match span {
        Some((start, end)) => expr[start + 1..end].trim().to_string(),
        None => expr.to_string()
    }
}

/// True when a predicate clause is a bare comparison: it carries a comparison
/// operator outside string literals but no nested predicate, connective
/// keyword or boolean function call that would claim the clause for another
/// kind.
fn is_plain_comparison(clause: &str) -> bool {
    let mask = quoted_mask(clause);
    let has_op = clause.bytes().enumerate().any(|(i, b)| {
        !masked(&mask, i)
            && match b {
                b'=' | b'<' | b'>' => true,
                b'!' => clause.as_bytes().get(i + 1) == Some(&b'='),
                _ => false
            }
    });
    if !has_op || clause.contains('[') || CONNECTIVE_ANY.is_match(clause) {
        return false;
    }
    !BOOLEAN_FUNCTIONS
        .iter()
        .any(|name| clause.contains(&format!("{name}(")))
}

fn extract_conditionals(expr: &str, mask: &[bool]) -> Vec<Conditional> {
    let brackets = delimiter_spans(expr, mask, b'[', b']');
    let parens = delimiter_spans(expr, mask, b'(', b')');
    let mut found = Vec::new();

    // One conjunction per enclosing clause: the checker re-splits on every
    // top-level `and`, so repeated keywords in one predicate collapse here.
    let mut conjunction_clauses = Vec::new();
    for m in CONNECTIVE_AND.find_iter(expr) {
        if masked(mask, m.start()) {
            continue;
        }
        let span = innermost(&brackets, m.start());
        let key = span.map(|(s, _)| s).unwrap_or(usize::MAX);
        if conjunction_clauses.contains(&key) {
            continue;
        }
        conjunction_clauses.push(key);
        found.push(Conditional {
            kind:       ConditionalKind::Conjunction,
            expression: clause_text(expr, span),
            position:   m.start()
        });
    }

    // Disjunctions scope to their innermost parenthesis group when one
    // exists, so `@A and (@B or @C)` reports the inner group.
    let mut disjunction_clauses = Vec::new();
    for m in CONNECTIVE_OR.find_iter(expr) {
        if masked(mask, m.start()) {
            continue;
        }
        let span = innermost(&parens, m.start()).or_else(|| innermost(&brackets, m.start()));
        let key = span.map(|(s, _)| s).unwrap_or(usize::MAX);
        if disjunction_clauses.contains(&key) {
            continue;
        }
        disjunction_clauses.push(key);
        found.push(Conditional {
            kind:       ConditionalKind::Disjunction,
            expression: clause_text(expr, span),
            position:   m.start()
        });
    }

    for m in NEGATION_CALL.find_iter(expr) {
        if masked(mask, m.start()) {
            continue;
        }
        let open = m.end() - 1;
        let expression = match parens.iter().find(|(s, _)| *s == open) {
            Some((_, end)) => expr[m.start()..=*end].to_string(),
            None => expr[m.start()..].to_string()
        };
        found.push(Conditional {
            kind: ConditionalKind::Negation,
            expression,
            position: m.start()
        });
    }

    for m in IF_FORM.find_iter(expr) {
        if masked(mask, m.start()) {
            continue;
        }
        let span = innermost(&brackets, m.start());
        found.push(Conditional {
            kind:       ConditionalKind::IfExpression,
            expression: clause_text(expr, span),
            position:   m.start()
        });
    }

    for m in QUANTIFIER.find_iter(expr) {
        if masked(mask, m.start()) {
            continue;
        }
        let span = innermost(&brackets, m.start());
        found.push(Conditional {
            kind:       ConditionalKind::Quantified,
            expression: clause_text(expr, span),
            position:   m.start()
        });
    }

    for name in BOOLEAN_FUNCTIONS {
        let needle = format!("{name}(");
        for (start, _) in expr.match_indices(&needle) {
            if masked(mask, start) {
                continue;
            }
            let prev = expr[..start].chars().next_back();
            if prev.is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
                continue;
            }
            let open = start + name.len();
            let expression = match parens.iter().find(|(s, _)| *s == open) {
                Some((_, end)) => expr[start..=*end].to_string(),
                None => expr[start..].to_string()
            };
            found.push(Conditional {
                kind: ConditionalKind::BooleanFunction,
                expression,
                position: start
            });
        }
    }

    // Predicates that compare values without any connective form their own
    // conditional; this is what makes the comparison strategy reachable.
    let mut comparison_clauses = Vec::new();
    for (start, end) in &brackets {
        let clause = clause_text(expr, Some((*start, *end)));
        if clause.is_empty() || !is_plain_comparison(&clause) {
            continue;
        }
        if comparison_clauses.contains(start) {
            continue;
        }
        comparison_clauses.push(*start);
        found.push(Conditional {
            kind:       ConditionalKind::Comparison,
            expression: clause,
            position:   start + 1
        });
    }

    found.sort_by_key(|c| c.position);
    found
}
