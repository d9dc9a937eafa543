//! Splitting templates into literal text and expressions

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ExpressionError;

static BRACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{(.+?)\}").unwrap());

static TYPE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([.\w=+<>]+)(\[(.+?)\])?(@([^.]*))?$").unwrap());

static METHOD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.+)\((.*)\)$").unwrap());

/// A piece of a parsed template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text copied to the output verbatim
    Literal(&'a str),
    /// Text between braces, without the braces
    Expression(&'a str),
}

/// Split a template into literal and expression segments.
///
/// Expressions are the shortest non-empty `{...}` spans; `{}` stays literal.
pub fn parse_template(template: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;
    for caps in BRACE_RE.captures_iter(template) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            segments.push(Segment::Literal(&template[last..whole.start()]));
        }
        segments.push(Segment::Expression(inner.as_str()));
        last = whole.end();
    }
    if last < template.len() {
        segments.push(Segment::Literal(&template[last..]));
    }
    segments
}

/// Trailing annotation on the last member, controlling the output prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Annotation {
    #[default]
    None,
    /// `:` prefixes the output with the expression text and a space
    Colon,
    /// `=` prefixes the output with the expression text
    Equals,
}

impl Annotation {
    pub fn prefix(&self, expression_text: &str) -> String {
        match self {
            Annotation::None => String::new(),
            Annotation::Colon => format!("{} ", expression_text),
            Annotation::Equals => expression_text.to_string(),
        }
    }
}

/// A parsed `{Type.Member...}` expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    /// Text between the braces, untrimmed
    pub text: String,
    /// The type reference, e.g. `Player`, `Player[1a:0]`, `Celeste.Player@Celeste`
    pub type_text: String,
    /// Member chain left to evaluate
    pub members: Vec<String>,
    pub annotation: Annotation,
    /// Helper transform popped off the end of the chain
    pub helper: Option<String>,
}

/// Parse the text of one expression.
///
/// `is_helper` decides whether the final member names a helper transform.
pub fn parse_expression(
    text: &str,
    is_helper: impl Fn(&str) -> bool,
) -> Result<Expression, ExpressionError> {
    let segments: Vec<&str> = text
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if segments.len() <= 1 {
        return Err(ExpressionError::MissingMember);
    }

    // With an assembly qualifier the type name may itself contain dots
    let type_len = if text.contains('@') {
        segments
            .iter()
            .position(|s| s.contains('@'))
            .map_or(1, |index| index + 1)
    } else {
        1
    };
    let type_text = segments[..type_len].join(".");
    let mut members: Vec<String> = segments[type_len..].iter().map(|s| s.to_string()).collect();

    let Some(last) = members.last_mut() else {
        return Err(ExpressionError::MissingMember);
    };
    let annotation = if let Some(stripped) = last.strip_suffix(':') {
        *last = stripped.trim().to_string();
        Annotation::Colon
    } else if let Some(stripped) = last.strip_suffix('=') {
        *last = stripped.trim().to_string();
        Annotation::Equals
    } else {
        Annotation::None
    };

    let helper = match members.last() {
        Some(name) if is_helper(name) => members.pop(),
        _ => None,
    };

    Ok(Expression {
        text: text.to_string(),
        type_text,
        members,
        annotation,
        helper,
    })
}

/// A parsed type reference: `base[entityId]@assembly`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeReference {
    pub base: String,
    /// Stable id filter, empty when absent
    pub entity_id: String,
    /// Module qualifier, empty meaning "any module"
    pub assembly: String,
}

impl TypeReference {
    /// Compound registry key prefix: `base@assembly`
    pub fn key(&self) -> String {
        format!("{}@{}", self.base, self.assembly)
    }
}

pub fn parse_type_reference(text: &str) -> Result<TypeReference, ExpressionError> {
    let caps = TYPE_NAME_RE
        .captures(text)
        .ok_or_else(|| ExpressionError::invalid_type_name(text))?;
    let group = |i: usize| caps.get(i).map_or("", |m| m.as_str()).to_string();
    Ok(TypeReference {
        base: group(1),
        entity_id: group(3),
        assembly: group(5),
    })
}

/// Split a `name(args)` member token into name and argument text
pub fn split_call(token: &str) -> Option<(&str, &str)> {
    let caps = METHOD_RE.captures(token)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_helpers(_: &str) -> bool {
        false
    }

    #[test]
    fn test_template_without_expressions() {
        assert_eq!(
            parse_template("Speed: none {}"),
            vec![Segment::Literal("Speed: none {}")]
        );
    }

    #[test]
    fn test_template_segments() {
        assert_eq!(
            parse_template("a {X.Y} b{Z.W}"),
            vec![
                Segment::Literal("a "),
                Segment::Expression("X.Y"),
                Segment::Literal(" b"),
                Segment::Expression("Z.W"),
            ]
        );
    }

    #[test]
    fn test_shortest_match() {
        assert_eq!(
            parse_template("{A.B}}"),
            vec![Segment::Expression("A.B"), Segment::Literal("}")]
        );
    }

    #[test]
    fn test_missing_member() {
        assert_eq!(
            parse_expression("Player", no_helpers),
            Err(ExpressionError::MissingMember)
        );
        assert_eq!(
            parse_expression("Player. .", no_helpers),
            Err(ExpressionError::MissingMember)
        );
        assert_eq!(
            parse_expression("Celeste.Player@Celeste", no_helpers),
            Err(ExpressionError::MissingMember)
        );
    }

    #[test]
    fn test_simple_chain() {
        let expr = parse_expression(" Player . Speed . X ", no_helpers).unwrap();
        assert_eq!(expr.type_text, "Player");
        assert_eq!(expr.members, vec!["Speed", "X"]);
        assert_eq!(expr.annotation, Annotation::None);
        assert_eq!(expr.text, " Player . Speed . X ");
    }

    #[test]
    fn test_assembly_qualified_type() {
        let expr = parse_expression("Celeste.Player@Celeste.Speed", no_helpers).unwrap();
        assert_eq!(expr.type_text, "Celeste.Player@Celeste");
        assert_eq!(expr.members, vec!["Speed"]);
    }

    #[test]
    fn test_annotations() {
        let colon = parse_expression("Player.Speed:", no_helpers).unwrap();
        assert_eq!(colon.annotation, Annotation::Colon);
        assert_eq!(colon.members, vec!["Speed"]);
        assert_eq!(colon.annotation.prefix(&colon.text), "Player.Speed: ");

        let equals = parse_expression("Player.Speed =", no_helpers).unwrap();
        assert_eq!(equals.annotation, Annotation::Equals);
        assert_eq!(equals.members, vec!["Speed"]);
        assert_eq!(equals.annotation.prefix(&equals.text), "Player.Speed =");
    }

    #[test]
    fn test_helper_is_popped() {
        let expr = parse_expression("Player.dashCooldownTimer.toFrame():", |name| {
            name == "toFrame()"
        })
        .unwrap();
        assert_eq!(expr.members, vec!["dashCooldownTimer"]);
        assert_eq!(expr.helper.as_deref(), Some("toFrame()"));
        assert_eq!(expr.annotation, Annotation::Colon);
    }

    #[test]
    fn test_type_reference_parts() {
        let reference = parse_type_reference("Strawberry[1a:3]@Celeste").unwrap();
        assert_eq!(reference.base, "Strawberry");
        assert_eq!(reference.entity_id, "1a:3");
        assert_eq!(reference.assembly, "Celeste");
        assert_eq!(reference.key(), "Strawberry@Celeste");

        let bare = parse_type_reference("Level+Nested").unwrap();
        assert_eq!(bare.key(), "Level+Nested@");
        assert!(bare.entity_id.is_empty());
    }

    #[test]
    fn test_invalid_type_reference() {
        assert!(matches!(
            parse_type_reference("Pla yer"),
            Err(ExpressionError::InvalidTypeName { .. })
        ));
    }

    #[test]
    fn test_split_call() {
        assert_eq!(split_call("GetType()"), Some(("GetType", "")));
        assert_eq!(split_call("CollideCheck(x)"), Some(("CollideCheck", "x")));
        assert_eq!(split_call("Speed"), None);
    }
}
