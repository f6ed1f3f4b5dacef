//! ICU message templates
//!
//! Supports the subset of ICU MessageFormat used by audit strings: literal text,
//! `{name}` arguments and `{name, plural, =1 {...} other {# ...}}` blocks, where
//! `#` inside a branch stands for the plural argument's value.

use crate::domain::audit::{AuditError, AuditOutcome};
use crate::i18n::plural::{PluralRules, PluralSelector, PluralTable};
use std::collections::BTreeMap;
use std::fmt;

/// A value substituted into a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageValue {
    Count(u64),
    Text(String),
}

impl fmt::Display for MessageValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Named parameters for a template lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageParams {
    values: BTreeMap<String, MessageValue>,
}

impl MessageParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a numeric parameter
    pub fn with_count(mut self, name: impl Into<String>, count: u64) -> Self {
        self.values.insert(name.into(), MessageValue::Count(count));
        self
    }

    /// Add a text parameter
    pub fn with_text(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.values.insert(name.into(), MessageValue::Text(text.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&MessageValue> {
        self.values.get(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Argument(String),
    /// `#` inside a plural branch
    Count,
    Plural {
        argument: String,
        branches: PluralTable<Vec<Segment>>,
    },
}

/// A parsed message template
#[derive(Debug, Clone, PartialEq)]
pub struct MessageTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl MessageTemplate {
    /// Parse a template from ICU source text
    pub fn parse(source: &str) -> AuditOutcome<Self> {
        let mut parser = Parser {
            chars: source.chars().collect(),
            pos: 0,
        };

        let segments = parser
            .parse_message(false)
            .and_then(|segments| match parser.peek() {
                None => Ok(segments),
                Some(_) => Err(format!("unmatched '}}' at offset {}", parser.pos)),
            })
            .map_err(|e| AuditError::catalog(format!("Invalid template \"{source}\": {e}")))?;

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// ICU source text the template was parsed from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render the template with the given parameters
    pub fn format(&self, params: &MessageParams, rules: &dyn PluralRules) -> AuditOutcome<String> {
        let mut output = String::with_capacity(self.source.len());
        render(&self.segments, params, rules, None, &mut output)?;
        Ok(output)
    }
}

fn render(
    segments: &[Segment],
    params: &MessageParams,
    rules: &dyn PluralRules,
    count: Option<u64>,
    output: &mut String,
) -> AuditOutcome<()> {
    for segment in segments {
        match segment {
            Segment::Literal(text) => output.push_str(text),
            Segment::Count => match count {
                Some(n) => output.push_str(&n.to_string()),
                None => output.push('#'),
            },
            Segment::Argument(name) => {
                let value = params
                    .get(name)
                    .ok_or_else(|| AuditError::catalog(format!("Missing value for '{name}'")))?;
                output.push_str(&value.to_string());
            }
            Segment::Plural { argument, branches } => {
                let n = match params.get(argument) {
                    Some(MessageValue::Count(n)) => *n,
                    Some(MessageValue::Text(text)) => text.parse().map_err(|_| {
                        AuditError::catalog(format!(
                            "Plural argument '{argument}' is not a count: {text}"
                        ))
                    })?,
                    None => {
                        return Err(AuditError::catalog(format!(
                            "Missing value for '{argument}'"
                        )))
                    }
                };

                let branch = branches.select(n, rules).ok_or_else(|| {
                    AuditError::catalog(format!("No plural branch for {argument}={n}"))
                })?;
                render(branch, params, rules, Some(n), output)?;
            }
        }
    }
    Ok(())
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), String> {
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(format!("expected '{expected}' but found '{c}' at offset {}", self.pos - 1)),
            None => Err(format!("expected '{expected}' but reached end of template")),
        }
    }

    /// Read a token up to whitespace or a structural character
    fn token(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| !c.is_whitespace() && !matches!(c, '{' | '}' | ','))
        {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// Parse until end of input or an unconsumed closing brace
    fn parse_message(&mut self, in_plural: bool) -> Result<Vec<Segment>, String> {
        let mut segments = Vec::new();
        let mut literal = String::new();

        while let Some(c) = self.peek() {
            match c {
                '}' => break,
                '{' => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(self.parse_argument()?);
                }
                '#' if in_plural => {
                    self.pos += 1;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Count);
                }
                _ => {
                    self.pos += 1;
                    literal.push(c);
                }
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(segments)
    }

    fn parse_argument(&mut self) -> Result<Segment, String> {
        self.expect('{')?;
        self.skip_whitespace();
        let argument = self.token();
        if argument.is_empty() {
            return Err(format!("empty argument name at offset {}", self.pos));
        }
        self.skip_whitespace();

        if self.peek() == Some('}') {
            self.pos += 1;
            return Ok(Segment::Argument(argument));
        }

        self.expect(',')?;
        self.skip_whitespace();
        let kind = self.token();
        if kind != "plural" {
            return Err(format!("unsupported argument type '{kind}' for '{argument}'"));
        }
        self.skip_whitespace();
        self.expect(',')?;

        let mut branches = PluralTable::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('}') => {
                    self.pos += 1;
                    break;
                }
                None => return Err(format!("unterminated plural block for '{argument}'")),
                Some(_) => {}
            }

            let selector: PluralSelector = self.token().parse()?;
            self.skip_whitespace();
            self.expect('{')?;
            let body = self.parse_message(true)?;
            self.expect('}')?;
            branches.insert(selector, body);
        }

        if !branches.has_other() {
            return Err(format!("plural block for '{argument}' has no 'other' branch"));
        }

        Ok(Segment::Plural { argument, branches })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::plural::EnglishPluralRules;
    use rstest::rstest;

    const DISPLAY_VALUE: &str = "{itemCount, plural,
    =1 {1 element found}
    other {# elements found}
    }";

    fn render_count(template: &str, count: u64) -> String {
        MessageTemplate::parse(template)
            .unwrap()
            .format(
                &MessageParams::new().with_count("itemCount", count),
                &EnglishPluralRules,
            )
            .unwrap()
    }

    #[rstest]
    #[case(0, "0 elements found")]
    #[case(1, "1 element found")]
    #[case(2, "2 elements found")]
    #[case(1000, "1000 elements found")]
    fn test_plural_display_value(#[case] count: u64, #[case] expected: &str) {
        assert_eq!(render_count(DISPLAY_VALUE, count), expected);
    }

    #[test]
    fn test_plain_text_is_unchanged() {
        let text = "This is the element. [Learn More](https://web.dev/lighthouse-largest-contentful-paint)";
        assert_eq!(render_count(text, 0), text);
    }

    #[test]
    fn test_argument_substitution() {
        let template = MessageTemplate::parse("Found {label} at {path}").unwrap();
        let params = MessageParams::new()
            .with_text("label", "hero.png")
            .with_text("path", "1,HTML");

        assert_eq!(
            template.format(&params, &EnglishPluralRules).unwrap(),
            "Found hero.png at 1,HTML"
        );
    }

    #[test]
    fn test_pound_outside_plural_is_literal() {
        assert_eq!(render_count("Item #{itemCount}", 4), "Item #4");
    }

    #[test]
    fn test_category_branch_and_text_count() {
        let template =
            MessageTemplate::parse("{n, plural, one {# Element gefunden} other {# Elemente gefunden}}")
                .unwrap();
        let params = MessageParams::new().with_text("n", "1");

        assert_eq!(
            template.format(&params, &EnglishPluralRules).unwrap(),
            "1 Element gefunden"
        );
    }

    #[rstest]
    #[case("{itemCount, plural, =1 {one}}")]
    #[case("{itemCount, select, other {x}}")]
    #[case("{itemCount, plural, other {x}")]
    #[case("unbalanced }")]
    #[case("{}")]
    fn test_invalid_templates(#[case] source: &str) {
        let err = MessageTemplate::parse(source).unwrap_err();
        assert!(matches!(err, AuditError::Catalog { .. }));
    }

    #[test]
    fn test_missing_parameter_is_an_error() {
        let template = MessageTemplate::parse(DISPLAY_VALUE).unwrap();
        assert_eq!(template.source(), DISPLAY_VALUE);

        let err = template
            .format(&MessageParams::new(), &EnglishPluralRules)
            .unwrap_err();

        assert!(err.to_string().contains("itemCount"));
    }
}
