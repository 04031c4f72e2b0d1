use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::steps::error::{PlaceholderTypeError, RegistryError, StepError};

// ============================================================================
// Placeholders and arguments
// ============================================================================

/// Typed hole in a step pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placeholder {
    /// `{word}`: one whitespace-free token
    Word,
    /// `{string}`: text in single or double quotes
    String,
    /// `{int}`: signed integer
    Int,
}

impl Placeholder {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "word" => Some(Placeholder::Word),
            "string" => Some(Placeholder::String),
            "int" => Some(Placeholder::Int),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Placeholder::Word => "word",
            Placeholder::String => "string",
            Placeholder::Int => "int",
        }
    }

    /// Capture group for this placeholder. Wider than the type so a mistyped
    /// value is reported as a type error rather than "undefined". An unquoted
    /// `{string}` value may span several words.
    fn capture(&self) -> &'static str {
        match self {
            Placeholder::Word | Placeholder::Int => r"(\S+)",
            Placeholder::String => r#"("[^"]*"|'[^']*'|.+?)"#,
        }
    }

    fn convert(&self, position: usize, raw: &str) -> Result<StepArg, PlaceholderTypeError> {
        let type_error = || PlaceholderTypeError {
            position,
            expected: self.name().to_string(),
            value: raw.to_string(),
        };

        match self {
            Placeholder::Word => Ok(StepArg::Word(raw.to_string())),
            Placeholder::Int => raw.parse::<i64>().map(StepArg::Int).map_err(|_| type_error()),
            Placeholder::String => unquote(raw).map(StepArg::Text).ok_or_else(type_error),
        }
    }
}

fn unquote(raw: &str) -> Option<String> {
    if raw.len() < 2 {
        return None;
    }
    let first = raw.chars().next()?;
    let last = raw.chars().last()?;
    if (first != '"' && first != '\'') || first != last {
        return None;
    }
    let inner = &raw[1..raw.len() - 1];
    (!inner.contains(first)).then(|| inner.to_string())
}

/// A converted step argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepArg {
    Word(String),
    Text(String),
    Int(i64),
}

/// Arguments extracted from a matched phrase, in placeholder order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepArgs(Vec<StepArg>);

impl StepArgs {
    pub fn new(args: Vec<StepArg>) -> Self {
        StepArgs(args)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StepArg> {
        self.0.get(index)
    }

    /// Argument `index` as text (`{word}` or `{string}`).
    pub fn str(&self, index: usize) -> Result<&str, StepError> {
        match self.0.get(index) {
            Some(StepArg::Word(s)) | Some(StepArg::Text(s)) => Ok(s),
            Some(StepArg::Int(_)) => Err(StepError::Other(format!("argument {} is an integer, not text", index))),
            None => Err(StepError::Other(format!("step has no argument {}", index))),
        }
    }

    /// Argument `index` as an integer (`{int}`).
    pub fn int(&self, index: usize) -> Result<i64, StepError> {
        match self.0.get(index) {
            Some(StepArg::Int(n)) => Ok(*n),
            Some(_) => Err(StepError::Other(format!("argument {} is text, not an integer", index))),
            None => Err(StepError::Other(format!("step has no argument {}", index))),
        }
    }
}

// ============================================================================
// Pattern compilation
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Hole(Placeholder),
}

/// A compiled step pattern such as `I search for {string}`.
///
/// Patterns are anchored to the whole phrase and whitespace runs compare
/// equal to a single space.
#[derive(Debug, Clone)]
pub struct StepPattern {
    source: String,
    segments: Vec<Segment>,
    regex: Regex,
    literal_len: usize,
    shape: String,
}

impl StepPattern {
    pub fn parse(source: &str) -> Result<Self, RegistryError> {
        let invalid = |reason: &str| RegistryError::InvalidPattern {
            pattern: source.to_string(),
            reason: reason.to_string(),
        };

        let normalized = normalize_phrase(source);
        if normalized.is_empty() {
            return Err(invalid("pattern is empty"));
        }

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = normalized.chars();
        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for n in chars.by_ref() {
                        if n == '}' {
                            closed = true;
                            break;
                        }
                        name.push(n);
                    }
                    if !closed {
                        return Err(invalid("unclosed '{'"));
                    }
                    let placeholder = Placeholder::from_name(&name)
                        .ok_or_else(|| invalid(&format!("unknown placeholder {{{}}}", name)))?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Hole(placeholder));
                }
                '}' => return Err(invalid("unmatched '}'")),
                _ => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        let mut expr = String::from("^");
        let mut shape = String::new();
        let mut literal_len = 0;
        for segment in &segments {
            match segment {
                Segment::Literal(text) => {
                    expr.push_str(&regex::escape(text));
                    shape.push_str(text);
                    literal_len += text.chars().filter(|c| !c.is_whitespace()).count();
                }
                Segment::Hole(placeholder) => {
                    expr.push_str(placeholder.capture());
                    shape.push_str("{}");
                }
            }
        }
        expr.push('$');

        let regex = Regex::new(&expr).map_err(|e| invalid(&e.to_string()))?;

        Ok(StepPattern {
            source: source.to_string(),
            segments,
            regex,
            literal_len,
            shape,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Count of non-whitespace literal characters; higher is more specific.
    pub fn literal_len(&self) -> usize {
        self.literal_len
    }

    /// The pattern with every placeholder erased to `{}`.
    ///
    /// Two patterns with the same shape can match exactly the same phrases.
    pub fn shape(&self) -> &str {
        &self.shape
    }

    pub fn placeholders(&self) -> Vec<Placeholder> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Hole(p) => Some(*p),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Raw captured text for each placeholder, if the phrase has this shape.
    pub fn captures(&self, phrase: &str) -> Option<Vec<String>> {
        let normalized = normalize_phrase(phrase);
        let caps = self.regex.captures(&normalized)?;
        Some(
            caps.iter()
                .skip(1)
                .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect(),
        )
    }

    /// Convert raw captures into typed arguments.
    pub fn convert(&self, raw: &[String]) -> Result<StepArgs, PlaceholderTypeError> {
        self.placeholders()
            .iter()
            .zip(raw)
            .enumerate()
            .map(|(position, (placeholder, value))| placeholder.convert(position, value))
            .collect::<Result<Vec<_>, _>>()
            .map(StepArgs)
    }
}

impl fmt::Display for StepPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Trim and collapse internal whitespace to single spaces.
pub fn normalize_phrase(phrase: &str) -> String {
    phrase.split_whitespace().collect::<Vec<_>>().join(" ")
}
