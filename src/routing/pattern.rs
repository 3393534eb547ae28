//! Path pattern grammar and matching.
//!
//! # Responsibilities
//! - Parse `<type:name>` placeholders out of route segments
//! - Match request paths and extract typed parameters
//! - Validate values substituted during reverse lookup
//!
//! # Design Decisions
//! - Whole-path, case-sensitive matching
//! - No regex: placeholders consume character runs, with backtracking
//!   when the following literal does not fit
//! - Candidate ends are pruned against the next literal, so a long
//!   segment costs one scan rather than one scan per candidate
//! - `int` values are at most 20 digits; longer runs never match
//! - `<name>` is shorthand for `<str:name>`

use thiserror::Error;

use crate::routing::handler::{ParamValue, PathParams};

/// Digits in `u64::MAX`.
const MAX_INT_DIGITS: usize = 20;

/// Characters that would change a reversed URL's meaning if spliced in.
const URL_DELIMITERS: [char; 3] = ['?', '#', '%'];

/// Errors in a route's path pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("unclosed placeholder at byte {0}")]
    Unclosed(usize),

    #[error("unknown parameter type `{0}`")]
    UnknownType(String),

    #[error("invalid parameter name `{0}`")]
    InvalidName(String),
}

/// Placeholder types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// ASCII decimal digits, parsed as `u64`.
    Int,
    /// Any characters except `/`.
    Str,
    /// ASCII letters, digits, `-` and `_`.
    Slug,
}

impl ParamKind {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "int" => Some(ParamKind::Int),
            "str" => Some(ParamKind::Str),
            "slug" => Some(ParamKind::Slug),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::Int => "int",
            ParamKind::Str => "str",
            ParamKind::Slug => "slug",
        }
    }

    fn accepts(&self, c: char) -> bool {
        match self {
            ParamKind::Int => c.is_ascii_digit(),
            ParamKind::Str => c != '/',
            ParamKind::Slug => c.is_ascii_alphanumeric() || c == '-' || c == '_',
        }
    }

    /// Whether `raw` is a complete, valid value for this placeholder.
    pub fn validate(&self, raw: &str) -> bool {
        !raw.is_empty()
            && (*self != ParamKind::Int || raw.len() <= MAX_INT_DIGITS)
            && raw.chars().all(|c| self.accepts(c))
            && self.capture(raw).is_some()
    }

    /// Whether `raw` can be substituted into a reversed URL as is.
    pub fn reversible(&self, raw: &str) -> bool {
        self.validate(raw) && !raw.contains(URL_DELIMITERS)
    }

    /// Converts a run already checked against `accepts`.
    fn capture(&self, raw: &str) -> Option<ParamValue> {
        match self {
            ParamKind::Int => raw.parse().ok().map(ParamValue::Int),
            ParamKind::Str | ParamKind::Slug => Some(ParamValue::Str(raw.to_string())),
        }
    }
}

/// One piece of a parsed pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param { name: String, kind: ParamKind },
}

/// A parsed route pattern such as `/contacts/<int:id>/edit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = raw;
        let mut offset = 0;

        while let Some(open) = rest.find('<') {
            literal.push_str(&rest[..open]);
            let close = rest[open..]
                .find('>')
                .ok_or(PatternError::Unclosed(offset + open))?
                + open;

            let inner = &rest[open + 1..close];
            let (kind, name) = match inner.split_once(':') {
                Some((kind, name)) => (
                    ParamKind::parse(kind)
                        .ok_or_else(|| PatternError::UnknownType(kind.to_string()))?,
                    name,
                ),
                None => (ParamKind::Str, inner),
            };
            if !is_identifier(name) {
                return Err(PatternError::InvalidName(name.to_string()));
            }

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Param {
                name: name.to_string(),
                kind,
            });

            offset += close + 1;
            rest = &rest[close + 1..];
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Param { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    pub fn param_count(&self) -> usize {
        self.param_names().count()
    }

    /// Match the whole of `path`, returning captured parameters in order.
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let mut params = PathParams::new();
        match_from(&self.segments, path, &mut params).then_some(params)
    }
}

fn match_from(segments: &[Segment], path: &str, params: &mut PathParams) -> bool {
    let Some((first, rest)) = segments.split_first() else {
        return path.is_empty();
    };

    match first {
        Segment::Literal(literal) => path
            .strip_prefix(literal.as_str())
            .is_some_and(|tail| match_from(rest, tail, params)),
        Segment::Param { name, kind } => {
            let mut run = path
                .char_indices()
                .find(|(_, c)| !kind.accepts(*c))
                .map_or(path.len(), |(at, _)| at);
            if *kind == ParamKind::Int {
                run = run.min(MAX_INT_DIGITS);
            }

            let next_literal = match rest.first() {
                Some(Segment::Literal(literal)) => Some(literal.as_str()),
                _ => None,
            };

            // Longest candidate first, shrinking until the remainder matches.
            for end in (1..=run).rev() {
                if !path.is_char_boundary(end) {
                    continue;
                }
                let tail = &path[end..];
                if rest.is_empty() && !tail.is_empty() {
                    continue;
                }
                if next_literal.is_some_and(|literal| !tail.starts_with(literal)) {
                    continue;
                }
                let Some(value) = kind.capture(&path[..end]) else {
                    continue;
                };
                params.push(name.as_str(), value);
                if match_from(rest, tail, params) {
                    return true;
                }
                params.pop();
            }
            false
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
