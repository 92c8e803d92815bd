//! Error types and diagnostic formatting for kbsdp
//!
//! Each stage has its own error enum; `Error` wraps them all. Parse errors
//! carry an ariadne-rendered report pointing at the offending span.
//!
//! Errors fall into the classes the pipeline treats differently:
//! - I/O failures are fatal for the job that hit them
//! - syntax and semantic failures are recoverable per statement in the bulk readers
//! - internal-consistency failures (`Error::is_internal`) mean the encoder or
//!   grounder itself is broken; nothing should try to recover from them

use std::ops::Range;
use std::path::PathBuf;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use chumsky::error::SimpleReason;
use chumsky::prelude::Simple;
use thiserror::Error;

use crate::lexer::Token;
use crate::signature::Category;

/// Failure to lex or parse a single constraint.
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    #[error("lexical error in `{input}`: {message}\n{report}")]
    Lex {
        input: String,
        message: String,
        report: String,
    },
    #[error("syntax error in `{input}`: {message}\n{report}")]
    Syntax {
        input: String,
        message: String,
        report: String,
    },
}

impl ParseError {
    /// The text that failed to parse.
    pub fn input(&self) -> &str {
        match self {
            ParseError::Lex { input, .. } | ParseError::Syntax { input, .. } => input,
        }
    }

    /// One-line description without the rendered report.
    pub fn message(&self) -> &str {
        match self {
            ParseError::Lex { message, .. } | ParseError::Syntax { message, .. } => message,
        }
    }
}

/// Violations of the predicate-signature table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("unknown predicate `{0}`")]
    UnknownPredicate(String),
    #[error("predicate `{name}` takes {expected} arguments, got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
}

/// Errors from the probabilistic-fact reader.
#[derive(Debug, Error)]
pub enum FactError {
    #[error("cannot open fact file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid atom format (no opening parenthesis): `{0}`")]
    MissingParen(String),
    #[error("invalid atom format (no closing parenthesis): `{0}`")]
    UnclosedParen(String),
    #[error("invalid probability `{text}` in `{line}`")]
    BadProbability { text: String, line: String },
    #[error("{source} in `{line}`")]
    Signature {
        line: String,
        #[source]
        source: SignatureError,
    },
    #[error("line {line_no}: {source}")]
    AtLine {
        line_no: usize,
        #[source]
        source: Box<FactError>,
    },
}

/// Errors from the universal-constraint file reader.
#[derive(Debug, Error)]
pub enum RuleFileError {
    #[error("cannot open constraint file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from grounding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroundError {
    #[error("cannot infer a category for variable `{0}`")]
    UnknownCategory(String),
    #[error("variable `{var}` is used both as {first} and as {second}")]
    ConflictingCategory {
        var: String,
        first: Category,
        second: Category,
    },
    #[error(transparent)]
    Signature(#[from] SignatureError),
    #[error("constraint takes {expected} variables, substitution has {got}")]
    CardinalityMismatch { expected: usize, got: usize },
    #[error("internal: substitution is missing variable `{0}`")]
    MissingSubstitution(String),
    #[error("ground atom `{0}` is not in the ground-atom table")]
    UnknownGroundAtom(String),
}

/// Errors from saving or loading a ground-atom table or grounding buffers.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors from the streaming SDP encoder.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("cannot write SDPA output {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid problem description {path}: {source}")]
    Problem {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("write to SDPA output failed: {0}")]
    Write(#[from] std::io::Error),
    #[error("internal: monomial {0} was not registered in the counting pass")]
    UnregisteredMonomial(String),
    #[error("invalid cone #{index}: {reason}")]
    InvalidCone { index: usize, reason: String },
}

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse config file {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Fact(#[from] FactError),
    #[error(transparent)]
    RuleFile(#[from] RuleFileError),
    #[error(transparent)]
    Ground(#[from] GroundError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// True for failures that indicate a bug in the grounder or encoder
    /// rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Error::Encode(EncodeError::UnregisteredMonomial(_))
                | Error::Ground(GroundError::MissingSubstitution(_))
        )
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ============================================================================
// Diagnostic rendering
// ============================================================================

fn render(source: &str, span: Range<usize>, title: &str, message: &str) -> String {
    let mut output = Vec::new();
    let report = Report::build(ReportKind::Error, (), span.start)
        .with_config(Config::default().with_color(false))
        .with_message(title)
        .with_label(
            Label::new(span)
                .with_message(message)
                .with_color(Color::Red),
        );

    if report
        .finish()
        .write(Source::from(source), &mut output)
        .is_err()
    {
        return message.to_string();
    }
    String::from_utf8(output).unwrap_or_else(|_| message.to_string())
}

/// Turn lexer errors into a `ParseError`, reporting the first one.
pub fn lexer_error(source: &str, errors: Vec<Simple<char>>) -> ParseError {
    let (message, span) = match errors.first() {
        Some(error) => (format_lexer_error(error), error.span()),
        None => ("unexpected input".to_string(), 0..source.len()),
    };
    let report = render(source, clamp(span, source.len()), "Lexical error", &message);
    ParseError::Lex {
        input: source.to_string(),
        message,
        report,
    }
}

fn format_lexer_error(error: &Simple<char>) -> String {
    let found = error
        .found()
        .map(|c| format!("'{}'", c))
        .unwrap_or_else(|| "end of input".to_string());
    format!("unexpected character {}", found)
}

/// Turn parser errors into a `ParseError`, mapping token indices back to
/// character spans.
pub fn parser_error(
    source: &str,
    errors: Vec<Simple<Token>>,
    token_spans: &[(Token, Range<usize>)],
) -> ParseError {
    let Some(error) = errors.first() else {
        return ParseError::Syntax {
            input: source.to_string(),
            message: "unexpected input".to_string(),
            report: String::new(),
        };
    };

    let span = error.span();
    // The token stream is fed with character spans, so most spans are already
    // character ranges; the end-of-input span sits at `source.len()`.
    let char_span = if span.start >= source.len() {
        token_spans
            .last()
            .map(|(_, r)| r.end..r.end)
            .unwrap_or(0..0)
    } else {
        span
    };

    let message = format_parser_error(error);
    let report = render(
        source,
        clamp(char_span, source.len()),
        "Parse error",
        &message,
    );
    ParseError::Syntax {
        input: source.to_string(),
        message,
        report,
    }
}

fn format_parser_error(error: &Simple<Token>) -> String {
    if let SimpleReason::Custom(msg) = error.reason() {
        return msg.clone();
    }

    let found = error
        .found()
        .map(|t| format!("'{}'", t))
        .unwrap_or_else(|| "end of input".to_string());

    let expected: Vec<String> = error
        .expected()
        .filter_map(|opt| opt.as_ref())
        .map(|t| format!("'{}'", t))
        .collect();

    match (expected.is_empty(), error.found()) {
        (true, None) => "unexpected end of input".to_string(),
        (true, Some(_)) => format!("unexpected trailing token {}", found),
        (false, _) => format!(
            "unexpected {}, expected one of: {}",
            found,
            expected.join(", ")
        ),
    }
}

fn clamp(span: Range<usize>, len: usize) -> Range<usize> {
    let start = span.start.min(len);
    let end = span.end.clamp(start, len);
    start..end
}
