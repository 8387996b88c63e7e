use std::num::IntErrorKind;
use std::ops::Range;

use super::error::{ParseError, ParseResult, Violation};
use super::node::Operator;

/// What a single span turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanShape {
    Literal(i64),
    /// The span is one redundant bracket pair around `Range`.
    Redispatch(Range<usize>),
    Split {
        operator: Operator,
        parts: Vec<Range<usize>>,
    },
}

/// One validated input plus the bracket pairs found in it.
///
/// [`Scanner::new`] makes the only full pass over the input. After it
/// succeeds every span handed out by [`Scanner::classify`] is balanced, so a
/// nested group can be stepped over in one jump instead of being rescanned at
/// each level.
pub struct Scanner<'a> {
    input: &'a [u8],
    /// `closing[i]` is the index of the `)` matching a `(` at `i`.
    closing: Vec<usize>,
}

impl<'a> Scanner<'a> {
    /// Validate the whole of `input` once; the error names the first
    /// offending byte.
    pub fn new(input: &'a [u8]) -> ParseResult<Self> {
        let last = input.len().saturating_sub(1);
        let mut closing = vec![0; input.len()];
        let mut opens: Vec<usize> = Vec::new();

        for (i, &byte) in input.iter().enumerate() {
            match byte {
                b'(' => opens.push(i),
                b')' => {
                    let open = opens
                        .pop()
                        .ok_or_else(|| ParseError::at(i, Violation::UnmatchedClose))?;
                    closing[open] = i;
                }
                b'+' | b'*' if i == 0 || i == last => {
                    return Err(ParseError::at(i, Violation::DanglingOperator(byte as char)));
                }
                _ if byte.is_ascii_whitespace() => {
                    return Err(ParseError::at(i, Violation::UnexpectedWhitespace));
                }
                _ => {}
            }
        }

        if let Some(&open) = opens.last() {
            return Err(ParseError::at(open, Violation::UnclosedOpen));
        }
        Ok(Self { input, closing })
    }

    /// Classify `input[span]`, looking only at the bytes outside nested
    /// groups.
    ///
    /// `span` is the whole input or a range returned by an earlier call.
    /// Ranges in the result, and offsets in errors, are absolute positions in
    /// the input.
    pub fn classify(&self, span: Range<usize>) -> ParseResult<SpanShape> {
        let Range { start, end } = span;

        if self.input.get(start) == Some(&b'(') && self.closing[start] + 1 == end {
            let shape = SpanShape::Redispatch(start + 1..end - 1);
            log::trace!("span {:?} -> {:?}", start..end, shape);
            return Ok(shape);
        }

        let mut dominant: Option<Operator> = None;
        let mut parts: Vec<Range<usize>> = Vec::new();
        let mut part_start = start;
        let mut i = start;

        while i < end {
            let byte = self.input[i];
            if byte == b'(' {
                i = self.closing[i] + 1;
                continue;
            }
            if let Some(op) = Operator::from_byte(byte) {
                if i == start || i + 1 == end {
                    return Err(ParseError::at(i, Violation::DanglingOperator(byte as char)));
                }
                match (op, dominant) {
                    // Everything so far was one product; it becomes a single term.
                    (Operator::Add, Some(Operator::Multiply)) => {
                        parts.clear();
                        parts.push(start..i);
                        dominant = Some(op);
                        part_start = i + 1;
                    }
                    // Left for the term's own scan.
                    (Operator::Multiply, Some(Operator::Add)) => {}
                    _ => {
                        parts.push(part_start..i);
                        dominant = Some(op);
                        part_start = i + 1;
                    }
                }
            }
            i += 1;
        }

        let shape = match dominant {
            None => SpanShape::Literal(parse_literal(&self.input[start..end])),
            Some(operator) => {
                parts.push(part_start..end);
                SpanShape::Split { operator, parts }
            }
        };
        log::trace!("span {:?} -> {:?}", start..end, shape);
        Ok(shape)
    }
}

/// Base-10 signed integer; anything unparseable is 0, out-of-range
/// numbers saturate.
pub fn parse_literal(bytes: &[u8]) -> i64 {
    let Ok(text) = std::str::from_utf8(bytes) else {
        return 0;
    };
    match text.parse::<i64>() {
        Ok(value) => value,
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => 0,
        },
    }
}
