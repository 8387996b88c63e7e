//! Session state shared by the interactive front ends.

use std::time::{Duration, Instant};

use thiserror::Error;

use crate::calc_engine::{evaluate_traced, parse, EvaluationTrace, ParseError, Step};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("please enter an expression after 'details'")]
    MissingExpression,
}

/// One line typed by the user.
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Empty,
    Quit,
    Clear,
    Help,
    /// `details` with no expression after it.
    MissingExpression,
    Evaluate { input: &'a str, detailed: bool },
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Self {
        let input = line.trim();
        if input.is_empty() {
            return Command::Empty;
        }

        let lowered = input.to_lowercase();
        match lowered.as_str() {
            "quit" | "exit" | "q" => return Command::Quit,
            "clear" | "reset" => return Command::Clear,
            "help" => return Command::Help,
            "details" => return Command::MissingExpression,
            _ => {}
        }

        const KEYWORD: &str = "details";
        let split = KEYWORD.len() + 1;
        let prefix = input.get(..split);
        let suffix = input.len().checked_sub(split).and_then(|at| input.get(at..));

        let (detailed, expr) = if prefix.is_some_and(|p| p.eq_ignore_ascii_case("details ")) {
            (true, input[split..].trim())
        } else if suffix.is_some_and(|s| s.eq_ignore_ascii_case(" details")) {
            (true, input[..input.len() - split].trim())
        } else {
            (false, input)
        };

        if expr.is_empty() {
            Command::MissingExpression
        } else {
            Command::Evaluate {
                input: expr,
                detailed,
            }
        }
    }
}

pub struct Calculation {
    pub value: i64,
    /// Rendered tree, see [`crate::calc_engine::render`].
    pub tree: String,
}

pub struct HistoryEntry {
    pub input: String,
    /// What the parser actually saw; error offsets index into this.
    pub source: String,
    pub result: Result<Calculation, EntryError>,
    pub detailed_steps: Vec<Step>,
    pub detailed_mode: bool,
    pub duration: Duration,
}

impl HistoryEntry {
    pub fn evaluate(input: &str, detailed_mode: bool) -> Self {
        let start_time = Instant::now();
        let source = input.trim();
        let mut trace = EvaluationTrace::new(detailed_mode);
        let result = parse(source.as_bytes())
            .map(|tree| Calculation {
                value: evaluate_traced(&tree, &mut trace),
                tree: tree.to_string(),
            })
            .map_err(EntryError::from);
        let duration = start_time.elapsed();

        if let Err(err) = &result {
            log::info!("rejected {input:?}: {err}");
        }

        HistoryEntry {
            input: input.to_string(),
            source: source.to_string(),
            result,
            detailed_steps: trace.steps,
            detailed_mode,
            duration,
        }
    }

    /// Placeholder entry for a `details` line with nothing to evaluate.
    pub fn missing_expression(input: &str) -> Self {
        HistoryEntry {
            input: input.trim().to_string(),
            source: String::new(),
            result: Err(EntryError::MissingExpression),
            detailed_steps: Vec::new(),
            detailed_mode: false,
            duration: Duration::ZERO,
        }
    }

    /// `value` or a diagnostic, for line-oriented output.
    pub fn summary(&self) -> String {
        match &self.result {
            Ok(calc) => calc.value.to_string(),
            Err(EntryError::Parse(err)) => {
                format!("Error: {err}\n{}", err.caret(&self.source))
            }
            Err(err) => format!("Error: {err}"),
        }
    }
}

/// Evaluated lines plus an up/down recall cursor.
#[derive(Default)]
pub struct History {
    pub entries: Vec<HistoryEntry>,
    pub cursor: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
        self.cursor = self.entries.len();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Step the cursor back; returns the input to show, if any.
    pub fn older(&mut self) -> Option<&str> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor).map(|e| e.input.as_str())
    }

    /// Step the cursor forward; past the newest entry yields `None` so the
    /// caller can show an empty line.
    pub fn newer(&mut self) -> Option<&str> {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
            self.entries.get(self.cursor).map(|e| e.input.as_str())
        } else {
            self.cursor = self.entries.len();
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords() {
        assert_eq!(Command::parse("  "), Command::Empty);
        assert_eq!(Command::parse("Quit"), Command::Quit);
        assert_eq!(Command::parse("q"), Command::Quit);
        assert_eq!(Command::parse("reset"), Command::Clear);
        assert_eq!(Command::parse("HELP"), Command::Help);
        assert_eq!(Command::parse("details"), Command::MissingExpression);
        assert_eq!(Command::parse("details   "), Command::MissingExpression);
    }

    #[test]
    fn details_prefix_and_suffix() {
        assert_eq!(
            Command::parse("details 1+2"),
            Command::Evaluate {
                input: "1+2",
                detailed: true
            }
        );
        assert_eq!(
            Command::parse("2*3 DETAILS"),
            Command::Evaluate {
                input: "2*3",
                detailed: true
            }
        );
        assert_eq!(
            Command::parse(" 4+4 "),
            Command::Evaluate {
                input: "4+4",
                detailed: false
            }
        );
    }

    #[test]
    fn entry_records_tree_and_steps() {
        let entry = HistoryEntry::evaluate(" 2*(3+4) ", true);
        let calc = entry.result.as_ref().unwrap();
        assert_eq!(calc.value, 14);
        assert_eq!(calc.tree, " (* 2 (+ 3 4))");
        assert_eq!(entry.source, "2*(3+4)");
        assert_eq!(entry.detailed_steps.len(), 2);
        assert_eq!(entry.summary(), "14");
    }

    #[test]
    fn entry_keeps_error() {
        let entry = HistoryEntry::evaluate("1+2)", false);
        assert!(entry.result.is_err());
        assert!(entry.summary().starts_with("Error: not a valid expression"));
        assert!(entry.summary().ends_with("^ ')' has no matching '('"));
    }

    #[test]
    fn inner_whitespace_is_reported_where_it_is() {
        let entry = HistoryEntry::evaluate("12 3", false);
        assert_eq!(
            entry.result.as_ref().err(),
            Some(&EntryError::Parse(ParseError::InvalidExpression {
                offset: 2,
                violation: crate::calc_engine::Violation::UnexpectedWhitespace,
            }))
        );
        assert_eq!(
            entry.summary(),
            "Error: not a valid expression: whitespace is not allowed (byte 2)\n'12 3'\n   ^ whitespace is not allowed"
        );
    }

    #[test]
    fn missing_expression_entry() {
        let entry = HistoryEntry::missing_expression(" details ");
        assert_eq!(entry.input, "details");
        assert_eq!(entry.result.as_ref().err(), Some(&EntryError::MissingExpression));
        assert_eq!(
            entry.summary(),
            "Error: please enter an expression after 'details'"
        );
    }

    #[test]
    fn recall_walks_both_ways() {
        let mut history = History::new();
        history.push(HistoryEntry::evaluate("1", false));
        history.push(HistoryEntry::evaluate("2", false));

        assert_eq!(history.older(), Some("2"));
        assert_eq!(history.older(), Some("1"));
        assert_eq!(history.older(), None);
        assert_eq!(history.newer(), Some("2"));
        assert_eq!(history.newer(), None);
        assert_eq!(history.cursor, 2);

        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.older(), None);
    }
}
