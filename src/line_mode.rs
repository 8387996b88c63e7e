use anyhow::Result;
use spancalc::history::{Command, History, HistoryEntry};
use std::io::{stdin, stdout, Write};
use termion::{
    clear::CurrentLine as ClearLine,
    cursor::{DetectCursorPos, Goto},
    event::Key,
    input::TermRead,
    raw::IntoRawMode,
};

const PROMPT: &str = "Expression: ";

fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Raw mode turns "\n" into a bare line feed; terminate lines by hand.
fn raw_lines(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join("\r\n")
}

pub fn run_line() -> Result<()> {
    println!("spancalc");
    println!("Supports: integers, +, *, ( )");
    println!("Navigation: Left/Right, Backspace/Delete, Home/End, Up/Down for history");
    println!("Commands: 'quit' to exit, 'clear' to reset history");
    println!("Prefix an expression with 'details' to see its tree and fold steps\n");

    let mut stdout = stdout().into_raw_mode()?;
    let mut history = History::new();
    let mut keys = stdin().keys();

    loop {
        write!(stdout, "{}{}", ClearLine, PROMPT)?;
        stdout.flush()?;

        let mut expression = String::new();
        let mut cursor_pos = 0;
        let (_, row) = stdout.cursor_pos()?;

        loop {
            write!(stdout, "{}{}{}{}", Goto(1, row), ClearLine, PROMPT, expression)?;
            let byte_pos = char_index_to_byte_index(&expression, cursor_pos);
            write!(stdout, "{}", Goto((PROMPT.len() + 1 + byte_pos) as u16, row))?;
            stdout.flush()?;

            let Some(key) = keys.next() else {
                return Ok(());
            };
            match key? {
                Key::Char('\n') => break,
                Key::Ctrl('c') | Key::Ctrl('d') => {
                    write!(stdout, "\r\n")?;
                    return Ok(());
                }
                Key::Char(c) => {
                    let byte_idx = char_index_to_byte_index(&expression, cursor_pos);
                    expression.insert(byte_idx, c);
                    cursor_pos += 1;
                }
                Key::Backspace if cursor_pos > 0 => {
                    cursor_pos -= 1;
                    let byte_idx = char_index_to_byte_index(&expression, cursor_pos);
                    if let Some(c) = expression[byte_idx..].chars().next() {
                        expression.drain(byte_idx..byte_idx + c.len_utf8());
                    }
                }
                Key::Delete => {
                    let byte_idx = char_index_to_byte_index(&expression, cursor_pos);
                    if let Some(c) = expression[byte_idx..].chars().next() {
                        expression.drain(byte_idx..byte_idx + c.len_utf8());
                    }
                }
                Key::Left if cursor_pos > 0 => cursor_pos -= 1,
                Key::Right if cursor_pos < expression.chars().count() => cursor_pos += 1,
                Key::Home => cursor_pos = 0,
                Key::End => cursor_pos = expression.chars().count(),
                Key::Up => {
                    if let Some(previous) = history.older() {
                        expression = previous.to_string();
                        cursor_pos = expression.chars().count();
                    }
                }
                Key::Down => {
                    expression = history.newer().unwrap_or_default().to_string();
                    cursor_pos = expression.chars().count();
                }
                _ => {}
            }
        }

        let entry = match Command::parse(&expression) {
            Command::Empty => {
                write!(stdout, "\r\n")?;
                continue;
            }
            Command::Quit => {
                write!(stdout, "\r\nGoodbye!\r\n")?;
                return Ok(());
            }
            Command::Clear => {
                history.clear();
                write!(stdout, "\r\nHistory cleared\r\n\r\n")?;
                continue;
            }
            Command::Help => {
                write!(
                    stdout,
                    "\r\nType an expression such as 2*(3+4), or 'details 2*(3+4)'\r\n\r\n"
                )?;
                continue;
            }
            Command::MissingExpression => HistoryEntry::missing_expression(&expression),
            Command::Evaluate { input, detailed } => HistoryEntry::evaluate(input, detailed),
        };

        write!(stdout, "\r\n  {} = {}\r\n", entry.input, raw_lines(&entry.summary()))?;
        if let (true, Ok(calc)) = (entry.detailed_mode, &entry.result) {
            write!(stdout, "\r\n  Tree:{}\r\n", calc.tree)?;
            for (i, step) in entry.detailed_steps.iter().enumerate() {
                write!(stdout, "  Step {}: {} = {}\r\n", i + 1, step.operation, step.result)?;
            }
            write!(
                stdout,
                "  Time: {:.6} ms\r\n",
                entry.duration.as_secs_f64() * 1000.0
            )?;
        }
        write!(stdout, "\r\n")?;
        history.push(entry);
    }
}
