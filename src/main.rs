#[cfg(feature = "line")]
mod line_mode;
#[cfg(feature = "tui")]
mod render_help;
#[cfg(feature = "tui")]
mod tui_mode;

use anyhow::{bail, Result};
use argh::{FromArgValue, FromArgs};
use spancalc::history::{Command, History, HistoryEntry};
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Tui,
    Line,
    Plain,
}

impl Mode {
    fn compiled_default() -> Self {
        if cfg!(feature = "tui") {
            Mode::Tui
        } else if cfg!(feature = "line") {
            Mode::Line
        } else {
            Mode::Plain
        }
    }
}

impl FromArgValue for Mode {
    fn from_arg_value(value: &str) -> Result<Self, String> {
        match value.to_lowercase().as_str() {
            "tui" => Ok(Mode::Tui),
            "line" => Ok(Mode::Line),
            "plain" => Ok(Mode::Plain),
            _ => Err(format!("Invalid mode: {} (expected tui, line or plain)", value)),
        }
    }
}

#[derive(FromArgs)]
/// Evaluate integer expressions built from +, * and brackets.
struct Arguments {
    #[argh(positional)]
    /// expressions to evaluate; starts an interactive session when empty
    expressions: Vec<String>,

    #[argh(switch, short = 't')]
    /// print the parse tree of each expression
    tree: bool,

    #[argh(switch, short = 'd')]
    /// print every fold step and the evaluation time
    details: bool,

    #[argh(option, short = 'm')]
    /// interactive front end: tui, line or plain (default: best compiled in)
    mode: Option<Mode>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args: Arguments = argh::from_env();

    if !args.expressions.is_empty() {
        return run_batch(&args);
    }

    match args.mode.unwrap_or_else(Mode::compiled_default) {
        Mode::Tui => run_tui(),
        Mode::Line => run_line(),
        Mode::Plain => run_plain(),
    }
}

fn run_batch(args: &Arguments) -> Result<()> {
    let mut out = io::stdout().lock();
    for expr in &args.expressions {
        let entry = HistoryEntry::evaluate(expr, args.details);
        let calc = match &entry.result {
            Ok(calc) => calc,
            Err(_) => {
                eprintln!("{}", entry.summary());
                bail!("cannot evaluate {expr:?}");
            }
        };

        writeln!(out, "{} = {}", expr, calc.value)?;
        if args.tree {
            writeln!(out, "  tree:{}", calc.tree)?;
        }
        if args.details {
            for (i, step) in entry.detailed_steps.iter().enumerate() {
                writeln!(out, "  step {}: {} = {}", i + 1, step.operation, step.result)?;
            }
            writeln!(out, "  time: {:.6} ms", entry.duration.as_secs_f64() * 1000.0)?;
        }
    }
    Ok(())
}

#[cfg(feature = "tui")]
fn run_tui() -> Result<()> {
    tui_mode::run_tui()
}

#[cfg(not(feature = "tui"))]
fn run_tui() -> Result<()> {
    Err(anyhow::anyhow!("this build has no TUI; rebuild with --features tui"))
}

#[cfg(feature = "line")]
fn run_line() -> Result<()> {
    line_mode::run_line()
}

#[cfg(not(feature = "line"))]
fn run_line() -> Result<()> {
    Err(anyhow::anyhow!("this build has no line editor; rebuild with --features line"))
}

/// Line-buffered fallback that works on pipes as well as terminals.
fn run_plain() -> Result<()> {
    println!("spancalc: integers, +, *, ( ). 'details <expr>' shows the fold, 'q' quits.");

    let stdin = io::stdin();
    let mut history = History::new();
    for line in stdin.lock().lines() {
        let line = line?;
        let entry = match Command::parse(&line) {
            Command::Empty => continue,
            Command::Quit => break,
            Command::Clear => {
                history.clear();
                println!("History cleared");
                continue;
            }
            Command::Help => {
                println!("Type an expression such as 2*(3+4), or 'details 2*(3+4)'");
                continue;
            }
            Command::MissingExpression => HistoryEntry::missing_expression(&line),
            Command::Evaluate { input, detailed } => HistoryEntry::evaluate(input, detailed),
        };

        println!("{} = {}", entry.input, entry.summary());
        if let (true, Ok(calc)) = (entry.detailed_mode, &entry.result) {
            println!("  tree:{}", calc.tree);
            for (i, step) in entry.detailed_steps.iter().enumerate() {
                println!("  step {}: {} = {}", i + 1, step.operation, step.result);
            }
        }
        history.push(entry);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_from_arg() {
        assert_eq!(Mode::from_arg_value("TUI"), Ok(Mode::Tui));
        assert_eq!(Mode::from_arg_value("plain"), Ok(Mode::Plain));
        assert!(Mode::from_arg_value("gui").is_err());
    }

    #[test]
    fn arguments_parse() {
        let args = Arguments::from_args(&["spancalc"], &["-t", "-m", "plain", "1+2", "3*4"])
            .unwrap_or_else(|early| panic!("{}", early.output));
        assert!(args.tree);
        assert!(!args.details);
        assert_eq!(args.mode, Some(Mode::Plain));
        assert_eq!(args.expressions, vec!["1+2", "3*4"]);
    }
}
