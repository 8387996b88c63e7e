use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::UNDERLINED),
    ))
}

pub fn render_help(frame: &mut Frame, scroll: usize) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" spancalc help ")
        .title_alignment(Alignment::Center)
        .style(Style::default().bg(Color::Black));

    let help_text = vec![
        Line::from(Span::styled(
            "spancalc - integer expression calculator",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        heading("Grammar:"),
        Line::from("  digits : non-negative integer literal   (e.g., 42)"),
        Line::from("  a + b  : addition                       (e.g., 1+2+3 = 6)"),
        Line::from("  a * b  : multiplication, binds tighter  (e.g., 2*3+4 = 10)"),
        Line::from("  ( .. ) : grouping                       (e.g., 2*(3+4) = 14)"),
        Line::from("  No spaces inside an expression; leading and trailing ones are"),
        Line::from("  trimmed. Results wrap around on 64-bit overflow."),
        Line::from(""),
        heading("Errors:"),
        Line::from("  An operator at the start or end of a group, a ')' without"),
        Line::from("  a '(', a '(' that is never closed, or a space between tokens"),
        Line::from("  is not a valid expression."),
        Line::from("  Anything else that is not a number evaluates to 0."),
        Line::from(""),
        heading("Commands:"),
        Line::from("  details <expression> : show the parse tree, every fold step and timing"),
        Line::from("  clear                : clear the history"),
        Line::from("  help                 : show this screen"),
        Line::from("  quit                 : exit"),
        Line::from(""),
        heading("Keys:"),
        Line::from("  Left/Right      : move the cursor"),
        Line::from("  Ctrl+Left/Right : jump over numbers"),
        Line::from("  Home/End        : start/end of line"),
        Line::from("  Up/Down         : recall earlier input"),
        Line::from("  PgUp/PgDn       : page through history"),
        Line::from("  Ctrl+U          : clear the input line"),
        Line::from("  Mouse wheel     : scroll"),
        Line::from("  Esc/F1          : close this screen"),
        Line::from(""),
        heading("Examples:"),
        Line::from("  1+2*3"),
        Line::from("  (1+2)*3"),
        Line::from("  details 2*(3+4)+1"),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true })
        .scroll((scroll.min(u16::MAX as usize) as u16, 0));

    frame.render_widget(Clear, frame.size());
    frame.render_widget(paragraph, frame.size());
}
