use super::app::App;
use super::helpers::{highlight_expression, spaced, wrap_text};
use crate::render_help::render_help;
use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use spancalc::history::{EntryError, HistoryEntry};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

const MIN_TERMINAL_WIDTH: u16 = 50;
const MIN_TERMINAL_HEIGHT: u16 = 10;

pub fn run_ui_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| {
            if app.show_help {
                render_help(f, app.help_scroll);
            } else {
                ui(f, app);
            }
        })?;

        if app.should_quit {
            break;
        }

        if crossterm::event::poll(Duration::from_millis(50))? {
            match crossterm::event::read()? {
                Event::Key(KeyEvent { code, modifiers, kind, .. }) if kind == KeyEventKind::Press => {
                    handle_key_event(app, code, modifiers);
                }
                Event::Mouse(event) => handle_mouse_event(app, event),
                _ => {}
            }
        }
    }
    Ok(())
}

fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if app.show_help {
        match code {
            KeyCode::Down => app.help_scroll = app.help_scroll.saturating_add(1),
            KeyCode::Up => app.help_scroll = app.help_scroll.saturating_sub(1),
            KeyCode::PageDown => app.help_scroll = app.help_scroll.saturating_add(10),
            KeyCode::PageUp => app.help_scroll = app.help_scroll.saturating_sub(10),
            KeyCode::Esc | KeyCode::F(1) => {
                app.show_help = false;
                app.help_scroll = 0;
            }
            _ => {}
        }
        return;
    }

    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    match code {
        KeyCode::Char('c') if ctrl => app.should_quit = true,
        KeyCode::Char('u') | KeyCode::Char('U') if ctrl => app.clear_input(),
        KeyCode::Char(c) if !ctrl => app.insert_char(c),
        KeyCode::Backspace => app.delete_backward(),
        KeyCode::Delete => app.delete_forward(),
        KeyCode::Left if ctrl => app.move_cursor_by_words(-1),
        KeyCode::Right if ctrl => app.move_cursor_by_words(1),
        KeyCode::Left => app.move_cursor(-1),
        KeyCode::Right => app.move_cursor(1),
        KeyCode::Home => {
            app.cursor_position = 0;
            app.input_scroll = 0;
        }
        KeyCode::End => app.cursor_position = app.input.chars().count(),
        KeyCode::Up => app.navigate_history(-1),
        KeyCode::Down => app.navigate_history(1),
        KeyCode::PageUp => app.scroll_history(-1),
        KeyCode::PageDown => app.scroll_history(1),
        KeyCode::Enter => app.submit(),
        KeyCode::F(1) => {
            app.show_help = true;
            app.help_scroll = 0;
        }
        _ => {}
    }
}

fn handle_mouse_event(app: &mut App, event: crossterm::event::MouseEvent) {
    let scroll = if app.show_help {
        &mut app.help_scroll
    } else {
        &mut app.history_scroll
    };
    match event.kind {
        MouseEventKind::ScrollDown => *scroll = scroll.saturating_add(3),
        MouseEventKind::ScrollUp => *scroll = scroll.saturating_sub(3),
        _ => {}
    }
}

fn ui(frame: &mut Frame, app: &mut App) {
    let terminal_size = frame.size();

    app.terminal_too_small =
        terminal_size.width < MIN_TERMINAL_WIDTH || terminal_size.height < MIN_TERMINAL_HEIGHT;

    if app.terminal_too_small {
        render_resize_message(frame, terminal_size);
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(terminal_size);

    render_input(frame, app, layout[0]);
    render_status(frame, layout[1]);
    render_history(frame, app, layout[2]);
    app.list_height = layout[2].height as usize;
}

fn render_resize_message(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled(
            format!(
                "Terminal too small: need {}x{}, have {}x{}",
                MIN_TERMINAL_WIDTH, MIN_TERMINAL_HEIGHT, area.width, area.height
            ),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Resize the window to continue",
            Style::default().fg(Color::Yellow),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Resize Required ")
        .title_alignment(Alignment::Center);

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

/// Indented detail lines under an entry, each wrapped to `width`.
fn detail_lines(text: &str, width: usize, style: Style) -> Vec<ListItem<'static>> {
    wrap_text(text, width)
        .into_iter()
        .enumerate()
        .map(|(idx, line)| {
            let prefix = if idx == 0 { "    - " } else { "      " };
            ListItem::new(Line::from(Span::styled(format!("{prefix}{line}"), style)))
        })
        .collect()
}

fn entry_items(entry: &HistoryEntry, selected: bool, wrap_width: usize) -> Vec<ListItem<'static>> {
    let mut items = Vec::new();
    let base_style = Style::default().fg(if selected { Color::Yellow } else { Color::Cyan });

    let input_lines = wrap_text(&spaced(&entry.input), wrap_width);
    for (line_idx, line) in input_lines.into_iter().enumerate() {
        let marker = if line_idx == 0 { "> " } else { "  " };
        let mut spans = vec![Span::styled(marker, Style::default().fg(Color::Green))];
        spans.extend(highlight_expression(&line, base_style));

        if line_idx == 0 {
            spans.push(Span::styled(" = ", Style::default().fg(Color::Gray)));
            spans.push(match &entry.result {
                Ok(calc) => Span::styled(
                    calc.value.to_string(),
                    Style::default()
                        .fg(Color::LightMagenta)
                        .add_modifier(Modifier::BOLD),
                ),
                Err(e) => Span::styled(
                    format!("Error: {e}"),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
            });
        }
        items.push(ListItem::new(Line::from(spans)));
    }

    if !entry.detailed_mode {
        return items;
    }

    let dim = Style::default().fg(Color::DarkGray);
    match &entry.result {
        Ok(calc) => {
            items.extend(detail_lines(&format!("Tree:{}", calc.tree), wrap_width, dim));
            for (j, step) in entry.detailed_steps.iter().enumerate() {
                let text = format!("Step {}: {} = {}", j + 1, step.operation, step.result);
                items.extend(detail_lines(&text, wrap_width, dim));
            }
        }
        Err(EntryError::Parse(err)) => {
            for line in err.caret(&entry.source).lines() {
                items.push(ListItem::new(Line::from(Span::styled(
                    format!("      {line}"),
                    Style::default().fg(Color::Red),
                ))));
            }
        }
        Err(_) => {}
    }
    items.extend(detail_lines(
        &format!("Time: {:.6} ms", entry.duration.as_secs_f64() * 1000.0),
        wrap_width,
        Style::default().fg(Color::Magenta),
    ));
    items
}

fn render_history(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" History ")
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    if app.history.is_empty() {
        let empty_msg = Paragraph::new("Nothing evaluated yet. Type an expression and press Enter.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(empty_msg, inner_area);
        return;
    }

    let mut items = Vec::new();
    app.item_start_indices.clear();
    let wrap_width = inner_area.width.saturating_sub(6) as usize;
    let count = app.history.len();

    for (i, entry) in app.history.entries.iter().enumerate() {
        app.item_start_indices.push(items.len());
        items.extend(entry_items(entry, i == app.selected, wrap_width));

        if i + 1 < count {
            items.push(ListItem::new(Line::from(Span::styled(
                "-".repeat(inner_area.width as usize),
                Style::default().fg(Color::DarkGray),
            ))));
        }
    }

    if app.scroll_to_bottom {
        app.history_scroll = items.len().saturating_sub(inner_area.height as usize);
        app.scroll_to_bottom = false;
    }
    app.history_scroll = app.history_scroll.min(items.len().saturating_sub(1));

    let selected_index = app.item_start_indices.get(app.selected).copied();

    let list = List::new(items)
        .block(Block::default())
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let mut state = ListState::default()
        .with_selected(selected_index)
        .with_offset(app.history_scroll);

    frame.render_stateful_widget(list, inner_area, &mut state);
}

fn render_status(frame: &mut Frame, area: Rect) {
    let keys = [
        ("Enter", "Evaluate"),
        ("Up/Down", "Recall"),
        ("PgUp/PgDn", "Scroll"),
        ("F1", "Help"),
        ("Ctrl+U", "Clear"),
        ("Ctrl+C", "Quit"),
    ];

    let spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, desc)| {
            [
                Span::styled(
                    *key,
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!(" {desc} "), Style::default().fg(Color::DarkGray)),
            ]
        })
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_input(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Expression ")
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let visible_width = inner_area.width.saturating_sub(2) as usize;
    let total_chars = app.input.chars().count();
    app.adjust_input_scroll(visible_width);

    let visible_input: String = app
        .input
        .chars()
        .skip(app.input_scroll)
        .take(visible_width)
        .collect();

    let mut spans = vec![Span::raw("> ")];
    spans.extend(highlight_expression(&visible_input, Style::default()));
    frame.render_widget(Paragraph::new(Line::from(spans)), inner_area);

    let visible_cursor = app.cursor_position.saturating_sub(app.input_scroll);
    let visible_prefix: String = visible_input.chars().take(visible_cursor).collect();
    frame.set_cursor(inner_area.x + 2 + visible_prefix.width() as u16, inner_area.y);

    let indicator_style = Style::default().fg(Color::DarkGray);
    if app.input_scroll > 0 {
        frame.render_widget(
            Paragraph::new("<").style(indicator_style),
            Rect::new(inner_area.x, inner_area.y, 1, 1),
        );
    }
    if total_chars > app.input_scroll + visible_width {
        frame.render_widget(
            Paragraph::new(">").style(indicator_style),
            Rect::new(inner_area.x + inner_area.width - 1, inner_area.y, 1, 1),
        );
    }
}
