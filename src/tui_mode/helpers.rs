use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const BRACKET_COLORS: [Color; 3] = [Color::LightBlue, Color::LightMagenta, Color::LightCyan];

/// Greedy word wrap by display width; words wider than a line are chopped.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut rest = word;
        while rest.width() > width {
            let mut taken = 0;
            let mut cut = 0;
            for c in rest.chars() {
                let w = c.width().unwrap_or(1);
                if taken + w > width {
                    break;
                }
                taken += w;
                cut += c.len_utf8();
            }
            if cut == 0 {
                cut = rest.chars().next().map_or(rest.len(), char::len_utf8);
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(rest[..cut].to_string());
            rest = &rest[cut..];
        }
        if rest.is_empty() {
            continue;
        }

        let needed = if current.is_empty() {
            rest.width()
        } else {
            current.width() + 1 + rest.width()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(rest);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// `2*(3+4)` -> `2 * (3 + 4)`. Whitespace already in the input collapses
/// to one space but is kept, so a rejected `12 3` does not show as `123`.
pub fn spaced(expr: &str) -> String {
    let mut result = String::new();
    for c in expr.chars() {
        match c {
            '+' | '*' => {
                result.push(' ');
                result.push(c);
                result.push(' ');
            }
            _ => result.push(c),
        }
    }
    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Colour digits and operators; brackets cycle colours by nesting depth,
/// an unmatched `)` is shown in red.
pub fn highlight_expression(expr: &str, base_style: Style) -> Vec<Span<'static>> {
    let number_style = Style::default().fg(Color::LightGreen);
    let operator_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let bracket_style = |depth: usize| {
        Style::default()
            .fg(BRACKET_COLORS[depth % BRACKET_COLORS.len()])
            .add_modifier(Modifier::BOLD)
    };

    let mut spans = Vec::new();
    let mut number = String::new();
    let mut depth = 0usize;

    for c in expr.chars() {
        if c.is_ascii_digit() {
            number.push(c);
            continue;
        }
        if !number.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut number), number_style));
        }
        let span = match c {
            '(' => {
                depth += 1;
                Span::styled("(", bracket_style(depth - 1))
            }
            ')' if depth == 0 => Span::styled(
                ")",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            ')' => {
                depth -= 1;
                Span::styled(")", bracket_style(depth))
            }
            '+' | '*' => Span::styled(c.to_string(), operator_style),
            ' ' => Span::raw(" "),
            _ => Span::styled(c.to_string(), base_style),
        };
        spans.push(span);
    }
    if !number.is_empty() {
        spans.push(Span::styled(number, number_style));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaced_operators() {
        assert_eq!(spaced("2*(3+4)"), "2 * (3 + 4)");
        assert_eq!(spaced(" 1 +  2 "), "1 + 2");
        assert_eq!(spaced("12 3"), "12 3");
    }

    #[test]
    fn wraps_by_width() {
        assert_eq!(wrap_text("aa bb cc", 5), vec!["aa bb", "cc"]);
        assert_eq!(wrap_text("abcdefg", 3), vec!["abc", "def", "g"]);
        assert_eq!(wrap_text("x", 0), vec![""]);
    }

    #[test]
    fn highlight_groups_numbers() {
        let spans = highlight_expression("12+(3)", Style::default());
        let texts: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(texts, vec!["12", "+", "(", "3", ")"]);
        assert_eq!(spans[2].style, spans[4].style);
    }
}
