use spancalc::history::{Command, History, HistoryEntry};

pub struct App {
    pub input: String,
    pub cursor_position: usize,
    pub input_scroll: usize,
    pub history: History,
    /// Entry highlighted in the history list.
    pub selected: usize,
    pub should_quit: bool,
    pub show_help: bool,
    pub help_scroll: usize,
    pub list_height: usize,
    pub item_start_indices: Vec<usize>,
    pub history_scroll: usize,
    pub scroll_to_bottom: bool,
    pub terminal_too_small: bool,
}

impl App {
    pub fn new() -> Self {
        App {
            input: String::new(),
            cursor_position: 0,
            input_scroll: 0,
            history: History::new(),
            selected: 0,
            should_quit: false,
            show_help: false,
            help_scroll: 0,
            list_height: 5,
            item_start_indices: Vec::new(),
            history_scroll: 0,
            scroll_to_bottom: false,
            terminal_too_small: false,
        }
    }

    pub fn adjust_input_scroll(&mut self, visible_width: usize) {
        let total_chars = self.input.chars().count();

        if self.cursor_position < self.input_scroll {
            self.input_scroll = self.cursor_position;
        } else if self.cursor_position >= self.input_scroll + visible_width {
            self.input_scroll = self.cursor_position + 1 - visible_width.max(1);
        }

        self.input_scroll = self.input_scroll.min(total_chars.saturating_sub(visible_width));
    }

    pub fn submit(&mut self) {
        let line = self.input.clone();
        match Command::parse(&line) {
            Command::Empty => return,
            Command::Quit => {
                self.should_quit = true;
                return;
            }
            Command::Clear => {
                self.history.clear();
                self.selected = 0;
                self.history_scroll = 0;
            }
            Command::Help => {
                self.show_help = true;
                self.help_scroll = 0;
            }
            Command::MissingExpression => {
                let entry = HistoryEntry::missing_expression(&line);
                self.record(entry);
            }
            Command::Evaluate { input, detailed } => {
                let entry = HistoryEntry::evaluate(input, detailed);
                self.record(entry);
            }
        }
        self.clear_input();
    }

    fn record(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
        self.selected = self.history.len().saturating_sub(1);
        self.scroll_to_bottom = true;
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_idx = Self::char_index_to_byte_index(&self.input, self.cursor_position);
        self.input.insert(byte_idx, c);
        self.cursor_position += 1;
    }

    pub fn delete_backward(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            self.delete_forward();
        }
    }

    pub fn delete_forward(&mut self) {
        let byte_idx = Self::char_index_to_byte_index(&self.input, self.cursor_position);
        if let Some(c) = self.input[byte_idx..].chars().next() {
            self.input.drain(byte_idx..byte_idx + c.len_utf8());
        }
    }

    pub fn move_cursor(&mut self, direction: i32) {
        match direction {
            -1 => self.cursor_position = self.cursor_position.saturating_sub(1),
            1 => self.cursor_position = (self.cursor_position + 1).min(self.input.chars().count()),
            _ => {}
        }
    }

    /// Jump over a run of digits, or over a single bracket/operator.
    pub fn move_cursor_by_words(&mut self, direction: i32) {
        let chars: Vec<char> = self.input.chars().collect();
        let mut pos = self.cursor_position.min(chars.len());

        if direction < 0 {
            while pos > 0 && chars[pos - 1].is_whitespace() {
                pos -= 1;
            }
            if pos > 0 && chars[pos - 1].is_ascii_digit() {
                while pos > 0 && chars[pos - 1].is_ascii_digit() {
                    pos -= 1;
                }
            } else {
                pos = pos.saturating_sub(1);
            }
        } else {
            if pos < chars.len() && chars[pos].is_ascii_digit() {
                while pos < chars.len() && chars[pos].is_ascii_digit() {
                    pos += 1;
                }
            } else if pos < chars.len() {
                pos += 1;
            }
            while pos < chars.len() && chars[pos].is_whitespace() {
                pos += 1;
            }
        }
        self.cursor_position = pos;
    }

    pub fn navigate_history(&mut self, direction: i32) {
        let recalled = if direction < 0 {
            self.history.older()
        } else {
            self.history.newer()
        };
        self.input = recalled.unwrap_or_default().to_string();
        if self.history.cursor < self.history.len() {
            self.selected = self.history.cursor;
        }
        self.cursor_position = self.input.chars().count();
        self.input_scroll = 0;
        self.scroll_to_bottom = false;
    }

    pub fn scroll_history(&mut self, direction: i32) {
        let step = self.list_height.saturating_sub(1).max(1);
        let last = self.history.len().saturating_sub(1);
        self.selected = if direction < 0 {
            self.selected.saturating_sub(step)
        } else {
            self.selected.saturating_add(step).min(last)
        };

        if let Some(entry) = self.history.entries.get(self.selected) {
            self.input = entry.input.clone();
            self.history.cursor = self.selected;
        }
        self.cursor_position = self.input.chars().count();
        self.input_scroll = 0;
        self.scroll_to_bottom = false;
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
        self.input_scroll = 0;
    }

    pub fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
        s.char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(s.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> App {
        let mut app = App::new();
        for c in text.chars() {
            app.insert_char(c);
        }
        app
    }

    #[test]
    fn submit_records_and_clears() {
        let mut app = typed("2*(3+4)");
        app.submit();
        assert!(app.input.is_empty());
        assert_eq!(app.history.len(), 1);
        let entry = &app.history.entries[0];
        assert_eq!(entry.result.as_ref().map(|c| c.value).ok(), Some(14));
        assert!(app.scroll_to_bottom);
    }

    #[test]
    fn quit_and_clear() {
        let mut app = typed("1");
        app.submit();
        app.input = "clear".into();
        app.submit();
        assert!(app.history.is_empty());
        app.input = "exit".into();
        app.submit();
        assert!(app.should_quit);
    }

    #[test]
    fn editing_in_the_middle() {
        let mut app = typed("12");
        app.move_cursor(-1);
        app.insert_char('+');
        assert_eq!(app.input, "1+2");
        app.delete_backward();
        assert_eq!(app.input, "12");
        app.cursor_position = 0;
        app.delete_forward();
        assert_eq!(app.input, "2");
    }

    #[test]
    fn word_jumps_cover_numbers() {
        let mut app = typed("123 + 45");
        app.move_cursor_by_words(-1);
        assert_eq!(app.cursor_position, 6);
        app.move_cursor_by_words(-1);
        assert_eq!(app.cursor_position, 4);
        app.move_cursor_by_words(-1);
        assert_eq!(app.cursor_position, 0);
        app.move_cursor_by_words(1);
        assert_eq!(app.cursor_position, 4);
    }

    #[test]
    fn history_recall_fills_input() {
        let mut app = typed("1+1");
        app.submit();
        app.input = "2+2".into();
        app.submit();
        app.navigate_history(-1);
        assert_eq!(app.input, "2+2");
        app.navigate_history(-1);
        assert_eq!(app.input, "1+1");
        app.navigate_history(1);
        app.navigate_history(1);
        assert!(app.input.is_empty());
    }

    #[test]
    fn input_scroll_follows_cursor() {
        let mut app = typed("1234567890");
        app.adjust_input_scroll(4);
        assert_eq!(app.input_scroll, 6);
        app.cursor_position = 0;
        app.adjust_input_scroll(4);
        assert_eq!(app.input_scroll, 0);
    }
}
