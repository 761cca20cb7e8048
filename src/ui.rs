use crate::controller::Controller;
use crate::datekey::{
    date_key_of, days_in_month, first_weekday_of_month, format_date_key, format_month_key,
    to_naive_date, total_days_in_year,
};
use crate::model::Note;
use crate::storage::StoreScope;
use anyhow::Result;
use chrono::{Datelike, Duration as ChronoDuration, NaiveDate, Utc};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Alignment, Color, Modifier, Rect, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};
use ratatui::Terminal;
use std::io::{stdout, Stdout};
use std::time::Instant;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAY_HEADER: &str = "Su Mo Tu We Th Fr Sa";

pub fn run(controller: Controller, year: i32) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let mut app = App::new(controller, year);
    let result = app.event_loop(&mut terminal);
    teardown_terminal(&mut terminal)?;
    result
}

struct App {
    controller: Controller,
    year: i32,
    cursor: NaiveDate,
    mode: Mode,
    show_notes_panel: bool,
    draft: FieldValue,
    status: String,
    last_change: Instant,
    // Hit regions rebuilt on every draw.
    day_cells: Vec<(Rect, (i32, u32, u32))>,
    month_headers: Vec<(Rect, u32)>,
    grid_area: Rect,
}

enum Mode {
    Normal,
    NoteInput,
    ConfirmDelete { note_id: String },
}

impl App {
    fn new(controller: Controller, year: i32) -> Self {
        let today = Utc::now().date_naive();
        let cursor = if today.year() == year {
            today
        } else {
            NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(today)
        };
        let status = format!(
            "Loaded calendar from {}",
            controller.location().path.display()
        );
        App {
            controller,
            year,
            cursor,
            mode: Mode::Normal,
            show_notes_panel: false,
            draft: FieldValue::new(""),
            status,
            last_change: Instant::now(),
            day_cells: Vec::new(),
            month_headers: Vec::new(),
            grid_area: Rect::default(),
        }
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        if let Some(diag) = self.controller.take_diagnostic() {
            self.status = diag;
        }
        loop {
            terminal.draw(|f| self.draw(f))?;
            if event::poll(std::time::Duration::from_millis(200))? {
                match event::read()? {
                    Event::Key(key) => {
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        if self.handle_key(key)? {
                            break;
                        }
                    }
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }
        }
        Ok(())
    }

    // --- input -----------------------------------------------------------

    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        match self.mode {
            Mode::Normal => self.handle_normal_key(key),
            Mode::NoteInput => {
                self.handle_note_input_key(key);
                Ok(false)
            }
            Mode::ConfirmDelete { .. } => {
                self.handle_confirm_key(key);
                Ok(false)
            }
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Esc => {
                if self.controller.preview_note().is_some() {
                    self.controller.dismiss_preview();
                    self.status = "Preview closed".into();
                }
            }
            KeyCode::Left | KeyCode::Char('h') => self.shift_cursor(-1),
            KeyCode::Right | KeyCode::Char('l') => self.shift_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => self.shift_cursor(-7),
            KeyCode::Down | KeyCode::Char('j') => self.shift_cursor(7),
            KeyCode::Char(' ') => {
                let (y, m, d) = self.cursor_triple();
                self.controller.on_day_press(y, m, d);
                self.controller.on_release_pointer();
                self.after_mutation(format!("Toggled {}", date_key_of(self.cursor)));
            }
            KeyCode::Char('m') => {
                let (y, m, _) = self.cursor_triple();
                self.controller.on_month_header_click(y, m);
                let label = MONTH_NAMES[m as usize];
                if self.controller.is_month_selected(&format_month_key(y, m)) {
                    self.after_mutation(format!("Selected all of {}", label));
                } else {
                    self.after_mutation(format!("Deselected {}", label));
                }
            }
            KeyCode::Enter => {
                let (y, m, d) = self.cursor_triple();
                if self.controller.on_day_click(y, m, d) {
                    self.status = "Note preview opened (d delete, Esc close)".into();
                } else {
                    self.status = "No note on that day".into();
                }
            }
            KeyCode::Char('n') => {
                if self.controller.day_count() == 0 {
                    self.status = "Select some days first to add a note".into();
                } else {
                    self.show_notes_panel = true;
                    self.mode = Mode::NoteInput;
                    self.status = "Writing note (Enter save, Esc cancel)".into();
                }
            }
            KeyCode::Char('p') => {
                self.show_notes_panel = !self.show_notes_panel;
            }
            KeyCode::Char('c') => {
                self.controller.clear_selection();
                self.after_mutation("Selection cleared".to_string());
            }
            KeyCode::Char('d') => {
                if let Some(note) = self.controller.preview_note() {
                    let note_id = note.id.clone();
                    self.status = format!("Delete note {}? (y confirm, n/Esc cancel)", note_id);
                    self.mode = Mode::ConfirmDelete { note_id };
                } else {
                    self.status = "Open a note preview first (Enter on a noted day)".into();
                }
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_note_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.status = "Note canceled".into();
            }
            KeyCode::Enter => {
                let text = self.draft.value.clone();
                if self.controller.on_save_note_requested(&text) {
                    self.draft = FieldValue::new("");
                    self.mode = Mode::Normal;
                    self.after_mutation("Saved note".to_string());
                } else {
                    self.status = "Nothing saved: note text and selection must be non-empty".into();
                }
            }
            KeyCode::Backspace => self.draft.backspace(),
            KeyCode::Left => self.draft.move_left(),
            KeyCode::Right => self.draft.move_right(),
            KeyCode::Char(c) => {
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    self.draft.insert_char(c);
                }
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        let note_id = match &self.mode {
            Mode::ConfirmDelete { note_id } => note_id.clone(),
            _ => return,
        };
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                self.controller.on_delete_note_requested(&note_id);
                self.after_mutation(format!("Deleted note {}", note_id));
                self.mode = Mode::Normal;
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.status = "Delete canceled".into();
                self.mode = Mode::Normal;
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.handle_mouse_down(mouse.column, mouse.row)
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if !self.controller.is_dragging() {
                    return;
                }
                if let Some((y, m, d)) = self.day_cell_at(mouse.column, mouse.row) {
                    self.controller.on_day_hover_during_drag(y, m, d);
                    self.after_mutation(format!(
                        "{} days selected",
                        self.controller.day_count()
                    ));
                } else if !hit(self.grid_area, mouse.column, mouse.row) {
                    // Dragged off the calendar entirely: treat as release so
                    // the gesture can't stick.
                    self.controller.on_release_pointer();
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.controller.on_release_pointer(),
            _ => {}
        }
    }

    fn handle_mouse_down(&mut self, column: u16, row: u16) {
        if !matches!(self.mode, Mode::Normal) {
            return;
        }
        if self.controller.preview_note().is_some() {
            self.controller.dismiss_preview();
        }
        if let Some(month) = self.month_header_at(column, row) {
            self.controller.on_month_header_click(self.year, month);
            self.after_mutation(format!(
                "Toggled {} (months selected: {})",
                MONTH_NAMES[month as usize],
                self.controller.month_count()
            ));
            return;
        }
        if let Some((y, m, d)) = self.day_cell_at(column, row) {
            if let Some(date) = to_naive_date(y, m, d) {
                self.cursor = date;
            }
            // A press on a noted day opens the preview instead of toggling.
            if self.controller.on_day_click(y, m, d) {
                self.status = "Note preview opened (d delete, Esc close)".into();
                return;
            }
            self.controller.on_day_press(y, m, d);
            self.after_mutation(format!("Toggled {}", format_date_key(y, m, d)));
        }
    }

    fn day_cell_at(&self, column: u16, row: u16) -> Option<(i32, u32, u32)> {
        self.day_cells
            .iter()
            .find(|(rect, _)| hit(*rect, column, row))
            .map(|(_, triple)| *triple)
    }

    fn month_header_at(&self, column: u16, row: u16) -> Option<u32> {
        self.month_headers
            .iter()
            .find(|(rect, _)| hit(*rect, column, row))
            .map(|(_, month)| *month)
    }

    fn cursor_triple(&self) -> (i32, u32, u32) {
        (self.cursor.year(), self.cursor.month0(), self.cursor.day())
    }

    fn shift_cursor(&mut self, days: i64) {
        if let Some(next) = self.cursor.checked_add_signed(ChronoDuration::days(days)) {
            self.cursor = if next.year() == self.year {
                next
            } else if next.year() < self.year {
                NaiveDate::from_ymd_opt(self.year, 1, 1).unwrap_or(self.cursor)
            } else {
                NaiveDate::from_ymd_opt(self.year, 12, 31).unwrap_or(self.cursor)
            };
        }
    }

    fn after_mutation(&mut self, message: String) {
        self.status = match self.controller.take_diagnostic() {
            Some(diag) => diag,
            None => message,
        };
        self.last_change = Instant::now();
    }

    // --- drawing ---------------------------------------------------------

    fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(f.size());

        self.draw_header(f, layout[0]);

        let body = if self.show_notes_panel {
            let split = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(40), Constraint::Length(44)])
                .split(layout[1]);
            self.draw_notes_panel(f, split[1]);
            split[0]
        } else {
            layout[1]
        };
        self.draw_grid(f, body);
        self.draw_footer(f, layout[2]);

        if let Some(note) = self.controller.preview_note() {
            let note = note.clone();
            self.draw_preview(f, &note);
        }
    }

    fn draw_header(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let scope = match self.controller.location().scope {
            StoreScope::Project => "project",
            StoreScope::Global => "global",
        };
        let title = Line::from(vec![
            Span::styled(
                "yeargrid ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                self.year.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  •  "),
            Span::styled(scope, Style::default().fg(Color::Green)),
            Span::raw("  •  "),
            Span::styled(
                format!("{}", self.controller.location().path.display()),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw("  •  "),
            Span::styled(
                format!("saved {}", format_elapsed(self.last_change)),
                Style::default().fg(Color::Gray),
            ),
        ]);

        let percent = self.controller.day_count() as f64
            / total_days_in_year(self.year) as f64
            * 100.0;
        let stats = Line::from(vec![
            Span::styled(
                format!("{} days", self.controller.day_count()),
                Style::default().fg(Color::LightBlue),
            ),
            Span::raw("  •  "),
            Span::styled(
                format!("{:.1}% of year", percent),
                Style::default().fg(Color::LightBlue),
            ),
            Span::raw("  •  "),
            Span::styled(
                format!("{} months", self.controller.month_count()),
                Style::default().fg(Color::LightGreen),
            ),
            Span::raw("  •  "),
            Span::styled(
                format!("{} notes", self.controller.note_count()),
                Style::default().fg(Color::LightMagenta),
            ),
        ]);

        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray));
        let paragraph = Paragraph::new(vec![title, stats])
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(paragraph, area);
    }

    fn draw_grid(&mut self, f: &mut ratatui::Frame<'_>, area: Rect) {
        self.day_cells.clear();
        self.month_headers.clear();
        self.grid_area = area;

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(area);
        for (row_idx, row) in rows.iter().enumerate() {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Ratio(1, 4),
                    Constraint::Ratio(1, 4),
                    Constraint::Ratio(1, 4),
                    Constraint::Ratio(1, 4),
                ])
                .split(*row);
            for (col_idx, col) in cols.iter().enumerate() {
                let month = (row_idx * 4 + col_idx) as u32;
                self.draw_month_card(f, *col, month);
            }
        }
    }

    fn draw_month_card(&mut self, f: &mut ratatui::Frame<'_>, area: Rect, month: u32) {
        if area.width < 23 || area.height < 3 {
            return;
        }
        let month_key = format_month_key(self.year, month);
        let month_selected = self.controller.is_month_selected(&month_key);
        let accent = if month_selected {
            Color::LightBlue
        } else {
            Color::DarkGray
        };
        let title_style = if month_selected {
            Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        };
        let block = Block::default()
            .title(Span::styled(MONTH_NAMES[month as usize], title_style))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent));
        let inner = block.inner(area);
        f.render_widget(block, area);

        // The whole title row toggles the month.
        self.month_headers.push((
            Rect {
                x: area.x,
                y: area.y,
                width: area.width,
                height: 1,
            },
            month,
        ));

        if inner.width < 21 || inner.height < 2 {
            return;
        }

        let mut lines = Vec::new();
        lines.push(Line::from(Span::styled(
            WEEKDAY_HEADER,
            Style::default().fg(Color::Gray),
        )));

        let days = days_in_month(self.year, month);
        let first_weekday = first_weekday_of_month(self.year, month);
        let mut spans: Vec<Span<'static>> = Vec::new();
        for _ in 0..first_weekday {
            spans.push(Span::raw("   "));
        }
        for day in 1..=days {
            let slot = first_weekday + day - 1;
            let week_row = slot / 7;
            let weekday = slot % 7;
            let key = format_date_key(self.year, month, day);
            let cell_rect = Rect {
                x: inner.x + (weekday * 3) as u16,
                y: inner.y + 1 + week_row as u16,
                width: 3,
                height: 1,
            };
            if cell_rect.y < inner.y + inner.height {
                self.day_cells
                    .push((cell_rect, (self.year, month, day)));
            }
            spans.push(self.day_span(day, &key));
            if weekday == 6 {
                lines.push(Line::from(std::mem::take(&mut spans)));
            }
        }
        if !spans.is_empty() {
            lines.push(Line::from(spans));
        }

        let paragraph = Paragraph::new(lines);
        f.render_widget(paragraph, inner);
    }

    fn day_span(&self, day: u32, key: &str) -> Span<'static> {
        let noted = self.controller.note_for_day(key);
        let selected = self.controller.is_day_selected(key);
        let is_cursor = date_key_of(self.cursor) == key;
        let mut style = if let Some(note) = noted {
            Style::default()
                .bg(color_for_token(&note.color))
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else if selected {
            Style::default().bg(Color::Blue).fg(Color::White)
        } else {
            Style::default().fg(Color::Gray)
        };
        if is_cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        // Noted days carry a marker in place of the trailing pad.
        let text = if noted.is_some() {
            format!("{:>2}•", day)
        } else {
            format!("{:>2} ", day)
        };
        Span::styled(text, style)
    }

    fn draw_notes_panel(&mut self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let writing = matches!(self.mode, Mode::NoteInput);
        let block = Block::default()
            .title(Span::styled(
                format!("Notes ({})", self.controller.note_count()),
                Style::default()
                    .fg(if writing { Color::Cyan } else { Color::Gray })
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if writing {
                Color::Cyan
            } else {
                Color::DarkGray
            }));
        let inner = block.inner(area);
        f.render_widget(block, area);
        if inner.height < 3 {
            return;
        }

        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(inner);

        let draft_text = if writing {
            self.draft.with_caret()
        } else if self.controller.day_count() == 0 {
            "Select some days first, then press n".to_string()
        } else {
            format!(
                "Press n to note {} selected day(s)",
                self.controller.day_count()
            )
        };
        let draft = Paragraph::new(draft_text)
            .style(Style::default().fg(if writing { Color::Cyan } else { Color::DarkGray }))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(draft, sections[0]);

        let items: Vec<ListItem> = if self.controller.notes().is_empty() {
            vec![ListItem::new("No notes yet")]
        } else {
            self.controller
                .notes()
                .iter()
                .map(|note| note_list_item(note, inner.width))
                .collect()
        };
        let list = List::new(items);
        f.render_widget(list, sections[1]);
    }

    fn draw_footer(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let hints = match self.mode {
            Mode::Normal => {
                "click/drag select  •  month name selects month  •  Space toggle  •  m month  •  n note  •  p panel  •  Enter preview  •  c clear  •  q quit"
            }
            Mode::NoteInput => "Enter save  •  Esc cancel",
            Mode::ConfirmDelete { .. } => "y confirm delete  •  n/Esc cancel",
        };
        let lines = vec![
            Line::from(Span::styled(
                self.status.clone(),
                Style::default().fg(Color::Yellow),
            )),
            Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray))),
        ];
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray));
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(paragraph, area);
    }

    fn draw_preview(&self, f: &mut ratatui::Frame<'_>, note: &Note) {
        let area = centered_rect(45, 40, f.size());
        let block = Block::default()
            .title(Span::styled(
                "Note Preview",
                Style::default()
                    .fg(color_for_token(&note.color))
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color_for_token(&note.color)));
        let day_word = if note.dates.len() == 1 { "day" } else { "days" };
        let lines = vec![
            Line::from(Span::styled(
                format!(
                    "{} {} • created {}",
                    note.dates.len(),
                    day_word,
                    note.created_at.format("%Y-%m-%d")
                ),
                Style::default().fg(Color::Gray),
            )),
            Line::raw(""),
            Line::from(Span::styled(
                note.content.clone(),
                Style::default().fg(Color::White),
            )),
            Line::raw(""),
            Line::from(Span::styled(
                "d delete  •  Esc close",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(block);
        f.render_widget(Clear, area);
        f.render_widget(paragraph, area);
    }
}

#[derive(Clone)]
struct FieldValue {
    value: String,
    cursor: usize,
}

impl FieldValue {
    fn new(value: &str) -> Self {
        FieldValue {
            value: value.to_string(),
            cursor: value.len(),
        }
    }

    fn move_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor = prev_char(self.cursor, &self.value);
    }

    fn move_right(&mut self) {
        if self.cursor >= self.value.len() {
            return;
        }
        self.cursor = next_char(self.cursor, &self.value);
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = prev_char(self.cursor, &self.value);
        self.value.drain(prev..self.cursor);
        self.cursor = prev;
    }

    fn insert_char(&mut self, ch: char) {
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    fn with_caret(&self) -> String {
        let mut text = self.value.clone();
        text.insert_str(self.cursor, "▌");
        text
    }
}

fn prev_char(cursor: usize, text: &str) -> usize {
    let mut prev = 0;
    for (idx, _) in text.char_indices() {
        if idx >= cursor {
            break;
        }
        prev = idx;
    }
    prev
}

fn next_char(cursor: usize, text: &str) -> usize {
    for (idx, ch) in text.char_indices() {
        if idx > cursor {
            return idx;
        }
        if idx == cursor {
            return cursor + ch.len_utf8();
        }
    }
    text.len()
}

fn note_list_item(note: &Note, width: u16) -> ListItem<'static> {
    let day_word = if note.dates.len() == 1 { "day" } else { "days" };
    let header = Line::from(vec![
        Span::styled(
            "■ ",
            Style::default().fg(color_for_token(&note.color)),
        ),
        Span::styled(
            format!("[{}] ", note.id),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{} {} • {}", note.dates.len(), day_word, note.created_at.format("%Y-%m-%d")),
            Style::default().fg(Color::Gray),
        ),
    ]);
    let body = Line::from(Span::styled(
        truncate_text(&note.content, width.saturating_sub(4) as usize),
        Style::default().fg(Color::White),
    ));
    ListItem::new(vec![header, body, Line::raw("")])
}

fn color_for_token(token: &str) -> Color {
    match token {
        "emerald" => Color::LightGreen,
        "purple" => Color::Magenta,
        "orange" => Color::Rgb(255, 165, 0),
        "pink" => Color::LightMagenta,
        "cyan" => Color::Cyan,
        "yellow" => Color::Yellow,
        "red" => Color::Red,
        "indigo" => Color::LightBlue,
        _ => Color::Gray,
    }
}

fn hit(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

fn truncate_text(text: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    for ch in text.chars() {
        if out.chars().count() >= max.saturating_sub(3) {
            out.push_str("...");
            break;
        }
        out.push(ch);
    }
    if out.chars().count() > max {
        out.truncate(max);
    }
    out
}

fn format_elapsed(last: Instant) -> String {
    let secs = last.elapsed().as_secs();
    if secs < 60 {
        format!("{}s ago", secs)
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else {
        format!("{}h ago", secs / 3600)
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(popup_layout[1])[1]
}
