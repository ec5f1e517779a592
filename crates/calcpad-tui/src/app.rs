//! Application state and rendering.
//!
//! [`App`] owns the document, the decoration processor and the calculator. Edits go through
//! [`DocumentStateManager::execute`]; a subscriber flags text changes so that, once a key has
//! been handled, decorations are recomputed and the matching [`Trigger`] is offered to the
//! calculator.

use crate::config::Palette;
use calcpad_core::{
    Command, CursorCommand, DocumentStateManager, EditCommand, StateChangeType, StyleId,
};
use calcpad_decorate::{
    PATTERN_STYLE_HANDLE, PATTERN_STYLE_HASHTAG, PATTERN_STYLE_NUMBER, PatternDecorationProcessor,
};
use calcpad_eval::{Calculator, Trigger, TriggerPolicy};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::{
    fs, io,
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};
use tracing::{debug, info};
use unicode_width::UnicodeWidthChar;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid decoration pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Startup options resolved from the config file and the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    pub policy: TriggerPolicy,
    pub palette: Palette,
    pub show_raw: bool,
}

pub struct App {
    state: DocumentStateManager,
    decorations: PatternDecorationProcessor,
    calculator: Calculator,
    /// Set by the document subscriber, drained after each key.
    text_changed: Arc<AtomicBool>,
    palette: Palette,
    file_path: Option<PathBuf>,
    show_raw: bool,
    should_quit: bool,
    confirm_quit: bool,
    status_message: String,
    scroll_top: usize,
    viewport_height: usize,
}

impl App {
    pub fn new(
        content: &str,
        file_path: Option<PathBuf>,
        settings: Settings,
    ) -> Result<Self, AppError> {
        let mut state = DocumentStateManager::new(content);

        let text_changed = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&text_changed);
        state.subscribe(move |change| {
            if change.change_type == StateChangeType::DocumentModified {
                flag.store(true, Ordering::Relaxed);
            }
        });

        let mut app = Self {
            state,
            decorations: PatternDecorationProcessor::default_rules()?,
            calculator: Calculator::new(settings.policy),
            text_changed,
            palette: settings.palette,
            file_path,
            show_raw: settings.show_raw,
            should_quit: false,
            confirm_quit: false,
            status_message: String::new(),
            scroll_top: 0,
            viewport_height: 0,
        };

        app.refresh_decorations();
        if !content.is_empty() {
            app.fire(Trigger::Calculate);
        }
        Ok(app)
    }

    /// Open `file_path` if it exists; a missing file starts an empty document saved there.
    pub fn open(file_path: Option<PathBuf>, settings: Settings) -> Result<Self, AppError> {
        let content = match &file_path {
            Some(path) if path.exists() => fs::read_to_string(path)?,
            _ => String::new(),
        };
        Self::new(&content, file_path, settings)
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn state(&self) -> &DocumentStateManager {
        &self.state
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.confirm_quit {
            self.handle_confirm_key(key);
            return;
        }

        let mut trigger = Trigger::TextChanged;

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => self.save(),
            (KeyModifiers::CONTROL, KeyCode::Char('q')) => self.request_quit(),
            (KeyModifiers::CONTROL, KeyCode::Char('e')) => {
                self.fire(Trigger::Calculate);
                let results = self.calculator.results();
                self.status_message = format!(
                    "calculated {} lines ({} failed)",
                    results.len(),
                    results.failure_count()
                );
            }
            (KeyModifiers::CONTROL, KeyCode::Char('r')) => self.show_raw = !self.show_raw,
            (KeyModifiers::CONTROL, KeyCode::Char('t')) => self.toggle_policy(),

            (_, KeyCode::Left) => self.execute(Command::Cursor(CursorCommand::Left)),
            (_, KeyCode::Right) => self.execute(Command::Cursor(CursorCommand::Right)),
            (_, KeyCode::Up) => self.execute(Command::Cursor(CursorCommand::Up)),
            (_, KeyCode::Down) => self.execute(Command::Cursor(CursorCommand::Down)),
            (_, KeyCode::Home) => self.execute(Command::Cursor(CursorCommand::LineStart)),
            (_, KeyCode::End) => self.execute(Command::Cursor(CursorCommand::LineEnd)),

            (_, KeyCode::Backspace) => self.execute(Command::Edit(EditCommand::Backspace)),
            (_, KeyCode::Delete) => self.execute(Command::Edit(EditCommand::DeleteForward)),
            (_, KeyCode::Enter) => {
                self.execute(Command::Edit(EditCommand::InsertNewline));
                trigger = Trigger::Enter;
            }
            (mods, KeyCode::Char(c))
                if !mods.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.insert_text(c.to_string());
            }

            _ => {}
        }

        self.after_key(trigger);
        self.adjust_scroll();
    }

    /// Bracketed paste. Line breaks in the pasted text do not count as Enter.
    pub fn handle_paste(&mut self, text: String) {
        if self.confirm_quit || text.is_empty() {
            return;
        }
        self.insert_text(text);
        self.after_key(Trigger::TextChanged);
        self.adjust_scroll();
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => match self.save_file() {
                Ok(true) => self.should_quit = true,
                Ok(false) => {
                    self.status_message = "no file to save to".to_string();
                    self.confirm_quit = false;
                }
                Err(e) => {
                    self.status_message = format!("save failed: {e}");
                    self.confirm_quit = false;
                }
            },
            KeyCode::Char('n') | KeyCode::Char('N') => self.should_quit = true,
            KeyCode::Esc => {
                self.confirm_quit = false;
                self.status_message.clear();
            }
            _ => {}
        }
    }

    fn request_quit(&mut self) {
        if self.state.get_document_state().is_modified {
            self.confirm_quit = true;
            self.status_message = "document modified. save? (y/n)".to_string();
        } else {
            self.should_quit = true;
        }
    }

    fn toggle_policy(&mut self) {
        let policy = match self.calculator.policy() {
            TriggerPolicy::OnEnter => TriggerPolicy::OnEveryChange,
            TriggerPolicy::OnEveryChange => TriggerPolicy::OnEnter,
        };
        self.calculator.set_policy(policy);
        self.status_message = format!("trigger: {policy}");
        info!(%policy, "trigger policy changed");
    }

    fn insert_text(&mut self, text: String) {
        self.execute(Command::Edit(EditCommand::InsertText { text }));
    }

    fn execute(&mut self, command: Command) {
        if let Err(err) = self.state.execute(command) {
            self.status_message = format!("command failed: {err}");
        }
    }

    fn after_key(&mut self, trigger: Trigger) {
        if !self.text_changed.swap(false, Ordering::Relaxed) {
            return;
        }
        self.status_message.clear();
        self.refresh_decorations();
        self.fire(trigger);
    }

    fn refresh_decorations(&mut self) {
        let Ok(()) = self.state.apply_processor(&mut self.decorations);
    }

    fn fire(&mut self, trigger: Trigger) {
        let lines = self.state.lines();
        if self.calculator.notify(trigger, &lines) {
            debug!(?trigger, pass = self.calculator.pass_count(), "results updated");
        }
    }

    fn save(&mut self) {
        self.status_message = match self.save_file() {
            Ok(true) => match &self.file_path {
                Some(path) => format!("saved: {}", path.display()),
                None => String::new(),
            },
            Ok(false) => "no file to save to (start calcpad with a FILE argument)".to_string(),
            Err(e) => format!("save failed: {e}"),
        };
    }

    /// Returns `Ok(false)` when there is no file path.
    fn save_file(&mut self) -> io::Result<bool> {
        let Some(path) = &self.file_path else {
            return Ok(false);
        };
        fs::write(path, self.state.get_text())?;
        info!(path = %path.display(), "saved");
        self.state.mark_saved();
        Ok(true)
    }

    fn adjust_scroll(&mut self) {
        if self.viewport_height == 0 {
            return;
        }
        let line = self.state.cursor().line;
        if line < self.scroll_top {
            self.scroll_top = line;
        }
        if line >= self.scroll_top + self.viewport_height {
            self.scroll_top = line + 1 - self.viewport_height;
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // editor (+ raw pane)
                Constraint::Length(3), // results
                Constraint::Length(1), // status
                Constraint::Length(1), // shortcuts
            ])
            .split(frame.area());

        let (editor_area, raw_area) = if self.show_raw {
            let halves = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(chunks[0]);
            (halves[0], Some(halves[1]))
        } else {
            (chunks[0], None)
        };

        self.viewport_height = editor_area.height.saturating_sub(2) as usize;
        self.adjust_scroll();

        self.render_editor(frame, editor_area);
        if let Some(area) = raw_area {
            self.render_raw(frame, area);
        }
        self.render_results(frame, chunks[1]);
        self.render_status_line(frame, chunks[2]);
        self.render_shortcuts(frame, chunks[3]);
    }

    fn style_for_style_ids(&self, style_ids: &[StyleId]) -> Style {
        let bg = match self.decorations.decorator().topmost(style_ids) {
            Some(PATTERN_STYLE_HANDLE) => self.palette.handle,
            Some(PATTERN_STYLE_HASHTAG) => self.palette.hashtag,
            Some(PATTERN_STYLE_NUMBER) => self.palette.number,
            _ => return Style::default(),
        };
        Style::default().bg(bg).fg(Color::Black)
    }

    fn render_editor(&self, frame: &mut Frame, area: Rect) {
        let line_index = &self.state.document().line_index;
        let inner_height = area.height.saturating_sub(2) as usize;
        let inner_width = area.width.saturating_sub(2) as usize;

        let mut display_lines = Vec::with_capacity(inner_height);
        for line in self.scroll_top..(self.scroll_top + inner_height).min(line_index.line_count()) {
            let text = line_index.get_line_text(line).unwrap_or_default();
            let line_start = line_index.position_to_char_offset(line, 0);
            let line_end = line_start + line_index.line_len_chars(line);
            let intervals = self.state.get_styles_in_range(line_start, line_end);

            let mut spans = Vec::new();
            let mut buffer = String::new();
            let mut current_style: Option<Style> = None;

            for (column, ch) in text.chars().enumerate() {
                let offset = line_start + column;
                let style_ids: Vec<StyleId> = intervals
                    .iter()
                    .filter(|(start, end, _)| *start <= offset && offset < *end)
                    .map(|(_, _, style_id)| *style_id)
                    .collect();
                let style = self.style_for_style_ids(&style_ids);

                if current_style != Some(style) {
                    if !buffer.is_empty() {
                        spans.push(Span::styled(
                            std::mem::take(&mut buffer),
                            current_style.unwrap_or_default(),
                        ));
                    }
                    current_style = Some(style);
                }
                buffer.push(ch);
            }
            if !buffer.is_empty() {
                spans.push(Span::styled(buffer, current_style.unwrap_or_default()));
            }

            display_lines.push(Line::from(spans));
        }

        let title = format!(
            " {} {}",
            self.file_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "[untitled]".to_string()),
            if self.state.get_document_state().is_modified {
                "[+] "
            } else {
                ""
            },
        );
        let paragraph =
            Paragraph::new(display_lines).block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, area);

        if inner_height == 0 || inner_width == 0 {
            return;
        }

        let cursor = self.state.cursor();
        if cursor.line < self.scroll_top || cursor.line >= self.scroll_top + inner_height {
            return;
        }
        let cursor_x: usize = line_index
            .get_line_text(cursor.line)
            .unwrap_or_default()
            .chars()
            .take(cursor.column)
            .map(|ch| ch.width().unwrap_or(0))
            .sum();

        let x = area.x + 1 + cursor_x.min(inner_width - 1) as u16;
        let y = area.y + 1 + (cursor.line - self.scroll_top) as u16;
        frame.set_cursor_position((x, y));
    }

    fn render_raw(&self, frame: &mut Frame, area: Rect) {
        let json = match self.state.raw_content().to_json_pretty() {
            Ok(json) => json,
            Err(err) => format!("raw content unavailable: {err}"),
        };
        let paragraph = Paragraph::new(json)
            .block(Block::default().borders(Borders::ALL).title(" raw "))
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(paragraph, area);
    }

    fn render_results(&self, frame: &mut Frame, area: Rect) {
        let results = self.calculator.results();
        let text = if results.is_empty() {
            "press Enter or Ctrl-E to evaluate".to_string()
        } else {
            results.summary()
        };
        let paragraph = Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" results [{}] ", self.calculator.policy())),
            );
        frame.render_widget(paragraph, area);
    }

    fn render_status_line(&self, frame: &mut Frame, area: Rect) {
        let doc_state = self.state.get_document_state();
        let cursor = self.state.cursor();

        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            format!(
                "Ln {} Col {} | lines {} chars {} | v{} | passes {}",
                cursor.line + 1,
                cursor.column + 1,
                doc_state.line_count,
                doc_state.char_count,
                doc_state.version,
                self.calculator.pass_count(),
            )
        };

        let status_line = Paragraph::new(status_text).style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(status_line, area);
    }

    fn render_shortcuts(&self, frame: &mut Frame, area: Rect) {
        let shortcuts = if self.confirm_quit {
            "Y:save and quit  N:quit without saving  Esc:cancel"
        } else {
            "Enter:newline+eval  Ctrl-E:eval  Ctrl-T:trigger  Ctrl-R:raw  Ctrl-S:save  Ctrl-Q:quit"
        };

        let shortcuts_line =
            Paragraph::new(shortcuts).style(Style::default().bg(Color::Blue).fg(Color::White));
        frame.render_widget(shortcuts_line, area);
    }
}
