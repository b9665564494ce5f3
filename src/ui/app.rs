use std::mem;

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use tracing::warn;

use crate::models::SearchField;
use crate::store::Library;

use super::forms::{BookField, BookForm, ConfirmBookRemove};
use super::helpers::{book_line, centered_rect, surface_error};
use super::screens::{MenuItem, SearchScreen, Selection};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Width of the menu column on the left.
const SIDEBAR_WIDTH: u16 = 26;
/// Rows moved by PageUp/PageDown.
const PAGE_STEP: isize = 5;

/// Fine-grained modes layered over the current menu entry.
enum Mode {
    Normal,
    AddingBook(BookForm),
    ConfirmRemove(ConfirmBookRemove),
    Searching,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Warning,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Warning => Style::default().fg(Color::Yellow),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    library: Library,
    menu: MenuItem,
    remove_list: Selection,
    all_books: Selection,
    search: SearchScreen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(library: Library) -> Self {
        Self {
            library,
            menu: MenuItem::AddBook,
            remove_list: Selection::default(),
            all_books: Selection::default(),
            search: SearchScreen::default(),
            mode: Mode::Normal,
            status: None,
        }
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Feed one key press into the state machine. Returns `true` once the
    /// user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingBook(form) => self.handle_add_book(code, form)?,
            Mode::ConfirmRemove(confirm) => self.handle_confirm_remove(code, confirm)?,
            Mode::Searching => self.handle_search(code)?,
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
                return Ok(Mode::Normal);
            }
            KeyCode::Tab => {
                self.switch_menu(self.menu.offset(1));
                return Ok(Mode::Normal);
            }
            KeyCode::BackTab => {
                self.switch_menu(self.menu.offset(-1));
                return Ok(Mode::Normal);
            }
            KeyCode::Char('+') => return Ok(self.open_add_form()),
            KeyCode::Char(ch) if ch.is_ascii_digit() => {
                if let Some(item) = MenuItem::from_shortcut(ch) {
                    self.switch_menu(item);
                }
                return Ok(Mode::Normal);
            }
            _ => {}
        }

        match self.menu {
            MenuItem::AddBook => {
                if code == KeyCode::Enter {
                    return Ok(self.open_add_form());
                }
            }
            MenuItem::RemoveBook => match code {
                KeyCode::Enter | KeyCode::Char('-') | KeyCode::Delete => {
                    return Ok(self.confirm_remove_selected());
                }
                other => {
                    let len = self.library.len();
                    navigate(&mut self.remove_list, other, len);
                }
            },
            MenuItem::SearchBooks => match code {
                KeyCode::Enter | KeyCode::Char('f') | KeyCode::Char('/') => {
                    self.clear_status();
                    return Ok(Mode::Searching);
                }
                other => {
                    let len = self.search.results.len();
                    navigate(&mut self.search.selection, other, len);
                }
            },
            MenuItem::AllBooks => {
                let len = self.library.len();
                navigate(&mut self.all_books, code, len);
            }
            MenuItem::Statistics => {}
        }

        Ok(Mode::Normal)
    }

    fn handle_add_book(&mut self, code: KeyCode, mut form: BookForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Add book cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_book(&form) {
                Ok(_) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::AddingBook(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_confirm_remove(&mut self, code: KeyCode, confirm: ConfirmBookRemove) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Removal cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.perform_remove(&confirm) {
                    Ok(_) => Ok(Mode::Normal),
                    Err(err) => {
                        let message = surface_error(&err);
                        self.set_status(message, StatusKind::Error);
                        Ok(Mode::ConfirmRemove(confirm))
                    }
                }
            }
            _ => Ok(Mode::ConfirmRemove(confirm)),
        }
    }

    fn handle_search(&mut self, code: KeyCode) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Enter => return Ok(Mode::Normal),
            KeyCode::Tab | KeyCode::BackTab => self.search.toggle_field(&self.library),
            KeyCode::Backspace => self.search.backspace(&self.library),
            KeyCode::Char(ch) if !ch.is_control() => self.search.push_char(ch, &self.library),
            other => {
                let len = self.search.results.len();
                navigate(&mut self.search.selection, other, len);
            }
        }
        Ok(Mode::Searching)
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(content_area);

        self.draw_sidebar(frame, columns[0]);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Personal Library Manager - {} ", self.menu.label()));
        frame.render_widget(block.clone(), columns[1]);
        let main_area = block.inner(columns[1]);

        match self.menu {
            MenuItem::AddBook => self.draw_add_book(frame, main_area),
            MenuItem::RemoveBook => self.draw_remove_list(frame, main_area),
            MenuItem::SearchBooks => self.draw_search(frame, main_area),
            MenuItem::AllBooks => self.draw_all_books(frame, main_area),
            MenuItem::Statistics => self.draw_statistics(frame, main_area),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingBook(form) => self.draw_book_form(frame, area, form),
            Mode::ConfirmRemove(confirm) => self.draw_confirm_remove(frame, area, confirm),
            Mode::Searching | Mode::Normal => {}
        }
    }

    fn draw_sidebar(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(" Menu ");
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(inner);

        let items: Vec<ListItem> = MenuItem::ALL
            .iter()
            .enumerate()
            .map(|(idx, item)| ListItem::new(format!("{} {}", idx + 1, item.label())))
            .collect();
        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        let mut state = ListState::default();
        state.select(Some(self.menu.index()));
        frame.render_stateful_widget(list, chunks[0], &mut state);

        let tagline = Paragraph::new("Your book collection, organized and accessible.")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true });
        frame.render_widget(tagline, chunks[1]);
    }

    fn draw_add_book(&self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(Span::styled(
                "Add a New Book",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Press Enter or '+' to open the form."),
            Line::from(format!(
                "Your library currently holds {} book(s).",
                self.library.len()
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_remove_list(&self, frame: &mut Frame, area: Rect) {
        if self.library.is_empty() {
            let message = Paragraph::new("No books available to remove.")
                .style(Style::default().fg(Color::Yellow))
                .alignment(Alignment::Center);
            frame.render_widget(message, area);
            return;
        }

        let items: Vec<ListItem> = self
            .library
            .books()
            .iter()
            .map(|book| ListItem::new(book.title.clone()))
            .collect();
        self.render_list(frame, area, items, &self.remove_list);
    }

    fn draw_search(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);

        let key_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let field_span = |field: SearchField| {
            if self.search.field == field {
                Span::styled(format!("(•) {field}"), key_style)
            } else {
                Span::raw(format!("( ) {field}"))
            }
        };

        let editing = matches!(self.mode, Mode::Searching);
        let query_style = if editing {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let block = Block::default().borders(Borders::BOTTOM);
        let header = Paragraph::new(vec![
            Line::from(vec![
                Span::raw("Search by: "),
                field_span(SearchField::Title),
                Span::raw("   "),
                field_span(SearchField::Author),
            ]),
            Line::from(vec![
                Span::raw("Search term: "),
                Span::styled(self.search.query.clone(), query_style),
            ]),
        ])
        .block(block.clone());
        frame.render_widget(header, chunks[0]);

        if editing {
            let inner = block.inner(chunks[0]);
            let cursor_x =
                inner.x + "Search term: ".len() as u16 + self.search.query.chars().count() as u16;
            frame.set_cursor_position((cursor_x, inner.y + 1));
        }

        if self.search.query.trim().is_empty() {
            let hint = Paragraph::new("Press Enter to type a search term.")
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(hint, chunks[1]);
        } else if self.search.results.is_empty() {
            let message =
                Paragraph::new("No books found.").style(Style::default().fg(Color::Yellow));
            frame.render_widget(message, chunks[1]);
        } else {
            let items: Vec<ListItem> = self
                .search
                .results
                .iter()
                .map(|book| ListItem::new(book_line(book)))
                .collect();
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(2)])
                .split(chunks[1]);
            self.render_list(frame, parts[0], items, &self.search.selection);

            if let Some(book) = self.search.current_book() {
                let detail = Paragraph::new(format!(
                    "Match {} of {}: {}",
                    self.search.selection.selected + 1,
                    self.search.results.len(),
                    book
                ))
                .block(Block::default().borders(Borders::TOP))
                .style(Style::default().fg(Color::Gray));
                frame.render_widget(detail, parts[1]);
            }
        }
    }

    fn draw_all_books(&self, frame: &mut Frame, area: Rect) {
        if self.library.is_empty() {
            let message = Paragraph::new("No books in your library yet.")
                .style(Style::default().fg(Color::Cyan))
                .alignment(Alignment::Center);
            frame.render_widget(message, area);
            return;
        }

        let items: Vec<ListItem> = self
            .library
            .books()
            .iter()
            .map(|book| ListItem::new(book_line(book)))
            .collect();
        self.render_list(frame, area, items, &self.all_books);
    }

    fn draw_statistics(&self, frame: &mut Frame, area: Rect) {
        let stats = self.library.statistics();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let bold = Style::default().add_modifier(Modifier::BOLD);
        let lines = vec![
            Line::from(vec![
                Span::raw("Total Books: "),
                Span::styled(stats.total.to_string(), bold),
            ]),
            Line::from(vec![
                Span::raw("Books Read: "),
                Span::styled(stats.read.to_string(), bold),
            ]),
            Line::from(vec![
                Span::raw("Percentage Read: "),
                Span::styled(format!("{:.2}%", stats.percent_read), bold),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), chunks[0]);

        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(" Read "))
            .gauge_style(Style::default().fg(Color::Green))
            .ratio((stats.percent_read / 100.0).clamp(0.0, 1.0));
        frame.render_widget(gauge, chunks[1]);
    }

    fn render_list(
        &self,
        frame: &mut Frame,
        area: Rect,
        items: Vec<ListItem<'static>>,
        selection: &Selection,
    ) {
        let list = List::new(items)
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("▶ ");
        let mut state = ListState::default();
        state.select(Some(selection.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let hints: &[(&str, &str)] = match (&self.mode, self.menu) {
            (Mode::AddingBook(_), _) => &[
                ("[Tab/↑↓]", " Field   "),
                ("[Space]", " Toggle Read   "),
                ("[Enter]", " Save   "),
                ("[Esc]", " Cancel"),
            ],
            (Mode::ConfirmRemove(_), _) => &[("[y/Enter]", " Remove   "), ("[n/Esc]", " Keep")],
            (Mode::Searching, _) => &[
                ("[Tab]", " Title/Author   "),
                ("[↑↓]", " Select   "),
                ("[Enter/Esc]", " Done"),
            ],
            (Mode::Normal, MenuItem::RemoveBook) => &[
                ("[↑↓]", " Select   "),
                ("[Enter/-]", " Remove   "),
                ("[Tab/1-5]", " Menu   "),
                ("[q]", " Quit"),
            ],
            (Mode::Normal, MenuItem::SearchBooks) => &[
                ("[Enter/f]", " Edit Search   "),
                ("[↑↓]", " Select   "),
                ("[Tab/1-5]", " Menu   "),
                ("[q]", " Quit"),
            ],
            (Mode::Normal, MenuItem::AllBooks) => &[
                ("[↑↓]", " Scroll   "),
                ("[+]", " Add   "),
                ("[Tab/1-5]", " Menu   "),
                ("[q]", " Quit"),
            ],
            (Mode::Normal, _) => &[
                ("[Enter/+]", " Add Book   "),
                ("[Tab/1-5]", " Menu   "),
                ("[q]", " Quit"),
            ],
        };

        let spans: Vec<Span<'static>> = hints
            .iter()
            .flat_map(|(key, action)| {
                [
                    Span::styled(key.to_string(), key_style),
                    Span::raw(action.to_string()),
                ]
            })
            .collect();
        Line::from(spans)
    }

    fn draw_book_form(&self, frame: &mut Frame, area: Rect, form: &BookForm) {
        let popup_area = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(" Add Book ").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = BookField::ALL
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        if form.active != BookField::Read {
            let row = BookField::ALL
                .iter()
                .position(|field| *field == form.active)
                .unwrap_or_default() as u16;
            let prefix = form.active.label().len() as u16 + 2;
            let cursor_x = inner.x + prefix + form.value_len(form.active) as u16;
            frame.set_cursor_position((cursor_x, inner.y + row));
        }
    }

    fn draw_confirm_remove(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmBookRemove) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Remove Book ")
            .borders(Borders::ALL)
            .style(Style::default().fg(Color::Red));

        let detail = if confirm.matches > 1 {
            format!(
                "{} books share this title; all of them will be removed.",
                confirm.matches
            )
        } else {
            "This cannot be undone.".to_string()
        };

        let lines = vec![
            Line::from(format!("Remove '{}'?", confirm.title)),
            Line::from(detail),
            Line::from(""),
            Line::from("y / Enter to confirm • n / Esc to cancel"),
        ];
        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    fn switch_menu(&mut self, item: MenuItem) {
        if self.menu != item {
            self.clear_status();
        }
        self.menu = item;
    }

    fn open_add_form(&mut self) -> Mode {
        self.switch_menu(MenuItem::AddBook);
        self.clear_status();
        Mode::AddingBook(BookForm::default())
    }

    fn confirm_remove_selected(&mut self) -> Mode {
        let selected = self
            .library
            .books()
            .get(self.remove_list.selected)
            .map(|book| book.title.clone());
        let Some(title) = selected else {
            self.set_status("No books available to remove.", StatusKind::Warning);
            return Mode::Normal;
        };
        let matches = self.library.count_titled(&title);
        self.clear_status();
        Mode::ConfirmRemove(ConfirmBookRemove { title, matches })
    }

    fn save_new_book(&mut self, form: &BookForm) -> Result<()> {
        let book = form.parse_inputs()?;
        let title = self
            .library
            .add(book)
            .inspect_err(|err| warn!(error = %err, "add failed"))
            .context("failed to add book")?
            .title
            .clone();
        self.after_mutation();
        self.set_status(
            format!("'{title}' has been added to your library!"),
            StatusKind::Info,
        );
        Ok(())
    }

    fn perform_remove(&mut self, confirm: &ConfirmBookRemove) -> Result<()> {
        self.library
            .remove(&confirm.title)
            .inspect_err(|err| warn!(error = %err, "remove failed"))
            .context("failed to remove book")?;
        self.after_mutation();
        self.set_status(
            format!("'{}' has been removed.", confirm.title),
            StatusKind::Info,
        );
        Ok(())
    }

    /// Keep cursors and cached search results in step with the library.
    fn after_mutation(&mut self) {
        let len = self.library.len();
        self.remove_list.ensure_in_bounds(len);
        self.all_books.ensure_in_bounds(len);
        self.search.refresh(&self.library);
    }

    #[cfg(test)]
    fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }
}

/// Shared cursor movement for every list view.
fn navigate(selection: &mut Selection, code: KeyCode, len: usize) {
    match code {
        KeyCode::Up => selection.move_by(-1, len),
        KeyCode::Down => selection.move_by(1, len),
        KeyCode::PageUp => selection.move_by(-PAGE_STEP, len),
        KeyCode::PageDown => selection.move_by(PAGE_STEP, len),
        KeyCode::Home => selection.select_first(),
        KeyCode::End => selection.select_last(len),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn app_with(books: &[(&str, &str, &str, &str, bool)]) -> (tempfile::TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let mut library = Library::open(dir.path().join("library.json")).unwrap();
        for (title, author, year, genre, read) in books {
            library
                .add_from_input(title, author, year, genre, *read)
                .unwrap();
        }
        (dir, App::new(library))
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn add_form_persists_new_book() {
        let (_dir, mut app) = app_with(&[]);
        app.handle_key(KeyCode::Char('+')).unwrap();
        type_text(&mut app, "Dune");
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "Frank Herbert");
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "1965");
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "Sci-Fi");
        app.handle_key(KeyCode::Tab).unwrap();
        app.handle_key(KeyCode::Char(' ')).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(
            app.status_text(),
            Some("'Dune' has been added to your library!")
        );
        let reloaded = Library::open(app.library().path()).unwrap();
        assert_eq!(reloaded.books().len(), 1);
        assert!(reloaded.books()[0].read);
    }

    #[test]
    fn incomplete_form_stays_open_with_error() {
        let (_dir, mut app) = app_with(&[]);
        app.handle_key(KeyCode::Enter).unwrap();
        type_text(&mut app, "Dune");
        app.handle_key(KeyCode::Enter).unwrap();

        match &app.mode {
            Mode::AddingBook(form) => {
                assert_eq!(form.error.as_deref(), Some("Please fill in all fields."))
            }
            _ => panic!("form should still be open"),
        }
        assert!(app.library().is_empty());
    }

    #[test]
    fn failed_save_reports_error_and_keeps_library() {
        let dir = tempfile::tempdir().unwrap();
        let library = Library::open(dir.path().join("gone").join("library.json")).unwrap();
        let mut app = App::new(library);

        app.handle_key(KeyCode::Char('+')).unwrap();
        type_text(&mut app, "Dune");
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "Frank Herbert");
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "1965");
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "Sci-Fi");
        app.handle_key(KeyCode::Enter).unwrap();

        assert!(matches!(app.mode, Mode::AddingBook(_)));
        assert!(app.library().is_empty());
        assert!(app.status_text().is_some());
    }

    #[test]
    fn remove_flow_drops_selected_title() {
        let (_dir, mut app) = app_with(&[
            ("Dune", "Frank Herbert", "1965", "Sci-Fi", true),
            ("1984", "George Orwell", "1949", "Dystopian", false),
        ]);
        app.handle_key(KeyCode::Char('2')).unwrap();
        app.handle_key(KeyCode::Down).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();
        match &app.mode {
            Mode::ConfirmRemove(confirm) => {
                assert_eq!(confirm.title, "1984");
                assert_eq!(confirm.matches, 1);
            }
            _ => panic!("expected confirmation"),
        }

        app.handle_key(KeyCode::Char('y')).unwrap();
        let titles: Vec<_> = app
            .library()
            .books()
            .iter()
            .map(|book| book.title.as_str())
            .collect();
        assert_eq!(titles, ["Dune"]);
        assert_eq!(app.remove_list.selected, 0);
    }

    #[test]
    fn remove_on_empty_library_warns() {
        let (_dir, mut app) = app_with(&[]);
        app.handle_key(KeyCode::Char('2')).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();
        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.status_text(), Some("No books available to remove."));
    }

    #[test]
    fn search_updates_while_typing() {
        let (_dir, mut app) = app_with(&[
            ("Dune", "Frank Herbert", "1965", "Sci-Fi", true),
            ("The Hobbit", "J.R.R. Tolkien", "1937", "Fantasy", false),
        ]);
        app.handle_key(KeyCode::Char('3')).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();
        type_text(&mut app, "tolkien");
        assert!(app.search.results.is_empty());

        app.handle_key(KeyCode::Tab).unwrap();
        assert_eq!(app.search.results.len(), 1);
        assert_eq!(app.search.results[0].title, "The Hobbit");

        app.handle_key(KeyCode::Esc).unwrap();
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }

    #[test]
    fn search_view_shows_selected_match() {
        let (_dir, mut app) = app_with(&[
            ("Dune", "Frank Herbert", "1965", "Sci-Fi", true),
            ("The Hobbit", "J.R.R. Tolkien", "1937", "Fantasy", false),
        ]);
        app.handle_key(KeyCode::Char('3')).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();
        type_text(&mut app, "hobbit");
        app.handle_key(KeyCode::Enter).unwrap();

        assert!(render(&app).contains("Match 1 of 1: The Hobbit"));
    }

    #[test]
    fn statistics_screen_renders_totals() {
        let (_dir, mut app) = app_with(&[
            ("Dune", "Frank Herbert", "1965", "Sci-Fi", true),
            ("1984", "George Orwell", "1949", "Dystopian", false),
        ]);
        app.handle_key(KeyCode::Char('5')).unwrap();
        let screen = render(&app);
        assert!(screen.contains("Total Books: 2"));
        assert!(screen.contains("Percentage Read: 50.00%"));
    }

    #[test]
    fn empty_listing_renders_placeholder() {
        let (_dir, mut app) = app_with(&[]);
        app.handle_key(KeyCode::Char('4')).unwrap();
        assert!(render(&app).contains("No books in your library yet."));
    }
}
