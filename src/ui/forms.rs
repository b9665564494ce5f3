use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Book, PUBLICATION_YEARS};

/// Internal representation of the "add book" form fields.
#[derive(Default, Clone)]
pub(crate) struct BookForm {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) year: String,
    pub(crate) genre: String,
    pub(crate) read: bool,
    pub(crate) active: BookField,
    pub(crate) error: Option<String>,
}

/// Fields available within the book form, in focus order.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum BookField {
    #[default]
    Title,
    Author,
    Year,
    Genre,
    Read,
}

impl BookField {
    pub(crate) const ALL: [BookField; 5] = [
        BookField::Title,
        BookField::Author,
        BookField::Year,
        BookField::Genre,
        BookField::Read,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            BookField::Title => "Title",
            BookField::Author => "Author",
            BookField::Year => "Year",
            BookField::Genre => "Genre",
            BookField::Read => "Read",
        }
    }

    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or_default()
    }
}

impl BookForm {
    /// Move focus to the next field, wrapping around.
    pub(crate) fn next_field(&mut self) {
        let next = (self.active.index() + 1) % BookField::ALL.len();
        self.active = BookField::ALL[next];
    }

    /// Move focus to the previous field, wrapping around.
    pub(crate) fn previous_field(&mut self) {
        let len = BookField::ALL.len();
        let previous = (self.active.index() + len - 1) % len;
        self.active = BookField::ALL[previous];
    }

    /// Append a character to the active field. The year only takes digits and
    /// the read checkbox flips on space.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            BookField::Title => self.title.push(ch),
            BookField::Author => self.author.push(ch),
            BookField::Genre => self.genre.push(ch),
            BookField::Year => {
                if !ch.is_ascii_digit() || self.year.len() >= 4 {
                    return false;
                }
                self.year.push(ch);
            }
            BookField::Read => {
                if ch != ' ' {
                    return false;
                }
                self.read = !self.read;
            }
        }
        true
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            BookField::Title => {
                self.title.pop();
            }
            BookField::Author => {
                self.author.pop();
            }
            BookField::Year => {
                self.year.pop();
            }
            BookField::Genre => {
                self.genre.pop();
            }
            BookField::Read => {}
        }
    }

    /// Validate the inputs and return a record ready for the store. The year
    /// window is checked here; blank fields and non-numeric years are left to
    /// the store's own validation.
    pub(crate) fn parse_inputs(&self) -> Result<Book> {
        if self.title.trim().is_empty()
            || self.author.trim().is_empty()
            || self.year.trim().is_empty()
            || self.genre.trim().is_empty()
        {
            return Err(anyhow!("Please fill in all fields."));
        }

        let book = Book::from_input(&self.title, &self.author, &self.year, &self.genre, self.read)?;
        if !PUBLICATION_YEARS.contains(&book.year) {
            return Err(anyhow!(
                "Year must be between {} and {}.",
                PUBLICATION_YEARS.start(),
                PUBLICATION_YEARS.end()
            ));
        }
        Ok(book)
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: BookField) -> Line<'static> {
        let is_active = self.active == field;
        let prefix = format!("{}: ", field.label());

        if field == BookField::Read {
            let checkbox = if self.read { "[x]" } else { "[ ]" };
            let style = if is_active {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            return Line::from(vec![
                Span::raw(prefix),
                Span::styled(format!("{checkbox} Have you read this book?"), style),
            ]);
        }

        let value = self.value(field);
        let display = if value.is_empty() {
            if field == BookField::Year {
                format!("<{}-{}>", PUBLICATION_YEARS.start(), PUBLICATION_YEARS.end())
            } else {
                "<required>".to_string()
            }
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![Span::raw(prefix), Span::styled(display, style)])
    }

    /// Character count of the requested field, used to place the cursor.
    pub(crate) fn value_len(&self, field: BookField) -> usize {
        self.value(field).chars().count()
    }

    fn value(&self, field: BookField) -> &str {
        match field {
            BookField::Title => &self.title,
            BookField::Author => &self.author,
            BookField::Year => &self.year,
            BookField::Genre => &self.genre,
            BookField::Read => "",
        }
    }
}

/// State for confirming removal of every book sharing a title.
#[derive(Clone)]
pub(crate) struct ConfirmBookRemove {
    pub(crate) title: String,
    pub(crate) matches: usize,
}
