//! Domain models shared by the record store and both presentation layers. The
//! types stay plain data holders so the store can serialize them as-is and the
//! UI can render them without conversion.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LibraryError;

/// Publication years accepted by the add forms. The store itself only requires
/// an integer; the presentation layers enforce this window.
pub const PUBLICATION_YEARS: RangeInclusive<i32> = 1000..=2025;

/// One catalog entry. Field names double as the keys of the persisted JSON
/// objects, so renaming any of them changes the file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Stored case-preserving, compared case-insensitively.
    pub title: String,
    pub author: String,
    pub year: i32,
    pub genre: String,
    /// Whether the owner has read the book.
    pub read: bool,
}

impl Book {
    /// Build a record from raw text input, the way a form or command line hands
    /// it over. Text fields are trimmed and must not be blank; the year must
    /// parse as an integer.
    pub fn from_input(
        title: &str,
        author: &str,
        year: &str,
        genre: &str,
        read: bool,
    ) -> Result<Self, LibraryError> {
        let year = year
            .trim()
            .parse::<i32>()
            .map_err(|_| LibraryError::validation("Year must be a whole number."))?;

        let book = Self {
            title: title.trim().to_string(),
            author: author.trim().to_string(),
            year,
            genre: genre.trim().to_string(),
            read,
        };
        book.validate()?;
        Ok(book)
    }

    /// Reject records with blank text fields.
    pub fn validate(&self) -> Result<(), LibraryError> {
        let required = [
            ("Title", &self.title),
            ("Author", &self.author),
            ("Genre", &self.genre),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(LibraryError::validation(format!("{name} is required.")));
            }
        }
        Ok(())
    }

    /// Case-insensitive title comparison used by removal.
    pub fn has_title(&self, title: &str) -> bool {
        self.title.to_lowercase() == title.to_lowercase()
    }

    pub fn status_label(&self) -> &'static str {
        if self.read {
            "Read"
        } else {
            "Unread"
        }
    }
}

impl fmt::Display for Book {
    /// `Title by Author (Year) - Genre - Read`, the one-line summary used by
    /// listings in both the CLI and the TUI.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {} ({}) - {} - {}",
            self.title,
            self.author,
            self.year,
            self.genre,
            self.status_label()
        )
    }
}

/// Fields a search can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchField {
    #[default]
    Title,
    Author,
}

impl SearchField {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Author => "author",
        }
    }

    /// Flip between the two fields; the search screen binds this to Tab.
    pub fn toggle(self) -> Self {
        match self {
            SearchField::Title => SearchField::Author,
            SearchField::Author => SearchField::Title,
        }
    }

    /// Borrow the matching field out of a record.
    pub fn value_of(self, book: &Book) -> &str {
        match self {
            SearchField::Title => &book.title,
            SearchField::Author => &book.author,
        }
    }
}

impl FromStr for SearchField {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(SearchField::Title),
            "author" => Ok(SearchField::Author),
            _ => Err(LibraryError::InvalidField(s.to_string())),
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate figures for the statistics views.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    pub total: usize,
    pub read: usize,
    /// Share of read books in percent; `0.0` for an empty library.
    pub percent_read: f64,
}

impl Statistics {
    pub fn from_books(books: &[Book]) -> Self {
        let total = books.len();
        let read = books.iter().filter(|book| book.read).count();
        let percent_read = if total > 0 {
            read as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        Self {
            total,
            read,
            percent_read,
        }
    }
}
