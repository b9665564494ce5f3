use std::iter::FusedIterator;
use std::path::{Path, PathBuf};
use std::slice;

use tracing::{debug, info};

use crate::error::Result;
use crate::models::{Book, SearchField, Statistics};

use super::file::{load_books, save_books};

/// The in-memory library bound to the file it was loaded from. Every mutation
/// is written back before it returns; when the write fails the in-memory list
/// is left exactly as it was before the call.
#[derive(Debug)]
pub struct Library {
    path: PathBuf,
    books: Vec<Book>,
}

impl Library {
    /// Load the library stored at `path`, or start an empty one if the file
    /// does not exist yet. Nothing is written until the first mutation.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let books = load_books(&path)?;
        info!(path = %path.display(), count = books.len(), "library loaded");
        Ok(Self { path, books })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Books in insertion order.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Overwrite the backing file with the current list.
    pub fn save(&self) -> Result<()> {
        save_books(&self.path, &self.books)
    }

    /// Append a validated record and persist. Returns the stored record so the
    /// caller can echo it back to the user.
    pub fn add(&mut self, book: Book) -> Result<&Book> {
        book.validate()?;
        self.books.push(book);

        if let Err(err) = self.save() {
            self.books.pop();
            return Err(err);
        }

        let index = self.books.len() - 1;
        let added = &self.books[index];
        info!(title = %added.title, total = self.books.len(), "book added");
        Ok(added)
    }

    /// Parse raw input and append it. Convenience for presentation layers that
    /// collect everything as text.
    pub fn add_from_input(
        &mut self,
        title: &str,
        author: &str,
        year: &str,
        genre: &str,
        read: bool,
    ) -> Result<&Book> {
        let book = Book::from_input(title, author, year, genre, read)?;
        self.add(book)
    }

    /// Drop every book whose title matches `title` case-insensitively and
    /// persist, even when nothing matched. Returns how many were removed.
    pub fn remove(&mut self, title: &str) -> Result<usize> {
        let kept: Vec<Book> = self
            .books
            .iter()
            .filter(|book| !book.has_title(title))
            .cloned()
            .collect();
        let removed = self.books.len() - kept.len();

        save_books(&self.path, &kept)?;
        self.books = kept;

        info!(title, removed, total = self.books.len(), "books removed");
        Ok(removed)
    }

    /// Count the books a removal by `title` would drop.
    pub fn count_titled(&self, title: &str) -> usize {
        self.books.iter().filter(|book| book.has_title(title)).count()
    }

    /// Case-insensitive substring search over one field, in library order.
    pub fn search(&self, query: &str, field: SearchField) -> Search<'_> {
        debug!(query, %field, "searching library");
        Search {
            books: self.books.iter(),
            needle: query.to_lowercase(),
            field,
        }
    }

    /// Like [`Library::search`], with the field given by name. Unknown field
    /// names fail with [`crate::LibraryError::InvalidField`].
    pub fn search_by(&self, query: &str, field: &str) -> Result<Search<'_>> {
        Ok(self.search(query, field.parse()?))
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::from_books(&self.books)
    }
}

/// Lazy search results. Cloning the iterator restarts the scan from the
/// clone's position, so callers can count and then list the same matches.
#[derive(Debug, Clone)]
pub struct Search<'a> {
    books: slice::Iter<'a, Book>,
    needle: String,
    field: SearchField,
}

impl<'a> Iterator for Search<'a> {
    type Item = &'a Book;

    fn next(&mut self) -> Option<Self::Item> {
        let needle = &self.needle;
        let field = self.field;
        self.books
            .by_ref()
            .find(|book| field.value_of(book).to_lowercase().contains(needle.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.books.size_hint().1)
    }
}

impl FusedIterator for Search<'_> {}
