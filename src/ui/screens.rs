use crate::models::{Book, SearchField};
use crate::store::Library;

/// Entries of the sidebar menu, in display order.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum MenuItem {
    AddBook,
    RemoveBook,
    SearchBooks,
    AllBooks,
    Statistics,
}

impl MenuItem {
    pub(crate) const ALL: [MenuItem; 5] = [
        MenuItem::AddBook,
        MenuItem::RemoveBook,
        MenuItem::SearchBooks,
        MenuItem::AllBooks,
        MenuItem::Statistics,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            MenuItem::AddBook => "Add Book",
            MenuItem::RemoveBook => "Remove Book",
            MenuItem::SearchBooks => "Search Book",
            MenuItem::AllBooks => "Display All Books",
            MenuItem::Statistics => "Statistics",
        }
    }

    pub(crate) fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|item| *item == self)
            .unwrap_or_default()
    }

    /// Step through the menu, wrapping at both ends.
    pub(crate) fn offset(self, offset: isize) -> Self {
        let len = Self::ALL.len() as isize;
        let index = (self.index() as isize + offset).rem_euclid(len);
        Self::ALL[index as usize]
    }

    /// Map the `1`-`5` shortcuts onto menu entries.
    pub(crate) fn from_shortcut(ch: char) -> Option<Self> {
        let digit = ch.to_digit(10)? as usize;
        digit.checked_sub(1).and_then(|idx| Self::ALL.get(idx).copied())
    }
}

/// Cursor over a list of rows. Shared by the removal list, the full listing
/// and the search results.
#[derive(Default)]
pub(crate) struct Selection {
    pub(crate) selected: usize,
}

impl Selection {
    pub(crate) fn move_by(&mut self, offset: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let max = len as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, max) as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    pub(crate) fn ensure_in_bounds(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

/// Results of the live search. The matches are copied out of the library so
/// the screen can render them without holding a borrow on it.
#[derive(Default)]
pub(crate) struct SearchScreen {
    pub(crate) field: SearchField,
    pub(crate) query: String,
    pub(crate) results: Vec<Book>,
    pub(crate) selection: Selection,
}

impl SearchScreen {
    /// Re-run the search against the current library contents. An empty query
    /// shows nothing rather than every book.
    pub(crate) fn refresh(&mut self, library: &Library) {
        self.results = if self.query.trim().is_empty() {
            Vec::new()
        } else {
            library.search(&self.query, self.field).cloned().collect()
        };
        self.selection.ensure_in_bounds(self.results.len());
    }

    pub(crate) fn toggle_field(&mut self, library: &Library) {
        self.field = self.field.toggle();
        self.refresh(library);
    }

    pub(crate) fn push_char(&mut self, ch: char, library: &Library) {
        self.query.push(ch);
        self.refresh(library);
    }

    pub(crate) fn backspace(&mut self, library: &Library) {
        self.query.pop();
        self.refresh(library);
    }

    pub(crate) fn current_book(&self) -> Option<&Book> {
        self.results.get(self.selection.selected)
    }
}
