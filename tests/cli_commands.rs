use personal_library_manager::cli::{execute, AddArgs, Command, RemoveArgs, SearchArgs};
use personal_library_manager::{Library, LibraryError};
use pretty_assertions::assert_eq;

fn run(command: Command, library: &mut Library) -> anyhow::Result<String> {
    let mut out = Vec::new();
    execute(command, library, &mut out)?;
    Ok(String::from_utf8(out).expect("cli output is utf-8"))
}

fn add(title: &str, author: &str, year: &str, genre: &str, read: bool) -> Command {
    Command::Add(AddArgs {
        title: title.into(),
        author: author.into(),
        year: year.into(),
        genre: genre.into(),
        read,
    })
}

fn search(query: &str, by: &str) -> Command {
    Command::Search(SearchArgs {
        query: query.into(),
        by: by.into(),
    })
}

#[test]
fn list_and_stats_on_empty_library() {
    let dir = tempfile::tempdir().unwrap();
    let mut library = Library::open(dir.path().join("library.json")).unwrap();

    assert_eq!(
        run(Command::List, &mut library).unwrap(),
        "No books in your library yet.\n"
    );
    assert_eq!(
        run(Command::Stats, &mut library).unwrap(),
        "Total Books: 0\nBooks Read: 0\nPercentage Read: 0.00%\n"
    );
}

#[test]
fn full_session() {
    let dir = tempfile::tempdir().unwrap();
    let mut library = Library::open(dir.path().join("library.json")).unwrap();

    assert_eq!(
        run(add("Dune", "Frank Herbert", "1965", "Sci-Fi", true), &mut library).unwrap(),
        "'Dune' has been added to your library!\n"
    );
    run(add("1984", "George Orwell", "1949", "Dystopian", false), &mut library).unwrap();
    run(add("Emma", "Jane Austen", "1815", "Classic", false), &mut library).unwrap();

    assert_eq!(
        run(Command::List, &mut library).unwrap(),
        "Dune by Frank Herbert (1965) - Sci-Fi - Read\n\
         1984 by George Orwell (1949) - Dystopian - Unread\n\
         Emma by Jane Austen (1815) - Classic - Unread\n"
    );
    assert_eq!(
        run(search("ORWELL", "author"), &mut library).unwrap(),
        "1984 by George Orwell (1949) - Dystopian - Unread\n"
    );
    assert_eq!(
        run(search("hobbit", "title"), &mut library).unwrap(),
        "No books found.\n"
    );
    assert_eq!(
        run(Command::Stats, &mut library).unwrap(),
        "Total Books: 3\nBooks Read: 1\nPercentage Read: 33.33%\n"
    );
    assert_eq!(
        run(
            Command::Remove(RemoveArgs {
                title: "emma".into()
            }),
            &mut library
        )
        .unwrap(),
        "'emma' has been removed.\n"
    );
    assert_eq!(
        run(
            Command::Remove(RemoveArgs {
                title: "Emma".into()
            }),
            &mut library
        )
        .unwrap(),
        "No book titled 'Emma' was found.\n"
    );
    assert_eq!(library.len(), 2);
}

#[test]
fn unknown_search_field_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut library = Library::open(dir.path().join("library.json")).unwrap();

    let err = run(search("dune", "genre"), &mut library).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LibraryError>(),
        Some(LibraryError::InvalidField(field)) if field == "genre"
    ));
}

#[test]
fn non_numeric_year_is_a_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut library = Library::open(dir.path().join("library.json")).unwrap();

    let err = run(add("Dune", "Frank Herbert", "MCMLXV", "Sci-Fi", true), &mut library)
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LibraryError>(),
        Some(LibraryError::Validation(_))
    ));
    assert!(library.is_empty());
}
