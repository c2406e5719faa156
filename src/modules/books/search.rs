//! Book search and the facets that feed the search form.
//!
//! Everything here is a pure function of its inputs. A book matches a query
//! when it satisfies every criterion the query sets; unset criteria match
//! anything, so the empty query returns the whole input.

use std::collections::HashSet;

use libris_kernel::{CoreError, CoreResult};

use super::models::Book;

/// Earliest year offered by the book form.
pub const FIRST_FORM_YEAR: i32 = 1900;

/// Genre suggestions offered by the book form.
pub const COMMON_GENRES: &[&str] = &[
    "Fiction",
    "Non-fiction",
    "Mystery",
    "Science Fiction",
    "Fantasy",
    "Romance",
    "Thriller",
    "Horror",
    "Biography",
    "History",
    "Dystopian",
    "Young Adult",
    "Children's",
    "Poetry",
    "Drama",
];

/// Optional filter criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Case-insensitive substring of the author
    pub author: Option<String>,
    /// Exact publication year
    pub year: Option<i32>,
    /// Case-insensitive substring of the genre
    pub genre: Option<String>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    /// Build a query from raw form fields: blank fields are left unset and
    /// the year must parse as an integer.
    pub fn from_form(title: &str, author: &str, year: &str, genre: &str) -> CoreResult<Self> {
        let year = match year.trim() {
            "" => None,
            raw => Some(raw.parse::<i32>().map_err(|_| {
                CoreError::validation("year", format!("year '{raw}' is not a whole number"))
            })?),
        };

        Ok(Self {
            title: non_blank(title),
            author: non_blank(author),
            year,
            genre: non_blank(genre),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.year.is_none() && self.genre.is_none()
    }

    pub fn matches(&self, book: &Book) -> bool {
        contains(&book.title, self.title.as_deref())
            && contains(&book.author, self.author.as_deref())
            && self.year.map_or(true, |year| book.year == year)
            && contains(&book.genre, self.genre.as_deref())
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn contains(field: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => field.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

/// Books matching `query`, in input order.
pub fn search(books: &[Book], query: &SearchQuery) -> Vec<Book> {
    books
        .iter()
        .filter(|book| query.matches(book))
        .cloned()
        .collect()
}

/// Distinct genres in first-seen order.
pub fn genres(books: &[Book]) -> Vec<String> {
    let mut seen = HashSet::new();
    books
        .iter()
        .filter(|book| seen.insert(book.genre.as_str()))
        .map(|book| book.genre.clone())
        .collect()
}

/// Distinct publication years, newest first.
pub fn years(books: &[Book]) -> Vec<i32> {
    let mut years: Vec<i32> = books.iter().map(|book| book.year).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

/// Years offered by the book form, from `current_year` down to 1900.
pub fn year_options(current_year: i32) -> Vec<i32> {
    (FIRST_FORM_YEAR..=current_year).rev().collect()
}
