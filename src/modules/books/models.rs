use std::fmt;
use std::str::FromStr;

use libris_kernel::{require_text, CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use time::Date;

/// Availability of a book. `Returned` is the available state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    Borrowed,
    #[default]
    Returned,
}

impl BookStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookStatus::Borrowed => "borrowed",
            BookStatus::Returned => "returned",
        }
    }

    /// The status the borrow/return button switches to.
    pub fn toggled(self) -> Self {
        match self {
            BookStatus::Borrowed => BookStatus::Returned,
            BookStatus::Returned => BookStatus::Borrowed,
        }
    }

    /// Label shown next to a book: returned books read as "available".
    pub fn display_label(self) -> &'static str {
        match self {
            BookStatus::Borrowed => "borrowed",
            BookStatus::Returned => "available",
        }
    }

    /// Label of the button that toggles this status.
    pub fn action_label(self) -> &'static str {
        match self {
            BookStatus::Borrowed => "Return",
            BookStatus::Returned => "Borrow",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "borrowed" => Ok(BookStatus::Borrowed),
            "returned" | "available" => Ok(BookStatus::Returned),
            other => Err(CoreError::validation(
                "status",
                format!("unknown status '{other}'; expected borrowed or returned"),
            )),
        }
    }
}

/// One library item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Repository-assigned identifier, immutable after creation
    pub id: String,
    pub title: String,
    pub author: String,
    /// Publication year
    pub year: i32,
    pub genre: String,
    pub status: BookStatus,
}

/// Request model for creating a new book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub genre: String,
    #[serde(default)]
    pub status: BookStatus,
}

impl NewBook {
    /// A new, available book.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        genre: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
            genre: genre.into(),
            status: BookStatus::default(),
        }
    }

    pub fn with_status(mut self, status: BookStatus) -> Self {
        self.status = status;
        self
    }

    pub fn validate(&self) -> CoreResult<()> {
        require_text("title", &self.title)?;
        require_text("author", &self.author)?;
        require_text("genre", &self.genre)
    }

    pub(crate) fn into_book(self, id: String) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            year: self.year,
            genre: self.genre,
            status: self.status,
        }
    }
}

/// Partial update; absent fields are left untouched. There is no `id` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub status: Option<BookStatus>,
}

impl BookPatch {
    pub fn status(status: BookStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.year.is_none()
            && self.genre.is_none()
            && self.status.is_none()
    }

    pub fn validate(&self) -> CoreResult<()> {
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        if let Some(author) = &self.author {
            require_text("author", author)?;
        }
        if let Some(genre) = &self.genre {
            require_text("genre", genre)?;
        }
        Ok(())
    }

    pub(crate) fn apply(self, book: &mut Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(author) = self.author {
            book.author = author;
        }
        if let Some(year) = self.year {
            book.year = year;
        }
        if let Some(genre) = self.genre {
            book.genre = genre;
        }
        if let Some(status) = self.status {
            book.status = status;
        }
    }
}

/// A borrowing event. `return_date` is `None` while the loan is outstanding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRecord {
    pub id: String,
    /// Weak reference; records are removed with their book
    pub book_id: String,
    pub user_id: String,
    pub borrow_date: Date,
    pub return_date: Option<Date>,
}

impl BorrowRecord {
    pub fn is_outstanding(&self) -> bool {
        self.return_date.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_follow_toggle_button() {
        assert_eq!(BookStatus::default(), BookStatus::Returned);
        assert_eq!(BookStatus::Returned.display_label(), "available");
        assert_eq!(BookStatus::Returned.action_label(), "Borrow");
        assert_eq!(BookStatus::Borrowed.action_label(), "Return");
        assert_eq!(BookStatus::Borrowed.toggled(), BookStatus::Returned);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Borrowed".parse::<BookStatus>().unwrap(), BookStatus::Borrowed);
        assert_eq!("available".parse::<BookStatus>().unwrap(), BookStatus::Returned);
        assert_eq!("lost".parse::<BookStatus>().unwrap_err().code(), "validation_error");
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&BookStatus::Borrowed).unwrap();
        assert_eq!(json, "\"borrowed\"");
    }

    #[test]
    fn borrow_record_uses_camel_case_names() {
        let record = BorrowRecord {
            id: "br1".to_string(),
            book_id: "b2".to_string(),
            user_id: "u1".to_string(),
            borrow_date: time::macros::date!(2023 - 04 - 15),
            return_date: None,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["bookId"], "b2");
        assert_eq!(value["userId"], "u1");
        assert!(value.get("borrowDate").is_some());
        assert!(value["returnDate"].is_null());
        assert!(value.get("book_id").is_none());

        let back: BorrowRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn new_book_rejects_blank_fields() {
        assert!(NewBook::new("Dune", "Frank Herbert", 1965, "Science Fiction")
            .validate()
            .is_ok());

        let err = NewBook::new("Dune", " ", 1965, "Science Fiction")
            .validate()
            .unwrap_err();
        assert_eq!(err, CoreError::validation("author", "author must not be empty"));
    }

    #[test]
    fn patch_validates_only_present_fields() {
        assert!(BookPatch::status(BookStatus::Borrowed).validate().is_ok());

        let patch = BookPatch {
            genre: Some(String::new()),
            ..BookPatch::default()
        };
        assert!(patch.validate().is_err());
        assert!(BookPatch::default().is_empty());
    }

    #[test]
    fn patch_leaves_unspecified_fields() {
        let mut book =
            NewBook::new("1984", "George Orwell", 1949, "Dystopian").into_book("b2".into());
        BookPatch {
            year: Some(1950),
            ..BookPatch::default()
        }
        .apply(&mut book);

        assert_eq!(book.year, 1950);
        assert_eq!(book.title, "1984");
        assert_eq!(book.id, "b2");
    }
}
