use std::sync::Arc;

use libris_events::{Notification, Notifier};
use libris_kernel::{CoreError, CoreResult};
use time::Date;

use super::models::{Book, BookPatch, BookStatus, BorrowRecord, NewBook};
use super::search::{self, SearchQuery};
use super::seed;
use crate::utils::IdSequence;

/// Owns the canonical book and borrow record collections.
///
/// Books keep insertion order. Every mutation either applies fully or,
/// when it fails, leaves the collections untouched. Reads hand out copies.
pub struct BookRepository {
    books: Vec<Book>,
    records: Vec<BorrowRecord>,
    book_ids: IdSequence,
    record_ids: IdSequence,
    notifier: Arc<dyn Notifier>,
}

impl BookRepository {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            books: Vec::new(),
            records: Vec::new(),
            book_ids: IdSequence::new("b"),
            record_ids: IdSequence::new("br"),
            notifier,
        }
    }

    /// Replace the collections with the demo catalogue.
    pub fn seed_demo_data(&mut self) {
        self.books = seed::demo_books();
        self.records = seed::demo_borrow_records();

        for book in &self.books {
            self.book_ids.observe(&book.id);
        }
        for record in &self.records {
            self.record_ids.observe(&record.id);
        }
    }

    pub fn add_book(&mut self, data: NewBook) -> CoreResult<Book> {
        data.validate()?;

        let book = data.into_book(self.book_ids.issue());
        self.books.push(book.clone());

        tracing::info!(book_id = %book.id, title = %book.title, "book added");
        self.notifier.notify(Notification::success(
            "Book added",
            format!("\"{}\" has been added to the library", book.title),
        ));

        Ok(book)
    }

    pub fn edit_book(&mut self, id: &str, patch: BookPatch) -> CoreResult<Book> {
        patch.validate()?;

        let book = self.find_mut(id)?;
        patch.apply(book);
        let updated = book.clone();

        tracing::info!(book_id = %updated.id, "book updated");
        self.notifier.notify(Notification::success(
            "Book updated",
            "The book information has been updated",
        ));

        Ok(updated)
    }

    /// Remove a book together with every borrow record that points at it.
    /// Deleting an unknown id fails with `NotFound`.
    pub fn delete_book(&mut self, id: &str) -> CoreResult<Book> {
        let index = self
            .books
            .iter()
            .position(|book| book.id == id)
            .ok_or_else(|| CoreError::not_found("book", id))?;

        let removed = self.books.remove(index);
        let records_before = self.records.len();
        self.records.retain(|record| record.book_id != id);

        tracing::info!(
            book_id = %removed.id,
            records_removed = records_before - self.records.len(),
            "book deleted"
        );
        self.notifier.notify(Notification::destructive(
            "Book deleted",
            format!("\"{}\" has been removed from the library", removed.title),
        ));

        Ok(removed)
    }

    pub fn update_book_status(&mut self, id: &str, status: BookStatus) -> CoreResult<Book> {
        let book = self.find_mut(id)?;
        book.status = status;
        let updated = book.clone();

        tracing::info!(book_id = %updated.id, status = %status, "book status changed");
        self.notifier.notify(Notification::success(
            format!("Book {status}"),
            format!("\"{}\" has been {status}", updated.title),
        ));

        Ok(updated)
    }

    /// Flip between borrowed and returned.
    pub fn toggle_book_status(&mut self, id: &str) -> CoreResult<Book> {
        let next = self
            .get(id)
            .map(|book| book.status.toggled())
            .ok_or_else(|| CoreError::not_found("book", id))?;

        self.update_book_status(id, next)
    }

    pub fn list_books(&self) -> Vec<Book> {
        self.books.clone()
    }

    pub fn get(&self, id: &str) -> Option<Book> {
        self.books.iter().find(|book| book.id == id).cloned()
    }

    pub fn search(&self, query: &SearchQuery) -> Vec<Book> {
        search::search(&self.books, query)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn borrow_records(&self) -> Vec<BorrowRecord> {
        self.records.clone()
    }

    pub fn records_for_book(&self, book_id: &str) -> Vec<BorrowRecord> {
        self.records
            .iter()
            .filter(|record| record.book_id == book_id)
            .cloned()
            .collect()
    }

    /// Open an outstanding borrow record for an existing book.
    pub fn record_borrow(
        &mut self,
        book_id: &str,
        user_id: &str,
        borrow_date: Date,
    ) -> CoreResult<BorrowRecord> {
        if !self.books.iter().any(|book| book.id == book_id) {
            return Err(CoreError::not_found("book", book_id));
        }

        let record = BorrowRecord {
            id: self.record_ids.issue(),
            book_id: book_id.to_string(),
            user_id: user_id.to_string(),
            borrow_date,
            return_date: None,
        };
        self.records.push(record.clone());

        tracing::info!(record_id = %record.id, book_id, user_id, "borrow recorded");
        Ok(record)
    }

    /// Close an outstanding borrow record.
    pub fn record_return(
        &mut self,
        record_id: &str,
        return_date: Date,
    ) -> CoreResult<BorrowRecord> {
        let record = self
            .records
            .iter_mut()
            .find(|record| record.id == record_id)
            .ok_or_else(|| CoreError::not_found("borrow record", record_id))?;

        if !record.is_outstanding() {
            return Err(CoreError::validation(
                "return_date",
                format!("borrow record '{record_id}' is already closed"),
            ));
        }

        record.return_date = Some(return_date);

        tracing::info!(record_id, book_id = %record.book_id, "return recorded");
        Ok(record.clone())
    }

    fn find_mut(&mut self, id: &str) -> CoreResult<&mut Book> {
        self.books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or_else(|| CoreError::not_found("book", id))
    }
}
