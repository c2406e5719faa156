//! Demo catalogue loaded when `library.seed_demo_data` is on.

use time::macros::date;

use super::models::{Book, BookStatus, BorrowRecord};

fn book(id: &str, title: &str, author: &str, year: i32, genre: &str, status: BookStatus) -> Book {
    Book {
        id: id.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        year,
        genre: genre.to_string(),
        status,
    }
}

pub fn demo_books() -> Vec<Book> {
    use BookStatus::{Borrowed, Returned};

    vec![
        book("b1", "To Kill a Mockingbird", "Harper Lee", 1960, "Fiction", Returned),
        book("b2", "1984", "George Orwell", 1949, "Dystopian", Borrowed),
        book("b3", "The Great Gatsby", "F. Scott Fitzgerald", 1925, "Fiction", Returned),
        book("b4", "Pride and Prejudice", "Jane Austen", 1813, "Romance", Borrowed),
        book("b5", "The Catcher in the Rye", "J.D. Salinger", 1951, "Fiction", Returned),
        book("b6", "Brave New World", "Aldous Huxley", 1932, "Dystopian", Returned),
    ]
}

pub fn demo_borrow_records() -> Vec<BorrowRecord> {
    vec![
        BorrowRecord {
            id: "br1".to_string(),
            book_id: "b2".to_string(),
            user_id: "u1".to_string(),
            borrow_date: date!(2023 - 04 - 15),
            return_date: None,
        },
        BorrowRecord {
            id: "br2".to_string(),
            book_id: "b4".to_string(),
            user_id: "u2".to_string(),
            borrow_date: date!(2023 - 05 - 10),
            return_date: None,
        },
        BorrowRecord {
            id: "br3".to_string(),
            book_id: "b1".to_string(),
            user_id: "u1".to_string(),
            borrow_date: date!(2023 - 03 - 20),
            return_date: Some(date!(2023 - 04 - 05)),
        },
    ]
}
