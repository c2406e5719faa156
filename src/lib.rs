//! libris application library
//!
//! In-memory book repository, book search, and session store, wired together
//! by [`Library`].

pub mod library;
pub mod modules;
pub mod utils;

pub use library::Library;
pub use modules::books::search;
pub use modules::books::{
    Book, BookPatch, BookRepository, BookStatus, BorrowRecord, NewBook, SearchQuery,
};
pub use modules::users::{SessionStore, User};
