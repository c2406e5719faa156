pub mod books;
pub mod users;
