pub mod models;
pub mod repository;
pub mod search;
pub mod seed;

use libris_kernel::{InitCtx, Module};

pub use models::{Book, BookPatch, BookStatus, BorrowRecord, NewBook};
pub use repository::BookRepository;
pub use search::SearchQuery;

impl Module for BookRepository {
    fn name(&self) -> &'static str {
        "books"
    }

    fn init(&mut self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if ctx.settings.library.seed_demo_data {
            self.seed_demo_data();
        }

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            books = self.len(),
            records = self.borrow_records().len(),
            "books module initialized"
        );
        Ok(())
    }

    fn stop(&mut self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}
