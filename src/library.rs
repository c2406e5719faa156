use std::sync::Arc;

use anyhow::Context;
use libris_db::SessionStorage;
use libris_events::Notifier;
use libris_kernel::{init_modules, stop_modules, InitCtx, Module, Settings};

use crate::modules::books::BookRepository;
use crate::modules::users::SessionStore;

/// The application context handed to a presentation layer: the book
/// repository and the session store, constructed and initialized together.
pub struct Library {
    books: BookRepository,
    session: SessionStore,
}

impl Library {
    /// Build both modules and run their init hooks (seed data, session
    /// restore) in order.
    pub fn init(
        settings: &Settings,
        notifier: Arc<dyn Notifier>,
        storage: Box<dyn SessionStorage>,
    ) -> anyhow::Result<Self> {
        let mut library = Self {
            books: BookRepository::new(Arc::clone(&notifier)),
            session: SessionStore::new(notifier, storage),
        };

        let ctx = InitCtx { settings };
        init_modules(&mut library.modules(), &ctx)
            .with_context(|| "failed to initialize library")?;

        Ok(library)
    }

    pub fn books(&self) -> &BookRepository {
        &self.books
    }

    pub fn books_mut(&mut self) -> &mut BookRepository {
        &mut self.books
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionStore {
        &mut self.session
    }

    pub fn shutdown(mut self) -> anyhow::Result<()> {
        stop_modules(&mut self.modules())
    }

    fn modules(&mut self) -> [&mut dyn Module; 2] {
        [&mut self.books, &mut self.session]
    }
}
