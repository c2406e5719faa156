pub mod models;
pub mod session;

use libris_kernel::{InitCtx, Module};

pub use models::User;
pub use session::SessionStore;

impl Module for SessionStore {
    fn name(&self) -> &'static str {
        "users"
    }

    fn init(&mut self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if ctx.settings.library.seed_demo_data {
            self.seed_demo_users();
        }

        // A corrupt or unreadable session starts the app signed out.
        if let Err(err) = self.restore() {
            tracing::warn!(module = self.name(), error = %err, "could not restore session");
        }

        tracing::info!(
            module = self.name(),
            users = self.users().len(),
            authenticated = self.is_authenticated(),
            "users module initialized"
        );
        Ok(())
    }
}
