pub mod error;
pub mod module;
pub mod settings;

pub use error::{require_text, CoreError, CoreResult};
pub use module::{init_modules, stop_modules, InitCtx, Module};
pub use settings::Settings;
