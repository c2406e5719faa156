use anyhow::Context;

use crate::settings::Settings;

/// Context provided to modules during initialization
pub struct InitCtx<'a> {
    pub settings: &'a Settings,
}

/// Lifecycle hooks implemented by every stateful libris component
pub trait Module {
    /// Unique name for this module
    fn name(&self) -> &'static str;

    /// Initialize the module with the provided context
    /// Called once, before the module serves any operation
    fn init(&mut self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Stop the module and release anything it holds
    fn stop(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Initialize modules in the order given
pub fn init_modules(modules: &mut [&mut dyn Module], ctx: &InitCtx<'_>) -> anyhow::Result<()> {
    tracing::info!("initializing {} modules", modules.len());

    for module in modules.iter_mut() {
        tracing::info!(module = module.name(), "initializing module");

        module
            .init(ctx)
            .with_context(|| format!("failed to initialize module '{}'", module.name()))?;
    }

    Ok(())
}

/// Stop modules in reverse order
pub fn stop_modules(modules: &mut [&mut dyn Module]) -> anyhow::Result<()> {
    tracing::info!("stopping {} modules in reverse order", modules.len());

    for module in modules.iter_mut().rev() {
        tracing::info!(module = module.name(), "stopping module");

        module
            .stop()
            .with_context(|| format!("failed to stop module '{}'", module.name()))?;
    }

    Ok(())
}
