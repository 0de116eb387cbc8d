// server/src/state.rs

use common::{Executor, Settings};
use std::sync::Arc;

/// Estado compartido entre handlers. Sólo lectura: no hay nada mutable
/// entre requests salvo el propio sistema de archivos.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub executor: Executor,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self, common::ActionError> {
        let settings = Arc::new(settings);
        let executor = Executor::new(settings.clone())?;
        Ok(Self { settings, executor })
    }
}
