//! Opt-in process-wide factory. Nothing is installed until [`init`] is called, and library code
//! never touches it on its own.

use fabrik_factory::{Factory, FactoryError};
use log::debug;
use once_cell::sync::OnceCell;
use std::sync::{Mutex, PoisonError};

static DEFAULT: OnceCell<Mutex<Factory>> = OnceCell::new();

/// Installs `factory` as the default; fails if one is already installed.
pub fn init(factory: Factory) -> Result<(), FactoryError> {
    let count = factory.len();
    DEFAULT.set(Mutex::new(factory)).map_err(|_| {
        FactoryError::Configuration("the default factory is already installed".to_string())
    })?;
    debug!("installed default factory with {count} identifiers");
    Ok(())
}

#[inline]
pub fn is_initialized() -> bool {
    DEFAULT.get().is_some()
}

/// Runs `f` against the default factory, holding its lock for the duration of the call.
pub fn with<R>(f: impl FnOnce(&mut Factory) -> R) -> Result<R, FactoryError> {
    let factory = DEFAULT.get().ok_or_else(|| {
        FactoryError::Configuration(
            "no default factory installed, call fabrik::global::init first".to_string(),
        )
    })?;
    // failed registry operations never leave partial state behind
    let mut guard = factory.lock().unwrap_or_else(PoisonError::into_inner);
    Ok(f(&mut guard))
}
