//! Computation registry.
//!
//! Maps processing ids to factories. The host resolves the computation
//! type of a document computation through the process-wide registry,
//! installed once by [`init`].

use std::collections::BTreeMap;
use std::sync::OnceLock;

use log::{debug, info, warn};
use parking_lot::RwLock;

use crate::computation::{CenterOfMass4D, Computation, PROCESSING_ID};
use crate::error::{Error, Result};

/// Builds a fresh computation instance.
pub type ComputationFactory = Box<dyn Fn() -> Box<dyn Computation> + Send + Sync>;

/// Processing id to factory map.
#[derive(Default)]
pub struct ComputationRegistry {
    factories: BTreeMap<String, ComputationFactory>,
}

impl ComputationRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in computation types.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        register_builtin(&mut registry);
        registry
    }

    /// Registers `factory` under `processing_id`.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateComputation`] if the id is taken.
    pub fn register<F>(&mut self, processing_id: &str, factory: F) -> Result<()>
    where
        F: Fn() -> Box<dyn Computation> + Send + Sync + 'static,
    {
        if self.factories.contains_key(processing_id) {
            return Err(Error::DuplicateComputation(processing_id.to_string()));
        }
        self.factories
            .insert(processing_id.to_string(), Box::new(factory));
        info!("registered computation type {processing_id}");
        Ok(())
    }

    /// Instantiates the computation registered under `processing_id`.
    ///
    /// # Errors
    /// Returns [`Error::UnknownComputation`] if nothing is registered.
    pub fn create(&self, processing_id: &str) -> Result<Box<dyn Computation>> {
        let factory = self
            .factories
            .get(processing_id)
            .ok_or_else(|| Error::UnknownComputation(processing_id.to_string()))?;
        debug!("creating computation {processing_id}");
        Ok(factory())
    }

    #[must_use]
    pub fn contains(&self, processing_id: &str) -> bool {
        self.factories.contains_key(processing_id)
    }

    /// Registered processing ids, sorted.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

/// Registers the built-in computation types into `registry`.
///
/// Types already present are left alone.
pub fn register_builtin(registry: &mut ComputationRegistry) {
    match registry.register(PROCESSING_ID, || Box::new(CenterOfMass4D::new())) {
        Ok(()) => {}
        Err(Error::DuplicateComputation(id)) => debug!("{id} already registered"),
        Err(err) => warn!("built-in computation not registered: {err}"),
    }
}

static REGISTRY: OnceLock<RwLock<ComputationRegistry>> = OnceLock::new();

/// Installs the process-wide registry with the built-in types.
///
/// Calling it again returns the installed registry unchanged.
pub fn init() -> &'static RwLock<ComputationRegistry> {
    REGISTRY.get_or_init(|| {
        info!("initializing computation registry");
        RwLock::new(ComputationRegistry::with_builtins())
    })
}

/// The process-wide registry.
///
/// # Errors
/// Returns [`Error::RegistryNotInitialized`] before [`init`] ran.
pub fn registry() -> Result<&'static RwLock<ComputationRegistry>> {
    REGISTRY.get().ok_or(Error::RegistryNotInitialized)
}
