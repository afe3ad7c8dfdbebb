use std::{
    collections::HashMap,
    sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use tracing::debug;

use crate::{CadMonitor, Error, Result};

/// Zero-argument constructor producing a fresh, unconfigured monitor.
pub type Constructor = Arc<dyn Fn() -> Box<dyn CadMonitor> + Send + Sync>;

/// Name-keyed store of [`CadMonitor`] constructors.
///
/// - `register(name, ctor)` stores a constructor, replacing any previous one
///   under the same name.
/// - `instantiate(name)` runs the constructor registered under `name` and
///   returns the new monitor; the registry keeps no reference to it.
///
/// Writes take the exclusive half of a reader/writer lock and lookups the
/// shared half, so a lookup sees either a complete entry or none at all.
/// Constructors run after the lock is released.
///
/// The registry is cheap to clone; clones share the same entries. Pass it
/// around explicitly, or use [`MonitorRegistry::global`] for backends that
/// register themselves at start-up.
///
/// # Example
///
/// ```rust,ignore
/// let registry = MonitorRegistry::new();
/// registry.register("acme", AcmeCad::default);
///
/// let mut monitor = registry.instantiate("acme")?;
/// monitor.configure_from_values(&values)?;
/// monitor.login("dispatch", "secret").await?;
/// ```
#[derive(Clone, Default)]
pub struct MonitorRegistry {
    entries: Arc<RwLock<HashMap<Arc<str>, Constructor>>>,
}

impl MonitorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry, created on first use.
    pub fn global() -> &'static MonitorRegistry {
        static GLOBAL: OnceLock<MonitorRegistry> = OnceLock::new();
        GLOBAL.get_or_init(MonitorRegistry::new)
    }

    /// Register a constructor of a concrete monitor type under `name`.
    pub fn register<M, F>(&self, name: &str, constructor: F)
    where
        M: CadMonitor + 'static,
        F: Fn() -> M + Send + Sync + 'static,
    {
        self.insert(
            name,
            Arc::new(move || -> Box<dyn CadMonitor> { Box::new(constructor()) }),
        );
    }

    /// Register a constructor that already produces boxed monitors.
    pub fn register_boxed<F>(&self, name: &str, constructor: F)
    where
        F: Fn() -> Box<dyn CadMonitor> + Send + Sync + 'static,
    {
        self.insert(name, Arc::new(constructor));
    }

    fn insert(&self, name: &str, constructor: Constructor) {
        let replaced = self
            .write()
            .insert(Arc::from(name), constructor)
            .is_some();
        debug!(monitor = %name, replaced, "CAD monitor registered");
    }

    /// Remove the constructor registered under `name`. Returns whether there was one.
    pub fn unregister(&self, name: &str) -> bool {
        self.write().remove(name).is_some()
    }

    /// Create a new monitor using the constructor registered under `name`.
    ///
    /// Fails with [`Error::MonitorNotFound`] carrying `name` when nothing is
    /// registered under it.
    pub fn instantiate(&self, name: &str) -> Result<Box<dyn CadMonitor>> {
        let constructor = self
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::MonitorNotFound(Arc::from(name)))?;
        debug!(monitor = %name, "Instantiating CAD monitor");
        Ok(constructor())
    }

    /// [`instantiate`](Self::instantiate) followed by
    /// [`CadMonitor::configure_from_values`].
    pub fn instantiate_with(
        &self,
        name: &str,
        values: &HashMap<String, String>,
    ) -> Result<Box<dyn CadMonitor>> {
        let mut monitor = self.instantiate(name)?;
        monitor.configure_from_values(values)?;
        Ok(monitor)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Registered names in alphabetical order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().map(|k| k.to_string()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic can't leave the map half-written: every write is a single insert or remove.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<Arc<str>, Constructor>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Arc<str>, Constructor>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for MonitorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorRegistry")
            .field("names", &self.names())
            .finish()
    }
}
