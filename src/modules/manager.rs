//! Module manager - orchestrates module activation and deactivation

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::application::errors::ModuleError;
use crate::domain::traits::Bot;
use super::descriptor::Module;
use super::extensions::ExtensionLoader;
use super::graph::DependencyGraph;
use super::registry::ModuleRegistry;

/// Manages the set of currently active modules.
///
/// Owns the registry, the transport handle modules are bound to, the
/// per-tenant enablement table, and the active instance map. `enable_modules`
/// and `disable_module` hold the active-map write guard for their whole
/// duration, so they serialize against each other and tenant queries never
/// observe a half-applied batch.
pub struct ModuleManager {
    registry: ModuleRegistry,
    bot: Arc<dyn Bot>,
    extensions: Arc<dyn ExtensionLoader>,
    essential: Vec<String>,
    tenant_modules: HashMap<u64, HashSet<String>>,
    active: RwLock<HashMap<String, Box<dyn Module>>>,
}

impl ModuleManager {
    pub fn new(
        registry: ModuleRegistry,
        bot: Arc<dyn Bot>,
        extensions: Arc<dyn ExtensionLoader>,
        essential: Vec<String>,
        tenant_modules: HashMap<u64, HashSet<String>>,
    ) -> Self {
        Self {
            registry,
            bot,
            extensions,
            essential,
            tenant_modules,
            active: RwLock::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Enable the requested modules plus the essential set.
    ///
    /// The whole batch is gated up front: unknown names, dependency cycles,
    /// and unsatisfied dependencies all fail before any instance is created.
    /// Activation then proceeds in dependency order, awaiting each module's
    /// setup hook and extension registration before the next. Activation is
    /// not transactional: if a later setup hook fails, modules activated
    /// earlier in the same call stay active and the error propagates.
    pub async fn enable_modules(&self, module_names: &[String]) -> Result<(), ModuleError> {
        let mut active = self.active.write().await;

        let mut batch: Vec<String> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for name in self.essential.iter().chain(module_names.iter()) {
            if seen.insert(name.as_str()) {
                batch.push(name.clone());
            }
        }

        let graph = DependencyGraph::build(&self.registry, &batch)?;
        if let Some(cycle) = graph.detect_cycle() {
            return Err(ModuleError::DependencyCycle(cycle));
        }
        graph.validate()?;

        for name in graph.activation_order() {
            if active.contains_key(&name) {
                // Already active from an earlier call; never spawn a second
                // instance for the same name
                continue;
            }

            let descriptor = self.registry.lookup(&name)?;
            let mut instance = descriptor.instantiate(self.bot.clone());
            instance.setup().await?;
            self.extensions.register_extensions(&name).await?;
            info!("Module '{}' setup complete", name);
            active.insert(name, instance);
        }

        Ok(())
    }

    /// Disable an active module.
    ///
    /// Disabling a module that an active module still lists as required is
    /// refused with [`ModuleError::RequiredByActive`]; there is no cascade.
    /// Otherwise the instance's teardown hook runs and the module is removed
    /// from the active set. A teardown error propagates and leaves the module
    /// active.
    pub async fn disable_module(&self, module_name: &str) -> Result<(), ModuleError> {
        let mut active = self.active.write().await;

        if !active.contains_key(module_name) {
            return Err(ModuleError::NotActive(module_name.to_string()));
        }

        for name in active.keys() {
            if name == module_name {
                continue;
            }
            let still_required = self
                .registry
                .lookup(name)
                .map(|d| d.required_modules().contains(module_name))
                .unwrap_or(false);
            if still_required {
                return Err(ModuleError::RequiredByActive {
                    module: module_name.to_string(),
                    dependent: name.clone(),
                });
            }
        }

        if let Some(instance) = active.get_mut(module_name) {
            instance.teardown().await?;
        }
        active.remove(module_name);
        info!("Module '{}' teardown complete", module_name);
        Ok(())
    }

    /// Check whether a module is usable by a tenant.
    ///
    /// True only if the module is globally active and the tenant's enabled
    /// set contains it. Never errors: unknown names and unknown tenants are
    /// simply `false`.
    pub async fn is_enabled_for_tenant(&self, module_name: &str, tenant_id: u64) -> bool {
        if !self.active.read().await.contains_key(module_name) {
            return false;
        }

        self.tenant_modules
            .get(&tenant_id)
            .map(|enabled| enabled.contains(module_name))
            .unwrap_or(false)
    }

    /// Whether a module is currently active
    pub async fn is_active(&self, module_name: &str) -> bool {
        self.active.read().await.contains_key(module_name)
    }

    /// Names of all currently active modules
    pub async fn active_modules(&self) -> Vec<String> {
        self.active.read().await.keys().cloned().collect()
    }

    /// Disable every active module that nothing else depends on, repeating
    /// until the active set is empty. Used at shutdown; teardown errors are
    /// logged and the module dropped from the active set anyway.
    pub async fn shutdown(&self) {
        loop {
            let mut candidates = self.active_modules().await;
            if candidates.is_empty() {
                return;
            }
            // Essential modules go last
            candidates.sort_by_key(|name| self.essential.contains(name));

            let mut progressed = false;
            for name in candidates {
                match self.disable_module(&name).await {
                    Ok(()) => progressed = true,
                    Err(ModuleError::RequiredByActive { .. }) | Err(ModuleError::NotActive(_)) => {}
                    Err(e) => {
                        warn!("Teardown of module '{}' failed: {}", name, e);
                        self.active.write().await.remove(&name);
                        progressed = true;
                    }
                }
            }
            if !progressed {
                return;
            }
        }
    }
}
