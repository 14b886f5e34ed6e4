//! Lifecycle hook registry.
//!
//! The resolution engine reaches three checkpoints in a fixed order:
//! `BeforeConfig` (defaults restored, logging live, no files loaded yet),
//! `ConfigLoaded` (all sources folded into the store) and `ExecutionStart`
//! (the pass is about to hand control back to the caller). Dependent
//! subsystems such as plugins register listeners against a checkpoint and
//! are invoked synchronously, in registration order, on the calling thread.
//!
//! Listeners carry no payload: the event name itself is the contract.
//! A listener returning an error aborts the resolution pass; the engine
//! never catches or retries hook failures.

use crate::error::{ConfigError, Result};
use std::collections::HashMap;
use std::fmt;

/// Named checkpoints of a resolution pass. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookEvent {
    /// Defaults restored and logging initialized; no config sources loaded.
    BeforeConfig,
    /// Every source has been applied and derivations are consistent.
    ConfigLoaded,
    /// Resolution is complete; downstream execution is about to begin.
    ExecutionStart,
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookEvent::BeforeConfig => write!(f, "before_config"),
            HookEvent::ConfigLoaded => write!(f, "config_loaded"),
            HookEvent::ExecutionStart => write!(f, "execution_start"),
        }
    }
}

/// A registered lifecycle listener.
pub type HookFn = Box<dyn FnMut() -> anyhow::Result<()>>;

/// Ordered registry of lifecycle listeners.
///
/// Owned by the caller and passed to the engine by mutable reference, so two
/// independent registries can coexist in one process (e.g. in tests).
#[derive(Default)]
pub struct HookRegistry {
    hooks: HashMap<HookEvent, Vec<HookFn>>,
}

impl HookRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for an event. Listeners for the same event are
    /// invoked in registration order.
    pub fn register<F>(&mut self, event: HookEvent, hook: F)
    where
        F: FnMut() -> anyhow::Result<()> + 'static,
    {
        self.hooks.entry(event).or_default().push(Box::new(hook));
    }

    /// Number of listeners registered for an event.
    pub fn listener_count(&self, event: HookEvent) -> usize {
        self.hooks.get(&event).map_or(0, Vec::len)
    }

    /// Invoke every listener registered for `event`, synchronously and in
    /// registration order. The first listener error aborts the remaining
    /// listeners and propagates as [`ConfigError::Hook`].
    pub fn trigger(&mut self, event: HookEvent) -> Result<()> {
        if let Some(listeners) = self.hooks.get_mut(&event) {
            tracing::debug!("triggering {} hook ({} listeners)", event, listeners.len());
            for hook in listeners.iter_mut() {
                hook().map_err(|source| ConfigError::Hook { event, source })?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (event, listeners) in &self.hooks {
            map.entry(event, &listeners.len());
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn listeners_run_in_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut registry = HookRegistry::new();

        for label in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            registry.register(HookEvent::ConfigLoaded, move || {
                order.borrow_mut().push(label);
                Ok(())
            });
        }

        registry.trigger(HookEvent::ConfigLoaded).unwrap();
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn events_are_independent() {
        let hits = Rc::new(RefCell::new(0));
        let mut registry = HookRegistry::new();

        let counter = Rc::clone(&hits);
        registry.register(HookEvent::BeforeConfig, move || {
            *counter.borrow_mut() += 1;
            Ok(())
        });

        registry.trigger(HookEvent::ExecutionStart).unwrap();
        assert_eq!(*hits.borrow(), 0);

        registry.trigger(HookEvent::BeforeConfig).unwrap();
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn failing_listener_stops_the_chain() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut registry = HookRegistry::new();

        let trace = Rc::clone(&order);
        registry.register(HookEvent::ConfigLoaded, move || {
            trace.borrow_mut().push("ran");
            anyhow::bail!("plugin exploded")
        });
        let trace = Rc::clone(&order);
        registry.register(HookEvent::ConfigLoaded, move || {
            trace.borrow_mut().push("never");
            Ok(())
        });

        let err = registry.trigger(HookEvent::ConfigLoaded).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Hook {
                event: HookEvent::ConfigLoaded,
                ..
            }
        ));
        assert_eq!(*order.borrow(), vec!["ran"]);
    }
}
