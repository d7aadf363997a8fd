use std::collections::BTreeMap;

use vitrine_engine::core::HostCtx;
use vitrine_engine::time::Timestamp;

use crate::error::ConfigError;
use crate::marquee::MarqueeEngine;

/// Named marquee instances owned by the page.
///
/// Control helpers report whether the key existed instead of failing, so
/// scripted callers can address tickers that a page did not mount.
#[derive(Debug, Default)]
pub struct MarqueeRegistry {
    engines: BTreeMap<String, MarqueeEngine>,
}

impl MarqueeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `engine` under `key`, returning the instance it replaced.
    ///
    /// A replaced instance is returned still alive; destroying it is the
    /// caller's job.
    pub fn insert(&mut self, key: impl Into<String>, engine: MarqueeEngine) -> Option<MarqueeEngine> {
        self.engines.insert(key.into(), engine)
    }

    pub fn get(&self, key: &str) -> Option<&MarqueeEngine> {
        self.engines.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut MarqueeEngine> {
        self.engines.get_mut(key)
    }

    /// Takes the instance out of the registry, still alive.
    ///
    /// The page stops routing callbacks to it, so the caller must `destroy`
    /// it or its listeners and frame stay registered. See [`Self::destroy`].
    pub fn remove(&mut self, key: &str) -> Option<MarqueeEngine> {
        self.engines.remove(key)
    }

    /// Removes and destroys the instance under `key`; `false` if absent.
    pub fn destroy(&mut self, ctx: &mut HostCtx<'_>, key: &str) -> bool {
        let Some(mut engine) = self.engines.remove(key) else {
            return false;
        };
        log::debug!("destroying marquee `{key}`");
        engine.destroy(ctx);
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.engines.contains_key(key)
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.engines.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut MarqueeEngine)> {
        self.engines.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    // ── Control helpers ───────────────────────────────────────────────────

    /// `Ok(false)` if no such key; the engine's error if the speed is invalid.
    pub fn set_speed(&mut self, key: &str, px_per_second: f64) -> Result<bool, ConfigError> {
        match self.engines.get_mut(key) {
            Some(engine) => engine.set_speed(px_per_second).map(|()| true),
            None => Ok(false),
        }
    }

    pub fn pause(&mut self, key: &str) -> bool {
        self.engines.get_mut(key).map(MarqueeEngine::pause).is_some()
    }

    pub fn resume(&mut self, key: &str, now: Timestamp) -> bool {
        self.engines.get_mut(key).map(|e| e.resume(now)).is_some()
    }

    /// Destroys and drops every instance.
    pub fn destroy_all(&mut self, ctx: &mut HostCtx<'_>) {
        for (key, mut engine) in std::mem::take(&mut self.engines) {
            log::debug!("destroying marquee `{key}`");
            engine.destroy(ctx);
        }
    }
}
