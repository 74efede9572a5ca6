//! Resolver cache.
//!
//! Resolvers are expensive to build and immutable once built, so each cache
//! keeps one per `(locale, params)` pair for the life of the process. A
//! resolver is built at most once per key, even under concurrent first
//! requests: the map lock is only held to find the key's slot, and the slot
//! lock is held while the factory runs. A failed construction removes the
//! empty slot again so the next request retries and rejected keys do not
//! accumulate.

mod metrics;

pub use metrics::{CacheMetrics, CacheReport};

use crate::converter::{ConverterError, ConverterFactory, KeyedParams, ParamsKey, Resolver, ResolverSet};
use crate::i18n::{dedup_locales, Locale};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    locale: Locale,
    params: ParamsKey,
}

type Slot = Arc<Mutex<Option<Arc<dyn Resolver>>>>;

pub struct ResolverCache {
    name: String,
    slots: Mutex<HashMap<CacheKey, Slot>>,
    /// Resolvers published into slots still held by the map.
    built: AtomicUsize,
    metrics: CacheMetrics,
}

impl ResolverCache {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: Mutex::new(HashMap::new()),
            built: AtomicUsize::new(0),
            metrics: CacheMetrics::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the resolver for `(locale, params)`, building it with `factory`
    /// on first use.
    ///
    /// Only the fields exposed by [`KeyedParams`] take part in the identity.
    pub fn get_or_create<P: KeyedParams + ?Sized>(
        &self,
        locale: &Locale,
        params: &P,
        factory: &dyn ConverterFactory,
    ) -> Result<Arc<dyn Resolver>, ConverterError> {
        let key = CacheKey {
            locale: locale.clone(),
            params: params.params_key(),
        };

        let slot = {
            let mut slots = lock(&self.slots);
            slots.entry(key.clone()).or_default().clone()
        };

        let mut resolver = lock(&slot);
        if let Some(existing) = resolver.as_ref() {
            self.metrics.record_hit();
            return Ok(existing.clone());
        }

        self.metrics.record_miss();
        match factory.create(&key.locale, &key.params) {
            Ok(created) => {
                self.metrics.record_construction();
                debug!("[{}] Built resolver for {}", self.name, key.locale);
                *resolver = Some(created.clone());
                if self.publish(key, &slot) {
                    self.built.fetch_add(1, Ordering::SeqCst);
                }
                Ok(created)
            }
            Err(e) => {
                self.metrics.record_construction_failure();
                warn!("[{}] Failed to build resolver for {}: {}", self.name, key.locale, e);
                drop(resolver);
                self.discard(&key, &slot);
                Err(e)
            }
        }
    }

    /// Make sure the map holds `slot` after a successful build. A concurrent
    /// failure may have removed it while this build waited on the slot lock.
    ///
    /// Returns false when another slot took the key in the meantime.
    fn publish(&self, key: CacheKey, slot: &Slot) -> bool {
        let mut slots = lock(&self.slots);
        match slots.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(slot.clone());
                true
            }
            Entry::Occupied(entry) => Arc::ptr_eq(entry.get(), slot),
        }
    }

    /// Drop the key's slot if it is still this one and still empty. A slot
    /// locked by another caller is left alone; that caller publishes or
    /// discards it in turn.
    fn discard(&self, key: &CacheKey, slot: &Slot) {
        let mut slots = lock(&self.slots);
        let vacant = match slots.get(key) {
            Some(current) if Arc::ptr_eq(current, slot) => match slot.try_lock() {
                Ok(resolver) => resolver.is_none(),
                Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().is_none(),
                Err(TryLockError::WouldBlock) => false,
            },
            _ => false,
        };
        if vacant {
            slots.remove(key);
        }
    }

    /// Resolvers for every distinct locale of a request, sharing one set of
    /// params. Fails on the first locale whose resolver cannot be built.
    pub fn resolvers_for_locales<P: KeyedParams + ?Sized>(
        &self,
        locales: &[Locale],
        params: &P,
        factory: &dyn ConverterFactory,
    ) -> Result<ResolverSet, ConverterError> {
        let mut resolvers = ResolverSet::new();
        for locale in dedup_locales(locales) {
            let resolver = self.get_or_create(&locale, params, factory)?;
            resolvers.insert(locale, resolver);
        }
        Ok(resolvers)
    }

    /// Eagerly build resolvers. Failures are logged and skipped.
    ///
    /// # Returns
    /// Number of locales with a resolver available afterwards
    pub fn preload<P: KeyedParams + ?Sized>(
        &self,
        locales: &[Locale],
        params: &P,
        factory: &dyn ConverterFactory,
    ) -> usize {
        let mut ready = 0;
        for locale in dedup_locales(locales) {
            match self.get_or_create(&locale, params, factory) {
                Ok(_) => ready += 1,
                Err(e) => warn!("[{}] Preload skipped {}: {}", self.name, locale, e),
            }
        }
        info!("[{}] Preloaded {} resolver(s)", self.name, ready);
        ready
    }

    /// Number of resolvers built and held. Never waits on a construction.
    pub fn len(&self) -> usize {
        self.built.load(Ordering::SeqCst)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    pub fn report(&self) -> CacheReport {
        self.metrics.report(self.len())
    }
}

/// Lock a mutex, recovering the data if a previous holder panicked.
fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
