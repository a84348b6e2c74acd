//! Fetch orchestration: cached creature resolution and catalog paging.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::OnceCell;

use crate::api::{ApiError, PokeApi};
use crate::cache::{cache_key, DetailCache};
use crate::mapper::{extract_id, to_creature_detail};
use crate::pager::{CatalogPage, ListPager, PagingCursor};
use crate::state::CreatureDetail;

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum DexError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("species {name} has no evolution chain reference")]
    MissingEvolutionChain { name: String },
    #[error("creature name is empty")]
    EmptyName,
}

type Flight = Arc<OnceCell<Arc<CreatureDetail>>>;

/// Long-lived session over one [`PokeApi`] source. Owns the detail cache and
/// the catalog cursor; safe to share behind an `Arc` across tasks.
pub struct Dex<A> {
    api: Arc<A>,
    cache: DetailCache,
    inflight: Mutex<HashMap<String, Flight>>,
    pager: Mutex<ListPager>,
}

impl<A: PokeApi> Dex<A> {
    pub fn new(api: A) -> Self {
        Self::with_cache(Arc::new(api), DetailCache::new())
    }

    pub fn with_cache(api: Arc<A>, cache: DetailCache) -> Self {
        Self {
            api,
            cache,
            inflight: Mutex::new(HashMap::new()),
            pager: Mutex::new(ListPager::new()),
        }
    }

    pub fn cache(&self) -> &DetailCache {
        &self.cache
    }

    pub fn cached(&self, name: &str) -> Option<Arc<CreatureDetail>> {
        self.cache.get(name)
    }

    /// Resolve one creature by name (or catalog number).
    ///
    /// Cached records return without touching the network. Otherwise the
    /// detail and species are fetched together, then the evolution chain, and
    /// the mapped record is cached under the requested name. Concurrent
    /// calls for the same name share a single fetch; a failure caches nothing.
    pub async fn resolve(&self, name: &str) -> Result<Arc<CreatureDetail>, DexError> {
        let key = cache_key(name);
        if key.is_empty() {
            return Err(DexError::EmptyName);
        }
        if let Some(detail) = self.cache.get(&key) {
            tracing::debug!(name = %key, "cache hit");
            return Ok(detail);
        }

        let flight = {
            let mut inflight = lock(&self.inflight);
            Arc::clone(inflight.entry(key.clone()).or_default())
        };
        // Clears the in-flight entry on completion and when the caller is dropped.
        let _release = FlightRelease {
            inflight: &self.inflight,
            key: &key,
            flight: &flight,
        };
        flight
            .get_or_try_init(|| self.fetch(&key))
            .await
            .map(Arc::clone)
    }

    /// Number of lookups currently in flight.
    pub fn pending_lookups(&self) -> usize {
        lock(&self.inflight).len()
    }

    async fn fetch(&self, key: &str) -> Result<Arc<CreatureDetail>, DexError> {
        tracing::debug!(name = %key, "cache miss");
        let (pokemon, species) = tokio::try_join!(self.api.pokemon(key), self.api.species(key))?;
        let chain_id = species
            .evolution_chain
            .as_ref()
            .and_then(|chain| extract_id(&chain.url))
            .ok_or_else(|| DexError::MissingEvolutionChain {
                name: key.to_string(),
            })?;
        let chain = self.api.evolution_chain(chain_id).await?;

        let detail = Arc::new(to_creature_detail(&pokemon, &species, &chain));
        self.cache.insert(key, Arc::clone(&detail));
        tracing::info!(
            name = %key,
            stages = detail.evolution_chain.len(),
            "resolved creature"
        );
        Ok(detail)
    }

    /// Fetch the next catalog page and return the names it added.
    ///
    /// `Ok(None)` means nothing was requested: a page is already
    /// outstanding or the catalog is exhausted. On error the cursor stays put.
    pub async fn next_page(&self) -> Result<Option<Vec<String>>, DexError> {
        let request = {
            let mut pager = lock(&self.pager);
            pager.begin()
        };
        let Some(request) = request else {
            return Ok(None);
        };
        tracing::debug!(offset = request.offset, "loading catalog page");

        let mut claim = PageClaim {
            pager: &self.pager,
            offset: request.offset,
            armed: true,
        };
        let result = self.fetch_page(request.offset, request.limit).await;
        claim.armed = false;

        match result {
            Ok(page) => {
                let mut pager = lock(&self.pager);
                let names = pager
                    .complete(page)
                    .map(|rows| rows.iter().map(|row| row.name.clone()).collect());
                Ok(names)
            }
            Err(err) => {
                tracing::warn!(offset = request.offset, error = %err, "catalog page failed");
                lock(&self.pager).fail(request.offset, err.to_string());
                Err(err)
            }
        }
    }

    /// One raw listing page. Does not touch the session cursor; callers that
    /// keep their own [`ListPager`] feed the result to it.
    pub async fn fetch_page(&self, offset: u32, limit: u32) -> Result<CatalogPage, DexError> {
        let response = self.api.pokemon_page(limit, offset).await?;
        Ok(CatalogPage::from_response(offset, response))
    }

    /// Every name loaded so far, in catalog order.
    pub fn names(&self) -> Vec<String> {
        lock(&self.pager).names()
    }

    pub fn cursor(&self) -> PagingCursor {
        lock(&self.pager).cursor()
    }
}

/// Removes a finished or abandoned flight from the in-flight map, unless a
/// newer flight already took the key.
struct FlightRelease<'a> {
    inflight: &'a Mutex<HashMap<String, Flight>>,
    key: &'a str,
    flight: &'a Flight,
}

impl Drop for FlightRelease<'_> {
    fn drop(&mut self) {
        let mut inflight = lock(self.inflight);
        if inflight
            .get(self.key)
            .is_some_and(|current| Arc::ptr_eq(current, self.flight))
        {
            inflight.remove(self.key);
        }
    }
}

/// An outstanding page request. Dropped while armed (the caller went away
/// mid-fetch), it releases the pager so the same offset can be requested again.
struct PageClaim<'a> {
    pager: &'a Mutex<ListPager>,
    offset: u32,
    armed: bool,
}

impl Drop for PageClaim<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::debug!(offset = self.offset, "catalog page request cancelled");
            lock(self.pager).fail(self.offset, "cancelled");
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
