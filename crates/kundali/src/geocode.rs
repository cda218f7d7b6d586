//! Place-name lookup collaborator and its memoizing cache.

use async_trait::async_trait;
use kundali_config::GeocoderSettings;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::ephemeris::GeoLocation;
use crate::error::{KundaliError, LookupError};

/// Resolves a free-form place name into coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn locate(&self, place: &str) -> Result<GeoLocation, LookupError>;
}

#[derive(Default)]
struct CacheState {
    cells: HashMap<String, Arc<OnceCell<GeoLocation>>>,
    order: VecDeque<String>,
}

/// Bounded cache in front of a [`Geocoder`].
///
/// Each place name owns one `OnceCell`; concurrent callers asking for the same
/// uncached place wait on the same in-flight lookup. Failed lookups leave the
/// cell empty so the next caller retries. Once full, the oldest place is
/// evicted first.
pub struct GeocodeCache {
    geocoder: Arc<dyn Geocoder>,
    capacity: usize,
    timeout: Duration,
    state: Mutex<CacheState>,
}

impl GeocodeCache {
    pub fn new(geocoder: Arc<dyn Geocoder>, settings: &GeocoderSettings) -> Self {
        Self {
            geocoder,
            capacity: settings.cache_capacity.max(1),
            timeout: settings.timeout(),
            state: Mutex::new(CacheState::default()),
        }
    }

    pub async fn coordinates(&self, place: &str) -> Result<GeoLocation, KundaliError> {
        let key = place.trim().to_string();
        let cell = self.cell_for(&key);

        if let Some(location) = cell.get() {
            log::debug!("geocode cache hit for '{}'", key);
            return Ok(*location);
        }

        let result = cell
            .get_or_try_init(|| async {
                match tokio::time::timeout(self.timeout, self.geocoder.locate(&key)).await {
                    Ok(Ok(location)) => {
                        log::info!("geocoded '{}' to ({:.4}, {:.4})", key, location.lat, location.lon);
                        Ok(location)
                    }
                    Ok(Err(e)) => Err(KundaliError::from(e)),
                    Err(_) => Err(KundaliError::Timeout {
                        collaborator: "geocoder",
                        after: self.timeout,
                    }),
                }
            })
            .await;

        match result {
            Ok(location) => Ok(*location),
            Err(e) => {
                log::warn!("geocoding '{}' failed: {}", key, e);
                self.discard_empty(&key, &cell);
                Err(e)
            }
        }
    }

    /// Number of places with resolved coordinates.
    pub fn len(&self) -> usize {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.cells.values().filter(|cell| cell.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cell_for(&self, key: &str) -> Arc<OnceCell<GeoLocation>> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cell) = state.cells.get(key) {
            return Arc::clone(cell);
        }

        while state.order.len() >= self.capacity {
            match state.order.pop_front() {
                Some(oldest) => {
                    state.cells.remove(&oldest);
                }
                None => break,
            }
        }

        let cell = Arc::new(OnceCell::new());
        state.cells.insert(key.to_string(), Arc::clone(&cell));
        state.order.push_back(key.to_string());
        cell
    }

    fn discard_empty(&self, key: &str, cell: &Arc<OnceCell<GeoLocation>>) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let same_cell = state
            .cells
            .get(key)
            .map(|current| Arc::ptr_eq(current, cell) && !current.initialized())
            .unwrap_or(false);
        if same_cell {
            state.cells.remove(key);
            state.order.retain(|k| k != key);
        }
    }
}
