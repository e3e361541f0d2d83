//! Recent-search history.
//!
//! An ordered, most-recent-first list of the city names the user has looked
//! up, de-duplicated case-insensitively and bounded to the last five. The
//! list is loaded once per session and written back after every mutation
//! under a single fixed key.

use tracing::warn;

use crate::storage::SharedStore;

/// Fixed store key for the serialized list.
pub const RECENT_CITIES_KEY: &str = "recent_cities";

/// Older entries fall off the end once this many are kept.
pub const MAX_RECENT: usize = 5;

#[derive(Debug)]
pub struct RecentSearches {
    store: SharedStore,
    cities: Vec<String>,
}

impl RecentSearches {
    /// Load the persisted list. An absent or malformed payload loads as an
    /// empty list, not an error.
    pub fn load(store: SharedStore) -> Self {
        let cities = store
            .lock()
            .get(RECENT_CITIES_KEY)
            .and_then(|raw| serde_json::from_str::<Vec<String>>(&raw).ok())
            .unwrap_or_default();
        Self { store, cities }
    }

    /// Push a searched city to the front of the list.
    ///
    /// The name is normalized for display (first letter upper, remainder
    /// lower); any existing entry matching case-insensitively is removed
    /// first, so a re-search moves a city to the front instead of
    /// duplicating it. Persist failures are logged and otherwise ignored.
    pub fn record(&mut self, city: &str) {
        let formatted = title_case(city);
        let lowered = city.to_lowercase();
        self.cities.retain(|c| c.to_lowercase() != lowered);
        self.cities.insert(0, formatted);
        self.cities.truncate(MAX_RECENT);
        self.persist();
    }

    /// Current in-memory list, most recent first.
    pub fn list(&self) -> &[String] {
        &self.cities
    }

    fn persist(&self) {
        match serde_json::to_string(&self.cities) {
            Ok(raw) => {
                if let Err(err) = self.store.lock().set(RECENT_CITIES_KEY, &raw) {
                    warn!(%err, "failed to persist recent searches");
                }
            }
            Err(err) => warn!(%err, "failed to encode recent searches"),
        }
    }
}

fn title_case(city: &str) -> String {
    let mut chars = city.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}
