//! Session-wide cache of installed themes.

use crate::api::ThemeApi;
use crate::errors::{ThemeError, ThemeResult};
use crate::model::Theme;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

#[derive(Debug, Default)]
struct RegistryState {
    themes: Vec<Theme>,
    fetched_at: Option<DateTime<Utc>>,
    stale: bool,
}

impl RegistryState {
    fn is_fresh(&self) -> bool {
        self.fetched_at.is_some() && !self.stale
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.themes.iter().position(|t| t.id == id)
    }

    fn make_sole_active(&mut self, id: &str) {
        for theme in &mut self.themes {
            theme.active = theme.id == id;
        }
    }
}

/// In-memory collection of installed themes.
///
/// One registry lives for one admin session. It is a cheap handle: clones
/// share the same state, so the pipelines and every view read the same
/// source of truth.
///
/// At most one theme is ever active. The invariant is enforced by the
/// mutation methods themselves; callers never toggle `active` by hand.
/// Each mutation is applied under a single write lock, so readers only
/// observe complete snapshots.
///
/// # Examples
///
/// ```no_run
/// use admin::registry::ThemeRegistry;
///
/// async fn example(registry: ThemeRegistry) -> admin::errors::ThemeResult<()> {
///     let themes = registry.list().await?;
///     registry.set_active("casper").await?;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct ThemeRegistry {
    api: Arc<dyn ThemeApi>,
    state: Arc<RwLock<RegistryState>>,
    fetch_lock: Arc<Mutex<()>>,
}

impl ThemeRegistry {
    pub fn new(api: Arc<dyn ThemeApi>) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(RegistryState::default())),
            fetch_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the cached themes, fetching them first if the registry was
    /// never populated or has been invalidated.
    pub async fn list(&self) -> ThemeResult<Vec<Theme>> {
        {
            let state = self.state.read().await;
            if state.is_fresh() {
                return Ok(state.themes.clone());
            }
        }

        let _guard = self.fetch_lock.lock().await;
        {
            // Another caller may have fetched while we waited.
            let state = self.state.read().await;
            if state.is_fresh() {
                return Ok(state.themes.clone());
            }
        }
        self.fetch().await
    }

    /// Re-fetches the theme list unconditionally.
    pub async fn refresh(&self) -> ThemeResult<Vec<Theme>> {
        let _guard = self.fetch_lock.lock().await;
        self.fetch().await
    }

    async fn fetch(&self) -> ThemeResult<Vec<Theme>> {
        let fetched = self.api.list_themes().await.map_err(|failure| {
            log::error!("Failed to fetch installed themes: {failure:?}");
            ThemeError::from(failure)
        })?;
        log::debug!("Fetched {} installed themes", fetched.len());

        let mut state = self.state.write().await;
        state.themes = merge_local_issues(fetched, &state.themes);
        enforce_single_active(&mut state.themes);
        state.fetched_at = Some(Utc::now());
        state.stale = false;
        Ok(state.themes.clone())
    }

    /// Replaces the whole cached list, marking the registry as fetched.
    pub async fn replace_all(&self, mut themes: Vec<Theme>) {
        enforce_single_active(&mut themes);
        let mut state = self.state.write().await;
        state.themes = themes;
        state.fetched_at = Some(Utc::now());
        state.stale = false;
    }

    /// Marks the cache stale; the next [`list`](Self::list) re-fetches.
    pub async fn invalidate(&self) {
        self.state.write().await.stale = true;
    }

    /// Cached themes without ever touching the network.
    pub async fn snapshot(&self) -> Vec<Theme> {
        self.state.read().await.themes.clone()
    }

    pub async fn get(&self, id: &str) -> Option<Theme> {
        let state = self.state.read().await;
        state.themes.iter().find(|t| t.id == id).cloned()
    }

    pub async fn active(&self) -> Option<Theme> {
        let state = self.state.read().await;
        state.themes.iter().find(|t| t.active).cloned()
    }

    pub async fn last_fetched(&self) -> Option<DateTime<Utc>> {
        self.state.read().await.fetched_at
    }

    /// Inserts or replaces a theme by id.
    ///
    /// An incoming active theme demotes every other theme in the same update.
    pub async fn upsert(&self, theme: Theme) {
        let mut state = self.state.write().await;
        let id = theme.id.clone();
        let active = theme.active;

        match state.position(&id) {
            Some(index) => state.themes[index] = theme,
            None => state.themes.push(theme),
        }
        if active {
            state.make_sole_active(&id);
        }
        log::debug!("Registry upserted theme {id} (active: {active})");
    }

    /// Removes a theme by id, returning it.
    pub async fn remove(&self, id: &str) -> ThemeResult<Theme> {
        let mut state = self.state.write().await;
        let index = state.position(id).ok_or_else(|| ThemeError::not_found(id))?;
        Ok(state.themes.remove(index))
    }

    /// Marks exactly `id` active and every other theme inactive.
    pub async fn set_active(&self, id: &str) -> ThemeResult<()> {
        let mut state = self.state.write().await;
        if state.position(id).is_none() {
            return Err(ThemeError::not_found(id));
        }
        state.make_sole_active(id);
        Ok(())
    }
}

/// Fetched themes replace cached ones, except that issues attached locally
/// by the last upload or activation survive when the listing carries none.
fn merge_local_issues(fetched: Vec<Theme>, cached: &[Theme]) -> Vec<Theme> {
    fetched
        .into_iter()
        .map(|mut theme| {
            if !theme.has_issues() {
                if let Some(previous) = cached.iter().find(|c| c.id == theme.id) {
                    theme.warnings = previous.warnings.clone();
                    theme.errors = previous.errors.clone();
                }
            }
            theme
        })
        .collect()
}

fn enforce_single_active(themes: &mut [Theme]) {
    let mut seen_active = false;
    for theme in themes.iter_mut() {
        if theme.active {
            if seen_active {
                log::warn!(
                    "More than one active theme reported, demoting {}",
                    theme.id
                );
                theme.active = false;
            }
            seen_active = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiFailure, ThemeArchive};
    use crate::model::ValidationIssue;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ListOnlyApi {
        themes: Vec<Theme>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ThemeApi for ListOnlyApi {
        async fn list_themes(&self) -> Result<Vec<Theme>, ApiFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.themes.clone())
        }

        async fn upload_theme(&self, _archive: &ThemeArchive) -> Result<Theme, ApiFailure> {
            Err(ApiFailure::message(None, "unsupported"))
        }

        async fn activate_theme(&self, _id: &str) -> Result<Theme, ApiFailure> {
            Err(ApiFailure::message(None, "unsupported"))
        }

        async fn delete_theme(&self, _id: &str) -> Result<(), ApiFailure> {
            Err(ApiFailure::message(None, "unsupported"))
        }
    }

    fn registry_with(themes: Vec<Theme>) -> (ThemeRegistry, Arc<ListOnlyApi>) {
        let api = Arc::new(ListOnlyApi {
            themes,
            calls: AtomicUsize::new(0),
        });
        (ThemeRegistry::new(api.clone()), api)
    }

    #[tokio::test]
    async fn test_list_fetches_once_until_invalidated() {
        let (registry, api) = registry_with(vec![Theme::new("casper", "Casper").activated()]);

        assert_eq!(registry.list().await.unwrap().len(), 1);
        assert_eq!(registry.list().await.unwrap().len(), 1);
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);

        registry.invalidate().await;
        registry.list().await.unwrap();
        assert_eq!(api.calls.load(Ordering::SeqCst), 2);
        assert!(registry.last_fetched().await.is_some());
    }

    #[tokio::test]
    async fn test_upsert_active_demotes_others() {
        let (registry, _) = registry_with(vec![]);
        registry.upsert(Theme::new("casper", "Casper").activated()).await;
        registry.upsert(Theme::new("test-1", "Test 1").activated()).await;

        let themes = registry.snapshot().await;
        assert_eq!(themes.iter().filter(|t| t.active).count(), 1);
        assert_eq!(registry.active().await.unwrap().id, "test-1");
    }

    #[tokio::test]
    async fn test_upsert_replaces_in_place() {
        let (registry, _) = registry_with(vec![]);
        registry.upsert(Theme::new("a", "A")).await;
        registry.upsert(Theme::new("b", "B")).await;
        registry.upsert(Theme::new("a", "A2")).await;

        let themes = registry.snapshot().await;
        assert_eq!(themes.len(), 2);
        assert_eq!(themes[0].package_name, "A2");
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let (registry, _) = registry_with(vec![]);
        registry.upsert(Theme::new("casper", "Casper").activated()).await;

        assert_eq!(
            registry.set_active("missing").await,
            Err(ThemeError::not_found("missing"))
        );
        assert!(registry.remove("missing").await.is_err());
        assert!(registry.get("casper").await.unwrap().active);
    }

    #[tokio::test]
    async fn test_refresh_keeps_local_warnings() {
        let (registry, _) = registry_with(vec![Theme::new("test-1", "Test 1")]);
        registry
            .upsert(Theme::new("test-1", "Test 1").with_warnings(vec![ValidationIssue::warning("w")]))
            .await;

        let themes = registry.refresh().await.unwrap();
        assert_eq!(themes[0].warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_fetched_duplicates_active_are_demoted() {
        let (registry, _) = registry_with(vec![
            Theme::new("a", "A").activated(),
            Theme::new("b", "B").activated(),
        ]);

        let themes = registry.list().await.unwrap();
        assert!(themes[0].active);
        assert!(!themes[1].active);
    }
}
