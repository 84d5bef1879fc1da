// ── Backoffice facade ──
//
// Single entry point for front ends. Owns the shared API client and vends
// a fresh store per screen; stores are never cached here, so opening a
// screen always starts from the server's current state.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::debug;

use lectern_api::ApiClient;

use crate::category::CategoryManager;
use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::model::{
    Announcement, Book, Donation, Event, Menu, Post, PrayerRequest, Role, Sermon, User,
};
use crate::resource::Resource;
use crate::store::ResourceStore;
use crate::widgets::HomepageCustomizer;

/// Cheaply cloneable handle to one admin API.
#[derive(Clone)]
pub struct Backoffice {
    inner: Arc<BackofficeInner>,
}

struct BackofficeInner {
    config: ClientConfig,
    api: Arc<ApiClient>,
}

impl Backoffice {
    pub fn new(config: ClientConfig) -> Result<Self, CoreError> {
        let api = ApiClient::new(
            config.base_url.as_str(),
            config.auth_headers(),
            &config.transport(),
        )?;
        debug!(base_url = %config.base_url, "backoffice client ready");
        Ok(Self {
            inner: Arc::new(BackofficeInner {
                config,
                api: Arc::new(api),
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn api(&self) -> Arc<ApiClient> {
        Arc::clone(&self.inner.api)
    }

    // ── Session ──────────────────────────────────────────────────────

    /// Attach a bearer token to every subsequent request.
    pub fn install_session(&self, token: SecretString) {
        self.inner.api.auth().set_bearer(token);
    }

    pub fn clear_session(&self) {
        self.inner.api.auth().clear_bearer();
    }

    pub fn has_session(&self) -> bool {
        self.inner.api.auth().has_bearer()
    }

    // ── Screens ──────────────────────────────────────────────────────

    pub fn store<R: Resource>(&self) -> ResourceStore<R> {
        ResourceStore::new(self.api())
    }

    pub fn announcements(&self) -> ResourceStore<Announcement> {
        self.store()
    }

    pub fn posts(&self) -> ResourceStore<Post> {
        self.store()
    }

    pub fn sermons(&self) -> ResourceStore<Sermon> {
        self.store()
    }

    pub fn books(&self) -> ResourceStore<Book> {
        self.store()
    }

    pub fn events(&self) -> ResourceStore<Event> {
        self.store()
    }

    pub fn prayer_requests(&self) -> ResourceStore<PrayerRequest> {
        self.store()
    }

    pub fn donations(&self) -> ResourceStore<Donation> {
        self.store()
    }

    pub fn users(&self) -> ResourceStore<User> {
        self.store()
    }

    pub fn roles(&self) -> ResourceStore<Role> {
        self.store()
    }

    pub fn menus(&self) -> ResourceStore<Menu> {
        self.store()
    }

    pub fn homepage(&self) -> HomepageCustomizer {
        HomepageCustomizer::new(self.api())
    }

    pub fn categories(&self) -> CategoryManager {
        CategoryManager::new(self.api())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn session_install_and_clear() {
        let config = ClientConfig::new("https://church.example/api/admin".parse().unwrap());
        let office = Backoffice::new(config).unwrap();
        assert!(!office.has_session());
        office.install_session(SecretString::from("tok"));
        assert!(office.has_session());
        office.clear_session();
        assert!(!office.has_session());
    }

    #[test]
    fn stores_start_empty() {
        let config = ClientConfig::new("https://church.example/api/admin".parse().unwrap());
        let office = Backoffice::new(config).unwrap();
        let events = office.events();
        assert!(events.items().is_empty());
        assert_eq!(events.meta().current_page, 1);
    }
}
