use std::sync::{PoisonError, RwLock};

use reqwest::header::{AUTHORIZATION, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::error::Error;

pub(crate) const CSRF_HEADER: &str = "X-CSRF-TOKEN";

/// Which credential a request path relies on.
///
/// Marker enum with no secret material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStrategy {
    /// Admin surface: CSRF token read from the page-level trust anchor.
    Csrf,
    /// Public surface: bearer token from the persisted session.
    Bearer,
}

/// Request credentials held by the transport.
///
/// The CSRF token is fixed for the lifetime of a client. The bearer token
/// follows the session: installed after login or at startup from persisted
/// storage, cleared on logout.
#[derive(Debug, Default)]
pub struct AuthHeaders {
    csrf_token: Option<SecretString>,
    bearer: RwLock<Option<SecretString>>,
}

impl AuthHeaders {
    pub fn new(csrf_token: Option<SecretString>, bearer: Option<SecretString>) -> Self {
        Self {
            csrf_token,
            bearer: RwLock::new(bearer),
        }
    }

    pub fn set_bearer(&self, token: SecretString) {
        debug!("installing bearer token");
        *self.bearer.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    pub fn clear_bearer(&self) {
        debug!("clearing bearer token");
        *self.bearer.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn has_bearer(&self) -> bool {
        self.bearer.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    pub fn has_csrf(&self) -> bool {
        self.csrf_token.is_some()
    }

    /// Strategies currently available to requests.
    pub fn strategies(&self) -> Vec<AuthStrategy> {
        let mut out = Vec::with_capacity(2);
        if self.has_csrf() {
            out.push(AuthStrategy::Csrf);
        }
        if self.has_bearer() {
            out.push(AuthStrategy::Bearer);
        }
        out
    }

    /// Attach the CSRF and bearer headers that are configured.
    pub(crate) fn apply(
        &self,
        mut builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, Error> {
        if let Some(token) = &self.csrf_token {
            let mut value = HeaderValue::from_str(token.expose_secret()).map_err(|_| {
                Error::InvalidHeader {
                    header: CSRF_HEADER,
                }
            })?;
            value.set_sensitive(true);
            builder = builder.header(CSRF_HEADER, value);
        }

        let guard = self.bearer.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(token) = guard.as_ref() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|_| Error::InvalidHeader {
                    header: "Authorization",
                })?;
            value.set_sensitive(true);
            builder = builder.header(AUTHORIZATION, value);
        }

        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_follows_session_lifecycle() {
        let auth = AuthHeaders::new(Some(SecretString::from("csrf")), None);
        assert_eq!(auth.strategies(), vec![AuthStrategy::Csrf]);

        auth.set_bearer(SecretString::from("tok"));
        assert_eq!(
            auth.strategies(),
            vec![AuthStrategy::Csrf, AuthStrategy::Bearer]
        );

        auth.clear_bearer();
        assert!(!auth.has_bearer());
    }
}
