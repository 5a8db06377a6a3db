//! Alert headers
//!
//! Clients display a notification after each write, driven by two headers:
//!
//! ```text
//! X-reportcardApp-alert: reportcardApp.classe.created
//! X-reportcardApp-params: 1
//! ```
//!
//! and, on a rejected request:
//!
//! ```text
//! X-reportcardApp-error: error.idexists
//! X-reportcardApp-params: classe
//! ```
//!
//! The alert value is a translation key, the params value fills it in. The
//! `reportcardApp` part comes from `alerts.application_name`.

use axum::http::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderName};

/// Builds alert headers for one application name
#[derive(Debug, Clone)]
pub struct AlertHeaders {
    application_name: String,
    alert: HeaderName,
    error: HeaderName,
    params: HeaderName,
}

impl AlertHeaders {
    /// Fails if `application_name` cannot appear in a header name.
    pub fn new(application_name: impl Into<String>) -> Result<Self, InvalidHeaderName> {
        let application_name = application_name.into();
        let name = |suffix: &str| {
            HeaderName::from_bytes(format!("x-{}-{}", application_name, suffix).as_bytes())
        };
        Ok(Self {
            alert: name("alert")?,
            error: name("error")?,
            params: name("params")?,
            application_name,
        })
    }

    pub fn application_name(&self) -> &str {
        &self.application_name
    }

    /// The alert, error and params header names, for CORS exposure
    pub fn header_names(&self) -> [HeaderName; 3] {
        [self.alert.clone(), self.error.clone(), self.params.clone()]
    }

    /// A new record of `entity` was stored under `id`
    pub fn created(&self, entity: &str, id: &str) -> HeaderMap {
        self.entity_alert(entity, "created", id)
    }

    /// The record `id` of `entity` was replaced
    pub fn updated(&self, entity: &str, id: &str) -> HeaderMap {
        self.entity_alert(entity, "updated", id)
    }

    /// The record `id` of `entity` was deleted (or never existed)
    pub fn deleted(&self, entity: &str, id: &str) -> HeaderMap {
        self.entity_alert(entity, "deleted", id)
    }

    /// A request on `entity` was rejected for `error_key`.
    ///
    /// `default_message` goes to the log only; clients translate the key.
    pub fn failure(&self, entity: &str, error_key: &str, default_message: &str) -> HeaderMap {
        tracing::error!(entity, error_key, "Entity processing failed, {}", default_message);
        self.headers(&self.error, &format!("error.{}", error_key), entity)
    }

    fn entity_alert(&self, entity: &str, action: &str, param: &str) -> HeaderMap {
        let message = format!("{}.{}.{}", self.application_name, entity, action);
        self.headers(&self.alert, &message, param)
    }

    fn headers(&self, name: &HeaderName, message: &str, param: &str) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(2);
        for (name, value) in [(name, message), (&self.params, param)] {
            match HeaderValue::from_str(value) {
                Ok(value) => {
                    headers.insert(name.clone(), value);
                }
                Err(_) => tracing::warn!(header = %name, value, "Dropping unencodable alert header"),
            }
        }
        headers
    }
}

impl Default for AlertHeaders {
    fn default() -> Self {
        Self {
            application_name: "reportcardApp".to_string(),
            alert: HeaderName::from_static("x-reportcardapp-alert"),
            error: HeaderName::from_static("x-reportcardapp-error"),
            params: HeaderName::from_static("x-reportcardapp-params"),
        }
    }
}
