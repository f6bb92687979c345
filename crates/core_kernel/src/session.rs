//! Keyed attribute store shared between a request handler and the data layer
//!
//! The certificate workflow reads the current customer and the submitted policy
//! from the caller's session, and publishes its results back into the same
//! store for the rendering step that follows. Values are held as JSON so any
//! serializable record can be published.

use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::CoreError;

/// Well-known attribute keys
pub mod keys {
    /// Customer currently signed in (set by the session layer)
    pub const CUSTOMER_ID: &str = "customerID";
    /// Policy submitted with the certificate request
    pub const POLICY_ID: &str = "policyID";
    /// Premium amount printed on the certificate
    pub const CERT_PREMIUM: &str = "CertPremium";
    /// Nominees printed on the certificate
    pub const CERT_NOMINEES: &str = "CertNominees";
    /// Computed certificate expiry date
    pub const CERT_END_DATE: &str = "CertEndDate";
    /// Policy the certificate was issued for
    pub const CERT_POLICY: &str = "CertPolicy";
}

/// A keyed attribute store
pub trait SessionStore {
    /// Returns the attribute stored under `key`
    fn get(&self, key: &str) -> Option<&Value>;

    /// Stores `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: Value);

    /// Returns the attribute as text
    ///
    /// Strings are returned as-is and numbers are rendered in decimal form.
    /// Any other JSON type yields `None`.
    fn get_text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Parses the attribute stored under `key`
    ///
    /// # Errors
    ///
    /// Returns `CoreError::MissingAttribute` if the key is absent, or the
    /// parser's error if the text does not parse.
    fn parse_attribute<T>(&self, key: &str) -> Result<T, CoreError>
    where
        T: FromStr<Err = CoreError>,
    {
        let text = self
            .get_text(key)
            .ok_or_else(|| CoreError::missing_attribute(key))?;
        text.parse()
    }
}

/// In-memory session store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySessionStore {
    attributes: HashMap<String, Value>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy when seeding a request
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    fn set(&mut self, key: &str, value: Value) {
        self.attributes.insert(key.to_string(), value);
    }
}
