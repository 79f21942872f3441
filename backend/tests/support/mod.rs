//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, TimeZone, Utc};
use homenest::db::repositories::LocalRepository;
use homenest::models::{Property, PropertyFields, PropertyId};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Access is serialized across tests and the previous values come back
/// even if `f` panics. `None` removes the variable.
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _restore = EnvRestore::apply(changes);
    f()
}

struct EnvRestore {
    previous: HashMap<String, Option<String>>,
}

impl EnvRestore {
    fn apply(changes: &[(&str, Option<&str>)]) -> Self {
        let mut previous = HashMap::new();
        for (key, value) in changes {
            previous
                .entry(key.to_string())
                .or_insert_with(|| std::env::var(key).ok());
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
        Self { previous }
    }
}

impl Drop for EnvRestore {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain() {
            match value {
                Some(v) => std::env::set_var(&key, v),
                None => std::env::remove_var(&key),
            }
        }
    }
}

/// Listing fields with the common attributes set.
pub fn listing(name: &str, email: &str, price: f64) -> PropertyFields {
    PropertyFields {
        user_email: Some(email.to_string()),
        property_name: Some(name.to_string()),
        price: Some(price),
        category: Some("House".to_string()),
        location: Some("Dhaka".to_string()),
        ..Default::default()
    }
}

/// Fixed base instant so orderings are deterministic.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

/// A stored property created `minutes_after` the base time.
pub fn stored(fields: PropertyFields, minutes_after: i64) -> Property {
    Property {
        id: PropertyId::generate(),
        fields,
        created_at: base_time() + Duration::minutes(minutes_after),
    }
}

/// Repository pre-seeded with `properties`.
pub fn seeded_repo(properties: impl IntoIterator<Item = Property>) -> LocalRepository {
    let repo = LocalRepository::new();
    for property in properties {
        repo.seed(property);
    }
    repo
}
