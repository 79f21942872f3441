//! Property listing documents and write acknowledgements.

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Field names the server owns. Client payloads never set these.
pub const SERVER_ASSIGNED_FIELDS: [&str; 2] = ["_id", "createdAt"];

/// Store-assigned property identifier.
///
/// Wraps a document-store ObjectId and travels over the wire as its
/// 24-character hex form.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyId(pub ObjectId);

impl PropertyId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        PropertyId(ObjectId::new())
    }
}

/// Returned when a path segment is not a valid property identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid property id '{0}': expected a 24-character hex string")]
pub struct InvalidPropertyId(pub String);

impl FromStr for PropertyId {
    type Err = InvalidPropertyId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s)
            .map(PropertyId)
            .map_err(|_| InvalidPropertyId(s.to_string()))
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl From<ObjectId> for PropertyId {
    fn from(oid: ObjectId) -> Self {
        PropertyId(oid)
    }
}

impl From<PropertyId> for ObjectId {
    fn from(id: PropertyId) -> Self {
        id.0
    }
}

impl Serialize for PropertyId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PropertyId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Client-controlled property fields.
///
/// The known fields are typed; anything else the client sends is kept
/// verbatim in `extra`. A known field whose JSON type differs from the typed
/// slot (a string `price`, an object `location`) is kept in `extra` under its
/// own name, so decoding never rejects a document. A key lives in exactly one
/// of the two places.
///
/// Used both as the creation payload and as the partial-update patch, where
/// `None` means "leave untouched".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFields {
    /// Owner email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    /// Listing name, searched case-insensitively
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Unrecognized fields, and known fields of an unexpected type
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

const USER_EMAIL: &str = "userEmail";
const PROPERTY_NAME: &str = "propertyName";
const PRICE: &str = "price";
const CATEGORY: &str = "category";
const LOCATION: &str = "location";

impl<'de> Deserialize<'de> for PropertyFields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::<String, Value>::deserialize(deserializer).map(PropertyFields::from_map)
    }
}

/// Move `key` out of `map` when `extract` accepts its value.
///
/// Null is consumed as absent. Any other value `extract` rejects stays put.
fn take_typed<T>(
    map: &mut Map<String, Value>,
    key: &str,
    extract: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    let typed = match map.get(key)? {
        Value::Null => None,
        value => Some(extract(value)?),
    };
    map.remove(key);
    typed
}

fn as_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_owned)
}

impl PropertyFields {
    /// Split a JSON object into typed known fields and the rest.
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        Self {
            user_email: take_typed(&mut map, USER_EMAIL, as_string),
            property_name: take_typed(&mut map, PROPERTY_NAME, as_string),
            price: take_typed(&mut map, PRICE, Value::as_f64),
            category: take_typed(&mut map, CATEGORY, as_string),
            location: take_typed(&mut map, LOCATION, as_string),
            extra: map,
        }
    }

    /// Drop any server-assigned keys smuggled in through the extension map.
    pub fn without_server_fields(mut self) -> Self {
        for key in SERVER_ASSIGNED_FIELDS {
            self.extra.remove(key);
        }
        self
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.user_email.is_none()
            && self.property_name.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.location.is_none()
            && self.extra.is_empty()
    }

    /// Look up a field by its wire name, whichever slot holds it.
    pub fn get(&self, name: &str) -> Option<Value> {
        let typed = match name {
            USER_EMAIL => self.user_email.clone().map(Value::from),
            PROPERTY_NAME => self.property_name.clone().map(Value::from),
            PRICE => self.price.map(Value::from),
            CATEGORY => self.category.clone().map(Value::from),
            LOCATION => self.location.clone().map(Value::from),
            _ => None,
        };
        typed.or_else(|| self.extra.get(name).cloned())
    }

    fn clear_typed(&mut self, name: &str) {
        match name {
            USER_EMAIL => self.user_email = None,
            PROPERTY_NAME => self.property_name = None,
            PRICE => self.price = None,
            CATEGORY => self.category = None,
            LOCATION => self.location = None,
            _ => {}
        }
    }

    /// Overwrite every field that is set in `patch`, leaving the rest alone.
    ///
    /// Returns `true` if any stored value actually changed.
    pub fn merge(&mut self, patch: PropertyFields) -> bool {
        let before = self.clone();

        if patch.user_email.is_some() {
            self.extra.remove(USER_EMAIL);
            self.user_email = patch.user_email;
        }
        if patch.property_name.is_some() {
            self.extra.remove(PROPERTY_NAME);
            self.property_name = patch.property_name;
        }
        if patch.price.is_some() {
            self.extra.remove(PRICE);
            self.price = patch.price;
        }
        if patch.category.is_some() {
            self.extra.remove(CATEGORY);
            self.category = patch.category;
        }
        if patch.location.is_some() {
            self.extra.remove(LOCATION);
            self.location = patch.location;
        }
        for (key, value) in patch.extra {
            self.clear_typed(&key);
            self.extra.insert(key, value);
        }

        *self != before
    }
}

/// A stored property document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(rename = "_id")]
    pub id: PropertyId,
    #[serde(flatten)]
    pub fields: PropertyFields,
    /// Server-assigned insertion time
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// A property ready for insertion: client fields plus the server timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProperty {
    pub fields: PropertyFields,
    pub created_at: DateTime<Utc>,
}

/// Acknowledgement of an insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: PropertyId,
}

/// Acknowledgement of a delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// Acknowledgement of a merge-update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<PropertyId>,
}

impl UpdateAck {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_count: 0,
            upserted_id: None,
        }
    }
}
