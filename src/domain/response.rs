//! Structured Response
//!
//! Ordered key/value view over a decoded API payload. Fields can be read
//! by key (`get`, indexing) or by name (`attr`), which fails on a missing
//! key instead of yielding null. Nested JSON objects are wrapped into
//! [`Response`] when they are read, while typed values (countries and
//! discount tables) keep their own type.

use crate::domain::entities::{Country, Discounts};
use crate::domain::errors::{ParityVendError, Result};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::ops::Index;

/// One value inside a [`Response`].
#[derive(Clone)]
pub enum Field {
    /// Plain JSON as decoded. Objects stay raw until read through `attr`.
    Json(Value),
    /// A nested object already wrapped as a response.
    Object(Response),
    Country(Country),
    Discounts(Discounts),
}

impl Field {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Json(value) => value.as_str(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Json(value) => value.as_f64(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Json(value) => value.as_i64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Json(value) => value.as_bool(),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Json(Value::Null))
    }

    pub fn as_country(&self) -> Option<&Country> {
        match self {
            Self::Country(country) => Some(country),
            _ => None,
        }
    }

    pub fn as_discounts(&self) -> Option<&Discounts> {
        match self {
            Self::Discounts(discounts) => Some(discounts),
            _ => None,
        }
    }

    /// The field as a response, if it is object-shaped.
    pub fn to_response(&self) -> Option<Response> {
        match self {
            Self::Object(response) => Some(response.clone()),
            Self::Json(Value::Object(map)) => Some(Response::from_map(map.clone())),
            _ => None,
        }
    }

    /// Named access into an object-shaped field or a country.
    pub fn attr(&self, name: &str) -> Result<Field> {
        match self {
            Self::Object(response) => response.attr(name),
            Self::Json(Value::Object(map)) => map
                .get(name)
                .map(|value| wrap(Field::Json(value.clone())))
                .ok_or_else(|| missing(name)),
            Self::Country(country) => country
                .attr(name)
                .map(|value| Field::Json(Value::String(value.to_string()))),
            _ => Err(missing(name)),
        }
    }

    /// JSON form of the field, with typed values serialized.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Access-time wrapping: raw objects become responses, the rest is kept.
fn wrap(field: Field) -> Field {
    match field {
        Field::Json(Value::Object(map)) => Field::Object(Response::from_map(map)),
        other => other,
    }
}

fn missing(name: &str) -> ParityVendError {
    ParityVendError::MissingField(name.to_string())
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Json(a), Self::Json(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Json(Value::Object(map)), Self::Object(response))
            | (Self::Object(response), Self::Json(Value::Object(map))) => {
                *response == Response::from_map(map.clone())
            }
            (Self::Country(a), Self::Country(b)) => a == b,
            (Self::Discounts(a), Self::Discounts(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) => write!(f, "{}", value),
            Self::Object(response) => write!(f, "{:?}", response),
            Self::Country(country) => write!(f, "{:?}", country),
            Self::Discounts(discounts) => write!(f, "{:?}", discounts),
        }
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Json(value) => value.serialize(serializer),
            Self::Object(response) => response.serialize(serializer),
            Self::Country(country) => country.serialize(serializer),
            Self::Discounts(discounts) => discounts.serialize(serializer),
        }
    }
}

impl From<Value> for Field {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<Country> for Field {
    fn from(value: Country) -> Self {
        Self::Country(value)
    }
}

impl From<Discounts> for Field {
    fn from(value: Discounts) -> Self {
        Self::Discounts(value)
    }
}

impl From<Response> for Field {
    fn from(value: Response) -> Self {
        Self::Object(value)
    }
}

/// Decoded API payload with keyed and named access.
///
/// Keys keep the payload's order, then insertion order. Equality ignores
/// order, like a plain mapping.
#[derive(Clone, Default)]
pub struct Response {
    entries: Vec<(String, Field)>,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self {
            entries: map
                .into_iter()
                .map(|(key, value)| (key, Field::Json(value)))
                .collect(),
        }
    }

    /// Wrap a decoded value; only JSON objects qualify.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(ParityVendError::Api(format!(
                "expected a JSON object, got: {}",
                other
            ))),
        }
    }

    /// Keyed lookup returning the stored field.
    pub fn get(&self, key: &str) -> Option<&Field> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, field)| field)
    }

    /// Named lookup. Nested objects come back wrapped as responses and a
    /// missing key is an error.
    pub fn attr(&self, name: &str) -> Result<Field> {
        self.get(name)
            .cloned()
            .map(wrap)
            .ok_or_else(|| missing(name))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace a field, keeping the original position on replace.
    pub fn insert(&mut self, key: impl Into<String>, field: impl Into<Field>) -> Option<Field> {
        let key = key.into();
        let field = field.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, field)),
            None => {
                self.entries.push((key, field));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Field> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.entries.iter().map(|(key, field)| (key.as_str(), field))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `status` field (`"ok"` or `"error"`).
    pub fn status(&self) -> Option<&str> {
        self.get("status").and_then(Field::as_str)
    }

    pub fn is_ok(&self) -> bool {
        self.status() == Some("ok")
    }

    pub fn error_name(&self) -> Option<&str> {
        self.get("error_name").and_then(Field::as_str)
    }

    /// JSON form of the whole response.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl From<Map<String, Value>> for Response {
    fn from(map: Map<String, Value>) -> Self {
        Self::from_map(map)
    }
}

impl PartialEq for Response {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, field)| other.get(key).is_some_and(|theirs| theirs == field))
    }
}

impl Index<&str> for Response {
    type Output = Field;

    fn index(&self, key: &str) -> &Field {
        match self.get(key) {
            Some(field) => field,
            None => panic!("response has no field {:?}", key),
        }
    }
}

impl Serialize for Response {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, field) in &self.entries {
            map.serialize_entry(key, field)?;
        }
        map.end()
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Response(")?;
        f.debug_map().entries(self.iter()).finish()?;
        write!(f, ")")
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "Response({})", json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: Value) -> Response {
        Response::from_value(value).unwrap()
    }

    #[test]
    fn test_keyed_and_named_access_agree() {
        let r = response(json!({"foo": "bar"}));

        assert_eq!(r.attr("foo").unwrap(), r["foo"]);
        assert_eq!(r.attr("foo").unwrap().as_str(), Some("bar"));
        assert_eq!(r.get("foo").and_then(Field::as_str), Some("bar"));
    }

    #[test]
    fn test_missing_attr_is_an_error() {
        let r = response(json!({"foo": "bar"}));

        assert!(matches!(r.attr("blah"), Err(ParityVendError::MissingField(name)) if name == "blah"));
        assert!(r.get("blah").is_none());
    }

    #[test]
    #[should_panic(expected = "response has no field")]
    fn test_index_missing_panics() {
        let r = response(json!({"foo": "bar"}));
        let _ = &r["blah"];
    }

    #[test]
    fn test_nested_objects_wrapped_on_access() {
        let r = response(json!({"foo": {"bar": "baz"}, "ham": "eggs"}));

        let nested = r.attr("foo").unwrap();
        assert!(matches!(nested, Field::Object(_)));
        assert_eq!(nested, Field::Json(json!({"bar": "baz"})));
        assert_eq!(nested.attr("bar").unwrap().as_str(), Some("baz"));
        assert!(matches!(nested.attr("blah"), Err(ParityVendError::MissingField(_))));

        // Stored form is untouched until read by name.
        assert!(matches!(r["foo"], Field::Json(Value::Object(_))));
    }

    #[test]
    fn test_deeply_nested_access() {
        let r = response(json!({"a": {"b": {"c": 1}}}));
        let c = r.attr("a").unwrap().attr("b").unwrap().attr("c").unwrap();
        assert_eq!(c.as_i64(), Some(1));
    }

    #[test]
    fn test_items_keep_insertion_order() {
        let mut r = Response::new();
        r.insert("status", json!("ok"));
        r.insert("discount", json!(0.4));
        r.insert("coupon_code", json!("example_coupon"));

        let keys: Vec<_> = r.keys().collect();
        assert_eq!(keys, vec!["status", "discount", "coupon_code"]);

        r.insert("status", json!("error"));
        let keys: Vec<_> = r.keys().collect();
        assert_eq!(keys, vec!["status", "discount", "coupon_code"]);
        assert_eq!(r.status(), Some("error"));
    }

    #[test]
    fn test_decoded_payload_keeps_api_order() {
        use crate::adapters::outbound::SerdeJsonDecoder;
        use crate::domain::ports::JsonDecoder;

        let body = r#"{"status": "ok", "discount": 0.4, "discount_str": "40.00%",
            "coupon_code": "example_coupon", "country": {"code": "VE"},
            "currency": {"symbol": "Bs.", "code": "VES"}}"#;
        let r = Response::from_value(SerdeJsonDecoder.decode(body).unwrap()).unwrap();

        let keys: Vec<_> = r.keys().collect();
        assert_eq!(
            keys,
            vec!["status", "discount", "discount_str", "coupon_code", "country", "currency"]
        );
        let currency = r.attr("currency").unwrap();
        let nested = currency.to_response().unwrap();
        assert_eq!(nested.keys().collect::<Vec<_>>(), vec!["symbol", "code"]);
    }

    #[test]
    fn test_discounts_not_rewrapped() {
        let Value::Object(raw) = json!({"ZW": ["example_coupon", 0.7]}) else {
            unreachable!()
        };
        let mut r = response(json!({"status": "ok"}));
        r.insert("discounts", Discounts::from_raw(&raw).unwrap());

        let field = r.attr("discounts").unwrap();
        let discounts = field.as_discounts().unwrap();
        assert_eq!(discounts.get("ZW").unwrap().discount_str, "70.00%");
    }

    #[test]
    fn test_country_field_attr() {
        let mut r = response(json!({"status": "ok"}));
        r.insert("country", Country::new("VE").unwrap());

        let country = r.attr("country").unwrap();
        assert_eq!(country.as_country().map(Country::code), Some("VE"));
        assert_eq!(country.attr("name").unwrap().as_str(), Some("Venezuela"));
    }

    #[test]
    fn test_equality_ignores_order() {
        let a = response(json!({"foo": 1, "bar": 2}));
        let mut b = Response::new();
        b.insert("bar", json!(2));
        b.insert("foo", json!(1));

        assert_eq!(a, b);
        b.remove("foo");
        assert_ne!(a, b);
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(Response::from_value(json!([1, 2])).is_err());
        assert!(Response::from_value(json!("text")).is_err());
    }

    #[test]
    fn test_status_helpers() {
        let ok = response(json!({"status": "ok"}));
        let err = response(json!({"status": "error", "error_name": "not_identified"}));

        assert!(ok.is_ok());
        assert!(!err.is_ok());
        assert_eq!(err.error_name(), Some("not_identified"));
    }

    #[test]
    fn test_serialization_and_display() {
        let mut r = response(json!({"status": "ok"}));
        r.insert("country", Country::new("CH").unwrap());

        let value = r.to_value();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["country"]["code"], "CH");

        let shown = r.to_string();
        assert!(shown.starts_with("Response({"));
        assert!(format!("{:?}", r).contains("Country('CH')"));
    }
}
