//! Domain Entities - Core business objects
//!
//! Countries and the discounts configured for them. These carry no I/O and
//! no reference back to the client that produced them.

use crate::domain::countries::{self, CountryRecord, UNKNOWN_COUNTRY_CODE};
use crate::domain::errors::{ParityVendError, Result};
use serde::ser::{SerializeStruct, SerializeTuple};
use serde::{Serialize, Serializer};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A country from the static registry.
///
/// Equality, ordering and hashing use the ISO code only. Instances are
/// cheap handles onto the process-wide registry.
#[derive(Clone, Copy)]
pub struct Country {
    record: &'static CountryRecord,
}

impl Country {
    /// Look up a country by code, case-insensitively. Accepts `&str`,
    /// `String` or raw bytes.
    pub fn new(code: impl AsRef<[u8]>) -> Result<Self> {
        let raw = code.as_ref();
        let invalid = || {
            ParityVendError::Validation(format!(
                "invalid country code \"{}\"",
                String::from_utf8_lossy(raw)
            ))
        };
        let code = std::str::from_utf8(raw).map_err(|_| invalid())?;
        countries::lookup(&code.to_uppercase())
            .map(|record| Self { record })
            .ok_or_else(invalid)
    }

    /// Every country in the registry, ordered by code.
    pub fn all() -> impl Iterator<Item = Country> {
        countries::countries()
            .values()
            .map(|record| Country { record })
    }

    pub fn code(&self) -> &'static str {
        self.record.code
    }

    pub fn name(&self) -> &'static str {
        self.record.name
    }

    pub fn emoji_flag(&self) -> &'static str {
        let record: &'static CountryRecord = self.record;
        &record.emoji_flag
    }

    pub fn currency_code(&self) -> &'static str {
        self.record.currency_code
    }

    pub fn currency_symbol(&self) -> &'static str {
        self.record.currency_symbol
    }

    pub fn currency_localized(&self) -> &'static str {
        let record: &'static CountryRecord = self.record;
        &record.currency_localized
    }

    /// Whether this is the placeholder used for unidentified visitors.
    pub fn is_unknown(&self) -> bool {
        self.record.code == UNKNOWN_COUNTRY_CODE
    }

    /// Field lookup by name, mirroring the keyed view of a response.
    pub fn get(&self, field: &str) -> Option<&'static str> {
        match field {
            "code" => Some(self.code()),
            "name" => Some(self.name()),
            "emoji_flag" => Some(self.emoji_flag()),
            "currency_code" => Some(self.currency_code()),
            "currency_symbol" => Some(self.currency_symbol()),
            "currency_localized" => Some(self.currency_localized()),
            _ => None,
        }
    }

    /// Like [`Country::get`], but a missing field is an error.
    pub fn attr(&self, field: &str) -> Result<&'static str> {
        self.get(field)
            .ok_or_else(|| ParityVendError::MissingField(field.to_string()))
    }
}

/// Registry lookup that normalizes case and bytes, returning `None` for
/// unknown codes.
pub fn get_country_by_code(code: impl AsRef<[u8]>) -> Option<Country> {
    Country::new(code).ok()
}

impl PartialEq for Country {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

impl Eq for Country {}

impl PartialOrd for Country {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Country {
    fn cmp(&self, other: &Self) -> Ordering {
        self.code().cmp(other.code())
    }
}

impl Hash for Country {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code().hash(state);
    }
}

impl fmt::Debug for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Country('{}')", self.code())
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Country {} ({})", self.name(), self.code())
    }
}

impl Serialize for Country {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Country", 6)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("emoji_flag", self.emoji_flag())?;
        state.serialize_field("currency_code", self.currency_code())?;
        state.serialize_field("currency_symbol", self.currency_symbol())?;
        state.serialize_field("currency_localized", self.currency_localized())?;
        state.end()
    }
}

/// Anything a country can be looked up by.
#[derive(Debug, Clone, Copy)]
pub enum CountryKey<'a> {
    Country(Country),
    Code(&'a str),
    Bytes(&'a [u8]),
}

impl CountryKey<'_> {
    /// Uppercase code, or `None` for undecodable bytes.
    fn normalized(&self) -> Option<String> {
        match self {
            Self::Country(country) => Some(country.code().to_string()),
            Self::Code(code) => Some(code.to_uppercase()),
            Self::Bytes(bytes) => std::str::from_utf8(bytes).ok().map(str::to_uppercase),
        }
    }
}

impl From<Country> for CountryKey<'_> {
    fn from(value: Country) -> Self {
        Self::Country(value)
    }
}

impl From<&Country> for CountryKey<'_> {
    fn from(value: &Country) -> Self {
        Self::Country(*value)
    }
}

impl<'a> From<&'a str> for CountryKey<'a> {
    fn from(value: &'a str) -> Self {
        Self::Code(value)
    }
}

impl<'a> From<&'a String> for CountryKey<'a> {
    fn from(value: &'a String) -> Self {
        Self::Code(value.as_str())
    }
}

impl<'a> From<&'a [u8]> for CountryKey<'a> {
    fn from(value: &'a [u8]) -> Self {
        Self::Bytes(value)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for CountryKey<'a> {
    fn from(value: &'a [u8; N]) -> Self {
        Self::Bytes(value.as_slice())
    }
}

/// The `(coupon_code, ratio)` pair the API sends per country.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDiscount {
    pub coupon_code: String,
    pub discount: f64,
}

impl RawDiscount {
    pub fn new(coupon_code: impl Into<String>, discount: f64) -> Self {
        Self {
            coupon_code: coupon_code.into(),
            discount,
        }
    }

    /// Parse the `[coupon, ratio]` array form. A null coupon means none.
    pub fn from_value(value: &Value) -> Result<Self> {
        let malformed = || ParityVendError::Api(format!("malformed discount entry: {}", value));
        let pair = value.as_array().filter(|a| a.len() == 2).ok_or_else(malformed)?;
        let coupon_code = match &pair[0] {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            _ => return Err(malformed()),
        };
        let discount = pair[1].as_f64().ok_or_else(malformed)?;
        Ok(Self::new(coupon_code, discount))
    }
}

impl Serialize for RawDiscount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.coupon_code)?;
        tuple.serialize_element(&self.discount)?;
        tuple.end()
    }
}

/// The markdown configured for one country.
///
/// Equality and ordering use the country code only.
#[derive(Clone, Serialize)]
pub struct Discount {
    pub discount: f64,
    pub discount_str: String,
    pub coupon_code: String,
    pub country: Country,
    pub raw_discount: Option<RawDiscount>,
}

impl Discount {
    /// Build from the raw pair; no pair means no discount and no coupon.
    pub fn new(country: Country, raw_discount: Option<RawDiscount>) -> Self {
        let (discount, coupon_code) = match &raw_discount {
            Some(raw) => (raw.discount, raw.coupon_code.clone()),
            None => (0.0, String::new()),
        };
        Self {
            discount,
            discount_str: format_ratio(discount),
            coupon_code,
            country,
            raw_discount,
        }
    }

    pub fn has_coupon(&self) -> bool {
        !self.coupon_code.is_empty()
    }
}

/// Render a ratio as a percentage with two decimals (`0.4` -> `40.00%`).
pub fn format_ratio(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

impl PartialEq for Discount {
    fn eq(&self, other: &Self) -> bool {
        self.country == other.country
    }
}

impl Eq for Discount {}

impl PartialOrd for Discount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Discount {
    fn cmp(&self, other: &Self) -> Ordering {
        self.country.cmp(&other.country)
    }
}

impl fmt::Debug for Discount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Discount({:?}, '{}', {:?})",
            self.country, self.coupon_code, self.discount
        )
    }
}

/// All discounts of a project, keyed by uppercase country code in the
/// order the API listed them.
#[derive(Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Discounts {
    discounts: IndexMap<String, Discount>,
}

impl Discounts {
    /// Build from the raw `code -> [coupon, ratio]` mapping.
    pub fn from_raw(raw_discounts: &Map<String, Value>) -> Result<Self> {
        let mut discounts = IndexMap::with_capacity(raw_discounts.len());
        for (code, value) in raw_discounts {
            let country = Country::new(code)?;
            let raw = RawDiscount::from_value(value)?;
            discounts.insert(country.code().to_string(), Discount::new(country, Some(raw)));
        }
        Ok(Self { discounts })
    }

    /// Lookup by [`Country`], code string or code bytes.
    pub fn get_discount_by_country<'a>(&self, country: impl Into<CountryKey<'a>>) -> Option<&Discount> {
        let code = country.into().normalized()?;
        self.discounts.get(&code)
    }

    /// Lookup by exact (uppercase) code.
    pub fn get(&self, code: &str) -> Option<&Discount> {
        self.discounts.get(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Discount)> {
        self.discounts.iter().map(|(code, discount)| (code.as_str(), discount))
    }

    pub fn len(&self) -> usize {
        self.discounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discounts.is_empty()
    }
}

impl fmt::Debug for Discounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Discounts({:?})", self.discounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ===== Country Tests =====

    #[test]
    fn test_country_metadata() {
        let us = Country::new("US").unwrap();

        assert_eq!(us.code(), "US");
        assert_eq!(us.name(), "United States of America");
        assert_eq!(us.emoji_flag(), "🇺🇸");
        assert_eq!(us.currency_code(), "USD");
        assert_eq!(us.currency_symbol(), "$");
        assert_eq!(us.currency_localized(), "USD$");
        assert_eq!(format!("{:?}", us), "Country('US')");
        assert_eq!(us.to_string(), "Country United States of America (US)");
    }

    #[test]
    fn test_country_case_and_bytes_agree() {
        let us = Country::new("US").unwrap();

        assert_eq!(us, Country::new("us").unwrap());
        assert_eq!(us, Country::new(b"US").unwrap());
        assert_eq!(us, Country::new(String::from("uS")).unwrap());
        assert_eq!(Some(us), get_country_by_code("us"));
        assert_eq!(Some(us), get_country_by_code(b"US"));
        assert_ne!(us, Country::new("CA").unwrap());
    }

    #[test]
    fn test_every_registry_code_round_trips() {
        for country in Country::all() {
            let code = country.code();
            let lower = code.to_lowercase();
            assert_eq!(Country::new(code).unwrap(), country);
            assert_eq!(Country::new(&lower).unwrap(), country);
            assert_eq!(Country::new(code.as_bytes()).unwrap(), country);
        }
    }

    #[test]
    fn test_country_invalid_code() {
        assert!(matches!(Country::new("11"), Err(ParityVendError::Validation(_))));
        assert!(matches!(Country::new([0xffu8, 0xfe]), Err(ParityVendError::Validation(_))));
        assert!(get_country_by_code("QQ").is_none());
    }

    #[test]
    fn test_country_ordering() {
        let mut countries = vec![
            Country::new("US").unwrap(),
            Country::new("UA").unwrap(),
            Country::new("AU").unwrap(),
        ];
        countries.sort();

        let codes: Vec<_> = countries.iter().map(Country::code).collect();
        assert_eq!(codes, vec!["AU", "UA", "US"]);
    }

    #[test]
    fn test_country_attr() {
        let ve = Country::new("VE").unwrap();
        assert_eq!(ve.attr("currency_code").unwrap(), "VES");
        assert!(matches!(ve.attr("blah"), Err(ParityVendError::MissingField(_))));
    }

    #[test]
    fn test_country_serializes_as_mapping() {
        let value = serde_json::to_value(Country::new("CH").unwrap()).unwrap();
        assert_eq!(value["code"], "CH");
        assert_eq!(value["currency_localized"], "CHF");
    }

    // ===== Discount Tests =====

    #[test]
    fn test_format_ratio() {
        assert_eq!(format_ratio(0.4), "40.00%");
        assert_eq!(format_ratio(0.0), "0.00%");
        assert_eq!(format_ratio(0.7), "70.00%");
        assert_eq!(format_ratio(0.125), "12.50%");
    }

    #[test]
    fn test_discount_without_raw() {
        let discount = Discount::new(Country::new("AC").unwrap(), None);

        assert_eq!(discount.discount, 0.0);
        assert_eq!(discount.discount_str, "0.00%");
        assert_eq!(discount.coupon_code, "");
        assert!(!discount.has_coupon());
    }

    #[test]
    fn test_discount_equality_by_country() {
        let zw = Country::new("ZW").unwrap();
        let a = Discount::new(zw, Some(RawDiscount::new("a", 0.1)));
        let b = Discount::new(zw, Some(RawDiscount::new("b", 0.9)));
        let sv = Discount::new(Country::new("SV").unwrap(), None);

        assert_eq!(a, b);
        assert!(sv < a);
        assert_eq!(format!("{:?}", a), "Discount(Country('ZW'), 'a', 0.1)");
    }

    #[test]
    fn test_raw_discount_from_value() {
        let raw = RawDiscount::from_value(&json!(["example_coupon", 0.7])).unwrap();
        assert_eq!(raw, RawDiscount::new("example_coupon", 0.7));

        let raw = RawDiscount::from_value(&json!([null, 0.0])).unwrap();
        assert_eq!(raw.coupon_code, "");

        assert!(RawDiscount::from_value(&json!({"coupon": "x"})).is_err());
        assert!(RawDiscount::from_value(&json!(["x", "y"])).is_err());
    }

    // ===== Discounts Tests =====

    fn sample_discounts() -> Discounts {
        let Value::Object(raw) = json!({
            "AC": ["", 0.0],
            "ZW": ["example_coupon", 0.7],
            "SV": ["example_coupon", 0.5]
        }) else {
            unreachable!()
        };
        Discounts::from_raw(&raw).unwrap()
    }

    #[test]
    fn test_discounts_from_raw() {
        let discounts = sample_discounts();

        assert_eq!(discounts.len(), 3);
        let zw = discounts.get("ZW").unwrap();
        assert_eq!(zw.discount, 0.7);
        assert_eq!(zw.discount_str, "70.00%");
        assert_eq!(zw.coupon_code, "example_coupon");
        assert_eq!(zw.country, Country::new("ZW").unwrap());
        assert_eq!(zw.raw_discount, Some(RawDiscount::new("example_coupon", 0.7)));

        let ac = discounts.get("AC").unwrap();
        assert_eq!(ac.discount_str, "0.00%");
        assert_eq!(ac.coupon_code, "");
    }

    #[test]
    fn test_discounts_lookup_variants() {
        let discounts = sample_discounts();
        let sv = Country::new("SV").unwrap();

        assert_eq!(discounts.get_discount_by_country(sv), discounts.get("SV"));
        assert_eq!(discounts.get_discount_by_country(&sv), discounts.get("SV"));
        assert_eq!(discounts.get_discount_by_country("zw"), discounts.get("ZW"));
        assert_eq!(discounts.get_discount_by_country(b"ac"), discounts.get("AC"));
        assert!(discounts.get_discount_by_country("US").is_none());
    }

    #[test]
    fn test_discounts_reject_unknown_country() {
        let Value::Object(raw) = json!({"QQ": ["", 0.1]}) else {
            unreachable!()
        };
        assert!(matches!(Discounts::from_raw(&raw), Err(ParityVendError::Validation(_))));
    }

    #[test]
    fn test_discounts_keep_api_order() {
        let discounts = sample_discounts();
        let codes: Vec<_> = discounts.iter().map(|(code, _)| code).collect();
        assert_eq!(codes, vec!["AC", "ZW", "SV"]);
    }
}
