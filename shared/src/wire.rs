//! Wire normalization
//!
//! The catalog API is loose about scalar encodings: booleans arrive as
//! `1`/`"1"`, decimal columns as strings, counts sometimes quoted. These
//! deserializers coerce everything into the canonical model at ingestion so
//! nothing downstream ever sees a raw wire value.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::str::FromStr;

/// Legacy SQL timestamp layout (`2024-05-01 13:45:00`), read as UTC
const SQL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawFlag {
    fn is_truthy(&self) -> bool {
        match self {
            RawFlag::Bool(b) => *b,
            RawFlag::Int(n) => *n != 0,
            RawFlag::Float(f) => *f != 0.0,
            RawFlag::Text(s) => {
                let s = s.trim();
                s == "1" || s.eq_ignore_ascii_case("true")
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
}

/// Coerce an availability flag into a real boolean.
///
/// `null`, unknown strings and (with `#[serde(default)]`) a missing field
/// all read as `false`.
pub fn availability<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawFlag>::deserialize(deserializer)?.is_some_and(|raw| raw.is_truthy()))
}

/// Parse a non-negative price from a JSON number or a numeric string.
pub fn price<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match RawNumber::deserialize(deserializer)? {
        RawNumber::Unsigned(n) => Decimal::from(n),
        RawNumber::Signed(n) => Decimal::from(n),
        RawNumber::Float(f) => Decimal::try_from(f).map_err(de::Error::custom)?,
        RawNumber::Text(s) => Decimal::from_str(s.trim())
            .map_err(|e| de::Error::custom(format!("invalid price {s:?}: {e}")))?,
    };

    if value.is_sign_negative() && !value.is_zero() {
        return Err(de::Error::custom(format!("negative price {value}")));
    }
    Ok(value)
}

/// Parse an unsigned count from an integer or a numeric string.
pub fn count<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let raw = match RawNumber::deserialize(deserializer)? {
        RawNumber::Unsigned(n) => n,
        RawNumber::Signed(n) => {
            u64::try_from(n).map_err(|_| de::Error::custom(format!("negative count {n}")))?
        }
        RawNumber::Float(f) if f >= 0.0 && f.fract() == 0.0 => f as u64,
        RawNumber::Float(f) => return Err(de::Error::custom(format!("invalid count {f}"))),
        RawNumber::Text(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|e| de::Error::custom(format!("invalid count {s:?}: {e}")))?,
    };
    T::try_from(raw).map_err(|_| de::Error::custom(format!("count {raw} out of range")))
}

/// Read an optional string, turning `null` into the empty string.
pub fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read an optional timestamp. Unparseable values become `None`.
pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.and_then(|s| parse_timestamp(&s)))
}

/// Parse RFC 3339 or the legacy SQL datetime layout.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, SQL_DATETIME_FORMAT)
                .ok()
                .map(|naive| naive.and_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Flag {
        #[serde(default, deserialize_with = "availability")]
        available: bool,
    }

    #[derive(Debug, Deserialize)]
    struct Priced {
        #[serde(deserialize_with = "price")]
        price: Decimal,
    }

    #[derive(Debug, Deserialize)]
    struct Counted {
        #[serde(deserialize_with = "count")]
        stock: u32,
    }

    fn flag(value: serde_json::Value) -> bool {
        serde_json::from_value::<Flag>(value).unwrap().available
    }

    #[test]
    fn test_truthy_availability_encodings() {
        assert!(flag(json!({ "available": 1 })));
        assert!(flag(json!({ "available": "1" })));
        assert!(flag(json!({ "available": true })));
        assert!(flag(json!({ "available": "TRUE" })));
    }

    #[test]
    fn test_falsy_availability_encodings() {
        assert!(!flag(json!({ "available": 0 })));
        assert!(!flag(json!({ "available": "0" })));
        assert!(!flag(json!({ "available": false })));
        assert!(!flag(json!({ "available": null })));
        assert!(!flag(json!({})));
        assert!(!flag(json!({ "available": "yes please" })));
    }

    #[test]
    fn test_price_from_string_and_number() {
        let p: Priced = serde_json::from_value(json!({ "price": "1200.50" })).unwrap();
        assert_eq!(p.price, Decimal::new(120050, 2));

        let p: Priced = serde_json::from_value(json!({ "price": 25 })).unwrap();
        assert_eq!(p.price, Decimal::from(25));

        let p: Priced = serde_json::from_value(json!({ "price": 19.99 })).unwrap();
        assert_eq!(p.price, Decimal::new(1999, 2));
    }

    #[test]
    fn test_price_rejects_negative_and_garbage() {
        assert!(serde_json::from_value::<Priced>(json!({ "price": -1 })).is_err());
        assert!(serde_json::from_value::<Priced>(json!({ "price": "abc" })).is_err());
    }

    #[test]
    fn test_count_accepts_quoted_integers() {
        let c: Counted = serde_json::from_value(json!({ "stock": "42" })).unwrap();
        assert_eq!(c.stock, 42);
        assert!(serde_json::from_value::<Counted>(json!({ "stock": -3 })).is_err());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let rfc = parse_timestamp("2024-05-01T13:45:00.000000Z").unwrap();
        let sql = parse_timestamp("2024-05-01 13:45:00").unwrap();
        assert_eq!(rfc, sql);
        assert!(parse_timestamp("yesterday").is_none());
    }
}
