//! Deserializers for numeric fields the API sometimes sends as strings.
//!
//! Order line items carry `price` and `quantity` as either JSON numbers or
//! numeric strings depending on which endpoint produced them.

use serde::de::{Deserializer, Error};
use serde::Deserialize;

use crate::money::Money;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Int(i64),
    Float(f64),
    Text(String),
}

impl NumberOrText {
    fn into_i64<E: Error>(self) -> Result<i64, E> {
        match self {
            NumberOrText::Int(n) => Ok(n),
            NumberOrText::Float(f) => float_to_i64(f),
            NumberOrText::Text(s) => {
                let s = s.trim();
                match s.parse::<i64>() {
                    Ok(n) => Ok(n),
                    Err(_) => s
                        .parse::<f64>()
                        .map_err(|_| E::custom(format!("expected a number, got {s:?}")))
                        .and_then(float_to_i64),
                }
            }
        }
    }
}

fn float_to_i64<E: Error>(f: f64) -> Result<i64, E> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Ok(f as i64)
    } else {
        Err(E::custom(format!("expected a whole number, got {f}")))
    }
}

pub(crate) fn money<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
    NumberOrText::deserialize(deserializer)?
        .into_i64()
        .map(Money::from_units)
}

pub(crate) fn opt_money<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Money>, D::Error> {
    match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(value) => value.into_i64().map(|n| Some(Money::from_units(n))),
        None => Ok(None),
    }
}

pub(crate) fn quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let n = NumberOrText::deserialize(deserializer)?.into_i64()?;
    u32::try_from(n).map_err(|_| D::Error::custom(format!("quantity out of range: {n}")))
}

/// Contact numbers: JSON number, digit string, empty string or null.
pub(crate) fn opt_contact<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u64>, D::Error> {
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(value) => {
            let n = value.into_i64()?;
            u64::try_from(n)
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid contact number: {n}")))
        }
    }
}

pub(crate) fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        None => String::new(),
        Some(NumberOrText::Int(n)) => n.to_string(),
        Some(NumberOrText::Float(f)) => f.to_string(),
        Some(NumberOrText::Text(s)) => s,
    })
}
