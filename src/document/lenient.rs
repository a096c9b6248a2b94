//! Permissive field readers for stored documents
//!
//! Stored state is read forgivingly: wrong types and nulls fall back to a
//! default instead of failing the whole document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::Nutrition;
use crate::nutrition::with_kcal;

/// Numeric value of a JSON number or numeric string
pub(crate) fn as_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// Any value; non-numeric becomes 0
pub(crate) fn number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(as_number(&v).unwrap_or(0.0))
}

/// Any value; non-numeric becomes `None`
pub(crate) fn opt_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(as_number(&v))
}

/// Strings as-is, numbers stringified, anything else empty
pub(crate) fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(match v {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// `T` if the value fits, `T::default()` otherwise
pub(crate) fn or_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let v = Value::deserialize(d)?;
    Ok(serde_json::from_value(v).unwrap_or_default())
}

/// Stored per-100 profile; `kcal` is derived when missing
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct Per100Record {
    #[serde(deserialize_with = "number")]
    protein: f64,
    #[serde(deserialize_with = "number")]
    fat: f64,
    #[serde(deserialize_with = "number")]
    sat_fat: f64,
    #[serde(deserialize_with = "number")]
    carbs: f64,
    #[serde(deserialize_with = "number")]
    sugar: f64,
    #[serde(deserialize_with = "number")]
    fiber: f64,
    #[serde(deserialize_with = "number")]
    salt: f64,
    #[serde(deserialize_with = "opt_number")]
    kcal: Option<f64>,
}

impl Per100Record {
    pub(crate) fn into_profile(self) -> Nutrition {
        let profile = Nutrition {
            kcal: 0.0,
            protein: self.protein,
            fat: self.fat,
            sat_fat: self.sat_fat,
            carbs: self.carbs,
            sugar: self.sugar,
            fiber: self.fiber,
            salt: self.salt,
        }
        .sanitized();
        with_kcal(profile, self.kcal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Sample {
        #[serde(deserialize_with = "number")]
        amount: f64,
        #[serde(deserialize_with = "opt_number")]
        order: Option<f64>,
        #[serde(deserialize_with = "string")]
        id: String,
        #[serde(deserialize_with = "or_default")]
        tags: Vec<String>,
    }

    #[test]
    fn test_coerces_bad_values() {
        let s: Sample = serde_json::from_value(json!({
            "amount": "12.5",
            "order": null,
            "id": 42,
            "tags": "not-a-list"
        }))
        .unwrap();
        assert_eq!(s.amount, 12.5);
        assert_eq!(s.order, None);
        assert_eq!(s.id, "42");
        assert!(s.tags.is_empty());
    }

    #[test]
    fn test_missing_fields_default() {
        let s: Sample = serde_json::from_value(json!({})).unwrap();
        assert_eq!(s.amount, 0.0);
        assert_eq!(s.order, None);
        assert_eq!(s.id, "");
    }

    #[test]
    fn test_per100_derives_missing_kcal() {
        let rec: Per100Record = serde_json::from_value(json!({
            "protein": 3.4, "fat": 3.6, "carbs": 4.8, "sugar": "4.8", "salt": null
        }))
        .unwrap();
        let p = rec.into_profile();
        assert_eq!(p.kcal, 65.2);
        assert_eq!(p.sugar, 4.8);
        assert_eq!(p.salt, 0.0);

        let rec: Per100Record = serde_json::from_value(json!({"protein": 1, "kcal": 50})).unwrap();
        assert_eq!(rec.into_profile().kcal, 50.0);
    }

    #[test]
    fn test_as_number() {
        assert_eq!(as_number(&json!(3)), Some(3.0));
        assert_eq!(as_number(&json!("x")), None);
        assert_eq!(as_number(&json!(true)), None);
    }
}
