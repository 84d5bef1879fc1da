// Tolerant deserializers for fields the backend encodes inconsistently.
//
// Unbacked boolean columns arrive as 0/1 or "1"/"0", decimal columns as
// strings, and optional text or collections sometimes as explicit null.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Accept `true`/`false`, `0`/`1`, `"0"`/`"1"`, `"true"`/`"false"` and null (false).
pub(crate) fn bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(b),
        Value::Number(n) => Ok(n.as_f64().is_some_and(|f| f != 0.0)),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "" | "0" | "false" | "no" | "off" => Ok(false),
            other => Err(de::Error::custom(format!("invalid boolean: {other:?}"))),
        },
        other => Err(de::Error::custom(format!("invalid boolean: {other}"))),
    }
}

/// Accept a number or a numeric string.
pub(crate) fn decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0.0),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| de::Error::custom("decimal out of range")),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid decimal: {s:?}"))),
        other => Err(de::Error::custom(format!("invalid decimal: {other}"))),
    }
}

/// Treat explicit null like a missing field.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "super::bool")]
        flag: bool,
        #[serde(deserialize_with = "super::decimal")]
        amount: f64,
        #[serde(default, deserialize_with = "super::null_default")]
        tags: Vec<String>,
    }

    #[test]
    fn accepts_laravel_encodings() {
        let row: Row =
            serde_json::from_str(r#"{"flag": 1, "amount": "25.50", "tags": null}"#).unwrap();
        assert!(row.flag);
        assert!((row.amount - 25.5).abs() < f64::EPSILON);
        assert!(row.tags.is_empty());

        let row: Row = serde_json::from_str(r#"{"flag": "0", "amount": 10}"#).unwrap();
        assert!(!row.flag);
    }

    #[test]
    fn rejects_nonsense_boolean() {
        assert!(serde_json::from_str::<Row>(r#"{"flag": "maybe", "amount": 0}"#).is_err());
    }
}
