use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;
use tracing::warn;

pub(super) mod account;
pub(super) mod client;
pub(super) mod earning;
pub(super) mod expense;
pub(super) mod project;
pub(super) mod record;
pub(super) mod settings;
pub(super) mod summary;

/// Bucket for records whose documents carry no category.
pub(crate) const UNCATEGORIZED: &str = "Uncategorized";

pub(crate) fn default_category() -> String {
    UNCATEGORIZED.to_string()
}

/// Stored documents are externally authored and not schema-validated;
/// amounts arrive as numbers, numeric strings, or worse. Anything that
/// is not a usable number folds to zero so one bad document cannot sink
/// a whole aggregation pass.
pub(crate) fn lenient_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_amount(&value))
}

pub(crate) fn lenient_amount_opt<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(value) => Some(coerce_amount(&value)),
    })
}

pub(crate) fn coerce_amount(value: &Value) -> Decimal {
    match value {
        Value::Number(number) => parse_decimal(&number.to_string())
            .or_else(|| number.as_f64().and_then(Decimal::from_f64))
            .unwrap_or_else(|| {
                warn!("unusable numeric amount {number}, treating as zero");
                Decimal::ZERO
            }),
        Value::String(text) => parse_decimal(text.trim()).unwrap_or_else(|| {
            warn!("malformed amount {text:?}, treating as zero");
            Decimal::ZERO
        }),
        Value::Null => Decimal::ZERO,
        other => {
            warn!("malformed amount {other}, treating as zero");
            Decimal::ZERO
        }
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerces_plain_numbers() {
        assert_eq!(coerce_amount(&json!(1500)), Decimal::from(1500));
        assert_eq!(coerce_amount(&json!(10.25)), Decimal::new(1025, 2));
    }

    #[test]
    fn coerces_numeric_strings() {
        assert_eq!(coerce_amount(&json!("250")), Decimal::from(250));
        assert_eq!(coerce_amount(&json!(" 99.95 ")), Decimal::new(9995, 2));
    }

    #[test]
    fn junk_amounts_fold_to_zero() {
        assert_eq!(coerce_amount(&json!("N/A")), Decimal::ZERO);
        assert_eq!(coerce_amount(&json!(null)), Decimal::ZERO);
        assert_eq!(coerce_amount(&json!({"value": 5})), Decimal::ZERO);
        assert_eq!(coerce_amount(&json!([1, 2])), Decimal::ZERO);
    }
}
