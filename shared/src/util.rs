use chrono::{DateTime, NaiveDate, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// Current UTC timestamp (milliseconds)
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Employee code used when the operator leaves the field blank:
/// `"SP"` followed by the last six digits of the millisecond clock.
pub fn generate_employee_code(now_ms: i64) -> String {
    format!("SP{:06}", now_ms.rem_euclid(1_000_000))
}

/// Alphabet for temporary passwords handed to new admin users
const PASSWORD_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*";

pub const TEMP_PASSWORD_LEN: usize = 12;

/// Random temporary password for a new user account
pub fn generate_temp_password() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..TEMP_PASSWORD_LEN)
        .map(|_| PASSWORD_ALPHABET[rng.gen_range(0..PASSWORD_ALPHABET.len())] as char)
        .collect()
}

/// First of the candidates that holds non-blank text
pub(crate) fn first_text<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
}

/// Accept a text column sent as a string, a number or a boolean.
/// Objects and arrays read as absent.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Int(i64),
        UInt(u64),
        Float(f64),
        Bool(bool),
        Other(IgnoredAny),
    }

    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Text(s)) => Some(s),
        Some(Loose::Int(n)) => Some(n.to_string()),
        Some(Loose::UInt(n)) => Some(n.to_string()),
        Some(Loose::Float(n)) => Some(n.to_string()),
        Some(Loose::Bool(b)) => Some(b.to_string()),
        Some(Loose::Other(_)) | None => None,
    })
}

/// Accept a flag sent as `true`, `"true"`, `1` or `"1"`; anything unreadable is absent
pub(crate) fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Flag(bool),
        Int(i64),
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Flag(b)) => Some(b),
        Some(Loose::Int(n)) => Some(n != 0),
        Some(Loose::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        Some(Loose::Other(_)) | None => None,
    })
}

/// `2025-12-31` or a full RFC 3339 timestamp, reduced to a date
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc).date_naive());
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(d) => Some(d),
        Err(e) => {
            tracing::debug!(value = raw, error = %e, "unparsable date dropped");
            None
        }
    }
}

/// RFC 3339 timestamp
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            tracing::debug!(value = raw, error = %e, "unparsable timestamp dropped");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_code_shape() {
        assert_eq!(generate_employee_code(1_731_312_345_678), "SP345678");
        assert_eq!(generate_employee_code(42), "SP000042");
    }

    #[test]
    fn test_temp_password() {
        let pw = generate_temp_password();
        assert_eq!(pw.len(), TEMP_PASSWORD_LEN);
        assert!(pw.bytes().all(|b| PASSWORD_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_first_text_skips_blank() {
        assert_eq!(
            first_text([None, Some("  ".into()), Some(" Ana ".into())]),
            Some("Ana".to_string())
        );
        assert_eq!(first_text::<2>([None, Some(String::new())]), None);
    }

    #[test]
    fn test_parse_date_forms() {
        let d = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(parse_date("2025-12-31"), Some(d));
        assert_eq!(parse_date("2025-12-31T10:00:00.000Z"), Some(d));
        assert_eq!(parse_date("31/12/2025"), None);
    }

    #[derive(Deserialize, Default)]
    #[serde(default)]
    struct Loose {
        #[serde(deserialize_with = "lenient_string")]
        text: Option<String>,
        #[serde(deserialize_with = "lenient_bool")]
        flag: Option<bool>,
    }

    fn loose(v: serde_json::Value) -> Loose {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_lenient_string_shapes() {
        let cases = [
            (serde_json::json!("923"), Some("923")),
            (serde_json::json!(923456789), Some("923456789")),
            (serde_json::json!(u64::MAX), Some("18446744073709551615")),
            (serde_json::json!(1.5), Some("1.5")),
            (serde_json::json!(true), Some("true")),
            (serde_json::json!({ "nested": 1 }), None),
            (serde_json::json!([1, 2]), None),
            (serde_json::Value::Null, None),
        ];
        for (raw, want) in cases {
            let got = loose(serde_json::json!({ "text": raw.clone() })).text;
            assert_eq!(got.as_deref(), want, "for {raw}");
        }
        assert_eq!(loose(serde_json::json!({})).text, None);
    }

    #[test]
    fn test_lenient_bool_shapes() {
        let flag = |v: serde_json::Value| loose(serde_json::json!({ "flag": v })).flag;
        assert_eq!(flag(serde_json::json!(false)), Some(false));
        assert_eq!(flag(serde_json::json!(1)), Some(true));
        assert_eq!(flag(serde_json::json!("false")), Some(false));
        assert_eq!(flag(serde_json::json!("TRUE")), Some(true));
        assert_eq!(flag(serde_json::json!("maybe")), None);
        assert_eq!(flag(serde_json::json!({})), None);
    }
}
