//! Lenient deserializers for values coming from HTML forms
//!
//! Browser forms send every input as a string and leave untouched inputs as
//! `""`. These helpers fold empty strings into `None` so an unset field never
//! reaches a prompt, and accept numbers sent either as JSON numbers or as
//! numeric strings.

use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

/// Optional free-text field: `""` and `null` become `None`, numbers and
/// booleans are kept in their textual form.
pub mod text {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<RawValue> = Option::deserialize(deserializer)?;
        Ok(match raw {
            Some(RawValue::Text(s)) if !s.is_empty() => Some(s),
            Some(RawValue::Number(n)) => Some(n.to_string()),
            Some(RawValue::Flag(b)) => Some(b.to_string()),
            _ => None,
        })
    }
}

/// Optional numeric field: accepts `6.8` or `"6.8"`; `""` and `null` become `None`.
pub mod number {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<RawValue> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(RawValue::Number(n)) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| de::Error::custom("number out of range")),
            Some(RawValue::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(RawValue::Text(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("expected a number, got \"{}\"", s))),
            Some(RawValue::Flag(_)) => Err(de::Error::custom("expected a number, got a boolean")),
        }
    }
}

/// Optional list of free-text entries, sent as an array or a single string;
/// blank entries are dropped.
pub mod text_list {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawList {
        Many(Vec<String>),
        One(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<RawList> = Option::deserialize(deserializer)?;
        Ok(raw
            .map(|list| match list {
                RawList::Many(items) => items,
                RawList::One(item) => vec![item],
            })
            .map(|items| {
                items
                    .into_iter()
                    .filter(|item| !item.trim().is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|items| !items.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "super::text::deserialize")]
        name: Option<String>,
        #[serde(default, deserialize_with = "super::number::deserialize")]
        ph: Option<f64>,
        #[serde(default, deserialize_with = "super::text_list::deserialize")]
        notes: Option<Vec<String>>,
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let form: Form = serde_json::from_str(r#"{"name": "", "ph": "", "notes": ["", " "]}"#).unwrap();
        assert_eq!(form.name, None);
        assert_eq!(form.ph, None);
        assert_eq!(form.notes, None);
    }

    #[test]
    fn test_numbers_accepted_as_text_and_numbers() {
        let form: Form = serde_json::from_str(r#"{"name": 45000, "ph": "6.8"}"#).unwrap();
        assert_eq!(form.name.as_deref(), Some("45000"));
        assert_eq!(form.ph, Some(6.8));

        let form: Form = serde_json::from_str(r#"{"ph": 7}"#).unwrap();
        assert_eq!(form.ph, Some(7.0));
    }

    #[test]
    fn test_missing_fields_default_to_none() {
        let form: Form = serde_json::from_str("{}").unwrap();
        assert!(form.name.is_none());
        assert!(form.ph.is_none());
        assert!(form.notes.is_none());
    }

    #[test]
    fn test_non_numeric_text_rejected() {
        assert!(serde_json::from_str::<Form>(r#"{"ph": "acidic"}"#).is_err());
    }

    #[test]
    fn test_non_finite_numbers_rejected() {
        for value in ["NaN", "inf", "-inf", "infinity"] {
            let body = format!(r#"{{"ph": "{}"}}"#, value);
            assert!(serde_json::from_str::<Form>(&body).is_err(), "{} accepted", value);
        }
    }

    #[test]
    fn test_single_string_list() {
        let form: Form = serde_json::from_str(r#"{"notes": "drought"}"#).unwrap();
        assert_eq!(form.notes, Some(vec!["drought".to_string()]));

        let form: Form = serde_json::from_str(r#"{"notes": " "}"#).unwrap();
        assert_eq!(form.notes, None);
    }
}
