use super::traits::{SessionField, TOKEN_SEPARATOR};
use crate::i18n::Language;
use serde::Serialize;
use std::collections::HashMap;

/// Typed snapshot of one session record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub session_id: Option<String>,
    pub phone_number: Option<String>,
    pub language: Option<Language>,
    pub age_bracket: Option<String>,
    pub aerial_cases: Option<String>,
    pub contact_with_covid: Option<String>,
    pub contact_reasons: Vec<String>,
    pub symptoms: Vec<String>,
    pub illnesses: Vec<String>,
    pub risk: i64,
}

impl SessionRecord {
    /// Build from raw store fields. Unknown fields are ignored and an
    /// unparsable risk value reads as zero.
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        let text = |field: SessionField| fields.get(field.as_str()).cloned();
        let tokens = |field: SessionField| {
            fields
                .get(field.as_str())
                .map(|raw| {
                    raw.split(TOKEN_SEPARATOR)
                        .filter(|token| !token.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default()
        };

        Self {
            session_id: text(SessionField::SessionId),
            phone_number: text(SessionField::Phone),
            language: fields
                .get(SessionField::Language.as_str())
                .map(String::as_str)
                .map(Language::from_stored),
            age_bracket: text(SessionField::AgeBracket),
            aerial_cases: text(SessionField::AerialCases),
            contact_with_covid: text(SessionField::ContactWithCovid),
            contact_reasons: tokens(SessionField::Contacts),
            symptoms: tokens(SessionField::Symptoms),
            illnesses: tokens(SessionField::Illness),
            risk: fields
                .get(SessionField::Risk.as_str())
                .and_then(|raw| raw.trim().parse().ok())
                .unwrap_or(0),
        }
    }

    /// True when the store holds nothing for this session.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_and_token_lists() {
        let fields: HashMap<String, String> = [
            ("sessionId", "s1"),
            ("phone", "+254700000000"),
            ("lang", "en"),
            ("ageBracket", "15-25"),
            ("contacts", "face-to-face,other"),
            ("risk", "11"),
            ("unrelated", "x"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let record = SessionRecord::from_fields(&fields);
        assert_eq!(record.session_id.as_deref(), Some("s1"));
        assert_eq!(record.language, Some(Language::English));
        assert_eq!(record.age_bracket.as_deref(), Some("15-25"));
        assert_eq!(record.contact_reasons, vec!["face-to-face", "other"]);
        assert!(record.symptoms.is_empty());
        assert_eq!(record.risk, 11);
        assert!(!record.is_empty());
    }

    #[test]
    fn empty_fields_give_empty_record() {
        let record = SessionRecord::from_fields(&HashMap::new());
        assert!(record.is_empty());
        assert_eq!(record.risk, 0);
    }
}
