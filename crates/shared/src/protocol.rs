use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    domain::{
        deserialize_optional_label, deserialize_optional_text, AnalysisId, EntryId, Industry,
        Label, QuestionType,
    },
    scoring,
};

pub const DEFAULT_HISTORY_LIMIT: u32 = 50;

/// Body of `POST /es/analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub question_type: QuestionType,
    pub question_text: String,
    pub content: String,
    pub word_count: u32,
    pub company_name: Option<String>,
    pub industry: Option<Industry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsEntry {
    pub id: EntryId,
    pub question_type: Label<QuestionType>,
    pub question_text: String,
    pub content: String,
    pub word_count: u32,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_label")]
    pub industry: Option<Label<Industry>>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub id: AnalysisId,
    pub es_entry_id: EntryId,
    pub logic_score: f64,
    pub specificity_score: f64,
    pub readability_score: f64,
    #[serde(default)]
    pub consistency_score: Option<f64>,
    #[serde(default)]
    pub structure_type: Option<String>,
    #[serde(default)]
    pub structure_evaluation: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub improvement_points: Vec<String>,
    pub improved_content: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Entry plus its analysis, as returned by analyze and detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub es_entry: EsEntry,
    pub analysis: Analysis,
}

/// Flattened list row: entry metadata and the three mandatory scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: EntryId,
    pub question_type: Label<QuestionType>,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_label")]
    pub industry: Option<Label<Industry>>,
    pub logic_score: f64,
    pub specificity_score: f64,
    pub readability_score: f64,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl HistoryItem {
    pub fn avg_score(&self) -> f64 {
        scoring::average_score(
            self.logic_score,
            self.specificity_score,
            self.readability_score,
        )
    }

    pub fn is_excellent(&self) -> bool {
        scoring::is_excellent(self.avg_score())
    }
}

/// Pagination for list endpoints. Request-side only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    pub skip: u32,
    pub limit: u32,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

fn deserialize_null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Backend timestamps arrive either as RFC 3339 or as naive ISO-8601 (no zone),
/// the latter is read as UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(value) => super::serialize(value, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(raw) => super::parse(&raw).map(Some).ok_or_else(|| {
                    serde::de::Error::custom(format!("invalid timestamp: {raw}"))
                }),
            }
        }
    }
}
