use std::{fmt, str::FromStr};

use serde::{
    de::{
        value::{Error as ValueError, StrDeserializer},
        IntoDeserializer,
    },
    Deserialize, Deserializer, Serialize, Serializer,
};
use thiserror::Error;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

id_newtype!(EntryId);
id_newtype!(AnalysisId);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Question category of an entry sheet. Serialized with the Japanese labels
/// the backend expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QuestionType {
    #[default]
    #[serde(rename = "ガクチカ")]
    Gakuchika,
    #[serde(rename = "志望動機")]
    Motivation,
    #[serde(rename = "自己PR")]
    SelfPromotion,
    #[serde(rename = "その他")]
    Other,
}

impl QuestionType {
    pub const ALL: [QuestionType; 4] = [
        QuestionType::Gakuchika,
        QuestionType::Motivation,
        QuestionType::SelfPromotion,
        QuestionType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::Gakuchika => "ガクチカ",
            QuestionType::Motivation => "志望動機",
            QuestionType::SelfPromotion => "自己PR",
            QuestionType::Other => "その他",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        QuestionType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .or(match s.to_ascii_lowercase().as_str() {
                "gakuchika" => Some(QuestionType::Gakuchika),
                "motivation" => Some(QuestionType::Motivation),
                "self-pr" | "self_pr" | "selfpr" => Some(QuestionType::SelfPromotion),
                "other" => Some(QuestionType::Other),
                _ => None,
            })
            .ok_or_else(|| UnknownVariant {
                kind: "question type",
                value: s.to_string(),
            })
    }
}

/// Target industry used by the backend to tailor scoring and the rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Industry {
    #[serde(rename = "コンサルティング")]
    Consulting,
    #[serde(rename = "IT・エンジニア")]
    ItEngineering,
    #[serde(rename = "商社")]
    TradingCompany,
    #[serde(rename = "メガベンチャー")]
    MegaVenture,
    #[serde(rename = "金融")]
    Finance,
    #[serde(rename = "メーカー")]
    Manufacturer,
}

impl Industry {
    pub const ALL: [Industry; 6] = [
        Industry::Consulting,
        Industry::ItEngineering,
        Industry::TradingCompany,
        Industry::MegaVenture,
        Industry::Finance,
        Industry::Manufacturer,
    ];

    /// Wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Industry::Consulting => "コンサルティング",
            Industry::ItEngineering => "IT・エンジニア",
            Industry::TradingCompany => "商社",
            Industry::MegaVenture => "メガベンチャー",
            Industry::Finance => "金融",
            Industry::Manufacturer => "メーカー",
        }
    }

    pub fn short_label(self) -> &'static str {
        match self {
            Industry::Consulting => "コンサル",
            Industry::ItEngineering => "IT/エンジニア",
            Industry::TradingCompany => "商社",
            Industry::MegaVenture => "メガベンチャー",
            Industry::Finance => "金融",
            Industry::Manufacturer => "メーカー",
        }
    }

    /// What the backend emphasises when optimizing for this industry.
    pub fn emphasis(self) -> &'static str {
        match self {
            Industry::Consulting => "論理性・フレームワーク重視",
            Industry::ItEngineering => "技術力・課題解決重視",
            Industry::TradingCompany => "行動力・コミュ力重視",
            Industry::MegaVenture => "主体性・成長意欲重視",
            Industry::Finance => "正確性・誠実性重視",
            Industry::Manufacturer => "ものづくり・改善重視",
        }
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Industry {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Industry::ALL
            .into_iter()
            .find(|industry| industry.as_str() == s || industry.short_label() == s)
            .or(match s.to_ascii_lowercase().as_str() {
                "consulting" => Some(Industry::Consulting),
                "it" | "engineering" | "it-engineering" => Some(Industry::ItEngineering),
                "trading" | "trading-company" => Some(Industry::TradingCompany),
                "mega-venture" | "megaventure" => Some(Industry::MegaVenture),
                "finance" => Some(Industry::Finance),
                "manufacturer" | "maker" => Some(Industry::Manufacturer),
                _ => None,
            })
            .ok_or_else(|| UnknownVariant {
                kind: "industry",
                value: s.to_string(),
            })
    }
}

/// A catalogue value read back from the backend. Stored rows can carry labels
/// the client does not know; those are kept verbatim instead of failing the
/// whole payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Label<T> {
    Known(T),
    Unlisted(String),
}

impl<T> Label<T> {
    pub fn known(&self) -> Option<&T> {
        match self {
            Label::Known(value) => Some(value),
            Label::Unlisted(_) => None,
        }
    }
}

impl<T> From<T> for Label<T> {
    fn from(value: T) -> Self {
        Label::Known(value)
    }
}

impl<T: fmt::Display> fmt::Display for Label<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Known(value) => fmt::Display::fmt(value, f),
            Label::Unlisted(raw) => f.write_str(raw),
        }
    }
}

impl<T: Serialize> Serialize for Label<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Label::Known(value) => value.serialize(serializer),
            Label::Unlisted(raw) => serializer.serialize_str(raw),
        }
    }
}

impl<'de, T> Deserialize<'de> for Label<T>
where
    T: for<'a> Deserialize<'a>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Label::parse_wire(raw))
    }
}

impl<T> Label<T>
where
    T: for<'a> Deserialize<'a>,
{
    /// Matches `raw` against the exact wire names of `T`.
    fn parse_wire(raw: String) -> Self {
        let deserializer: StrDeserializer<'_, ValueError> = raw.as_str().into_deserializer();
        match T::deserialize(deserializer) {
            Ok(value) => Label::Known(value),
            Err(_) => Label::Unlisted(raw),
        }
    }
}

/// Decodes an optional label where `null` and `""` both mean absent.
pub fn deserialize_optional_label<'de, D, T>(deserializer: D) -> Result<Option<Label<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: for<'a> Deserialize<'a>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(Label::parse_wire))
}

/// Decodes an optional string where `""` collapses to `None`.
pub fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_type_uses_japanese_wire_labels() {
        let json = serde_json::to_string(&QuestionType::SelfPromotion).expect("serialize");
        assert_eq!(json, "\"自己PR\"");
        let parsed: QuestionType = serde_json::from_str("\"志望動機\"").expect("deserialize");
        assert_eq!(parsed, QuestionType::Motivation);
        assert_eq!(QuestionType::default(), QuestionType::Gakuchika);
    }

    #[test]
    fn industry_parses_wire_value_short_label_and_ascii_alias() {
        assert_eq!("IT・エンジニア".parse::<Industry>(), Ok(Industry::ItEngineering));
        assert_eq!("コンサル".parse::<Industry>(), Ok(Industry::Consulting));
        assert_eq!("finance".parse::<Industry>(), Ok(Industry::Finance));
        assert!("宇宙".parse::<Industry>().is_err());
    }

    #[test]
    fn empty_industry_decodes_as_none() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(default, deserialize_with = "deserialize_optional_label")]
            industry: Option<Label<Industry>>,
        }

        let empty: Row = serde_json::from_str(r#"{"industry":""}"#).expect("empty");
        assert_eq!(empty.industry, None);
        let null: Row = serde_json::from_str(r#"{"industry":null}"#).expect("null");
        assert_eq!(null.industry, None);
        let missing: Row = serde_json::from_str("{}").expect("missing");
        assert_eq!(missing.industry, None);
        let set: Row = serde_json::from_str(r#"{"industry":"商社"}"#).expect("set");
        assert_eq!(set.industry, Some(Label::Known(Industry::TradingCompany)));
    }

    #[test]
    fn labels_outside_the_catalogue_are_kept_verbatim() {
        let industry: Label<Industry> = serde_json::from_str("\"不動産\"").expect("industry");
        assert_eq!(industry, Label::Unlisted("不動産".into()));
        assert_eq!(industry.known(), None);
        assert_eq!(industry.to_string(), "不動産");

        let kind: Label<QuestionType> = serde_json::from_str("\"学業\"").expect("question type");
        assert_eq!(kind, Label::Unlisted("学業".into()));
        assert_eq!(serde_json::to_string(&kind).expect("serialize"), "\"学業\"");

        let known: Label<QuestionType> = serde_json::from_str("\"自己PR\"").expect("known");
        assert_eq!(known.known(), Some(&QuestionType::SelfPromotion));
        assert_eq!(known.to_string(), "自己PR");
    }

    #[test]
    fn wire_labels_do_not_match_ascii_aliases() {
        let alias: Label<Industry> = serde_json::from_str("\"finance\"").expect("alias");
        assert_eq!(alias, Label::Unlisted("finance".into()));
    }
}
