//! Pure view models built from backend records, plus their plain-text form.

use std::{
    fmt,
    time::{Duration, Instant},
};

use chrono::{DateTime, Local, TimeZone, Utc};
use shared::{
    domain::{EntryId, Industry, Label, QuestionType},
    protocol::{AnalysisRecord, EsEntry, HistoryItem},
    scoring::ScoreGrade,
};

pub const COPY_ACK_DURATION: Duration = Duration::from_secs(2);
const BAR_WIDTH: usize = 20;

pub fn format_timestamp_in<Tz>(timestamp: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    timestamp.with_timezone(tz).format("%Y/%m/%d %H:%M").to_string()
}

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    format_timestamp_in(timestamp, &Local)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCard {
    pub title: &'static str,
    pub score: f64,
    pub grade: ScoreGrade,
}

impl ScoreCard {
    pub fn new(title: &'static str, score: f64) -> Self {
        Self {
            title,
            score,
            grade: ScoreGrade::of(score),
        }
    }

    /// Score as shown to the user: rounded to a whole number.
    pub fn display_score(&self) -> String {
        format!("{:.0}", self.score.round())
    }

    pub fn bar(&self, width: usize) -> String {
        let filled = ((self.score.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
        format!("{}{}", "#".repeat(filled), ".".repeat(width - filled))
    }
}

impl fmt::Display for ScoreCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<22} {:>3}  [{}]  {}",
            self.title,
            self.display_score(),
            self.bar(BAR_WIDTH),
            self.grade
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub industry: Option<Label<Industry>>,
    pub score_cards: Vec<ScoreCard>,
    pub structure_type: Option<String>,
    pub structure_evaluation: Option<String>,
    pub improvement_points: Vec<String>,
    pub original_content: String,
    pub improved_content: String,
}

impl ResultView {
    pub fn from_record(record: &AnalysisRecord) -> Self {
        let analysis = &record.analysis;
        let mut score_cards = vec![
            ScoreCard::new("Logic", analysis.logic_score),
            ScoreCard::new("Specificity", analysis.specificity_score),
            ScoreCard::new("Readability", analysis.readability_score),
        ];
        if let Some(consistency) = analysis.consistency_score {
            score_cards.push(ScoreCard::new("Industry consistency", consistency));
        }

        Self {
            industry: record.es_entry.industry.clone(),
            score_cards,
            structure_type: analysis.structure_type.clone(),
            structure_evaluation: analysis.structure_evaluation.clone(),
            improvement_points: analysis.improvement_points.clone(),
            original_content: record.es_entry.content.clone(),
            improved_content: analysis.improved_content.clone(),
        }
    }
}

impl fmt::Display for ResultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.industry {
            Some(Label::Known(industry)) => {
                writeln!(
                    f,
                    "Optimized for {} ({})",
                    industry.short_label(),
                    industry.emphasis()
                )?;
                writeln!(f)?;
            }
            Some(Label::Unlisted(raw)) => {
                writeln!(f, "Optimized for {raw}")?;
                writeln!(f)?;
            }
            None => {}
        }

        writeln!(f, "Scores")?;
        for card in &self.score_cards {
            writeln!(f, "  {card}")?;
        }

        if self.structure_type.is_some() || self.structure_evaluation.is_some() {
            writeln!(f)?;
            writeln!(
                f,
                "Structure: {}",
                self.structure_type.as_deref().unwrap_or("-")
            )?;
            if let Some(evaluation) = &self.structure_evaluation {
                write_indented(f, evaluation)?;
            }
        }

        if !self.improvement_points.is_empty() {
            writeln!(f)?;
            writeln!(f, "Improvement points")?;
            for (index, point) in self.improvement_points.iter().enumerate() {
                writeln!(f, "  {}. {point}", index + 1)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Original")?;
        write_indented(f, &self.original_content)?;
        writeln!(f)?;
        writeln!(f, "Improved")?;
        write_indented(f, &self.improved_content)
    }
}

/// Entry metadata shown above the result on the detail page.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryHeader {
    pub question_type: Label<QuestionType>,
    pub question_text: String,
    pub company_name: Option<String>,
    pub industry: Option<Label<Industry>>,
    pub word_count: u32,
    pub created_at: DateTime<Utc>,
}

impl From<&EsEntry> for EntryHeader {
    fn from(entry: &EsEntry) -> Self {
        Self {
            question_type: entry.question_type.clone(),
            question_text: entry.question_text.clone(),
            company_name: entry.company_name.clone(),
            industry: entry.industry.clone(),
            word_count: entry.word_count,
            created_at: entry.created_at,
        }
    }
}

impl fmt::Display for EntryHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}] {}", self.question_type, self.question_text)?;
        if let Some(company) = &self.company_name {
            writeln!(f, "  Company: {company}")?;
        }
        if let Some(industry) = &self.industry {
            writeln!(f, "  Industry: {industry}")?;
        }
        writeln!(
            f,
            "  {} chars, {}",
            self.word_count,
            format_timestamp(&self.created_at)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub header: EntryHeader,
    pub result: ResultView,
}

impl DetailView {
    pub fn from_record(record: &AnalysisRecord) -> Self {
        Self {
            header: EntryHeader::from(&record.es_entry),
            result: ResultView::from_record(record),
        }
    }
}

impl fmt::Display for DetailView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        write!(f, "{}", self.result)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub id: EntryId,
    pub question_type: Label<QuestionType>,
    pub company_name: Option<String>,
    pub industry: Option<Label<Industry>>,
    pub avg_score: f64,
    pub excellent: bool,
    pub scores: [ScoreCard; 3],
    pub created_at: DateTime<Utc>,
}

impl From<&HistoryItem> for HistoryRow {
    fn from(item: &HistoryItem) -> Self {
        let avg_score = item.avg_score();
        Self {
            id: item.id,
            question_type: item.question_type.clone(),
            company_name: item.company_name.clone(),
            industry: item.industry.clone(),
            avg_score,
            excellent: item.is_excellent(),
            scores: [
                ScoreCard::new("Logic", item.logic_score),
                ScoreCard::new("Specificity", item.specificity_score),
                ScoreCard::new("Readability", item.readability_score),
            ],
            created_at: item.created_at,
        }
    }
}

impl fmt::Display for HistoryRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:<5} {}", self.id, self.question_type)?;
        if self.excellent {
            write!(f, " *excellent*")?;
        }
        if let Some(company) = &self.company_name {
            write!(f, "  {company}")?;
        }
        if let Some(industry) = &self.industry {
            write!(f, "  ({industry})")?;
        }
        writeln!(f, "  {}", format_timestamp(&self.created_at))?;
        let scores: Vec<String> = self
            .scores
            .iter()
            .map(|card| format!("{} {}", card.title, card.display_score()))
            .collect();
        write!(f, "       {}", scores.join(" / "))
    }
}

/// Transient "copied" acknowledgement for the copy-improved-text action.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyAcknowledgement {
    copied_at: Option<Instant>,
}

impl CopyAcknowledgement {
    pub fn mark_copied(&mut self, now: Instant) {
        self.copied_at = Some(now);
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.copied_at
            .is_some_and(|at| now.saturating_duration_since(at) < COPY_ACK_DURATION)
    }

    pub fn button_label(&self, now: Instant) -> &'static str {
        if self.is_active(now) {
            "Copied!"
        } else {
            "Copy"
        }
    }
}

fn write_indented(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    for line in text.lines() {
        writeln!(f, "  {line}")?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
