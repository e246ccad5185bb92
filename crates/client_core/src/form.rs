//! Submission form draft: local, uncommitted state until a valid submit.

use shared::{
    domain::{Industry, QuestionType},
    protocol::AnalyzeRequest,
};
use thiserror::Error;

/// Below this many characters the draft is flagged as short.
pub const RECOMMENDED_MIN_CHARS: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("question text and ES body are required")]
    MissingBoth,
    #[error("question text is required")]
    MissingQuestionText,
    #[error("ES body is required")]
    MissingContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordCountTier {
    Empty,
    Short,
    Sufficient,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionForm {
    question_type: QuestionType,
    question_text: String,
    content: String,
    word_count: u32,
    company_name: String,
    industry: Option<Industry>,
}

impl SubmissionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn question_type(&self) -> QuestionType {
        self.question_type
    }

    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn word_count(&self) -> u32 {
        self.word_count
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn industry(&self) -> Option<Industry> {
        self.industry
    }

    pub fn set_question_type(&mut self, question_type: QuestionType) {
        self.question_type = question_type;
    }

    pub fn set_question_text(&mut self, text: impl Into<String>) {
        self.question_text = text.into();
    }

    /// Replaces the body and recounts it in characters, not bytes.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.word_count = character_count(&self.content);
    }

    pub fn set_company_name(&mut self, name: impl Into<String>) {
        self.company_name = name.into();
    }

    /// Selects `industry`, or clears the selection if it is already selected.
    pub fn toggle_industry(&mut self, industry: Industry) {
        self.industry = if self.industry == Some(industry) {
            None
        } else {
            Some(industry)
        };
    }

    pub fn word_count_tier(&self) -> WordCountTier {
        match self.word_count {
            0 => WordCountTier::Empty,
            n if n < RECOMMENDED_MIN_CHARS => WordCountTier::Short,
            _ => WordCountTier::Sufficient,
        }
    }

    pub fn validate(&self) -> Result<(), FormError> {
        let question_blank = self.question_text.trim().is_empty();
        let content_blank = self.content.trim().is_empty();
        match (question_blank, content_blank) {
            (true, true) => Err(FormError::MissingBoth),
            (true, false) => Err(FormError::MissingQuestionText),
            (false, true) => Err(FormError::MissingContent),
            (false, false) => Ok(()),
        }
    }

    /// Builds the request payload. The draft itself is left untouched.
    pub fn submit(&self) -> Result<AnalyzeRequest, FormError> {
        self.validate()?;
        let company_name = self.company_name.trim();
        Ok(AnalyzeRequest {
            question_type: self.question_type,
            question_text: self.question_text.clone(),
            content: self.content.clone(),
            word_count: self.word_count,
            company_name: (!company_name.is_empty()).then(|| company_name.to_string()),
            industry: self.industry,
        })
    }
}

fn character_count(text: &str) -> u32 {
    u32::try_from(text.chars().count()).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
