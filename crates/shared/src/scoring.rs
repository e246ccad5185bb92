//! Score presentation policy shared by every view that shows a score.

use std::fmt;

pub const EXCELLENT_THRESHOLD: f64 = 80.0;
pub const GOOD_THRESHOLD: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreGrade {
    Excellent,
    Good,
    NeedsImprovement,
}

impl ScoreGrade {
    pub fn of(score: f64) -> Self {
        if score >= EXCELLENT_THRESHOLD {
            ScoreGrade::Excellent
        } else if score >= GOOD_THRESHOLD {
            ScoreGrade::Good
        } else {
            ScoreGrade::NeedsImprovement
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreGrade::Excellent => "excellent",
            ScoreGrade::Good => "good",
            ScoreGrade::NeedsImprovement => "needs improvement",
        }
    }
}

impl fmt::Display for ScoreGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn label(score: f64) -> &'static str {
    ScoreGrade::of(score).label()
}

/// Unrounded mean of the three mandatory scores.
pub fn average_score(logic: f64, specificity: f64, readability: f64) -> f64 {
    (logic + specificity + readability) / 3.0
}

pub fn is_excellent(score: f64) -> bool {
    ScoreGrade::of(score) == ScoreGrade::Excellent
}
