use crate::{error::AppError, validation::field_error};

pub const MIN_SCORE: i16 = 1;
pub const MAX_SCORE: i16 = 5;

/// Mean of the scores rounded to one decimal; 0 when there are none.
///
/// Ties go to the even digit of the mean's exact binary value, so 4.25
/// becomes 4.2 and 3.75 becomes 3.8.
pub fn average(scores: &[i16]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let sum: i64 = scores.iter().map(|&s| i64::from(s)).sum();
    let mean = sum as f64 / scores.len() as f64;
    // Float formatting rounds the exact value half to even.
    format!("{mean:.1}").parse().unwrap_or(mean)
}

pub fn check_score(score: i16) -> Result<i16, AppError> {
    if (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(score)
    } else {
        Err(field_error("score", "score must be between 1 and 5"))
    }
}

/// Normalise a free-text comment: trimmed, empty becomes `None`.
pub fn clean_comment(comment: Option<String>) -> Option<String> {
    comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}
