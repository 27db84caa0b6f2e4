//! GPA computation over the standard 13-symbol letter-grade scale.

use serde::{Deserialize, Serialize};

use crate::core::errors::GpaError;

const GRADE_POINTS: [(&str, f64); 13] = [
    ("A+", 4.0),
    ("A", 4.0),
    ("A-", 3.7),
    ("B+", 3.3),
    ("B", 3.0),
    ("B-", 2.7),
    ("C+", 2.3),
    ("C", 2.0),
    ("C-", 1.7),
    ("D+", 1.3),
    ("D", 1.0),
    ("D-", 0.7),
    ("F", 0.0),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub name: String,
    pub credits: f64,
    pub grade: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpaSummary {
    pub gpa: f64,
    pub total_credits: f64,
    pub total_points: f64,
}

/// Convert a letter grade to grade points. Case-insensitive, trims
/// surrounding whitespace.
pub fn grade_points(grade: &str) -> Result<f64, GpaError> {
    let normalized = grade.trim().to_uppercase();
    GRADE_POINTS
        .iter()
        .find(|(symbol, _)| *symbol == normalized)
        .map(|(_, points)| *points)
        .ok_or_else(|| GpaError::UnknownGrade(grade.to_string()))
}

/// Credit-weighted GPA over all courses, rounded to two decimals.
pub fn calculate_gpa(courses: &[Course]) -> Result<GpaSummary, GpaError> {
    if courses.is_empty() {
        return Err(GpaError::NoCourses);
    }

    let mut total_points = 0.0;
    let mut total_credits = 0.0;

    for course in courses {
        if course.credits <= 0.0 {
            return Err(GpaError::NonPositiveCredits(course.name.clone()));
        }
        let points = grade_points(&course.grade)?;
        total_points += course.credits * points;
        total_credits += course.credits;
    }

    if total_credits == 0.0 {
        return Err(GpaError::ZeroTotalCredits);
    }

    Ok(GpaSummary {
        gpa: round2(total_points / total_credits),
        total_credits: round2(total_credits),
        total_points: round2(total_points),
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
