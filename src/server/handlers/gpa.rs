use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::core::errors::ApiError;
use crate::gpa::{calculate_gpa, Course};

#[derive(Debug, Deserialize)]
pub struct GpaRequest {
    pub courses: Vec<Course>,
}

pub async fn calculate(Json(payload): Json<GpaRequest>) -> Result<impl IntoResponse, ApiError> {
    let summary = calculate_gpa(&payload.courses)?;
    Ok(Json(summary))
}
