//! Gemini-backed narrative summary of analysis results.
//!
//! Purely advisory: the numbers in `AnalysisResult` never depend on it, and a
//! failure here is reported to the user rather than aborting a run.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::AnalysisResult;
use crate::error::AppError;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Shown when the model answers with no text at all.
pub const EMPTY_RESPONSE: &str = "No response generated.";

pub struct InsightClient {
    client: Client,
    api_key: String,
    model: String,
}

impl InsightClient {
    /// Reads `GEMINI_API_KEY` (falling back to `API_KEY`) and the optional
    /// `GEMINI_MODEL` from the environment or a `.env` file.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .map_err(|_| AppError::new(2, "Missing GEMINI_API_KEY (or API_KEY) in environment (.env)."))?;
        let mut client = Self::with_api_key(api_key)?;
        if let Some(model) = std::env::var("GEMINI_MODEL").ok().filter(|m| !m.trim().is_empty()) {
            client.model = model.trim().to_string();
        }
        Ok(client)
    }

    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self, AppError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AppError::new(2, "Gemini API key is empty."));
        }
        Ok(Self {
            client: Client::new(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask the model for a short written interpretation of `results`.
    pub fn summarize(&self, results: &[AnalysisResult]) -> Result<String, AppError> {
        let prompt = build_prompt(results)?;
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        info!(model = %self.model, samples = results.len(), "requesting insight");
        let resp = self
            .client
            .post(format!("{BASE_URL}/{}:generateContent", self.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| AppError::new(4, format!("Gemini request failed: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| AppError::new(4, format!("Failed to read Gemini response: {e}")))?;
        debug!(%status, bytes = text.len(), "insight response");

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(AppError::new(4, format!("Gemini request failed: {detail}")));
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| AppError::new(4, format!("Failed to parse Gemini response: {e}")))?;
        Ok(extract_text(&parsed))
    }
}

/// The fixed rheologist prompt with `results` embedded as pretty JSON.
pub fn build_prompt(results: &[AnalysisResult]) -> Result<String, AppError> {
    let data = serde_json::to_string_pretty(results)
        .map_err(|e| AppError::new(4, format!("Failed to serialize analysis results: {e}")))?;
    Ok(format!(
        "You are an expert Rheologist and Biopharmaceutical Scientist.
Analyze the following synthetic viscosity analysis data for protein solutions:

{data}

Metrics Explanation:
- \"flowBehaviorIndex\" (n): <1 implies shear thinning, =1 Newtonian.
- \"clusterLengthScale\": A toy metric derived from relaxation time and shear thinning degree. Higher = potential large clusters/aggregates.

Task:
1. Summarize the rheological behavior of each sample.
2. Identify which sample shows the highest risk of protein instability or clustering.
3. Provide a brief recommendation for formulation development (e.g., \"Add excipients to Sample C\").

Keep it concise (under 200 words) and scientific.
"
    ))
}

/// Text parts of the first candidate, joined; `EMPTY_RESPONSE` if blank.
fn extract_text(resp: &GenerateResponse) -> String {
    let text: String = resp
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|c| c.parts.iter().filter_map(|p| p.text.as_deref()).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        EMPTY_RESPONSE.to_string()
    } else {
        text
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}
