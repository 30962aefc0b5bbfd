use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::models::candidate::Candidate;
use crate::models::cv::{CvDocument, ExperienceEntry};
use crate::utils::id::IdGenerator;

/// External text completion. Returns the raw text payload of the first choice.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str, json_output: bool) -> Result<String>;
}

/// OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct ChatCompletionClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl ChatCompletionClient {
    pub fn new(client: Client, api_key: Option<String>, base_url: String, model: String) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionClient {
    async fn complete(&self, prompt: &str, json_output: bool) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Config("Missing AI API key (AI_API_KEY)".to_string()))?;

        let mut payload = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "user", "content": prompt}
            ],
        });
        if json_output {
            payload["response_format"] = serde_json::json!({ "type": "json_object" });
        }

        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&payload)
            .timeout(Duration::from_secs(120))
            .send()
            .await
            .map_err(|e| Error::Ai(format!("request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(Error::Ai(format!("completion API error {}: {}", status, text)));
        }

        let body: JsonValue = res
            .json()
            .await
            .map_err(|e| Error::Ai(format!("unreadable completion body: {}", e)))?;

        body.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| Error::Ai("Invalid completion response format".to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateEnhancement {
    pub headline: String,
    pub summary: String,
    pub skills: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolishedExperience {
    pub company: String,
    pub role: String,
    pub start_date: String,
    pub end_date: String,
    pub is_current: bool,
    pub responsibilities: String,
}

/// Fields returned by a polish request. `None` leaves the document's value as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CvPolish {
    pub summary: Option<String>,
    pub experiences: Option<Vec<PolishedExperience>>,
    pub skills: Option<String>,
}

impl CvPolish {
    /// Shallow merge into `doc`. Replacement experiences keep the identifier
    /// and location of the entry at the same position, new positions get
    /// fresh identifiers.
    pub fn merge_into(self, doc: &mut CvDocument, ids: &dyn IdGenerator) {
        if let Some(summary) = self.summary {
            doc.summary = summary;
        }
        if let Some(skills) = self.skills {
            doc.skills = skills;
        }
        if let Some(polished) = self.experiences {
            let previous = std::mem::take(&mut doc.experiences);
            doc.experiences = polished
                .into_iter()
                .enumerate()
                .map(|(idx, p)| {
                    let (id, location) = match previous.get(idx) {
                        Some(old) => (old.id.clone(), old.location.clone()),
                        None => (ids.next_id(), String::new()),
                    };
                    ExperienceEntry {
                        id,
                        company: p.company,
                        role: p.role,
                        location,
                        start_date: p.start_date,
                        end_date: p.end_date,
                        is_current: p.is_current,
                        responsibilities: p.responsibilities,
                    }
                })
                .collect();
        }
    }
}

#[derive(Clone)]
pub struct AIService {
    completion: Arc<dyn CompletionClient>,
}

impl AIService {
    pub fn new(completion: Arc<dyn CompletionClient>) -> Self {
        Self { completion }
    }

    pub async fn enhance_candidate(&self, candidate: &Candidate) -> Result<CandidateEnhancement> {
        let prompt = candidate_prompt(candidate);
        let text = self.completion.complete(&prompt, true).await?;
        let enhancement = parse_enhancement(&text)?;
        tracing::info!("Candidate {} enhanced by AI", candidate.id);
        Ok(enhancement)
    }

    pub async fn polish_cv(&self, doc: &CvDocument) -> Result<CvPolish> {
        let prompt = polish_prompt(doc)?;
        let text = self.completion.complete(&prompt, true).await?;
        parse_polish(&text)
    }
}

pub fn candidate_prompt(candidate: &Candidate) -> String {
    format!(
        r#"You are a world-class executive recruiter and career coach.
Rewrite the following candidate profile to be extremely professional, impactful, and tailored for high-end job opportunities.

Candidate Name: {}
Current Skills: {}
Current Experience: {}

Instructions:
- Create a compelling, results-oriented professional headline.
- Write a powerful 3-4 sentence professional summary focusing on value proposition.
- Categorize and polish the skills into a clean, comma-separated list.
- Return strictly valid JSON.

JSON Output Format:
{{
    "headline": "Strategic [Job Title] with [X] years of experience in [Industry]",
    "summary": "Proven track record of...",
    "skills": "Skill 1, Skill 2, Skill 3"
}}"#,
        candidate.full_name, candidate.skills, candidate.experience
    )
}

pub fn polish_prompt(doc: &CvDocument) -> Result<String> {
    let data = serde_json::to_string(doc)?;
    Ok(format!(
        r#"You are a professional CV writer. Create an exceptional, modern, and professional CV based on the following data:
{}

Requirements:
1. Summary: Professional, engaging, and highlighting key strengths.
2. Experiences: Expand on responsibilities using action verbs (e.g., Led, Developed, Optimized). Focus on achievements.
3. Skills: Organize logically and ensure technical terms are correct.
4. Dates: Ensure YYYY-MM format.

Return strictly valid JSON matching this schema:
{{
    "summary": "...",
    "experiences": [
        {{
            "company": "...",
            "role": "...",
            "startDate": "YYYY-MM",
            "endDate": "YYYY-MM",
            "isCurrent": false,
            "responsibilities": "Bullet points or professional paragraph..."
        }}
    ],
    "skills": "Skill 1, Skill 2..."
}}"#,
        data
    ))
}

/// Skills always end up as one string: lists are comma-joined, anything else
/// structured is serialized. `null` means the field was not returned.
pub fn normalize_skills(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    JsonValue::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
        ),
        other => Some(other.to_string()),
    }
}

/// Strips ```json ... ``` fences some models wrap around JSON output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(rest) => rest.trim().strip_suffix("```").unwrap_or(rest).trim(),
        None => text,
    }
}

fn parse_object(text: &str) -> Result<serde_json::Map<String, JsonValue>> {
    let value: JsonValue = serde_json::from_str(strip_json_fences(text))
        .map_err(|e| Error::Ai(format!("response is not valid JSON: {}", e)))?;
    match value {
        JsonValue::Object(map) => Ok(map),
        other => Err(Error::Ai(format!("expected a JSON object, got {}", kind(&other)))),
    }
}

fn kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn optional_string(map: &serde_json::Map<String, JsonValue>, key: &str) -> Result<Option<String>> {
    match map.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(Error::Ai(format!("'{}' should be a string, got {}", key, kind(other)))),
    }
}

pub fn parse_enhancement(text: &str) -> Result<CandidateEnhancement> {
    let map = parse_object(text)?;
    let skills = map
        .get("skills")
        .and_then(normalize_skills)
        .ok_or_else(|| Error::Ai("response has no skills".to_string()))?;
    Ok(CandidateEnhancement {
        headline: optional_string(&map, "headline")?.unwrap_or_default(),
        summary: optional_string(&map, "summary")?.unwrap_or_default(),
        skills,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawExperience {
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(default)]
    is_current: Option<bool>,
    #[serde(default)]
    responsibilities: Option<String>,
}

pub fn parse_polish(text: &str) -> Result<CvPolish> {
    let map = parse_object(text)?;

    let experiences = match map.get("experiences") {
        None | Some(JsonValue::Null) => None,
        Some(JsonValue::Array(items)) => {
            let mut parsed = Vec::with_capacity(items.len());
            for (idx, item) in items.iter().enumerate() {
                let raw: RawExperience = serde_json::from_value(item.clone())
                    .map_err(|e| Error::Ai(format!("experience #{} is malformed: {}", idx + 1, e)))?;
                parsed.push(PolishedExperience {
                    company: raw.company.unwrap_or_default(),
                    role: raw.role.unwrap_or_default(),
                    start_date: raw.start_date.unwrap_or_default(),
                    end_date: raw.end_date.unwrap_or_default(),
                    is_current: raw.is_current.unwrap_or(false),
                    responsibilities: raw.responsibilities.unwrap_or_default(),
                });
            }
            Some(parsed)
        }
        Some(other) => {
            return Err(Error::Ai(format!("'experiences' should be an array, got {}", kind(other))))
        }
    };

    Ok(CvPolish {
        summary: optional_string(&map, "summary")?,
        experiences,
        skills: map.get("skills").and_then(normalize_skills),
    })
}
