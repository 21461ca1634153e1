//! Maps the analysis API's payloads into a single [`NormalizedReport`].
//!
//! The API has answered with several shapes over time. A payload is first
//! classified into a [`ResponseShape`] by checking for an object under
//! `analysis`, then each variant is mapped by its own function. Reading is
//! lenient: a field with an unexpected type is treated as absent, so
//! [`normalize`] cannot fail.

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::types::{ApplicationRecommendation, NormalizedReport};

const NESTED_KEY: &str = "analysis";
const ENVELOPE_KEY: &str = "result";
const ENVELOPE_METADATA_KEYS: [&str; 3] = ["success", "filename", "analysis_type"];

static EMPTY_PAYLOAD: JsonValue = JsonValue::Null;

const STRENGTH_KEYWORDS: [&str; 3] = ["strength", "strong", "good"];
const GAP_KEYWORDS: [&str; 4] = ["gap", "missing", "improve", "lack"];
const INSIGHT_RECOMMENDATION_LIMIT: usize = 5;

/// Fields of the flat (basic analysis) payload, including legacy aliases.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatAnalysis {
    pub match_score: Option<f64>,
    pub final_score: Option<f64>,
    pub match_percentage: Option<f64>,
    pub matched_skills: Option<Vec<String>>,
    pub missing_skills: Option<Vec<String>>,
    pub strengths: Option<Vec<String>>,
    pub gaps: Option<Vec<String>>,
    pub recommendations: Option<Vec<String>>,
    pub suggestions: Option<Vec<String>>,
    pub recommendation: Option<String>,
    pub insights: Option<Vec<String>>,
    pub overall_assessment: Option<String>,
}

impl FlatAnalysis {
    pub fn from_value(payload: &JsonValue) -> Self {
        Self {
            match_score: score_field(payload, "match_score"),
            final_score: score_field(payload, "final_score"),
            match_percentage: score_field(payload, "match_percentage"),
            matched_skills: list_field(payload, "matched_skills"),
            missing_skills: list_field(payload, "missing_skills"),
            strengths: list_field(payload, "strengths"),
            gaps: list_field(payload, "gaps"),
            recommendations: list_field(payload, "recommendations"),
            suggestions: list_field(payload, "suggestions"),
            recommendation: text_field(payload, "recommendation"),
            insights: list_field(payload, "insights"),
            overall_assessment: text_field(payload, "overall_assessment"),
        }
    }

    fn score(&self) -> Option<f64> {
        self.match_score.or(self.final_score).or(self.match_percentage)
    }

    fn recommendations(&mut self) -> Vec<String> {
        if let Some(list) = self.recommendations.take() {
            return list;
        }
        if let Some(list) = self.suggestions.take() {
            return list;
        }
        if let Some(single) = self.recommendation.take() {
            return vec![single];
        }
        self.insights
            .as_ref()
            .map(|insights| insights.iter().take(INSIGHT_RECOMMENDATION_LIMIT).cloned().collect::<Vec<_>>())
            .unwrap_or_default()
    }
}

/// Fields of the `analysis` object returned by the AI endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NestedAnalysis {
    pub match_score: Option<f64>,
    pub matched_requirements: Option<Vec<String>>,
    pub missing_requirements: Option<Vec<String>>,
    pub strengths: Option<Vec<String>>,
    pub gaps: Option<Vec<String>>,
    pub recommendations: Option<Vec<String>>,
    pub overall_assessment: Option<String>,
    pub application_recommendation: Option<String>,
    pub experience_match: Option<String>,
    pub skills_match: Option<String>,
}

impl NestedAnalysis {
    pub fn from_value(analysis: &JsonValue) -> Self {
        Self {
            match_score: score_field(analysis, "match_score"),
            matched_requirements: list_field(analysis, "matched_requirements"),
            missing_requirements: list_field(analysis, "missing_requirements"),
            strengths: list_field(analysis, "strengths"),
            gaps: list_field(analysis, "gaps"),
            recommendations: list_field(analysis, "recommendations"),
            overall_assessment: text_field(analysis, "overall_assessment"),
            application_recommendation: text_field(analysis, "application_recommendation"),
            experience_match: text_field(analysis, "experience_match"),
            skills_match: text_field(analysis, "skills_match"),
        }
    }
}

/// Known payload variants. Nested payloads still carry flat fields, which
/// act as fallbacks for anything the nested object omits.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    Nested { analysis: NestedAnalysis, flat: FlatAnalysis },
    Flat(FlatAnalysis),
}

impl ResponseShape {
    pub fn detect(payload: &JsonValue) -> Self {
        let flat = FlatAnalysis::from_value(payload);
        match payload.get(NESTED_KEY) {
            Some(analysis @ JsonValue::Object(_)) => ResponseShape::Nested {
                analysis: NestedAnalysis::from_value(analysis),
                flat,
            },
            _ => ResponseShape::Flat(flat),
        }
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, ResponseShape::Nested { .. })
    }

    pub fn into_report(self) -> NormalizedReport {
        match self {
            ResponseShape::Nested { analysis, flat } => report_from_nested(analysis, flat),
            ResponseShape::Flat(flat) => report_from_flat(flat),
        }
    }
}

/// Normalize a raw API response. Accepts either the full envelope (payload
/// under `result`) or the bare payload. An envelope without an object under
/// `result` has an empty payload.
pub fn normalize(raw: &JsonValue) -> NormalizedReport {
    let payload = match raw.get(ENVELOPE_KEY) {
        Some(result @ JsonValue::Object(_)) => result,
        _ if is_envelope(raw) => &EMPTY_PAYLOAD,
        _ => raw,
    };
    let shape = ResponseShape::detect(payload);
    debug!(nested = shape.is_nested(), "normalizing analysis payload");
    shape.into_report()
}

fn is_envelope(raw: &JsonValue) -> bool {
    raw.get(ENVELOPE_KEY).is_some() || ENVELOPE_METADATA_KEYS.iter().any(|k| raw.get(k).is_some())
}

fn report_from_flat(mut flat: FlatAnalysis) -> NormalizedReport {
    let score = flat.score();
    let recommendations = flat.recommendations();
    let insights = flat.insights.unwrap_or_default();
    NormalizedReport {
        match_score: to_match_score(score),
        matched_skills: flat.matched_skills.unwrap_or_default(),
        missing_skills: flat.missing_skills.unwrap_or_default(),
        strengths: or_classified(flat.strengths, &insights, &STRENGTH_KEYWORDS),
        gaps: or_classified(flat.gaps, &insights, &GAP_KEYWORDS),
        recommendations,
        overall_assessment: flat.overall_assessment,
        application_recommendation: None,
        experience_match: None,
        skills_match: None,
    }
}

fn report_from_nested(analysis: NestedAnalysis, mut flat: FlatAnalysis) -> NormalizedReport {
    let score = analysis.match_score.or_else(|| flat.score());
    let recommendations = match analysis.recommendations {
        Some(list) => list,
        None => flat.recommendations(),
    };
    let insights = flat.insights.unwrap_or_default();
    NormalizedReport {
        match_score: to_match_score(score),
        matched_skills: analysis
            .matched_requirements
            .or(flat.matched_skills)
            .unwrap_or_default(),
        missing_skills: analysis
            .missing_requirements
            .or(flat.missing_skills)
            .unwrap_or_default(),
        strengths: or_classified(analysis.strengths.or(flat.strengths), &insights, &STRENGTH_KEYWORDS),
        gaps: or_classified(analysis.gaps.or(flat.gaps), &insights, &GAP_KEYWORDS),
        recommendations,
        overall_assessment: analysis.overall_assessment.or(flat.overall_assessment),
        application_recommendation: analysis
            .application_recommendation
            .map(ApplicationRecommendation::from),
        experience_match: analysis.experience_match,
        skills_match: analysis.skills_match,
    }
}

/// Use `explicit` unless it is missing or empty, in which case the insights
/// containing any of `keywords` are taken instead. Strength and gap passes
/// run independently, so one insight may land in both lists.
fn or_classified(explicit: Option<Vec<String>>, insights: &[String], keywords: &[&str]) -> Vec<String> {
    match explicit {
        Some(list) if !list.is_empty() => list,
        _ => classify_insights(insights, keywords),
    }
}

pub fn classify_insights(insights: &[String], keywords: &[&str]) -> Vec<String> {
    insights
        .iter()
        .filter(|insight| {
            let lowered = insight.to_lowercase();
            keywords.iter().any(|k| lowered.contains(k))
        })
        .cloned()
        .collect()
}

fn to_match_score(raw: Option<f64>) -> u8 {
    raw.map(|s| s.round().clamp(0.0, 100.0) as u8).unwrap_or(0)
}

/// A numeric zero counts as absent so the next alias gets a chance. A
/// non-empty string such as `"0"` is a present value.
fn score_field(obj: &JsonValue, key: &str) -> Option<f64> {
    let value = match obj.get(key)? {
        JsonValue::Number(n) => n.as_f64().filter(|v| *v != 0.0),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    value.is_finite().then_some(value)
}

fn list_field(obj: &JsonValue, key: &str) -> Option<Vec<String>> {
    let items = obj.get(key)?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(JsonValue::as_str)
            .map(str::to_string)
            .collect(),
    )
}

fn text_field(obj: &JsonValue, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(JsonValue::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
