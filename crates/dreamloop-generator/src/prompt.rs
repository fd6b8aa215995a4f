//! Prompt construction for the daily two-line generation.

use dreamloop_core::{Category, TemperatureUnit};

/// Sampling temperature requested from the model.
pub(crate) const GENERATION_TEMPERATURE: f32 = 0.7;

/// Soft ceiling on words per line, stated in the instructions.
pub(crate) const MAX_WORDS_PER_LINE: usize = 18;

/// Everything the prompt is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationInput {
    pub goals: Vec<String>,
    pub tone: String,
    pub language: String,
    /// English weekday name in the user's timezone, e.g. `Saturday`.
    pub weekday: String,
    pub weather_summary: Option<String>,
    pub temperature: Option<f64>,
    pub unit: Option<TemperatureUnit>,
}

pub(crate) fn system_prompt() -> String {
    let categories = Category::ALL
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "You are a compassionate, succinct daily coach.\n\
         Reply with a JSON object only: two short affirmations (at most {MAX_WORDS_PER_LINE} words each), \
         a category and a visual_theme.\n\
         Write in the second person. Be supportive. No exclamation marks, no clichés. \
         Allowed categories: {categories}."
    )
}

pub(crate) fn user_prompt(input: &GenerationInput) -> String {
    let goals = if input.goals.is_empty() {
        "general wellbeing".to_string()
    } else {
        input.goals.join(", ")
    };

    format!(
        "Goals: {goals}\n\
         Tone: {tone}\n\
         Language: {language}\n\
         Today: {weekday}\n\
         Weather: {weather}\n\
         \n\
         Return JSON:\n\
         {{\"lines\":[\"...\",\"...\"],\"category\":\"focus\",\"visual_theme\":\"5-8 words\"}}",
        tone = input.tone,
        language = input.language,
        weekday = input.weekday,
        weather = weather_line(input),
    )
}

fn weather_line(input: &GenerationInput) -> String {
    let summary = input.weather_summary.as_deref().unwrap_or("—");
    match (input.temperature, input.unit) {
        (Some(temp), Some(unit)) => format!("{summary}, {temp}°{unit}"),
        _ => summary.to_string(),
    }
}
