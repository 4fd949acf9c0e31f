//! Generation parameters derived from a learner profile
//!
//! The profile stores free-form labels and language codes; the pipeline
//! works with a CEFR level and a language display name. Lookups are total:
//! anything unknown falls back to a sensible default instead of failing.

use crate::model::{CefrLevel, UserProfile};

/// Per-run inputs every prompt builder receives.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub level: CefrLevel,
    pub goal: String,
    pub focus_areas: Vec<String>,
    /// English display name of the learner's native language.
    pub native_language_name: String,
}

impl GenerationParams {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            level: cefr_for_label(&profile.proficiency),
            goal: profile.goal.clone(),
            focus_areas: profile.focus_areas.clone(),
            native_language_name: language_name(&profile.native_language).to_string(),
        }
    }
}

/// Map a stored proficiency label onto the CEFR scale.
///
/// Unknown labels land on B1; mid-scale content is more forgiving in both
/// directions than either extreme.
pub fn cefr_for_label(label: &str) -> CefrLevel {
    match label.trim().to_lowercase().as_str() {
        "beginner" => CefrLevel::A1,
        "elementary" => CefrLevel::A2,
        "intermediate" => CefrLevel::B1,
        "upper-intermediate" | "upper_intermediate" => CefrLevel::B2,
        "advanced" => CefrLevel::C1,
        _ => CefrLevel::B1,
    }
}

/// Resolve a language display name from its ISO 639-1 code.
///
/// Unknown codes fall back to "English" so translations degrade to
/// definitions rather than appearing in the wrong language.
pub fn language_name(code: &str) -> &'static str {
    match code.trim().to_lowercase().as_str() {
        "en" => "English",
        "uk" => "Ukrainian",
        "ru" => "Russian",
        "pl" => "Polish",
        "de" => "German",
        "fr" => "French",
        "es" => "Spanish",
        "it" => "Italian",
        "pt" => "Portuguese",
        "nl" => "Dutch",
        "cs" => "Czech",
        "sk" => "Slovak",
        "ro" => "Romanian",
        "hu" => "Hungarian",
        "bg" => "Bulgarian",
        "el" => "Greek",
        "tr" => "Turkish",
        "ar" => "Arabic",
        "he" => "Hebrew",
        "hi" => "Hindi",
        "zh" => "Chinese",
        "ja" => "Japanese",
        "ko" => "Korean",
        "vi" => "Vietnamese",
        "th" => "Thai",
        "id" => "Indonesian",
        _ => "English",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_known_proficiency_labels() {
        assert_eq!(cefr_for_label("beginner"), CefrLevel::A1);
        assert_eq!(cefr_for_label("elementary"), CefrLevel::A2);
        assert_eq!(cefr_for_label("intermediate"), CefrLevel::B1);
        assert_eq!(cefr_for_label("upper-intermediate"), CefrLevel::B2);
        assert_eq!(cefr_for_label("upper_intermediate"), CefrLevel::B2);
        assert_eq!(cefr_for_label("advanced"), CefrLevel::C1);
    }

    #[test]
    fn test_labels_are_trimmed_and_case_insensitive() {
        assert_eq!(cefr_for_label("  Advanced "), CefrLevel::C1);
        assert_eq!(cefr_for_label("BEGINNER"), CefrLevel::A1);
        assert_eq!(language_name(" UK "), "Ukrainian");
    }

    #[test]
    fn test_unknown_inputs_fall_back() {
        assert_eq!(cefr_for_label("fluent-ish"), CefrLevel::B1);
        assert_eq!(cefr_for_label(""), CefrLevel::B1);
        assert_eq!(language_name("xx"), "English");
        assert_eq!(language_name(""), "English");
    }

    #[test]
    fn test_params_from_profile() {
        let profile = UserProfile {
            user_id: Uuid::new_v4(),
            proficiency: "intermediate".to_string(),
            goal: "career".to_string(),
            focus_areas: vec!["grammar".to_string(), "vocabulary".to_string()],
            native_language: "uk".to_string(),
        };

        let params = GenerationParams::from_profile(&profile);
        assert_eq!(params.level, CefrLevel::B1);
        assert_eq!(params.goal, "career");
        assert_eq!(params.native_language_name, "Ukrainian");
        assert_eq!(params.focus_areas.len(), 2);
    }
}
