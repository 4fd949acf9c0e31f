//! Prompt templates for the generation stages
//!
//! Each stage pairs one of these natural-language prompts with a JSON schema
//! defined next to its wire types. System prompts carry the fixed rules;
//! user prompts carry everything derived from the learner.

use super::outline::OutlineLesson;
use super::params::GenerationParams;
use crate::config::PipelineConfig;

/// Closed set of lesson type tags the outline may assign.
pub const LESSON_TYPES: [&str; 6] =
    ["grammar", "vocabulary", "pronunciation", "listening", "speaking", "reading"];

/// Closed set of exercise types lesson content may reference.
pub const EXERCISE_TYPES: [&str; 4] =
    ["flashcards", "fill-in-the-blank", "multiple-choice", "speaking-practice"];

/// Prompt builders for the four pipeline stages
pub struct PromptTemplates;

impl PromptTemplates {
    pub fn outline_system(config: &PipelineConfig) -> String {
        format!(
            "You are a curriculum designer for an English-learning app. \
             Design a course skeleton with exactly {units} units. \
             Each unit has {min} to {max} lessons. \
             Each lesson is tagged with exactly one type out of: {types}. \
             Unit and lesson titles must be short, concrete and non-repetitive. \
             Match the difficulty to the learner's CEFR level and keep every \
             unit topically relevant to the learner's goal.",
            units = config.units_per_path,
            min = config.lessons_per_unit_min,
            max = config.lessons_per_unit_max,
            types = LESSON_TYPES.join(", "),
        )
    }

    pub fn outline_user(params: &GenerationParams) -> String {
        format!(
            "Design the course for this learner:\n{}",
            Self::learner_block(params)
        )
    }

    pub fn lesson_content_system() -> String {
        format!(
            "You are a lesson author for an English-learning app. \
             For every lesson stub you are given, write the full lesson content. \
             exercise_types must contain 2 to 4 entries out of: {types}. \
             word_count must equal the number of entries in words_to_learn, and \
             grammar_count must equal the number of entries in grammar_points. \
             Word translations are written in the learner's native language. \
             Repeat every lesson title exactly as given, character for character.",
            types = EXERCISE_TYPES.join(", "),
        )
    }

    pub fn lesson_content_user(
        unit_title: &str,
        stubs: &[OutlineLesson],
        params: &GenerationParams,
    ) -> String {
        let mut prompt = format!(
            "Unit: {unit_title}\n{learner}\n\nLessons to write:\n",
            learner = Self::learner_block(params),
        );
        for (position, stub) in stubs.iter().enumerate() {
            prompt.push_str(&format!(
                "{}. \"{}\" ({}) - {}\n",
                position + 1,
                stub.title,
                stub.lesson_type,
                stub.subtitle
            ));
        }
        prompt
    }

    pub fn vocabulary_system() -> String {
        "You are a vocabulary curator for an English-learning app. \
         Produce vocabulary entries tailored to the learner. Definitions are \
         written in plain English; translations are written in the learner's \
         native language. Every entry carries a CEFR level close to the \
         learner's level, a topical category and a few lowercase tags."
            .to_string()
    }

    pub fn vocabulary_user(count: usize, params: &GenerationParams) -> String {
        format!(
            "Generate exactly {count} English vocabulary words for this learner:\n{}",
            Self::learner_block(params)
        )
    }

    pub fn phrase_system() -> String {
        "You are a phrase curator for an English-learning app. \
         Produce common English phrases and expressions tailored to the \
         learner, each with its meaning in plain English, one example sentence \
         showing natural usage, a literal translation into the learner's \
         native language, a CEFR level, a topical category and a few lowercase \
         tags."
            .to_string()
    }

    pub fn phrase_user(count: usize, params: &GenerationParams) -> String {
        format!(
            "Generate exactly {count} English phrases for this learner:\n{}",
            Self::learner_block(params)
        )
    }

    fn learner_block(params: &GenerationParams) -> String {
        let focus = if params.focus_areas.is_empty() {
            "general English".to_string()
        } else {
            params.focus_areas.join(", ")
        };
        format!(
            "- CEFR level: {level}\n\
             - Learning goal: {goal}\n\
             - Focus areas: {focus}\n\
             - Native language: {native}",
            level = params.level,
            goal = params.goal,
            native = params.native_language_name,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CefrLevel;

    fn params() -> GenerationParams {
        GenerationParams {
            level: CefrLevel::B1,
            goal: "career".to_string(),
            focus_areas: vec!["grammar".to_string()],
            native_language_name: "Ukrainian".to_string(),
        }
    }

    #[test]
    fn test_outline_system_pins_the_shape() {
        let prompt = PromptTemplates::outline_system(&PipelineConfig::default());
        assert!(prompt.contains("exactly 6 units"));
        assert!(prompt.contains("4 to 5 lessons"));
        assert!(prompt.contains("grammar, vocabulary, pronunciation"));
    }

    #[test]
    fn test_user_prompts_carry_the_learner() {
        let prompt = PromptTemplates::outline_user(&params());
        assert!(prompt.contains("CEFR level: B1"));
        assert!(prompt.contains("Learning goal: career"));
        assert!(prompt.contains("Native language: Ukrainian"));
    }

    #[test]
    fn test_empty_focus_areas_read_as_general_english() {
        let mut p = params();
        p.focus_areas.clear();
        let prompt = PromptTemplates::vocabulary_user(80, &p);
        assert!(prompt.contains("general English"));
        assert!(prompt.contains("exactly 80"));
    }

    #[test]
    fn test_lesson_content_user_lists_every_stub() {
        let stubs = vec![
            OutlineLesson {
                title: "Small Talk at Work".to_string(),
                subtitle: "Starting conversations with colleagues".to_string(),
                lesson_type: "speaking".to_string(),
            },
            OutlineLesson {
                title: "Writing Short Emails".to_string(),
                subtitle: "Clear requests and replies".to_string(),
                lesson_type: "reading".to_string(),
            },
        ];

        let prompt = PromptTemplates::lesson_content_user("Workplace English", &stubs, &params());
        assert!(prompt.contains("Unit: Workplace English"));
        assert!(prompt.contains("1. \"Small Talk at Work\" (speaking) - Starting conversations"));
        assert!(prompt.contains("2. \"Writing Short Emails\" (reading)"));
    }

    #[test]
    fn test_lesson_content_system_demands_exact_titles() {
        let prompt = PromptTemplates::lesson_content_system();
        assert!(prompt.contains("exactly as given"));
        assert!(prompt.contains("flashcards"));
    }
}
