//! Study-aid generation
//!
//! Given a free-text query and a mode, this module retrieves the nearest
//! document snippets, builds a mode-specific prompt, sends it to the
//! messages API, and parses the reply into a typed study aid. Failures are
//! typed so callers can tell "the model returned nothing useful" from
//! "the call failed".

mod anthropic;

pub use anthropic::AnthropicClient;

use crate::config::Config;
use crate::embed::Embedder;
use crate::error::{Error, Result};
use crate::store::VectorStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// The study-aid type requested. Wire names match the upload form values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyMode {
    /// Concise summary with review questions
    Resume,
    /// Multiple-choice quiz
    Quiz,
    /// Graded evaluation (short answers, essays, one exercise)
    Evaluation,
    /// Detailed learning plan
    Apprentissage,
}

impl StudyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudyMode::Resume => "resume",
            StudyMode::Quiz => "quiz",
            StudyMode::Evaluation => "evaluation",
            StudyMode::Apprentissage => "apprentissage",
        }
    }
}

impl std::fmt::Display for StudyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary study aid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryAid {
    pub summary: String,
    pub questions: Vec<String>,
    pub key_concept: String,
}

/// One multiple-choice question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
}

/// Multiple-choice quiz study aid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizAid {
    pub quiz: Vec<QuizQuestion>,
}

/// Evaluation study aid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationAid {
    pub short_questions: Vec<String>,
    pub essay_questions: Vec<String>,
    pub practical_exercise: String,
}

/// Learning-plan study aid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningPlanAid {
    pub objectives: Vec<String>,
    pub resources: Vec<String>,
    pub exercises: Vec<String>,
    pub schedule: String,
}

/// A parsed study aid, tagged by the mode that produced it
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum StudyAid {
    Summary(SummaryAid),
    Quiz(QuizAid),
    Evaluation(EvaluationAid),
    LearningPlan(LearningPlanAid),
}

/// Build the prompt for a mode, substituting the query and retrieved snippets
pub fn build_prompt(mode: StudyMode, query: &str, snippets: &str) -> String {
    match mode {
        StudyMode::Resume => format!(
            "Course content: {query}\n\n\
             Additional material: {snippets}\n\n\
             Based on this information, generate:\n\
             1. A concise summary of the course\n\
             2. 3 important questions about the content\n\
             3. An explanation of one key concept\n\n\
             Reply in JSON with the keys: 'summary', 'questions', 'key_concept'."
        ),
        StudyMode::Quiz => format!(
            "Course content: {query}\n\n\
             Additional material: {snippets}\n\n\
             Generate a quiz of 5 multiple-choice questions based on this content.\n\
             Each question must have 4 options and exactly one correct answer.\n\n\
             Reply in JSON with the key 'quiz' containing a list of objects, each with\n\
             the keys 'question', 'options' (list of 4 strings) and 'correct_answer'\n\
             (index of the correct option)."
        ),
        StudyMode::Evaluation => format!(
            "Course content: {query}\n\n\
             Additional material: {snippets}\n\n\
             Generate a complete evaluation based on this content, comprising:\n\
             1. 3 short-answer questions\n\
             2. 2 essay questions\n\
             3. 1 practical exercise\n\n\
             Reply in JSON with the keys: 'short_questions', 'essay_questions',\n\
             'practical_exercise'."
        ),
        StudyMode::Apprentissage => format!(
            "Course content: {query}\n\n\
             Additional material: {snippets}\n\n\
             Create a detailed learning plan based on this content, comprising:\n\
             1. Learning objectives\n\
             2. A list of further resources\n\
             3. Practical exercises\n\
             4. A suggested study schedule\n\n\
             Reply in JSON with the keys: 'objectives', 'resources', 'exercises',\n\
             'schedule'."
        ),
    }
}

/// Parse the model reply into the typed aid for a mode
///
/// Models routinely wrap JSON in a fenced code block; the fence is
/// stripped before parsing. Anything that does not deserialize into the
/// expected shape is a MalformedAid error carrying the raw text.
pub fn parse_aid(mode: StudyMode, text: &str) -> Result<StudyAid> {
    let json_str = strip_code_fence(text);

    let aid = match mode {
        StudyMode::Resume => StudyAid::Summary(parse_shape(json_str)?),
        StudyMode::Quiz => {
            let quiz: QuizAid = parse_shape(json_str)?;
            validate_quiz(&quiz)?;
            StudyAid::Quiz(quiz)
        }
        StudyMode::Evaluation => StudyAid::Evaluation(parse_shape(json_str)?),
        StudyMode::Apprentissage => StudyAid::LearningPlan(parse_shape(json_str)?),
    };

    Ok(aid)
}

fn parse_shape<T: for<'de> Deserialize<'de>>(json_str: &str) -> Result<T> {
    serde_json::from_str(json_str).map_err(|e| {
        debug!("Malformed model reply: {}", e);
        Error::MalformedAid(json_str.chars().take(500).collect())
    })
}

/// Every question needs exactly 4 options and an in-range answer index
fn validate_quiz(quiz: &QuizAid) -> Result<()> {
    for (i, q) in quiz.quiz.iter().enumerate() {
        if q.options.len() != 4 {
            return Err(Error::MalformedAid(format!(
                "quiz question {} has {} options, expected 4",
                i,
                q.options.len()
            )));
        }
        if q.correct_answer >= q.options.len() {
            return Err(Error::MalformedAid(format!(
                "quiz question {} has out-of-range correct_answer {}",
                i, q.correct_answer
            )));
        }
    }
    Ok(())
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

/// Retrieve snippets, build the prompt, call the API, and parse the reply
pub async fn generate_study_aid(
    config: &Config,
    client: &AnthropicClient,
    store: &VectorStore,
    embedder: &dyn Embedder,
    api_key: &str,
    query: &str,
    mode: StudyMode,
) -> Result<StudyAid> {
    info!("Generating {} aid", mode);

    let query_vector = embedder.embed(query).await?;
    let hits = store.search(query_vector, config.retrieval.top_k).await?;

    let snippets = hits
        .iter()
        .filter(|h| h.score >= config.retrieval.min_score)
        .map(|h| h.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    debug!("Retrieved {} snippets for prompt", hits.len());

    let prompt = build_prompt(mode, query, &snippets);
    let reply = client.complete(api_key, &prompt).await?;

    parse_aid(mode, &reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz_json(questions: usize, options: usize, answer: usize) -> String {
        let question = serde_json::json!({
            "question": "What is ownership?",
            "options": (0..options).map(|i| format!("option {}", i)).collect::<Vec<_>>(),
            "correct_answer": answer,
        });
        serde_json::json!({
            "quiz": (0..questions).map(|_| question.clone()).collect::<Vec<_>>()
        })
        .to_string()
    }

    #[test]
    fn test_mode_wire_names() {
        assert_eq!(
            serde_json::from_str::<StudyMode>("\"resume\"").unwrap(),
            StudyMode::Resume
        );
        assert_eq!(
            serde_json::from_str::<StudyMode>("\"apprentissage\"").unwrap(),
            StudyMode::Apprentissage
        );
        assert_eq!(
            serde_json::to_string(&StudyMode::Quiz).unwrap(),
            "\"quiz\""
        );
        assert!(serde_json::from_str::<StudyMode>("\"karaoke\"").is_err());
    }

    #[test]
    fn test_prompt_contains_query_and_snippets() {
        for mode in [
            StudyMode::Resume,
            StudyMode::Quiz,
            StudyMode::Evaluation,
            StudyMode::Apprentissage,
        ] {
            let prompt = build_prompt(mode, "photosynthesis", "chlorophyll absorbs light");
            assert!(prompt.contains("photosynthesis"), "{mode} missing query");
            assert!(
                prompt.contains("chlorophyll absorbs light"),
                "{mode} missing snippets"
            );
            assert!(prompt.contains("JSON"), "{mode} missing format instruction");
        }
    }

    #[test]
    fn test_parse_well_formed_quiz() {
        let aid = parse_aid(StudyMode::Quiz, &quiz_json(5, 4, 2)).unwrap();
        let StudyAid::Quiz(quiz) = aid else {
            panic!("expected quiz aid");
        };
        assert_eq!(quiz.quiz.len(), 5);
        for q in &quiz.quiz {
            assert_eq!(q.options.len(), 4);
            assert!(q.correct_answer < 4);
        }
    }

    #[test]
    fn test_parse_quiz_rejects_wrong_option_count() {
        let result = parse_aid(StudyMode::Quiz, &quiz_json(5, 3, 0));
        assert!(matches!(result, Err(Error::MalformedAid(_))));
    }

    #[test]
    fn test_parse_quiz_rejects_out_of_range_answer() {
        let result = parse_aid(StudyMode::Quiz, &quiz_json(5, 4, 4));
        assert!(matches!(result, Err(Error::MalformedAid(_))));
    }

    #[test]
    fn test_parse_malformed_json_is_typed_error() {
        let result = parse_aid(StudyMode::Quiz, "I'm sorry, I can't produce JSON here.");
        assert!(matches!(result, Err(Error::MalformedAid(_))));
    }

    #[test]
    fn test_parse_summary_with_code_fence() {
        let reply = "```json\n{\"summary\": \"s\", \"questions\": [\"q1\"], \"key_concept\": \"k\"}\n```";
        let aid = parse_aid(StudyMode::Resume, reply).unwrap();
        let StudyAid::Summary(summary) = aid else {
            panic!("expected summary aid");
        };
        assert_eq!(summary.summary, "s");
        assert_eq!(summary.questions, vec!["q1"]);
    }

    #[test]
    fn test_parse_learning_plan() {
        let reply = serde_json::json!({
            "objectives": ["understand lifetimes"],
            "resources": ["the book"],
            "exercises": ["rustlings"],
            "schedule": "two weeks",
        })
        .to_string();
        let aid = parse_aid(StudyMode::Apprentissage, &reply).unwrap();
        assert!(matches!(aid, StudyAid::LearningPlan(_)));
    }

    #[test]
    fn test_strip_code_fence_variants() {
        assert_eq!(strip_code_fence("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }
}
