use sg_core::QuizQuestion;
use tracing::warn;

/// Parse model output into quiz questions.
///
/// Accepts a bare JSON array or one wrapped in a Markdown code fence. Returns
/// `None` for anything else, for an empty array, or when any question is
/// malformed.
pub fn parse_questions(raw: &str) -> Option<Vec<QuizQuestion>> {
    let questions: Vec<QuizQuestion> = serde_json::from_str(utils::strip_code_fences(raw)).ok()?;
    if questions.is_empty() || !questions.iter().all(QuizQuestion::is_well_formed) {
        return None;
    }
    Some(questions)
}

/// Parsed questions, or the canned set when the output is unusable.
pub fn questions_or_fallback(raw: &str) -> Vec<QuizQuestion> {
    parse_questions(raw).unwrap_or_else(|| {
        warn!(raw = %utils::preview(raw, 300), "Quiz output was not a usable JSON array, serving fallback questions");
        fallback_questions()
    })
}

pub fn fallback_questions() -> Vec<QuizQuestion> {
    vec![
        question(
            "What is the main concept discussed in the provided content?",
            [
                "Fundamental principles",
                "Advanced theories",
                "Practical applications",
                "Historical context"
            ],
            0
        ),
        question(
            "Which approach is most effective for understanding this material?",
            [
                "Memorization only",
                "Critical analysis and application",
                "Passive reading",
                "Quick review"
            ],
            1
        ),
        question(
            "What should students focus on when studying this content?",
            [
                "Minor details",
                "Key concepts and relationships",
                "Dates and names only",
                "Personal opinions"
            ],
            1
        ),
    ]
}

fn question(text: &str, options: [&str; 4], correct: usize) -> QuizQuestion {
    QuizQuestion {
        question: text.to_string(),
        options: options.map(str::to_string),
        correct
    }
}
