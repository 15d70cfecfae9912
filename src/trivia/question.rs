use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Every question offers this many choices
pub const CHOICE_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuestionError {
    #[error("question text is empty")]
    EmptyQuestion,

    #[error("expected 4 choices, got {0}")]
    WrongChoiceCount(usize),

    #[error("correct answer {0:?} appears {1} times among the choices")]
    CorrectAnswerCount(String, usize),
}

/// A four-choice trivia question
///
/// Fields are private so the choice invariants established in [`TriviaQuestion::new`]
/// cannot be broken afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TriviaQuestion {
    question: String,
    correct_answer: String,
    choices: Vec<String>,
    image_url: Option<String>,
}

/// Plain export of a question for serialization and display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriviaRecord {
    pub question: String,
    pub correct_answer: String,
    pub choices: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl TriviaQuestion {
    /// Build a question, shuffling `choices` into a random order.
    ///
    /// `choices` must hold exactly [`CHOICE_COUNT`] entries with the correct
    /// answer among them exactly once.
    pub fn new<R: Rng + ?Sized>(
        question: impl Into<String>,
        correct_answer: impl Into<String>,
        mut choices: Vec<String>,
        image_url: Option<String>,
        rng: &mut R,
    ) -> Result<Self, QuestionError> {
        let question = question.into();
        let correct_answer = correct_answer.into();

        if question.trim().is_empty() {
            return Err(QuestionError::EmptyQuestion);
        }
        if choices.len() != CHOICE_COUNT {
            return Err(QuestionError::WrongChoiceCount(choices.len()));
        }
        let occurrences = choices.iter().filter(|c| **c == correct_answer).count();
        if occurrences != 1 {
            return Err(QuestionError::CorrectAnswerCount(correct_answer, occurrences));
        }

        choices.shuffle(rng);

        Ok(Self {
            question,
            correct_answer,
            choices,
            image_url,
        })
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Exact, case-sensitive comparison against the correct answer
    pub fn is_correct(&self, candidate: &str) -> bool {
        candidate == self.correct_answer
    }

    pub fn to_record(&self) -> TriviaRecord {
        TriviaRecord {
            question: self.question.clone(),
            correct_answer: self.correct_answer.clone(),
            choices: self.choices.clone(),
            image_url: self.image_url.clone(),
        }
    }
}

/// Draw `count` distinct entries of `pool` (other than `correct`) uniformly at random.
///
/// Returns `None` when the pool cannot supply enough distinct decoys.
pub fn sample_distractors<R: Rng + ?Sized>(
    pool: &[&str],
    correct: &str,
    count: usize,
    rng: &mut R,
) -> Option<Vec<String>> {
    let mut candidates: Vec<&str> = Vec::with_capacity(pool.len());
    for entry in pool {
        if *entry != correct && !candidates.contains(entry) {
            candidates.push(*entry);
        }
    }

    if candidates.len() < count {
        return None;
    }

    Some(
        candidates
            .choose_multiple(rng, count)
            .map(|s| s.to_string())
            .collect(),
    )
}
