use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub(crate) const OPTION_COUNT: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuestionError {
    #[error("please provide exactly 4 options (got {0})")]
    WrongOptionCount(usize),
    #[error("correct answer must be between A and D (got {0:?})")]
    InvalidCorrectOption(String),
    #[error("question {0} does not exist")]
    NoSuchQuestion(usize),
}

/// Answer label of one of the four options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Letter {
    A,
    B,
    C,
    D,
}

impl Letter {
    pub const ALL: [Letter; OPTION_COUNT] = [Letter::A, Letter::B, Letter::C, Letter::D];

    pub fn index(self) -> usize {
        match self {
            Letter::A => 0,
            Letter::B => 1,
            Letter::C => 2,
            Letter::D => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Letter> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Letter::A => 'A',
            Letter::B => 'B',
            Letter::C => 'C',
            Letter::D => 'D',
        };
        write!(f, "{c}")
    }
}

impl FromStr for Letter {
    type Err = QuestionError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Letter::A),
            "B" => Ok(Letter::B),
            "C" => Ok(Letter::C),
            "D" => Ok(Letter::D),
            _ => Err(QuestionError::InvalidCorrectOption(input.to_string())),
        }
    }
}

/// A validated multiple-choice question. Only constructible through
/// [`Question::new`] or a [`QuestionRecord`] conversion, so every instance
/// has exactly four options and a correct letter in A-D.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    options: [String; OPTION_COUNT],
    correct: Letter,
}

impl Question {
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct: &str,
    ) -> Result<Question, QuestionError> {
        let correct = correct.parse::<Letter>()?;
        let options: [String; OPTION_COUNT] = options
            .try_into()
            .map_err(|rejected: Vec<String>| QuestionError::WrongOptionCount(rejected.len()))?;
        Ok(Question {
            prompt: prompt.into(),
            options,
            correct,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }
    pub fn option(&self, letter: Letter) -> &str {
        &self.options[letter.index()]
    }
    pub fn correct(&self) -> Letter {
        self.correct
    }
    pub fn correct_text(&self) -> &str {
        self.option(self.correct)
    }
    pub fn is_correct(&self, answer: Letter) -> bool {
        answer == self.correct
    }
}

/// On-disk shape of a question: `{ question, content, correct }`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QuestionRecord {
    pub question: String,
    pub content: Vec<String>,
    pub correct: String,
}

impl TryFrom<QuestionRecord> for Question {
    type Error = QuestionError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        Question::new(record.question, record.content, &record.correct)
    }
}

impl From<&Question> for QuestionRecord {
    fn from(question: &Question) -> Self {
        QuestionRecord {
            question: question.prompt.clone(),
            content: question.options.to_vec(),
            correct: question.correct.to_string(),
        }
    }
}

/// Splits comma-separated admin input into exactly four trimmed options.
pub fn parse_options(input: &str) -> Result<Vec<String>, QuestionError> {
    let options: Vec<String> = input.split(',').map(|opt| opt.trim().to_string()).collect();
    if options.len() != OPTION_COUNT {
        return Err(QuestionError::WrongOptionCount(options.len()));
    }
    Ok(options)
}

#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
    quarantined: Vec<(usize, serde_json::Value)>,
}

impl QuestionBank {
    #[cfg(test)]
    pub fn new(questions: Vec<Question>) -> Self {
        QuestionBank {
            questions,
            quarantined: Vec::new(),
        }
    }

    pub(crate) fn with_quarantine(
        questions: Vec<Question>,
        quarantined: Vec<(usize, serde_json::Value)>,
    ) -> Self {
        QuestionBank {
            questions,
            quarantined,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
    /// Raw records that failed validation on load, each with its position in
    /// the loaded document. Kept so a save does not drop them from the file.
    pub fn quarantined(&self) -> &[(usize, serde_json::Value)] {
        &self.quarantined
    }
    pub fn len(&self) -> usize {
        self.questions.len()
    }
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn add(&mut self, question: Question) {
        self.questions.push(question);
    }

    pub fn replace(&mut self, index: usize, question: Question) -> Result<Question, QuestionError> {
        match self.questions.get_mut(index) {
            Some(slot) => Ok(std::mem::replace(slot, question)),
            None => Err(QuestionError::NoSuchQuestion(index)),
        }
    }

    pub fn remove(&mut self, index: usize) -> Result<Question, QuestionError> {
        if index >= self.questions.len() {
            return Err(QuestionError::NoSuchQuestion(index));
        }
        Ok(self.questions.remove(index))
    }
}

#[cfg(test)]
pub(crate) fn sample_question() -> Question {
    Question::new(
        "2+2?",
        vec!["3".into(), "4".into(), "5".into(), "6".into()],
        "B",
    )
    .unwrap()
}
