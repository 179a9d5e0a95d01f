use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub date: NaiveDate,
    pub question: String,
    pub answer: i64,
    pub fact: String,
}

/// A question that has already been asked, numbered from the first day on file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PastQuestion {
    #[serde(flatten)]
    pub question: Question,
    #[serde(rename = "dayNumber")]
    pub day_number: i64,
}

#[derive(Debug, Error)]
pub enum QuestionError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only view over the question file. The file is re-read on every call.
#[derive(Debug, Clone)]
pub struct QuestionStore {
    path: PathBuf,
}

impl QuestionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Vec<Question>, QuestionError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| QuestionError::Read {
                path: self.path.clone(),
                source,
            })?;
        let questions: Vec<Question> =
            serde_json::from_str(&raw).map_err(|source| QuestionError::Parse {
                path: self.path.clone(),
                source,
            })?;
        debug!(count = questions.len(), path = %self.path.display(), "Loaded questions");
        Ok(questions)
    }
}

/// Questions dated on or before `today`, newest first.
///
/// Day numbers count from the earliest date in the whole set, so a file that
/// already holds future questions still numbers the first day as 1.
pub fn past_questions(questions: &[Question], today: NaiveDate) -> Vec<PastQuestion> {
    let Some(earliest) = questions.iter().map(|q| q.date).min() else {
        return Vec::new();
    };

    let mut past: Vec<PastQuestion> = questions
        .iter()
        .filter(|q| q.date <= today)
        .map(|q| PastQuestion {
            question: q.clone(),
            day_number: (q.date - earliest).num_days() + 1,
        })
        .collect();
    past.sort_by(|a, b| b.question.date.cmp(&a.question.date));
    past
}

pub fn question_for(questions: &[Question], date: NaiveDate) -> Option<&Question> {
    questions.iter().find(|q| q.date == date)
}
