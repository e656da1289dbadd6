use crate::libpointaire::leaderboard::{Leaderboard, ScoreEntry};
use crate::libpointaire::question::{Question, QuestionBank, QuestionRecord};
use log::{debug, error, info, warn};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::time::Instant;
use std::{fs, io};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot access {0}: {1}")]
    Io(String, #[source] io::Error),
    #[error("cannot encode document: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct ScoresDocument<'a> {
    scores: &'a [ScoreEntry],
}

fn read_document(path: &Path) -> Option<Value> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!("[Store] {:?} does not exist yet, starting empty", path);
            return None;
        }
        Err(err) => {
            error!("[Store] Cannot read {:?}: {}", path, err);
            return None;
        }
    };
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(err) => {
            error!("[Store] Malformed JSON in {:?}: {}", path, err);
            None
        }
    }
}

fn write_document<T: Serialize + ?Sized>(path: &Path, document: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(document)?;
    match fs::write(path, json) {
        Ok(_) => {
            debug!("[Store] Wrote {:?}", path);
            Ok(())
        }
        Err(err) => {
            error!("[Store] Cannot write {:?}: {}", path, err);
            Err(StoreError::Io(path.display().to_string(), err))
        }
    }
}

/// Never fails: unreadable or malformed files give an empty bank, and
/// records that are not valid questions are quarantined.
pub fn load_question_bank(path: &Path) -> QuestionBank {
    let now = Instant::now();
    let records = match read_document(path) {
        Some(Value::Array(records)) => records,
        Some(_) => {
            warn!("[Store] {:?} is not an array of questions, starting empty", path);
            return QuestionBank::default();
        }
        None => return QuestionBank::default(),
    };

    let mut questions = Vec::with_capacity(records.len());
    let mut quarantined = Vec::new();
    for (idx, raw) in records.into_iter().enumerate() {
        let parsed = serde_json::from_value::<QuestionRecord>(raw.clone())
            .map_err(|err| err.to_string())
            .and_then(|record| Question::try_from(record).map_err(|err| err.to_string()));
        match parsed {
            Ok(question) => questions.push(question),
            Err(reason) => {
                warn!("[Store] Skipping question #{} in {:?}: {}", idx + 1, path, reason);
                quarantined.push((idx, raw));
            }
        }
    }

    info!(
        "[Store] Loaded {} questions ({} skipped) in {} ms.",
        questions.len(),
        quarantined.len(),
        now.elapsed().as_millis()
    );
    QuestionBank::with_quarantine(questions, quarantined)
}

/// Quarantined records go back to their loaded positions, clamped to the end
/// of the document when questions were deleted since.
pub fn save_question_bank(path: &Path, bank: &QuestionBank) -> Result<(), StoreError> {
    let mut document: Vec<Value> = Vec::with_capacity(bank.len() + bank.quarantined().len());
    for question in bank.questions() {
        document.push(serde_json::to_value(QuestionRecord::from(question))?);
    }
    // ascending positions, so earlier inserts never shift later targets
    for (idx, raw) in bank.quarantined() {
        document.insert((*idx).min(document.len()), raw.clone());
    }
    write_document(path, &document)?;
    info!("[Store] Saved {} questions", bank.len());
    Ok(())
}

fn score_entry(raw: &Value) -> Option<ScoreEntry> {
    let name = raw.get("name")?.as_str()?;
    let score = u32::try_from(raw.get("score")?.as_u64()?).ok()?;
    Some(ScoreEntry::new(name, score))
}

/// Never fails. A document without a `scores` array degrades to an empty board.
pub fn load_leaderboard(path: &Path) -> Leaderboard {
    let document = match read_document(path) {
        Some(document) => document,
        None => return Leaderboard::default(),
    };
    let records = match document.get("scores") {
        Some(Value::Array(records)) => records,
        _ => {
            warn!("[Store] 'scores' in {:?} is not an array, starting empty", path);
            return Leaderboard::default();
        }
    };

    let mut entries = Vec::with_capacity(records.len());
    for raw in records {
        match score_entry(raw) {
            Some(entry) => entries.push(entry),
            None => warn!("[Store] Skipping malformed score {}", raw),
        }
    }
    debug!("[Store] Loaded {} scores", entries.len());
    Leaderboard::new(entries)
}

pub fn save_leaderboard(path: &Path, board: &Leaderboard) -> Result<(), StoreError> {
    write_document(
        path,
        &ScoresDocument {
            scores: board.entries(),
        },
    )?;
    info!("[Store] Saved {} scores", board.entries().len());
    Ok(())
}
