//! Strategies for supplying tag values a file does not carry.
//!
//! The resolver only sees the [`ResolutionStrategy`] trait. The CLI picks an
//! implementation with `--on-missing`; tests use [`ScriptedAnswers`].

use std::collections::VecDeque;
use std::path::Path;

use async_trait::async_trait;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::error::{Error, Result};
use crate::metadata::TagField;

/// What a strategy decided for one missing field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldAnswer {
    /// Use this value and write it back to the file
    Value(String),
    /// Leave the file out of this run
    SkipFile,
}

/// Supplies a value for a required tag that is absent from a file.
///
/// `suggestion` is the value accepted for the previous file (artist, album)
/// or the file stem (title). It may block for as long as it needs.
#[async_trait]
pub trait ResolutionStrategy: Send {
    async fn resolve_missing_field(
        &mut self,
        path: &Path,
        field: TagField,
        suggestion: Option<&str>,
    ) -> Result<FieldAnswer>;
}

/// Asks the operator on the terminal, pre-filling the suggestion.
///
/// An empty answer accepts the suggestion. Ctrl-D skips the file, Ctrl-C
/// cancels the whole run.
#[derive(Debug, Default)]
pub struct InteractivePrompt;

#[async_trait]
impl ResolutionStrategy for InteractivePrompt {
    async fn resolve_missing_field(
        &mut self,
        path: &Path,
        field: TagField,
        suggestion: Option<&str>,
    ) -> Result<FieldAnswer> {
        let path = path.to_path_buf();
        let suggestion = suggestion.map(str::to_string);

        tokio::task::spawn_blocking(move || prompt(&path, field, suggestion.as_deref()))
            .await
            .map_err(|e| Error::Prompt(e.to_string()))?
    }
}

fn prompt(path: &Path, field: TagField, suggestion: Option<&str>) -> Result<FieldAnswer> {
    let mut editor = DefaultEditor::new().map_err(|e| Error::Prompt(e.to_string()))?;
    let label = prompt_label(field);

    println!("{} has no {} tag.", path.display(), field);

    loop {
        let line = match suggestion {
            Some(initial) => editor.readline_with_initial(&label, (initial, "")),
            None => editor.readline(&label),
        };

        match line {
            Ok(line) => {
                if let Some(answer) = interpret_answer(&line, suggestion) {
                    return Ok(FieldAnswer::Value(answer));
                }
            }
            Err(ReadlineError::Eof) => return Ok(FieldAnswer::SkipFile),
            Err(ReadlineError::Interrupted) => return Err(Error::Cancelled),
            Err(e) => return Err(Error::Prompt(e.to_string())),
        }
    }
}

fn prompt_label(field: TagField) -> String {
    match field {
        TagField::Artist => "Artist name: ".to_string(),
        TagField::Album => "Album name: ".to_string(),
        TagField::Title => "Track title: ".to_string(),
    }
}

/// Trimmed answer, or the suggestion when the answer is blank.
/// `None` means ask again.
fn interpret_answer(line: &str, suggestion: Option<&str>) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        suggestion.map(str::to_string)
    } else {
        Some(line.to_string())
    }
}

/// Answer for a batch strategy that has nothing of its own to offer.
///
/// A missing title takes the suggested file stem; anything else skips.
fn batch_fallback(field: TagField, suggestion: Option<&str>) -> FieldAnswer {
    match (field, suggestion) {
        (TagField::Title, Some(stem)) => FieldAnswer::Value(stem.to_string()),
        _ => FieldAnswer::SkipFile,
    }
}

/// Batch defaults per field. A field without a default skips the file,
/// except the title, which falls back to the file stem.
#[derive(Debug, Clone, Default)]
pub struct FixedAnswers {
    pub artist: Option<String>,
    pub album: Option<String>,
    pub title: Option<String>,
}

#[async_trait]
impl ResolutionStrategy for FixedAnswers {
    async fn resolve_missing_field(
        &mut self,
        _path: &Path,
        field: TagField,
        suggestion: Option<&str>,
    ) -> Result<FieldAnswer> {
        let value = match field {
            TagField::Artist => &self.artist,
            TagField::Album => &self.album,
            TagField::Title => &self.title,
        };
        Ok(match value {
            Some(value) => FieldAnswer::Value(value.clone()),
            None => batch_fallback(field, suggestion),
        })
    }
}

/// Replays a fixed sequence of answers, one per request.
///
/// Once the script is exhausted a missing title takes the file stem and
/// every other request skips the file.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAnswers {
    answers: VecDeque<String>,
}

impl ScriptedAnswers {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

#[async_trait]
impl ResolutionStrategy for ScriptedAnswers {
    async fn resolve_missing_field(
        &mut self,
        _path: &Path,
        field: TagField,
        suggestion: Option<&str>,
    ) -> Result<FieldAnswer> {
        Ok(match self.answers.pop_front() {
            Some(answer) => FieldAnswer::Value(answer),
            None => batch_fallback(field, suggestion),
        })
    }
}

/// Skips every file that is missing a required tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipMissing;

#[async_trait]
impl ResolutionStrategy for SkipMissing {
    async fn resolve_missing_field(
        &mut self,
        _path: &Path,
        _field: TagField,
        _suggestion: Option<&str>,
    ) -> Result<FieldAnswer> {
        Ok(FieldAnswer::SkipFile)
    }
}

/// Fails the file with [`Error::MissingField`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FailFast;

#[async_trait]
impl ResolutionStrategy for FailFast {
    async fn resolve_missing_field(
        &mut self,
        path: &Path,
        field: TagField,
        _suggestion: Option<&str>,
    ) -> Result<FieldAnswer> {
        Err(Error::MissingField {
            path: path.to_path_buf(),
            field,
        })
    }
}
