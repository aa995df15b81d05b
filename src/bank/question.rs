use serde::{Deserialize, Serialize};

/// Stable identifier for a question. Bank files mix bare integers and
/// strings; history dedup only needs equality, so both forms are kept as-is.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionId {
    Int(i64),
    Text(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Easy,
    Medium,
    Hard,
}

impl Level {
    /// Parse a free-text difficulty tag. Tags are trimmed and lowercased;
    /// anything unrecognized is no level at all.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "easy" => Some(Level::Easy),
            "medium" => Some(Level::Medium),
            "hard" => Some(Level::Hard),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Easy => "easy",
            Level::Medium => "medium",
            Level::Hard => "hard",
        }
    }
}

/// Requested difficulty for a selection: everything, or one specific level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelFilter {
    All,
    Only(Level),
}

impl LevelFilter {
    /// A question passes when no level is requested, when it carries no
    /// level tag at all, or when its tag parses to the requested level.
    /// Unparseable tags only ever match `All`.
    pub fn admits(self, question: &Question) -> bool {
        match self {
            LevelFilter::All => true,
            LevelFilter::Only(level) => match question.level.as_deref() {
                None => true,
                Some(tag) if tag.trim().is_empty() => true,
                Some(tag) => Level::parse(tag) == Some(level),
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LevelFilter::All => "all",
            LevelFilter::Only(level) => level.as_str(),
        }
    }
}

/// The stored `correct_answer` field before normalization: either already a
/// 0-based index into `choices`, or a raw value (letter or choice text).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Index(i64),
    Text(String),
}

/// One quiz item as it appears in the bank file. Every field is optional so
/// a collaborator-provided bank with ragged entries still loads whole.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default)]
    pub id: Option<QuestionId>,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub reading: Option<String>,
    #[serde(default)]
    pub choices: Vec<String>,
    #[serde(default)]
    pub correct_answer: Option<Answer>,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl Question {
    /// An item is usable if it has any content to show: a prompt, choices,
    /// or a reading passage.
    pub fn is_valid(&self) -> bool {
        self.question.as_deref().is_some_and(|s| !s.is_empty())
            || !self.choices.is_empty()
            || self.reading.as_deref().is_some_and(|s| !s.is_empty())
    }

    pub fn parsed_level(&self) -> Option<Level> {
        self.level.as_deref().and_then(Level::parse)
    }

    /// True when the user's 0-based choice index matches the (normalized)
    /// answer. An unresolved or absent answer never matches, so such a
    /// question simply grades as wrong rather than failing.
    pub fn is_correct_choice(&self, choice: usize) -> bool {
        matches!(self.correct_answer, Some(Answer::Index(i)) if i >= 0 && i as usize == choice)
    }

    /// Resolve `correct_answer` toward a canonical index into `choices`:
    /// integers pass through; a single letter maps by ordinal (`A` -> 0) when
    /// in bounds; otherwise the text is matched against the choices exactly,
    /// then case-insensitively. Anything still unresolved is left unchanged
    /// with no error raised.
    pub fn normalize_answer(&mut self) {
        let Some(Answer::Text(ref raw)) = self.correct_answer else {
            return;
        };
        let s = raw.trim().to_string();

        let mut chars = s.chars();
        if let (Some(ch), None) = (chars.next(), chars.next())
            && ch.is_ascii_alphabetic()
        {
            let idx = (ch.to_ascii_uppercase() as u8 - b'A') as usize;
            if idx < self.choices.len() {
                self.correct_answer = Some(Answer::Index(idx as i64));
                return;
            }
        }

        if let Some(idx) = self.choices.iter().position(|c| *c == s) {
            self.correct_answer = Some(Answer::Index(idx as i64));
            return;
        }

        let lowered = s.to_lowercase();
        if let Some(idx) = self
            .choices
            .iter()
            .position(|c| c.trim().to_lowercase() == lowered)
        {
            self.correct_answer = Some(Answer::Index(idx as i64));
        }
    }
}

/// Normalize every question's answer in place. Safe to call repeatedly:
/// already-canonical indices are untouched.
pub fn normalize_answers(questions: &mut [Question]) {
    for question in questions {
        question.normalize_answer();
    }
}
