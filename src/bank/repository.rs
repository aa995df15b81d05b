use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::bank::question::Question;

/// Comparison key for package names: surrounding whitespace ignored,
/// case ignored.
pub fn norm_package(name: &str) -> String {
    name.trim().to_lowercase()
}

/// The raw question bank, loaded once at startup. All accessors hand out
/// independent clones; the stored items are never mutated.
#[derive(Clone, Debug, Default)]
pub struct QuestionBank {
    items: Vec<Question>,
}

impl QuestionBank {
    /// Lenient load: a missing, unreadable, or malformed bank file is an
    /// empty bank, never a startup error. Downstream this surfaces as
    /// "no questions available" rather than a crash.
    pub fn load(path: &Path) -> Self {
        let items = fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();
        Self { items }
    }

    pub fn from_items(items: Vec<Question>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Distinct non-empty package labels, case-sensitive as stored (but
    /// trimmed), sorted ascending.
    pub fn packages(&self) -> Vec<String> {
        let mut packages = BTreeSet::new();
        for item in &self.items {
            if let Some(package) = item.package.as_deref() {
                let trimmed = package.trim();
                if !trimmed.is_empty() {
                    packages.insert(trimmed.to_string());
                }
            }
        }
        packages.into_iter().collect()
    }

    /// Valid questions for a package, each an independent clone.
    ///
    /// An empty target returns every valid question in the bank. Otherwise
    /// the normalized target must equal the question's normalized package;
    /// when nothing matches exactly, a substring match is tried so that
    /// e.g. "math" still finds "Math A".
    pub fn questions_for_package(&self, pkg_name: &str) -> Vec<Question> {
        if pkg_name.trim().is_empty() {
            return self
                .items
                .iter()
                .filter(|q| q.is_valid())
                .cloned()
                .collect();
        }

        let target = norm_package(pkg_name);
        let exact: Vec<Question> = self
            .items
            .iter()
            .filter(|q| q.is_valid() && self.package_key(q) == target)
            .cloned()
            .collect();
        if !exact.is_empty() {
            return exact;
        }

        self.items
            .iter()
            .filter(|q| q.is_valid() && self.package_key(q).contains(&target))
            .cloned()
            .collect()
    }

    fn package_key(&self, question: &Question) -> String {
        norm_package(question.package.as_deref().unwrap_or(""))
    }
}
