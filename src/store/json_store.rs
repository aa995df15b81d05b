use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use rust_embed::Embed;
use serde::{Serialize, de::DeserializeOwned};

use crate::store::schema::{HistoryData, HistoryFile};

/// Starter question bank bundled with the binary, seeded into the data
/// directory on first run so a fresh install has content.
#[derive(Embed)]
#[folder = "assets/questions/"]
struct BankAssets;

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quizdr");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    pub fn bank_path(&self) -> PathBuf {
        self.file_path("questions.json")
    }

    /// A missing, unreadable, or malformed document loads as the default.
    /// Storage problems never become startup errors; they surface downstream
    /// as empty data.
    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => T::default(),
        }
    }

    /// Pretty-printed JSON (2-space indentation, non-ASCII preserved
    /// literally), written to a temp file, fsynced, then renamed over the
    /// target so a crash mid-write leaves the previous document intact.
    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Load the session history. A bare array of records (the pre-versioned
    /// layout of hand-maintained files) is accepted alongside the wrapped
    /// form; anything else loads as empty.
    pub fn load_history(&self) -> HistoryData {
        self.load::<HistoryFile>("history.json").into_data()
    }

    pub fn save_history(&self, data: &HistoryData) -> Result<()> {
        self.save("history.json", data)
    }

    /// First-run setup: data directory, an initialized (empty) history
    /// file, and a question bank seeded from the bundled starter set.
    /// Existing files are left untouched.
    pub fn ensure_ready(&self) -> Result<()> {
        fs::create_dir_all(&self.base_dir)?;

        if !self.file_path("history.json").exists() {
            self.save_history(&HistoryData::default())?;
        }

        let bank_path = self.bank_path();
        if !bank_path.exists()
            && let Some(starter) = BankAssets::get("starter.json")
        {
            fs::write(&bank_path, starter.data.as_ref())?;
        }

        Ok(())
    }
}
