use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_LISTEN: &str = "0.0.0.0:3000";
const DEFAULT_DATABASE_PATH: &str = "answers.db";
const DEFAULT_QUESTIONS_PATH: &str = "questions.json";
const DEFAULT_PUBLIC_DIR: &str = "public";
// 16 KB is far more than a `{"answer": n}` body ever needs
const DEFAULT_MAX_BODY_BYTES: usize = 16_384;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    pub listen: Option<String>,
    // SQLite file holding submitted answers; created if missing.
    pub database_path: Option<PathBuf>,
    // Static question file, read on every request so edits show up without a restart.
    pub questions_path: Option<PathBuf>,
    // Directory served for any path the API does not claim.
    pub public_dir: Option<PathBuf>,
    // Page served at `/`. Defaults to `index.html` inside `public_dir`.
    pub index_path: Option<PathBuf>,
    // Maximum submit body size in bytes. Larger bodies return 413 Payload Too Large.
    pub max_request_body_bytes: Option<usize>,
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let cfg_str = fs::read_to_string(path)?;
        Ok(toml::from_str(&cfg_str)?)
    }

    /// Loads `path` if it exists, otherwise falls back to the built-in defaults.
    pub fn load_or_default(path: &str) -> anyhow::Result<Self> {
        if Path::new(path).exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn listen(&self) -> &str {
        self.listen.as_deref().unwrap_or(DEFAULT_LISTEN)
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH))
    }

    pub fn questions_path(&self) -> PathBuf {
        self.questions_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_QUESTIONS_PATH))
    }

    pub fn public_dir(&self) -> PathBuf {
        self.public_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLIC_DIR))
    }

    pub fn index_path(&self) -> PathBuf {
        self.index_path
            .clone()
            .unwrap_or_else(|| self.public_dir().join("index.html"))
    }

    pub fn max_request_body_bytes(&self) -> usize {
        self.max_request_body_bytes.unwrap_or(DEFAULT_MAX_BODY_BYTES)
    }
}
