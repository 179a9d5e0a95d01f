use crate::answers::AnswerRepository;
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::questions::QuestionStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

pub struct AppState {
    pub answers: AnswerRepository,
    pub questions: QuestionStore,
    pub clock: Arc<dyn Clock>,
    pub max_request_body_bytes: usize,
    pub public_dir: PathBuf,
    pub index_path: PathBuf,
}

impl AppState {
    pub async fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let answers = AnswerRepository::connect(&cfg.database_path())
            .await
            .map_err(|e| {
                anyhow::anyhow!(
                    "Failed to open database '{}': {}",
                    cfg.database_path().display(),
                    e
                )
            })?;

        let questions = QuestionStore::new(cfg.questions_path());
        info!("Serving questions from '{}'", questions.path().display());

        let max_request_body_bytes = cfg.max_request_body_bytes();
        debug!("Maximum request body size: {} bytes", max_request_body_bytes);

        Ok(AppState {
            answers,
            questions,
            clock: Arc::new(SystemClock),
            max_request_body_bytes,
            public_dir: cfg.public_dir(),
            index_path: cfg.index_path(),
        })
    }
}
