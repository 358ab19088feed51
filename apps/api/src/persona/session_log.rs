//! Session Logger — append-only audit trails for unanswered questions and
//! captured contact requests.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{fs::OpenOptions, io::AsyncWriteExt};
use tracing::info;

#[async_trait]
pub trait SessionLog: Send + Sync {
    /// Records a question the resume could not answer.
    async fn log_unknown(&self, question: &str) -> std::io::Result<()>;

    /// Records a visitor's email together with their reason for reaching out.
    async fn log_contact(&self, email: &str, context: &str) -> std::io::Result<()>;
}

pub fn unknown_line(question: &str) -> String {
    format!("{}\n", single_line(question))
}

pub fn contact_line(email: &str, context: &str) -> String {
    format!("email: {} | context: {}\n", email, single_line(context))
}

/// Folds embedded line breaks into spaces so each entry stays on one line.
fn single_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Plain text files in the working directory, one entry per line.
#[derive(Debug, Clone)]
pub struct FileSessionLog {
    unknown_path: PathBuf,
    contact_path: PathBuf,
}

impl FileSessionLog {
    pub fn new(unknown_path: impl Into<PathBuf>, contact_path: impl Into<PathBuf>) -> Self {
        Self {
            unknown_path: unknown_path.into(),
            contact_path: contact_path.into(),
        }
    }

    async fn append(path: &Path, line: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }
}

#[async_trait]
impl SessionLog for FileSessionLog {
    async fn log_unknown(&self, question: &str) -> std::io::Result<()> {
        Self::append(&self.unknown_path, &unknown_line(question)).await?;
        info!(path = %self.unknown_path.display(), "Logged unanswered question");
        Ok(())
    }

    async fn log_contact(&self, email: &str, context: &str) -> std::io::Result<()> {
        Self::append(&self.contact_path, &contact_line(email, context)).await?;
        info!(path = %self.contact_path.display(), email, "Logged contact request");
        Ok(())
    }
}
