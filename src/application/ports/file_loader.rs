use async_trait::async_trait;

use crate::domain::ScriptDocument;

/// Text extraction collaborator: turns an uploaded file into a flat line stream.
#[async_trait]
pub trait FileLoader: Send + Sync {
    async fn extract_text(
        &self,
        data: &[u8],
        document: &ScriptDocument,
    ) -> Result<String, FileLoaderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FileLoaderError {
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
    #[error("no text could be recovered from {0}")]
    NoTextFound(String),
}
