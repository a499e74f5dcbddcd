use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, ScriptDocument};

use super::{PdfAdapter, PlainTextAdapter};

/// Dispatches extraction to the loader registered for the document's type.
pub struct CompositeFileLoader {
    loaders: HashMap<ContentType, Arc<dyn FileLoader>>,
}

impl CompositeFileLoader {
    pub fn new(loaders: Vec<(ContentType, Arc<dyn FileLoader>)>) -> Self {
        Self {
            loaders: loaders.into_iter().collect(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(vec![
            (ContentType::Pdf, Arc::new(PdfAdapter::new())),
            (ContentType::Text, Arc::new(PlainTextAdapter)),
        ])
    }
}

#[async_trait]
impl FileLoader for CompositeFileLoader {
    async fn extract_text(
        &self,
        data: &[u8],
        document: &ScriptDocument,
    ) -> Result<String, FileLoaderError> {
        let loader = self.loaders.get(&document.content_type).ok_or_else(|| {
            FileLoaderError::UnsupportedContentType(document.content_type.as_mime().to_string())
        })?;

        loader.extract_text(data, document).await
    }
}
