use crate::error::LoadError;
use crate::models::Document;
use std::collections::BTreeMap;
use std::path::Path;

/// Parses a source file into a sequence of documents. An empty result means
/// the file was readable but carried no extractable text; the pipeline maps
/// that to its own error.
pub trait DocumentLoader {
    fn load(&self, path: &Path) -> Result<Vec<Document>, LoadError>;
}

/// PDF loader backed by lopdf, one document per page with readable text.
#[derive(Default)]
pub struct LopdfLoader;

impl DocumentLoader for LopdfLoader {
    fn load(&self, path: &Path) -> Result<Vec<Document>, LoadError> {
        let pdf = lopdf::Document::load(path)
            .map_err(|error| LoadError::PdfParse(error.to_string()))?;

        let source = path.to_string_lossy().to_string();
        let mut documents = Vec::new();

        for (page_no, _page_id) in pdf.get_pages() {
            let text = pdf
                .extract_text(&[page_no])
                .map_err(|error| LoadError::PdfParse(error.to_string()))?;

            if text.trim().is_empty() {
                continue;
            }

            let mut metadata = BTreeMap::new();
            metadata.insert("source".to_string(), source.clone());
            metadata.insert("page".to_string(), page_no.to_string());
            documents.push(Document::new(text, metadata));
        }

        Ok(documents)
    }
}
