// 🛠️ Admin JSON generator - offline publish workflow
//
// 1. Load the current resource (pretty-printed) into an editor
// 2. Edit by hand
// 3. Generate: the text must parse; output is re-indented with 2 spaces
// 4. Download `<collection>.json` and place it in the data directory by hand
//
// Key order is preserved (serde_json `preserve_order`), so loading and
// generating without edits reproduces the pretty-printed original exactly.

use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::loader::{Collection, ContentError, ContentSource};

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("Erro ao analisar JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("{0} cannot be published from the generator")]
    NotPublishable(Collection),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Generator state for one collection
#[derive(Debug, Clone)]
pub struct JsonGenerator {
    collection: Collection,
    generated: Option<String>,
}

impl JsonGenerator {
    pub fn new(collection: Collection) -> Result<Self, GeneratorError> {
        if !collection.is_publishable() {
            return Err(GeneratorError::NotPublishable(collection));
        }
        Ok(JsonGenerator { collection, generated: None })
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    /// Current resource, pretty-printed for editing
    pub fn load_current<S: ContentSource + ?Sized>(&self, source: &S) -> Result<String, GeneratorError> {
        let text = source.fetch(self.collection)?;
        pretty(&text)
    }

    /// Validate edited text and keep the formatted result
    pub fn generate(&mut self, input: &str) -> Result<&str, GeneratorError> {
        let formatted = pretty(input)?;
        Ok(self.generated.insert(formatted).as_str())
    }

    /// Last generated text, if generation succeeded
    pub fn generated(&self) -> Option<&str> {
        self.generated.as_deref()
    }

    pub fn download_name(&self) -> String {
        self.collection.file_name()
    }

    /// Write the generated file into `dir`. Nothing is written before a
    /// successful `generate`.
    pub fn download(&self, dir: &Path) -> Result<Option<PathBuf>, GeneratorError> {
        let Some(text) = &self.generated else {
            return Ok(None);
        };

        let path = dir.join(self.download_name());
        std::fs::write(&path, text).map_err(|source| GeneratorError::Write {
            path: path.clone(),
            source,
        })?;

        info!(collection = %self.collection, path = %path.display(), "generated file written");
        Ok(Some(path))
    }
}

/// Parse and re-indent with two spaces
pub fn pretty(input: &str) -> Result<String, GeneratorError> {
    let value: Value = serde_json::from_str(input)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MemorySource;

    const AVISOS: &str = r#"[{"titulo":"Zeta","id":"2","conteudo":"Linha 1\nLinha 2","dataPublicacao":"2024-01-05","destaque":true,"arquivo":{"url":"/a.pdf","nome":"a.pdf","tipo":"pdf"}}]"#;

    #[test]
    fn test_generate_rejects_invalid_json() {
        let mut generator = JsonGenerator::new(Collection::Notices).unwrap();
        let err = generator.generate("[{\"id\": }]").unwrap_err();
        assert!(err.to_string().starts_with("Erro ao analisar JSON"));
        assert!(generator.generated().is_none());
    }

    #[test]
    fn test_generate_uses_two_space_indent_and_keeps_key_order() {
        let mut generator = JsonGenerator::new(Collection::Notices).unwrap();
        let text = generator.generate(AVISOS).unwrap();
        assert!(text.starts_with("[\n  {\n    \"titulo\": \"Zeta\",\n    \"id\": \"2\""));
    }

    #[test]
    fn test_round_trip_is_byte_for_byte() {
        let source = MemorySource::new().with(Collection::Notices, AVISOS);
        let mut generator = JsonGenerator::new(Collection::Notices).unwrap();

        let current = generator.load_current(&source).unwrap();
        let generated = generator.generate(&current).unwrap().to_string();
        assert_eq!(generated, current);

        let dir = tempfile::tempdir().unwrap();
        let path = generator.download(dir.path()).unwrap().unwrap();
        assert_eq!(path.file_name().unwrap(), "avisos.json");
        assert_eq!(std::fs::read_to_string(path).unwrap(), current);
    }

    #[test]
    fn test_download_requires_generation() {
        let generator = JsonGenerator::new(Collection::Board).unwrap();
        let dir = tempfile::tempdir().unwrap();
        assert!(generator.download(dir.path()).unwrap().is_none());
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_credentials_are_not_publishable() {
        assert!(matches!(
            JsonGenerator::new(Collection::Credentials),
            Err(GeneratorError::NotPublishable(Collection::Credentials))
        ));
    }
}
