// 📂 Entity Loader - static JSON resources
//
// One resource per collection. A collection that cannot be fetched or is not
// a JSON array fails as a whole; inside a good array each record is decoded
// and validated on its own, and bad records are skipped and logged.

use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

use crate::entities::{BoardRoster, Record};

// ============================================================================
// COLLECTIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Collection {
    Notices,
    Activities,
    Documents,
    Photos,
    Board,
    Credentials,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::Notices,
        Collection::Activities,
        Collection::Documents,
        Collection::Photos,
        Collection::Board,
        Collection::Credentials,
    ];

    /// Resources the admin generator may publish (credentials are excluded)
    pub const PUBLISHABLE: [Collection; 5] = [
        Collection::Notices,
        Collection::Photos,
        Collection::Documents,
        Collection::Activities,
        Collection::Board,
    ];

    /// Resource name, also the file stem
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Notices => "avisos",
            Collection::Activities => "atividades",
            Collection::Documents => "documentos",
            Collection::Photos => "galeria",
            Collection::Board => "diretoria",
            Collection::Credentials => "usuarios",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.name())
    }

    pub fn title(&self) -> &'static str {
        match self {
            Collection::Notices => "Avisos",
            Collection::Activities => "Atividades",
            Collection::Documents => "Documentos",
            Collection::Photos => "Galeria",
            Collection::Board => "Diretoria",
            Collection::Credentials => "Usuários",
        }
    }

    pub fn is_publishable(&self) -> bool {
        Self::PUBLISHABLE.contains(self)
    }
}

impl FromStr for Collection {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().trim_end_matches(".json").to_lowercase();
        Collection::ALL
            .iter()
            .copied()
            .find(|c| c.name() == wanted)
            .ok_or(ContentError::UnknownCollection(s.to_string()))
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("unknown collection '{0}'")]
    UnknownCollection(String),

    #[error("failed to fetch {collection}: {source}")]
    Fetch {
        collection: Collection,
        #[source]
        source: std::io::Error,
    },

    #[error("{collection} is not valid JSON: {source}")]
    Parse {
        collection: Collection,
        #[source]
        source: serde_json::Error,
    },

    #[error("{collection} must be a JSON array")]
    NotAnArray { collection: Collection },
}

/// A record that was skipped while loading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordError {
    pub index: usize,
    pub id: Option<String>,
    pub reason: String,
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "record #{} (id {}): {}", self.index, id, self.reason),
            None => write!(f, "record #{}: {}", self.index, self.reason),
        }
    }
}

/// Records that passed validation plus the ones that were skipped
#[derive(Debug, Clone)]
pub struct Loaded<R> {
    pub records: Vec<R>,
    pub errors: Vec<RecordError>,
}

impl<R> Loaded<R> {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

// ============================================================================
// SOURCES
// ============================================================================

/// Where collection text comes from.
pub trait ContentSource {
    fn fetch(&self, collection: Collection) -> Result<String, ContentError>;
}

/// `<dir>/<collection>.json` on disk
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectorySource { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, collection: Collection) -> PathBuf {
        self.root.join(collection.file_name())
    }
}

impl ContentSource for DirectorySource {
    fn fetch(&self, collection: Collection) -> Result<String, ContentError> {
        let path = self.path_for(collection);
        debug!(path = %path.display(), "fetching collection");
        std::fs::read_to_string(&path).map_err(|source| ContentError::Fetch { collection, source })
    }
}

/// In-memory resources; missing collections fail like a missing file.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    resources: HashMap<Collection, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, collection: Collection, text: impl Into<String>) -> Self {
        self.resources.insert(collection, text.into());
        self
    }
}

impl ContentSource for MemorySource {
    fn fetch(&self, collection: Collection) -> Result<String, ContentError> {
        self.resources.get(&collection).cloned().ok_or_else(|| ContentError::Fetch {
            collection,
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "resource not found"),
        })
    }
}

impl<S: ContentSource + ?Sized> ContentSource for &S {
    fn fetch(&self, collection: Collection) -> Result<String, ContentError> {
        (**self).fetch(collection)
    }
}

// ============================================================================
// LOADING
// ============================================================================

/// Fetch and decode one collection, skipping records that fail.
pub fn load_collection<R, S>(source: &S, collection: Collection) -> Result<Loaded<R>, ContentError>
where
    R: Record,
    S: ContentSource + ?Sized,
{
    let text = source.fetch(collection)?;
    let loaded = decode_collection(collection, &text)?;

    for error in &loaded.errors {
        warn!(%collection, %error, "skipping record");
    }
    debug!(
        %collection,
        loaded = loaded.records.len(),
        skipped = loaded.errors.len(),
        "collection loaded"
    );

    Ok(loaded)
}

/// Decode collection text (already fetched).
pub fn decode_collection<R: Record>(collection: Collection, text: &str) -> Result<Loaded<R>, ContentError> {
    let value: Value =
        serde_json::from_str(text).map_err(|source| ContentError::Parse { collection, source })?;

    let items = match value {
        Value::Array(items) => items,
        _ => return Err(ContentError::NotAnArray { collection }),
    };

    let mut records = Vec::with_capacity(items.len());
    let mut errors = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();

    for (index, item) in items.into_iter().enumerate() {
        let raw_id = item.get("id").and_then(value_as_id);

        let record: R = match serde_json::from_value(item) {
            Ok(record) => record,
            Err(e) => {
                errors.push(RecordError { index, id: raw_id, reason: e.to_string() });
                continue;
            }
        };

        if let Err(reason) = record.validate() {
            errors.push(RecordError { index, id: raw_id, reason });
            continue;
        }

        if !seen_ids.insert(record.id().to_string()) {
            errors.push(RecordError {
                index,
                id: raw_id,
                reason: "duplicate id".to_string(),
            });
            continue;
        }

        records.push(record);
    }

    Ok(Loaded { records, errors })
}

/// Board roster is a single object.
pub fn load_board<S: ContentSource + ?Sized>(source: &S) -> Result<BoardRoster, ContentError> {
    let text = source.fetch(Collection::Board)?;
    serde_json::from_str(&text).map_err(|source| ContentError::Parse {
        collection: Collection::Board,
        source,
    })
}

fn value_as_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Activity, Notice};

    const ACTIVITIES: &str = r#"[
        {"id": "1", "titulo": "Reunião", "descricao": "", "dataInicio": "2024-01-05",
         "dataFim": "2024-01-05", "local": "Sede", "status": "agendado"},
        {"id": "2", "titulo": "Data ruim", "descricao": "", "dataInicio": "05/01/2024",
         "dataFim": "2024-01-05", "local": "Sede", "status": "agendado"},
        {"id": "3", "titulo": "Status ruim", "descricao": "", "dataInicio": "2024-01-05",
         "dataFim": "2024-01-05", "local": "Sede", "status": "adiado"},
        {"id": "1", "titulo": "Duplicada", "descricao": "", "dataInicio": "2024-01-06",
         "dataFim": "2024-01-06", "local": "Sede", "status": "agendado"},
        {"id": "4", "titulo": "", "descricao": "", "dataInicio": "2024-01-07",
         "dataFim": "2024-01-07", "local": "Sede", "status": "concluido"}
    ]"#;

    #[test]
    fn test_collection_names_round_trip() {
        for collection in Collection::ALL {
            assert_eq!(collection.name().parse::<Collection>().unwrap(), collection);
        }
        assert_eq!("galeria.json".parse::<Collection>().unwrap(), Collection::Photos);
        assert!("fotos".parse::<Collection>().is_err());
        assert!(!Collection::Credentials.is_publishable());
    }

    #[test]
    fn test_bad_records_are_skipped_not_fatal() {
        let source = MemorySource::new().with(Collection::Activities, ACTIVITIES);
        let loaded: Loaded<Activity> = load_collection(&source, Collection::Activities).unwrap();

        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0].id, "1");

        let skipped: Vec<usize> = loaded.errors.iter().map(|e| e.index).collect();
        assert_eq!(skipped, vec![1, 2, 3, 4]);
        assert_eq!(loaded.errors[2].reason, "duplicate id");
        assert_eq!(loaded.errors[0].id.as_deref(), Some("2"));
    }

    #[test]
    fn test_collection_level_failures() {
        let source = MemorySource::new()
            .with(Collection::Notices, "{ not json")
            .with(Collection::Documents, r#"{"id": "1"}"#);

        assert!(matches!(
            load_collection::<Notice, _>(&source, Collection::Notices),
            Err(ContentError::Parse { .. })
        ));
        assert!(matches!(
            load_collection::<Notice, _>(&source, Collection::Documents),
            Err(ContentError::NotAnArray { .. })
        ));
        assert!(matches!(
            load_collection::<Notice, _>(&source, Collection::Photos),
            Err(ContentError::Fetch { .. })
        ));
    }

    #[test]
    fn test_directory_source_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("avisos.json"),
            r#"[{"id": "n1", "titulo": "Aviso", "conteudo": "Texto", "dataPublicacao": "2024-02-01"}]"#,
        )
        .unwrap();

        let source = DirectorySource::new(dir.path());
        let loaded: Loaded<Notice> = load_collection(&source, Collection::Notices).unwrap();
        assert!(loaded.is_clean());
        assert_eq!(loaded.records[0].titulo, "Aviso");
    }

    #[test]
    fn test_load_board() {
        let source = MemorySource::new().with(
            Collection::Board,
            r#"{"mandato": "2023-2025",
                "diretoriaExecutiva": [{"cargo": "Presidente", "nome": "Ana"}],
                "conselhoFiscal": [{"nome": "Bruno"}],
                "suplentesConselhoFiscal": []}"#,
        );
        let board = load_board(&source).unwrap();
        assert_eq!(board.mandato, "2023-2025");
        assert_eq!(board.member_count(), 2);
    }
}
