// Presta Conta - Association Content Portal - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod config;
pub mod contact;     // Contact form validation + webhook delivery
pub mod entities;    // Content records (avisos, atividades, documentos, ...)
pub mod format;      // pt-BR display formatting
pub mod generator;   // Admin JSON generator
pub mod grouping;    // Grouping / filtering engine
pub mod load_state;  // Idle → Loading → Ready | Failed
pub mod loader;      // Static JSON resources
pub mod session;     // Login session context
pub mod temporal;    // Dates, years, month keys, calendar grid
pub mod views;       // Display-ready views

// Re-export commonly used types
pub use config::{init_logging, PortalConfig};
pub use contact::{
    submit, ContactError, ContactForm, ContactOutcome, ContactPayload, ContactTransport, FieldError,
};
pub use entities::{
    Activity, ActivityStatus, Attachment, BoardMember, BoardRoster, CouncilMember, Credential,
    Document, Notice, Photo, Record, Role, StatusFilter,
};
pub use generator::{GeneratorError, JsonGenerator};
pub use grouping::{
    compute_days_with_activity, filter_by_date_range, filter_by_search_term, filter_by_status,
    group_by_month_year, group_by_year, DocumentFilter, Groups,
};
pub use load_state::{LoadEvent, LoadState};
pub use loader::{
    load_board, load_collection, Collection, ContentError, ContentSource, DirectorySource,
    Loaded, MemorySource, RecordError,
};
pub use session::{AuthError, FileStore, MemoryStore, Session, SessionStore, SessionUser};
pub use temporal::{IsoDate, Month, MonthYear, Year};
pub use views::{
    ActivitiesView, CalendarView, DocumentsView, GalleryView, HomeView, NoticeDetail,
    NoticeListView, Portal,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
