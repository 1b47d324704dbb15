// 🖼️ Views - display-ready models built from the engine
//
// Each view loads its collections through the same `LoadState` machine and
// renders failures as an empty collection with a "nothing found" message.
// Views own their data so they can be serialized by the API server or drawn
// by the terminal UI.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use crate::entities::{
    Activity, BoardRoster, Credential, Document, Notice, Photo, Record, StatusFilter,
};
use crate::format::{format_day, format_day_and_month};
use crate::grouping::{
    compute_days_with_activity, distinct_types, distinct_years, filter_by_date_range,
    filter_by_search_term, filter_by_status, filter_documents, group_by_month_year,
    group_by_year, group_photos_by_event, latest, latest_by_year, sort_descending_by_date,
    upcoming_activities, DocumentFilter,
};
use crate::load_state::LoadState;
use crate::loader::{load_board, load_collection, Collection, ContentSource};
use crate::temporal::{calendar_weeks, MonthYear};

/// Home page limits
pub const HOME_NOTICES: usize = 3;
pub const HOME_DOCUMENTS: usize = 3;
pub const HOME_PHOTOS: usize = 4;
pub const HOME_ACTIVITIES: usize = 2;

// ============================================================================
// SHARED
// ============================================================================

/// One rendered group: key, heading and records in display order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayGroup<R> {
    pub key: String,
    pub label: String,
    pub items: Vec<R>,
}

/// Load one collection through the state machine; bad records are skipped
/// by the loader and a failed collection is logged here.
pub fn load_list<R, S>(source: &S, collection: Collection) -> LoadState<Vec<R>>
where
    R: Record,
    S: ContentSource + ?Sized,
{
    let loaded = load_collection::<R, S>(source, collection).map(|loaded| loaded.records);
    let state = LoadState::default().resolve(loaded);
    if let Some(reason) = state.error() {
        warn!(%collection, %reason, "collection unavailable, showing empty view");
    }
    state
}

// ============================================================================
// PORTAL
// ============================================================================

/// Entry point for every view over one content source
#[derive(Debug, Clone)]
pub struct Portal<S: ContentSource> {
    source: S,
}

impl<S: ContentSource> Portal<S> {
    pub fn new(source: S) -> Self {
        Portal { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn notices(&self, term: &str) -> NoticeListView {
        NoticeListView::build(load_list(&self.source, Collection::Notices), term)
    }

    pub fn notice(&self, id: &str) -> NoticeDetail {
        match load_list::<Notice, _>(&self.source, Collection::Notices) {
            LoadState::Ready(notices) => notices
                .into_iter()
                .find(|n| n.id == id)
                .map(NoticeDetail::Found)
                .unwrap_or(NoticeDetail::NotFound),
            LoadState::Failed(reason) => NoticeDetail::Unavailable { reason },
            _ => NoticeDetail::NotFound,
        }
    }

    pub fn activities(&self, filter: StatusFilter) -> ActivitiesView {
        ActivitiesView::build(load_list(&self.source, Collection::Activities), filter)
    }

    pub fn documents(&self, filter: &DocumentFilter) -> DocumentsView {
        DocumentsView::build(load_list(&self.source, Collection::Documents), filter)
    }

    pub fn gallery(&self) -> GalleryView {
        GalleryView::build(load_list(&self.source, Collection::Photos))
    }

    pub fn calendar(&self, month: MonthYear, selected: Option<NaiveDate>, today: NaiveDate) -> CalendarView {
        CalendarView::build(load_list(&self.source, Collection::Activities), month, selected, today)
    }

    pub fn board(&self) -> LoadState<BoardRoster> {
        let state = LoadState::default().resolve(load_board(&self.source));
        if let Some(reason) = state.error() {
            warn!(%reason, "board roster unavailable");
        }
        state
    }

    /// Empty when the credential list cannot be read
    pub fn credentials(&self) -> Vec<Credential> {
        load_list::<Credential, _>(&self.source, Collection::Credentials)
            .items_or_empty()
            .to_vec()
    }

    /// Loads the four home collections, then assembles the page at once.
    pub fn home(&self, today: NaiveDate) -> HomeView {
        let notices = load_list(&self.source, Collection::Notices);
        let documents = load_list(&self.source, Collection::Documents);
        let photos = load_list(&self.source, Collection::Photos);
        let activities = load_list(&self.source, Collection::Activities);
        HomeView::assemble(notices, documents, photos, activities, today)
    }
}

// ============================================================================
// HOME
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeView {
    pub notices: Vec<Notice>,
    pub featured: Vec<Notice>,
    pub documents: Vec<Document>,
    pub photos: Vec<Photo>,
    pub upcoming: Vec<Activity>,
    /// Collections that failed and render empty
    pub unavailable: Vec<Collection>,
}

impl HomeView {
    /// Only called once every load has settled.
    pub fn assemble(
        notices: LoadState<Vec<Notice>>,
        documents: LoadState<Vec<Document>>,
        photos: LoadState<Vec<Photo>>,
        activities: LoadState<Vec<Activity>>,
        today: NaiveDate,
    ) -> HomeView {
        let mut unavailable = Vec::new();
        for (collection, failed) in [
            (Collection::Notices, notices.error().is_some()),
            (Collection::Documents, documents.error().is_some()),
            (Collection::Photos, photos.error().is_some()),
            (Collection::Activities, activities.error().is_some()),
        ] {
            if failed {
                unavailable.push(collection);
            }
        }

        let all_notices = notices.items_or_empty();
        let featured: Vec<Notice> = latest(all_notices.iter().filter(|n| n.destaque), HOME_NOTICES)
            .into_iter()
            .cloned()
            .collect();

        HomeView {
            notices: latest(all_notices, HOME_NOTICES).into_iter().cloned().collect(),
            featured,
            documents: latest_by_year(documents.items_or_empty(), HOME_DOCUMENTS)
                .into_iter()
                .cloned()
                .collect(),
            photos: latest(photos.items_or_empty(), HOME_PHOTOS).into_iter().cloned().collect(),
            upcoming: upcoming_activities(activities.items_or_empty(), today, HOME_ACTIVITIES)
                .into_iter()
                .cloned()
                .collect(),
            unavailable,
        }
    }
}

// ============================================================================
// NOTICES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoticeListView {
    pub term: String,
    pub notices: Vec<Notice>,
    pub empty_message: Option<String>,
}

impl NoticeListView {
    pub fn build(state: LoadState<Vec<Notice>>, term: &str) -> Self {
        let sorted = sort_descending_by_date(state.items_or_empty());
        let notices: Vec<Notice> = filter_by_search_term(sorted, term).into_iter().cloned().collect();

        let empty_message = notices.is_empty().then(|| {
            if term.trim().is_empty() {
                "Nenhum aviso disponível no momento.".to_string()
            } else {
                format!("Nenhum aviso encontrado para \"{}\".", term.trim())
            }
        });

        NoticeListView {
            term: term.to_string(),
            notices,
            empty_message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", content = "notice", rename_all = "lowercase")]
pub enum NoticeDetail {
    Found(Notice),
    NotFound,
    Unavailable { reason: String },
}

// ============================================================================
// ACTIVITIES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivitiesView {
    pub filter: String,
    pub total: usize,
    pub groups: Vec<DisplayGroup<Activity>>,
    pub empty_message: Option<String>,
}

impl ActivitiesView {
    pub fn build(state: LoadState<Vec<Activity>>, filter: StatusFilter) -> Self {
        let sorted = sort_descending_by_date(state.items_or_empty());
        let filtered = filter_by_status(sorted, filter);
        let total = filtered.len();

        let groups = group_by_month_year(filtered)
            .into_descending()
            .into_iter()
            .map(|(month, items)| DisplayGroup {
                key: month.key(),
                label: month.label(),
                items: items.into_iter().cloned().collect(),
            })
            .collect();

        let empty_message = (total == 0).then(|| match filter {
            StatusFilter::All => "Não há atividades disponíveis no momento.".to_string(),
            StatusFilter::Only(status) => {
                format!("Não existem atividades com o status \"{}\".", status.label())
            }
        });

        ActivitiesView {
            filter: filter.to_string(),
            total,
            groups,
            empty_message,
        }
    }
}

// ============================================================================
// DOCUMENTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentsView {
    /// Filter options, first-seen order
    pub years: Vec<String>,
    pub types: Vec<String>,
    pub total: usize,
    pub groups: Vec<DisplayGroup<Document>>,
    pub filters_active: bool,
    pub empty_message: Option<String>,
}

impl DocumentsView {
    pub fn build(state: LoadState<Vec<Document>>, filter: &DocumentFilter) -> Self {
        let all = latest_by_year(state.items_or_empty(), usize::MAX);
        let filtered = filter_documents(all.iter().copied(), filter);
        let total = filtered.len();

        let groups = group_by_year(filtered)
            .into_descending()
            .into_iter()
            .map(|(year, items)| DisplayGroup {
                key: year.to_string(),
                label: year.to_string(),
                items: items.into_iter().cloned().collect(),
            })
            .collect();

        DocumentsView {
            years: distinct_years(all.iter().copied()).iter().map(|y| y.to_string()).collect(),
            types: distinct_types(all.iter().copied()).iter().map(|t| t.to_string()).collect(),
            total,
            groups,
            filters_active: filter.is_active(),
            empty_message: (total == 0).then(|| {
                "Não foram encontrados documentos correspondentes aos critérios de pesquisa.".to_string()
            }),
        }
    }
}

// ============================================================================
// GALLERY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryEvent {
    pub titulo: String,
    pub date: String,
    pub photos: Vec<Photo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryView {
    pub total: usize,
    pub months: Vec<DisplayGroup<GalleryEvent>>,
    pub empty_message: Option<String>,
}

impl GalleryView {
    pub fn build(state: LoadState<Vec<Photo>>) -> Self {
        let sorted = sort_descending_by_date(state.items_or_empty());
        let total = sorted.len();

        let months = group_by_month_year(sorted)
            .into_descending()
            .into_iter()
            .map(|(month, photos)| DisplayGroup {
                key: month.key(),
                label: month.label(),
                items: group_photos_by_event(photos)
                    .into_iter()
                    .map(|event| GalleryEvent {
                        titulo: event.titulo.to_string(),
                        date: format_day(event.day),
                        photos: event.photos.into_iter().cloned().collect(),
                    })
                    .collect(),
            })
            .collect();

        GalleryView {
            total,
            months,
            empty_message: (total == 0).then(|| "Nenhuma foto disponível na galeria.".to_string()),
        }
    }
}

// ============================================================================
// CALENDAR
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalendarCell {
    pub day: NaiveDate,
    pub has_activity: bool,
    pub is_today: bool,
    pub is_selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarView {
    pub month: MonthYear,
    pub label: String,
    pub previous: MonthYear,
    pub next: MonthYear,
    /// Sunday-first weeks; `None` pads days outside the month
    pub weeks: Vec<[Option<CalendarCell>; 7]>,
    pub selected_day: Option<NaiveDate>,
    pub selected_label: Option<String>,
    pub selected_activities: Vec<Activity>,
}

impl CalendarView {
    pub fn build(
        state: LoadState<Vec<Activity>>,
        month: MonthYear,
        selected: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        let activities = state.items_or_empty();
        let marked = compute_days_with_activity(activities);

        let weeks = calendar_weeks(month)
            .into_iter()
            .map(|week| {
                week.map(|slot| {
                    slot.map(|day| CalendarCell {
                        day,
                        has_activity: marked.contains(&day),
                        is_today: day == today,
                        is_selected: selected == Some(day),
                    })
                })
            })
            .collect();

        let selected_activities = selected
            .map(|day| filter_by_date_range(day, activities).into_iter().cloned().collect())
            .unwrap_or_default();

        CalendarView {
            month,
            label: month.label(),
            previous: month.previous(),
            next: month.next(),
            weeks,
            selected_day: selected,
            selected_label: selected.map(format_day_and_month),
            selected_activities,
        }
    }

    pub fn days_with_activity(&self) -> usize {
        self.weeks
            .iter()
            .flatten()
            .flatten()
            .filter(|cell| cell.has_activity)
            .count()
    }
}

// ============================================================================
// TESTS
// ============================================================================
