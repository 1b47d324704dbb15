// 🗂️ Grouping & Filtering Engine
//
// Pure functions over record collections. Nothing here mutates its input;
// every function takes anything iterable (owned records or references) and
// returns a new collection in the same element type.
//
// Invariants:
// - Grouping is a partition: every input record lands in exactly one group
// - Records inside a group keep their relative input order
// - Group order comes from the numeric key, never from the rendered string
//   ("2024-10" sorts after "2024-9")

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::entities::{Dated, Document, HasStatus, Photo, Scheduled, Searchable, StatusFilter, Yearly};
use crate::temporal::{days_in_interval, MonthYear, Year};

// ============================================================================
// GROUPS
// ============================================================================

/// Records partitioned by a derived key. Recomputed on every read.
#[derive(Debug, Clone, PartialEq)]
pub struct Groups<K: Ord, R> {
    groups: BTreeMap<K, Vec<R>>,
}

impl<K: Ord, R> Groups<K, R> {
    fn collect<I, F>(records: I, key_of: F) -> Self
    where
        I: IntoIterator<Item = R>,
        F: Fn(&R) -> K,
    {
        let mut groups: BTreeMap<K, Vec<R>> = BTreeMap::new();
        for record in records {
            groups.entry(key_of(&record)).or_default().push(record);
        }
        Groups { groups }
    }

    /// Newest group first (reverse-chronological display order)
    pub fn descending(&self) -> impl Iterator<Item = (&K, &[R])> {
        self.groups.iter().rev().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn ascending(&self) -> impl Iterator<Item = (&K, &[R])> {
        self.groups.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn get(&self, key: &K) -> Option<&[R]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.groups.keys()
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of records across all groups
    pub fn record_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn into_descending(self) -> Vec<(K, Vec<R>)> {
        self.groups.into_iter().rev().collect()
    }
}

/// Partition by `(year, month)` of the primary date.
pub fn group_by_month_year<R, I>(records: I) -> Groups<MonthYear, R>
where
    R: Dated,
    I: IntoIterator<Item = R>,
{
    Groups::collect(records, |r| r.primary_date().month_year())
}

/// Partition by year alone.
pub fn group_by_year<R, I>(records: I) -> Groups<Year, R>
where
    R: Yearly,
    I: IntoIterator<Item = R>,
{
    Groups::collect(records, |r| r.year())
}

// ============================================================================
// FILTERS
// ============================================================================

/// Identity for `StatusFilter::All`, exact match otherwise. Order preserved.
pub fn filter_by_status<R, I>(records: I, filter: StatusFilter) -> Vec<R>
where
    R: HasStatus,
    I: IntoIterator<Item = R>,
{
    records
        .into_iter()
        .filter(|r| filter.matches(r.status()))
        .collect()
}

/// Case-insensitive substring match on any searchable field.
/// A blank term matches everything.
pub fn filter_by_search_term<R, I>(records: I, term: &str) -> Vec<R>
where
    R: Searchable,
    I: IntoIterator<Item = R>,
{
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return records.into_iter().collect();
    }

    records
        .into_iter()
        .filter(|r| {
            r.search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Records whose `[start, end]` interval contains `day` (inclusive).
pub fn filter_by_date_range<R, I>(day: NaiveDate, records: I) -> Vec<R>
where
    R: Scheduled,
    I: IntoIterator<Item = R>,
{
    records
        .into_iter()
        .filter(|r| r.start_day() <= day && day <= r.end_day())
        .collect()
}

/// Every calendar day covered by at least one record.
pub fn compute_days_with_activity<R, I>(records: I) -> BTreeSet<NaiveDate>
where
    R: Scheduled,
    I: IntoIterator<Item = R>,
{
    records
        .into_iter()
        .flat_map(|r| days_in_interval(r.start_day(), r.end_day()))
        .collect()
}

// ============================================================================
// DOCUMENT FILTERS
// ============================================================================

/// Document page filters. `None` means "all" for type and year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentFilter {
    pub tipo: Option<String>,
    pub ano: Option<Year>,
    pub term: String,
}

impl DocumentFilter {
    pub fn is_active(&self) -> bool {
        self.tipo.is_some() || self.ano.is_some() || !self.term.trim().is_empty()
    }
}

pub fn filter_documents<'a, I>(documents: I, filter: &DocumentFilter) -> Vec<&'a Document>
where
    I: IntoIterator<Item = &'a Document>,
{
    let narrowed = documents.into_iter().filter(|d| {
        filter.tipo.as_deref().map_or(true, |t| d.tipo == t)
            && filter.ano.map_or(true, |a| d.ano == a)
    });
    filter_by_search_term(narrowed, &filter.term)
}

/// Distinct years in first-seen order
pub fn distinct_years<'a, I>(documents: I) -> Vec<Year>
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut seen = Vec::new();
    for doc in documents {
        if !seen.contains(&doc.ano) {
            seen.push(doc.ano);
        }
    }
    seen
}

/// Distinct type tags in first-seen order
pub fn distinct_types<'a, I>(documents: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut seen: Vec<&str> = Vec::new();
    for doc in documents {
        if !seen.contains(&doc.tipo.as_str()) {
            seen.push(&doc.tipo);
        }
    }
    seen
}

// ============================================================================
// ORDERING / SELECTION
// ============================================================================

/// Stable sort, newest primary date first.
pub fn sort_descending_by_date<R, I>(records: I) -> Vec<R>
where
    R: Dated,
    I: IntoIterator<Item = R>,
{
    let mut sorted: Vec<R> = records.into_iter().collect();
    sorted.sort_by(|a, b| b.primary_date().timestamp().cmp(&a.primary_date().timestamp()));
    sorted
}

/// The `limit` most recent records.
pub fn latest<R, I>(records: I, limit: usize) -> Vec<R>
where
    R: Dated,
    I: IntoIterator<Item = R>,
{
    let mut sorted = sort_descending_by_date(records);
    sorted.truncate(limit);
    sorted
}

/// The `limit` most recent records by year (stable within a year).
pub fn latest_by_year<R, I>(records: I, limit: usize) -> Vec<R>
where
    R: Yearly,
    I: IntoIterator<Item = R>,
{
    let mut sorted: Vec<R> = records.into_iter().collect();
    sorted.sort_by(|a, b| b.year().cmp(&a.year()));
    sorted.truncate(limit);
    sorted
}

/// Activities starting strictly after `today`, soonest first.
pub fn upcoming_activities<R, I>(records: I, today: NaiveDate, limit: usize) -> Vec<R>
where
    R: Scheduled + Dated,
    I: IntoIterator<Item = R>,
{
    let mut upcoming: Vec<R> = records
        .into_iter()
        .filter(|r| r.start_day() > today)
        .collect();
    upcoming.sort_by(|a, b| a.primary_date().timestamp().cmp(&b.primary_date().timestamp()));
    upcoming.truncate(limit);
    upcoming
}

// ============================================================================
// PHOTO EVENTS
// ============================================================================

/// Photos sharing title and calendar day within a month group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoEvent<'a> {
    pub titulo: &'a str,
    pub day: NaiveDate,
    pub photos: Vec<&'a Photo>,
}

impl<'a> PhotoEvent<'a> {
    /// First photo carries the event details
    pub fn cover(&self) -> Option<&'a Photo> {
        self.photos.first().copied()
    }
}

/// Events in order of first appearance; photos keep input order.
pub fn group_photos_by_event<'a, I>(photos: I) -> Vec<PhotoEvent<'a>>
where
    I: IntoIterator<Item = &'a Photo>,
{
    let mut events: Vec<PhotoEvent<'a>> = Vec::new();
    for photo in photos {
        let day = photo.primary_day();
        match events
            .iter_mut()
            .find(|e| e.titulo == photo.titulo && e.day == day)
        {
            Some(event) => event.photos.push(photo),
            None => events.push(PhotoEvent {
                titulo: &photo.titulo,
                day,
                photos: vec![photo],
            }),
        }
    }
    events
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Activity, ActivityStatus, Notice};
    use crate::temporal::IsoDate;

    fn activity(id: &str, start: &str, end: &str, status: &str) -> Activity {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "titulo": format!("Atividade {}", id),
            "descricao": "Descrição",
            "dataInicio": start,
            "dataFim": end,
            "local": "Sede",
            "status": status
        }))
        .unwrap()
    }

    fn notice(id: &str, titulo: &str, conteudo: &str, date: &str) -> Notice {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "titulo": titulo,
            "conteudo": conteudo,
            "dataPublicacao": date
        }))
        .unwrap()
    }

    fn document(id: &str, titulo: &str, tipo: &str, ano: &str) -> Document {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "titulo": titulo,
            "tipo": tipo,
            "ano": ano,
            "url": format!("/docs/{}.pdf", id)
        }))
        .unwrap()
    }

    fn photo(id: &str, titulo: &str, data: &str) -> Photo {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "titulo": titulo,
            "data": data,
            "url": format!("/fotos/{}.jpg", id)
        }))
        .unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<Activity> {
        vec![
            activity("1", "2024-01-05", "2024-01-05", "agendado"),
            activity("2", "2024-01-20", "2024-01-21", "concluido"),
            activity("3", "2024-02-01", "2024-02-01", "cancelado"),
        ]
    }

    #[test]
    fn test_end_to_end_grouping_and_status() {
        let activities = sample();

        let groups = group_by_month_year(&activities);
        assert_eq!(groups.len(), 2);

        let jan = groups.get(&MonthYear::new(2024, 1).unwrap()).unwrap();
        assert_eq!(jan.iter().map(|a| a.id.as_str()).collect::<Vec<_>>(), vec!["1", "2"]);

        let feb = groups.get(&MonthYear::new(2024, 2).unwrap()).unwrap();
        assert_eq!(feb.len(), 1);

        let keys: Vec<String> = groups.descending().map(|(k, _)| k.key()).collect();
        assert_eq!(keys, vec!["2024-2", "2024-1"]);

        let scheduled = filter_by_status(&activities, StatusFilter::Only(ActivityStatus::Scheduled));
        assert_eq!(scheduled.len(), 1);
        assert_eq!(scheduled[0].id, "1");
    }

    #[test]
    fn test_grouping_is_a_partition() {
        let activities = vec![
            activity("a", "2023-12-31", "2023-12-31", "concluido"),
            activity("b", "2024-03-01", "2024-03-02", "agendado"),
            activity("c", "2023-12-01", "2023-12-01", "cancelado"),
            activity("d", "2024-03-15", "2024-03-15", "agendado"),
        ];

        let groups = group_by_month_year(&activities);
        assert_eq!(groups.record_count(), activities.len());

        let mut seen: Vec<&str> = groups
            .ascending()
            .flat_map(|(_, records)| records.iter().map(|a| a.id.as_str()))
            .collect();
        seen.sort();
        assert_eq!(seen, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_descending_order_is_numeric_not_lexicographic() {
        let activities = vec![
            activity("sep", "2024-09-10", "2024-09-10", "agendado"),
            activity("oct", "2024-10-10", "2024-10-10", "agendado"),
            activity("nov", "2024-11-10", "2024-11-10", "agendado"),
            activity("dec", "2024-12-10", "2024-12-10", "agendado"),
            activity("jan", "2024-01-10", "2024-01-10", "agendado"),
            activity("dec23", "2023-12-10", "2023-12-10", "agendado"),
        ];

        let order: Vec<String> = group_by_month_year(&activities)
            .descending()
            .map(|(k, _)| k.key())
            .collect();

        assert_eq!(order, vec!["2024-12", "2024-11", "2024-10", "2024-9", "2024-1", "2023-12"]);
    }

    #[test]
    fn test_group_by_year_for_documents() {
        let docs = vec![
            document("1", "Ata de janeiro", "ata", "2023"),
            document("2", "Balanço", "financeiro", "2024"),
            document("3", "Ata de março", "ata", "2023"),
        ];

        let groups = group_by_year(&docs);
        let order: Vec<(i32, Vec<&str>)> = groups
            .descending()
            .map(|(year, docs)| (year.0, docs.iter().map(|d| d.id.as_str()).collect()))
            .collect();

        assert_eq!(order, vec![(2024, vec!["2"]), (2023, vec!["1", "3"])]);
    }

    #[test]
    fn test_filter_by_status_all_is_identity() {
        let activities = sample();
        let all = filter_by_status(activities.clone(), StatusFilter::All);
        assert_eq!(all, activities);
    }

    #[test]
    fn test_filter_by_status_preserves_order() {
        let activities = vec![
            activity("1", "2024-01-01", "2024-01-01", "concluido"),
            activity("2", "2024-01-02", "2024-01-02", "agendado"),
            activity("3", "2024-01-03", "2024-01-03", "concluido"),
        ];
        let done = filter_by_status(&activities, StatusFilter::Only(ActivityStatus::Completed));
        assert_eq!(done.iter().map(|a| a.id.as_str()).collect::<Vec<_>>(), vec!["1", "3"]);
        assert!(done.iter().all(|a| a.status == ActivityStatus::Completed));
    }

    #[test]
    fn test_search_term() {
        let notices = vec![
            notice("1", "Assembleia Geral", "Pauta da reunião", "2024-01-01"),
            notice("2", "Festa junina", "Venha para a ASSEMBLEIA cultural", "2024-06-01"),
            notice("3", "Obras", "Calçada nova", "2024-07-01"),
        ];

        assert_eq!(filter_by_search_term(&notices, "").len(), 3);
        assert_eq!(filter_by_search_term(&notices, "   ").len(), 3);

        let found = filter_by_search_term(&notices, "assembleia");
        assert_eq!(found.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(), vec!["1", "2"]);

        assert!(filter_by_search_term(&notices, "inexistente").is_empty());
    }

    #[test]
    fn test_filter_by_date_range_inclusive() {
        let activities = sample();

        let on_20 = filter_by_date_range(ymd(2024, 1, 20), &activities);
        assert_eq!(on_20.len(), 1);
        assert_eq!(on_20[0].id, "2");

        assert_eq!(filter_by_date_range(ymd(2024, 1, 21), &activities).len(), 1);
        assert!(filter_by_date_range(ymd(2024, 1, 22), &activities).is_empty());
    }

    #[test]
    fn test_days_with_activity_union_and_dedup() {
        let activities = vec![
            activity("1", "2024-01-30", "2024-02-02", "agendado"),
            activity("2", "2024-02-01T10:00", "2024-02-01T12:00", "agendado"),
            activity("3", "2024-02-10", "2024-02-10", "concluido"),
        ];

        let days = compute_days_with_activity(&activities);
        let expected: BTreeSet<NaiveDate> = [
            ymd(2024, 1, 30),
            ymd(2024, 1, 31),
            ymd(2024, 2, 1),
            ymd(2024, 2, 2),
            ymd(2024, 2, 10),
        ]
        .into_iter()
        .collect();
        assert_eq!(days, expected);

        // Nothing outside every interval
        assert!(!days.contains(&ymd(2024, 1, 29)));
        assert!(!days.contains(&ymd(2024, 2, 3)));
        assert!(!days.contains(&ymd(2024, 2, 9)));
    }

    #[test]
    fn test_document_filters() {
        let docs = vec![
            document("1", "Ata de janeiro", "ata", "2023"),
            document("2", "Balanço anual", "financeiro", "2024"),
            document("3", "Ata de março", "ata", "2024"),
        ];

        let all = filter_documents(&docs, &DocumentFilter::default());
        assert_eq!(all.len(), 3);

        let filter = DocumentFilter {
            tipo: Some("ata".to_string()),
            ano: Some(Year(2024)),
            term: String::new(),
        };
        let found = filter_documents(&docs, &filter);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "3");

        let by_term = filter_documents(
            &docs,
            &DocumentFilter { term: "ATA".to_string(), ..Default::default() },
        );
        assert_eq!(by_term.len(), 2);

        assert_eq!(distinct_years(&docs), vec![Year(2023), Year(2024)]);
        assert_eq!(distinct_types(&docs), vec!["ata", "financeiro"]);
    }

    #[test]
    fn test_latest_and_upcoming() {
        let activities = sample();

        let upcoming = upcoming_activities(&activities, ymd(2024, 1, 5), 2);
        assert_eq!(upcoming.iter().map(|a| a.id.as_str()).collect::<Vec<_>>(), vec!["2", "3"]);

        let latest_two = latest(&activities, 2);
        assert_eq!(latest_two.iter().map(|a| a.id.as_str()).collect::<Vec<_>>(), vec!["3", "2"]);

        let notices = vec![
            notice("old", "A", "", "2023-05-01"),
            notice("new", "B", "", "2024-05-01T09:00"),
            notice("mid", "C", "", "2024-05-01"),
        ];
        let sorted = sort_descending_by_date(&notices);
        assert_eq!(sorted.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(), vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_photo_events() {
        let photos = vec![
            photo("1", "Festa", "2024-06-20"),
            photo("2", "Reunião", "2024-06-20"),
            photo("3", "Festa", "2024-06-20T21:00"),
            photo("4", "Festa", "2024-06-21"),
        ];

        let events = group_photos_by_event(&photos);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].titulo, "Festa");
        assert_eq!(events[0].photos.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(), vec!["1", "3"]);
        assert_eq!(events[0].cover().map(|p| p.id.as_str()), Some("1"));
        assert_eq!(events[2].day, ymd(2024, 6, 21));
    }

    #[test]
    fn test_grouping_owned_records() {
        let dates = ["2024-03-01", "2024-03-09"];
        let owned: Vec<Notice> = dates
            .iter()
            .enumerate()
            .map(|(i, d)| notice(&i.to_string(), "t", "c", d))
            .collect();

        let groups = group_by_month_year(owned).into_descending();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[0].1[0].data_publicacao, IsoDate::parse("2024-03-01").unwrap());
    }
}
