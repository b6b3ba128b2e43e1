// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::HashMap;

use crate::ids::*;
use crate::listview::{SortDirection, SortState};
use crate::model::*;

pub const DEFAULT_ERA_PAGE_SIZE: usize = 20;

/// Columns the remittance endpoint can order by.
pub const ERA_SORT_KEYS: [&str; 6] = [
    "id",
    "date",
    "payer",
    "total_billed",
    "total_paid",
    "claim_count",
];

/// Server-side query for the remittance list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EraQuery {
    pub page: usize,
    pub page_size: usize,
    pub sort: SortState,
    pub practice: Option<PracticeId>,
    pub search: String,
    pub hide_informational: bool,
    pub show_rejections: bool,
    pub show_denials: bool,
}

impl Default for EraQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_ERA_PAGE_SIZE,
            sort: SortState::by("date", SortDirection::Desc),
            practice: None,
            search: String::new(),
            hide_informational: false,
            show_rejections: false,
            show_denials: false,
        }
    }
}

impl EraQuery {
    /// A full page means the server may have more rows.
    pub fn has_more(&self, rows_returned: usize) -> bool {
        rows_returned == self.page_size
    }

    pub fn sort_key(&self) -> &'static str {
        self.sort.key.unwrap_or("date")
    }

    /// Toggles the server sort and rewinds to the first page. Columns the
    /// server cannot order by are ignored.
    pub fn toggle_sort(&mut self, key: &'static str) -> bool {
        if !ERA_SORT_KEYS.contains(&key) {
            return false;
        }
        self.sort.toggle(key);
        self.page = 1;
        true
    }

    pub fn next_page(&mut self, rows_returned: usize) -> bool {
        if !self.has_more(rows_returned) {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page <= 1 {
            return false;
        }
        self.page -= 1;
        true
    }

    /// Any filter change rewinds to the first page.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    pub fn set_practice(&mut self, practice: Option<PracticeId>) {
        self.practice = practice;
        self.page = 1;
    }

    pub fn toggle_hide_informational(&mut self) -> bool {
        self.hide_informational = !self.hide_informational;
        self.page = 1;
        self.hide_informational
    }

    pub fn toggle_rejections(&mut self) -> bool {
        self.show_rejections = !self.show_rejections;
        self.page = 1;
        self.show_rejections
    }

    pub fn toggle_denials(&mut self) -> bool {
        self.show_denials = !self.show_denials;
        self.page = 1;
        self.show_denials
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    Practices,
    Dashboard,
    Claims,
    PracticePatients,
    PracticeEncounters,
    PracticeClaims,
    Financial,
    Eras,
    EraDetail,
    PatientDetail,
    EncounterDetail,
    ClaimDetail,
    Analytics,
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Practices,
    Dashboard,
    Claims,
    PracticePatients(PracticeId),
    PracticeEncounters(PracticeId),
    PracticeClaims {
        practice: PracticeId,
        paid_only: bool,
    },
    FinancialMetrics(PracticeId),
    Eras(EraQuery),
    EraDetail(EraId),
    PatientDetail(PatientId),
    EncounterDetail(EncounterId),
    ClaimDetail(ClaimId),
    Analytics {
        practice: Option<PracticeId>,
        days_back: u32,
    },
    Search {
        query: String,
        kind: Option<SearchKind>,
    },
}

impl FetchRequest {
    pub fn resource(&self) -> ResourceKey {
        match self {
            Self::Practices => ResourceKey::Practices,
            Self::Dashboard => ResourceKey::Dashboard,
            Self::Claims => ResourceKey::Claims,
            Self::PracticePatients(_) => ResourceKey::PracticePatients,
            Self::PracticeEncounters(_) => ResourceKey::PracticeEncounters,
            Self::PracticeClaims { .. } => ResourceKey::PracticeClaims,
            Self::FinancialMetrics(_) => ResourceKey::Financial,
            Self::Eras(_) => ResourceKey::Eras,
            Self::EraDetail(_) => ResourceKey::EraDetail,
            Self::PatientDetail(_) => ResourceKey::PatientDetail,
            Self::EncounterDetail(_) => ResourceKey::EncounterDetail,
            Self::ClaimDetail(_) => ResourceKey::ClaimDetail,
            Self::Analytics { .. } => ResourceKey::Analytics,
            Self::Search { .. } => ResourceKey::Search,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::Practices => "practices",
            Self::Dashboard => "dashboard",
            Self::Claims => "claims",
            Self::PracticePatients(_) => "patients",
            Self::PracticeEncounters(_) => "encounters",
            Self::PracticeClaims { .. } => "practice claims",
            Self::FinancialMetrics(_) => "financial metrics",
            Self::Eras(_) => "remittances",
            Self::EraDetail(_) => "remittance detail",
            Self::PatientDetail(_) => "patient detail",
            Self::EncounterDetail(_) => "encounter detail",
            Self::ClaimDetail(_) => "claim detail",
            Self::Analytics { .. } => "analytics",
            Self::Search { .. } => "search",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchPayload {
    Practices(Vec<Practice>),
    Dashboard(DashboardSnapshot),
    Claims(Vec<Claim>),
    Patients(Vec<Patient>),
    Encounters(Vec<Encounter>),
    PracticeClaims(Vec<Claim>),
    Financial(FinancialMetrics),
    Eras(Vec<EraSummary>),
    EraDetail(EraDetail),
    PatientDetail(PatientDetail),
    EncounterDetail(EncounterDetail),
    ClaimDetail(ClaimDetail),
    Analytics(AnalyticsSnapshot),
    Search(Vec<SearchResult>),
}

/// Hands out monotonically increasing request ids and remembers the newest
/// one per resource, so a slow response to an older request can be discarded.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    last_id: u64,
    in_flight: HashMap<ResourceKey, u64>,
}

impl RequestTracker {
    pub fn begin(&mut self, resource: ResourceKey) -> u64 {
        self.last_id = self.last_id.saturating_add(1);
        self.in_flight.insert(resource, self.last_id);
        self.last_id
    }

    pub fn is_current(&self, resource: ResourceKey, request_id: u64) -> bool {
        self.in_flight.get(&resource) == Some(&request_id)
    }

    /// Marks `request_id` complete. Returns `false` for superseded or
    /// abandoned requests.
    pub fn finish(&mut self, resource: ResourceKey, request_id: u64) -> bool {
        if !self.is_current(resource, request_id) {
            return false;
        }
        self.in_flight.remove(&resource);
        true
    }

    pub fn abandon(&mut self, resource: ResourceKey) -> Option<u64> {
        self.in_flight.remove(&resource)
    }

    pub fn in_flight(&self, resource: ResourceKey) -> Option<u64> {
        self.in_flight.get(&resource).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::{EraQuery, FetchRequest, RequestTracker, ResourceKey};
    use crate::PracticeId;
    use crate::listview::SortDirection;

    #[test]
    fn later_request_wins() {
        let mut tracker = RequestTracker::default();
        let first = tracker.begin(ResourceKey::Search);
        let second = tracker.begin(ResourceKey::Search);
        assert!(second > first);

        assert!(!tracker.finish(ResourceKey::Search, first));
        assert!(tracker.finish(ResourceKey::Search, second));
        assert!(!tracker.finish(ResourceKey::Search, second));
    }

    #[test]
    fn resources_are_tracked_independently() {
        let mut tracker = RequestTracker::default();
        let claims = tracker.begin(ResourceKey::Claims);
        let eras = tracker.begin(ResourceKey::Eras);
        assert!(tracker.is_current(ResourceKey::Claims, claims));
        assert!(tracker.is_current(ResourceKey::Eras, eras));
        assert!(!tracker.is_current(ResourceKey::Eras, claims));
    }

    #[test]
    fn abandoned_requests_are_rejected() {
        let mut tracker = RequestTracker::default();
        let id = tracker.begin(ResourceKey::Analytics);
        assert_eq!(tracker.abandon(ResourceKey::Analytics), Some(id));
        assert!(!tracker.finish(ResourceKey::Analytics, id));
        assert_eq!(tracker.in_flight(ResourceKey::Analytics), None);
    }

    #[test]
    fn era_query_defaults_match_remittance_page() {
        let query = EraQuery::default();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 20);
        assert_eq!(query.sort_key(), "date");
        assert!(query.has_more(20));
        assert!(!query.has_more(7));
    }

    #[test]
    fn era_query_sort_and_paging() {
        let mut query = EraQuery::default();
        assert!(query.next_page(20));
        assert_eq!(query.page, 2);
        assert!(!query.next_page(3));

        assert!(query.toggle_sort("date"));
        assert_eq!(query.sort.direction, SortDirection::Asc);
        assert_eq!(query.page, 1);

        assert!(query.toggle_sort("payer"));
        assert_eq!(query.sort_key(), "payer");
        assert_eq!(query.sort.direction, SortDirection::Desc);

        assert!(!query.toggle_sort("denied"));
        assert_eq!(query.sort_key(), "payer");
        assert!(!query.prev_page());
    }

    #[test]
    fn era_filters_rewind_to_first_page() {
        let mut query = EraQuery {
            page: 4,
            ..EraQuery::default()
        };
        assert!(query.toggle_rejections());
        assert_eq!(query.page, 1);
        query.page = 3;
        query.set_search("aetna");
        assert_eq!(query.page, 1);
        assert_eq!(query.search, "aetna");
    }

    #[test]
    fn request_resource_keys() {
        let request = FetchRequest::PracticeClaims {
            practice: PracticeId::new("p1"),
            paid_only: true,
        };
        assert_eq!(request.resource(), ResourceKey::PracticeClaims);
        assert_eq!(request.describe(), "practice claims");
    }
}
