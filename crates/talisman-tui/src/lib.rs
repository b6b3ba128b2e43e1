// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use talisman_app::columns::{
    CLAIM_COLUMNS, CPT_COLUMNS, ENCOUNTER_COLUMNS, ERA_COLUMNS, NO_CLAIMS_MESSAGE,
    NO_CPTS_MESSAGE, NO_ENCOUNTERS_MESSAGE, NO_ERAS_MESSAGE, NO_PATIENTS_MESSAGE,
    NO_PAYERS_MESSAGE, PATIENT_COLUMNS, PAYER_COLUMNS, PRACTICE_CLAIM_COLUMNS,
    PRACTICE_ERA_COLUMNS,
};
use talisman_app::filter::{BundleFilter, filter_bundles};
use talisman_app::format::{
    MISSING, format_compact_currency, format_count, format_currency, format_currency_whole,
    format_long_date, format_number, format_percent_fraction, format_percent_points,
    format_short_date, format_trend, parse_adjustments,
};
use talisman_app::listview::{
    Align, Column, ListView, LoadPhase, Record, SortDirection, SortState,
};
use talisman_app::modal::{DetailModal, MODAL_ERROR_TEXT, ModalPhase};
use talisman_app::selector::{ALL_PRACTICES_LABEL, PracticeSelector, selection_label};
use talisman_app::{
    AnalyticsSnapshot, AppCommand, AppEvent, AppState, Claim, ClaimDetail, ClaimId, CptPerformance,
    DEFAULT_ERA_PAGE_SIZE, DashboardSnapshot, ERA_SORT_KEYS, Encounter, EncounterDetail,
    EncounterId, EraDetail, EraId, EraQuery, EraSummary, FetchPayload, FetchRequest,
    FinancialMetrics, MetricReading, PageKind, Patient, PatientDetail, PatientId,
    PayerPerformance, Practice, PracticeId, PracticeTab, RemittanceRef, RequestTracker,
    ResourceKey, SearchKind, SearchResult, ServiceLine,
};

const MIN_SEARCH_CHARS: usize = 2;
const ACTIVITY_BAR_WIDTH: usize = 40;

/// Tunables the binary reads from the `[ui]` config section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiOptions {
    pub items_per_page: usize,
    pub era_page_size: usize,
    pub days_back: u32,
    pub search_debounce: Duration,
    pub safety_timeout: Duration,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            items_per_page: 10,
            era_page_size: DEFAULT_ERA_PAGE_SIZE,
            days_back: 90,
            search_debounce: Duration::from_millis(300),
            safety_timeout: Duration::from_secs(10),
        }
    }
}

pub trait AppRuntime {
    fn fetch(&mut self, request: &FetchRequest) -> Result<FetchPayload>;

    /// Runs `request` and posts the outcome as [`InternalEvent::Fetched`]. The
    /// default blocks the caller; networked runtimes hand it to a worker.
    fn spawn_fetch(
        &mut self,
        request_id: u64,
        request: FetchRequest,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let result = self
            .fetch(&request)
            .map_err(|error| format!("{error:#}"));
        tx.send(InternalEvent::Fetched {
            request_id,
            request,
            result,
        })
        .map_err(|_| anyhow!("fetch event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InternalEvent {
    ClearStatus {
        token: u64,
    },
    Fetched {
        request_id: u64,
        request: FetchRequest,
        result: Result<FetchPayload, String>,
    },
    SearchDue {
        token: u64,
    },
    SafetyTimeout {
        request_id: u64,
    },
}

/// A single fetched document plus its load phase.
#[derive(Debug, Clone, PartialEq)]
struct Loadable<T> {
    phase: LoadPhase,
    value: Option<T>,
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Self {
            phase: LoadPhase::Idle,
            value: None,
        }
    }
}

impl<T> Loadable<T> {
    fn begin(&mut self, request_id: u64) {
        self.phase = LoadPhase::Loading { request_id };
    }

    fn finish(&mut self, request_id: u64, result: Result<T, String>) -> bool {
        if self.phase != (LoadPhase::Loading { request_id }) {
            return false;
        }
        match result {
            Ok(value) => {
                self.value = Some(value);
                self.phase = LoadPhase::Ready;
            }
            Err(message) => {
                self.value = None;
                self.phase = LoadPhase::Failed(message);
            }
        }
        true
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModalKind {
    Patient,
    Encounter,
    Claim,
    Era,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum AnalyticsFocus {
    #[default]
    Payers,
    Cpts,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct GlobalSearchUi {
    visible: bool,
    input: String,
    kind: Option<SearchKind>,
    results: Vec<SearchResult>,
    cursor: usize,
    token: u64,
    phase: LoadPhase,
}

fn next_search_kind(kind: Option<SearchKind>) -> Option<SearchKind> {
    match kind {
        None => Some(SearchKind::Practice),
        Some(SearchKind::Practice) => Some(SearchKind::Patient),
        Some(SearchKind::Patient) => Some(SearchKind::Claim),
        Some(SearchKind::Claim) => Some(SearchKind::Status),
        Some(SearchKind::Status) => None,
    }
}

/// Active list text search. Remittance searches run on the server, so their
/// draft is only applied on enter.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ListSearch {
    Inactive,
    Local,
    Remote { draft: String },
}

struct ViewData {
    options: UiOptions,
    tracker: RequestTracker,
    practices: Vec<Practice>,
    selector: PracticeSelector,
    dashboard: Loadable<DashboardSnapshot>,
    claims: ListView<Claim>,
    patients: ListView<Patient>,
    encounters: ListView<Encounter>,
    practice_claims: ListView<Claim>,
    paid_only: bool,
    financial: Loadable<FinancialMetrics>,
    eras: ListView<EraSummary>,
    era_query: EraQuery,
    era_has_more: bool,
    analytics: Loadable<AnalyticsSnapshot>,
    payers: ListView<PayerPerformance>,
    cpts: ListView<CptPerformance>,
    analytics_focus: AnalyticsFocus,
    patient_modal: DetailModal<PatientId, PatientDetail>,
    encounter_modal: DetailModal<EncounterId, EncounterDetail>,
    claim_modal: DetailModal<ClaimId, ClaimDetail>,
    era_modal: DetailModal<EraId, EraDetail>,
    bundle_filter: BundleFilter,
    modal_scroll: u16,
    search: GlobalSearchUi,
    list_search: ListSearch,
    help_visible: bool,
    status_token: u64,
}

impl ViewData {
    fn new(options: UiOptions) -> Self {
        let per_page = options.items_per_page.max(1);
        let era_query = EraQuery {
            page_size: options.era_page_size.max(1),
            ..EraQuery::default()
        };
        Self {
            options,
            tracker: RequestTracker::default(),
            practices: Vec::new(),
            selector: PracticeSelector::default(),
            dashboard: Loadable::default(),
            claims: ListView::new(CLAIM_COLUMNS, per_page, NO_CLAIMS_MESSAGE),
            patients: ListView::new(PATIENT_COLUMNS, per_page, NO_PATIENTS_MESSAGE),
            encounters: ListView::new(ENCOUNTER_COLUMNS, per_page, NO_ENCOUNTERS_MESSAGE),
            practice_claims: ListView::new(PRACTICE_CLAIM_COLUMNS, per_page, NO_CLAIMS_MESSAGE),
            paid_only: false,
            financial: Loadable::default(),
            eras: ListView::new(ERA_COLUMNS, era_query.page_size, NO_ERAS_MESSAGE),
            era_query,
            era_has_more: false,
            analytics: Loadable::default(),
            payers: ListView::new(PAYER_COLUMNS, per_page, NO_PAYERS_MESSAGE),
            cpts: ListView::new(CPT_COLUMNS, per_page, NO_CPTS_MESSAGE),
            analytics_focus: AnalyticsFocus::default(),
            patient_modal: DetailModal::default(),
            encounter_modal: DetailModal::default(),
            claim_modal: DetailModal::default(),
            era_modal: DetailModal::default(),
            bundle_filter: BundleFilter::default(),
            modal_scroll: 0,
            search: GlobalSearchUi::default(),
            list_search: ListSearch::Inactive,
            help_visible: false,
            status_token: 0,
        }
    }

    fn active_modal(&self) -> Option<ModalKind> {
        if self.era_modal.is_open() {
            Some(ModalKind::Era)
        } else if self.claim_modal.is_open() {
            Some(ModalKind::Claim)
        } else if self.encounter_modal.is_open() {
            Some(ModalKind::Encounter)
        } else if self.patient_modal.is_open() {
            Some(ModalKind::Patient)
        } else {
            None
        }
    }

    fn close_modals(&mut self) {
        self.patient_modal.close();
        self.encounter_modal.close();
        self.claim_modal.close();
        self.era_modal.close();
        self.bundle_filter = BundleFilter::All;
        self.modal_scroll = 0;
    }

    fn practice_name(&self, practice: Option<&PracticeId>) -> String {
        match practice {
            Some(id) => self
                .practices
                .iter()
                .find(|candidate| &candidate.id == id)
                .map(|candidate| candidate.name.clone())
                .unwrap_or_else(|| id.to_string()),
            None => ALL_PRACTICES_LABEL.to_owned(),
        }
    }
}

/// Navigation shared by every on-screen table regardless of row type.
trait TableNav {
    fn move_cursor(&mut self, delta: isize);
    fn move_column(&mut self, delta: isize);
    fn toggle_sort_selected(&mut self) -> Option<(&'static str, SortDirection)>;
    fn next_page(&mut self) -> bool;
    fn prev_page(&mut self) -> bool;
    fn push_search_char(&mut self, ch: char);
    fn pop_search_char(&mut self);
    fn clear_search(&mut self);
}

impl<R: Record + 'static> TableNav for ListView<R> {
    fn move_cursor(&mut self, delta: isize) {
        ListView::move_cursor(self, delta);
    }

    fn move_column(&mut self, delta: isize) {
        ListView::move_column(self, delta);
    }

    fn toggle_sort_selected(&mut self) -> Option<(&'static str, SortDirection)> {
        ListView::toggle_sort_selected(self)
    }

    fn next_page(&mut self) -> bool {
        ListView::next_page(self)
    }

    fn prev_page(&mut self) -> bool {
        ListView::prev_page(self)
    }

    fn push_search_char(&mut self, ch: char) {
        ListView::push_search_char(self, ch);
    }

    fn pop_search_char(&mut self) {
        ListView::pop_search_char(self);
    }

    fn clear_search(&mut self) {
        self.set_search("");
    }
}

fn active_table<'a>(state: &AppState, view_data: &'a mut ViewData) -> Option<&'a mut dyn TableNav> {
    match state.active_page {
        PageKind::Dashboard => None,
        PageKind::Claims => Some(&mut view_data.claims),
        PageKind::Practices => {
            state.practice.as_ref()?;
            match state.practice_tab {
                PracticeTab::Patients => Some(&mut view_data.patients),
                PracticeTab::Encounters => Some(&mut view_data.encounters),
                PracticeTab::Claims => Some(&mut view_data.practice_claims),
                PracticeTab::Financial => None,
            }
        }
        PageKind::Remittance => Some(&mut view_data.eras),
        PageKind::Analytics => match view_data.analytics_focus {
            AnalyticsFocus::Payers => Some(&mut view_data.payers),
            AnalyticsFocus::Cpts => Some(&mut view_data.cpts),
        },
    }
}

pub fn run_app<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    options: UiOptions,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen, EnableMouseCapture)
        .context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new(options);
    let (internal_tx, internal_rx) = mpsc::channel();
    bootstrap(state, runtime, &mut view_data, &internal_tx);

    let mut result = Ok(());
    loop {
        process_internal_events(runtime, state, &mut view_data, &internal_tx, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Mouse(mouse) => {
                    let size = terminal.size().context("read terminal size")?;
                    let area = Rect::new(0, 0, size.width, size.height);
                    handle_mouse_event(&mut view_data, area, mouse);
                }
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(
        io::stdout(),
        DisableMouseCapture,
        terminal::LeaveAlternateScreen
    )
    .context("leave alternate screen")?;
    result
}

fn bootstrap<R: AppRuntime>(
    state: &AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    start_fetch(runtime, view_data, tx, FetchRequest::Practices);
    view_data.era_query.set_practice(state.practice.clone());
    sync_era_columns(state, view_data);
    load_active_page(state, runtime, view_data, tx);
}

fn process_internal_events<R: AppRuntime>(
    runtime: &mut R,
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::Fetched {
                request_id,
                request,
                result,
            } => handle_fetched(state, view_data, tx, request_id, &request, result),
            InternalEvent::SearchDue { token } => {
                run_due_search(runtime, view_data, tx, token);
            }
            InternalEvent::SafetyTimeout { request_id } => {
                handle_safety_timeout(state, view_data, tx, request_id);
            }
        }
    }
}

fn start_fetch<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    request: FetchRequest,
) -> u64 {
    let request_id = view_data.tracker.begin(request.resource());
    tracing::debug!(request_id, resource = request.describe(), "dispatching fetch");
    if let Err(error) = runtime.spawn_fetch(request_id, request.clone(), tx.clone()) {
        let _ = tx.send(InternalEvent::Fetched {
            request_id,
            request,
            result: Err(format!("{error:#}")),
        });
    }
    request_id
}

fn handle_fetched(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    request_id: u64,
    request: &FetchRequest,
    result: Result<FetchPayload, String>,
) {
    let resource = request.resource();
    if !view_data.tracker.finish(resource, request_id) {
        tracing::debug!(
            request_id,
            resource = request.describe(),
            "dropping stale response"
        );
        return;
    }

    match result {
        Ok(payload) => {
            tracing::debug!(request_id, resource = request.describe(), "fetch completed");
            apply_payload(view_data, request_id, payload);
        }
        Err(message) => {
            tracing::warn!(
                request_id,
                resource = request.describe(),
                error = %message,
                "fetch failed"
            );
            apply_failure(view_data, request_id, resource, &message);
            emit_status(
                state,
                view_data,
                tx,
                format!("Failed to load {}: {message}", request.describe()),
            );
        }
    }
}

fn apply_payload(view_data: &mut ViewData, request_id: u64, payload: FetchPayload) {
    match payload {
        FetchPayload::Practices(practices) => view_data.practices = practices,
        FetchPayload::Dashboard(snapshot) => {
            view_data.dashboard.finish(request_id, Ok(snapshot));
        }
        FetchPayload::Claims(rows) => {
            view_data.claims.finish_load(request_id, Ok(rows));
        }
        FetchPayload::Patients(rows) => {
            view_data.patients.finish_load(request_id, Ok(rows));
        }
        FetchPayload::Encounters(rows) => {
            view_data.encounters.finish_load(request_id, Ok(rows));
        }
        FetchPayload::PracticeClaims(rows) => {
            view_data.practice_claims.finish_load(request_id, Ok(rows));
        }
        FetchPayload::Financial(metrics) => {
            view_data.financial.finish(request_id, Ok(metrics));
        }
        FetchPayload::Eras(rows) => {
            let has_more = view_data.era_query.has_more(rows.len());
            if view_data.eras.finish_load(request_id, Ok(rows)) {
                view_data.era_has_more = has_more;
            }
        }
        FetchPayload::EraDetail(detail) => {
            view_data.era_modal.resolve(request_id, Ok(detail));
        }
        FetchPayload::PatientDetail(detail) => {
            view_data.patient_modal.resolve(request_id, Ok(detail));
        }
        FetchPayload::EncounterDetail(detail) => {
            view_data.encounter_modal.resolve(request_id, Ok(detail));
        }
        FetchPayload::ClaimDetail(detail) => {
            view_data.claim_modal.resolve(request_id, Ok(detail));
        }
        FetchPayload::Analytics(snapshot) => {
            view_data
                .payers
                .finish_load(request_id, Ok(snapshot.payers.clone()));
            view_data
                .cpts
                .finish_load(request_id, Ok(snapshot.cpts.clone()));
            view_data.analytics.finish(request_id, Ok(snapshot));
        }
        FetchPayload::Search(results) => {
            if view_data.search.phase == (LoadPhase::Loading { request_id }) {
                view_data.search.results = results;
                view_data.search.cursor = 0;
                view_data.search.phase = LoadPhase::Ready;
            }
        }
    }
}

fn failed<T>(message: &str) -> Result<T, String> {
    Err(message.to_owned())
}

fn apply_failure(view_data: &mut ViewData, request_id: u64, resource: ResourceKey, message: &str) {
    match resource {
        ResourceKey::Practices => {}
        ResourceKey::Dashboard => {
            view_data.dashboard.finish(request_id, failed(message));
        }
        ResourceKey::Claims => {
            view_data.claims.finish_load(request_id, failed(message));
        }
        ResourceKey::PracticePatients => {
            view_data.patients.finish_load(request_id, failed(message));
        }
        ResourceKey::PracticeEncounters => {
            view_data.encounters.finish_load(request_id, failed(message));
        }
        ResourceKey::PracticeClaims => {
            view_data.practice_claims.finish_load(request_id, failed(message));
        }
        ResourceKey::Financial => {
            view_data.financial.finish(request_id, failed(message));
        }
        ResourceKey::Eras => {
            if view_data.eras.finish_load(request_id, failed(message)) {
                view_data.era_has_more = false;
            }
        }
        ResourceKey::EraDetail => {
            view_data.era_modal.resolve(request_id, failed(message));
        }
        ResourceKey::PatientDetail => {
            view_data.patient_modal.resolve(request_id, failed(message));
        }
        ResourceKey::EncounterDetail => {
            view_data.encounter_modal.resolve(request_id, failed(message));
        }
        ResourceKey::ClaimDetail => {
            view_data.claim_modal.resolve(request_id, failed(message));
        }
        ResourceKey::Analytics => {
            view_data.payers.finish_load(request_id, failed(message));
            view_data.cpts.finish_load(request_id, failed(message));
            view_data.analytics.finish(request_id, failed(message));
        }
        ResourceKey::Search => {
            if view_data.search.phase == (LoadPhase::Loading { request_id }) {
                view_data.search.results.clear();
                view_data.search.phase = LoadPhase::Failed(message.to_owned());
            }
        }
    }
}

fn handle_safety_timeout(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    request_id: u64,
) {
    if !view_data
        .tracker
        .is_current(ResourceKey::Analytics, request_id)
    {
        return;
    }
    view_data.tracker.abandon(ResourceKey::Analytics);
    let seconds = view_data.options.safety_timeout.as_secs();
    tracing::warn!(request_id, seconds, "analytics request timed out");
    view_data.payers.finish_load(request_id, Ok(Vec::new()));
    view_data.cpts.finish_load(request_id, Ok(Vec::new()));
    view_data
        .analytics
        .finish(request_id, Ok(AnalyticsSnapshot::default()));
    emit_status(
        state,
        view_data,
        tx,
        format!("analytics timed out after {seconds}s; showing defaults"),
    );
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    schedule(internal_tx, Duration::from_secs(4), InternalEvent::ClearStatus { token });
}

fn schedule(internal_tx: &Sender<InternalEvent>, delay: Duration, event: InternalEvent) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(delay);
        let _ = sender.send(event);
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn dispatch<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    command: AppCommand,
) -> bool {
    let events = state.dispatch(command);
    let changed = !events.is_empty();
    for event in events {
        match event {
            AppEvent::PageChanged(_) | AppEvent::PracticeTabChanged(_) => {
                view_data.list_search = ListSearch::Inactive;
                load_active_page(state, runtime, view_data, tx);
            }
            AppEvent::PracticeChanged(practice) => {
                view_data.patients.clear();
                view_data.encounters.clear();
                view_data.practice_claims.clear();
                view_data.financial.clear();
                view_data.analytics.clear();
                view_data.payers.clear();
                view_data.cpts.clear();
                view_data.era_query.set_practice(practice);
                sync_era_columns(state, view_data);
                load_active_page(state, runtime, view_data, tx);
            }
            AppEvent::StatusUpdated(_) | AppEvent::StatusCleared => {}
        }
    }
    changed
}

fn sync_era_columns(state: &AppState, view_data: &mut ViewData) {
    let columns = if state.practice.is_some() {
        PRACTICE_ERA_COLUMNS
    } else {
        ERA_COLUMNS
    };
    view_data.eras.set_columns(columns);
}

/// Switches page, reloading when the page was already showing.
fn navigate<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    page: PageKind,
) {
    if !dispatch(state, runtime, view_data, tx, AppCommand::SelectPage(page)) {
        load_active_page(state, runtime, view_data, tx);
    }
}

fn load_active_page<R: AppRuntime>(
    state: &AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    match state.active_page {
        PageKind::Dashboard => {
            let request_id = start_fetch(runtime, view_data, tx, FetchRequest::Dashboard);
            view_data.dashboard.begin(request_id);
        }
        PageKind::Claims => {
            let request_id = start_fetch(runtime, view_data, tx, FetchRequest::Claims);
            view_data.claims.begin_load(request_id);
        }
        PageKind::Practices => {
            let Some(practice) = state.practice.clone() else {
                return;
            };
            load_practice_tab(state.practice_tab, practice, runtime, view_data, tx);
        }
        PageKind::Remittance => load_eras(runtime, view_data, tx),
        PageKind::Analytics => {
            let request = FetchRequest::Analytics {
                practice: state.practice.clone(),
                days_back: view_data.options.days_back,
            };
            let request_id = start_fetch(runtime, view_data, tx, request);
            view_data.analytics.begin(request_id);
            view_data.payers.begin_load(request_id);
            view_data.cpts.begin_load(request_id);
            schedule(
                tx,
                view_data.options.safety_timeout,
                InternalEvent::SafetyTimeout { request_id },
            );
        }
    }
}

fn load_practice_tab<R: AppRuntime>(
    tab: PracticeTab,
    practice: PracticeId,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    match tab {
        PracticeTab::Patients => {
            let request_id =
                start_fetch(runtime, view_data, tx, FetchRequest::PracticePatients(practice));
            view_data.patients.begin_load(request_id);
        }
        PracticeTab::Encounters => {
            let request_id =
                start_fetch(runtime, view_data, tx, FetchRequest::PracticeEncounters(practice));
            view_data.encounters.begin_load(request_id);
        }
        PracticeTab::Claims => {
            let request = FetchRequest::PracticeClaims {
                practice,
                paid_only: view_data.paid_only,
            };
            let request_id = start_fetch(runtime, view_data, tx, request);
            view_data.practice_claims.begin_load(request_id);
        }
        PracticeTab::Financial => {
            let request_id =
                start_fetch(runtime, view_data, tx, FetchRequest::FinancialMetrics(practice));
            view_data.financial.begin(request_id);
        }
    }
}

fn load_eras<R: AppRuntime>(runtime: &mut R, view_data: &mut ViewData, tx: &Sender<InternalEvent>) {
    let request = FetchRequest::Eras(view_data.era_query.clone());
    let request_id = start_fetch(runtime, view_data, tx, request);
    view_data.eras.begin_load(request_id);
}

fn open_detail<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    request: FetchRequest,
) {
    view_data.close_modals();
    let request_id = start_fetch(runtime, view_data, tx, request.clone());
    match request {
        FetchRequest::PatientDetail(id) => view_data.patient_modal.open(id, request_id),
        FetchRequest::EncounterDetail(id) => view_data.encounter_modal.open(id, request_id),
        FetchRequest::ClaimDetail(id) => view_data.claim_modal.open(id, request_id),
        FetchRequest::EraDetail(id) => view_data.era_modal.open(id, request_id),
        _ => {}
    }
}

fn selected_detail_request(state: &AppState, view_data: &ViewData) -> Option<FetchRequest> {
    match state.active_page {
        PageKind::Claims => view_data
            .claims
            .selected()
            .map(|claim| FetchRequest::ClaimDetail(claim.detail_id())),
        PageKind::Practices => {
            state.practice.as_ref()?;
            match state.practice_tab {
                PracticeTab::Patients => view_data
                    .patients
                    .selected()
                    .map(|patient| FetchRequest::PatientDetail(patient.id.clone())),
                PracticeTab::Encounters => view_data
                    .encounters
                    .selected()
                    .map(|encounter| FetchRequest::EncounterDetail(encounter.id.clone())),
                PracticeTab::Claims => view_data
                    .practice_claims
                    .selected()
                    .map(|claim| FetchRequest::ClaimDetail(claim.detail_id())),
                PracticeTab::Financial => None,
            }
        }
        PageKind::Remittance => view_data
            .eras
            .selected()
            .map(|era| FetchRequest::EraDetail(era.id.clone())),
        PageKind::Dashboard | PageKind::Analytics => None,
    }
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            view_data.help_visible = false;
        }
        return false;
    }

    if let Some(kind) = view_data.active_modal() {
        handle_modal_key(view_data, kind, key);
        return false;
    }

    if view_data.selector.is_open() {
        handle_selector_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    if view_data.search.visible {
        handle_search_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    if view_data.list_search != ListSearch::Inactive {
        handle_list_search_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('?') => view_data.help_visible = true,
        KeyCode::Tab => {
            dispatch(state, runtime, view_data, internal_tx, AppCommand::NextPage);
        }
        KeyCode::BackTab => {
            dispatch(state, runtime, view_data, internal_tx, AppCommand::PrevPage);
        }
        KeyCode::Char(ch @ '1'..='5') => {
            let index = ch.to_digit(10).map_or(0, |digit| digit as usize - 1);
            if let Some(page) = PageKind::ALL.get(index) {
                dispatch(
                    state,
                    runtime,
                    view_data,
                    internal_tx,
                    AppCommand::SelectPage(*page),
                );
            }
        }
        KeyCode::Char('P') => view_data.selector.open(),
        KeyCode::Char('g') => {
            view_data.search = GlobalSearchUi {
                visible: true,
                token: view_data.search.token.saturating_add(1),
                ..GlobalSearchUi::default()
            };
        }
        KeyCode::Char('R') => {
            emit_status(state, view_data, internal_tx, "refreshing");
            load_active_page(state, runtime, view_data, internal_tx);
        }
        KeyCode::Char('[') if state.active_page == PageKind::Practices => {
            dispatch(
                state,
                runtime,
                view_data,
                internal_tx,
                AppCommand::PrevPracticeTab,
            );
        }
        KeyCode::Char(']') if state.active_page == PageKind::Practices => {
            dispatch(
                state,
                runtime,
                view_data,
                internal_tx,
                AppCommand::NextPracticeTab,
            );
        }
        _ => handle_page_key(state, runtime, view_data, internal_tx, key),
    }
    false
}

fn handle_modal_key(view_data: &mut ViewData, kind: ModalKind, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => view_data.close_modals(),
        KeyCode::Char('j') | KeyCode::Down => {
            view_data.modal_scroll = view_data.modal_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view_data.modal_scroll = view_data.modal_scroll.saturating_sub(1);
        }
        KeyCode::Char('f') if kind == ModalKind::Era => {
            view_data.bundle_filter = view_data.bundle_filter.next();
            view_data.modal_scroll = 0;
        }
        _ => {}
    }
}

fn handle_selector_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc => view_data.selector.close(),
        KeyCode::Up => view_data.selector.move_cursor(-1, &view_data.practices),
        KeyCode::Down => view_data.selector.move_cursor(1, &view_data.practices),
        KeyCode::Backspace => view_data.selector.backspace(),
        KeyCode::Enter => {
            if let Some(choice) = view_data.selector.choose(&view_data.practices) {
                let label = view_data.practice_name(choice.as_ref());
                dispatch(
                    state,
                    runtime,
                    view_data,
                    internal_tx,
                    AppCommand::SelectPractice(choice),
                );
                emit_status(state, view_data, internal_tx, format!("practice: {label}"));
            }
        }
        KeyCode::Char(ch) => view_data.selector.type_char(ch),
        _ => {}
    }
}

fn handle_search_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc => close_search(view_data),
        KeyCode::Up => {
            view_data.search.cursor = view_data.search.cursor.saturating_sub(1);
        }
        KeyCode::Down => {
            let last = view_data.search.results.len().saturating_sub(1);
            view_data.search.cursor = (view_data.search.cursor + 1).min(last);
        }
        KeyCode::Tab => {
            view_data.search.kind = next_search_kind(view_data.search.kind);
            schedule_search(view_data, internal_tx);
        }
        KeyCode::Backspace => {
            view_data.search.input.pop();
            schedule_search(view_data, internal_tx);
        }
        KeyCode::Enter => open_search_result(state, runtime, view_data, internal_tx),
        KeyCode::Char(ch) => {
            view_data.search.input.push(ch);
            schedule_search(view_data, internal_tx);
        }
        _ => {}
    }
}

fn close_search(view_data: &mut ViewData) {
    view_data.search = GlobalSearchUi {
        token: view_data.search.token.saturating_add(1),
        ..GlobalSearchUi::default()
    };
}

/// Restarts the debounce window. Short queries clear results immediately.
fn schedule_search(view_data: &mut ViewData, internal_tx: &Sender<InternalEvent>) {
    view_data.search.token = view_data.search.token.saturating_add(1);
    if view_data.search.input.trim().chars().count() < MIN_SEARCH_CHARS {
        view_data.search.results.clear();
        view_data.search.cursor = 0;
        view_data.search.phase = LoadPhase::Idle;
        return;
    }
    schedule(
        internal_tx,
        view_data.options.search_debounce,
        InternalEvent::SearchDue {
            token: view_data.search.token,
        },
    );
}

fn run_due_search<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    token: u64,
) {
    if !view_data.search.visible || token != view_data.search.token {
        return;
    }
    let query = view_data.search.input.trim().to_owned();
    if query.chars().count() < MIN_SEARCH_CHARS {
        return;
    }
    let request = FetchRequest::Search {
        query,
        kind: view_data.search.kind,
    };
    let request_id = start_fetch(runtime, view_data, tx, request);
    view_data.search.phase = LoadPhase::Loading { request_id };
}

fn open_search_result<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    let Some(result) = view_data
        .search
        .results
        .get(view_data.search.cursor)
        .cloned()
    else {
        return;
    };
    close_search(view_data);

    match result.kind {
        SearchKind::Practice => {
            let practice = Some(PracticeId::new(result.id));
            dispatch(state, runtime, view_data, tx, AppCommand::SelectPractice(practice));
            navigate(state, runtime, view_data, tx, PageKind::Practices);
        }
        SearchKind::Patient => {
            if let Some(practice) = result.practice_id {
                dispatch(
                    state,
                    runtime,
                    view_data,
                    tx,
                    AppCommand::SelectPractice(Some(practice)),
                );
            }
            let tab = AppCommand::SelectPracticeTab(PracticeTab::Patients);
            dispatch(state, runtime, view_data, tx, tab);
            navigate(state, runtime, view_data, tx, PageKind::Practices);
            let request = FetchRequest::PatientDetail(PatientId::new(result.id));
            open_detail(runtime, view_data, tx, request);
        }
        SearchKind::Claim => {
            if let Some(practice) = result.practice_id {
                dispatch(
                    state,
                    runtime,
                    view_data,
                    tx,
                    AppCommand::SelectPractice(Some(practice)),
                );
            }
            let tab = AppCommand::SelectPracticeTab(PracticeTab::Claims);
            dispatch(state, runtime, view_data, tx, tab);
            navigate(state, runtime, view_data, tx, PageKind::Practices);
            let id = result
                .claim_reference
                .unwrap_or_else(|| ClaimId::new(result.id));
            open_detail(runtime, view_data, tx, FetchRequest::ClaimDetail(id));
        }
        SearchKind::Status => {
            let query = &mut view_data.era_query;
            query.page = 1;
            match result.id.as_str() {
                "Rejected" => query.show_rejections = true,
                "Denied" => query.show_denials = true,
                _ => {}
            }
            navigate(state, runtime, view_data, tx, PageKind::Remittance);
        }
    }
}

fn handle_list_search_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if let ListSearch::Remote { draft } = &mut view_data.list_search {
        match key.code {
            KeyCode::Char(ch) => draft.push(ch),
            KeyCode::Backspace => {
                draft.pop();
            }
            KeyCode::Enter => {
                let term = draft.trim().to_owned();
                view_data.list_search = ListSearch::Inactive;
                view_data.era_query.set_search(term);
                load_eras(runtime, view_data, internal_tx);
            }
            KeyCode::Esc => view_data.list_search = ListSearch::Inactive,
            _ => {}
        }
        return;
    }

    let Some(table) = active_table(state, view_data) else {
        view_data.list_search = ListSearch::Inactive;
        return;
    };
    match key.code {
        KeyCode::Char(ch) => table.push_search_char(ch),
        KeyCode::Backspace => table.pop_search_char(),
        KeyCode::Esc => {
            table.clear_search();
            view_data.list_search = ListSearch::Inactive;
        }
        KeyCode::Enter => view_data.list_search = ListSearch::Inactive,
        _ => {}
    }
}

fn handle_page_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match state.active_page {
        PageKind::Remittance => {
            if handle_remittance_key(state, runtime, view_data, internal_tx, key) {
                return;
            }
        }
        PageKind::Practices
            if key.code == KeyCode::Char('f') && state.practice_tab == PracticeTab::Claims =>
        {
            view_data.paid_only = !view_data.paid_only;
            load_active_page(state, runtime, view_data, internal_tx);
            let label = if view_data.paid_only {
                "showing paid claims only"
            } else {
                "showing all claims"
            };
            emit_status(state, view_data, internal_tx, label);
            return;
        }
        PageKind::Analytics if key.code == KeyCode::Char('t') => {
            view_data.analytics_focus = match view_data.analytics_focus {
                AnalyticsFocus::Payers => AnalyticsFocus::Cpts,
                AnalyticsFocus::Cpts => AnalyticsFocus::Payers,
            };
            return;
        }
        _ => {}
    }
    handle_table_key(state, runtime, view_data, internal_tx, key);
}

fn handle_remittance_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    let status = match key.code {
        KeyCode::Char('i') => {
            let on = view_data.era_query.toggle_hide_informational();
            format!("hide informational: {}", on_off(on))
        }
        KeyCode::Char('r') => {
            let on = view_data.era_query.toggle_rejections();
            format!("rejections only: {}", on_off(on))
        }
        KeyCode::Char('d') => {
            let on = view_data.era_query.toggle_denials();
            format!("denials only: {}", on_off(on))
        }
        KeyCode::Char('s') => {
            let Some(column) = view_data
                .eras
                .columns()
                .get(view_data.eras.column_cursor())
            else {
                return true;
            };
            let (key, label) = (column.key, column.label);
            if !view_data.era_query.toggle_sort(key) {
                emit_status(
                    state,
                    view_data,
                    internal_tx,
                    format!("{label} is not sortable"),
                );
                return true;
            }
            format!(
                "sorted by {label} {}",
                view_data.era_query.sort.direction.as_str()
            )
        }
        KeyCode::Right | KeyCode::Char('.') => {
            if view_data.eras.phase().is_loading() || !view_data.era_has_more {
                return true;
            }
            let returned = view_data.eras.records().len();
            if !view_data.era_query.next_page(returned) {
                return true;
            }
            format!("page {}", view_data.era_query.page)
        }
        KeyCode::Left | KeyCode::Char(',') => {
            if view_data.eras.phase().is_loading() || !view_data.era_query.prev_page() {
                return true;
            }
            format!("page {}", view_data.era_query.page)
        }
        KeyCode::Char('/') => {
            view_data.list_search = ListSearch::Remote {
                draft: view_data.era_query.search.clone(),
            };
            return true;
        }
        _ => return false,
    };
    load_eras(runtime, view_data, internal_tx);
    emit_status(state, view_data, internal_tx, status);
    true
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

fn handle_table_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Enter => {
            if let Some(request) = selected_detail_request(state, view_data) {
                open_detail(runtime, view_data, internal_tx, request);
            }
            return;
        }
        KeyCode::Char('/') => {
            if active_table(state, view_data).is_some() {
                view_data.list_search = ListSearch::Local;
            }
            return;
        }
        _ => {}
    }

    let status = {
        let Some(table) = active_table(state, view_data) else {
            return;
        };
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                table.move_cursor(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                table.move_cursor(-1);
                None
            }
            KeyCode::Char('h') => {
                table.move_column(-1);
                None
            }
            KeyCode::Char('l') => {
                table.move_column(1);
                None
            }
            KeyCode::Char('s') => table
                .toggle_sort_selected()
                .map(|(label, direction)| format!("sorted by {label} {}", direction.as_str())),
            KeyCode::Right | KeyCode::Char('.') => {
                table.next_page();
                None
            }
            KeyCode::Left | KeyCode::Char(',') => {
                table.prev_page();
                None
            }
            _ => None,
        }
    };
    if let Some(status) = status {
        emit_status(state, view_data, internal_tx, status);
    }
}

fn handle_mouse_event(view_data: &mut ViewData, area: Rect, mouse: MouseEvent) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    let position = Position::new(mouse.column, mouse.row);
    if view_data.active_modal().is_some() {
        if !modal_rect(area).contains(position) {
            view_data.close_modals();
        }
    } else if view_data.selector.is_open() {
        if !selector_rect(area).contains(position) {
            view_data.selector.close();
        }
    } else if view_data.search.visible {
        if !search_rect(area).contains(position) {
            close_search(view_data);
        }
    } else if view_data.help_visible && !help_rect(area).contains(position) {
        view_data.help_visible = false;
    }
}

fn modal_rect(area: Rect) -> Rect {
    centered_rect(84, 84, area)
}

fn selector_rect(area: Rect) -> Rect {
    centered_rect(60, 60, area)
}

fn search_rect(area: Rect) -> Rect {
    centered_rect(70, 60, area)
}

fn help_rect(area: Rect) -> Rect {
    centered_rect(80, 72, area)
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let selected = PageKind::ALL
        .iter()
        .position(|page| *page == state.active_page)
        .unwrap_or(0);
    let titles = PageKind::ALL
        .iter()
        .enumerate()
        .map(|(index, page)| format!("{} {}", index + 1, page.label()))
        .collect::<Vec<String>>();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title(header_title(state, view_data))
                .borders(Borders::ALL),
        )
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    match state.active_page {
        PageKind::Dashboard => {
            let body = Paragraph::new(dashboard_text(&view_data.dashboard))
                .block(Block::default().borders(Borders::ALL).title("Dashboard"));
            frame.render_widget(body, layout[1]);
        }
        PageKind::Claims => render_list(
            frame,
            layout[1],
            ListFrame {
                title: "All Claims".to_owned(),
                what: "claims",
                sort: view_data.claims.sort(),
                sortable_marker: false,
                footer: pagination_footer(&view_data.claims),
                focused: true,
            },
            &view_data.claims,
        ),
        PageKind::Practices => render_practices(frame, layout[1], state, view_data),
        PageKind::Remittance => render_remittance(frame, layout[1], view_data),
        PageKind::Analytics => render_analytics(frame, layout[1], state, view_data),
    }

    let status_widget = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);

    if let Some(kind) = view_data.active_modal() {
        let area = modal_rect(frame.area());
        frame.render_widget(Clear, area);
        let (title, text) = match kind {
            ModalKind::Patient => ("Patient", patient_modal_text(&view_data.patient_modal)),
            ModalKind::Encounter => (
                "Encounter",
                encounter_modal_text(&view_data.encounter_modal),
            ),
            ModalKind::Claim => ("Claim", claim_modal_text(&view_data.claim_modal)),
            ModalKind::Era => (
                "Remittance",
                era_modal_text(&view_data.era_modal, view_data.bundle_filter),
            ),
        };
        let modal = Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .scroll((view_data.modal_scroll, 0))
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .title_bottom(Line::from("esc close | j/k scroll").right_aligned()),
            );
        frame.render_widget(modal, area);
    }

    if view_data.selector.is_open() {
        let area = selector_rect(frame.area());
        frame.render_widget(Clear, area);
        let selector = Paragraph::new(selector_overlay_text(view_data))
            .block(Block::default().title("Select practice").borders(Borders::ALL));
        frame.render_widget(selector, area);
    }

    if view_data.search.visible {
        let area = search_rect(frame.area());
        frame.render_widget(Clear, area);
        let search = Paragraph::new(search_overlay_text(&view_data.search))
            .block(Block::default().title("Search").borders(Borders::ALL));
        frame.render_widget(search, area);
    }

    if view_data.help_visible {
        let area = help_rect(frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn header_title(state: &AppState, view_data: &ViewData) -> String {
    let practice = match state.practice.as_ref() {
        Some(id) => selection_label(&view_data.practices, Some(id)),
        None => ALL_PRACTICES_LABEL.to_owned(),
    };
    format!("talisman | {practice}")
}

struct ListFrame {
    title: String,
    what: &'static str,
    sort: SortState,
    sortable_marker: bool,
    footer: Option<String>,
    focused: bool,
}

fn pagination_footer<R: Record + 'static>(view: &ListView<R>) -> Option<String> {
    view.shows_pagination()
        .then(|| view.pagination().label(view.total_pages()))
}

/// Placeholder text when the list has no rows to draw.
fn list_placeholder<R: Record + 'static>(view: &ListView<R>, what: &str) -> Option<String> {
    match view.phase() {
        LoadPhase::Loading { .. } => Some(format!("Loading {what}...")),
        LoadPhase::Failed(message) => Some(format!("Failed to load {what}: {message}")),
        LoadPhase::Idle | LoadPhase::Ready => view
            .visible()
            .is_empty()
            .then(|| view.empty_message().to_owned()),
    }
}

fn header_label(label: &str, direction: Option<SortDirection>, marker: bool) -> String {
    match direction {
        Some(direction) => format!("{label}{}", direction.arrow()),
        None if marker => format!("{label} ↕"),
        None => label.to_owned(),
    }
}

fn visible_cells<R: Record + 'static>(view: &ListView<R>) -> Vec<Vec<String>> {
    view.visible()
        .into_iter()
        .map(|record| {
            view.columns()
                .iter()
                .map(|column| column.cell(record))
                .collect()
        })
        .collect()
}

fn aligned_cell<R: Record + 'static>(column: &Column<R>, text: String) -> Cell<'static> {
    match column.align {
        Align::Left => Cell::from(text),
        Align::Right => Cell::from(Line::from(text).alignment(Alignment::Right)),
    }
}

fn render_list<R: Record + 'static>(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    list: ListFrame,
    view: &ListView<R>,
) {
    let border_style = if list.focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let mut block = Block::default()
        .title(list.title)
        .borders(Borders::ALL)
        .border_style(border_style);
    if let Some(footer) = list.footer {
        block = block.title_bottom(Line::from(footer).right_aligned());
    }

    if let Some(placeholder) = list_placeholder(view, list.what) {
        frame.render_widget(Paragraph::new(placeholder).block(block), area);
        return;
    }

    let columns = view.columns();
    let widths = vec![Constraint::Min(8); columns.len().max(1)];
    let header_cells = columns.iter().map(|column| {
        let label = header_label(
            column.label,
            list.sort.direction_for(column.key),
            list.sortable_marker && ERA_SORT_KEYS.contains(&column.key),
        );
        Cell::from(label).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    });
    let header = Row::new(header_cells);

    let rows = visible_cells(view)
        .into_iter()
        .enumerate()
        .map(|(row_index, cells)| {
            let selected_row = list.focused && row_index == view.cursor();
            let cells = cells
                .into_iter()
                .zip(columns)
                .enumerate()
                .map(|(column_index, (text, column))| {
                    let mut style = Style::default();
                    if selected_row {
                        style = style.bg(Color::DarkGray);
                    }
                    if selected_row && column_index == view.column_cursor() {
                        style = Style::default()
                            .fg(Color::Black)
                            .bg(Color::Cyan)
                            .add_modifier(Modifier::BOLD);
                    }
                    aligned_cell(column, text).style(style)
                })
                .collect::<Vec<_>>();
            Row::new(cells)
        })
        .collect::<Vec<_>>();

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(block);
    frame.render_widget(table, area);
}

fn render_practices(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
) {
    let Some(practice) = state.practice.as_ref() else {
        let prompt = Paragraph::new(
            "Select a practice to view patients, encounters, claims and financial metrics.\n\
Press P to choose a practice.",
        )
        .block(Block::default().borders(Borders::ALL).title("Practices"));
        frame.render_widget(prompt, area);
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);
    let selected = PracticeTab::ALL
        .iter()
        .position(|tab| *tab == state.practice_tab)
        .unwrap_or(0);
    let tabs = Tabs::new(PracticeTab::ALL.iter().map(|tab| tab.label()).collect::<Vec<_>>())
        .block(Block::default().borders(Borders::ALL).title("[ ] switch"))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    let name = view_data.practice_name(Some(practice));
    match state.practice_tab {
        PracticeTab::Patients => render_list(
            frame,
            layout[1],
            ListFrame {
                title: format!("Patients at {name}"),
                what: "patients",
                sort: view_data.patients.sort(),
                sortable_marker: false,
                footer: pagination_footer(&view_data.patients),
                focused: true,
            },
            &view_data.patients,
        ),
        PracticeTab::Encounters => render_list(
            frame,
            layout[1],
            ListFrame {
                title: format!("Encounters at {name}"),
                what: "encounters",
                sort: view_data.encounters.sort(),
                sortable_marker: false,
                footer: pagination_footer(&view_data.encounters),
                focused: true,
            },
            &view_data.encounters,
        ),
        PracticeTab::Claims => {
            let suffix = if view_data.paid_only {
                " (paid only)"
            } else {
                ""
            };
            render_list(
                frame,
                layout[1],
                ListFrame {
                    title: format!("Claims at {name}{suffix}"),
                    what: "claims",
                    sort: view_data.practice_claims.sort(),
                    sortable_marker: false,
                    footer: pagination_footer(&view_data.practice_claims),
                    focused: true,
                },
                &view_data.practice_claims,
            );
        }
        PracticeTab::Financial => {
            let body = Paragraph::new(financial_text(&view_data.financial)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Financial metrics for {name}")),
            );
            frame.render_widget(body, layout[1]);
        }
    }
}

fn render_remittance(frame: &mut ratatui::Frame<'_>, area: Rect, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);
    let filters = Paragraph::new(era_filter_text(view_data))
        .block(Block::default().borders(Borders::ALL).title("Filters"));
    frame.render_widget(filters, layout[0]);

    render_list(
        frame,
        layout[1],
        ListFrame {
            title: PageKind::Remittance.label().to_owned(),
            what: "remittances",
            sort: view_data.era_query.sort,
            sortable_marker: true,
            footer: era_footer(&view_data.era_query, view_data.era_has_more),
            focused: true,
        },
        &view_data.eras,
    );
}

fn era_filter_text(view_data: &ViewData) -> String {
    let query = &view_data.era_query;
    let search = match &view_data.list_search {
        ListSearch::Remote { draft } => format!("{draft}_"),
        _ if query.search.is_empty() => "-".to_owned(),
        _ => query.search.clone(),
    };
    format!(
        "search: {search} | [i] hide informational: {} | [r] rejections: {} | [d] denials: {}",
        on_off(query.hide_informational),
        on_off(query.show_rejections),
        on_off(query.show_denials),
    )
}

/// The server does not report a total, so only the current page is shown and
/// only once there is somewhere to go.
fn era_footer(query: &EraQuery, has_more: bool) -> Option<String> {
    (query.page > 1 || has_more).then(|| {
        let more = if has_more { " (more →)" } else { "" };
        format!("Page {}{more}", query.page)
    })
}

fn render_analytics(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Min(6),
            Constraint::Length(8),
        ])
        .split(area);

    let scope = view_data.practice_name(state.practice.as_ref());
    let summary = Paragraph::new(analytics_summary_text(
        &view_data.analytics,
        view_data.options.days_back,
    ))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Performance: {scope}")),
    );
    frame.render_widget(summary, layout[0]);

    let tables = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(layout[1]);
    render_list(
        frame,
        tables[0],
        ListFrame {
            title: "Payer performance".to_owned(),
            what: "payer performance",
            sort: view_data.payers.sort(),
            sortable_marker: false,
            footer: pagination_footer(&view_data.payers),
            focused: view_data.analytics_focus == AnalyticsFocus::Payers,
        },
        &view_data.payers,
    );
    render_list(
        frame,
        tables[1],
        ListFrame {
            title: "Procedure performance".to_owned(),
            what: "procedure performance",
            sort: view_data.cpts.sort(),
            sortable_marker: false,
            footer: pagination_footer(&view_data.cpts),
            focused: view_data.analytics_focus == AnalyticsFocus::Cpts,
        },
        &view_data.cpts,
    );

    let actions = Paragraph::new(action_items_text(&view_data.analytics))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Action items"));
    frame.render_widget(actions, layout[2]);
}

fn loadable_placeholder<T>(loadable: &Loadable<T>, what: &str) -> Option<String> {
    match &loadable.phase {
        LoadPhase::Loading { .. } => Some(format!("Loading {what}...")),
        LoadPhase::Failed(message) => Some(format!("Failed to load {what}: {message}")),
        LoadPhase::Idle | LoadPhase::Ready => None,
    }
}

fn dashboard_text(dashboard: &Loadable<DashboardSnapshot>) -> String {
    if let Some(placeholder) = loadable_placeholder(dashboard, "dashboard") {
        return placeholder;
    }
    let snapshot = dashboard.value.clone().unwrap_or_default();
    let metrics = snapshot.metrics;
    let mut lines = vec![
        format!(
            "Total Encounters  {}",
            format_count(metrics.total_encounters)
        ),
        format!("Total Claims      {}", format_count(metrics.total_claims)),
        format!(
            "Total Billed      {}",
            format_currency_whole(metrics.total_billed_cents)
        ),
        format!(
            "Total Paid        {}",
            format_currency_whole(metrics.total_paid_cents)
        ),
        format!(
            "Collection Rate   {}",
            format_percent_points(metrics.collection_rate)
        ),
        format!("Practices         {}", format_count(metrics.practices_count)),
        String::new(),
        "Recent activity".to_owned(),
    ];

    if snapshot.activity.is_empty() {
        lines.push("No recent activity.".to_owned());
    }
    let peak = snapshot
        .activity
        .iter()
        .map(|point| point.count)
        .max()
        .unwrap_or(0)
        .max(1);
    for point in &snapshot.activity {
        let width = (point.count as usize * ACTIVITY_BAR_WIDTH).div_ceil(peak as usize);
        lines.push(format!(
            "{}  {} {}",
            format_short_date(Some(point.date.as_str())),
            "█".repeat(width),
            point.count
        ));
    }
    lines.join("\n")
}

fn metric_line(label: &str, reading: &MetricReading, unit: &str) -> String {
    let value = reading
        .value
        .map(|value| format!("{}{unit}", format_number(value)))
        .unwrap_or_else(|| MISSING.to_owned());
    let level = reading
        .performance
        .map(|level| level.as_str())
        .unwrap_or("-");
    format!(
        "{label:<26} {value:>10}  {:<12} {level}",
        format_trend(reading.trend)
    )
}

fn financial_text(financial: &Loadable<FinancialMetrics>) -> String {
    if let Some(placeholder) = loadable_placeholder(financial, "financial metrics") {
        return placeholder;
    }
    let Some(metrics) = &financial.value else {
        return "No financial metrics available.".to_owned();
    };
    [
        metric_line("Days in A/R", &metrics.days_in_ar, ""),
        metric_line("Net Collection Rate", &metrics.net_collection_rate, "%"),
        metric_line(
            "Patient Collection Rate",
            &metrics.patient_collection_rate,
            "%",
        ),
        metric_line("Denial Rate", &metrics.denial_rate, "%"),
        metric_line("A/R > 120 Days", &metrics.ar_over_120_days, "%"),
    ]
    .join("\n")
}

fn analytics_summary_text(analytics: &Loadable<AnalyticsSnapshot>, days_back: u32) -> String {
    if let Some(placeholder) = loadable_placeholder(analytics, "analytics") {
        return placeholder;
    }
    let summary = analytics
        .value
        .as_ref()
        .map(|snapshot| snapshot.summary.clone())
        .unwrap_or_default();
    let vs_overall = summary.denial_rate_vs_overall * 100.0;
    let sign = if vs_overall > 0.0 { "+" } else { "" };
    [
        format!("Last {days_back} days"),
        format!(
            "Claims {}   Billed {}   Paid {}",
            format_count(summary.total_claims),
            format_compact_currency(summary.total_billed_cents),
            format_compact_currency(summary.total_paid_cents),
        ),
        format!(
            "Denial rate {} ({sign}{} pts vs overall)",
            format_percent_fraction(summary.denial_rate),
            format_number((vs_overall * 10.0).round() / 10.0),
        ),
        format!(
            "Denied {}   Recovery potential {}",
            format_currency(summary.denied_cents),
            format_currency(summary.recovery_potential_cents),
        ),
        format!(
            "High-risk claims {} ({})",
            format_count(summary.high_risk_claims),
            format_percent_points(summary.high_risk_pct),
        ),
        "t switch table | s sort | ,/. page".to_owned(),
    ]
    .join("\n")
}

fn action_items_text(analytics: &Loadable<AnalyticsSnapshot>) -> String {
    let actions = analytics
        .value
        .as_ref()
        .map(|snapshot| snapshot.actions.as_slice())
        .unwrap_or_default();
    if actions.is_empty() {
        return "No action items.".to_owned();
    }
    actions
        .iter()
        .map(|item| {
            let mut line = format!(
                "[{}] {} ({})",
                item.priority.as_str().to_uppercase(),
                item.title,
                format_currency_whole(item.financial_impact_cents)
            );
            if !item.recommendation.is_empty() {
                line.push_str(&format!(": {}", item.recommendation));
            }
            for step in &item.next_steps {
                line.push_str(&format!("\n    - {step}"));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn modal_placeholder<I, T>(modal: &DetailModal<I, T>) -> Option<String>
where
    I: Clone + PartialEq + std::fmt::Display,
{
    match modal.phase() {
        ModalPhase::Closed => Some(String::new()),
        ModalPhase::Loading { id, .. } => Some(format!("Loading {id}...")),
        ModalPhase::Error { .. } => Some(MODAL_ERROR_TEXT.to_owned()),
        ModalPhase::Loaded { .. } => None,
    }
}

fn service_line_rows(lines: &[ServiceLine], out: &mut Vec<String>) {
    if lines.is_empty() {
        out.push("  No service lines.".to_owned());
    }
    for line in lines {
        out.push(format!(
            "  {}  {:<6} {:<32} billed {:>10}  paid {:>10}",
            format_short_date(line.date.as_deref()),
            line.proc_code,
            line.description,
            format_currency(line.billed_cents),
            format_currency(line.paid_cents),
        ));
        for adjustment in parse_adjustments(&line.adjustments) {
            out.push(format!(
                "      {} {}  {}",
                adjustment.code,
                adjustment.amount.as_deref().unwrap_or(""),
                adjustment.description
            ));
        }
    }
}

fn remittance_rows(remittances: &[RemittanceRef], out: &mut Vec<String>) {
    if remittances.is_empty() {
        out.push("  No remittances received.".to_owned());
    }
    for remittance in remittances {
        out.push(format!(
            "  {}  check {} ({})  paid {}  patient resp {}  ref {}",
            remittance.payer,
            remittance.check_number,
            format_short_date(remittance.check_date.as_deref()),
            format_currency(remittance.paid_cents),
            format_currency(remittance.patient_resp_cents),
            remittance.claim_reference,
        ));
    }
}

fn patient_modal_text(modal: &DetailModal<PatientId, PatientDetail>) -> String {
    if let Some(placeholder) = modal_placeholder(modal) {
        return placeholder;
    }
    let Some(detail) = modal.detail() else {
        return String::new();
    };
    let mut out = vec![
        detail.full_name.clone(),
        format!(
            "Patient ID {}   DOB {}   Gender {}",
            detail.patient_id,
            format_long_date(detail.dob.as_deref()),
            detail.gender_label()
        ),
        format!("Case {}", detail.case_id),
        format!("Address {}", detail.address),
        String::new(),
        "Insurance".to_owned(),
    ];
    match &detail.insurance {
        Some(insurance) => out.push(format!(
            "  {} {}  policy {}  group {}",
            insurance.company, insurance.plan, insurance.policy_number, insurance.group_number
        )),
        None => out.push("  No insurance on file.".to_owned()),
    }
    out.push(String::new());
    out.push(format!("Visits ({})", detail.visits.len()));
    for visit in &detail.visits {
        let codes = visit
            .diagnoses
            .iter()
            .map(|diagnosis| diagnosis.code.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        out.push(format!(
            "  {}  {}  billed {}  paid {}  dx {}",
            format_short_date(visit.date.as_deref()),
            visit.location,
            format_currency(visit.billed_cents),
            format_currency(visit.paid_cents),
            if codes.is_empty() { "-" } else { &codes },
        ));
    }
    out.join("\n")
}

fn encounter_modal_text(modal: &DetailModal<EncounterId, EncounterDetail>) -> String {
    if let Some(placeholder) = modal_placeholder(modal) {
        return placeholder;
    }
    let Some(detail) = modal.detail() else {
        return String::new();
    };
    let mut out = vec![
        format!(
            "{} at {}   {} / {}",
            format_long_date(detail.date.as_deref()),
            detail.location,
            detail.kind,
            detail.status
        ),
        format!(
            "Patient {} ({})  DOB {}",
            detail.patient_name,
            detail.patient_id,
            format_long_date(detail.patient_dob.as_deref())
        ),
        format!("Address {}", detail.patient_address),
        format!(
            "Provider {} (NPI {})   Payer {}",
            detail.provider_name, detail.provider_npi, detail.payer
        ),
        String::new(),
        "Diagnoses".to_owned(),
    ];
    if detail.diagnoses.is_empty() {
        out.push("  None recorded.".to_owned());
    }
    for diagnosis in &detail.diagnoses {
        out.push(format!("  {}  {}", diagnosis.code, diagnosis.description));
    }
    out.push(String::new());
    out.push("Service lines".to_owned());
    service_line_rows(&detail.lines, &mut out);
    out.push(String::new());
    out.push("Remittances".to_owned());
    remittance_rows(&detail.remittances, &mut out);
    out.push(String::new());
    out.push(format!(
        "Total billed {}   Total paid {}",
        format_currency(detail.billed_cents),
        format_currency(detail.paid_cents)
    ));
    out.join("\n")
}

fn claim_modal_text(modal: &DetailModal<ClaimId, ClaimDetail>) -> String {
    if let Some(placeholder) = modal_placeholder(modal) {
        return placeholder;
    }
    let Some(detail) = modal.detail() else {
        return String::new();
    };
    let mut out = vec![
        format!("Claim {}   {}", detail.reference_id, detail.status),
        format!(
            "Service date {}   Patient {}   Provider {}",
            format_long_date(detail.date.as_deref()),
            detail.patient_name,
            detail.provider
        ),
        String::new(),
        "Service lines".to_owned(),
    ];
    service_line_rows(&detail.lines, &mut out);
    out.push(String::new());
    out.push("Remittances".to_owned());
    remittance_rows(&detail.remittances, &mut out);
    out.push(String::new());
    out.push(format!(
        "Billed {}   Paid {}   Balance {}",
        format_currency(detail.billed_cents),
        format_currency(detail.paid_cents),
        format_currency(detail.balance_cents)
    ));
    out.join("\n")
}

fn era_modal_text(modal: &DetailModal<EraId, EraDetail>, filter: BundleFilter) -> String {
    if let Some(placeholder) = modal_placeholder(modal) {
        return placeholder;
    }
    let Some(detail) = modal.detail() else {
        return String::new();
    };
    let mut out = vec![
        format!("{}  {}", detail.id, detail.payer),
        format!(
            "File {}   Received {}   Practice {}",
            detail.file_name,
            format_long_date(detail.received_date.as_deref()),
            detail.practice
        ),
        format!(
            "Check {} ({})   Method {}   Total paid {}   Claims {}",
            detail.check_number,
            format_short_date(detail.check_date.as_deref()),
            detail.method,
            format_currency(detail.total_paid_cents),
            format_count(detail.claim_count)
        ),
        format!(
            "Paid {}   Rejected {}   Denied {}",
            detail.summary.paid, detail.summary.rejected, detail.summary.denied
        ),
        format!("Filter: {} (f to cycle)", filter.label()),
    ];

    let bundles = filter_bundles(&detail.bundles, filter);
    if bundles.is_empty() {
        out.push(String::new());
        out.push("No claims match this filter.".to_owned());
    }
    for bundle in bundles {
        out.push(String::new());
        out.push(format!(
            "Claim {}   paid {}   patient resp {}",
            bundle.reference_id,
            format_currency(bundle.bundle_paid_cents),
            format_currency(bundle.patient_resp_cents)
        ));
        for line in &bundle.claims {
            let flag = if line.previously_rejected {
                " (previously rejected)"
            } else {
                ""
            };
            out.push(format!(
                "  {}  {}  {:<6} billed {:>10}  paid {:>10}  {}{flag}",
                line.claim_id,
                format_short_date(line.date.as_deref()),
                line.proc_code,
                format_currency(line.billed_cents),
                format_currency(line.paid_cents),
                line.status.as_str(),
            ));
            out.push(format!(
                "      patient {}  provider {}  dx {}",
                line.patient, line.provider, line.diagnoses
            ));
            for adjustment in parse_adjustments(&line.adjustments) {
                out.push(format!(
                    "      {} {}  {}",
                    adjustment.code,
                    adjustment.amount.as_deref().unwrap_or(""),
                    adjustment.description
                ));
            }
        }
    }
    out.join("\n")
}

fn selector_overlay_text(view_data: &ViewData) -> String {
    let selector = &view_data.selector;
    let mut lines = vec![format!("Search: {}_", selector.search()), String::new()];
    for (index, entry) in selector
        .entries(&view_data.practices)
        .iter()
        .enumerate()
    {
        let marker = if index == selector.cursor() { ">" } else { " " };
        let meta = entry.meta();
        if meta.is_empty() {
            lines.push(format!("{marker} {}", entry.label()));
        } else {
            lines.push(format!("{marker} {}  ({meta})", entry.label()));
        }
    }
    if let Some(message) = selector.empty_message(&view_data.practices) {
        lines.push(String::new());
        lines.push(message.to_owned());
    }
    lines.push(String::new());
    lines.push("type to filter | up/down | enter select | esc close".to_owned());
    lines.join("\n")
}

fn search_overlay_text(search: &GlobalSearchUi) -> String {
    let scope = search.kind.map_or("all", SearchKind::as_str);
    let mut lines = vec![
        format!("Search ({scope}): {}_", search.input),
        String::new(),
    ];
    if search.input.trim().chars().count() < MIN_SEARCH_CHARS {
        lines.push(format!("Type at least {MIN_SEARCH_CHARS} characters."));
    } else {
        match &search.phase {
            LoadPhase::Loading { .. } | LoadPhase::Idle => lines.push("Searching...".to_owned()),
            LoadPhase::Failed(message) => lines.push(format!("Search failed: {message}")),
            LoadPhase::Ready if search.results.is_empty() => {
                lines.push("No results found.".to_owned());
            }
            LoadPhase::Ready => {
                for (index, result) in search.results.iter().enumerate() {
                    let marker = if index == search.cursor { ">" } else { " " };
                    lines.push(format!(
                        "{marker} [{}] {}  {}",
                        result.kind.as_str(),
                        result.label,
                        result.subtext
                    ));
                }
            }
        }
    }
    lines.push(String::new());
    lines.push("tab kind | up/down | enter open | esc close".to_owned());
    lines.join("\n")
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if status_hidden_by_overlay(view_data) {
        return String::new();
    }

    let mode = match view_data.list_search {
        ListSearch::Inactive => "NAV",
        ListSearch::Local | ListSearch::Remote { .. } => "SEARCH",
    };
    let page_hint = match state.active_page {
        PageKind::Dashboard => "R refresh",
        PageKind::Claims => "enter claim | / filter | s sort",
        PageKind::Practices => match state.practice_tab {
            PracticeTab::Claims => "[/] tabs | enter detail | f paid only",
            PracticeTab::Financial => "[/] tabs",
            PracticeTab::Patients | PracticeTab::Encounters => "[/] tabs | enter detail",
        },
        PageKind::Remittance => "enter ERA | i/r/d filters | / search | s sort",
        PageKind::Analytics => "t switch table | s sort",
    };
    let default = format!("tab pages | P practice | g search | {page_hint} | ? help | q quit");
    match &state.status_line {
        Some(status) => format!("{mode} | {status} | {default}"),
        None => format!("{mode} | {default}"),
    }
}

fn status_hidden_by_overlay(view_data: &ViewData) -> bool {
    view_data.help_visible
        || view_data.selector.is_open()
        || view_data.search.visible
        || view_data.active_modal().is_some()
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q/q quit | ? help | tab/shift+tab pages | 1-5 jump | R refresh\n\
global: P practice selector | g search everything\n\
tables: j/k rows | h/l columns | s sort column | ,/. or left/right page | / filter | enter detail\n\
practices: [/] switch tab | f paid only (claims tab)\n\
remittance: i hide informational | r rejections | d denials | / server search (enter apply)\n\
analytics: t switch payer/procedure table\n\
detail: j/k scroll | f cycle bundle filter (ERA) | esc close | click outside close\n\
selector: type filter | up/down | enter select | esc close\n\
search: type query | tab kind | up/down | enter open | esc close"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
