// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Generic sortable, filterable, paginated list views.
//!
//! The free functions ([`apply_filter`], [`apply_sort`], [`paginate`]) are the
//! pure derivation pipeline. [`ListView`] threads the state those functions
//! need (sort, search text, discriminant filter, page, cursor, load phase)
//! for one on-screen table.

use std::borrow::Cow;
use std::cmp::Ordering;

use crate::filter::matches_search;
use crate::format::{format_currency, format_number};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Number(f64),
    Money(i64),
    Text(&'a str),
    Empty,
}

impl FieldValue<'_> {
    fn numeric(self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(value),
            Self::Money(cents) => Some(cents as f64),
            Self::Text(_) | Self::Empty => None,
        }
    }

    pub fn display(&self) -> Cow<'_, str> {
        match self {
            Self::Number(value) => Cow::Owned(format_number(*value)),
            Self::Money(cents) => Cow::Owned(format_currency(*cents)),
            Self::Text(value) => Cow::Borrowed(value),
            Self::Empty => Cow::Borrowed(""),
        }
    }
}

/// Numbers compare numerically; anything else falls back to [`locale_compare`]
/// on the displayed text.
pub fn compare_fields(left: FieldValue<'_>, right: FieldValue<'_>) -> Ordering {
    match (left.numeric(), right.numeric()) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        _ => locale_compare(&left.display(), &right.display()),
    }
}

/// Case-insensitive ordering with lowercase sorting ahead of uppercase when
/// two strings differ only by case.
pub fn locale_compare(left: &str, right: &str) -> Ordering {
    left.chars()
        .flat_map(char::to_lowercase)
        .cmp(right.chars().flat_map(char::to_lowercase))
        .then_with(|| right.cmp(left))
}

pub trait Record {
    fn field(&self, key: &str) -> FieldValue<'_>;

    /// Fields consulted by free-text search.
    fn search_fields(&self) -> Vec<&str> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

pub struct Column<R: 'static> {
    pub key: &'static str,
    pub label: &'static str,
    pub align: Align,
    pub render: Option<fn(&R) -> String>,
}

impl<R: Record + 'static> Column<R> {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            align: Align::Left,
            render: None,
        }
    }

    pub const fn right(mut self) -> Self {
        self.align = Align::Right;
        self
    }

    pub const fn rendered(mut self, render: fn(&R) -> String) -> Self {
        self.render = Some(render);
        self
    }

    pub fn cell(&self, record: &R) -> String {
        match self.render {
            Some(render) => render(record),
            None => record.field(self.key).display().into_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Asc => " ↑",
            Self::Desc => " ↓",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub key: Option<&'static str>,
    pub direction: SortDirection,
}

impl SortState {
    pub const fn unsorted() -> Self {
        Self {
            key: None,
            direction: SortDirection::Desc,
        }
    }

    pub const fn by(key: &'static str, direction: SortDirection) -> Self {
        Self {
            key: Some(key),
            direction,
        }
    }

    /// Repeat activation flips direction; a new key always starts descending.
    pub fn toggle(&mut self, key: &'static str) {
        if self.key == Some(key) {
            self.direction = self.direction.flipped();
        } else {
            self.key = Some(key);
            self.direction = SortDirection::Desc;
        }
    }

    pub fn direction_for(&self, key: &str) -> Option<SortDirection> {
        (self.key == Some(key)).then_some(self.direction)
    }
}

pub fn apply_filter<'a, R>(records: &'a [R], mut predicate: impl FnMut(&R) -> bool) -> Vec<&'a R> {
    records.iter().filter(|record| predicate(record)).collect()
}

pub fn apply_sort<'a, R: Record>(mut records: Vec<&'a R>, sort: &SortState) -> Vec<&'a R> {
    let Some(key) = sort.key else {
        return records;
    };
    records.sort_by(|left, right| {
        let ordering = compare_fields(left.field(key), right.field(key));
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    records
}

#[derive(Debug, PartialEq)]
pub struct Page<'a, T> {
    pub visible: &'a [T],
    pub total_pages: usize,
}

/// Slices out 1-based `page`. Pages outside `1..=total_pages` are empty rather
/// than clamped. Panics when `per_page` is zero.
pub fn paginate<T>(records: &[T], page: usize, per_page: usize) -> Page<'_, T> {
    assert!(per_page > 0, "per_page must be positive");
    let total_pages = records.len().div_ceil(per_page);
    if page == 0 || page > total_pages {
        return Page {
            visible: &[],
            total_pages,
        };
    }
    let start = (page - 1) * per_page;
    let end = (start + per_page).min(records.len());
    Page {
        visible: &records[start..end],
        total_pages,
    }
}

/// Controls render only when there is somewhere to move to.
pub const fn shows_pagination(total_pages: usize) -> bool {
    total_pages > 1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    pub const fn new(per_page: usize) -> Self {
        Self { page: 1, per_page }
    }

    pub fn next(&mut self, total_pages: usize) -> bool {
        if self.page >= total_pages {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn prev(&mut self) -> bool {
        if self.page <= 1 {
            return false;
        }
        self.page -= 1;
        true
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    pub fn label(&self, total_pages: usize) -> String {
        format!("Page {} of {}", self.page, total_pages)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading {
        request_id: u64,
    },
    Ready,
    Failed(String),
}

impl LoadPhase {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}

pub struct ListView<R: 'static> {
    records: Vec<R>,
    columns: &'static [Column<R>],
    sort: SortState,
    search: String,
    discriminant: Option<fn(&R) -> bool>,
    pagination: Pagination,
    cursor: usize,
    column_cursor: usize,
    empty_message: &'static str,
    phase: LoadPhase,
}

impl<R: Record + 'static> ListView<R> {
    pub fn new(
        columns: &'static [Column<R>],
        per_page: usize,
        empty_message: &'static str,
    ) -> Self {
        Self {
            records: Vec::new(),
            columns,
            sort: SortState::unsorted(),
            search: String::new(),
            discriminant: None,
            pagination: Pagination::new(per_page),
            cursor: 0,
            column_cursor: 0,
            empty_message,
            phase: LoadPhase::Idle,
        }
    }

    pub fn with_sort(mut self, sort: SortState) -> Self {
        self.sort = sort;
        self
    }

    pub fn columns(&self) -> &'static [Column<R>] {
        self.columns
    }

    pub fn set_columns(&mut self, columns: &'static [Column<R>]) {
        self.columns = columns;
        self.column_cursor = self
            .column_cursor
            .min(columns.len().saturating_sub(1));
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn empty_message(&self) -> &'static str {
        self.empty_message
    }

    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn column_cursor(&self) -> usize {
        self.column_cursor
    }

    pub fn set_records(&mut self, records: Vec<R>) {
        self.records = records;
        self.phase = LoadPhase::Ready;
        self.pagination.reset();
        self.cursor = 0;
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.phase = LoadPhase::Idle;
        self.pagination.reset();
        self.cursor = 0;
    }

    pub fn begin_load(&mut self, request_id: u64) {
        self.phase = LoadPhase::Loading { request_id };
    }

    /// Applies a completed fetch. Results for anything but the in-flight
    /// request are dropped and `false` is returned.
    pub fn finish_load(&mut self, request_id: u64, result: Result<Vec<R>, String>) -> bool {
        if self.phase != (LoadPhase::Loading { request_id }) {
            return false;
        }
        match result {
            Ok(records) => self.set_records(records),
            Err(message) => {
                self.records.clear();
                self.pagination.reset();
                self.cursor = 0;
                self.phase = LoadPhase::Failed(message);
            }
        }
        true
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.filter_changed();
    }

    pub fn push_search_char(&mut self, ch: char) {
        self.search.push(ch);
        self.filter_changed();
    }

    pub fn pop_search_char(&mut self) {
        self.search.pop();
        self.filter_changed();
    }

    pub fn set_discriminant(&mut self, predicate: Option<fn(&R) -> bool>) {
        self.discriminant = predicate;
        self.filter_changed();
    }

    fn filter_changed(&mut self) {
        self.pagination.reset();
        self.cursor = 0;
    }

    pub fn toggle_sort(&mut self, key: &'static str) -> SortState {
        self.sort.toggle(key);
        self.cursor = 0;
        self.sort
    }

    /// Toggles sort on the column under the column cursor.
    pub fn toggle_sort_selected(&mut self) -> Option<(&'static str, SortDirection)> {
        let column = self.columns.get(self.column_cursor)?;
        let (key, label) = (column.key, column.label);
        let sort = self.toggle_sort(key);
        Some((label, sort.direction))
    }

    /// Filtered and sorted records, before pagination.
    pub fn derived(&self) -> Vec<&R> {
        let term = self.search.trim().to_lowercase();
        let filtered = apply_filter(&self.records, |record| {
            matches_search(&term, &record.search_fields())
                && self.discriminant.is_none_or(|predicate| predicate(record))
        });
        apply_sort(filtered, &self.sort)
    }

    pub fn total_pages(&self) -> usize {
        self.derived().len().div_ceil(self.pagination.per_page.max(1))
    }

    pub fn visible(&self) -> Vec<&R> {
        let derived = self.derived();
        paginate(&derived, self.pagination.page, self.pagination.per_page)
            .visible
            .to_vec()
    }

    pub fn shows_pagination(&self) -> bool {
        shows_pagination(self.total_pages())
    }

    pub fn next_page(&mut self) -> bool {
        let total = self.total_pages();
        let moved = self.pagination.next(total);
        if moved {
            self.cursor = 0;
        }
        moved
    }

    pub fn prev_page(&mut self) -> bool {
        let moved = self.pagination.prev();
        if moved {
            self.cursor = 0;
        }
        moved
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.visible().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let next = (self.cursor as isize + delta).clamp(0, len as isize - 1);
        self.cursor = next as usize;
    }

    pub fn move_column(&mut self, delta: isize) {
        if self.columns.is_empty() {
            return;
        }
        let last = self.columns.len() as isize - 1;
        self.column_cursor = (self.column_cursor as isize + delta).clamp(0, last) as usize;
    }

    pub fn selected(&self) -> Option<&R> {
        self.visible().get(self.cursor).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Column, FieldValue, ListView, LoadPhase, Pagination, Record, SortDirection, SortState,
        apply_filter, apply_sort, locale_compare, paginate, shows_pagination,
    };
    use std::cmp::Ordering;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: String,
        amount: i64,
        tag: &'static str,
    }

    impl Record for Row {
        fn field(&self, key: &str) -> FieldValue<'_> {
            match key {
                "name" => FieldValue::Text(&self.name),
                "amount" => FieldValue::Money(self.amount),
                "tag" => FieldValue::Text(self.tag),
                _ => FieldValue::Empty,
            }
        }

        fn search_fields(&self) -> Vec<&str> {
            vec![self.name.as_str(), self.tag]
        }
    }

    const COLUMNS: &[Column<Row>] = &[
        Column::new("name", "Name"),
        Column::new("amount", "Amount").right(),
    ];

    fn row(name: &str, amount: i64, tag: &'static str) -> Row {
        Row {
            name: name.to_owned(),
            amount,
            tag,
        }
    }

    fn rows(count: usize) -> Vec<Row> {
        let mut seed = 17_u64;
        (0..count)
            .map(|index| {
                seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
                row(
                    &format!("row-{index:03}"),
                    (seed >> 40) as i64 % 5_000,
                    if index % 3 == 0 { "denied" } else { "paid" },
                )
            })
            .collect()
    }

    fn names<'a>(records: &[&'a Row]) -> Vec<&'a str> {
        records.iter().map(|record| record.name.as_str()).collect()
    }

    #[test]
    fn sort_without_key_preserves_input_order() {
        let data = rows(25);
        let sorted = apply_sort(data.iter().collect(), &SortState::unsorted());
        let expected: Vec<&Row> = data.iter().collect();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn ascending_then_descending_reverses_distinct_keys() {
        let data = rows(25);
        let asc = apply_sort(
            data.iter().collect(),
            &SortState::by("name", SortDirection::Asc),
        );
        let mut desc = apply_sort(
            data.iter().collect(),
            &SortState::by("name", SortDirection::Desc),
        );
        desc.reverse();
        assert_eq!(names(&asc), names(&desc));

        let again = apply_sort(asc.clone(), &SortState::by("name", SortDirection::Asc));
        assert_eq!(again, asc);
    }

    #[test]
    fn numeric_fields_sort_numerically() {
        let data = vec![row("a", 900, "x"), row("b", 10_000, "x"), row("c", 50, "x")];
        let sorted = apply_sort(
            data.iter().collect(),
            &SortState::by("amount", SortDirection::Asc),
        );
        assert_eq!(names(&sorted), vec!["c", "a", "b"]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let data = vec![
            row("first", 5, "x"),
            row("second", 5, "x"),
            row("third", 1, "x"),
            row("fourth", 5, "x"),
        ];
        let desc = apply_sort(
            data.iter().collect(),
            &SortState::by("amount", SortDirection::Desc),
        );
        assert_eq!(names(&desc), vec!["first", "second", "fourth", "third"]);
    }

    #[test]
    fn locale_compare_ignores_case_and_puts_lowercase_first() {
        assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_compare("a", "A"), Ordering::Less);
        assert_eq!(locale_compare("same", "same"), Ordering::Equal);
    }

    #[test]
    fn toggle_flips_same_key_and_resets_new_key_to_desc() {
        let mut sort = SortState::unsorted();
        sort.toggle("date");
        assert_eq!(sort, SortState::by("date", SortDirection::Desc));
        sort.toggle("date");
        assert_eq!(sort, SortState::by("date", SortDirection::Asc));
        sort.toggle("payer");
        assert_eq!(sort, SortState::by("payer", SortDirection::Desc));
    }

    #[test]
    fn paginate_pages_reconstruct_the_input() {
        let data = rows(23);
        let per_page = 5;
        let first = paginate(&data, 1, per_page);
        assert_eq!(first.total_pages, 5);

        let mut rebuilt = Vec::new();
        for page in 1..=first.total_pages {
            let slice = paginate(&data, page, per_page);
            assert!(slice.visible.len() <= per_page);
            rebuilt.extend_from_slice(slice.visible);
        }
        assert_eq!(rebuilt, data);
    }

    #[test]
    fn paginate_past_last_page_is_empty() {
        let data = rows(4);
        let page = paginate(&data, 3, 2);
        assert!(page.visible.is_empty());
        assert_eq!(page.total_pages, 2);
        assert!(paginate(&data, 0, 2).visible.is_empty());
    }

    #[test]
    fn empty_source_has_zero_pages_and_no_controls() {
        let data: Vec<Row> = Vec::new();
        let page = paginate(&data, 1, 10);
        assert_eq!(page.total_pages, 0);
        assert!(!shows_pagination(page.total_pages));
        assert!(!shows_pagination(1));
        assert!(shows_pagination(2));
    }

    #[test]
    #[should_panic(expected = "per_page must be positive")]
    fn paginate_rejects_zero_page_size() {
        let data = rows(3);
        let _ = paginate(&data, 1, 0);
    }

    #[test]
    fn filter_keeps_only_matching_records_in_order() {
        let data = rows(30);
        let filtered = apply_filter(&data, |record| record.tag == "denied");
        assert!(filtered.iter().all(|record| record.tag == "denied"));
        assert!(filtered.len() <= data.len());
        let positions: Vec<usize> = filtered
            .iter()
            .filter_map(|record| data.iter().position(|candidate| candidate == *record))
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn pagination_transitions_are_noops_at_bounds() {
        let mut pagination = Pagination::new(10);
        assert!(!pagination.prev());
        assert_eq!(pagination.page, 1);
        assert!(pagination.next(2));
        assert!(!pagination.next(2));
        assert_eq!(pagination.page, 2);
        assert_eq!(pagination.label(2), "Page 2 of 2");
    }

    #[test]
    fn list_view_resets_page_when_search_changes() {
        let mut view = ListView::new(COLUMNS, 5, "nothing");
        view.set_records(rows(20));
        assert!(view.next_page());
        assert_eq!(view.pagination().page, 2);

        view.set_search("ROW-01");
        assert_eq!(view.pagination().page, 1);
        assert_eq!(view.derived().len(), 10);
        assert!(
            view.derived()
                .iter()
                .all(|record| record.name.starts_with("row-01"))
        );
    }

    #[test]
    fn list_view_ands_text_and_discriminant_filters() {
        let mut view = ListView::new(COLUMNS, 50, "nothing");
        view.set_records(vec![
            row("alpha", 1, "denied"),
            row("alpha two", 2, "paid"),
            row("beta", 3, "denied"),
        ]);
        view.set_search("alpha");
        view.set_discriminant(Some(|record: &Row| record.tag == "denied"));
        let derived = view.derived();
        assert_eq!(names(&derived), vec!["alpha"]);
    }

    #[test]
    fn list_view_ignores_stale_loads() {
        let mut view: ListView<Row> = ListView::new(COLUMNS, 5, "nothing");
        view.begin_load(1);
        view.begin_load(2);
        assert!(!view.finish_load(1, Ok(rows(3))));
        assert!(view.records().is_empty());
        assert!(view.finish_load(2, Err("boom".to_owned())));
        assert_eq!(view.phase(), &LoadPhase::Failed("boom".to_owned()));
    }

    #[test]
    fn toggle_sort_selected_uses_column_cursor() {
        let mut view = ListView::new(COLUMNS, 5, "nothing");
        view.set_records(rows(3));
        view.move_column(1);
        assert_eq!(
            view.toggle_sort_selected(),
            Some(("Amount", SortDirection::Desc))
        );
        assert_eq!(
            view.toggle_sort_selected(),
            Some(("Amount", SortDirection::Asc))
        );
    }

    #[test]
    fn column_cell_uses_money_formatting_by_default() {
        let record = row("x", 10_000, "paid");
        assert_eq!(COLUMNS[1].cell(&record), "$100.00");
    }
}
