// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::filter::matches_search;
use crate::ids::PracticeId;
use crate::listview::apply_filter;
use crate::model::Practice;

pub const ALL_PRACTICES_LABEL: &str = "All Practices (Executive Summary)";
pub const ALL_PRACTICES_META: &str = "View aggregate performance across all practices";
pub const NO_PRACTICES_MESSAGE: &str = "No practices found";
pub const SELECTOR_PLACEHOLDER: &str = "Choose a practice...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorEntry<'a> {
    All,
    Practice(&'a Practice),
}

impl SelectorEntry<'_> {
    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_PRACTICES_LABEL,
            Self::Practice(practice) => &practice.name,
        }
    }

    pub fn meta(&self) -> String {
        match self {
            Self::All => ALL_PRACTICES_META.to_owned(),
            Self::Practice(practice) => practice.location(),
        }
    }

    pub fn practice_id(&self) -> Option<PracticeId> {
        match self {
            Self::All => None,
            Self::Practice(practice) => Some(practice.id.clone()),
        }
    }
}

/// Dropdown state for picking one practice or the aggregate view. The
/// selection itself lives with the caller; this only tracks the open menu.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PracticeSelector {
    open: bool,
    search: String,
    cursor: usize,
}

impl PracticeSelector {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn open(&mut self) {
        self.open = true;
        self.search.clear();
        self.cursor = 0;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.search.clear();
        self.cursor = 0;
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn type_char(&mut self, ch: char) {
        self.search.push(ch);
        self.cursor = 0;
    }

    pub fn backspace(&mut self) {
        self.search.pop();
        self.cursor = 0;
    }

    /// Practices whose name, city or state contain the search text.
    pub fn matches<'a>(&self, practices: &'a [Practice]) -> Vec<&'a Practice> {
        let term = self.search.to_lowercase();
        apply_filter(practices, |practice| {
            matches_search(
                &term,
                &[
                    practice.name.as_str(),
                    practice.city.as_str(),
                    practice.state.as_str(),
                ],
            )
        })
    }

    /// The aggregate entry always leads, followed by matching practices.
    pub fn entries<'a>(&self, practices: &'a [Practice]) -> Vec<SelectorEntry<'a>> {
        std::iter::once(SelectorEntry::All)
            .chain(
                self.matches(practices)
                    .into_iter()
                    .map(SelectorEntry::Practice),
            )
            .collect()
    }

    pub fn empty_message(&self, practices: &[Practice]) -> Option<&'static str> {
        self.matches(practices)
            .is_empty()
            .then_some(NO_PRACTICES_MESSAGE)
    }

    pub fn move_cursor(&mut self, delta: isize, practices: &[Practice]) {
        let last = self.entries(practices).len().saturating_sub(1) as isize;
        self.cursor = (self.cursor as isize + delta).clamp(0, last) as usize;
    }

    /// Picks the entry under the cursor and closes the menu. The outer `Option`
    /// is `None` when nothing was chosen; `Some(None)` selects the aggregate view.
    pub fn choose(&mut self, practices: &[Practice]) -> Option<Option<PracticeId>> {
        let choice = self
            .entries(practices)
            .get(self.cursor)
            .map(SelectorEntry::practice_id);
        if choice.is_some() {
            self.close();
        }
        choice
    }
}

/// Text for the closed control.
pub fn selection_label(practices: &[Practice], selected: Option<&PracticeId>) -> String {
    selected
        .and_then(|id| practices.iter().find(|practice| &practice.id == id))
        .map(|practice| match practice.location().as_str() {
            "" => practice.name.clone(),
            location => format!("{} ({location})", practice.name),
        })
        .unwrap_or_else(|| SELECTOR_PLACEHOLDER.to_owned())
}

#[cfg(test)]
mod tests {
    use super::{
        ALL_PRACTICES_LABEL, NO_PRACTICES_MESSAGE, PracticeSelector, SELECTOR_PLACEHOLDER,
        SelectorEntry, selection_label,
    };
    use crate::{Practice, PracticeId};

    fn practice(id: &str, name: &str, city: &str, state: &str) -> Practice {
        Practice {
            id: PracticeId::new(id),
            name: name.to_owned(),
            city: city.to_owned(),
            state: state.to_owned(),
            era_count: 0,
            encounter_count: 0,
        }
    }

    fn type_text(selector: &mut PracticeSelector, text: &str) {
        for ch in text.chars() {
            selector.type_char(ch);
        }
    }

    #[test]
    fn search_retains_match_and_reports_empty_state() {
        let practices = vec![practice("p1", "Test Practice", "Test City", "TS")];
        let mut selector = PracticeSelector::default();
        selector.open();

        type_text(&mut selector, "test");
        assert_eq!(selector.matches(&practices).len(), 1);
        assert_eq!(selector.empty_message(&practices), None);

        selector.close();
        selector.open();
        type_text(&mut selector, "zzz");
        assert!(selector.matches(&practices).is_empty());
        assert_eq!(
            selector.empty_message(&practices),
            Some(NO_PRACTICES_MESSAGE)
        );
        assert_eq!(selector.entries(&practices), vec![SelectorEntry::All]);
    }

    #[test]
    fn search_covers_city_and_state() {
        let practices = vec![
            practice("p1", "North Clinic", "Austin", "TX"),
            practice("p2", "South Clinic", "Denver", "CO"),
        ];
        let mut selector = PracticeSelector::default();
        selector.open();
        type_text(&mut selector, "DEN");
        let names: Vec<&str> = selector
            .matches(&practices)
            .iter()
            .map(|practice| practice.name.as_str())
            .collect();
        assert_eq!(names, vec!["South Clinic"]);

        selector.backspace();
        selector.backspace();
        selector.backspace();
        type_text(&mut selector, "tx");
        assert_eq!(selector.matches(&practices)[0].name, "North Clinic");
    }

    #[test]
    fn choosing_all_yields_none_and_clears_search() {
        let practices = vec![practice("p1", "North Clinic", "Austin", "TX")];
        let mut selector = PracticeSelector::default();
        selector.open();
        type_text(&mut selector, "north");

        assert_eq!(selector.choose(&practices), Some(None));
        assert!(!selector.is_open());
        assert_eq!(selector.search(), "");
    }

    #[test]
    fn choosing_a_practice_returns_its_id() {
        let practices = vec![
            practice("p1", "North Clinic", "Austin", "TX"),
            practice("p2", "South Clinic", "Denver", "CO"),
        ];
        let mut selector = PracticeSelector::default();
        selector.open();
        selector.move_cursor(2, &practices);
        assert_eq!(selector.choose(&practices), Some(Some(PracticeId::new("p2"))));
    }

    #[test]
    fn search_text_is_matched_verbatim() {
        let practices = vec![practice("p1", "North Clinic", "Austin", "TX")];
        let mut selector = PracticeSelector::default();
        selector.open();
        for ch in "north ".chars() {
            selector.type_char(ch);
        }
        assert_eq!(selector.matches(&practices).len(), 1);

        selector.close();
        selector.open();
        for ch in "clinic ".chars() {
            selector.type_char(ch);
        }
        assert!(selector.matches(&practices).is_empty());
    }

    #[test]
    fn cursor_is_clamped_to_entries() {
        let practices = vec![practice("p1", "North Clinic", "Austin", "TX")];
        let mut selector = PracticeSelector::default();
        selector.open();
        selector.move_cursor(10, &practices);
        assert_eq!(selector.cursor(), 1);
        selector.move_cursor(-10, &practices);
        assert_eq!(selector.cursor(), 0);
    }

    #[test]
    fn closing_keeps_external_selection_label() {
        let practices = vec![practice("p1", "North Clinic", "Austin", "TX")];
        let selected = PracticeId::new("p1");
        let mut selector = PracticeSelector::default();
        selector.open();
        type_text(&mut selector, "zzz");
        selector.close();
        assert_eq!(
            selection_label(&practices, Some(&selected)),
            "North Clinic (Austin, TX)"
        );
        assert_eq!(selection_label(&practices, None), SELECTOR_PLACEHOLDER);
        assert_eq!(SelectorEntry::All.label(), ALL_PRACTICES_LABEL);
    }
}
