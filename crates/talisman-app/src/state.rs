// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{PageKind, PracticeId, PracticeTab};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub active_page: PageKind,
    pub practice: Option<PracticeId>,
    pub practice_tab: PracticeTab,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            active_page: PageKind::Dashboard,
            practice: None,
            practice_tab: PracticeTab::Patients,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    NextPage,
    PrevPage,
    SelectPage(PageKind),
    SelectPractice(Option<PracticeId>),
    NextPracticeTab,
    PrevPracticeTab,
    SelectPracticeTab(PracticeTab),
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    PageChanged(PageKind),
    PracticeChanged(Option<PracticeId>),
    PracticeTabChanged(PracticeTab),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::NextPage => self.rotate_page(1),
            AppCommand::PrevPage => self.rotate_page(-1),
            AppCommand::SelectPage(page) => {
                if self.active_page == page {
                    return Vec::new();
                }
                self.active_page = page;
                vec![AppEvent::PageChanged(page)]
            }
            AppCommand::SelectPractice(practice) => {
                if self.practice == practice {
                    return Vec::new();
                }
                self.practice = practice.clone();
                self.practice_tab = PracticeTab::Patients;
                vec![AppEvent::PracticeChanged(practice)]
            }
            AppCommand::NextPracticeTab => self.rotate_practice_tab(1),
            AppCommand::PrevPracticeTab => self.rotate_practice_tab(-1),
            AppCommand::SelectPracticeTab(tab) => {
                if self.practice.is_none() || self.practice_tab == tab {
                    return Vec::new();
                }
                self.practice_tab = tab;
                vec![AppEvent::PracticeTabChanged(tab)]
            }
            AppCommand::SetStatus(message) => vec![self.set_status(message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn rotate_page(&mut self, delta: isize) -> Vec<AppEvent> {
        let pages = PageKind::ALL;
        let current = pages
            .iter()
            .position(|page| *page == self.active_page)
            .unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(pages.len() as isize) as usize;
        self.active_page = pages[next];
        vec![AppEvent::PageChanged(self.active_page)]
    }

    fn rotate_practice_tab(&mut self, delta: isize) -> Vec<AppEvent> {
        if self.practice.is_none() {
            return Vec::new();
        }
        let tabs = PracticeTab::ALL;
        let current = tabs
            .iter()
            .position(|tab| *tab == self.practice_tab)
            .unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(tabs.len() as isize) as usize;
        self.practice_tab = tabs[next];
        vec![AppEvent::PracticeTabChanged(self.practice_tab)]
    }

    fn set_status(&mut self, message: String) -> AppEvent {
        self.status_line = Some(message.clone());
        AppEvent::StatusUpdated(message)
    }
}

#[cfg(test)]
mod tests {
    use super::{AppCommand, AppEvent, AppState};
    use crate::{PageKind, PracticeId, PracticeTab};

    #[test]
    fn page_rotation_wraps() {
        let mut state = AppState {
            active_page: PageKind::Analytics,
            ..AppState::default()
        };

        let events = state.dispatch(AppCommand::NextPage);
        assert_eq!(state.active_page, PageKind::Dashboard);
        assert_eq!(events, vec![AppEvent::PageChanged(PageKind::Dashboard)]);

        state.dispatch(AppCommand::PrevPage);
        assert_eq!(state.active_page, PageKind::Analytics);
    }

    #[test]
    fn selecting_same_page_is_silent() {
        let mut state = AppState::default();
        assert!(state.dispatch(AppCommand::SelectPage(PageKind::Dashboard)).is_empty());
        assert_eq!(
            state.dispatch(AppCommand::SelectPage(PageKind::Claims)),
            vec![AppEvent::PageChanged(PageKind::Claims)]
        );
    }

    #[test]
    fn selecting_practice_tab_needs_a_practice() {
        let mut state = AppState::default();
        assert!(
            state
                .dispatch(AppCommand::SelectPracticeTab(PracticeTab::Claims))
                .is_empty()
        );
        assert_eq!(state.practice_tab, PracticeTab::Patients);

        state.dispatch(AppCommand::SelectPractice(Some(PracticeId::new("p1"))));
        assert_eq!(
            state.dispatch(AppCommand::SelectPracticeTab(PracticeTab::Claims)),
            vec![AppEvent::PracticeTabChanged(PracticeTab::Claims)]
        );
        assert!(
            state
                .dispatch(AppCommand::SelectPracticeTab(PracticeTab::Claims))
                .is_empty()
        );
    }

    #[test]
    fn changing_practice_resets_tab() {
        let mut state = AppState::default();
        state.dispatch(AppCommand::SelectPractice(Some(PracticeId::new("p1"))));
        state.dispatch(AppCommand::NextPracticeTab);
        assert_eq!(state.practice_tab, PracticeTab::Encounters);

        let events = state.dispatch(AppCommand::SelectPractice(Some(PracticeId::new("p2"))));
        assert_eq!(
            events,
            vec![AppEvent::PracticeChanged(Some(PracticeId::new("p2")))]
        );
        assert_eq!(state.practice_tab, PracticeTab::Patients);
    }

    #[test]
    fn practice_tabs_need_a_practice() {
        let mut state = AppState::default();
        assert!(state.dispatch(AppCommand::NextPracticeTab).is_empty());

        state.dispatch(AppCommand::SelectPractice(Some(PracticeId::new("p1"))));
        let events = state.dispatch(AppCommand::PrevPracticeTab);
        assert_eq!(events, vec![AppEvent::PracticeTabChanged(PracticeTab::Financial)]);
    }

    #[test]
    fn status_set_and_clear() {
        let mut state = AppState::default();
        let events = state.dispatch(AppCommand::SetStatus("sorted".to_owned()));
        assert_eq!(events, vec![AppEvent::StatusUpdated("sorted".to_owned())]);
        assert_eq!(state.status_line.as_deref(), Some("sorted"));

        assert_eq!(
            state.dispatch(AppCommand::ClearStatus),
            vec![AppEvent::StatusCleared]
        );
        assert_eq!(state.status_line, None);
    }
}
