// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub const MODAL_ERROR_TEXT: &str = "Error loading data.";

#[derive(Debug, Clone, PartialEq)]
pub enum ModalPhase<I, T> {
    Closed,
    Loading {
        id: I,
        request_id: u64,
    },
    Loaded {
        id: I,
        detail: T,
    },
    Error {
        id: I,
        message: String,
    },
}

/// One detail overlay keyed by the id of the record it shows. Opening a new
/// id supersedes whatever the modal was doing; closing drops the payload so
/// reopening always refetches.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailModal<I, T> {
    phase: ModalPhase<I, T>,
}

impl<I, T> Default for DetailModal<I, T> {
    fn default() -> Self {
        Self {
            phase: ModalPhase::Closed,
        }
    }
}

impl<I: Clone + PartialEq, T> DetailModal<I, T> {
    pub fn phase(&self) -> &ModalPhase<I, T> {
        &self.phase
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.phase, ModalPhase::Closed)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, ModalPhase::Loading { .. })
    }

    pub fn id(&self) -> Option<&I> {
        match &self.phase {
            ModalPhase::Closed => None,
            ModalPhase::Loading { id, .. }
            | ModalPhase::Loaded { id, .. }
            | ModalPhase::Error { id, .. } => Some(id),
        }
    }

    pub fn detail(&self) -> Option<&T> {
        match &self.phase {
            ModalPhase::Loaded { detail, .. } => Some(detail),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            ModalPhase::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn open(&mut self, id: I, request_id: u64) {
        self.phase = ModalPhase::Loading { id, request_id };
    }

    /// Applies a fetch result. Returns `false` when the modal has since been
    /// closed or moved to a different request.
    pub fn resolve(&mut self, request_id: u64, result: Result<T, String>) -> bool {
        let id = match &self.phase {
            ModalPhase::Loading {
                id,
                request_id: pending,
            } if *pending == request_id => id.clone(),
            _ => return false,
        };
        self.phase = match result {
            Ok(detail) => ModalPhase::Loaded { id, detail },
            Err(message) => ModalPhase::Error { id, message },
        };
        true
    }

    /// Gives up on a pending fetch without closing. Used by the safety timer.
    pub fn time_out(&mut self, request_id: u64, message: impl Into<String>) -> bool {
        self.resolve(request_id, Err(message.into()))
    }

    pub fn close(&mut self) {
        self.phase = ModalPhase::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::{DetailModal, ModalPhase};
    use crate::EraId;

    #[derive(Debug, Clone, PartialEq)]
    struct Detail {
        payer: &'static str,
    }

    #[test]
    fn open_then_resolve_shows_detail() {
        let mut modal: DetailModal<EraId, Detail> = DetailModal::default();
        assert!(!modal.is_open());

        modal.open(EraId::new("ERA-1"), 7);
        assert!(modal.is_loading());
        assert_eq!(modal.id(), Some(&EraId::new("ERA-1")));

        assert!(modal.resolve(7, Ok(Detail { payer: "Aetna" })));
        assert_eq!(modal.detail(), Some(&Detail { payer: "Aetna" }));
    }

    #[test]
    fn close_discards_detail_and_ignores_late_result() {
        let mut modal: DetailModal<EraId, Detail> = DetailModal::default();
        modal.open(EraId::new("ERA-1"), 1);
        modal.close();
        assert!(!modal.resolve(1, Ok(Detail { payer: "late" })));
        assert_eq!(modal.phase(), &ModalPhase::Closed);
        assert_eq!(modal.detail(), None);
    }

    #[test]
    fn reopen_supersedes_earlier_request() {
        let mut modal: DetailModal<EraId, Detail> = DetailModal::default();
        modal.open(EraId::new("ERA-1"), 1);
        modal.open(EraId::new("ERA-2"), 2);
        assert!(!modal.resolve(1, Ok(Detail { payer: "old" })));
        assert!(modal.resolve(2, Ok(Detail { payer: "new" })));
        assert_eq!(modal.id(), Some(&EraId::new("ERA-2")));
    }

    #[test]
    fn failure_keeps_modal_open_with_message() {
        let mut modal: DetailModal<EraId, Detail> = DetailModal::default();
        modal.open(EraId::new("ERA-1"), 3);
        assert!(modal.resolve(3, Err("server error (500)".to_owned())));
        assert!(modal.is_open());
        assert_eq!(modal.error(), Some("server error (500)"));
    }

    #[test]
    fn time_out_only_applies_to_pending_request() {
        let mut modal: DetailModal<EraId, Detail> = DetailModal::default();
        modal.open(EraId::new("ERA-1"), 4);
        assert!(!modal.time_out(3, "timed out"));
        assert!(modal.time_out(4, "timed out"));
        assert!(!modal.time_out(4, "timed out"));
        assert_eq!(modal.error(), Some("timed out"));
    }
}
