// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::{ClaimBundle, ClaimLineStatus, EraClaimLine};

/// Case-insensitive substring match over any of `fields`. `term` must already
/// be lowercased; an empty term matches everything.
pub fn matches_search(term: &str, fields: &[&str]) -> bool {
    if term.is_empty() {
        return true;
    }
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(term))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BundleFilter {
    #[default]
    All,
    Rejections,
    Denials,
}

impl BundleFilter {
    pub const ALL: [Self; 3] = [Self::All, Self::Rejections, Self::Denials];

    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Rejections => "Rejections",
            Self::Denials => "Denials",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Rejections,
            Self::Rejections => Self::Denials,
            Self::Denials => Self::All,
        }
    }

    /// A bundle matches when any one of its claims qualifies.
    pub fn matches(self, bundle: &ClaimBundle) -> bool {
        match self {
            Self::All => true,
            Self::Rejections => bundle.claims.iter().any(is_rejection),
            Self::Denials => bundle
                .claims
                .iter()
                .any(|line| line.status == ClaimLineStatus::Denied),
        }
    }
}

fn is_rejection(line: &EraClaimLine) -> bool {
    line.status == ClaimLineStatus::Rejected || line.previously_rejected
}

pub fn filter_bundles(bundles: &[ClaimBundle], filter: BundleFilter) -> Vec<&ClaimBundle> {
    crate::listview::apply_filter(bundles, |bundle| filter.matches(bundle))
}
