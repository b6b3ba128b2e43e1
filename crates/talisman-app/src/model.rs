// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::ids::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageKind {
    Dashboard,
    Claims,
    Practices,
    Remittance,
    Analytics,
}

impl PageKind {
    pub const ALL: [Self; 5] = [
        Self::Dashboard,
        Self::Claims,
        Self::Practices,
        Self::Remittance,
        Self::Analytics,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Claims => "claims",
            Self::Practices => "practices",
            Self::Remittance => "remittance",
            Self::Analytics => "analytics",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Claims => "Claims",
            Self::Practices => "Practices",
            Self::Remittance => "Electronic Remittance",
            Self::Analytics => "Analytics",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dashboard" => Some(Self::Dashboard),
            "claims" => Some(Self::Claims),
            "practices" => Some(Self::Practices),
            "remittance" => Some(Self::Remittance),
            "analytics" => Some(Self::Analytics),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PracticeTab {
    Patients,
    Encounters,
    Claims,
    Financial,
}

impl PracticeTab {
    pub const ALL: [Self; 4] = [
        Self::Patients,
        Self::Encounters,
        Self::Claims,
        Self::Financial,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Patients => "Patients",
            Self::Encounters => "Encounters",
            Self::Claims => "Claims",
            Self::Financial => "Financial",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Practice {
    pub id: PracticeId,
    pub name: String,
    pub city: String,
    pub state: String,
    pub era_count: u64,
    pub encounter_count: u64,
}

impl Practice {
    pub fn location(&self) -> String {
        match (self.city.is_empty(), self.state.is_empty()) {
            (false, false) => format!("{}, {}", self.city, self.state),
            (false, true) => self.city.clone(),
            (true, false) => self.state.clone(),
            (true, true) => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub name: String,
    pub patient_id: String,
    pub encounter_count: u64,
    pub last_visit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    pub id: EncounterId,
    pub date: Option<String>,
    pub patient_name: String,
    pub provider_name: String,
    pub kind: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub claim_id: String,
    pub reference_id: Option<ClaimId>,
    pub date: Option<String>,
    pub patient_name: String,
    pub practice_name: String,
    pub billed_cents: i64,
    pub paid_cents: i64,
    pub status: String,
    pub proc_code: String,
}

impl Claim {
    /// Identifier used to address `/api/claims/{id}/details`.
    pub fn detail_id(&self) -> ClaimId {
        self.reference_id
            .clone()
            .unwrap_or_else(|| ClaimId::new(self.claim_id.clone()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EraSummary {
    pub id: EraId,
    pub received_date: Option<String>,
    pub payer: String,
    pub check_number: String,
    pub total_paid_cents: i64,
    pub total_billed_cents: i64,
    pub practice: String,
    pub claim_count: u64,
    pub denied_count: u64,
    pub rejected_count: u64,
    pub denial_reasons: String,
    pub status: String,
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimLineStatus {
    Paid,
    Denied,
    Rejected,
    Other(String),
}

impl ClaimLineStatus {
    pub fn parse(value: &str) -> Self {
        match value {
            "Paid" => Self::Paid,
            "Denied" => Self::Denied,
            "Rejected" => Self::Rejected,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Paid => "Paid",
            Self::Denied => "Denied",
            Self::Rejected => "Rejected",
            Self::Other(value) => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EraClaimLine {
    pub claim_id: String,
    pub proc_code: String,
    pub billed_cents: i64,
    pub paid_cents: i64,
    pub status: ClaimLineStatus,
    pub previously_rejected: bool,
    pub date: Option<String>,
    pub adjustments: String,
    pub adjustment_descriptions: String,
    pub patient: String,
    pub diagnoses: String,
    pub provider: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimBundle {
    pub reference_id: String,
    pub bundle_paid_cents: i64,
    pub patient_resp_cents: i64,
    pub claims: Vec<EraClaimLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EraOutcomeCounts {
    pub paid: u64,
    pub rejected: u64,
    pub denied: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EraDetail {
    pub id: EraId,
    pub file_name: String,
    pub received_date: Option<String>,
    pub payer: String,
    pub check_number: String,
    pub check_date: Option<String>,
    pub total_paid_cents: i64,
    pub method: String,
    pub practice: String,
    pub claim_count: u64,
    pub bundles: Vec<ClaimBundle>,
    pub summary: EraOutcomeCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Diagnosis {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InsuranceSummary {
    pub company: String,
    pub plan: String,
    pub policy_number: String,
    pub group_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientVisit {
    pub date: Option<String>,
    pub location: String,
    pub diagnoses: Vec<Diagnosis>,
    pub billed_cents: i64,
    pub paid_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientDetail {
    pub full_name: String,
    pub patient_id: String,
    pub dob: Option<String>,
    pub gender: String,
    pub case_id: String,
    pub address: String,
    pub insurance: Option<InsuranceSummary>,
    pub visits: Vec<PatientVisit>,
}

impl PatientDetail {
    pub fn gender_label(&self) -> &str {
        match self.gender.as_str() {
            "M" => "Male",
            "F" => "Female",
            other => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServiceLine {
    pub date: Option<String>,
    pub proc_code: String,
    pub description: String,
    pub billed_cents: i64,
    pub paid_cents: i64,
    pub adjustments: String,
    pub adjustment_descriptions: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RemittanceRef {
    pub claim_reference: String,
    pub payer: String,
    pub check_number: String,
    pub check_date: Option<String>,
    pub paid_cents: i64,
    pub patient_resp_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterDetail {
    pub guid: String,
    pub date: Option<String>,
    pub location: String,
    pub status: String,
    pub kind: String,
    pub patient_id: String,
    pub patient_name: String,
    pub patient_dob: Option<String>,
    pub patient_address: String,
    pub provider_name: String,
    pub provider_npi: String,
    pub payer: String,
    pub diagnoses: Vec<Diagnosis>,
    pub lines: Vec<ServiceLine>,
    pub remittances: Vec<RemittanceRef>,
    pub billed_cents: i64,
    pub paid_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimDetail {
    pub reference_id: ClaimId,
    pub date: Option<String>,
    pub patient_name: String,
    pub provider: String,
    pub status: String,
    pub lines: Vec<ServiceLine>,
    pub remittances: Vec<RemittanceRef>,
    pub billed_cents: i64,
    pub paid_cents: i64,
    pub balance_cents: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub total_encounters: u64,
    pub total_claims: u64,
    pub total_billed_cents: i64,
    pub total_paid_cents: i64,
    pub collection_rate: f64,
    pub practices_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityPoint {
    pub date: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub metrics: DashboardMetrics,
    pub activity: Vec<ActivityPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformanceLevel {
    Excellent,
    Good,
    Warning,
    Critical,
}

impl PerformanceLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "excellent" => Some(Self::Excellent),
            "good" => Some(Self::Good),
            "warning" => Some(Self::Warning),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricReading {
    pub value: Option<f64>,
    pub trend: Option<f64>,
    pub performance: Option<PerformanceLevel>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FinancialMetrics {
    pub practice_name: String,
    pub days_in_ar: MetricReading,
    pub net_collection_rate: MetricReading,
    pub patient_collection_rate: MetricReading,
    pub denial_rate: MetricReading,
    pub ar_over_120_days: MetricReading,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub practice_name: String,
    pub total_claims: u64,
    pub total_billed_cents: i64,
    pub total_paid_cents: i64,
    /// Fraction in `0.0..=1.0`.
    pub denial_rate: f64,
    pub denial_rate_vs_overall: f64,
    pub denied_cents: i64,
    pub recovery_potential_cents: i64,
    pub high_risk_claims: u64,
    pub high_risk_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayerPerformance {
    pub name: String,
    pub total_claims: u64,
    pub denied_count: u64,
    pub denied_cents: i64,
    /// Fraction in `0.0..=1.0`.
    pub denial_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CptPerformance {
    pub code: String,
    pub description: String,
    pub volume: u64,
    pub value_cents: i64,
    pub denied_cents: i64,
    pub denial_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "high" | "critical" => Self::High,
            "low" => Self::Low,
            _ => Self::Medium,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    pub priority: Priority,
    pub title: String,
    pub financial_impact_cents: i64,
    pub recommendation: String,
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub summary: PerformanceSummary,
    pub payers: Vec<PayerPerformance>,
    pub cpts: Vec<CptPerformance>,
    pub actions: Vec<ActionItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchKind {
    Practice,
    Patient,
    Claim,
    Status,
}

impl SearchKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Practice => "practice",
            Self::Patient => "patient",
            Self::Claim => "claim",
            Self::Status => "status",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "practice" => Some(Self::Practice),
            "patient" => Some(Self::Patient),
            "claim" => Some(Self::Claim),
            "status" => Some(Self::Status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub kind: SearchKind,
    pub id: String,
    pub label: String,
    pub subtext: String,
    pub practice_id: Option<PracticeId>,
    pub claim_reference: Option<ClaimId>,
}
