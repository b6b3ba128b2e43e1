// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Seeded fixture data. [`RevenueFaker`] produces individual records;
//! [`DemoData`] wires them into a consistent set of practices that answers
//! every [`FetchRequest`] without a server.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use anyhow::{Result, anyhow};
use talisman_app::filter::matches_search;
use talisman_app::format::parse_adjustments;
use talisman_app::listview::SortDirection;
use talisman_app::selector::ALL_PRACTICES_LABEL;
use talisman_app::*;
use time::macros::date;
use time::{Date, Duration};

const FIRST_NAMES: [&str; 20] = [
    "James",
    "Maria",
    "Robert",
    "Linda",
    "Michael",
    "Patricia",
    "David",
    "Jennifer",
    "William",
    "Elizabeth",
    "Carlos",
    "Aisha",
    "Daniel",
    "Mei",
    "Joseph",
    "Fatima",
    "Thomas",
    "Grace",
    "Kevin",
    "Sofia",
];
const LAST_NAMES: [&str; 20] = [
    "Smith",
    "Johnson",
    "Williams",
    "Brown",
    "Garcia",
    "Miller",
    "Davis",
    "Rodriguez",
    "Martinez",
    "Hernandez",
    "Lopez",
    "Wilson",
    "Anderson",
    "Thomas",
    "Taylor",
    "Moore",
    "Jackson",
    "Martin",
    "Lee",
    "Nguyen",
];
const LOCATIONS: [(&str, &str); 10] = [
    ("Austin", "TX"),
    ("Raleigh", "NC"),
    ("Denver", "CO"),
    ("Columbus", "OH"),
    ("Tampa", "FL"),
    ("Phoenix", "AZ"),
    ("Nashville", "TN"),
    ("Portland", "OR"),
    ("Madison", "WI"),
    ("Richmond", "VA"),
];
const STREET_NAMES: [&str; 10] = [
    "Oak", "Maple", "Cedar", "Pine", "Elm", "Willow", "Birch", "Lake", "Hill", "Park",
];
const PRACTICE_PREFIXES: [&str; 10] = [
    "Riverside",
    "Summit",
    "Lakeview",
    "Northgate",
    "Cedar Ridge",
    "Harbor",
    "Pinecrest",
    "Meadowbrook",
    "Westfield",
    "Brookside",
];
const SPECIALTIES: [&str; 8] = [
    "Family Medicine",
    "Pediatrics",
    "Internal Medicine",
    "Cardiology",
    "Orthopedics",
    "Dermatology",
    "Women's Health",
    "Behavioral Health",
];
const PAYERS: [&str; 8] = [
    "Aetna",
    "Blue Cross Blue Shield",
    "Cigna",
    "UnitedHealthcare",
    "Humana",
    "Medicare",
    "Medicaid",
    "Tricare",
];
const PLAN_TYPES: [&str; 5] = ["PPO", "HMO", "EPO", "POS", "Medicare Advantage"];

// (code, description, fee in cents)
const PROCEDURES: [(&str, &str, i64); 10] = [
    (
        "99213",
        "Office visit, established patient, low complexity",
        12_500,
    ),
    (
        "99214",
        "Office visit, established patient, moderate complexity",
        18_500,
    ),
    ("99203", "Office visit, new patient, low complexity", 16_000),
    (
        "99396",
        "Preventive visit, established patient, 40-64 years",
        22_000,
    ),
    ("36415", "Routine venipuncture", 2_500),
    ("80053", "Comprehensive metabolic panel", 4_800),
    ("85025", "Complete blood count with differential", 3_200),
    ("93000", "Electrocardiogram with interpretation", 6_500),
    ("90471", "Immunization administration", 3_000),
    ("97110", "Therapeutic exercise, each 15 minutes", 7_500),
];
const DIAGNOSES: [(&str, &str); 10] = [
    ("E11.9", "Type 2 diabetes mellitus without complications"),
    ("I10", "Essential (primary) hypertension"),
    ("J06.9", "Acute upper respiratory infection, unspecified"),
    ("M54.50", "Low back pain, unspecified"),
    (
        "Z00.00",
        "Encounter for general adult medical examination without abnormal findings",
    ),
    ("E78.5", "Hyperlipidemia, unspecified"),
    ("F41.1", "Generalized anxiety disorder"),
    (
        "K21.9",
        "Gastro-esophageal reflux disease without esophagitis",
    ),
    ("R51.9", "Headache, unspecified"),
    ("J45.909", "Unspecified asthma, uncomplicated"),
];
const DENIAL_CODES: [&str; 5] = ["CO-18", "CO-29", "CO-22", "CO-109", "CO-27"];
const REJECTION_REMARKS: [&str; 3] = ["MA130", "N365", "M25"];
const PATIENT_RESPONSIBILITY: [&str; 3] = ["PR-1", "PR-2", "PR-3"];
const COPAYS: [i64; 4] = [0, 2_000, 2_500, 4_000];
const ENCOUNTER_KINDS: [&str; 6] = [
    "Office Visit",
    "Follow-up",
    "Annual Physical",
    "Telehealth",
    "Urgent Care",
    "Consultation",
];
const ENCOUNTER_STATUSES: [&str; 3] = ["Completed", "Checked Out", "Signed"];
const ERA_STATUSES: [&str; 3] = ["Rejected", "Denied", "Paid"];

pub const DEMO_PRACTICES: usize = 6;
const ERA_CLAIM_LIMIT: usize = 4;
const SEARCH_LIMIT: usize = 5;
const ACTIVITY_DAYS: i64 = 30;
const HIGH_RISK_BILLED_CENTS: i64 = 30_000;

const REFERENCE_DATE: Date = date!(2026-01-15);

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// One procedure after the payer has (or has not yet) ruled on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjudicatedLine {
    pub line: ServiceLine,
    pub status: ClaimLineStatus,
    pub patient_resp_cents: i64,
}

/// An encounter together with the claim billed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    pub claim_id: String,
    pub claim_reference: ClaimId,
    pub patient: PatientId,
    pub service_date: Date,
    pub encounter: EncounterDetail,
    pub statuses: Vec<ClaimLineStatus>,
    pub patient_resp_cents: i64,
    pub previously_rejected: bool,
}

impl Visit {
    /// Pending claims have not appeared on any remittance yet.
    pub fn is_remitted(&self) -> bool {
        !self
            .statuses
            .iter()
            .any(|status| matches!(status, ClaimLineStatus::Other(_)))
    }

    pub fn is_denied(&self) -> bool {
        self.statuses.iter().any(line_denied)
    }

    pub fn denied_cents(&self) -> i64 {
        self.encounter
            .lines
            .iter()
            .zip(&self.statuses)
            .filter(|(_, status)| line_denied(status))
            .map(|(line, _)| line.billed_cents)
            .sum()
    }

    pub fn status(&self) -> &'static str {
        if !self.is_remitted() {
            "Pending"
        } else if self.statuses.contains(&ClaimLineStatus::Rejected) {
            "Rejected"
        } else if self.encounter.paid_cents == 0 {
            "Denied"
        } else if self.statuses.contains(&ClaimLineStatus::Denied) {
            "Partially Paid"
        } else {
            "Paid"
        }
    }

    pub fn claim(&self) -> Claim {
        Claim {
            claim_id: self.claim_id.clone(),
            reference_id: Some(self.claim_reference.clone()),
            date: self.encounter.date.clone(),
            patient_name: self.encounter.patient_name.clone(),
            practice_name: self.encounter.location.clone(),
            billed_cents: self.encounter.billed_cents,
            paid_cents: self.encounter.paid_cents,
            status: self.status().to_owned(),
            proc_code: self
                .encounter
                .lines
                .first()
                .map(|line| line.proc_code.clone())
                .unwrap_or_default(),
        }
    }

    pub fn claim_detail(&self) -> ClaimDetail {
        ClaimDetail {
            reference_id: self.claim_reference.clone(),
            date: self.encounter.date.clone(),
            patient_name: self.encounter.patient_name.clone(),
            provider: self.encounter.provider_name.clone(),
            status: self.status().to_owned(),
            lines: self.encounter.lines.clone(),
            remittances: self.encounter.remittances.clone(),
            billed_cents: self.encounter.billed_cents,
            paid_cents: self.encounter.paid_cents,
            balance_cents: self.encounter.billed_cents - self.encounter.paid_cents,
        }
    }

    pub fn encounter_row(&self) -> Encounter {
        Encounter {
            id: EncounterId::new(self.encounter.guid.clone()),
            date: self.encounter.date.clone(),
            patient_name: self.encounter.patient_name.clone(),
            provider_name: self.encounter.provider_name.clone(),
            kind: self.encounter.kind.clone(),
            status: self.encounter.status.clone(),
        }
    }

    pub fn patient_visit(&self) -> PatientVisit {
        PatientVisit {
            date: self.encounter.date.clone(),
            location: self.encounter.location.clone(),
            diagnoses: self.encounter.diagnoses.clone(),
            billed_cents: self.encounter.billed_cents,
            paid_cents: self.encounter.paid_cents,
        }
    }

    pub fn bundle(&self) -> ClaimBundle {
        let diagnoses = self
            .encounter
            .diagnoses
            .iter()
            .map(|diagnosis| diagnosis.code.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        ClaimBundle {
            reference_id: self.claim_reference.to_string(),
            bundle_paid_cents: self.encounter.paid_cents,
            patient_resp_cents: self.patient_resp_cents,
            claims: self
                .encounter
                .lines
                .iter()
                .zip(&self.statuses)
                .map(|(line, status)| EraClaimLine {
                    claim_id: self.claim_id.clone(),
                    proc_code: line.proc_code.clone(),
                    billed_cents: line.billed_cents,
                    paid_cents: line.paid_cents,
                    status: status.clone(),
                    previously_rejected: self.previously_rejected,
                    date: line.date.clone(),
                    adjustments: line.adjustments.clone(),
                    adjustment_descriptions: line.adjustment_descriptions.clone(),
                    patient: self.encounter.patient_name.clone(),
                    diagnoses: diagnoses.clone(),
                    provider: self.encounter.provider_name.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RevenueFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl RevenueFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    /// A lowercase UUID-shaped identifier.
    pub fn guid(&mut self) -> String {
        let high = self.rng.next_u64();
        let low = self.rng.next_u64();
        format!(
            "{:08x}-{:04x}-4{:03x}-{:04x}-{:012x}",
            high >> 32,
            (high >> 16) & 0xffff,
            high & 0x0fff,
            0x8000 | ((low >> 48) & 0x3fff),
            low & 0xffff_ffff_ffff,
        )
    }

    pub fn practice(&mut self, ordinal: usize) -> Practice {
        let offset = (self.seed % PRACTICE_PREFIXES.len() as u64) as usize;
        let prefix = PRACTICE_PREFIXES[(offset + ordinal) % PRACTICE_PREFIXES.len()];
        let specialty = self.pick(&SPECIALTIES);
        let (city, state) = self.pick(&LOCATIONS);
        Practice {
            id: PracticeId::new(self.guid()),
            name: format!("{prefix} {specialty}"),
            city: city.to_owned(),
            state: state.to_owned(),
            era_count: 0,
            encounter_count: 0,
        }
    }

    pub fn patient_detail(&mut self) -> PatientDetail {
        let first = self.pick(&FIRST_NAMES);
        let last = self.pick(&LAST_NAMES);
        let (city, state) = self.pick(&LOCATIONS);
        let dob = REFERENCE_DATE - Duration::days(self.int_range(18 * 365, 85 * 365));
        PatientDetail {
            full_name: format!("{first} {last}"),
            patient_id: format!("P{:06}", self.int_range(100_000, 999_999)),
            dob: Some(iso_date(dob)),
            gender: self.pick(&["M", "F"]).to_owned(),
            case_id: format!("CASE-{:05}", self.int_range(1, 99_999)),
            address: format!(
                "{} {} St, {city}, {state} {:05}",
                self.int_range(100, 9_999),
                self.pick(&STREET_NAMES),
                self.int_range(10_000, 99_999),
            ),
            insurance: Some(self.insurance()),
            visits: Vec::new(),
        }
    }

    pub fn insurance(&mut self) -> InsuranceSummary {
        let company = self.pick(&PAYERS);
        InsuranceSummary {
            company: company.to_owned(),
            plan: format!("{company} {}", self.pick(&PLAN_TYPES)),
            policy_number: format!(
                "{}{:09}",
                initials(company),
                self.int_range(0, 999_999_999)
            ),
            group_number: format!("GRP{:05}", self.int_range(1, 99_999)),
        }
    }

    pub fn provider(&mut self) -> String {
        format!(
            "Dr. {} {}",
            self.pick(&FIRST_NAMES),
            self.pick(&LAST_NAMES)
        )
    }

    /// Prices one procedure and decides how the payer treated it. Lines that
    /// are not yet remitted stay `Pending` with nothing paid.
    pub fn service_line(&mut self, date: &str, remitted: bool) -> AdjudicatedLine {
        let (code, description, fee) = self.pick(&PROCEDURES);
        let mut line = ServiceLine {
            date: Some(date.to_owned()),
            proc_code: code.to_owned(),
            description: description.to_owned(),
            billed_cents: fee,
            paid_cents: 0,
            adjustments: String::new(),
            adjustment_descriptions: String::new(),
        };
        if !remitted {
            return AdjudicatedLine {
                line,
                status: ClaimLineStatus::Other("Pending".to_owned()),
                patient_resp_cents: 0,
            };
        }

        let roll = self.rng.int_n(100);
        let mut patient_resp_cents = 0;
        let (status, adjustments) = if roll < 10 {
            let code = self.pick(&DENIAL_CODES);
            (
                ClaimLineStatus::Denied,
                vec![format!("{code}: {}", dollars(fee))],
            )
        } else if roll < 15 {
            let remark = self.pick(&REJECTION_REMARKS);
            (
                ClaimLineStatus::Rejected,
                vec![format!("CO-16: {}", dollars(fee)), remark.to_owned()],
            )
        } else {
            let contractual = fee * self.int_range(5, 25) / 100;
            patient_resp_cents = self.pick(&COPAYS).min(fee - contractual);
            line.paid_cents = fee - contractual - patient_resp_cents;
            let mut adjustments = vec![format!("CO-45: {}", dollars(contractual))];
            if patient_resp_cents > 0 {
                let code = self.pick(&PATIENT_RESPONSIBILITY);
                adjustments.push(format!("{code}: {}", dollars(patient_resp_cents)));
            }
            (ClaimLineStatus::Paid, adjustments)
        };
        line.adjustments = adjustments.join(", ");
        line.adjustment_descriptions = describe_adjustments(&line.adjustments);
        AdjudicatedLine {
            line,
            status,
            patient_resp_cents,
        }
    }

    pub fn visit(
        &mut self,
        ordinal: usize,
        practice: &Practice,
        patient: &PatientId,
        detail: &PatientDetail,
    ) -> Visit {
        let service_date = REFERENCE_DATE - Duration::days(self.int_range(0, 365));
        let date = iso_date(service_date);
        // Recent visits may still be waiting on the payer.
        let remitted = (REFERENCE_DATE - service_date).whole_days() > 21 || self.rng.bool();

        let line_count = self.int_range(1, 3);
        let adjudicated: Vec<AdjudicatedLine> = (0..line_count)
            .map(|_| self.service_line(&date, remitted))
            .collect();
        let first = self.rng.int_n(DIAGNOSES.len());
        let diagnoses: Vec<Diagnosis> = (0..self.int_range(1, 3) as usize)
            .map(|offset| {
                let (code, description) = DIAGNOSES[(first + offset) % DIAGNOSES.len()];
                Diagnosis {
                    code: code.to_owned(),
                    description: description.to_owned(),
                }
            })
            .collect();

        let billed_cents: i64 = adjudicated.iter().map(|entry| entry.line.billed_cents).sum();
        let paid_cents: i64 = adjudicated.iter().map(|entry| entry.line.paid_cents).sum();
        let patient_resp_cents: i64 = adjudicated
            .iter()
            .map(|entry| entry.patient_resp_cents)
            .sum();
        let statuses = adjudicated
            .iter()
            .map(|entry| entry.status.clone())
            .collect();
        let lines = adjudicated.into_iter().map(|entry| entry.line).collect();

        let encounter = EncounterDetail {
            guid: self.guid(),
            date: Some(date),
            location: practice.name.clone(),
            status: self.pick(&ENCOUNTER_STATUSES).to_owned(),
            kind: self.pick(&ENCOUNTER_KINDS).to_owned(),
            patient_id: detail.patient_id.clone(),
            patient_name: detail.full_name.clone(),
            patient_dob: detail.dob.clone(),
            patient_address: detail.address.clone(),
            provider_name: self.provider(),
            provider_npi: self.int_range(1_000_000_000, 1_999_999_999).to_string(),
            payer: detail
                .insurance
                .as_ref()
                .map_or_else(|| "Self Pay".to_owned(), |plan| plan.company.clone()),
            diagnoses,
            lines,
            remittances: Vec::new(),
            billed_cents,
            paid_cents,
        };

        Visit {
            claim_id: format!("CLM{:06}", ordinal + 1),
            claim_reference: ClaimId::new(format!(
                "R{:05}{:04}",
                self.int_range(10_000, 99_999),
                ordinal + 1
            )),
            patient: patient.clone(),
            service_date,
            encounter,
            statuses,
            patient_resp_cents,
            previously_rejected: remitted && self.rng.int_n(10) == 0,
        }
    }

    /// Builds one remittance advice covering `visits`. An empty slice gives a
    /// zero-dollar informational advice.
    pub fn era(
        &mut self,
        ordinal: usize,
        practice: &Practice,
        payer: &str,
        visits: &[&Visit],
    ) -> EraDetail {
        let received = match visits.iter().map(|visit| visit.service_date).max() {
            Some(latest) => (latest + Duration::days(self.int_range(7, 30))).min(REFERENCE_DATE),
            None => REFERENCE_DATE - Duration::days(self.int_range(0, 180)),
        };
        let received = iso_date(received);
        let bundles: Vec<ClaimBundle> = visits.iter().map(|visit| visit.bundle()).collect();
        let total_paid_cents: i64 = bundles.iter().map(|bundle| bundle.bundle_paid_cents).sum();
        let claim_count = bundles
            .iter()
            .map(|bundle| bundle.claims.len() as u64)
            .sum();
        let method = if total_paid_cents > 0 {
            self.pick(&["ACH", "CHK"])
        } else {
            "NON"
        };
        let id = EraId::new(format!("ERA-{}", 1_001 + ordinal));
        EraDetail {
            file_name: format!("{id}_{}.835", received.replace('-', "")),
            id,
            received_date: Some(received.clone()),
            payer: payer.to_owned(),
            check_number: format!("{:010}", self.int_range(1, 9_999_999_999)),
            check_date: Some(received),
            total_paid_cents,
            method: method.to_owned(),
            practice: practice.name.clone(),
            claim_count,
            summary: tally(&bundles),
            bundles,
        }
    }

    pub fn financial_metrics(&mut self, practice: &Practice, visits: &[Visit]) -> FinancialMetrics {
        let remitted: Vec<&Visit> = visits.iter().filter(|visit| visit.is_remitted()).collect();
        let denied = remitted.iter().filter(|visit| visit.is_denied()).count();
        let denial_rate = round1(percent(denied as f64, remitted.len() as f64));
        let days_in_ar = round1(self.int_range(250, 550) as f64 / 10.0);
        let net_collection = round1(self.int_range(900, 995) as f64 / 10.0);
        let ar_over_120 = round1(self.int_range(40, 250) as f64 / 10.0);

        let patient_collection_rate = if self.rng.int_n(4) == 0 {
            MetricReading::default()
        } else {
            let value = round1(self.int_range(800, 980) as f64 / 10.0);
            MetricReading {
                value: Some(value),
                trend: None,
                performance: Some(performance_level(value, (92.0, 90.0, 85.0), false)),
            }
        };

        FinancialMetrics {
            practice_name: practice.name.clone(),
            days_in_ar: MetricReading {
                value: Some(days_in_ar),
                trend: Some(self.trend()),
                performance: Some(performance_level(days_in_ar, (32.0, 40.0, 50.0), true)),
            },
            net_collection_rate: MetricReading {
                value: Some(net_collection),
                trend: Some(self.trend()),
                performance: Some(performance_level(net_collection, (97.0, 96.0, 94.0), false)),
            },
            patient_collection_rate,
            denial_rate: MetricReading {
                value: Some(denial_rate),
                trend: Some(self.trend()),
                performance: Some(performance_level(denial_rate, (3.0, 5.0, 8.0), true)),
            },
            ar_over_120_days: MetricReading {
                value: Some(ar_over_120),
                trend: None,
                performance: Some(performance_level(ar_over_120, (10.0, 15.0, 20.0), true)),
            },
        }
    }

    fn trend(&mut self) -> f64 {
        round1(self.int_range(-50, 50) as f64 / 10.0)
    }

    fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[self.rng.int_n(items.len())]
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }
}

/// Buckets `value` against `(excellent, good, warning)` thresholds. With
/// `lower_is_better`, a value at or under a threshold earns that level.
pub fn performance_level(
    value: f64,
    (excellent, good, warning): (f64, f64, f64),
    lower_is_better: bool,
) -> PerformanceLevel {
    let reaches = |threshold: f64| {
        if lower_is_better {
            value <= threshold
        } else {
            value >= threshold
        }
    };
    if reaches(excellent) {
        PerformanceLevel::Excellent
    } else if reaches(good) {
        PerformanceLevel::Good
    } else if reaches(warning) {
        PerformanceLevel::Warning
    } else {
        PerformanceLevel::Critical
    }
}

/// The list row the remittance endpoint reports for `detail`.
pub fn era_summary(detail: &EraDetail) -> EraSummary {
    let lines = || detail.bundles.iter().flat_map(|bundle| &bundle.claims);
    let total_billed_cents = lines().map(|line| line.billed_cents).sum();
    let mut reasons: Vec<&str> = lines()
        .filter(|line| line.paid_cents == 0 && !line.adjustments.is_empty())
        .map(|line| line.adjustments.as_str())
        .collect();
    reasons.sort_unstable();
    reasons.dedup();

    let kind = if detail.total_paid_cents > 0 {
        "Payment"
    } else if detail.summary.denied > 0 || detail.summary.rejected > 0 {
        "Denial"
    } else {
        "Informational"
    };

    EraSummary {
        id: detail.id.clone(),
        received_date: detail.received_date.clone(),
        payer: detail.payer.clone(),
        check_number: detail.check_number.clone(),
        total_paid_cents: detail.total_paid_cents,
        total_billed_cents,
        practice: detail.practice.clone(),
        claim_count: detail.claim_count,
        denied_count: detail.summary.denied,
        rejected_count: detail.summary.rejected,
        denial_reasons: reasons.join(", "),
        status: "Processed".to_owned(),
        kind: kind.to_owned(),
    }
}

fn tally(bundles: &[ClaimBundle]) -> EraOutcomeCounts {
    let mut counts = EraOutcomeCounts::default();
    for line in bundles.iter().flat_map(|bundle| &bundle.claims) {
        match line.status {
            ClaimLineStatus::Paid => counts.paid += 1,
            ClaimLineStatus::Denied => counts.denied += 1,
            ClaimLineStatus::Rejected => counts.rejected += 1,
            ClaimLineStatus::Other(_) => {}
        }
    }
    counts
}

fn line_denied(status: &ClaimLineStatus) -> bool {
    matches!(status, ClaimLineStatus::Denied | ClaimLineStatus::Rejected)
}

fn describe_adjustments(raw: &str) -> String {
    parse_adjustments(raw)
        .into_iter()
        .map(|adjustment| format!("{}: {}", adjustment.code, adjustment.description))
        .collect::<Vec<_>>()
        .join("; ")
}

fn dollars(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect::<String>()
        .to_ascii_uppercase()
}

fn iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 { 0.0 } else { part / whole * 100.0 }
}

fn fraction(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn not_found(what: &str) -> anyhow::Error {
    anyhow!("server error (404): {what} not found")
}

#[derive(Debug, Clone)]
struct PatientRecord {
    id: PatientId,
    detail: PatientDetail,
}

#[derive(Debug, Clone)]
struct PracticeBook {
    practice: Practice,
    patients: Vec<PatientRecord>,
    visits: Vec<Visit>,
    eras: Vec<EraDetail>,
    financial: FinancialMetrics,
}

/// A self-consistent offline data set: every claim belongs to an encounter,
/// every remitted claim appears on exactly one remittance advice.
#[derive(Debug, Clone)]
pub struct DemoData {
    books: Vec<PracticeBook>,
}

impl DemoData {
    pub fn generate(seed: u64) -> Self {
        let mut faker = RevenueFaker::new(seed);
        let mut claim_ordinal = 0;
        let mut era_ordinal = 0;
        let mut books = Vec::with_capacity(DEMO_PRACTICES);

        for ordinal in 0..DEMO_PRACTICES {
            let mut practice = faker.practice(ordinal);
            let mut patients = Vec::new();
            let mut visits = Vec::new();
            for _ in 0..faker.int_range(6, 12) {
                let detail = faker.patient_detail();
                let id = PatientId::new(faker.guid());
                for _ in 0..faker.int_range(1, 4) {
                    visits.push(faker.visit(claim_ordinal, &practice, &id, &detail));
                    claim_ordinal += 1;
                }
                patients.push(PatientRecord { id, detail });
            }

            let eras = remit(&mut faker, &mut era_ordinal, &practice, &mut visits);
            for patient in &mut patients {
                patient.detail.visits = visits
                    .iter()
                    .filter(|visit| visit.patient == patient.id)
                    .map(Visit::patient_visit)
                    .collect();
            }
            practice.era_count = eras.len() as u64;
            practice.encounter_count = visits.len() as u64;
            let financial = faker.financial_metrics(&practice, &visits);

            books.push(PracticeBook {
                practice,
                patients,
                visits,
                eras,
                financial,
            });
        }

        Self { books }
    }

    /// Practices ordered by name, as the practice list endpoint returns them.
    pub fn practices(&self) -> Vec<Practice> {
        let mut practices: Vec<Practice> =
            self.books.iter().map(|book| book.practice.clone()).collect();
        practices.sort_by(|left, right| left.name.cmp(&right.name));
        practices
    }

    /// Every claim, newest service date first.
    pub fn claims(&self) -> Vec<Claim> {
        let mut claims: Vec<Claim> = self
            .books
            .iter()
            .flat_map(|book| book.visits.iter().map(Visit::claim))
            .collect();
        claims.sort_by(|left, right| {
            right
                .date
                .cmp(&left.date)
                .then_with(|| left.claim_id.cmp(&right.claim_id))
        });
        claims
    }

    pub fn answer(&self, request: &FetchRequest) -> Result<FetchPayload> {
        let payload = match request {
            FetchRequest::Practices => FetchPayload::Practices(self.practices()),
            FetchRequest::Dashboard => FetchPayload::Dashboard(self.dashboard()),
            FetchRequest::Claims => FetchPayload::Claims(self.claims()),
            FetchRequest::PracticePatients(id) => {
                FetchPayload::Patients(patient_rows(self.book(id)?))
            }
            FetchRequest::PracticeEncounters(id) => FetchPayload::Encounters(
                self.book(id)?
                    .visits
                    .iter()
                    .map(Visit::encounter_row)
                    .collect(),
            ),
            FetchRequest::PracticeClaims {
                practice,
                paid_only,
            } => FetchPayload::PracticeClaims(
                self.book(practice)?
                    .visits
                    .iter()
                    .map(Visit::claim)
                    .filter(|claim| !paid_only || claim.paid_cents > 0)
                    .collect(),
            ),
            FetchRequest::FinancialMetrics(id) => {
                FetchPayload::Financial(self.book(id)?.financial.clone())
            }
            FetchRequest::Eras(query) => FetchPayload::Eras(self.eras(query)),
            FetchRequest::EraDetail(id) => FetchPayload::EraDetail(
                self.books
                    .iter()
                    .flat_map(|book| &book.eras)
                    .find(|era| era.id == *id)
                    .cloned()
                    .ok_or_else(|| not_found("ERA report"))?,
            ),
            FetchRequest::PatientDetail(id) => FetchPayload::PatientDetail(
                self.books
                    .iter()
                    .flat_map(|book| &book.patients)
                    .find(|patient| patient.id == *id)
                    .map(|patient| patient.detail.clone())
                    .ok_or_else(|| not_found("Patient"))?,
            ),
            FetchRequest::EncounterDetail(id) => FetchPayload::EncounterDetail(
                self.visits()
                    .find(|visit| visit.encounter.guid == id.as_str())
                    .map(|visit| visit.encounter.clone())
                    .ok_or_else(|| not_found("Encounter"))?,
            ),
            FetchRequest::ClaimDetail(id) => FetchPayload::ClaimDetail(
                self.visits()
                    .find(|visit| visit.claim_reference == *id || visit.claim_id == id.as_str())
                    .map(Visit::claim_detail)
                    .ok_or_else(|| not_found("Claim"))?,
            ),
            FetchRequest::Analytics {
                practice,
                days_back,
            } => FetchPayload::Analytics(self.analytics(practice.as_ref(), *days_back)?),
            FetchRequest::Search { query, kind } => {
                FetchPayload::Search(self.search(query, *kind))
            }
        };
        Ok(payload)
    }

    fn book(&self, id: &PracticeId) -> Result<&PracticeBook> {
        self.books
            .iter()
            .find(|book| book.practice.id == *id)
            .ok_or_else(|| not_found("Practice"))
    }

    fn scope(&self, practice: Option<&PracticeId>) -> Result<Vec<&PracticeBook>> {
        match practice {
            Some(id) => Ok(vec![self.book(id)?]),
            None => Ok(self.books.iter().collect()),
        }
    }

    fn visits(&self) -> impl Iterator<Item = &Visit> {
        self.books.iter().flat_map(|book| &book.visits)
    }

    fn dashboard(&self) -> DashboardSnapshot {
        let total_billed_cents: i64 = self.visits().map(|v| v.encounter.billed_cents).sum();
        let total_paid_cents: i64 = self.visits().map(|v| v.encounter.paid_cents).sum();
        let collection_rate = (percent(total_paid_cents as f64, total_billed_cents as f64)
            * 100.0)
            .round()
            / 100.0;

        let since = REFERENCE_DATE - Duration::days(ACTIVITY_DAYS);
        let mut activity: BTreeMap<Date, u64> = BTreeMap::new();
        for visit in self.visits().filter(|visit| visit.service_date >= since) {
            *activity.entry(visit.service_date).or_default() += 1;
        }

        let visit_count = self.visits().count() as u64;
        DashboardSnapshot {
            metrics: DashboardMetrics {
                total_encounters: visit_count,
                total_claims: visit_count,
                total_billed_cents,
                total_paid_cents,
                collection_rate,
                practices_count: self.books.len() as u64,
            },
            activity: activity
                .into_iter()
                .rev()
                .map(|(date, count)| ActivityPoint {
                    date: iso_date(date),
                    count,
                })
                .collect(),
        }
    }

    /// Filters, orders and pages remittances the way the list endpoint does.
    fn eras(&self, query: &EraQuery) -> Vec<EraSummary> {
        let term = query.search.trim().to_lowercase();
        let mut rows: Vec<EraSummary> = self
            .books
            .iter()
            .filter(|book| {
                query
                    .practice
                    .as_ref()
                    .is_none_or(|id| *id == book.practice.id)
            })
            .flat_map(|book| &book.eras)
            .filter(|era| {
                matches_search(
                    &term,
                    &[
                        era.id.as_str(),
                        era.payer.as_str(),
                        era.check_number.as_str(),
                        era.file_name.as_str(),
                    ],
                )
            })
            .map(era_summary)
            .filter(|row| !query.hide_informational || row.kind != "Informational")
            .filter(|row| {
                if !query.show_rejections && !query.show_denials {
                    return true;
                }
                (query.show_rejections && row.rejected_count > 0)
                    || (query.show_denials && row.denied_count > 0)
            })
            .collect();

        let key = query.sort_key();
        rows.sort_by(|left, right| {
            let ordering = compare_eras(left, right, key).then_with(|| left.id.cmp(&right.id));
            match query.sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        rows.into_iter()
            .skip(query.page.saturating_sub(1) * query.page_size)
            .take(query.page_size)
            .collect()
    }

    fn analytics(
        &self,
        practice: Option<&PracticeId>,
        days_back: u32,
    ) -> Result<AnalyticsSnapshot> {
        let since = REFERENCE_DATE - Duration::days(i64::from(days_back));
        let in_window = |visit: &&Visit| visit.is_remitted() && visit.service_date >= since;
        let books = self.scope(practice)?;
        let visits: Vec<&Visit> = books
            .iter()
            .flat_map(|book| &book.visits)
            .filter(in_window)
            .collect();
        let overall: Vec<&Visit> = self.visits().filter(in_window).collect();

        let practice_name = match (practice, books.first()) {
            (Some(_), Some(book)) => book.practice.name.clone(),
            _ => ALL_PRACTICES_LABEL.to_owned(),
        };
        let summary = summarize(practice_name, &visits, denial_fraction(&overall));
        let payers = payer_performance(&visits);
        let cpts = cpt_performance(&visits);
        let actions = action_items(&summary, &payers, &cpts);
        Ok(AnalyticsSnapshot {
            summary,
            payers,
            cpts,
            actions,
        })
    }

    fn search(&self, query: &str, kind: Option<SearchKind>) -> Vec<SearchResult> {
        let term = query.trim().to_lowercase();
        if term.chars().count() < 2 {
            return Vec::new();
        }
        let wants = |candidate: SearchKind| kind.is_none_or(|kind| kind == candidate);
        let mut results = Vec::new();

        if wants(SearchKind::Practice) {
            results.extend(
                self.books
                    .iter()
                    .filter(|book| matches_search(&term, &[book.practice.name.as_str()]))
                    .take(SEARCH_LIMIT)
                    .map(|book| SearchResult {
                        kind: SearchKind::Practice,
                        id: book.practice.id.to_string(),
                        label: book.practice.name.clone(),
                        subtext: book.practice.location(),
                        practice_id: Some(book.practice.id.clone()),
                        claim_reference: None,
                    }),
            );
        }

        if wants(SearchKind::Patient) {
            results.extend(
                self.books
                    .iter()
                    .flat_map(|book| book.patients.iter().map(move |patient| (book, patient)))
                    .filter(|(_, patient)| {
                        matches_search(
                            &term,
                            &[
                                patient.detail.full_name.as_str(),
                                patient.detail.patient_id.as_str(),
                            ],
                        )
                    })
                    .take(SEARCH_LIMIT)
                    .map(|(book, patient)| SearchResult {
                        kind: SearchKind::Patient,
                        id: patient.id.to_string(),
                        label: patient.detail.full_name.clone(),
                        subtext: format!(
                            "ID: {} • {}",
                            patient.detail.patient_id, book.practice.name
                        ),
                        practice_id: Some(book.practice.id.clone()),
                        claim_reference: None,
                    }),
            );
        }

        if wants(SearchKind::Claim) {
            results.extend(
                self.books
                    .iter()
                    .flat_map(|book| book.visits.iter().map(move |visit| (book, visit)))
                    .filter(|(_, visit)| {
                        matches_search(
                            &term,
                            &[visit.claim_id.as_str(), visit.claim_reference.as_str()],
                        )
                    })
                    .take(SEARCH_LIMIT)
                    .map(|(book, visit)| SearchResult {
                        kind: SearchKind::Claim,
                        id: visit.claim_id.clone(),
                        label: format!("Claim #{}", visit.claim_id),
                        subtext: book.practice.name.clone(),
                        practice_id: Some(book.practice.id.clone()),
                        claim_reference: Some(visit.claim_reference.clone()),
                    }),
            );
        }

        if wants(SearchKind::Status) {
            results.extend(
                ERA_STATUSES
                    .iter()
                    .filter(|status| status.to_lowercase().contains(&term))
                    .map(|status| SearchResult {
                        kind: SearchKind::Status,
                        id: (*status).to_owned(),
                        label: format!("ERA Status: {status}"),
                        subtext: "View in Electronic Remittance".to_owned(),
                        practice_id: None,
                        claim_reference: None,
                    }),
            );
        }

        results
    }
}

/// Groups remitted visits by payer onto advices of at most
/// `ERA_CLAIM_LIMIT` claims, recording each advice on its visits.
fn remit(
    faker: &mut RevenueFaker,
    era_ordinal: &mut usize,
    practice: &Practice,
    visits: &mut [Visit],
) -> Vec<EraDetail> {
    let mut by_payer: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (index, visit) in visits.iter().enumerate() {
        if visit.is_remitted() {
            by_payer
                .entry(visit.encounter.payer.clone())
                .or_default()
                .push(index);
        }
    }

    let mut eras = Vec::new();
    for (payer, indexes) in by_payer {
        for chunk in indexes.chunks(ERA_CLAIM_LIMIT) {
            let members: Vec<&Visit> = chunk.iter().map(|&index| &visits[index]).collect();
            let era = faker.era(*era_ordinal, practice, &payer, &members);
            *era_ordinal += 1;
            for &index in chunk {
                let visit = &mut visits[index];
                let remittance = RemittanceRef {
                    claim_reference: visit.claim_reference.to_string(),
                    payer: era.payer.clone(),
                    check_number: era.check_number.clone(),
                    check_date: era.check_date.clone(),
                    paid_cents: visit.encounter.paid_cents,
                    patient_resp_cents: visit.patient_resp_cents,
                };
                visit.encounter.remittances.push(remittance);
            }
            eras.push(era);
        }
    }

    let payer = faker.pick(&PAYERS);
    eras.push(faker.era(*era_ordinal, practice, payer, &[]));
    *era_ordinal += 1;
    eras
}

fn patient_rows(book: &PracticeBook) -> Vec<Patient> {
    book.patients
        .iter()
        .map(|patient| Patient {
            id: patient.id.clone(),
            name: patient.detail.full_name.clone(),
            patient_id: patient.detail.patient_id.clone(),
            encounter_count: patient.detail.visits.len() as u64,
            last_visit: patient
                .detail
                .visits
                .iter()
                .filter_map(|visit| visit.date.clone())
                .max(),
        })
        .collect()
}

fn compare_eras(left: &EraSummary, right: &EraSummary, key: &str) -> Ordering {
    match key {
        "id" => left.id.cmp(&right.id),
        "payer" => left.payer.cmp(&right.payer),
        "total_billed" => left.total_billed_cents.cmp(&right.total_billed_cents),
        "total_paid" => left.total_paid_cents.cmp(&right.total_paid_cents),
        "claim_count" => left.claim_count.cmp(&right.claim_count),
        _ => left.received_date.cmp(&right.received_date),
    }
}

fn denial_fraction(visits: &[&Visit]) -> f64 {
    let denied = visits.iter().filter(|visit| visit.is_denied()).count();
    fraction(denied as u64, visits.len() as u64)
}

fn summarize(practice_name: String, visits: &[&Visit], overall_rate: f64) -> PerformanceSummary {
    let denial_rate = denial_fraction(visits);
    let denied_cents: i64 = visits.iter().map(|visit| visit.denied_cents()).sum();
    let high_risk_claims = visits
        .iter()
        .filter(|visit| {
            visit.encounter.billed_cents >= HIGH_RISK_BILLED_CENTS
                && visit.encounter.paid_cents < visit.encounter.billed_cents / 2
        })
        .count() as u64;
    PerformanceSummary {
        practice_name,
        total_claims: visits.len() as u64,
        total_billed_cents: visits.iter().map(|visit| visit.encounter.billed_cents).sum(),
        total_paid_cents: visits.iter().map(|visit| visit.encounter.paid_cents).sum(),
        denial_rate,
        denial_rate_vs_overall: denial_rate - overall_rate,
        denied_cents,
        recovery_potential_cents: denied_cents * 7 / 10,
        high_risk_claims,
        high_risk_pct: round1(percent(high_risk_claims as f64, visits.len() as f64)),
    }
}

fn payer_performance(visits: &[&Visit]) -> Vec<PayerPerformance> {
    let mut by_payer: BTreeMap<&str, PayerPerformance> = BTreeMap::new();
    for visit in visits {
        let entry = by_payer
            .entry(visit.encounter.payer.as_str())
            .or_insert_with(|| PayerPerformance {
                name: visit.encounter.payer.clone(),
                total_claims: 0,
                denied_count: 0,
                denied_cents: 0,
                denial_rate: 0.0,
            });
        entry.total_claims += 1;
        if visit.is_denied() {
            entry.denied_count += 1;
        }
        entry.denied_cents += visit.denied_cents();
    }
    let mut payers: Vec<PayerPerformance> = by_payer
        .into_values()
        .map(|mut payer| {
            payer.denial_rate = fraction(payer.denied_count, payer.total_claims);
            payer
        })
        .collect();
    payers.sort_by(|left, right| {
        right
            .denied_cents
            .cmp(&left.denied_cents)
            .then_with(|| left.name.cmp(&right.name))
    });
    payers
}

fn cpt_performance(visits: &[&Visit]) -> Vec<CptPerformance> {
    let mut by_code: BTreeMap<&str, (CptPerformance, u64)> = BTreeMap::new();
    for visit in visits {
        for (line, status) in visit.encounter.lines.iter().zip(&visit.statuses) {
            let (entry, denied) = by_code.entry(line.proc_code.as_str()).or_insert_with(|| {
                (
                    CptPerformance {
                        code: line.proc_code.clone(),
                        description: line.description.clone(),
                        volume: 0,
                        value_cents: 0,
                        denied_cents: 0,
                        denial_rate: 0.0,
                    },
                    0,
                )
            });
            entry.volume += 1;
            entry.value_cents += line.billed_cents;
            if line_denied(status) {
                *denied += 1;
                entry.denied_cents += line.billed_cents;
            }
        }
    }
    let mut cpts: Vec<CptPerformance> = by_code
        .into_values()
        .map(|(mut cpt, denied)| {
            cpt.denial_rate = fraction(denied, cpt.volume);
            cpt
        })
        .collect();
    cpts.sort_by(|left, right| {
        right
            .volume
            .cmp(&left.volume)
            .then_with(|| left.code.cmp(&right.code))
    });
    cpts
}

fn action_items(
    summary: &PerformanceSummary,
    payers: &[PayerPerformance],
    cpts: &[CptPerformance],
) -> Vec<ActionItem> {
    let mut actions = Vec::new();

    if let Some(payer) = payers
        .iter()
        .filter(|payer| payer.denied_count > 0)
        .max_by(|left, right| left.denial_rate.total_cmp(&right.denial_rate))
    {
        actions.push(ActionItem {
            priority: if payer.denial_rate >= 0.15 {
                Priority::High
            } else {
                Priority::Medium
            },
            title: format!("Reduce denials from {}", payer.name),
            financial_impact_cents: payer.denied_cents,
            recommendation: format!(
                "{} denied {} of {} claims. Review the leading adjustment codes and resubmit corrected claims.",
                payer.name, payer.denied_count, payer.total_claims
            ),
            next_steps: vec![
                "Pull denied claims from the latest remittances".to_owned(),
                "Correct coding or eligibility errors".to_owned(),
                "Resubmit before the filing limit".to_owned(),
            ],
        });
    }

    if let Some(cpt) = cpts
        .iter()
        .filter(|cpt| cpt.denied_cents > 0)
        .max_by_key(|cpt| cpt.denied_cents)
    {
        actions.push(ActionItem {
            priority: Priority::Medium,
            title: format!("Audit coding for CPT {}", cpt.code),
            financial_impact_cents: cpt.denied_cents,
            recommendation: format!(
                "{} ({}) accounts for the largest denied amount.",
                cpt.code, cpt.description
            ),
            next_steps: vec![
                "Compare documentation against payer policy".to_owned(),
                "Check modifier usage".to_owned(),
            ],
        });
    }

    if summary.high_risk_claims > 0 {
        actions.push(ActionItem {
            priority: Priority::Low,
            title: format!(
                "Follow up on {} high-value open claims",
                summary.high_risk_claims
            ),
            financial_impact_cents: 0,
            recommendation: "Large claims paid at under half of billed need a status check."
                .to_owned(),
            next_steps: vec!["Call the payer for claim status".to_owned()],
        });
    }

    actions
}

#[cfg(test)]
mod tests {
    use super::{DemoData, RevenueFaker, era_summary, performance_level};
    use std::collections::BTreeSet;
    use talisman_app::columns::{CLAIM_COLUMNS, NO_CLAIMS_MESSAGE};
    use talisman_app::listview::{
        ListView, SortDirection, SortState, apply_filter, apply_sort, paginate, shows_pagination,
    };
    use talisman_app::{
        Claim, ClaimId, ClaimLineStatus, EraQuery, FetchPayload, FetchRequest, PerformanceLevel,
        SearchKind,
    };

    fn ids(claims: &[&Claim]) -> Vec<String> {
        claims.iter().map(|claim| claim.claim_id.clone()).collect()
    }

    fn eras(data: &DemoData, query: EraQuery) -> Vec<talisman_app::EraSummary> {
        match data.answer(&FetchRequest::Eras(query)) {
            Ok(FetchPayload::Eras(rows)) => rows,
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn new_deterministic_seed() {
        let mut left = RevenueFaker::new(42);
        let mut right = RevenueFaker::new(42);
        assert_eq!(left.practice(0), right.practice(0));
        assert_eq!(left.patient_detail(), right.patient_detail());
    }

    #[test]
    fn zero_seed_is_normalized() {
        assert_eq!(RevenueFaker::new(0).seed(), 1);
        assert_eq!(
            DemoData::generate(0).practices(),
            DemoData::generate(1).practices()
        );
    }

    #[test]
    fn guid_has_uuid_shape() {
        let mut faker = RevenueFaker::new(3);
        let guid = faker.guid();
        let groups: Vec<usize> = guid.split('-').map(str::len).collect();
        assert_eq!(groups, vec![8, 4, 4, 4, 12]);
    }

    #[test]
    fn paid_lines_carry_contractual_adjustment() {
        let mut faker = RevenueFaker::new(5);
        for _ in 0..50 {
            let entry = faker.service_line("2025-06-01", true);
            match entry.status {
                ClaimLineStatus::Paid => {
                    assert!(entry.line.adjustments.starts_with("CO-45: "));
                    assert!(entry.line.paid_cents <= entry.line.billed_cents);
                }
                ClaimLineStatus::Denied | ClaimLineStatus::Rejected => {
                    assert_eq!(entry.line.paid_cents, 0);
                }
                ClaimLineStatus::Other(ref status) => panic!("unexpected status {status}"),
            }
            assert!(!entry.line.adjustment_descriptions.contains("Unknown Code"));
        }
    }

    #[test]
    fn pending_lines_are_unpaid() {
        let mut faker = RevenueFaker::new(6);
        let entry = faker.service_line("2026-01-10", false);
        assert_eq!(entry.status, ClaimLineStatus::Other("Pending".to_owned()));
        assert_eq!(entry.line.paid_cents, 0);
        assert!(entry.line.adjustments.is_empty());
    }

    #[test]
    fn performance_thresholds() {
        assert_eq!(
            performance_level(30.0, (32.0, 40.0, 50.0), true),
            PerformanceLevel::Excellent
        );
        assert_eq!(
            performance_level(55.0, (32.0, 40.0, 50.0), true),
            PerformanceLevel::Critical
        );
        assert_eq!(
            performance_level(96.5, (97.0, 96.0, 94.0), false),
            PerformanceLevel::Good
        );
    }

    #[test]
    fn every_remitted_claim_is_on_one_remittance() {
        let data = DemoData::generate(11);
        let mut seen = BTreeSet::new();
        for book in &data.books {
            for era in &book.eras {
                for bundle in &era.bundles {
                    assert!(seen.insert(bundle.reference_id.clone()));
                }
            }
            for visit in &book.visits {
                assert_eq!(
                    visit.is_remitted(),
                    seen.contains(visit.claim_reference.as_str()),
                    "claim {}",
                    visit.claim_id
                );
            }
        }
    }

    #[test]
    fn era_summary_counts_match_detail() {
        let data = DemoData::generate(12);
        for era in data.books.iter().flat_map(|book| &book.eras) {
            let row = era_summary(era);
            assert_eq!(row.denied_count, era.summary.denied);
            assert_eq!(row.rejected_count, era.summary.rejected);
            let lines: u64 = era.bundles.iter().map(|b| b.claims.len() as u64).sum();
            assert_eq!(row.claim_count, lines);
            if era.bundles.is_empty() {
                assert_eq!(row.kind, "Informational");
            }
        }
    }

    #[test]
    fn era_query_pages_and_sorts() {
        let data = DemoData::generate(7);
        let query = EraQuery {
            page_size: 5,
            ..EraQuery::default()
        };
        let first = eras(&data, query.clone());
        assert_eq!(first.len(), 5);
        assert!(
            first
                .windows(2)
                .all(|pair| pair[0].received_date >= pair[1].received_date)
        );

        let second = eras(
            &data,
            EraQuery {
                page: 2,
                ..query.clone()
            },
        );
        assert!(second.iter().all(|row| !first.contains(row)));

        let by_payer = eras(
            &data,
            EraQuery {
                sort: SortState::by("payer", SortDirection::Asc),
                ..query
            },
        );
        assert!(by_payer.windows(2).all(|pair| pair[0].payer <= pair[1].payer));
    }

    #[test]
    fn era_query_filters() {
        let data = DemoData::generate(7);
        let all = EraQuery {
            page_size: 500,
            ..EraQuery::default()
        };
        let everything = eras(&data, all.clone());
        assert!(everything.iter().any(|row| row.kind == "Informational"));

        let hidden = eras(
            &data,
            EraQuery {
                hide_informational: true,
                ..all.clone()
            },
        );
        assert!(hidden.iter().all(|row| row.kind != "Informational"));

        let denials = eras(
            &data,
            EraQuery {
                show_denials: true,
                ..all.clone()
            },
        );
        assert!(denials.iter().all(|row| row.denied_count > 0));

        let practice = data.practices()[0].id.clone();
        let scoped = eras(
            &data,
            EraQuery {
                practice: Some(practice.clone()),
                ..all
            },
        );
        let name = data.practices()[0].name.clone();
        assert!(!scoped.is_empty());
        assert!(scoped.iter().all(|row| row.practice == name));
    }

    #[test]
    fn claim_detail_resolves_by_reference() -> anyhow::Result<()> {
        let data = DemoData::generate(9);
        let claim = data.claims()[0].clone();
        let payload = data.answer(&FetchRequest::ClaimDetail(claim.detail_id()))?;
        let FetchPayload::ClaimDetail(detail) = payload else {
            panic!("expected claim detail");
        };
        assert_eq!(detail.billed_cents, claim.billed_cents);
        assert_eq!(detail.balance_cents, claim.billed_cents - claim.paid_cents);

        let missing = data
            .answer(&FetchRequest::ClaimDetail(ClaimId::new("nope")))
            .expect_err("unknown claim should fail");
        assert_eq!(missing.to_string(), "server error (404): Claim not found");
        Ok(())
    }

    #[test]
    fn search_respects_kind_and_minimum_length() -> anyhow::Result<()> {
        let data = DemoData::generate(4);
        let short = data.answer(&FetchRequest::Search {
            query: "c".to_owned(),
            kind: None,
        })?;
        assert_eq!(short, FetchPayload::Search(Vec::new()));

        let FetchPayload::Search(results) = data.answer(&FetchRequest::Search {
            query: "clm".to_owned(),
            kind: Some(SearchKind::Claim),
        })?
        else {
            panic!("expected search results");
        };
        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|result| result.kind == SearchKind::Claim));
        assert!(results.iter().all(|result| result.claim_reference.is_some()));

        let FetchPayload::Search(statuses) = data.answer(&FetchRequest::Search {
            query: "denied".to_owned(),
            kind: None,
        })?
        else {
            panic!("expected search results");
        };
        assert!(
            statuses
                .iter()
                .any(|result| result.label == "ERA Status: Denied")
        );
        Ok(())
    }

    #[test]
    fn practice_analytics_is_a_subset_of_global() -> anyhow::Result<()> {
        let data = DemoData::generate(8);
        let practice = data.practices()[0].clone();
        let FetchPayload::Analytics(global) = data.answer(&FetchRequest::Analytics {
            practice: None,
            days_back: 365,
        })?
        else {
            panic!("expected analytics");
        };
        let FetchPayload::Analytics(local) = data.answer(&FetchRequest::Analytics {
            practice: Some(practice.id.clone()),
            days_back: 365,
        })?
        else {
            panic!("expected analytics");
        };
        assert_eq!(
            global.summary.practice_name,
            "All Practices (Executive Summary)"
        );
        assert_eq!(local.summary.practice_name, practice.name);
        assert!(local.summary.total_claims <= global.summary.total_claims);
        let payer_claims: u64 = global.payers.iter().map(|payer| payer.total_claims).sum();
        assert_eq!(payer_claims, global.summary.total_claims);
        Ok(())
    }

    #[test]
    fn unsorted_view_keeps_source_order() {
        for seed in [1, 2, 3] {
            let claims = DemoData::generate(seed).claims();
            let all = apply_filter(&claims, |_| true);
            let unsorted = apply_sort(all.clone(), &SortState::unsorted());
            assert_eq!(ids(&unsorted), ids(&all));
        }
    }

    #[test]
    fn descending_sort_reverses_ascending() {
        for seed in [1, 7, 42] {
            let claims = DemoData::generate(seed).claims();
            let ascending = apply_sort(
                apply_filter(&claims, |_| true),
                &SortState::by("claim_id", SortDirection::Asc),
            );
            let descending = apply_sort(
                apply_filter(&claims, |_| true),
                &SortState::by("claim_id", SortDirection::Desc),
            );
            let mut reversed = ids(&ascending);
            reversed.reverse();
            assert_eq!(ids(&descending), reversed);
        }
    }

    #[test]
    fn sorting_twice_is_idempotent() {
        let claims = DemoData::generate(5).claims();
        for key in ["billed", "patient_name", "date", "status"] {
            let sort = SortState::by(key, SortDirection::Desc);
            let once = apply_sort(apply_filter(&claims, |_| true), &sort);
            let twice = apply_sort(once.clone(), &sort);
            assert_eq!(ids(&twice), ids(&once), "key {key}");
        }
    }

    #[test]
    fn pages_reconstruct_the_derived_rows() {
        let claims = DemoData::generate(13).claims();
        let derived = apply_sort(
            apply_filter(&claims, |claim| claim.billed_cents > 5_000),
            &SortState::by("billed", SortDirection::Asc),
        );
        for per_page in [1, 3, 10, 25] {
            let total_pages = paginate(&derived, 1, per_page).total_pages;
            let mut rebuilt = Vec::new();
            for page in 1..=total_pages {
                let slice = paginate(&derived, page, per_page);
                assert!(slice.visible.len() <= per_page);
                rebuilt.extend_from_slice(slice.visible);
            }
            assert_eq!(ids(&rebuilt), ids(&derived), "per_page {per_page}");
        }
    }

    #[test]
    fn filter_returns_a_subset() {
        let claims = DemoData::generate(21).claims();
        for status in ["Paid", "Denied", "Pending", "Rejected"] {
            let kept = apply_filter(&claims, |claim| claim.status == status);
            assert!(kept.iter().all(|claim| claim.status == status));
            assert!(kept.len() <= claims.len());
        }
    }

    #[test]
    fn empty_source_has_no_pages() {
        let empty: Vec<Claim> = Vec::new();
        let page = paginate(&empty, 1, 10);
        assert_eq!(page.total_pages, 0);
        assert!(page.visible.is_empty());
        assert!(!shows_pagination(page.total_pages));

        let view: ListView<Claim> = ListView::new(CLAIM_COLUMNS, 10, NO_CLAIMS_MESSAGE);
        assert_eq!(view.total_pages(), 0);
        assert!(!view.shows_pagination());
        assert_eq!(view.empty_message(), "No claims found.");
    }
}
