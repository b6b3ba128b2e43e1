// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! JSON shapes returned by the analytics API and their conversion into the
//! canonical records in `talisman_app`. Every fallback field, dollar amount
//! and placeholder date is resolved here so nothing downstream has to.

use serde::Deserialize;
use talisman_app::*;

mod loose {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(value)) => value,
            Some(Value::Number(value)) => value.to_string(),
            Some(Value::Bool(value)) => value.to_string(),
            _ => String::new(),
        })
    }

    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Number(value)) => value.as_f64(),
            Some(Value::String(value)) => value.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        Ok(number(deserializer)?.map_or(0, |value| value.max(0.0).round() as u64))
    }

    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Bool(value)) => value,
            Some(Value::Number(value)) => value.as_f64().is_some_and(|n| n != 0.0),
            Some(Value::String(value)) => matches!(value.as_str(), "true" | "1"),
            _ => false,
        })
    }
}

/// Rounds a dollar amount to integer cents. Missing amounts count as zero.
pub fn cents(dollars: Option<f64>) -> i64 {
    (dollars.unwrap_or(0.0) * 100.0).round() as i64
}

/// The server writes `"N/A"` (or `"None"`) when it has no date.
pub fn date(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    match trimmed {
        "" | "N/A" | "None" | "null" => None,
        value => Some(value.to_owned()),
    }
}

fn first_non_empty(candidates: [&str; 3]) -> String {
    candidates
        .into_iter()
        .find(|value| !value.is_empty())
        .unwrap_or_default()
        .to_owned()
}

fn placeholder(value: String) -> String {
    if value == "N/A" { String::new() } else { value }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PracticeWire {
    #[serde(rename = "locationGuid", deserialize_with = "loose::text")]
    location_guid: String,
    #[serde(deserialize_with = "loose::text")]
    practice_guid: String,
    #[serde(deserialize_with = "loose::text")]
    practice_id: String,
    #[serde(deserialize_with = "loose::text")]
    name: String,
    #[serde(deserialize_with = "loose::text")]
    practice_name: String,
    #[serde(deserialize_with = "loose::text")]
    city: String,
    #[serde(deserialize_with = "loose::text")]
    state: String,
    #[serde(rename = "eraCount", deserialize_with = "loose::count")]
    era_count: u64,
    #[serde(rename = "encounterCount", deserialize_with = "loose::count")]
    encounter_count: u64,
}

impl From<PracticeWire> for Practice {
    fn from(wire: PracticeWire) -> Self {
        Self {
            id: PracticeId::new(first_non_empty([
                &wire.location_guid,
                &wire.practice_guid,
                &wire.practice_id,
            ])),
            name: first_non_empty([&wire.name, &wire.practice_name, ""]),
            city: placeholder(wire.city),
            state: placeholder(wire.state),
            era_count: wire.era_count,
            encounter_count: wire.encounter_count,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PatientWire {
    #[serde(deserialize_with = "loose::text")]
    patient_guid: String,
    #[serde(deserialize_with = "loose::text")]
    name: String,
    #[serde(deserialize_with = "loose::text")]
    patient_id: String,
    #[serde(deserialize_with = "loose::count")]
    encounter_count: u64,
    #[serde(deserialize_with = "loose::text")]
    last_visit: String,
}

impl From<PatientWire> for Patient {
    fn from(wire: PatientWire) -> Self {
        Self {
            id: PatientId::new(wire.patient_guid),
            name: wire.name,
            patient_id: wire.patient_id,
            encounter_count: wire.encounter_count,
            last_visit: date(&wire.last_visit),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EncounterWire {
    #[serde(deserialize_with = "loose::text")]
    encounter_id: String,
    #[serde(deserialize_with = "loose::text")]
    date: String,
    #[serde(deserialize_with = "loose::text")]
    patient_name: String,
    #[serde(deserialize_with = "loose::text")]
    provider_name: String,
    #[serde(rename = "type", deserialize_with = "loose::text")]
    kind: String,
    #[serde(deserialize_with = "loose::text")]
    status: String,
}

impl From<EncounterWire> for Encounter {
    fn from(wire: EncounterWire) -> Self {
        Self {
            id: EncounterId::new(wire.encounter_id),
            date: date(&wire.date),
            patient_name: wire.patient_name,
            provider_name: placeholder(wire.provider_name),
            kind: wire.kind,
            status: placeholder(wire.status),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClaimWire {
    #[serde(deserialize_with = "loose::text")]
    claim_id: String,
    #[serde(deserialize_with = "loose::text")]
    claim_reference_id: String,
    #[serde(deserialize_with = "loose::text")]
    date: String,
    #[serde(deserialize_with = "loose::text")]
    patient_name: String,
    #[serde(deserialize_with = "loose::text")]
    practice_name: String,
    #[serde(deserialize_with = "loose::number")]
    billed: Option<f64>,
    #[serde(deserialize_with = "loose::number")]
    paid: Option<f64>,
    #[serde(deserialize_with = "loose::text")]
    status: String,
    #[serde(deserialize_with = "loose::text")]
    proc_code: String,
}

impl From<ClaimWire> for Claim {
    fn from(wire: ClaimWire) -> Self {
        Self {
            claim_id: wire.claim_id,
            reference_id: (!wire.claim_reference_id.is_empty())
                .then(|| ClaimId::new(wire.claim_reference_id)),
            date: date(&wire.date),
            patient_name: wire.patient_name,
            practice_name: wire.practice_name,
            billed_cents: cents(wire.billed),
            paid_cents: cents(wire.paid),
            status: wire.status,
            proc_code: wire.proc_code,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EraSummaryWire {
    #[serde(deserialize_with = "loose::text")]
    id: String,
    #[serde(deserialize_with = "loose::text")]
    received_date: String,
    #[serde(deserialize_with = "loose::text")]
    payer: String,
    #[serde(deserialize_with = "loose::text")]
    check_number: String,
    #[serde(deserialize_with = "loose::number")]
    total_paid: Option<f64>,
    #[serde(deserialize_with = "loose::number")]
    total_billed: Option<f64>,
    #[serde(deserialize_with = "loose::text")]
    practice: String,
    #[serde(deserialize_with = "loose::count")]
    claim_count: u64,
    #[serde(deserialize_with = "loose::count")]
    denied_count: u64,
    #[serde(deserialize_with = "loose::count")]
    rejected_count: u64,
    #[serde(deserialize_with = "loose::text")]
    denial_reasons: String,
    #[serde(deserialize_with = "loose::text")]
    status: String,
    #[serde(rename = "type", deserialize_with = "loose::text")]
    kind: String,
}

impl From<EraSummaryWire> for EraSummary {
    fn from(wire: EraSummaryWire) -> Self {
        Self {
            id: EraId::new(wire.id),
            received_date: date(&wire.received_date),
            payer: wire.payer,
            check_number: placeholder(wire.check_number),
            total_paid_cents: cents(wire.total_paid),
            total_billed_cents: cents(wire.total_billed),
            practice: wire.practice,
            claim_count: wire.claim_count,
            denied_count: wire.denied_count,
            rejected_count: wire.rejected_count,
            denial_reasons: wire.denial_reasons,
            status: wire.status,
            kind: wire.kind,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct EraClaimWire {
    #[serde(deserialize_with = "loose::text")]
    claim_id: String,
    #[serde(deserialize_with = "loose::text")]
    proc_code: String,
    #[serde(deserialize_with = "loose::number")]
    billed: Option<f64>,
    #[serde(deserialize_with = "loose::number")]
    paid: Option<f64>,
    #[serde(deserialize_with = "loose::text")]
    status: String,
    #[serde(deserialize_with = "loose::flag")]
    previously_rejected: bool,
    #[serde(deserialize_with = "loose::text")]
    date: String,
    #[serde(deserialize_with = "loose::text")]
    adjustments: String,
    #[serde(deserialize_with = "loose::text")]
    adjustment_descriptions: String,
    #[serde(deserialize_with = "loose::text")]
    patient: String,
    #[serde(deserialize_with = "loose::text")]
    diagnoses: String,
    #[serde(deserialize_with = "loose::text")]
    provider: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct BundleWire {
    #[serde(deserialize_with = "loose::text")]
    reference_id: String,
    #[serde(deserialize_with = "loose::number")]
    bundle_paid: Option<f64>,
    #[serde(deserialize_with = "loose::number")]
    patient_resp: Option<f64>,
    claims: Vec<EraClaimWire>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OutcomeWire {
    #[serde(deserialize_with = "loose::count")]
    paid: u64,
    #[serde(deserialize_with = "loose::count")]
    rejected: u64,
    #[serde(deserialize_with = "loose::count")]
    denied: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EraDetailWire {
    #[serde(deserialize_with = "loose::text")]
    id: String,
    #[serde(deserialize_with = "loose::text")]
    file_name: String,
    #[serde(deserialize_with = "loose::text")]
    received_date: String,
    #[serde(deserialize_with = "loose::text")]
    payer: String,
    #[serde(deserialize_with = "loose::text")]
    check_number: String,
    #[serde(deserialize_with = "loose::text")]
    check_date: String,
    #[serde(deserialize_with = "loose::number")]
    total_paid: Option<f64>,
    #[serde(deserialize_with = "loose::text")]
    method: String,
    #[serde(deserialize_with = "loose::text")]
    practice: String,
    #[serde(deserialize_with = "loose::count")]
    claim_count: u64,
    bundles: Vec<BundleWire>,
    summary: Option<OutcomeWire>,
}

impl From<EraDetailWire> for EraDetail {
    fn from(wire: EraDetailWire) -> Self {
        let bundles: Vec<ClaimBundle> = wire
            .bundles
            .into_iter()
            .map(|bundle| ClaimBundle {
                reference_id: bundle.reference_id,
                bundle_paid_cents: cents(bundle.bundle_paid),
                patient_resp_cents: cents(bundle.patient_resp),
                claims: bundle
                    .claims
                    .into_iter()
                    .map(|claim| EraClaimLine {
                        claim_id: claim.claim_id,
                        proc_code: claim.proc_code,
                        billed_cents: cents(claim.billed),
                        paid_cents: cents(claim.paid),
                        status: ClaimLineStatus::parse(&claim.status),
                        previously_rejected: claim.previously_rejected,
                        date: date(&claim.date),
                        adjustments: claim.adjustments,
                        adjustment_descriptions: claim.adjustment_descriptions,
                        patient: claim.patient,
                        diagnoses: claim.diagnoses,
                        provider: claim.provider,
                    })
                    .collect(),
            })
            .collect();
        let summary = match wire.summary {
            Some(outcome) => EraOutcomeCounts {
                paid: outcome.paid,
                rejected: outcome.rejected,
                denied: outcome.denied,
            },
            None => tally_outcomes(&bundles),
        };
        Self {
            id: EraId::new(wire.id),
            file_name: wire.file_name,
            received_date: date(&wire.received_date),
            payer: wire.payer,
            check_number: placeholder(wire.check_number),
            check_date: date(&wire.check_date),
            total_paid_cents: cents(wire.total_paid),
            method: wire.method,
            practice: wire.practice,
            claim_count: wire.claim_count,
            bundles,
            summary,
        }
    }
}

fn tally_outcomes(bundles: &[ClaimBundle]) -> EraOutcomeCounts {
    let mut counts = EraOutcomeCounts::default();
    for line in bundles.iter().flat_map(|bundle| &bundle.claims) {
        match line.status {
            ClaimLineStatus::Paid => counts.paid += 1,
            ClaimLineStatus::Rejected => counts.rejected += 1,
            ClaimLineStatus::Denied => counts.denied += 1,
            ClaimLineStatus::Other(_) => {}
        }
    }
    counts
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DiagnosisWire {
    #[serde(deserialize_with = "loose::text")]
    code: String,
    #[serde(deserialize_with = "loose::text")]
    description: String,
}

impl From<DiagnosisWire> for Diagnosis {
    fn from(wire: DiagnosisWire) -> Self {
        Self {
            code: wire.code,
            description: wire.description,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PatientHeaderWire {
    #[serde(deserialize_with = "loose::text")]
    full_name: String,
    #[serde(deserialize_with = "loose::text")]
    patient_id: String,
    #[serde(deserialize_with = "loose::text")]
    dob: String,
    #[serde(deserialize_with = "loose::text")]
    gender: String,
    #[serde(deserialize_with = "loose::text")]
    case_id: String,
    #[serde(deserialize_with = "loose::text")]
    address_line1: String,
    #[serde(deserialize_with = "loose::text")]
    city: String,
    #[serde(deserialize_with = "loose::text")]
    state: String,
    #[serde(deserialize_with = "loose::text")]
    zip: String,
}

impl PatientHeaderWire {
    fn address(&self) -> String {
        let region = [self.state.as_str(), self.zip.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        [self.address_line1.as_str(), self.city.as_str(), region.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct InsuranceWire {
    #[serde(deserialize_with = "loose::text")]
    company_name: String,
    #[serde(deserialize_with = "loose::text")]
    plan_name: String,
    #[serde(deserialize_with = "loose::text")]
    policy_number: String,
    #[serde(deserialize_with = "loose::text")]
    group_number: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct VisitWire {
    #[serde(deserialize_with = "loose::text")]
    date: String,
    #[serde(deserialize_with = "loose::text")]
    location: String,
    diagnoses: Vec<DiagnosisWire>,
    #[serde(deserialize_with = "loose::number")]
    total_billed: Option<f64>,
    #[serde(deserialize_with = "loose::number")]
    total_paid: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PatientDetailWire {
    patient: PatientHeaderWire,
    insurance: Option<InsuranceWire>,
    encounters: Vec<VisitWire>,
}

impl From<PatientDetailWire> for PatientDetail {
    fn from(wire: PatientDetailWire) -> Self {
        let address = wire.patient.address();
        Self {
            full_name: wire.patient.full_name,
            patient_id: wire.patient.patient_id,
            dob: date(&wire.patient.dob),
            gender: wire.patient.gender,
            case_id: wire.patient.case_id,
            address,
            insurance: wire.insurance.map(|insurance| InsuranceSummary {
                company: insurance.company_name,
                plan: insurance.plan_name,
                policy_number: insurance.policy_number,
                group_number: insurance.group_number,
            }),
            visits: wire
                .encounters
                .into_iter()
                .map(|visit| PatientVisit {
                    date: date(&visit.date),
                    location: visit.location,
                    diagnoses: visit.diagnoses.into_iter().map(Diagnosis::from).collect(),
                    billed_cents: cents(visit.total_billed),
                    paid_cents: cents(visit.total_paid),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ServiceLineWire {
    #[serde(deserialize_with = "loose::text")]
    date: String,
    #[serde(deserialize_with = "loose::text")]
    proc_code: String,
    #[serde(deserialize_with = "loose::text")]
    description: String,
    #[serde(deserialize_with = "loose::number")]
    billed: Option<f64>,
    #[serde(deserialize_with = "loose::number")]
    paid: Option<f64>,
    #[serde(deserialize_with = "loose::text")]
    adjustments: String,
    #[serde(deserialize_with = "loose::text")]
    adjustment_descriptions: String,
}

impl From<ServiceLineWire> for ServiceLine {
    fn from(wire: ServiceLineWire) -> Self {
        Self {
            date: date(&wire.date),
            proc_code: wire.proc_code,
            description: wire.description,
            billed_cents: cents(wire.billed),
            paid_cents: cents(wire.paid),
            adjustments: wire.adjustments,
            adjustment_descriptions: wire.adjustment_descriptions,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RemittanceWire {
    #[serde(deserialize_with = "loose::text")]
    claim_ref_id: String,
    #[serde(deserialize_with = "loose::text")]
    payer: String,
    #[serde(deserialize_with = "loose::text")]
    check_number: String,
    #[serde(deserialize_with = "loose::text")]
    check_date: String,
    #[serde(deserialize_with = "loose::number")]
    paid: Option<f64>,
    #[serde(deserialize_with = "loose::number")]
    patient_resp: Option<f64>,
}

impl From<RemittanceWire> for RemittanceRef {
    fn from(wire: RemittanceWire) -> Self {
        Self {
            claim_reference: wire.claim_ref_id,
            payer: wire.payer,
            check_number: placeholder(wire.check_number),
            check_date: date(&wire.check_date),
            paid_cents: cents(wire.paid),
            patient_resp_cents: cents(wire.patient_resp),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TotalsWire {
    #[serde(deserialize_with = "loose::number")]
    billed: Option<f64>,
    #[serde(deserialize_with = "loose::number")]
    paid: Option<f64>,
    #[serde(deserialize_with = "loose::number")]
    balance: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct EncounterContextWire {
    #[serde(deserialize_with = "loose::text")]
    encounter_guid: String,
    #[serde(deserialize_with = "loose::text")]
    date: String,
    #[serde(deserialize_with = "loose::text")]
    location: String,
    #[serde(deserialize_with = "loose::text")]
    status: String,
    #[serde(rename = "type", deserialize_with = "loose::text")]
    kind: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PersonWire {
    #[serde(deserialize_with = "loose::text")]
    id: String,
    #[serde(deserialize_with = "loose::text")]
    name: String,
    #[serde(deserialize_with = "loose::text")]
    dob: String,
    #[serde(deserialize_with = "loose::text")]
    address: String,
    #[serde(deserialize_with = "loose::text")]
    npi: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EntitiesWire {
    patient: PersonWire,
    provider: PersonWire,
    payer: PersonWire,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ClinicalWire {
    diagnoses: Vec<DiagnosisWire>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct EncounterFinancialsWire {
    lines: Vec<ServiceLineWire>,
    era_bundles: Vec<RemittanceWire>,
    totals: TotalsWire,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EncounterDetailWire {
    context: EncounterContextWire,
    entities: EntitiesWire,
    clinical: ClinicalWire,
    financials: EncounterFinancialsWire,
}

impl From<EncounterDetailWire> for EncounterDetail {
    fn from(wire: EncounterDetailWire) -> Self {
        let EncounterDetailWire {
            context,
            entities,
            clinical,
            financials,
        } = wire;
        Self {
            guid: context.encounter_guid,
            date: date(&context.date),
            location: context.location,
            status: context.status,
            kind: context.kind,
            patient_id: entities.patient.id,
            patient_name: entities.patient.name,
            patient_dob: date(&entities.patient.dob),
            patient_address: entities.patient.address,
            provider_name: entities.provider.name,
            provider_npi: entities.provider.npi,
            payer: entities.payer.name,
            diagnoses: clinical.diagnoses.into_iter().map(Diagnosis::from).collect(),
            lines: financials.lines.into_iter().map(ServiceLine::from).collect(),
            remittances: financials
                .era_bundles
                .into_iter()
                .map(RemittanceRef::from)
                .collect(),
            billed_cents: cents(financials.totals.billed),
            paid_cents: cents(financials.totals.paid),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ClaimPatientWire {
    #[serde(deserialize_with = "loose::text")]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ClaimHeaderWire {
    #[serde(deserialize_with = "loose::text")]
    date: String,
    patient: ClaimPatientWire,
    #[serde(deserialize_with = "loose::text")]
    provider: String,
    #[serde(deserialize_with = "loose::text")]
    status: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ClaimFinancialsWire {
    lines: Vec<ServiceLineWire>,
    eras: Vec<RemittanceWire>,
    totals: TotalsWire,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClaimDetailWire {
    header: ClaimHeaderWire,
    financials: ClaimFinancialsWire,
}

impl ClaimDetailWire {
    pub fn into_detail(self, reference_id: ClaimId) -> ClaimDetail {
        let totals = self.financials.totals;
        let billed_cents = cents(totals.billed);
        let paid_cents = cents(totals.paid);
        ClaimDetail {
            reference_id,
            date: date(&self.header.date),
            patient_name: self.header.patient.name,
            provider: self.header.provider,
            status: self.header.status,
            lines: self
                .financials
                .lines
                .into_iter()
                .map(ServiceLine::from)
                .collect(),
            remittances: self
                .financials
                .eras
                .into_iter()
                .map(RemittanceRef::from)
                .collect(),
            billed_cents,
            paid_cents,
            balance_cents: totals
                .balance
                .map_or(billed_cents - paid_cents, |balance| cents(Some(balance))),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardMetricsWire {
    #[serde(deserialize_with = "loose::count")]
    total_encounters: u64,
    #[serde(deserialize_with = "loose::count")]
    total_claims: u64,
    #[serde(deserialize_with = "loose::number")]
    total_billed: Option<f64>,
    #[serde(deserialize_with = "loose::number")]
    total_paid: Option<f64>,
    #[serde(deserialize_with = "loose::number")]
    collection_rate: Option<f64>,
    #[serde(deserialize_with = "loose::count")]
    practices_count: u64,
}

impl From<DashboardMetricsWire> for DashboardMetrics {
    fn from(wire: DashboardMetricsWire) -> Self {
        Self {
            total_encounters: wire.total_encounters,
            total_claims: wire.total_claims,
            total_billed_cents: cents(wire.total_billed),
            total_paid_cents: cents(wire.total_paid),
            collection_rate: wire.collection_rate.unwrap_or(0.0),
            practices_count: wire.practices_count,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ActivityWire {
    #[serde(deserialize_with = "loose::text")]
    date: String,
    #[serde(deserialize_with = "loose::count")]
    count: u64,
}

impl From<ActivityWire> for ActivityPoint {
    fn from(wire: ActivityWire) -> Self {
        Self {
            date: wire.date,
            count: wire.count,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MetricWire {
    #[serde(deserialize_with = "loose::number")]
    value: Option<f64>,
    #[serde(deserialize_with = "loose::number")]
    trend: Option<f64>,
    #[serde(deserialize_with = "loose::text")]
    performance: String,
}

impl From<MetricWire> for MetricReading {
    fn from(wire: MetricWire) -> Self {
        Self {
            value: wire.value,
            trend: wire.trend,
            performance: PerformanceLevel::parse(&wire.performance),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct MetricsWire {
    #[serde(rename = "daysInAR")]
    days_in_ar: MetricWire,
    net_collection_rate: MetricWire,
    patient_collection_rate: MetricWire,
    denial_rate: MetricWire,
    ar_over_120_days: MetricWire,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NamedWire {
    #[serde(deserialize_with = "loose::text")]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FinancialMetricsWire {
    practice: NamedWire,
    metrics: MetricsWire,
}

impl From<FinancialMetricsWire> for FinancialMetrics {
    fn from(wire: FinancialMetricsWire) -> Self {
        Self {
            practice_name: wire.practice.name,
            days_in_ar: wire.metrics.days_in_ar.into(),
            net_collection_rate: wire.metrics.net_collection_rate.into(),
            patient_collection_rate: wire.metrics.patient_collection_rate.into(),
            denial_rate: wire.metrics.denial_rate.into(),
            ar_over_120_days: wire.metrics.ar_over_120_days.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SummaryWire {
    #[serde(deserialize_with = "loose::text")]
    practice_name: String,
    #[serde(deserialize_with = "loose::count")]
    total_claims: u64,
    #[serde(deserialize_with = "loose::number")]
    total_billed: Option<f64>,
    #[serde(deserialize_with = "loose::number")]
    total_paid: Option<f64>,
    #[serde(deserialize_with = "loose::number")]
    denial_rate: Option<f64>,
    #[serde(deserialize_with = "loose::number")]
    denial_rate_vs_overall: Option<f64>,
    #[serde(deserialize_with = "loose::number")]
    denied_amount: Option<f64>,
    #[serde(deserialize_with = "loose::number")]
    recovery_potential: Option<f64>,
    #[serde(deserialize_with = "loose::count")]
    high_risk_claims: u64,
    #[serde(deserialize_with = "loose::number")]
    high_risk_pct: Option<f64>,
}

impl From<SummaryWire> for PerformanceSummary {
    fn from(wire: SummaryWire) -> Self {
        Self {
            practice_name: wire.practice_name,
            total_claims: wire.total_claims,
            total_billed_cents: cents(wire.total_billed),
            total_paid_cents: cents(wire.total_paid),
            denial_rate: wire.denial_rate.unwrap_or(0.0),
            denial_rate_vs_overall: wire.denial_rate_vs_overall.unwrap_or(0.0),
            denied_cents: cents(wire.denied_amount),
            recovery_potential_cents: cents(wire.recovery_potential),
            high_risk_claims: wire.high_risk_claims,
            high_risk_pct: wire.high_risk_pct.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PayerWire {
    #[serde(deserialize_with = "loose::text")]
    name: String,
    #[serde(deserialize_with = "loose::count")]
    total_claims: u64,
    #[serde(deserialize_with = "loose::count")]
    denied_count: u64,
    #[serde(deserialize_with = "loose::number")]
    denied_amount: Option<f64>,
    /// Percentage points, not a fraction.
    #[serde(deserialize_with = "loose::number")]
    rate: Option<f64>,
}

impl From<PayerWire> for PayerPerformance {
    fn from(wire: PayerWire) -> Self {
        Self {
            name: wire.name,
            total_claims: wire.total_claims,
            denied_count: wire.denied_count,
            denied_cents: cents(wire.denied_amount),
            denial_rate: wire.rate.unwrap_or(0.0) / 100.0,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CptWire {
    #[serde(deserialize_with = "loose::text")]
    code: String,
    #[serde(deserialize_with = "loose::text")]
    description: String,
    #[serde(deserialize_with = "loose::count")]
    volume: u64,
    #[serde(deserialize_with = "loose::number")]
    value: Option<f64>,
    #[serde(deserialize_with = "loose::number")]
    denied_amount: Option<f64>,
    #[serde(deserialize_with = "loose::number")]
    denial_rate: Option<f64>,
}

impl From<CptWire> for CptPerformance {
    fn from(wire: CptWire) -> Self {
        Self {
            code: wire.code,
            description: wire.description,
            volume: wire.volume,
            value_cents: cents(wire.value),
            denied_cents: cents(wire.denied_amount),
            denial_rate: wire.denial_rate.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ActionWire {
    #[serde(deserialize_with = "loose::text")]
    priority: String,
    #[serde(deserialize_with = "loose::text")]
    title: String,
    #[serde(deserialize_with = "loose::number")]
    financial_impact: Option<f64>,
    #[serde(deserialize_with = "loose::text")]
    recommendation: String,
    suggested_next_steps: Vec<String>,
}

impl From<ActionWire> for ActionItem {
    fn from(wire: ActionWire) -> Self {
        Self {
            priority: Priority::parse(&wire.priority),
            title: wire.title,
            financial_impact_cents: cents(wire.financial_impact),
            recommendation: wire.recommendation,
            next_steps: wire.suggested_next_steps,
        }
    }
}

/// Action items arrive either bare or wrapped in `{"action_items": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ActionItemsWire {
    Wrapped { action_items: Vec<ActionWire> },
    Bare(Vec<ActionWire>),
}

impl ActionItemsWire {
    pub fn into_items(self) -> Vec<ActionItem> {
        let items = match self {
            Self::Wrapped { action_items } => action_items,
            Self::Bare(items) => items,
        };
        items.into_iter().map(ActionItem::from).collect()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchMetadataWire {
    #[serde(deserialize_with = "loose::text")]
    practice_guid: String,
    #[serde(deserialize_with = "loose::text")]
    claim_ref_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchResultWire {
    #[serde(rename = "type", deserialize_with = "loose::text")]
    kind: String,
    #[serde(deserialize_with = "loose::text")]
    id: String,
    #[serde(deserialize_with = "loose::text")]
    label: String,
    #[serde(deserialize_with = "loose::text")]
    subtext: String,
    metadata: Option<SearchMetadataWire>,
}

impl SearchResultWire {
    /// Results with a kind this client does not understand are dropped.
    pub fn into_result(self) -> Option<SearchResult> {
        let kind = SearchKind::parse(&self.kind)?;
        let metadata = self.metadata.unwrap_or_default();
        Some(SearchResult {
            kind,
            id: self.id,
            label: self.label,
            subtext: self.subtext,
            practice_id: (!metadata.practice_guid.is_empty())
                .then(|| PracticeId::new(metadata.practice_guid)),
            claim_reference: (!metadata.claim_ref_id.is_empty())
                .then(|| ClaimId::new(metadata.claim_ref_id)),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MarkdownWire {
    pub markdown: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse<T: for<'de> Deserialize<'de>>(raw: &str) -> T {
        serde_json::from_str(raw).expect("fixture should parse")
    }

    #[test]
    fn practice_falls_back_to_alternate_fields() {
        let practice: Practice = parse::<PracticeWire>(
            r#"{"practice_id": 42, "practice_name": "North", "city": "N/A", "state": "TX"}"#,
        )
        .into();
        assert_eq!(practice.id.as_str(), "42");
        assert_eq!(practice.name, "North");
        assert_eq!(practice.city, "");
        assert_eq!(practice.location(), "TX");

        let practice: Practice = parse::<PracticeWire>(
            r#"{"locationGuid": "abc", "name": "South", "eraCount": 3, "encounterCount": "7"}"#,
        )
        .into();
        assert_eq!(practice.id.as_str(), "abc");
        assert_eq!(practice.era_count, 3);
        assert_eq!(practice.encounter_count, 7);
    }

    #[test]
    fn claim_amounts_become_cents_and_na_dates_vanish() {
        let claim: Claim = parse::<ClaimWire>(
            r#"{"claimId": "CLM001", "patientName": "John Doe", "billed": 100, "paid": 12.5,
                "date": "N/A", "status": "Paid", "claimReferenceId": null}"#,
        )
        .into();
        assert_eq!(claim.billed_cents, 10_000);
        assert_eq!(claim.paid_cents, 1_250);
        assert_eq!(claim.date, None);
        assert_eq!(claim.reference_id, None);
        assert_eq!(claim.detail_id().as_str(), "CLM001");
    }

    #[test]
    fn era_detail_tallies_outcomes_when_summary_missing() {
        let detail: EraDetail = parse::<EraDetailWire>(
            r#"{"id": 7, "payer": "Aetna", "totalPaid": 55.5,
                "bundles": [{"referenceId": "B1", "bundlePaid": 55.5, "claims": [
                    {"claimId": "1", "status": "Paid", "paid": 55.5},
                    {"claimId": "2", "status": "Denied", "previouslyRejected": true}
                ]}]}"#,
        )
        .into();
        assert_eq!(detail.id.as_str(), "7");
        assert_eq!(detail.total_paid_cents, 5_550);
        assert_eq!(
            detail.summary,
            EraOutcomeCounts {
                paid: 1,
                rejected: 0,
                denied: 1
            }
        );
        assert!(detail.bundles[0].claims[1].previously_rejected);
    }

    #[test]
    fn payer_rate_points_become_fraction() {
        let payer: PayerPerformance = parse::<PayerWire>(r#"{"name": "UHC", "rate": 12.5}"#).into();
        assert!((payer.denial_rate - 0.125).abs() < 1e-9);
        assert_eq!(payer.denied_cents, 0);
    }

    #[test]
    fn action_items_accept_both_shapes() {
        let wrapped: ActionItemsWire = parse(
            r#"{"action_items": [{"priority": "HIGH", "title": "t", "financial_impact": 150}]}"#,
        );
        let items = wrapped.into_items();
        assert_eq!(items[0].priority, Priority::High);
        assert_eq!(items[0].financial_impact_cents, 15_000);

        let bare: ActionItemsWire = parse(r#"[{"priority": "LOW", "title": "u"}]"#);
        assert_eq!(bare.into_items()[0].priority, Priority::Low);
    }

    #[test]
    fn financial_metrics_read_nested_readings() {
        let metrics: FinancialMetrics = parse::<FinancialMetricsWire>(
            r#"{"practice": {"guid": "p1", "name": "North"},
                "metrics": {"daysInAR": {"value": 41.2, "trend": -1.5, "performance": "good"},
                            "patientCollectionRate": {"value": null, "trend": null, "performance": null}}}"#,
        )
        .into();
        assert_eq!(metrics.practice_name, "North");
        assert_eq!(metrics.days_in_ar.value, Some(41.2));
        assert_eq!(metrics.days_in_ar.performance, Some(PerformanceLevel::Good));
        assert_eq!(metrics.patient_collection_rate.value, None);
        assert_eq!(metrics.denial_rate, MetricReading::default());
    }

    #[test]
    fn patient_detail_joins_address_parts() {
        let detail: PatientDetail = parse::<PatientDetailWire>(
            r#"{"patient": {"fullName": "Jane Roe", "addressLine1": "1 Main St", "city": "Austin",
                            "state": "TX", "zip": "78701", "gender": "F", "dob": "1980-02-03"},
                "encounters": [{"date": "2023-01-05", "totalBilled": 10, "diagnoses": [{"code": "Z00"}]}]}"#,
        )
        .into();
        assert_eq!(detail.address, "1 Main St, Austin, TX 78701");
        assert_eq!(detail.gender_label(), "Female");
        assert_eq!(detail.insurance, None);
        assert_eq!(detail.visits[0].billed_cents, 1_000);
        assert_eq!(detail.visits[0].diagnoses[0].code, "Z00");
    }

    #[test]
    fn claim_detail_computes_balance_when_absent() {
        let detail = parse::<ClaimDetailWire>(
            r#"{"header": {"patient": {"name": "John"}, "status": "Open"},
                "financials": {"totals": {"billed": 100, "paid": 40}}}"#,
        )
        .into_detail(ClaimId::new("REF-1"));
        assert_eq!(detail.balance_cents, 6_000);
        assert_eq!(detail.patient_name, "John");
    }

    #[test]
    fn search_results_keep_navigation_metadata() {
        let result = parse::<SearchResultWire>(
            r#"{"type": "claim", "id": "9", "label": "Claim 9",
                "metadata": {"practice_guid": "p1", "claim_ref_id": "R9"}}"#,
        )
        .into_result()
        .expect("known kind");
        assert_eq!(result.kind, SearchKind::Claim);
        assert_eq!(result.practice_id, Some(PracticeId::new("p1")));
        assert_eq!(result.claim_reference, Some(ClaimId::new("R9")));

        let unknown = parse::<SearchResultWire>(r#"{"type": "invoice", "id": "1"}"#);
        assert!(unknown.into_result().is_none());
    }
}
