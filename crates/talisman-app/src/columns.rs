// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Column layouts and field accessors for every table the dashboard shows.

use crate::format::{format_currency, format_percent_fraction, format_short_date};
use crate::listview::{Column, FieldValue, Record};
use crate::model::*;

pub const NO_CLAIMS_MESSAGE: &str = "No claims found.";
pub const NO_PATIENTS_MESSAGE: &str = "No patients found.";
pub const NO_ENCOUNTERS_MESSAGE: &str = "No encounters found.";
pub const NO_ERAS_MESSAGE: &str = "No ERAs found.";
pub const NO_PAYERS_MESSAGE: &str = "No payer data available.";
pub const NO_CPTS_MESSAGE: &str = "No procedure data available.";

fn date_field(date: &Option<String>) -> FieldValue<'_> {
    date.as_deref().map_or(FieldValue::Empty, FieldValue::Text)
}

fn count(value: u64) -> FieldValue<'static> {
    FieldValue::Number(value as f64)
}

impl Record for Claim {
    fn field(&self, key: &str) -> FieldValue<'_> {
        match key {
            "claim_id" => FieldValue::Text(&self.claim_id),
            "patient_name" => FieldValue::Text(&self.patient_name),
            "practice_name" => FieldValue::Text(&self.practice_name),
            "date" => date_field(&self.date),
            "billed" => FieldValue::Money(self.billed_cents),
            "paid" => FieldValue::Money(self.paid_cents),
            "status" => FieldValue::Text(&self.status),
            "proc_code" => FieldValue::Text(&self.proc_code),
            _ => FieldValue::Empty,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.claim_id.as_str(),
            self.patient_name.as_str(),
            self.practice_name.as_str(),
            self.status.as_str(),
            self.proc_code.as_str(),
        ]
    }
}

impl Record for Patient {
    fn field(&self, key: &str) -> FieldValue<'_> {
        match key {
            "name" => FieldValue::Text(&self.name),
            "patient_id" => FieldValue::Text(&self.patient_id),
            "encounter_count" => count(self.encounter_count),
            "last_visit" => date_field(&self.last_visit),
            _ => FieldValue::Empty,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.patient_id.as_str()]
    }
}

impl Record for Encounter {
    fn field(&self, key: &str) -> FieldValue<'_> {
        match key {
            "date" => date_field(&self.date),
            "patient_name" => FieldValue::Text(&self.patient_name),
            "provider_name" => FieldValue::Text(&self.provider_name),
            "kind" => FieldValue::Text(&self.kind),
            "status" => FieldValue::Text(&self.status),
            _ => FieldValue::Empty,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.patient_name.as_str(),
            self.provider_name.as_str(),
            self.kind.as_str(),
            self.status.as_str(),
        ]
    }
}

impl Record for EraSummary {
    fn field(&self, key: &str) -> FieldValue<'_> {
        match key {
            "id" => FieldValue::Text(self.id.as_str()),
            "date" => date_field(&self.received_date),
            "practice" => FieldValue::Text(&self.practice),
            "payer" => FieldValue::Text(&self.payer),
            "kind" => FieldValue::Text(&self.kind),
            "total_billed" => FieldValue::Money(self.total_billed_cents),
            "total_paid" => FieldValue::Money(self.total_paid_cents),
            "claim_count" => count(self.claim_count),
            "rejected" => count(self.rejected_count),
            "denied" => count(self.denied_count),
            _ => FieldValue::Empty,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.id.as_str(),
            self.payer.as_str(),
            self.check_number.as_str(),
            self.practice.as_str(),
        ]
    }
}

impl Record for PayerPerformance {
    fn field(&self, key: &str) -> FieldValue<'_> {
        match key {
            "name" => FieldValue::Text(&self.name),
            "total_claims" => count(self.total_claims),
            "denied_count" => count(self.denied_count),
            "denied" => FieldValue::Money(self.denied_cents),
            "denial_rate" => FieldValue::Number(self.denial_rate),
            _ => FieldValue::Empty,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

impl Record for CptPerformance {
    fn field(&self, key: &str) -> FieldValue<'_> {
        match key {
            "code" => FieldValue::Text(&self.code),
            "description" => FieldValue::Text(&self.description),
            "volume" => count(self.volume),
            "value" => FieldValue::Money(self.value_cents),
            "denied" => FieldValue::Money(self.denied_cents),
            "denial_rate" => FieldValue::Number(self.denial_rate),
            _ => FieldValue::Empty,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.code.as_str(), self.description.as_str()]
    }
}

pub const CLAIM_COLUMNS: &[Column<Claim>] = &[
    Column::new("claim_id", "Claim ID"),
    Column::new("patient_name", "Patient"),
    Column::new("practice_name", "Practice"),
    Column::new("date", "Date").rendered(|claim| format_short_date(claim.date.as_deref())),
    Column::new("billed", "Billed").right(),
    Column::new("paid", "Paid").right(),
    Column::new("status", "Status"),
];

pub const PRACTICE_CLAIM_COLUMNS: &[Column<Claim>] = &[
    Column::new("claim_id", "Claim ID"),
    Column::new("date", "Date").rendered(|claim| format_short_date(claim.date.as_deref())),
    Column::new("patient_name", "Patient"),
    Column::new("proc_code", "CPT"),
    Column::new("billed", "Billed").right(),
    Column::new("paid", "Paid").right(),
    Column::new("status", "Status"),
];

pub const PATIENT_COLUMNS: &[Column<Patient>] = &[
    Column::new("name", "Name"),
    Column::new("patient_id", "Patient ID"),
    Column::new("encounter_count", "Encounters").right(),
    Column::new("last_visit", "Last Visit")
        .rendered(|patient| format_short_date(patient.last_visit.as_deref())),
];

pub const ENCOUNTER_COLUMNS: &[Column<Encounter>] = &[
    Column::new("date", "Date")
        .rendered(|encounter| format_short_date(encounter.date.as_deref())),
    Column::new("patient_name", "Patient"),
    Column::new("provider_name", "Provider"),
    Column::new("kind", "Type"),
    Column::new("status", "Status"),
];

/// Remittance columns when every practice is in view.
pub const ERA_COLUMNS: &[Column<EraSummary>] = &[
    Column::new("id", "Report ID"),
    Column::new("date", "Received Date")
        .rendered(|era| format_short_date(era.received_date.as_deref())),
    Column::new("practice", "Practice"),
    Column::new("payer", "Payer"),
    Column::new("kind", "Type"),
    Column::new("total_billed", "Total Billed").right(),
    Column::new("total_paid", "Total Paid").right(),
    Column::new("claim_count", "# Claims").right(),
    Column::new("rejected", "Rejected").right(),
    Column::new("denied", "Denied").right(),
];

/// Remittance columns scoped to one practice; the practice column is redundant.
pub const PRACTICE_ERA_COLUMNS: &[Column<EraSummary>] = &[
    Column::new("id", "Report ID"),
    Column::new("date", "Received Date")
        .rendered(|era| format_short_date(era.received_date.as_deref())),
    Column::new("payer", "Payer"),
    Column::new("kind", "Type"),
    Column::new("total_billed", "Total Billed").right(),
    Column::new("total_paid", "Total Paid").right(),
    Column::new("claim_count", "# Claims").right(),
    Column::new("rejected", "Rejected").right(),
    Column::new("denied", "Denied").right(),
];

pub const PAYER_COLUMNS: &[Column<PayerPerformance>] = &[
    Column::new("name", "Payer"),
    Column::new("total_claims", "Claims").right(),
    Column::new("denied_count", "Denied").right(),
    Column::new("denied", "Denied $")
        .right()
        .rendered(|payer| format_currency(payer.denied_cents)),
    Column::new("denial_rate", "Denial Rate")
        .right()
        .rendered(|payer| format_percent_fraction(payer.denial_rate)),
];

pub const CPT_COLUMNS: &[Column<CptPerformance>] = &[
    Column::new("code", "CPT"),
    Column::new("description", "Description"),
    Column::new("volume", "Volume").right(),
    Column::new("value", "Value").right(),
    Column::new("denied", "Denied $").right(),
    Column::new("denial_rate", "Denial Rate")
        .right()
        .rendered(|cpt| format_percent_fraction(cpt.denial_rate)),
];

#[cfg(test)]
mod tests {
    use super::{CLAIM_COLUMNS, ERA_COLUMNS, NO_CLAIMS_MESSAGE, PAYER_COLUMNS};
    use crate::listview::{ListView, SortDirection, SortState};
    use crate::{Claim, EraId, EraSummary, PayerPerformance};

    fn claim(id: &str, patient: &str, billed_cents: i64, date: Option<&str>) -> Claim {
        Claim {
            claim_id: id.to_owned(),
            reference_id: None,
            date: date.map(str::to_owned),
            patient_name: patient.to_owned(),
            practice_name: "North Clinic".to_owned(),
            billed_cents,
            paid_cents: 0,
            status: "Paid".to_owned(),
            proc_code: "99213".to_owned(),
        }
    }

    fn ids(view: &ListView<Claim>) -> Vec<String> {
        view.derived()
            .iter()
            .map(|claim| claim.claim_id.clone())
            .collect()
    }

    #[test]
    fn claim_row_renders_expected_cells() {
        let record = claim("CLM001", "John Doe", 10_000, Some("2023-01-05"));
        let cells: Vec<String> = CLAIM_COLUMNS
            .iter()
            .map(|column| column.cell(&record))
            .collect();
        assert_eq!(cells[0], "CLM001");
        assert_eq!(cells[1], "John Doe");
        assert_eq!(cells[3], "01/05/23");
        assert_eq!(cells[4], "$100.00");
        assert_eq!(cells[6], "Paid");
    }

    #[test]
    fn claims_sort_by_date_and_amount() {
        let mut view = ListView::new(CLAIM_COLUMNS, 10, NO_CLAIMS_MESSAGE)
            .with_sort(SortState::by("date", SortDirection::Desc));
        view.set_records(vec![
            claim("A", "x", 500, Some("2023-01-01")),
            claim("B", "y", 100, Some("2023-03-01")),
            claim("C", "z", 900, None),
        ]);
        assert_eq!(ids(&view), vec!["B", "A", "C"]);

        view.toggle_sort("billed");
        assert_eq!(ids(&view), vec!["C", "A", "B"]);
    }

    #[test]
    fn claim_search_matches_patient_name() {
        let mut view = ListView::new(CLAIM_COLUMNS, 10, NO_CLAIMS_MESSAGE);
        view.set_records(vec![
            claim("A", "John Doe", 1, None),
            claim("B", "Jane Roe", 1, None),
        ]);
        view.set_search("doe");
        assert_eq!(view.derived().len(), 1);
        assert_eq!(view.empty_message(), "No claims found.");
    }

    #[test]
    fn era_and_payer_cells() {
        let era = EraSummary {
            id: EraId::new("ERA-1"),
            received_date: Some("2024-02-10".to_owned()),
            payer: "Aetna".to_owned(),
            check_number: "CHK1".to_owned(),
            total_paid_cents: 123_456,
            total_billed_cents: 200_000,
            practice: "North".to_owned(),
            claim_count: 4,
            denied_count: 1,
            rejected_count: 0,
            denial_reasons: String::new(),
            status: "processed".to_owned(),
            kind: "payment".to_owned(),
        };
        assert_eq!(ERA_COLUMNS[1].cell(&era), "02/10/24");
        assert_eq!(ERA_COLUMNS[6].cell(&era), "$1,234.56");
        assert_eq!(ERA_COLUMNS[7].cell(&era), "4");

        let payer = PayerPerformance {
            name: "Aetna".to_owned(),
            total_claims: 10,
            denied_count: 2,
            denied_cents: 5_000,
            denial_rate: 0.2,
        };
        assert_eq!(PAYER_COLUMNS[4].cell(&payer), "20.0%");
    }
}
