// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Claim Adjustment Reason Codes (CARC) and Remittance Advice Remark Codes
//! (RARC) seen on remittances.

pub const UNKNOWN_CODE: &str = "Unknown Code";

const CARC_CODES: [(&str, &str); 12] = [
    ("1", "Deductible Amount"),
    ("2", "Coinsurance Amount"),
    ("3", "Co-payment Amount"),
    (
        "45",
        "Charge exceeds fee schedule/maximum allowable or contracted/legislated fee arrangement",
    ),
    ("96", "Non-covered charge(s)"),
    (
        "97",
        "The benefit for this service is included in the payment/allowance for another service/procedure that has already been adjudicated",
    ),
    (
        "16",
        "Claim/service lacks information or has submission/billing error(s)",
    ),
    ("18", "Duplicate claim/service"),
    ("29", "The time limit for filing has expired"),
    (
        "22",
        "This care may be covered by another payer per coordination of benefits",
    ),
    (
        "109",
        "Claim not covered by this payer/contractor. You must send the claim to the correct payer/contractor",
    ),
    ("27", "Expenses incurred after coverage terminated"),
];

const RARC_CODES: [(&str, &str); 5] = [
    (
        "N1",
        "Alert: You may appeal this decision in writing within the duration specified globally",
    ),
    ("M15", "Separately billed services/tests have been bundled"),
    (
        "M25",
        "This service is not covered when performed by this provider",
    ),
    ("N365", "This procedure code is not payable"),
    (
        "MA130",
        "Your claim contains incomplete and/or invalid information, and no appeal rights are afforded because the claim is unprocessable",
    ),
];

fn lookup(table: &[(&str, &'static str)], code: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == code)
        .map(|(_, description)| *description)
}

/// Resolves `GROUP-CODE` (for example `CO-45`) or a bare code to its
/// description. CARC wins over RARC; an empty code resolves to an empty string.
pub fn adjustment_description(code: &str) -> &'static str {
    let code = code.trim();
    if code.is_empty() {
        return "";
    }
    let reason = match code.split_once('-') {
        Some((_, reason)) if !reason.is_empty() => reason,
        _ => code,
    };
    lookup(&CARC_CODES, reason)
        .or_else(|| lookup(&RARC_CODES, reason))
        .unwrap_or(UNKNOWN_CODE)
}

#[cfg(test)]
mod tests {
    use super::{UNKNOWN_CODE, adjustment_description};

    #[test]
    fn grouped_carc_code_resolves() {
        assert_eq!(
            adjustment_description("CO-45"),
            "Charge exceeds fee schedule/maximum allowable or contracted/legislated fee arrangement"
        );
        assert_eq!(adjustment_description("PR-1"), "Deductible Amount");
    }

    #[test]
    fn bare_codes_resolve_from_either_table() {
        assert_eq!(adjustment_description("96"), "Non-covered charge(s)");
        assert_eq!(
            adjustment_description("M15"),
            "Separately billed services/tests have been bundled"
        );
    }

    #[test]
    fn unknown_and_empty_codes() {
        assert_eq!(adjustment_description("XX-999"), UNKNOWN_CODE);
        assert_eq!(adjustment_description("XX-999"), "Unknown Code");
        assert_eq!(adjustment_description(""), "");
    }
}
