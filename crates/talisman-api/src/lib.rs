// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod wire;

use anyhow::{Context, Result, anyhow, bail};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use talisman_app::*;
use tracing::{debug, warn};
use url::Url;

use crate::wire::*;

pub const MIN_SEARCH_LEN: usize = 2;

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    timeout: Duration,
    report_timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration, report_timeout: Duration) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            bail!("api.base_url must not be empty");
        }
        let base_url =
            Url::parse(trimmed).with_context(|| format!("parse api.base_url {trimmed:?}"))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            bail!("api.base_url must be an http(s) URL, got {trimmed:?}");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            report_timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn report_timeout(&self) -> Duration {
        self.report_timeout
    }

    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("base URL {} cannot carry a path", self.base_url()))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<T> {
        self.get_json_with_timeout(url, what, self.timeout)
    }

    fn get_json_with_timeout<T: DeserializeOwned>(
        &self,
        url: Url,
        what: &str,
        timeout: Duration,
    ) -> Result<T> {
        debug!(%url, "GET {what}");
        let response = self
            .http
            .get(url)
            .timeout(timeout)
            .send()
            .map_err(|error| connection_error(self.base_url(), error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        response.json().with_context(|| format!("decode {what}"))
    }

    pub fn ping(&self) -> Result<()> {
        let url = self.endpoint(&["api", "health"], &[])?;
        let health: HealthResponse = self.get_json(url, "health check")?;
        if health.status != "healthy" {
            bail!(
                "analytics API at {} reports status {:?}",
                self.base_url(),
                health.status
            );
        }
        Ok(())
    }

    pub fn list_practices(&self) -> Result<Vec<Practice>> {
        let url = self.endpoint(&["api", "practices", "list"], &[])?;
        let rows: Vec<PracticeWire> = self.get_json(url, "practice list")?;
        Ok(rows.into_iter().map(Practice::from).collect())
    }

    pub fn practice_patients(&self, practice: &PracticeId) -> Result<Vec<Patient>> {
        let url = self.endpoint(&["api", "practices", practice.as_str(), "patients"], &[])?;
        let rows: Vec<PatientWire> = self.get_json(url, "patients")?;
        Ok(rows.into_iter().map(Patient::from).collect())
    }

    pub fn practice_encounters(&self, practice: &PracticeId) -> Result<Vec<Encounter>> {
        let url = self.endpoint(&["api", "practices", practice.as_str(), "encounters"], &[])?;
        let rows: Vec<EncounterWire> = self.get_json(url, "encounters")?;
        Ok(rows.into_iter().map(Encounter::from).collect())
    }

    pub fn practice_claims(&self, practice: &PracticeId, paid_only: bool) -> Result<Vec<Claim>> {
        let url = self.endpoint(
            &["api", "practices", practice.as_str(), "claims"],
            &[("paid_only", paid_only.to_string())],
        )?;
        let rows: Vec<ClaimWire> = self.get_json(url, "practice claims")?;
        Ok(rows.into_iter().map(Claim::from).collect())
    }

    pub fn list_claims(&self) -> Result<Vec<Claim>> {
        let url = self.endpoint(&["api", "claims", "list"], &[])?;
        let rows: Vec<ClaimWire> = self.get_json(url, "claims")?;
        Ok(rows.into_iter().map(Claim::from).collect())
    }

    pub fn practice_financial_metrics(&self, practice: &PracticeId) -> Result<FinancialMetrics> {
        let url = self.endpoint(
            &["api", "practices", practice.as_str(), "financial-metrics"],
            &[],
        )?;
        let wire: FinancialMetricsWire = self.get_json(url, "financial metrics")?;
        Ok(wire.into())
    }

    pub fn list_eras(&self, query: &EraQuery) -> Result<Vec<EraSummary>> {
        let mut params = vec![
            ("page", query.page.to_string()),
            ("page_size", query.page_size.to_string()),
            ("sort_by", query.sort_key().to_owned()),
            ("order", query.sort.direction.as_str().to_owned()),
            ("hide_informational", query.hide_informational.to_string()),
            ("show_rejections", query.show_rejections.to_string()),
            ("show_denials", query.show_denials.to_string()),
        ];
        if let Some(practice) = &query.practice {
            params.push(("practice_guid", practice.as_str().to_owned()));
        }
        let search = query.search.trim();
        if !search.is_empty() {
            params.push(("search", search.to_owned()));
        }
        let url = self.endpoint(&["api", "eras", "list"], &params)?;
        let rows: Vec<EraSummaryWire> = self.get_json(url, "remittances")?;
        Ok(rows.into_iter().map(EraSummary::from).collect())
    }

    pub fn era_detail(&self, id: &EraId) -> Result<EraDetail> {
        let url = self.endpoint(&["api", "eras", id.as_str(), "details"], &[])?;
        let wire: EraDetailWire = self.get_json(url, "remittance detail")?;
        Ok(wire.into())
    }

    pub fn patient_detail(&self, id: &PatientId) -> Result<PatientDetail> {
        let url = self.endpoint(&["api", "patients", id.as_str(), "details"], &[])?;
        let wire: PatientDetailWire = self.get_json(url, "patient detail")?;
        Ok(wire.into())
    }

    pub fn encounter_detail(&self, id: &EncounterId) -> Result<EncounterDetail> {
        let url = self.endpoint(&["api", "encounters", id.as_str(), "details"], &[])?;
        let wire: EncounterDetailWire = self.get_json(url, "encounter detail")?;
        Ok(wire.into())
    }

    pub fn claim_detail(&self, id: &ClaimId) -> Result<ClaimDetail> {
        let url = self.endpoint(&["api", "claims", id.as_str(), "details"], &[])?;
        let wire: ClaimDetailWire = self.get_json(url, "claim detail")?;
        Ok(wire.into_detail(id.clone()))
    }

    pub fn dashboard_metrics(&self) -> Result<DashboardMetrics> {
        let url = self.endpoint(&["api", "dashboard", "metrics"], &[])?;
        let wire: DashboardMetricsWire = self.get_json(url, "dashboard metrics")?;
        Ok(wire.into())
    }

    pub fn recent_activity(&self) -> Result<Vec<ActivityPoint>> {
        let url = self.endpoint(&["api", "dashboard", "recent-activity"], &[])?;
        let rows: Vec<ActivityWire> = self.get_json(url, "recent activity")?;
        Ok(rows.into_iter().map(ActivityPoint::from).collect())
    }

    pub fn dashboard(&self) -> Result<DashboardSnapshot> {
        Ok(DashboardSnapshot {
            metrics: self.dashboard_metrics()?,
            activity: self.recent_activity()?,
        })
    }

    fn analytics_url(
        &self,
        practice: Option<&PracticeId>,
        leaf: &str,
        days_back: u32,
    ) -> Result<Url> {
        let query = [("days_back", days_back.to_string())];
        match practice {
            Some(practice) => self.endpoint(
                &["api", "v1", "analytics", "practice", practice.as_str(), leaf],
                &query,
            ),
            None => self.endpoint(&["api", "v1", "analytics", "global", leaf], &query),
        }
    }

    /// The performance summary is required; the payer, CPT and action-item
    /// sections degrade to empty lists when their endpoints fail.
    pub fn analytics(
        &self,
        practice: Option<&PracticeId>,
        days_back: u32,
    ) -> Result<AnalyticsSnapshot> {
        let summary: SummaryWire = self.get_json(
            self.analytics_url(practice, "performance-summary", days_back)?,
            "performance summary",
        )?;

        let payers = self
            .optional_section::<Vec<PayerWire>>(practice, "payer-performance", days_back)
            .unwrap_or_default();
        let cpts = self
            .optional_section::<Vec<CptWire>>(practice, "cpt-performance", days_back)
            .unwrap_or_default();
        let actions = self
            .optional_section::<ActionItemsWire>(practice, "action-items", days_back)
            .map(ActionItemsWire::into_items)
            .unwrap_or_default();

        Ok(AnalyticsSnapshot {
            summary: summary.into(),
            payers: payers.into_iter().map(PayerPerformance::from).collect(),
            cpts: cpts.into_iter().map(CptPerformance::from).collect(),
            actions,
        })
    }

    fn optional_section<T: DeserializeOwned>(
        &self,
        practice: Option<&PracticeId>,
        leaf: &str,
        days_back: u32,
    ) -> Option<T> {
        let result = self
            .analytics_url(practice, leaf, days_back)
            .and_then(|url| self.get_json(url, leaf));
        match result {
            Ok(section) => Some(section),
            Err(error) => {
                warn!(section = leaf, error = %format!("{error:#}"), "analytics section unavailable");
                None
            }
        }
    }

    /// Global search. Queries shorter than two characters short-circuit to no
    /// results without touching the network.
    pub fn search(&self, query: &str, kind: Option<SearchKind>) -> Result<Vec<SearchResult>> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_LEN {
            return Ok(Vec::new());
        }
        let mut params = vec![("q", query.to_owned())];
        if let Some(kind) = kind {
            params.push(("type", kind.as_str().to_owned()));
        }
        let url = self.endpoint(&["api", "search", ""], &params)?;
        let rows: Vec<SearchResultWire> = self.get_json(url, "search results")?;
        Ok(rows
            .into_iter()
            .filter_map(SearchResultWire::into_result)
            .collect())
    }

    /// Generates the practice insights report. Uses the longer report timeout
    /// because the server builds it on demand.
    pub fn insights_markdown(&self, practice: &PracticeId, days_back: u32) -> Result<String> {
        let url = self.endpoint(
            &[
                "api",
                "v1",
                "reports",
                "practice",
                practice.as_str(),
                "insights",
                "markdown",
            ],
            &[("days_back", days_back.to_string())],
        )?;
        let report: MarkdownWire =
            self.get_json_with_timeout(url, "insights report", self.report_timeout)?;
        if report.markdown.trim().is_empty() {
            bail!("insights report for practice {practice} is empty");
        }
        Ok(report.markdown)
    }

    pub fn execute(&self, request: &FetchRequest) -> Result<FetchPayload> {
        Ok(match request {
            FetchRequest::Practices => FetchPayload::Practices(self.list_practices()?),
            FetchRequest::Dashboard => FetchPayload::Dashboard(self.dashboard()?),
            FetchRequest::Claims => FetchPayload::Claims(self.list_claims()?),
            FetchRequest::PracticePatients(practice) => {
                FetchPayload::Patients(self.practice_patients(practice)?)
            }
            FetchRequest::PracticeEncounters(practice) => {
                FetchPayload::Encounters(self.practice_encounters(practice)?)
            }
            FetchRequest::PracticeClaims {
                practice,
                paid_only,
            } => FetchPayload::PracticeClaims(self.practice_claims(practice, *paid_only)?),
            FetchRequest::FinancialMetrics(practice) => {
                FetchPayload::Financial(self.practice_financial_metrics(practice)?)
            }
            FetchRequest::Eras(query) => FetchPayload::Eras(self.list_eras(query)?),
            FetchRequest::EraDetail(id) => FetchPayload::EraDetail(self.era_detail(id)?),
            FetchRequest::PatientDetail(id) => {
                FetchPayload::PatientDetail(self.patient_detail(id)?)
            }
            FetchRequest::EncounterDetail(id) => {
                FetchPayload::EncounterDetail(self.encounter_detail(id)?)
            }
            FetchRequest::ClaimDetail(id) => FetchPayload::ClaimDetail(self.claim_detail(id)?),
            FetchRequest::Analytics {
                practice,
                days_back,
            } => FetchPayload::Analytics(self.analytics(practice.as_ref(), *days_back)?),
            FetchRequest::Search { query, kind } => {
                FetchPayload::Search(self.search(query, *kind)?)
            }
        })
    }
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    #[serde(default)]
    status: String,
}

/// FastAPI reports failures as `{"detail": "..."}` or, for validation
/// errors, `{"detail": [{"msg": "..."}]}`.
#[derive(Debug, Deserialize)]
struct FastApiErrorEnvelope {
    detail: Option<serde_json::Value>,
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!("request to {base_url} timed out ({error})");
    }
    anyhow!("cannot reach {base_url} -- is the analytics API running? ({error})")
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<FastApiErrorEnvelope>(body)
        && let Some(detail) = parsed.detail
        && let Some(message) = detail_message(&detail)
    {
        return anyhow!("server error ({}): {}", status.as_u16(), message);
    }

    if !body.is_empty() && body.len() < 100 && !body.contains('{') {
        return anyhow!("server error ({}): {}", status.as_u16(), body.trim());
    }

    anyhow!("server returned {}", status.as_u16())
}

fn detail_message(detail: &serde_json::Value) -> Option<String> {
    match detail {
        serde_json::Value::String(message) if !message.is_empty() => Some(message.clone()),
        serde_json::Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{Client, clean_error_response};
    use reqwest::StatusCode;
    use std::time::Duration;
    use talisman_app::{EraQuery, PracticeId};

    fn client(base: &str) -> Client {
        Client::new(base, Duration::from_secs(1), Duration::from_secs(5))
            .expect("client should initialize")
    }

    #[test]
    fn rejects_empty_and_non_http_base_urls() {
        let timeout = Duration::from_secs(1);
        assert!(Client::new("  ", timeout, timeout).is_err());
        assert!(Client::new("ftp://example.com", timeout, timeout).is_err());
        assert!(Client::new("not a url", timeout, timeout).is_err());
    }

    #[test]
    fn endpoint_joins_segments_under_base_path() {
        let client = client("http://localhost:8000/");
        let url = client
            .endpoint(&["api", "practices", "a b", "claims"], &[("paid_only", "true".to_owned())])
            .expect("url");
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/practices/a%20b/claims?paid_only=true"
        );

        let prefixed = super::Client::new(
            "http://host/proxy/",
            Duration::from_secs(1),
            Duration::from_secs(1),
        )
        .expect("client");
        let url = prefixed.endpoint(&["api", "search", ""], &[]).expect("url");
        assert_eq!(url.as_str(), "http://host/proxy/api/search/");
        assert_eq!(prefixed.base_url(), "http://host/proxy");
    }

    #[test]
    fn analytics_scope_switches_between_global_and_practice() {
        let client = client("http://localhost:8000");
        let global = client
            .analytics_url(None, "performance-summary", 90)
            .expect("url");
        assert_eq!(
            global.as_str(),
            "http://localhost:8000/api/v1/analytics/global/performance-summary?days_back=90"
        );
        let practice = PracticeId::new("p1");
        let scoped = client
            .analytics_url(Some(&practice), "action-items", 30)
            .expect("url");
        assert_eq!(
            scoped.as_str(),
            "http://localhost:8000/api/v1/analytics/practice/p1/action-items?days_back=30"
        );
    }

    #[test]
    fn short_search_queries_skip_the_network() {
        let client = client("http://127.0.0.1:1");
        assert!(client.search(" a ", None).expect("no request").is_empty());
    }

    #[test]
    fn clean_error_response_prefers_fastapi_detail() {
        let error = clean_error_response(
            StatusCode::NOT_FOUND,
            r#"{"detail": "ERA report not found"}"#,
        );
        assert_eq!(error.to_string(), "server error (404): ERA report not found");

        let error = clean_error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail": [{"msg": "field required"}, {"msg": "bad page"}]}"#,
        );
        assert_eq!(
            error.to_string(),
            "server error (422): field required; bad page"
        );

        let error = clean_error_response(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(error.to_string(), "server error (502): upstream down");

        let error = clean_error_response(StatusCode::INTERNAL_SERVER_ERROR, "{\"oops\": 1}");
        assert_eq!(error.to_string(), "server returned 500");
    }

    #[test]
    fn era_query_defaults_are_sent_to_the_server() {
        let query = EraQuery::default();
        assert_eq!(query.sort_key(), "date");
        assert_eq!(query.sort.direction.as_str(), "desc");
    }
}
