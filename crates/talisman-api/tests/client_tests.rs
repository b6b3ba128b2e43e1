// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use std::thread;
use std::time::Duration;
use talisman_api::Client;
use talisman_app::listview::{SortDirection, SortState};
use talisman_app::{EraId, EraQuery, FetchPayload, FetchRequest, PracticeId};
use tiny_http::{Header, Response, Server};

fn json_response(body: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body)
        .with_status_code(200)
        .with_header(
            Header::from_bytes("Content-Type", "application/json")
                .expect("valid content type header"),
        )
}

fn mock_server() -> Result<(Server, String)> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());
    Ok((server, addr))
}

#[test]
fn unreachable_server_error_names_the_api() {
    let client = Client::new(
        "http://127.0.0.1:1",
        Duration::from_millis(50),
        Duration::from_millis(50),
    )
    .expect("client should initialize");

    let error = client
        .ping()
        .expect_err("ping should fail for unreachable endpoint");
    let message = format!("{error:#}");
    assert!(
        message.contains("http://127.0.0.1:1"),
        "unexpected message: {message}"
    );
}

#[test]
fn ping_reads_health_status() -> Result<()> {
    let (server, addr) = mock_server()?;
    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/api/health");
        request
            .respond(json_response(r#"{"status":"healthy"}"#))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1), Duration::from_secs(1))?;
    client.ping()?;

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn claims_list_is_normalized_to_cents() -> Result<()> {
    let (server, addr) = mock_server()?;
    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/api/claims/list");
        let body = r#"[{"claimId":"CLM001","patientName":"John Doe","practiceName":"North",
                        "date":"2023-01-05","billed":100,"paid":80.25,"status":"Paid"}]"#;
        request
            .respond(json_response(body))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1), Duration::from_secs(1))?;
    let claims = client.list_claims()?;
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0].claim_id, "CLM001");
    assert_eq!(claims[0].billed_cents, 10_000);
    assert_eq!(claims[0].paid_cents, 8_025);
    assert_eq!(claims[0].date.as_deref(), Some("2023-01-05"));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn era_list_sends_paging_sort_and_filters() -> Result<()> {
    let (server, addr) = mock_server()?;
    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        let url = request.url().to_owned();
        assert!(url.starts_with("/api/eras/list?"), "unexpected url {url}");
        for expected in [
            "page=2",
            "page_size=20",
            "sort_by=payer",
            "order=asc",
            "practice_guid=p1",
            "show_denials=true",
            "hide_informational=false",
            "search=aetna",
        ] {
            assert!(url.contains(expected), "{url} missing {expected}");
        }
        request
            .respond(json_response(
                r#"[{"id":11,"receivedDate":"N/A","payer":"Aetna","totalPaid":1.5,"claimCount":2}]"#,
            ))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1), Duration::from_secs(1))?;
    let query = EraQuery {
        page: 2,
        sort: SortState::by("payer", SortDirection::Asc),
        practice: Some(PracticeId::new("p1")),
        show_denials: true,
        search: "aetna".to_owned(),
        ..EraQuery::default()
    };
    let rows = client.list_eras(&query)?;
    assert_eq!(rows[0].id, EraId::new("11"));
    assert_eq!(rows[0].received_date, None);
    assert_eq!(rows[0].total_paid_cents, 150);
    assert_eq!(rows[0].claim_count, 2);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn not_found_detail_is_surfaced() -> Result<()> {
    let (server, addr) = mock_server()?;
    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/api/eras/ERA-404/details");
        request
            .respond(json_response(r#"{"detail":"ERA report not found"}"#).with_status_code(404))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1), Duration::from_secs(1))?;
    let error = client
        .era_detail(&EraId::new("ERA-404"))
        .expect_err("missing ERA should fail");
    assert_eq!(error.to_string(), "server error (404): ERA report not found");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn analytics_degrades_optional_sections() -> Result<()> {
    let (server, addr) = mock_server()?;
    let handle = thread::spawn(move || {
        for _ in 0..4 {
            let request = server.recv().expect("request expected");
            let url = request.url().to_owned();
            assert!(url.starts_with("/api/v1/analytics/global/"), "{url}");
            let response = if url.contains("performance-summary") {
                json_response(
                    r#"{"practice_name":"All Practices (Executive Summary)","total_claims":10,
                        "denial_rate":0.1,"denied_amount":250,"recovery_potential":200}"#,
                )
            } else if url.contains("payer-performance") {
                json_response(r#"[{"name":"Aetna","total_claims":5,"denied_count":1,"rate":20.0}]"#)
            } else if url.contains("cpt-performance") {
                json_response(r#"{"detail":"boom"}"#).with_status_code(500)
            } else {
                json_response(r#"{"action_items":[{"priority":"HIGH","title":"Fix Aetna"}]}"#)
            };
            request.respond(response).expect("response should succeed");
        }
    });

    let client = Client::new(&addr, Duration::from_secs(1), Duration::from_secs(1))?;
    let payload = client.execute(&FetchRequest::Analytics {
        practice: None,
        days_back: 90,
    })?;
    let FetchPayload::Analytics(snapshot) = payload else {
        panic!("expected analytics payload");
    };
    assert_eq!(snapshot.summary.total_claims, 10);
    assert_eq!(snapshot.summary.denied_cents, 25_000);
    assert_eq!(snapshot.payers.len(), 1);
    assert!((snapshot.payers[0].denial_rate - 0.2).abs() < 1e-9);
    assert!(snapshot.cpts.is_empty());
    assert_eq!(snapshot.actions[0].title, "Fix Aetna");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn insights_report_returns_markdown() -> Result<()> {
    let (server, addr) = mock_server()?;
    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(
            request.url(),
            "/api/v1/reports/practice/p1/insights/markdown?days_back=30"
        );
        request
            .respond(json_response(r##"{"markdown":"# Practice Performance Insights"}"##))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1), Duration::from_secs(5))?;
    let report = client.insights_markdown(&PracticeId::new("p1"), 30)?;
    assert!(report.starts_with("# Practice Performance Insights"));

    handle.join().expect("server thread should join");
    Ok(())
}
