// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use std::sync::mpsc::Sender;
use std::thread;
use talisman_api::Client;
use talisman_app::{FetchPayload, FetchRequest};
use talisman_testkit::DemoData;
use talisman_tui::{AppRuntime, InternalEvent};

/// Serves the UI from the analytics API, one worker thread per request so a
/// slow endpoint never blocks input.
pub struct ApiRuntime {
    client: Client,
}

impl ApiRuntime {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl AppRuntime for ApiRuntime {
    fn fetch(&mut self, request: &FetchRequest) -> Result<FetchPayload> {
        self.client.execute(request)
    }

    fn spawn_fetch(
        &mut self,
        request_id: u64,
        request: FetchRequest,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let client = self.client.clone();
        thread::Builder::new()
            .name(format!("fetch-{}", request.describe()))
            .spawn(move || {
                let result = client
                    .execute(&request)
                    .map_err(|error| format!("{error:#}"));
                let _ = tx.send(InternalEvent::Fetched {
                    request_id,
                    request,
                    result,
                });
            })?;
        Ok(())
    }
}

/// Offline fixture data for `--demo`; answers synchronously.
pub struct DemoRuntime {
    data: DemoData,
}

impl DemoRuntime {
    pub fn new(seed: u64) -> Self {
        Self {
            data: DemoData::generate(seed),
        }
    }
}

impl AppRuntime for DemoRuntime {
    fn fetch(&mut self, request: &FetchRequest) -> Result<FetchPayload> {
        self.data.answer(request)
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiRuntime, DemoRuntime};
    use anyhow::Result;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;
    use talisman_api::Client;
    use talisman_app::{FetchPayload, FetchRequest};
    use talisman_tui::{AppRuntime, InternalEvent};
    use tiny_http::{Header, Response, Server};

    #[test]
    fn demo_runtime_answers_practice_list() -> Result<()> {
        let mut runtime = DemoRuntime::new(7);
        let FetchPayload::Practices(practices) = runtime.fetch(&FetchRequest::Practices)? else {
            panic!("expected practices payload");
        };
        assert!(!practices.is_empty());
        Ok(())
    }

    #[test]
    fn demo_runtime_default_spawn_posts_result() -> Result<()> {
        let mut runtime = DemoRuntime::new(7);
        let (tx, rx) = mpsc::channel();
        runtime.spawn_fetch(3, FetchRequest::Claims, tx)?;
        let InternalEvent::Fetched {
            request_id, result, ..
        } = rx.try_recv()?
        else {
            panic!("expected fetched event");
        };
        assert_eq!(request_id, 3);
        assert!(matches!(result, Ok(FetchPayload::Claims(rows)) if !rows.is_empty()));
        Ok(())
    }

    #[test]
    fn api_runtime_posts_worker_result_over_channel() -> Result<()> {
        let server = Server::http("127.0.0.1:0")
            .map_err(|error| anyhow::anyhow!("start mock server: {error}"))?;
        let addr = format!("http://{}", server.server_addr());
        let handle = thread::spawn(move || {
            let request = server.recv().expect("request expected");
            assert_eq!(request.url(), "/api/claims/list");
            let response = Response::from_string("[]").with_header(
                Header::from_bytes("Content-Type", "application/json")
                    .expect("valid content type header"),
            );
            request.respond(response).expect("response should succeed");
        });

        let client = Client::new(&addr, Duration::from_secs(1), Duration::from_secs(1))?;
        let mut runtime = ApiRuntime::new(client);
        let (tx, rx) = mpsc::channel();
        runtime.spawn_fetch(9, FetchRequest::Claims, tx)?;

        let event = rx.recv_timeout(Duration::from_secs(5))?;
        assert_eq!(
            event,
            InternalEvent::Fetched {
                request_id: 9,
                request: FetchRequest::Claims,
                result: Ok(FetchPayload::Claims(Vec::new())),
            }
        );
        handle.join().expect("server thread should join");
        Ok(())
    }

    #[test]
    fn api_runtime_reports_unreachable_server_as_message() -> Result<()> {
        let client = Client::new(
            "http://127.0.0.1:1",
            Duration::from_millis(50),
            Duration::from_millis(50),
        )?;
        let mut runtime = ApiRuntime::new(client);
        let (tx, rx) = mpsc::channel();
        runtime.spawn_fetch(1, FetchRequest::Dashboard, tx)?;

        let InternalEvent::Fetched { result, .. } = rx.recv_timeout(Duration::from_secs(5))? else {
            panic!("expected fetched event");
        };
        let message = result.expect_err("unreachable server should fail");
        assert!(message.contains("cannot reach http://127.0.0.1:1"), "{message}");
        Ok(())
    }
}
