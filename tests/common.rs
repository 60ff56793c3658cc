//! Shared helpers for integration tests: mock sources, mock transports,
//! and collector factories.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;

use serde_json::{json, Value};

use game_insights::sources::context::{RawResponse, RequestSpec, Transport};
use game_insights::sources::{FieldMap, Source, SourceResult};
use game_insights::{Collector, CollectorOptions, SourceBinding};

/// Call log shared between a stub source and the test that owns it.
pub type CallLog = Rc<RefCell<Vec<String>>>;

/// Mock source returning scripted results.
pub struct StubSource {
    name: &'static str,
    results: RefCell<VecDeque<SourceResult>>,
    fallback: SourceResult,
    calls: CallLog,
}

impl StubSource {
    pub fn succeeding(name: &'static str, data: FieldMap) -> Self {
        Self {
            name,
            results: RefCell::new(VecDeque::new()),
            fallback: SourceResult::success(data),
            calls: CallLog::default(),
        }
    }

    pub fn failing(name: &'static str, message: &str) -> Self {
        Self {
            name,
            results: RefCell::new(VecDeque::new()),
            fallback: SourceResult::failure(message),
            calls: CallLog::default(),
        }
    }

    /// One scripted result per call, then the fallback.
    pub fn scripted(
        name: &'static str,
        results: Vec<SourceResult>,
        fallback: SourceResult,
    ) -> Self {
        Self {
            name,
            results: RefCell::new(results.into()),
            fallback,
            calls: CallLog::default(),
        }
    }

    /// Handle onto the identifiers this source gets called with; grab it
    /// before boxing the source into a binding.
    pub fn call_log(&self) -> CallLog {
        Rc::clone(&self.calls)
    }
}

impl Source for StubSource {
    fn name(&self) -> &'static str {
        self.name
    }

    fn valid_labels(&self) -> &'static [&'static str] {
        &[]
    }

    fn fetch(&self, identifier: &str, _selected_labels: Option<&[&str]>) -> SourceResult {
        self.calls.borrow_mut().push(identifier.to_string());
        self.results
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// Mock transport answering by URL substring match.
pub struct StubTransport {
    routes: Vec<(String, RawResponse)>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    pub fn with_response(mut self, fragment: &str, response: RawResponse) -> Self {
        self.routes.push((fragment.to_string(), response));
        self
    }

    pub fn with_json(self, fragment: &str, body: Value) -> Self {
        self.with_response(fragment, RawResponse::new(200, body.to_string()))
    }

    pub fn with_body(self, fragment: &str, status: u16, body: &str) -> Self {
        self.with_response(fragment, RawResponse::new(status, body))
    }

    pub fn into_arc(self) -> Arc<dyn Transport> {
        Arc::new(self)
    }
}

impl Transport for StubTransport {
    fn execute(&self, spec: &RequestSpec) -> RawResponse {
        self.routes
            .iter()
            .find(|(fragment, _)| spec.url.contains(fragment.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| RawResponse::synthetic("no mock response configured"))
    }
}

/// Field map builder from (key, value) pairs.
pub fn fields(pairs: &[(&str, Value)]) -> FieldMap {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

/// A primary source succeeding with a basic store record.
pub fn primary_success() -> SourceBinding {
    SourceBinding::primary(
        Box::new(StubSource::succeeding(
            "SteamStore",
            fields(&[
                ("steam_appid", json!("12345")),
                ("name", json!("Mock Game")),
                ("price_final", json!(12.34)),
            ]),
        )),
        &["steam_appid", "name", "price_final"],
    )
}

/// Collector over the given bindings, with default options.
pub fn collector_with(
    id_sources: Vec<SourceBinding>,
    name_sources: Vec<SourceBinding>,
) -> Collector {
    Collector::with_sources(CollectorOptions::default(), id_sources, name_sources)
}
