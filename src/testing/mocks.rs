//! Mock implementations of the source and transport seams for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::Arc;

use serde_json::Value;

use crate::sources::context::{RawResponse, RequestSpec, Transport};
use crate::sources::{FieldMap, Source, SourceResult};

/// Mock source returning scripted results.
pub struct MockSource {
    pub name: &'static str,
    pub labels: &'static [&'static str],
    results: RefCell<VecDeque<SourceResult>>,
    fallback: SourceResult,
    pub calls: RefCell<Vec<String>>,
}

impl MockSource {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            labels: &[],
            results: RefCell::new(VecDeque::new()),
            fallback: SourceResult::failure("Mock failure"),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Every call succeeds with the given fields.
    pub fn with_success(self, data: FieldMap) -> Self {
        Self {
            fallback: SourceResult::success(data),
            ..self
        }
    }

    /// Every call fails with the given message.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        Self {
            fallback: SourceResult::failure(message),
            ..self
        }
    }

    /// Script one result per call, falling back afterwards.
    pub fn with_results(self, results: Vec<SourceResult>) -> Self {
        Self {
            results: RefCell::new(results.into()),
            ..self
        }
    }

    /// Identifiers this source was called with, in order.
    pub fn recorded_calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Source for MockSource {
    fn name(&self) -> &'static str {
        self.name
    }

    fn valid_labels(&self) -> &'static [&'static str] {
        self.labels
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
pub struct MockTransport {
    routes: Vec<(String, RawResponse)>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Answer requests whose URL contains `fragment` with the response.
    pub fn with_response(mut self, fragment: impl Into<String>, response: RawResponse) -> Self {
        self.routes.push((fragment.into(), response));
        self
    }

    /// Shorthand for a 200 JSON response.
    pub fn with_json(self, fragment: impl Into<String>, body: Value) -> Self {
        self.with_response(fragment, RawResponse::new(200, body.to_string()))
    }

    pub fn with_status(self, fragment: impl Into<String>, status: u16) -> Self {
        self.with_response(fragment, RawResponse::new(status, ""))
    }

    pub fn into_arc(self) -> Arc<dyn Transport> {
        Arc::new(self)
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockTransport {
    fn execute(&self, spec: &RequestSpec) -> RawResponse {
        self.routes
            .iter()
            .find(|(fragment, _)| spec.url.contains(fragment.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| RawResponse::synthetic("no mock response configured"))
    }
}
