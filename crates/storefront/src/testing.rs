//! Test doubles for the API gateway.
//!
//! [`FakeGateway`] answers from scripted replies and records every request,
//! so tests can assert exactly which calls a flow issued (and which it did
//! not). Replies can be delayed to simulate slow responses; with a paused
//! Tokio clock the delays are deterministic.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde_json::Value;

use crate::api::{ApiError, ApiRequest, Gateway, Method, interpret_response};

/// A request as seen by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

#[derive(Debug, Clone)]
struct Reply {
    result: Result<Option<Value>, ApiError>,
    delay: Duration,
}

/// Scripted in-memory gateway.
///
/// Replies are matched on the exact path first, then on the path without
/// its query string. A route keeps answering with its last reply once the
/// queue is down to one entry. Unmatched requests get a 404.
#[derive(Debug, Default)]
pub struct FakeGateway {
    routes: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    log: Mutex<Vec<RecordedRequest>>,
}

impl FakeGateway {
    /// Create a fake with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful JSON reply.
    pub fn respond(&self, method: Method, path: &str, body: Value) -> &Self {
        self.push(method, path, Ok(Some(body)), Duration::ZERO)
    }

    /// Queue a successful JSON reply delivered after `delay`.
    pub fn respond_after(&self, method: Method, path: &str, body: Value, delay: Duration) -> &Self {
        self.push(method, path, Ok(Some(body)), delay)
    }

    /// Queue a successful empty reply (e.g. `204 No Content`).
    pub fn respond_empty(&self, method: Method, path: &str) -> &Self {
        self.push(method, path, Ok(None), Duration::ZERO)
    }

    /// Queue an HTTP error reply, interpreted exactly like a real response.
    pub fn respond_status(&self, method: Method, path: &str, status: u16, body: &str) -> &Self {
        let result = interpret_response(status, None, body).map(|_| None);
        self.push(method, path, result, Duration::ZERO)
    }

    /// Queue a transport failure.
    pub fn fail_transport(&self, method: Method, path: &str) -> &Self {
        self.push(
            method,
            path,
            Err(ApiError::Transport("connection refused".to_string())),
            Duration::ZERO,
        )
    }

    /// All requests received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.log).clone()
    }

    /// Requests received for a method whose path starts with `prefix`.
    #[must_use]
    pub fn requests_to(&self, method: Method, prefix: &str) -> Vec<RecordedRequest> {
        lock(&self.log)
            .iter()
            .filter(|r| r.method == method && r.path.starts_with(prefix))
            .cloned()
            .collect()
    }

    fn push(
        &self,
        method: Method,
        path: &str,
        result: Result<Option<Value>, ApiError>,
        delay: Duration,
    ) -> &Self {
        lock(&self.routes)
            .entry((method, path.to_owned()))
            .or_default()
            .push_back(Reply { result, delay });
        self
    }

    fn next_reply(&self, method: Method, path: &str) -> Option<Reply> {
        let mut routes = lock(&self.routes);
        let bare = path.split('?').next().unwrap_or(path);
        let queue = [path, bare]
            .into_iter()
            .find(|key| routes.contains_key(&(method, (*key).to_owned())))
            .and_then(|key| routes.get_mut(&(method, key.to_owned())))?;

        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl Gateway for FakeGateway {
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<Option<Value>, ApiError>> + Send {
        lock(&self.log).push(RecordedRequest {
            method: request.method,
            path: request.path.clone(),
            body: request.body.clone(),
            bearer: request.bearer_token().map(str::to_owned),
        });

        let reply = self.next_reply(request.method, &request.path);
        async move {
            match reply {
                Some(reply) => {
                    if !reply.delay.is_zero() {
                        tokio::time::sleep(reply.delay).await;
                    }
                    reply.result
                }
                None => interpret_response(404, Some("Not Found"), ""),
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
