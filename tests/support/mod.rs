//! Shared test support: a scripted transport that records every request and
//! replays canned responses in order.
#![allow(dead_code)]

use async_trait::async_trait;
use batchline::prelude::*;
use reqwest::header::HeaderMap;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct MockTransport {
    calls: Arc<Mutex<Vec<TransportRequest>>>,
    responses: Arc<Mutex<VecDeque<TransportResponse>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response with the given status.
    pub fn push_json(&self, status: u16, body: serde_json::Value) {
        self.responses
            .lock()
            .expect("lock")
            .push_back(TransportResponse {
                status,
                headers: HeaderMap::new(),
                body: serde_json::to_vec(&body).expect("json bytes"),
            });
    }

    /// Queue a raw byte response with the given status.
    pub fn push_bytes(&self, status: u16, body: &[u8]) {
        self.responses
            .lock()
            .expect("lock")
            .push_back(TransportResponse {
                status,
                headers: HeaderMap::new(),
                body: body.to_vec(),
            });
    }

    /// Requests issued so far, in order.
    pub fn calls(&self) -> Vec<TransportRequest> {
        self.calls.lock().expect("lock").clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, Error> {
        self.calls.lock().expect("lock").push(request);
        self.responses
            .lock()
            .expect("lock")
            .pop_front()
            .ok_or_else(|| Error::transport("mock transport: no scripted response left"))
    }
}

/// JSON body of a recorded request; panics when the request was not JSON.
pub fn json_body(request: &TransportRequest) -> &serde_json::Value {
    match &request.body {
        RequestBody::Json(value) => value,
        other => panic!("expected JSON body, got {other:?}"),
    }
}
