//! In-process fakes shared by unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse, TlsMode, Transport};

/// Replays scripted attempt results and records every attempt made.
pub struct FakeTransport {
    script: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
    calls: RefCell<Vec<(TlsMode, HttpRequest)>>,
}

impl FakeTransport {
    pub fn new(script: Vec<Result<HttpResponse, TransportError>>) -> Self {
        Self {
            script: RefCell::new(script.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            body: body.to_string(),
        }
    }

    pub fn modes(&self) -> Vec<TlsMode> {
        self.calls.borrow().iter().map(|(mode, _)| *mode).collect()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.calls.borrow().iter().map(|(_, req)| req.clone()).collect()
    }
}

impl Transport for FakeTransport {
    fn send(&self, mode: TlsMode, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.borrow_mut().push((mode, request.clone()));
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Failed("no scripted response".into())))
    }
}
