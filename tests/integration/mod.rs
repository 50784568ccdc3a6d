//! Integration tests for amp-monitor
//!
//! These tests run the real reqwest transport against throwaway HTTP servers
//! on localhost, covering the fetch, notify and monitor-cycle paths end to end.

pub mod fetch;
pub mod notify;
