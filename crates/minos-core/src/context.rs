//! Per-request diagnostic context.
//!
//! The dispatcher owns one [`DispatchContext`] for the duration of a
//! single request and hands it to exactly one handler. It is a pure
//! observability side-channel — counters recorded here never influence
//! control flow.

use serde::Serialize;

/// Mutable diagnostic state recorded while dispatching one request.
///
/// Serializable so the transport can log the final counters alongside
/// the response.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DispatchContext {
    request_id: String,
    has: Vec<String>,
    nclients: usize,
}

impl DispatchContext {
    /// Creates a fresh context carrying the transport's request id.
    #[must_use]
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            has: Vec::new(),
            nclients: 0,
        }
    }

    /// The request id assigned by the transport.
    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Fields the score request supplied, when one was constructed.
    #[must_use]
    pub fn has(&self) -> &[String] {
        &self.has
    }

    /// Records the supplied-field names of a score request.
    pub fn set_has(&mut self, has: Vec<String>) {
        self.has = has;
    }

    /// Number of client ids in an interests request, 0 when unknown.
    #[must_use]
    pub fn nclients(&self) -> usize {
        self.nclients
    }

    /// Records the client-id count of an interests request.
    pub fn set_nclients(&mut self, nclients: usize) {
        self.nclients = nclients;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_context_is_empty() {
        let ctx = DispatchContext::new("req-1");
        assert_eq!(ctx.request_id(), "req-1");
        assert!(ctx.has().is_empty());
        assert_eq!(ctx.nclients(), 0);
    }

    #[test]
    fn test_recording_counters() {
        let mut ctx = DispatchContext::new("req-2");
        ctx.set_has(vec!["email".into(), "phone".into()]);
        ctx.set_nclients(4);
        assert_eq!(ctx.has(), ["email", "phone"]);
        assert_eq!(ctx.nclients(), 4);
    }
}
