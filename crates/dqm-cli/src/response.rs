//! JSON response envelope.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use dqm_core::ComparisonResult;
use dqm_viz::{Figure, SummaryArtifact};
use serde::Serialize;

use crate::timing::Timings;

/// Request parameters echoed back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct Query {
    pub input: String,
    pub config: Option<String>,
    pub comparator: Option<String>,
    pub threads: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Fail,
}

#[derive(Debug, Clone, Serialize)]
pub struct Payload {
    pub results: Vec<ComparisonResult>,
    pub summary: Option<SummaryArtifact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub figures: Option<Vec<Option<Figure>>>,
    pub times: Timings,
}

#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub status: Status,
    pub fail_reason: Option<String>,
    pub payload: Payload,
}

#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub query: Query,
    /// Request start, seconds since the Unix epoch.
    pub start: f64,
    /// Wall time of the whole request, seconds.
    pub duration: f64,
    pub response: Response,
}

/// Start-of-request clock.
#[derive(Debug, Clone, Copy)]
pub struct RequestClock {
    unix: f64,
    t0: Instant,
}

impl RequestClock {
    pub fn start() -> Self {
        let unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        Self { unix, t0: Instant::now() }
    }

    fn finish(&self, query: Query, response: Response) -> Envelope {
        Envelope { query, start: self.unix, duration: self.t0.elapsed().as_secs_f64(), response }
    }

    pub fn success(&self, query: Query, payload: Payload) -> Envelope {
        self.finish(query, Response { status: Status::Success, fail_reason: None, payload })
    }

    /// Failed request; the payload keeps whatever timings were collected.
    pub fn fail(&self, query: Query, reason: String, times: Timings) -> Envelope {
        let payload = Payload { results: Vec::new(), summary: None, figures: None, times };
        self.finish(query, Response { status: Status::Fail, fail_reason: Some(reason), payload })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> Query {
        Query { input: "pairs.json".into(), config: None, comparator: None, threads: 1 }
    }

    #[test]
    fn test_fail_envelope_shape() {
        let env = RequestClock::start().fail(query(), "bad input".into(), Timings::new());
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["response"]["status"], "fail");
        assert_eq!(v["response"]["fail_reason"], "bad input");
        assert!(v["response"]["payload"]["results"].as_array().unwrap().is_empty());
        assert!(v["response"]["payload"].get("figures").is_none());
        assert!(v["duration"].as_f64().unwrap() >= 0.0);
    }

    #[test]
    fn test_success_has_null_fail_reason() {
        let payload =
            Payload { results: Vec::new(), summary: None, figures: None, times: Timings::new() };
        let v = serde_json::to_value(RequestClock::start().success(query(), payload)).unwrap();
        assert_eq!(v["response"]["status"], "success");
        assert!(v["response"]["fail_reason"].is_null());
        assert_eq!(v["query"]["input"], "pairs.json");
    }
}
