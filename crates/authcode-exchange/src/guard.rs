use std::time::Instant;

/// Lives for the duration of one exchange. Dropping it before [`finish`] means
/// the exchange future was abandoned mid-flight, usually because the browser
/// went away; the code may already be spent at the authorization server.
///
/// [`finish`]: InFlightExchange::finish
pub(crate) struct InFlightExchange {
    started: Instant,
    armed: bool,
}

impl InFlightExchange {
    pub(crate) fn start() -> Self {
        Self {
            started: Instant::now(),
            armed: true,
        }
    }

    pub(crate) fn finish(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightExchange {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!(
                elapsed_ms = self.started.elapsed().as_millis() as u64,
                "token exchange abandoned before completion, the authorization code may be burned"
            );
        }
    }
}
