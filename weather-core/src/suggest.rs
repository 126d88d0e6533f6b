//! Debounced autocomplete over the geocoding endpoint.
//!
//! Every input change re-arms a timer task and bumps a sequence number.
//! Responses carry the sequence they were issued under, and only the one
//! matching the latest sequence may be applied.

use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinHandle};
use tracing::debug;

use crate::{WeatherError, config::SuggestionSettings, model::Suggestion, provider::WeatherApi};

/// Outcome of one lookup, tagged with the sequence it was issued under.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionResponse {
    pub seq: u64,
    pub query: String,
    pub result: Result<Vec<Suggestion>, WeatherError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputChange {
    /// Input too short; suggestions should be cleared now.
    Cleared,
    /// A lookup will fire after the debounce window unless superseded.
    Scheduled { seq: u64 },
}

/// Sends each surviving lookup result as `E` on the given channel.
#[derive(Debug)]
pub struct SuggestionEngine<E> {
    api: Arc<dyn WeatherApi>,
    settings: SuggestionSettings,
    tx: mpsc::UnboundedSender<E>,
    latest: u64,
    timer: Option<JoinHandle<()>>,
}

impl<E> SuggestionEngine<E>
where
    E: From<SuggestionResponse> + Send + 'static,
{
    pub fn new(
        api: Arc<dyn WeatherApi>,
        settings: SuggestionSettings,
        tx: mpsc::UnboundedSender<E>,
    ) -> Self {
        Self { api, settings, tx, latest: 0, timer: None }
    }

    pub fn on_input_change(&mut self, text: &str) -> InputChange {
        self.cancel();

        let query = text.trim().to_string();
        if query.chars().count() < self.settings.min_chars {
            return InputChange::Cleared;
        }

        let seq = self.latest;
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let delay = self.settings.debounce();
        let limit = self.settings.limit;

        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!(seq, %query, "debounce elapsed, looking up suggestions");

            let result = api.geocode(&query, limit).await;
            // The store may already be gone; nothing to deliver to then.
            let _ = tx.send(E::from(SuggestionResponse { seq, query, result }));
        }));

        InputChange::Scheduled { seq }
    }

    /// Abort the pending timer and invalidate anything already in flight.
    pub fn cancel(&mut self) {
        self.latest += 1;
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    pub fn is_current(&self, response: &SuggestionResponse) -> bool {
        response.seq == self.latest
    }

    /// The lookup result if the response is still current, `None` if stale.
    pub fn accept(
        &self,
        response: SuggestionResponse,
    ) -> Option<Result<Vec<Suggestion>, WeatherError>> {
        if !self.is_current(&response) {
            debug!(
                seq = response.seq,
                latest = self.latest,
                query = %response.query,
                "dropping stale suggestion response"
            );
            return None;
        }

        Some(response.result)
    }
}

impl<E> Drop for SuggestionEngine<E> {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
