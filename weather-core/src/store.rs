//! Single source of truth for what the front end renders.
//!
//! Intents mutate state synchronously and, when data is needed, spawn a job.
//! Jobs report back as [`StoreEvent`]s on the store's channel; the owner of
//! the store feeds them to [`AppStore::apply`]. State is only ever touched
//! through `&mut self`, so there is exactly one writer.

use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    Config, WeatherError,
    geo::{GeoProvider, geo_from_config},
    location::{LocationResolver, ResolvedPlace},
    model::{
        ForecastEntry, Place, RequestState, Suggestion, Theme, UnitSystem, WeatherReport,
        WeatherSnapshot,
    },
    orchestrator::WeatherOrchestrator,
    provider::{WeatherApi, client_from_config},
    suggest::{InputChange, SuggestionEngine, SuggestionResponse},
};

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    /// Active place, its label and any advisory, always committed together.
    pub location: ResolvedPlace,
    pub units: UnitSystem,
    pub theme: Theme,
    pub search_input: String,
    pub weather: Option<WeatherSnapshot>,
    /// Units `weather` and `forecast` are expressed in; lags `units` while
    /// a refetch is pending or after it failed.
    pub weather_units: UnitSystem,
    pub forecast: Vec<ForecastEntry>,
    pub weather_status: RequestState,
    pub suggestions: Vec<Suggestion>,
    pub suggestion_status: RequestState,
}

impl AppState {
    pub fn place(&self) -> &Place {
        &self.location.place
    }

    pub fn label(&self) -> &str {
        &self.location.label
    }

    pub fn advisory(&self) -> Option<&str> {
        self.location.advisory.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.weather_status.is_loading()
    }

    /// Banner text for the last weather failure.
    pub fn error(&self) -> Option<&str> {
        self.weather_status.error_message()
    }
}

/// What a weather job should resolve before loading.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchTarget {
    /// Startup: location fix, falling back to the default city.
    Initial,
    /// Location fix; refusal is reported as an error.
    CurrentLocation,
    Resolved(ResolvedPlace),
}

#[derive(Debug)]
pub struct WeatherResponse {
    pub seq: u64,
    pub outcome: Result<(ResolvedPlace, WeatherReport), WeatherError>,
}

#[derive(Debug)]
pub enum StoreEvent {
    /// A location fix was turned into a place; the weather load follows.
    Located { seq: u64, resolved: ResolvedPlace },
    Weather(WeatherResponse),
    Suggestions(SuggestionResponse),
}

impl From<SuggestionResponse> for StoreEvent {
    fn from(response: SuggestionResponse) -> Self {
        StoreEvent::Suggestions(response)
    }
}

#[derive(Debug)]
pub struct AppStore {
    state: AppState,
    resolver: LocationResolver,
    orchestrator: WeatherOrchestrator,
    suggestions: SuggestionEngine<StoreEvent>,
    tx: mpsc::UnboundedSender<StoreEvent>,
    rx: mpsc::UnboundedReceiver<StoreEvent>,
    weather_seq: u64,
    weather_task: Option<JoinHandle<()>>,
    in_flight: Option<FetchTarget>,
}

impl AppStore {
    pub fn new(api: Arc<dyn WeatherApi>, geo: Arc<dyn GeoProvider>, config: &Config) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let resolver = LocationResolver::new(Arc::clone(&api), geo, config.default_city.clone());
        let suggestions =
            SuggestionEngine::new(Arc::clone(&api), config.suggestions.clone(), tx.clone());

        let state = AppState {
            location: resolver.default_place(),
            units: config.units,
            theme: config.theme,
            search_input: String::new(),
            weather: None,
            weather_units: config.units,
            forecast: Vec::new(),
            weather_status: RequestState::Idle,
            suggestions: Vec::new(),
            suggestion_status: RequestState::Idle,
        };

        Self {
            state,
            resolver,
            orchestrator: WeatherOrchestrator::new(api),
            suggestions,
            tx,
            rx,
            weather_seq: 0,
            weather_task: None,
            in_flight: None,
        }
    }

    /// Store wired to the OpenWeather client and the configured location source.
    pub fn from_config(config: &Config) -> Self {
        Self::new(client_from_config(config), geo_from_config(config), config)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Startup resolution and first load.
    pub fn init(&mut self) {
        self.start_fetch(FetchTarget::Initial);
    }

    pub fn update_search_input(&mut self, text: &str) {
        self.state.search_input = text.to_string();

        match self.suggestions.on_input_change(text) {
            InputChange::Cleared => self.clear_suggestions(),
            InputChange::Scheduled { .. } => self.state.suggestion_status = RequestState::Loading,
        }
    }

    /// Submit a search. Returns `false` (and changes nothing) for blank input.
    pub fn search(&mut self, text: &str) -> bool {
        let Some(resolved) = LocationResolver::resolve_from_text(text) else {
            return false;
        };

        self.dismiss_suggestions();
        self.start_fetch(FetchTarget::Resolved(resolved));
        true
    }

    pub fn select_suggestion(&mut self, candidate: &Suggestion) {
        let resolved = LocationResolver::resolve_from_suggestion(candidate);

        self.dismiss_suggestions();
        self.start_fetch(FetchTarget::Resolved(resolved));
    }

    /// Pick from the current list by position. `false` if out of range.
    pub fn select_suggestion_at(&mut self, index: usize) -> bool {
        match self.state.suggestions.get(index).cloned() {
            Some(candidate) => {
                self.select_suggestion(&candidate);
                true
            }
            None => false,
        }
    }

    pub fn use_current_location(&mut self) {
        self.start_fetch(FetchTarget::CurrentLocation);
    }

    /// Flip units and refetch whatever place is currently targeted: the
    /// pending one if a fetch is in flight, the active one otherwise. Once a
    /// fix has been located only the weather load is repeated.
    pub fn toggle_units(&mut self) {
        self.state.units = self.state.units.toggled();

        let target = self
            .in_flight
            .clone()
            .unwrap_or_else(|| FetchTarget::Resolved(self.state.location.clone()));
        self.start_fetch(target);
    }

    pub fn toggle_theme(&mut self) {
        self.state.theme = self.state.theme.toggled();
    }

    /// Wait for the next job result. Never `None` while the store is alive.
    ///
    /// A weather job that dies without reporting is turned into a failed
    /// response so the store never stays in `Loading`.
    pub async fn next_event(&mut self) -> Option<StoreEvent> {
        let Some(task) = self.weather_task.as_mut() else {
            return self.rx.recv().await;
        };

        tokio::select! {
            biased;
            event = self.rx.recv() => event,
            joined = task => {
                self.weather_task = None;
                match joined {
                    Err(err) if err.is_panic() => {
                        warn!(seq = self.weather_seq, "weather job panicked");
                        Some(StoreEvent::Weather(WeatherResponse {
                            seq: self.weather_seq,
                            outcome: Err(WeatherError::Transient("weather job panicked".into())),
                        }))
                    }
                    _ => self.rx.recv().await,
                }
            }
        }
    }

    /// Receive and apply one event.
    pub async fn process_next(&mut self) -> bool {
        match self.next_event().await {
            Some(event) => {
                self.apply(event);
                true
            }
            None => false,
        }
    }

    /// Apply events until no weather fetch is pending.
    pub async fn settle(&mut self) {
        while self.in_flight.is_some() {
            if !self.process_next().await {
                break;
            }
        }
    }

    pub fn apply(&mut self, event: StoreEvent) {
        match event {
            StoreEvent::Located { seq, resolved } => self.apply_located(seq, resolved),
            StoreEvent::Weather(response) => self.apply_weather(response),
            StoreEvent::Suggestions(response) => self.apply_suggestions(response),
        }
    }

    /// Later refetches target the resolved place instead of locating again.
    /// At startup the placeholder is replaced right away, so the place and
    /// any advisory survive a failed first load.
    fn apply_located(&mut self, seq: u64, resolved: ResolvedPlace) {
        if seq != self.weather_seq {
            debug!(seq, latest = self.weather_seq, "dropping stale location");
            return;
        }

        if matches!(self.in_flight, Some(FetchTarget::Initial)) {
            self.state.location = resolved.clone();
        }
        self.in_flight = Some(FetchTarget::Resolved(resolved));
    }

    fn apply_weather(&mut self, response: WeatherResponse) {
        if response.seq != self.weather_seq {
            debug!(seq = response.seq, latest = self.weather_seq, "dropping stale weather response");
            return;
        }

        self.weather_task = None;
        self.in_flight = None;

        match response.outcome {
            Ok((resolved, report)) => {
                info!(label = %resolved.label, place = %resolved.place, "weather updated");
                self.state.location = resolved;
                self.state.weather = Some(report.snapshot);
                self.state.forecast = report.forecast;
                self.state.weather_units = report.units;
                self.state.weather_status = RequestState::Success;
            }
            Err(err) => {
                // Last good data stays visible behind the banner.
                warn!(error = %err, "weather fetch failed");
                self.state.weather_status = RequestState::Error(err.user_message());
            }
        }
    }

    fn apply_suggestions(&mut self, response: SuggestionResponse) {
        match self.suggestions.accept(response) {
            None => {}
            Some(Ok(list)) => {
                self.state.suggestions = list;
                self.state.suggestion_status = RequestState::Success;
            }
            Some(Err(err)) => {
                self.state.suggestions.clear();
                self.state.suggestion_status = RequestState::Error(err.user_message());
            }
        }
    }

    fn start_fetch(&mut self, target: FetchTarget) {
        self.weather_seq += 1;
        if let Some(task) = self.weather_task.take() {
            task.abort();
        }

        let seq = self.weather_seq;
        let units = self.state.units;
        let resolver = self.resolver.clone();
        let orchestrator = self.orchestrator.clone();
        let tx = self.tx.clone();

        debug!(seq, ?target, %units, "starting weather fetch");
        self.state.weather_status = RequestState::Loading;
        self.in_flight = Some(target.clone());

        self.weather_task = Some(tokio::spawn(async move {
            let outcome = run_fetch(&resolver, &orchestrator, target, units, seq, &tx).await;
            let _ = tx.send(StoreEvent::Weather(WeatherResponse { seq, outcome }));
        }));
    }

    /// Submit and select both drop the list and any pending lookup.
    fn dismiss_suggestions(&mut self) {
        self.suggestions.cancel();
        self.clear_suggestions();
        self.state.search_input.clear();
    }

    fn clear_suggestions(&mut self) {
        self.state.suggestions.clear();
        self.state.suggestion_status = RequestState::Idle;
    }
}

impl Drop for AppStore {
    fn drop(&mut self) {
        if let Some(task) = self.weather_task.take() {
            task.abort();
        }
    }
}

async fn run_fetch(
    resolver: &LocationResolver,
    orchestrator: &WeatherOrchestrator,
    target: FetchTarget,
    units: UnitSystem,
    seq: u64,
    tx: &mpsc::UnboundedSender<StoreEvent>,
) -> Result<(ResolvedPlace, WeatherReport), WeatherError> {
    let located = !matches!(target, FetchTarget::Resolved(_));
    let resolved = match target {
        FetchTarget::Initial => resolver.resolve_initial().await,
        FetchTarget::CurrentLocation => resolver.resolve_current().await?,
        FetchTarget::Resolved(resolved) => resolved,
    };
    if located {
        let _ = tx.send(StoreEvent::Located { seq, resolved: resolved.clone() });
    }

    let report = orchestrator.load_weather(&resolved.place, units).await?;
    Ok((resolved, report))
}
