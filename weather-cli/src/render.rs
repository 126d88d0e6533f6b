use std::fmt::Write;

use chrono::{DateTime, Local, Utc};
use weathernow_core::{AppState, Theme, UnitSystem};

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

pub fn icon_url(icon: &str, large: bool) -> String {
    if large {
        format!("{ICON_BASE_URL}/{icon}@2x.png")
    } else {
        format!("{ICON_BASE_URL}/{icon}.png")
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn degrees(value: f64) -> i64 {
    value.round() as i64
}

/// "Tomorrow" for the first sample, short weekday after.
fn day_label(index: usize, timestamp: DateTime<Utc>) -> String {
    if index == 0 {
        "Tomorrow".to_string()
    } else {
        timestamp.with_timezone(&Local).format("%a").to_string()
    }
}

/// One-line summary of the toggles.
pub fn status(state: &AppState) -> String {
    let theme = match state.theme {
        Theme::Light => "light",
        Theme::Dark => "dark",
    };
    format!("[{} · {} · {theme}]", state.label(), state.units)
}

pub fn report(state: &AppState) -> String {
    let mut out = String::new();

    if let Some(note) = state.advisory() {
        let _ = writeln!(out, "Note: {note}");
    }
    if let Some(err) = state.error() {
        let _ = writeln!(out, "Error: {err}");
    }
    if state.is_loading() {
        let _ = writeln!(out, "Loading weather...");
        return out;
    }

    let units: UnitSystem = state.weather_units;
    let symbol = units.temperature_symbol();

    if let Some(w) = &state.weather {
        let _ = writeln!(out, "{}", state.label());
        let _ = writeln!(out, "  {}{symbol}  {}", degrees(w.temperature), capitalize(&w.description));
        let _ = writeln!(
            out,
            "  Feels like {}{symbol} · Humidity {}% · Wind {} {}",
            degrees(w.feels_like),
            w.humidity,
            w.wind_for_display(units),
            units.wind_unit(),
        );
        if !w.icon.is_empty() {
            let _ = writeln!(out, "  {}", icon_url(&w.icon, true));
        }
    }

    if !state.forecast.is_empty() {
        let _ = writeln!(out, "\n{}-Day Forecast", state.forecast.len());
        for (i, day) in state.forecast.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {:<9} {:>4}{symbol} / {:>4}{symbol}  {}",
                day_label(i, day.timestamp),
                degrees(day.high),
                degrees(day.low),
                day.description,
            );
        }
    }

    out
}

pub fn suggestions(state: &AppState) -> String {
    let mut out = String::new();
    for (i, s) in state.suggestions.iter().enumerate() {
        let _ = writeln!(out, "  :{} {}", i + 1, s.long_label());
    }
    out
}
