//! Time display helpers

/// `m:ss`, minutes unbounded; negative or non-finite input renders as `0:00`
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Seconds with one decimal, e.g. `12.3s`
pub fn format_seconds(seconds: f64) -> String {
    format!("{:.1}s", seconds)
}

/// Percentage of a `[0, 1]` volume, e.g. `85%`
pub fn format_percent(volume: f64) -> String {
    format!("{:.0}%", volume * 100.0)
}

/// Export gain as a multiplier, e.g. `1.5x`
pub fn format_gain(gain: f64) -> String {
    format!("{:.1}x", gain)
}
