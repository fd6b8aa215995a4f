//! WMO weather interpretation codes, as reported by Open-Meteo.

/// Readable summary and icon for a WMO weather code.
///
/// Unknown codes keep the number as the summary.
#[must_use]
pub fn describe_weather_code(code: i64) -> (String, &'static str) {
    let known = match code {
        0 => Some(("Clear sky", "☀️")),
        1 => Some(("Mainly clear", "🌤️")),
        2 => Some(("Partly cloudy", "⛅")),
        3 => Some(("Overcast", "☁️")),
        45 | 48 => Some(("Fog", "🌫️")),
        51 | 53 | 55 => Some(("Drizzle", "🌦️")),
        56 | 57 => Some(("Freezing drizzle", "🌧️")),
        61 | 63 | 65 => Some(("Rain", "🌧️")),
        66 | 67 => Some(("Freezing rain", "🌧️")),
        71 | 73 | 75 | 77 => Some(("Snow", "🌨️")),
        80..=82 => Some(("Rain showers", "🌦️")),
        85 | 86 => Some(("Snow showers", "🌨️")),
        95 => Some(("Thunderstorm", "⛈️")),
        96 | 99 => Some(("Thunderstorm with hail", "⛈️")),
        _ => None,
    };

    match known {
        Some((summary, icon)) => (summary.to_string(), icon),
        None => (code.to_string(), "🌡️"),
    }
}
