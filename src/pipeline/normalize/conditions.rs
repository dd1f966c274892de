/// Icon shown when the provider's condition keyword is not in the table
pub const DEFAULT_ICON: &str = "ℹ️";

/// Map an OpenWeatherMap `weather[0].main` keyword to its map icon.
/// Matching is exact after trimming and lowercasing.
pub fn icon_for_condition(main: &str) -> &'static str {
    match main.trim().to_lowercase().as_str() {
        "clear" => "☀️",
        "clouds" => "☁️",
        "drizzle" => "🌦️",
        "rain" => "🌧️",
        "thunderstorm" => "⛈️",
        "snow" => "❄️",
        "mist" | "fog" | "haze" | "smoke" | "dust" | "sand" => "🌫️",
        "ash" => "🌋",
        "squall" => "💨",
        "tornado" => "🌪️",
        _ => DEFAULT_ICON,
    }
}
