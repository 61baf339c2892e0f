//! Human-friendly rendering of lookup results.

use std::fmt::{self, Display, Formatter};

use crate::model::{
    CityInfo, Comparison, ComparisonKind, Forecast, SearchResult, TimeResult, TravelInfo,
    WeatherReport, celsius_to_fahrenheit,
};

impl Display for WeatherReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let w = self.weather;
        writeln!(f, "🌤️ Weather in {}: {}", self.city.name, title_case(w.condition))?;
        writeln!(f, "🌡️ Temperature: {:.0}°C ({:.0}°F)", w.temperature_c, w.temperature_f())?;
        writeln!(f, "🤔 Feels like: {:.0}°C ({:.0}°F)", w.feels_like_c, w.feels_like_f())?;
        writeln!(f, "💧 Humidity: {}%", w.humidity_pct)?;
        write!(f, "💨 Wind: {:.0} km/h {}", w.wind_speed_kph, w.wind_direction)?;

        if self.detailed {
            write!(
                f,
                "\n📊 Pressure: {:.1} hPa\n👁️ Visibility: {:.0} km\n☀️ UV Index: {}\n🏭 Air Quality: {}",
                w.pressure_hpa, w.visibility_km, w.uv_index, w.air_quality
            )?;
        }

        if !w.alerts.is_empty() {
            write!(f, "\n\n⚠️ Weather Alerts:")?;
            for alert in w.alerts {
                write!(f, "\n• {} ({}): {}", alert.kind, alert.severity, alert.description)?;
            }
        }

        Ok(())
    }
}

impl Display for TimeResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "🕐 Current time in {}: {}", self.city.name, self.formatted)
    }
}

impl Display for CityInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let c = self.city;
        writeln!(f, "🏙️ {}, {}", c.name, c.country)?;
        writeln!(f, "👥 Population: {}", thousands(c.population))?;
        writeln!(f, "🗺️ Coordinates: {:.4}, {:.4}", c.latitude, c.longitude)?;
        writeln!(f, "💰 Currency: {}", c.currency)?;
        writeln!(f, "🗣️ Language: {}", c.language)?;
        write!(f, "🕐 Timezone: {}", c.timezone.name())
    }
}

impl Display for Forecast {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "📅 {}-Day Weather Forecast for {}:", self.days.len(), self.city.name)?;
        for day in &self.days {
            write!(
                f,
                "\n📆 {}: {}, {:.0}°C ({:.0}°F)",
                day.date.format("%A, %B %d"),
                title_case(day.condition),
                day.temperature_c,
                celsius_to_fahrenheit(day.temperature_c),
            )?;
        }
        Ok(())
    }
}

impl Display for Comparison {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let (a, b) = (self.first.name, self.second.name);

        match self.kind {
            ComparisonKind::Weather => {
                let (wa, wb) = (self.first_weather, self.second_weather);
                writeln!(f, "🌍 Weather Comparison: {a} vs {b}\n")?;
                writeln!(f, "{a}: {:.0}°C, {}", wa.temperature_c, wa.condition)?;
                writeln!(f, "{b}: {:.0}°C, {}\n", wb.temperature_c, wb.condition)?;

                let dt = self.temperature_delta_c;
                write!(f, "🌡️ Temperature difference: {:.1}°C ", dt.abs())?;
                match dt.partial_cmp(&0.0) {
                    Some(std::cmp::Ordering::Greater) => writeln!(f, "(warmer in {a})")?,
                    Some(std::cmp::Ordering::Less) => writeln!(f, "(warmer in {b})")?,
                    _ => writeln!(f, "(same in both)")?,
                }

                let dh = self.humidity_delta_pct;
                write!(f, "💧 Humidity difference: {}% ", dh.abs())?;
                match dh.signum() {
                    1 => write!(f, "(higher in {a})"),
                    -1 => write!(f, "(higher in {b})"),
                    _ => write!(f, "(same in both)"),
                }
            }
            ComparisonKind::Time => {
                writeln!(f, "🕐 Time Comparison: {a} vs {b}\n")?;
                writeln!(f, "{a}: {}", self.first_time.format("%I:%M %p (UTC%:z)"))?;
                writeln!(f, "{b}: {}\n", self.second_time.format("%I:%M %p (UTC%:z)"))?;

                let dt = self.time_delta_hours;
                write!(f, "⏰ Time difference: {} hours ", hours(dt.abs()))?;
                if dt > 0.0 {
                    write!(f, "({a} is ahead)")
                } else if dt < 0.0 {
                    write!(f, "({b} is ahead)")
                } else {
                    write!(f, "(same local time)")
                }
            }
            ComparisonKind::Info => {
                writeln!(f, "🏙️ City Comparison: {a} vs {b}\n")?;
                writeln!(
                    f,
                    "👥 Population: {} vs {}",
                    thousands(self.first.population),
                    thousands(self.second.population)
                )?;
                writeln!(f, "💰 Currency: {} vs {}", self.first.currency, self.second.currency)?;
                writeln!(f, "🗣️ Language: {} vs {}", self.first.language, self.second.language)?;
                writeln!(f, "🌍 Country: {} vs {}", self.first.country, self.second.country)?;
                write!(f, "📏 Distance apart: ~{:.0} km", self.distance_km)
            }
        }
    }
}

impl Display for TravelInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let (o, d) = (self.origin, self.destination);
        writeln!(f, "✈️ Travel Info: {} → {}\n", o.name, d.name)?;
        writeln!(f, "📏 Distance: ~{:.0} km ({:.0} miles)", self.distance_km, self.distance_miles)?;

        let dt = self.time_delta_hours;
        write!(f, "🕐 Time difference: {} hours ", hours(dt.abs()))?;
        if dt > 0.0 {
            writeln!(f, "(ahead in {})", d.name)?;
        } else if dt < 0.0 {
            writeln!(f, "(behind in {})", d.name)?;
        } else {
            writeln!(f, "(same time zone offset)")?;
        }

        writeln!(f, "💱 Currency: {} → {}", o.currency, d.currency)?;
        write!(f, "🗣️ Language: {} → {}", o.language, d.language)
    }
}

impl Display for SearchResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let noun = if self.matches.len() == 1 { "city" } else { "cities" };
        writeln!(
            f,
            "🔍 Found {} {noun} in my database matching '{}':",
            self.matches.len(),
            self.query
        )?;
        for c in &self.matches {
            write!(f, "\n• {}, {} (Pop: {})", c.name, c.country, thousands(c.population))?;
        }
        Ok(())
    }
}

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// 8336817 -> "8,336,817"
fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Whole hours print without decimals; half-hour zones keep one.
fn hours(h: f64) -> String {
    if h.fract() == 0.0 { format!("{h:.0}") } else { format!("{h:.1}") }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup;
    use chrono::{TimeZone, Utc};

    #[test]
    fn thousands_separators() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_000), "1,000");
        assert_eq!(thousands(20_411_274), "20,411,274");
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("partly cloudy"), "Partly Cloudy");
        assert_eq!(title_case("sunny"), "Sunny");
    }

    #[test]
    fn detailed_weather_adds_metrics_and_alerts() {
        let basic = lookup::weather("lagos", false).unwrap().to_string();
        assert!(basic.starts_with("🌤️ Weather in Lagos: Thunderstorms"));
        assert!(basic.contains("26°C (79°F)"));
        assert!(!basic.contains("Pressure"));
        assert!(basic.contains("• Thunderstorm (moderate): Scattered thunderstorms expected"));

        let detailed = lookup::weather("lagos", true).unwrap().to_string();
        assert!(detailed.contains("📊 Pressure: 1009.8 hPa"));
        assert!(detailed.contains("🏭 Air Quality: Moderate"));
    }

    #[test]
    fn city_info_rendering() {
        let text = lookup::city_info("mumbai").unwrap().to_string();
        assert!(text.contains("🏙️ Mumbai, India"));
        assert!(text.contains("Population: 20,411,274"));
        assert!(text.contains("Coordinates: 19.0760, 72.8777"));
        assert!(text.contains("Timezone: Asia/Kolkata"));
    }

    #[test]
    fn time_comparison_names_the_city_ahead() {
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap();
        let text = lookup::compare("New York", "Tokyo", ComparisonKind::Time, now)
            .unwrap()
            .to_string();
        assert!(text.contains("Time difference: 13 hours (Tokyo is ahead)"), "{text}");
    }

    #[test]
    fn travel_rendering_mentions_both_cities() {
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap();
        let text = lookup::travel("London", "Mumbai", now).unwrap().to_string();
        assert!(text.starts_with("✈️ Travel Info: London → Mumbai"));
        assert!(text.contains("4.5 hours (ahead in Mumbai)"));
        assert!(text.contains("GBP → INR"));
    }

    #[test]
    fn single_search_match_uses_singular() {
        let text = lookup::search("japan").unwrap().to_string();
        assert!(text.starts_with("🔍 Found 1 city in my database matching 'japan'"));
        assert!(text.contains("• Tokyo, Japan (Pop: 13,960,000)"));
    }
}
