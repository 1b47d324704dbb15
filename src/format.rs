// 🔤 Display formatting (pt-BR)
//
// Dates as DD/MM/YYYY, currency as R$, month names in Portuguese.

use chrono::{Datelike, NaiveDate};

use crate::temporal::IsoDate;

const MONTH_NAMES: [&str; 12] = [
    "Janeiro", "Fevereiro", "Março", "Abril",
    "Maio", "Junho", "Julho", "Agosto",
    "Setembro", "Outubro", "Novembro", "Dezembro",
];

const SIZE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Month name for 1..=12
pub fn month_name(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|index| MONTH_NAMES.get(index as usize))
        .copied()
}

/// DD/MM/YYYY
pub fn format_day(day: NaiveDate) -> String {
    day.format("%d/%m/%Y").to_string()
}

pub fn format_date(date: &IsoDate) -> String {
    format_day(date.day())
}

/// DD/MM/YYYY HH:MM (00:00 when the field has no time)
pub fn format_date_time(date: &IsoDate) -> String {
    date.timestamp().format("%d/%m/%Y %H:%M").to_string()
}

/// "5 de Janeiro"
pub fn format_day_and_month(day: NaiveDate) -> String {
    format!("{} de {}", day.day(), month_name(day.month()).unwrap_or("?"))
}

/// Activity period: a single date, or "start a end" when they differ
pub fn format_period(start: &IsoDate, end: &IsoDate) -> String {
    if start.day() == end.day() {
        format_date(start)
    } else {
        format!("{} a {}", format_date(start), format_date(end))
    }
}

/// R$ 1.234,56
pub fn format_currency(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let units = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::new();
    for (i, ch) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, grouped, fraction)
}

/// Truncates to `max_chars` characters, appending "..." when cut.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut)
}

/// Human readable size with 1024 steps and up to two decimals ("1.5 KB").
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}
