//! Rendering-neutral projections shared by the result and file cards.

const NOT_SPECIFIED: &str = "No especificado";

/// Format a grant budget as Spanish euros.
///
/// Thousands separators in the input (`1,500,000.00`) are ignored. Missing,
/// zero or unparseable amounts read "No especificado". Output follows the
/// es-ES convention: `.` groups thousands only from five integer digits up,
/// `,` separates cents.
pub fn format_amount(amount: Option<&str>) -> String {
    let Some(raw) = amount.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return NOT_SPECIFIED.to_string();
    };
    let value = match raw.replace(',', "").parse::<f64>() {
        Ok(value) if value.is_finite() && value != 0.0 => value,
        _ => return NOT_SPECIFIED.to_string(),
    };

    let cents = (value.abs() * 100.0).round() as u64;
    let integer = (cents / 100).to_string();
    let sign = if value < 0.0 { "-" } else { "" };

    format!("{}{},{:02} €", sign, group_thousands(&integer), cents % 100)
}

fn group_thousands(digits: &str) -> String {
    if digits.len() < 5 {
        return digits.to_string();
    }
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

/// Human-readable file size with up to two decimals (`1.5 KB`, `0 Bytes`)
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let exponent = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let scaled = bytes as f64 / 1024f64.powi(exponent as i32);

    let mut number = format!("{:.2}", scaled);
    if number.contains('.') {
        let trimmed = number.trim_end_matches('0').trim_end_matches('.').len();
        number.truncate(trimmed);
    }
    format!("{} {}", number, UNITS[exponent])
}
