use crate::core::AmountFormatter;

/// de-CH style whole-franc amounts: `CHF 1'250'000`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChfFormatter;

impl AmountFormatter for ChfFormatter {
    fn format_amount(&self, value: f64) -> String {
        format_chf(value)
    }
}

pub fn format_chf(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push('\'');
        }
        grouped.push(ch);
    }

    if rounded < 0 {
        format!("CHF -{grouped}")
    } else {
        format!("CHF {grouped}")
    }
}
