/// Formats an amount as Brazilian currency, e.g. `1234.5` -> `"R$ 1.234,50"`.
///
/// Non-finite amounts format as `"R$ 0,00"`.
pub fn format_brl(amount: f64) -> String {
    if !amount.is_finite() {
        return "R$ 0,00".to_string();
    }

    let fixed = format!("{:.2}", amount.abs());
    let (integer, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if amount.is_sign_negative() { "-" } else { "" };

    format!("R$ {}{},{}", sign, grouped, cents)
}

pub fn format_brl_opt(amount: Option<f64>) -> String {
    format_brl(amount.unwrap_or(0.0))
}
