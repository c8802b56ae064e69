/// Group the integer part of `value` in thousands
fn with_separators(whole: i64) -> String {
    let digits = whole.to_string();
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a currency value
pub fn format_currency(value: f64) -> String {
    let abs_cents = (value.abs() * 100.0).round() as i64;
    let dollars = with_separators(abs_cents / 100);
    let cents = abs_cents % 100;

    if value >= 0.0 || abs_cents == 0 {
        format!("${dollars}.{cents:02}")
    } else {
        format!("-${dollars}.{cents:02}")
    }
}

/// Format a rate already expressed in percent
pub fn format_rate(percent: f64) -> String {
    format!("{percent:.4}%")
}
