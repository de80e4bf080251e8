/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use roi_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by a relative epsilon so exact midpoints like 1.005 round up.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let int_str = integer_part.to_string();
    let grouped = group_thousands(&int_str);

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        // "0.50" -> ".50"
        let decimal_digits = &frac_str[1..];
        format!("{}{}", grouped, decimal_digits)
    };

    if negative && rounded != 0.0 {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format a rupee amount with thousands separators and no decimals.
///
/// # Examples
///
/// ```
/// use roi_core::formatting::format_currency;
///
/// assert_eq!(format_currency(1234567.4), "₹1,234,567");
/// assert_eq!(format_currency(0.0),       "₹0");
/// assert_eq!(format_currency(-950.0),    "₹-950");
/// ```
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("₹-{}", format_number(amount.abs(), 0))
    } else {
        format!("₹{}", format_number(amount, 0))
    }
}

/// [`format_currency`] for a possibly undefined amount; `None` renders as `"n/a"`.
pub fn format_optional_currency(amount: Option<f64>) -> String {
    match amount {
        Some(a) if a.is_finite() => format_currency(a),
        _ => "n/a".to_string(),
    }
}

/// Format a fraction as a percentage with two decimals (`0.1534` → `"15.34%"`).
///
/// Undefined values render as `"n/a"`.
pub fn format_percent(fraction: Option<f64>) -> String {
    match fraction {
        Some(f) if f.is_finite() => format!("{:.2}%", f * 100.0),
        _ => "n/a".to_string(),
    }
}

/// Format an optional ratio with two decimals; undefined values render as `"n/a"`.
pub fn format_ratio(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}", v),
        _ => "n/a".to_string(),
    }
}

/// Round `value` half away from zero to `decimal_places`.
///
/// # Examples
///
/// ```
/// use roi_core::formatting::round_to;
///
/// assert_eq!(round_to(0.14999, 2), 0.15);
/// assert_eq!(round_to(2.0, 2), 2.0);
/// ```
pub fn round_to(value: f64, decimal_places: u32) -> f64 {
    let factor = 10_f64.powi(decimal_places as i32);
    (value * factor).round() / factor
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
