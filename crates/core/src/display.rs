//! Number formatting shared by every renderer (en-US conventions).

/// Format a dollar amount with thousands separators and two decimals:
/// `1234.5` → `$1,234.50`, `-80000` → `-$80,000.00`.
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u128;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{frac:02}")
}

/// Format a return percentage with an explicit sign: `+16.00%`, `-3.50%`.
pub fn format_percentage(percentage: f64) -> String {
    // -0.0 prints as "-0.00"
    let percentage = if percentage == 0.0 { 0.0 } else { percentage };
    if percentage >= 0.0 {
        format!("+{percentage:.2}%")
    } else {
        format!("{percentage:.2}%")
    }
}

/// Format an allocation share with one decimal: `60.0%`.
pub fn format_allocation(percentage: f64) -> String {
    format!("{percentage:.1}%")
}
