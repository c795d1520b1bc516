//! Fixed-width text shaping for dashboard rows.
//!
//! All lengths count characters, not bytes.

/// Appended to an identifier that had to be shortened.
pub const TRUNCATION_MARK: char = '~';

/// Appended to a percentage that had to be shortened.
pub const PERCENT_MARK: char = '%';

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn take_chars(text: &str, count: usize) -> String {
    text.chars().take(count).collect()
}

/// Shorten `name` to `max_len` characters, marking the cut with `~`.
pub fn clamp_identifier(name: &str, max_len: usize) -> String {
    if char_len(name) > max_len {
        let mut clamped = take_chars(name, max_len.saturating_sub(1));
        clamped.push(TRUNCATION_MARK);
        clamped
    } else {
        name.to_string()
    }
}

/// "COIN/CUR:" label with both identifiers clamped.
pub fn pair_label(coin: &str, currency: &str, coin_len: usize, currency_len: usize) -> String {
    format!(
        "{}/{}:",
        clamp_identifier(coin, coin_len),
        clamp_identifier(currency, currency_len)
    )
}

/// Right-align `rate` to exactly `width` characters, keeping the left-most digits if too long.
pub fn fit_rate(rate: &str, width: usize) -> String {
    if char_len(rate) > width {
        take_chars(rate, width)
    } else {
        format!("{:>width$}", rate, width = width)
    }
}

/// Rate text placed after `label`, so that rates line up in a column whatever the label length.
///
/// A label shorter than `coin_width` is compensated with leading spaces; a label longer than
/// `coin_width` leaves no room for padding and the rate is only cut to `rate_width`.
pub fn pad_rate(label: &str, rate: &str, coin_width: usize, rate_width: usize) -> String {
    let label_len = char_len(label);
    match label_len.cmp(&coin_width) {
        std::cmp::Ordering::Less => format!(
            "{}{}",
            " ".repeat(coin_width - label_len),
            fit_rate(rate, rate_width)
        ),
        std::cmp::Ordering::Equal => fit_rate(rate, rate_width),
        std::cmp::Ordering::Greater => take_chars(rate, rate_width),
    }
}

/// Shorten a percentage to `max_len` characters, keeping the trailing `%`.
pub fn clamp_percentage(pct: &str, max_len: usize) -> String {
    if char_len(pct) > max_len {
        let mut clamped = take_chars(pct, max_len.saturating_sub(1));
        clamped.push(PERCENT_MARK);
        clamped
    } else {
        pct.to_string()
    }
}

/// True if the percentage string holds a value below zero ("-0.0000%" is not).
pub fn is_negative(pct: &str) -> bool {
    pct.trim_end_matches(PERCENT_MARK)
        .parse::<f64>()
        .map(|value| value < 0.0)
        .unwrap_or(false)
}

/// Start column of a percentage: negative values move one column left for the minus sign.
pub fn percent_column_offset(base_x: u16, pct: &str) -> u16 {
    if is_negative(pct) {
        base_x.saturating_sub(1)
    } else {
        base_x
    }
}

/// Width available to a percentage; the column borrowed by a minus sign is added back.
pub fn percent_field_len(pct: &str, base_len: usize) -> usize {
    if is_negative(pct) { base_len + 1 } else { base_len }
}
