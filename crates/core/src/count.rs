//! Count formatting for result totals and "imported by" badges

/// Format a count with thousands separators
///
/// Converts 1234567 to "1,234,567".
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

/// Round an estimated count to its most meaningful digits
///
/// The rounding unit is `10^floor(log10(estimate * sigma))`, so a larger
/// relative error `sigma` produces a coarser number. Zero stays zero.
pub fn approximate_number(estimate: usize, sigma: f64) -> usize {
    if estimate == 0 || sigma <= 0.0 {
        return estimate;
    }

    let expo = (estimate as f64 * sigma).log10().floor();
    if expo <= 0.0 {
        return estimate;
    }

    let unit = 10f64.powi(expo as i32);
    (unit * (estimate as f64 / unit).round()) as usize
}

/// Format a count that the data source stopped at `limit`
///
/// Queries bounded by a limit fetch one row more than they display; when the
/// count reaches the limit the badge reads "(limit - 1)+".
pub fn format_limited_count(count: usize, limit: usize) -> String {
    if limit > 0 && count >= limit {
        format!("{}+", format_count(limit - 1))
    } else {
        format_count(count)
    }
}

/// Format a result total, prefixed with "about" when it is an estimate
pub fn format_total(count: usize, approximate: bool) -> String {
    if approximate {
        format!("about {}", format_count(count))
    } else {
        format_count(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(7), "7");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(12345), "12,345");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_approximate_number() {
        assert_eq!(approximate_number(0, 0.1), 0);
        assert_eq!(approximate_number(7, 0.1), 7);
        assert_eq!(approximate_number(111, 0.1), 110);
        assert_eq!(approximate_number(1111, 0.1), 1100);
        assert_eq!(approximate_number(1151, 0.1), 1200);
        assert_eq!(approximate_number(123456, 0.01), 123000);
    }

    #[test]
    fn test_approximate_number_non_positive_sigma() {
        assert_eq!(approximate_number(1234, 0.0), 1234);
    }

    #[test]
    fn test_format_limited_count() {
        assert_eq!(format_limited_count(42, 10001), "42");
        assert_eq!(format_limited_count(10000, 10001), "10,000");
        assert_eq!(format_limited_count(10001, 10001), "10,000+");
        assert_eq!(format_limited_count(5, 0), "5");
    }

    #[test]
    fn test_format_total() {
        assert_eq!(format_total(1500, false), "1,500");
        assert_eq!(format_total(1500, true), "about 1,500");
    }
}
