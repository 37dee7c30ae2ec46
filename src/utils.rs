pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 100;

pub fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

pub fn generate_referral_code() -> String {
    fastrand::u32(100_000..1_000_000).to_string()
}

pub fn page_params(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(0, MAX_PAGE_LIMIT);
    let offset = offset.unwrap_or(0).max(0);

    (limit, offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_two_decimals() {
        assert_eq!(format_cents(1000), "10.00");
        assert_eq!(format_cents(9700), "97.00");
        assert_eq!(format_cents(300), "3.00");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(0), "0.00");
    }

    #[test]
    fn formats_negative_amounts() {
        assert_eq!(format_cents(-100), "-1.00");
        assert_eq!(format_cents(-5), "-0.05");
    }

    #[test]
    fn converts_currency_units_to_cents() {
        assert_eq!(to_cents(100.0), 10000);
        assert_eq!(to_cents(99.99), 9999);
        assert_eq!(to_cents(12.34), 1234);
        assert_eq!(to_cents(0.01), 1);
        assert_eq!(to_cents(0.0), 0);
    }

    #[test]
    fn referral_codes_are_six_digit_numeric() {
        for _ in 0..200 {
            let code = generate_referral_code();
            assert_eq!(code.len(), 6);
            let value: u32 = code.parse().unwrap();
            assert!((100_000..1_000_000).contains(&value));
        }
    }

    #[test]
    fn page_params_default_and_clamp() {
        assert_eq!(page_params(None, None), (DEFAULT_PAGE_LIMIT, 0));
        assert_eq!(page_params(Some(50), Some(10)), (50, 10));
        assert_eq!(page_params(Some(1000), Some(-5)), (MAX_PAGE_LIMIT, 0));
        assert_eq!(page_params(Some(-1), None), (0, 0));
    }
}
