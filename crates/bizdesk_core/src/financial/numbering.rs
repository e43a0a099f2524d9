//! Invoice number allocation: `PREFIX-YYYYMM-NNNN`.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static INVOICE_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<prefix>.+)-(?P<period>\d{6})-(?P<seq>\d+)$").expect("valid invoice number regex")
});

/// Returns the next number for `today`'s month, continuing after the highest
/// existing sequence with the same prefix and period.
pub fn next_invoice_number<'a>(
    prefix: &str,
    today: NaiveDate,
    existing: impl IntoIterator<Item = &'a str>,
) -> String {
    let period = today.format("%Y%m").to_string();
    let highest = existing
        .into_iter()
        .filter_map(|number| INVOICE_NUMBER_RE.captures(number.trim()))
        .filter(|caps| &caps["prefix"] == prefix && caps["period"] == *period)
        .filter_map(|caps| caps["seq"].parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    format!("{prefix}-{period}-{:04}", highest.saturating_add(1))
}

#[cfg(test)]
mod tests {
    use super::next_invoice_number;
    use chrono::NaiveDate;

    #[test]
    fn continues_highest_sequence_in_same_month() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let existing = [
            "INV-202610-0002",
            "INV-202610-0007",
            "INV-202609-0042",
            "ACME-202610-0100",
            "garbage",
        ];
        assert_eq!(
            next_invoice_number("INV", today, existing),
            "INV-202610-0008"
        );
    }

    #[test]
    fn starts_at_one_for_new_month() {
        let today = NaiveDate::from_ymd_opt(2026, 11, 1).unwrap();
        assert_eq!(
            next_invoice_number("INV", today, ["INV-202610-0007"]),
            "INV-202611-0001"
        );
    }
}
