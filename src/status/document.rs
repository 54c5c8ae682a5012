//! Expiry-date document classifier

use chrono::NaiveDate;

use super::{Assessment, Severity};

/// Days before expiry at or below which a document is critical
pub const CRITICAL_DAYS: i64 = 7;

/// Days before expiry at or below which a document is expiring soon
pub const UPCOMING_DAYS: i64 = 15;

fn plural_days(n: i64) -> &'static str {
    if n == 1 {
        "day"
    } else {
        "days"
    }
}

/// Classify a document from its expiry date relative to `today`.
///
/// Documents without an expiry date (vehicle registration, for instance)
/// never expire and are always OK.
pub fn classify_document(expiry: Option<NaiveDate>, today: NaiveDate) -> Assessment {
    let Some(expiry) = expiry else {
        return Assessment::ok();
    };

    let days = (expiry - today).num_days();

    if days < 0 {
        let overdue = -days;
        Assessment::new(
            Severity::Vencido,
            Some(format!("Expired {} {} ago", overdue, plural_days(overdue))),
        )
    } else if days <= CRITICAL_DAYS {
        Assessment::new(
            Severity::Critico,
            Some(format!("Expires in {} {}", days, plural_days(days))),
        )
    } else if days <= UPCOMING_DAYS {
        Assessment::new(
            Severity::Proximo,
            Some(format!("Expires in {} {}", days, plural_days(days))),
        )
    } else {
        Assessment::ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    fn in_days(n: i64) -> Option<NaiveDate> {
        Some(today() + Duration::days(n))
    }

    #[test]
    fn test_no_expiry_is_ok() {
        assert_eq!(classify_document(None, today()), Assessment::ok());
    }

    #[test]
    fn test_expired_yesterday() {
        let a = classify_document(in_days(-1), today());
        assert_eq!(a.severity, Severity::Vencido);
        assert_eq!(a.reason.as_deref(), Some("Expired 1 day ago"));
    }

    #[test]
    fn test_bands() {
        assert_eq!(classify_document(in_days(-30), today()).severity, Severity::Vencido);
        assert_eq!(classify_document(in_days(0), today()).severity, Severity::Critico);
        assert_eq!(classify_document(in_days(7), today()).severity, Severity::Critico);
        assert_eq!(classify_document(in_days(8), today()).severity, Severity::Proximo);
        assert_eq!(classify_document(in_days(15), today()).severity, Severity::Proximo);
        assert_eq!(classify_document(in_days(16), today()).severity, Severity::Ok);
    }

    #[test]
    fn test_reason_text() {
        assert_eq!(
            classify_document(in_days(1), today()).reason.as_deref(),
            Some("Expires in 1 day")
        );
        assert_eq!(
            classify_document(in_days(12), today()).reason.as_deref(),
            Some("Expires in 12 days")
        );
        assert_eq!(
            classify_document(in_days(-40), today()).reason.as_deref(),
            Some("Expired 40 days ago")
        );
        assert_eq!(classify_document(in_days(90), today()).reason, None);
    }

    #[test]
    fn test_across_month_boundary() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 27).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let a = classify_document(Some(expiry), today);
        assert_eq!(a.severity, Severity::Critico);
        assert_eq!(a.reason.as_deref(), Some("Expires in 3 days"));
    }
}
