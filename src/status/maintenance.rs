//! Mileage-based maintenance classifier

use rust_decimal::Decimal;

use super::{Assessment, Severity};

/// Remaining kilometres at or below which maintenance is critical
pub const CRITICAL_KM: i64 = 3_000;

/// Remaining kilometres at or below which maintenance is coming up
pub const UPCOMING_KM: i64 = 10_000;

/// Kilometres left before the next service, if both readings are known.
/// Trailer mileage is fractional, so the difference is kept exact.
pub fn remaining_km(current_km: Option<Decimal>, next_due_km: Option<i32>) -> Option<Decimal> {
    Some(Decimal::from(next_due_km?) - current_km?)
}

/// Classify a unit's maintenance urgency from its current mileage and the
/// mileage at which the next service is due.
pub fn classify_maintenance(current_km: Option<Decimal>, next_due_km: Option<i32>) -> Assessment {
    let Some(remaining) = remaining_km(current_km, next_due_km) else {
        return Assessment::no_data();
    };

    if remaining < Decimal::ZERO {
        Assessment::new(
            Severity::Vencido,
            Some(format!("Overdue by {} km", (-remaining).normalize())),
        )
    } else if remaining <= Decimal::from(CRITICAL_KM) {
        Assessment::new(
            Severity::Critico,
            Some(format!("Due in {} km", remaining.normalize())),
        )
    } else if remaining <= Decimal::from(UPCOMING_KM) {
        Assessment::new(
            Severity::Proximo,
            Some(format!("Due in {} km", remaining.normalize())),
        )
    } else {
        Assessment::ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn km(value: &str) -> Option<Decimal> {
        Some(Decimal::from_str(value).unwrap())
    }

    fn severity(current: i64, due: i32) -> Severity {
        classify_maintenance(Some(Decimal::from(current)), Some(due)).severity
    }

    #[test]
    fn test_missing_data() {
        assert_eq!(classify_maintenance(None, Some(100_000)), Assessment::no_data());
        assert_eq!(classify_maintenance(km("90000"), None), Assessment::no_data());
        assert_eq!(classify_maintenance(None, None).priority(), 0);
    }

    #[test]
    fn test_overdue() {
        let a = classify_maintenance(km("100250"), Some(100_000));
        assert_eq!(a.severity, Severity::Vencido);
        assert_eq!(a.reason.as_deref(), Some("Overdue by 250 km"));
        assert_eq!(severity(100_001, 100_000), Severity::Vencido);
    }

    #[test]
    fn test_boundaries() {
        // remaining = 0 is due now, not overdue
        assert_eq!(severity(100_000, 100_000), Severity::Critico);
        assert_eq!(severity(97_000, 100_000), Severity::Critico);
        assert_eq!(severity(96_999, 100_000), Severity::Proximo);
        assert_eq!(severity(90_000, 100_000), Severity::Proximo);
        assert_eq!(severity(89_999, 100_000), Severity::Ok);
    }

    #[test]
    fn test_fractional_mileage() {
        let a = classify_maintenance(km("100000.5"), Some(100_000));
        assert_eq!(a.severity, Severity::Vencido);
        assert_eq!(a.reason.as_deref(), Some("Overdue by 0.5 km"));

        assert_eq!(classify_maintenance(km("100000.0"), Some(100_000)).severity, Severity::Critico);
        assert_eq!(classify_maintenance(km("96999.5"), Some(100_000)).severity, Severity::Proximo);
        assert_eq!(classify_maintenance(km("89999.5"), Some(100_000)).severity, Severity::Ok);
        assert_eq!(classify_maintenance(km("90000.0"), Some(100_000)).severity, Severity::Proximo);
    }

    #[test]
    fn test_reason_text() {
        let a = classify_maintenance(km("98500"), Some(100_000));
        assert_eq!(a.reason.as_deref(), Some("Due in 1500 km"));
        assert_eq!(classify_maintenance(km("0"), Some(50_000)).reason, None);
    }

    #[test]
    fn test_every_remaining_maps_to_one_band() {
        for remaining in -20_000i64..=20_000 {
            let s = severity(1_000_000 - remaining, 1_000_000);
            let expected = if remaining < 0 {
                Severity::Vencido
            } else if remaining <= CRITICAL_KM {
                Severity::Critico
            } else if remaining <= UPCOMING_KM {
                Severity::Proximo
            } else {
                Severity::Ok
            };
            assert_eq!(s, expected, "remaining = {}", remaining);
        }
    }
}
