//! Inspection report generation and storage

pub mod pdf;
pub mod store;

use chrono::{DateTime, TimeZone};

use crate::models::enums::InspectionType;

pub use pdf::{render_inspection, InspectionReport, ReportHeader};
pub use store::{LocalReportStore, ReportStore, StoredReport};

/// Store-relative path of an inspection report:
/// `reports/<inspection-type>/report_<YYYYmmdd_HHMMSS>_<plate>_<inspection-id>.pdf`
pub fn report_file_name<Tz: TimeZone>(
    inspection_type: InspectionType,
    generated_at: &DateTime<Tz>,
    plate: &str,
    inspection_id: i32,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "reports/{}/report_{}_{}_{}.pdf",
        inspection_type.as_str(),
        generated_at.format("%Y%m%d_%H%M%S"),
        plate,
        inspection_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_report_file_name() {
        let at = Utc.with_ymd_and_hms(2026, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(
            report_file_name(InspectionType::Diaria, &at, "BBCL12", 41),
            "reports/DIARIA/report_20260309_070501_BBCL12_41.pdf"
        );
        assert_eq!(
            report_file_name(InspectionType::MantencionTecnica, &at, "AB1234", 7),
            "reports/MANTENCION_TECNICA/report_20260309_070501_AB1234_7.pdf"
        );
    }

    #[test]
    fn test_same_second_submissions_get_distinct_names() {
        let at = Utc.with_ymd_and_hms(2026, 3, 9, 7, 5, 1).unwrap();
        assert_ne!(
            report_file_name(InspectionType::Diaria, &at, "BBCL12", 41),
            report_file_name(InspectionType::Diaria, &at, "BBCL12", 42)
        );
    }
}
