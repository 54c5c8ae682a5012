//! Status classification engine
//!
//! Pure decision tables for maintenance and document urgency, plus the
//! aggregation used by the fleet dashboard. Nothing in here touches the
//! database; callers feed in mileages and dates.

pub mod document;
pub mod maintenance;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use document::classify_document;
pub use maintenance::classify_maintenance;

/// Urgency level of a maintenance record, document or whole unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Not enough data to evaluate
    SinDatos,
    Ok,
    Proximo,
    Critico,
    Vencido,
}

impl Severity {
    /// Numeric priority, higher is more urgent
    pub fn priority(self) -> u8 {
        match self {
            Severity::SinDatos => 0,
            Severity::Ok => 1,
            Severity::Proximo => 2,
            Severity::Critico => 3,
            Severity::Vencido => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::SinDatos => "SIN_DATOS",
            Severity::Ok => "OK",
            Severity::Proximo => "PROXIMO",
            Severity::Critico => "CRITICO",
            Severity::Vencido => "VENCIDO",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::SinDatos => "SIN DATOS",
            Severity::Ok => "OK",
            Severity::Proximo => "PRÓXIMO",
            Severity::Critico => "CRÍTICO",
            Severity::Vencido => "VENCIDO",
        }
    }

    /// CSS class used by the dashboard front-end
    pub fn css(self) -> String {
        format!("estado-{}", self.as_str().to_lowercase().replace('_', "-"))
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SIN_DATOS" => Ok(Severity::SinDatos),
            "OK" => Ok(Severity::Ok),
            "PROXIMO" => Ok(Severity::Proximo),
            "CRITICO" => Ok(Severity::Critico),
            "VENCIDO" => Ok(Severity::Vencido),
            _ => Err(format!("Invalid status code: {}", s)),
        }
    }
}

/// Result of a single classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Assessment {
    pub severity: Severity,
    /// Human-readable explanation, absent when there is nothing to report
    pub reason: Option<String>,
}

impl Assessment {
    pub fn new(severity: Severity, reason: Option<String>) -> Self {
        Self { severity, reason }
    }

    pub fn ok() -> Self {
        Self::new(Severity::Ok, None)
    }

    pub fn no_data() -> Self {
        Self::new(Severity::SinDatos, None)
    }

    pub fn priority(&self) -> u8 {
        self.severity.priority()
    }
}

/// Worst-of accumulator for one severity channel (vehicle or trailer)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ChannelStatus {
    pub severity: Severity,
    pub priority: u8,
    pub label: String,
    pub css: String,
    /// Reasons from every evaluated source, prefixed by the source name
    pub reasons: Vec<String>,
}

impl Default for ChannelStatus {
    fn default() -> Self {
        Self::from_severity(Severity::SinDatos, Vec::new())
    }
}

impl ChannelStatus {
    fn from_severity(severity: Severity, reasons: Vec<String>) -> Self {
        Self {
            severity,
            priority: severity.priority(),
            label: severity.label().to_string(),
            css: severity.css(),
            reasons,
        }
    }

    /// Fold one assessment into the channel, keeping the most urgent severity
    pub fn record(&mut self, source: &str, assessment: Assessment) {
        if assessment.severity.priority() > self.severity.priority() {
            *self = Self::from_severity(assessment.severity, std::mem::take(&mut self.reasons));
        }
        if let Some(reason) = assessment.reason {
            self.reasons.push(format!("{}: {}", source, reason));
        }
    }
}

/// Fold a list of `(source, assessment)` pairs into one channel
pub fn aggregate<'a, I>(assessments: I) -> ChannelStatus
where
    I: IntoIterator<Item = (&'a str, Assessment)>,
{
    let mut channel = ChannelStatus::default();
    for (source, assessment) in assessments {
        channel.record(source, assessment);
    }
    channel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        let ordered = [
            Severity::SinDatos,
            Severity::Ok,
            Severity::Proximo,
            Severity::Critico,
            Severity::Vencido,
        ];
        for pair in ordered.windows(2) {
            assert!(pair[0].priority() < pair[1].priority());
        }
    }

    #[test]
    fn test_parse_codes() {
        assert_eq!("vencido".parse::<Severity>(), Ok(Severity::Vencido));
        assert_eq!("SIN_DATOS".parse::<Severity>(), Ok(Severity::SinDatos));
        assert!("VENCIDA".parse::<Severity>().is_err());
    }

    #[test]
    fn test_css_class() {
        assert_eq!(Severity::Critico.css(), "estado-critico");
        assert_eq!(Severity::SinDatos.css(), "estado-sin-datos");
    }

    #[test]
    fn test_empty_channel_is_no_data() {
        let channel = aggregate(Vec::new());
        assert_eq!(channel.severity, Severity::SinDatos);
        assert_eq!(channel.priority, 0);
        assert!(channel.reasons.is_empty());
    }

    #[test]
    fn test_worst_severity_wins_and_reasons_accumulate() {
        let channel = aggregate(vec![
            ("Maintenance", Assessment::new(Severity::Proximo, Some("due in 5000 km".into()))),
            ("SOAP", Assessment::new(Severity::Vencido, Some("expired".into()))),
            ("SEGURO", Assessment::ok()),
            ("EXTINTOR", Assessment::new(Severity::Critico, Some("expires in 3 days".into()))),
        ]);

        assert_eq!(channel.severity, Severity::Vencido);
        assert_eq!(channel.priority, 4);
        assert_eq!(
            channel.reasons,
            vec![
                "Maintenance: due in 5000 km".to_string(),
                "SOAP: expired".to_string(),
                "EXTINTOR: expires in 3 days".to_string(),
            ]
        );
    }

    #[test]
    fn test_ok_document_lifts_no_data_maintenance() {
        let channel = aggregate(vec![
            ("Maintenance", Assessment::no_data()),
            ("PADRON", Assessment::ok()),
        ]);
        assert_eq!(channel.severity, Severity::Ok);
    }
}
