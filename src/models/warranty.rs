//! Cálculo del ciclo de vida de garantías
//!
//! Un vehículo tiene hasta tres fechas límite (vehículo, batería y DMS). El
//! estado agregado y el texto de resumen se derivan de ellas en cada lectura;
//! nunca se guardan.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Días por debajo de los cuales una garantía se considera "por vencer"
pub const EXPIRING_SOON_DAYS: i64 = 30;

/// Estado de una sola fecha límite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarrantyStatus {
    None,
    Active,
    ExpiringSoon,
    Expired,
}

/// Estado agregado sobre las tres fechas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregateWarrantyStatus {
    NoWarranty,
    Active,
    ExpiringSoon,
    Expired,
}

/// Tipo de cobertura, en el orden fijo de presentación
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarrantyKind {
    Vehicle,
    Battery,
    Dms,
}

impl WarrantyKind {
    pub fn label(&self) -> &'static str {
        match self {
            WarrantyKind::Vehicle => "Vehicle",
            WarrantyKind::Battery => "Battery",
            WarrantyKind::Dms => "DMS",
        }
    }
}

/// Las tres fechas límite de un vehículo
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarrantyDates {
    #[serde(default)]
    pub vehicle: Option<NaiveDate>,
    #[serde(default)]
    pub battery: Option<NaiveDate>,
    #[serde(default)]
    pub dms: Option<NaiveDate>,
}

impl WarrantyDates {
    /// Pares (tipo, fecha) en orden Vehicle, Battery, DMS
    pub fn entries(&self) -> [(WarrantyKind, Option<NaiveDate>); 3] {
        [
            (WarrantyKind::Vehicle, self.vehicle),
            (WarrantyKind::Battery, self.battery),
            (WarrantyKind::Dms, self.dms),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.vehicle.is_none() && self.battery.is_none() && self.dms.is_none()
    }
}

/// Fecha de hoy en el calendario local del servidor
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Días de calendario entre hoy y la fecha límite (negativo si ya pasó)
pub fn days_remaining(deadline: NaiveDate, today: NaiveDate) -> i64 {
    deadline.signed_duration_since(today).num_days()
}

pub fn classify_warranty(deadline: Option<NaiveDate>, today: NaiveDate) -> WarrantyStatus {
    let Some(deadline) = deadline else {
        return WarrantyStatus::None;
    };
    let days = days_remaining(deadline, today);
    if days < 0 {
        WarrantyStatus::Expired
    } else if days < EXPIRING_SOON_DAYS {
        WarrantyStatus::ExpiringSoon
    } else {
        WarrantyStatus::Active
    }
}

/// EXPIRED tiene prioridad sobre todo lo demás, luego EXPIRING_SOON
pub fn aggregate_warranty_status(
    vehicle: Option<NaiveDate>,
    battery: Option<NaiveDate>,
    dms: Option<NaiveDate>,
    today: NaiveDate,
) -> AggregateWarrantyStatus {
    let statuses = [vehicle, battery, dms].map(|deadline| classify_warranty(deadline, today));

    if statuses.iter().all(|s| *s == WarrantyStatus::None) {
        AggregateWarrantyStatus::NoWarranty
    } else if statuses.contains(&WarrantyStatus::Expired) {
        AggregateWarrantyStatus::Expired
    } else if statuses.contains(&WarrantyStatus::ExpiringSoon) {
        AggregateWarrantyStatus::ExpiringSoon
    } else {
        AggregateWarrantyStatus::Active
    }
}

/// Texto tipo `"Vehicle: 120 days | Battery: Expired"`
pub fn warranty_summary_text(dates: &WarrantyDates, today: NaiveDate) -> String {
    if dates.is_empty() {
        return "No Warranty Set".to_string();
    }

    let parts: Vec<String> = dates
        .entries()
        .iter()
        .filter_map(|(kind, deadline)| {
            deadline.map(|deadline| {
                let days = days_remaining(deadline, today);
                if days < 0 {
                    format!("{}: Expired", kind.label())
                } else {
                    format!("{}: {} days", kind.label(), days)
                }
            })
        })
        .collect();

    parts.join(" | ")
}

/// Detalle de una fecha límite
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarrantyEntry {
    pub kind: WarrantyKind,
    pub deadline: Option<NaiveDate>,
    pub status: WarrantyStatus,
    /// Días restantes para mostrar, nunca negativos
    pub days_left: Option<i64>,
}

/// Vista derivada de la garantía de un vehículo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarrantyReport {
    pub status: AggregateWarrantyStatus,
    pub summary: String,
    pub entries: Vec<WarrantyEntry>,
    pub computed_for: NaiveDate,
}

impl WarrantyReport {
    pub fn compute(dates: &WarrantyDates, today: NaiveDate) -> Self {
        let entries = dates
            .entries()
            .iter()
            .map(|(kind, deadline)| WarrantyEntry {
                kind: *kind,
                deadline: *deadline,
                status: classify_warranty(*deadline, today),
                days_left: deadline.map(|d| days_remaining(d, today).max(0)),
            })
            .collect();

        Self {
            status: aggregate_warranty_status(dates.vehicle, dates.battery, dates.dms, today),
            summary: warranty_summary_text(dates, today),
            entries,
            computed_for: today,
        }
    }

    /// Menor número de días restantes entre las coberturas no vencidas
    pub fn nearest_days_left(&self) -> Option<i64> {
        self.entries
            .iter()
            .filter(|e| matches!(e.status, WarrantyStatus::Active | WarrantyStatus::ExpiringSoon))
            .filter_map(|e| e.days_left)
            .min()
    }
}

/// Variantes de presentación del badge de garantía
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeVariant {
    #[default]
    Compact,
    Detailed,
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTone {
    Success,
    Warning,
    Danger,
    Neutral,
}

/// Badge listo para pintar; la política vive en `WarrantyReport`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarrantyBadge {
    pub variant: BadgeVariant,
    pub status: AggregateWarrantyStatus,
    pub tone: BadgeTone,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl WarrantyBadge {
    pub fn render(report: &WarrantyReport, variant: BadgeVariant) -> Self {
        let (tone, label) = match report.status {
            AggregateWarrantyStatus::Active => (BadgeTone::Success, "Active"),
            AggregateWarrantyStatus::ExpiringSoon => (BadgeTone::Warning, "Expiring Soon"),
            AggregateWarrantyStatus::Expired => (BadgeTone::Danger, "Expired"),
            AggregateWarrantyStatus::NoWarranty => (BadgeTone::Neutral, "No Warranty"),
        };

        let text = match variant {
            BadgeVariant::Compact => None,
            BadgeVariant::Detailed => Some(report.summary.clone()),
            BadgeVariant::Table => report
                .nearest_days_left()
                .map(|days| format!("{} days left", days)),
        };

        Self {
            variant,
            status: report.status,
            tone,
            label: label.to_string(),
            text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
    }

    fn in_days(days: i64) -> Option<NaiveDate> {
        Some(today() + Duration::days(days))
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify_warranty(in_days(45), today()), WarrantyStatus::Active);
        assert_eq!(classify_warranty(in_days(10), today()), WarrantyStatus::ExpiringSoon);
        assert_eq!(classify_warranty(in_days(-1), today()), WarrantyStatus::Expired);
        assert_eq!(classify_warranty(None, today()), WarrantyStatus::None);
    }

    #[test]
    fn test_classify_thresholds_exact() {
        assert_eq!(classify_warranty(in_days(0), today()), WarrantyStatus::ExpiringSoon);
        assert_eq!(classify_warranty(in_days(29), today()), WarrantyStatus::ExpiringSoon);
        assert_eq!(classify_warranty(in_days(30), today()), WarrantyStatus::Active);
    }

    #[test]
    fn test_expired_takes_precedence() {
        assert_eq!(
            aggregate_warranty_status(in_days(400), in_days(-3), in_days(90), today()),
            AggregateWarrantyStatus::Expired
        );
        assert_eq!(
            aggregate_warranty_status(in_days(5), in_days(-3), None, today()),
            AggregateWarrantyStatus::Expired
        );
    }

    #[test]
    fn test_aggregate_expiring_and_active() {
        assert_eq!(
            aggregate_warranty_status(in_days(400), None, in_days(12), today()),
            AggregateWarrantyStatus::ExpiringSoon
        );
        assert_eq!(
            aggregate_warranty_status(None, in_days(31), None, today()),
            AggregateWarrantyStatus::Active
        );
    }

    #[test]
    fn test_no_warranty_only_when_all_absent() {
        assert_eq!(
            aggregate_warranty_status(None, None, None, today()),
            AggregateWarrantyStatus::NoWarranty
        );
        for dates in [
            (in_days(1), None, None),
            (None, in_days(-100), None),
            (None, None, in_days(365)),
        ] {
            assert_ne!(
                aggregate_warranty_status(dates.0, dates.1, dates.2, today()),
                AggregateWarrantyStatus::NoWarranty
            );
        }
    }

    #[test]
    fn test_summary_text() {
        let expired_only = WarrantyDates {
            vehicle: in_days(-1),
            ..Default::default()
        };
        assert_eq!(warranty_summary_text(&expired_only, today()), "Vehicle: Expired");

        let mixed = WarrantyDates {
            vehicle: in_days(120),
            battery: in_days(-40),
            dms: in_days(0),
        };
        assert_eq!(
            warranty_summary_text(&mixed, today()),
            "Vehicle: 120 days | Battery: Expired | DMS: 0 days"
        );

        assert_eq!(
            warranty_summary_text(&WarrantyDates::default(), today()),
            "No Warranty Set"
        );
    }

    #[test]
    fn test_report_clamps_display_days_only() {
        let dates = WarrantyDates {
            vehicle: in_days(-10),
            battery: in_days(20),
            dms: None,
        };
        let report = WarrantyReport::compute(&dates, today());
        assert_eq!(report.status, AggregateWarrantyStatus::Expired);
        assert_eq!(report.entries[0].status, WarrantyStatus::Expired);
        assert_eq!(report.entries[0].days_left, Some(0));
        assert_eq!(report.entries[1].days_left, Some(20));
        assert_eq!(report.entries[2].days_left, None);
        assert_eq!(report.nearest_days_left(), Some(20));
    }

    #[test]
    fn test_badge_variants_share_policy() {
        let dates = WarrantyDates {
            vehicle: in_days(200),
            battery: in_days(15),
            dms: None,
        };
        let report = WarrantyReport::compute(&dates, today());

        let compact = WarrantyBadge::render(&report, BadgeVariant::Compact);
        assert_eq!(compact.tone, BadgeTone::Warning);
        assert_eq!(compact.label, "Expiring Soon");
        assert!(compact.text.is_none());

        let detailed = WarrantyBadge::render(&report, BadgeVariant::Detailed);
        assert_eq!(detailed.status, compact.status);
        assert_eq!(
            detailed.text.as_deref(),
            Some("Vehicle: 200 days | Battery: 15 days")
        );

        let table = WarrantyBadge::render(&report, BadgeVariant::Table);
        assert_eq!(table.text.as_deref(), Some("15 days left"));
    }

    #[test]
    fn test_badge_without_warranty() {
        let report = WarrantyReport::compute(&WarrantyDates::default(), today());
        let badge = WarrantyBadge::render(&report, BadgeVariant::Table);
        assert_eq!(badge.tone, BadgeTone::Neutral);
        assert_eq!(badge.label, "No Warranty");
        assert!(badge.text.is_none());
    }
}
