// models.rs — All data types for the engine catalog.
//
// RUST NOTE: `derive` macros auto-generate trait implementations for us.
//   - `Serialize / Deserialize` (from serde) turn these structs into JSON for the
//     command layer and the reporting binary, and parse legacy JSON exports.
//   - `Debug`   lets you print them with `{:?}` for logging.
//   - `Clone`   lets you duplicate a value (Rust moves by default).

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Declares a fieldless enum that round-trips through a stable string form.
///
/// `as_str` is the form written to SQLite. `parse` accepts that form and also
/// the labels the old browser store wrote, so legacy exports import cleanly.
macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $variant:ident => $canonical:literal $(| $legacy:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// Convert to a string for SQLite storage.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $canonical ),+
                }
            }

            /// Parse a stored or legacy label. Unknown labels yield `None`.
            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $( $canonical $(| $legacy)* => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

labelled_enum! {
    /// Unit attached to a report's mileage. Hours and kilometers are different
    /// quantities; see `reliability::MileageSummary` for where they get mixed.
    pub enum MileageUnit {
        Hours      => "h"  | "Hours",
        Kilometers => "km" | "Kilometers",
    }
}

labelled_enum! {
    pub enum UsageStyle {
        Calm       => "Calm"       | "Спокойный",
        Casual     => "Casual"     | "Любительский",
        Aggressive => "Aggressive" | "Жёсткий / Спорт",
    }
}

labelled_enum! {
    pub enum UsageType {
        Enduro    => "Enduro"    | "Эндуро",
        Motocross => "Motocross" | "Кросс",
        PitBike   => "PitBike"   | "Питбайк",
        Mixed     => "Mixed"     | "Смешанный",
    }
}

labelled_enum! {
    /// Fixed failure taxonomy. Declaration order is the order used for
    /// zero-filled distributions.
    pub enum BreakdownCategory {
        Timing     => "Timing"     | "ГРМ",
        Piston     => "Piston"     | "ЦПГ",
        Gearbox    => "Gearbox"    | "КПП",
        Clutch     => "Clutch"     | "Сцепление",
        Starter    => "Starter"    | "Стартер",
        Fuel       => "Fuel"       | "Система питания",
        Overheat   => "Overheat"   | "Перегрев",
        Electrical => "Electrical" | "Электрика",
    }
}

labelled_enum! {
    /// Moderation state of a catalog engine. Only `Approved` engines are listed.
    pub enum EngineStatus {
        Pending  => "Pending"  | "pending",
        Approved => "Approved" | "approved",
        Rejected => "Rejected" | "rejected",
    }
}

labelled_enum! {
    pub enum CoolingType {
        Air    => "Air"    | "Воздушное",
        Oil    => "Oil"    | "Масляное",
        Liquid => "Liquid" | "Жидкостное",
    }
}

labelled_enum! {
    pub enum StrokeType {
        TwoStroke  => "2T" | "2Т",
        FourStroke => "4T" | "4Т",
    }
}

// ---------------------------------------------------------------------------
// Reliability reports
// ---------------------------------------------------------------------------

/// One user's field report about one engine. Never mutated after submission.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReliabilityReport {
    pub id:                  String,
    pub engine_id:           String,
    pub user_id:             String,
    pub mileage:             f64,
    pub mileage_unit:        MileageUnit,
    pub usage_style:         UsageStyle,
    pub usage_type:          UsageType,
    pub has_breakdowns:      bool,
    pub breakdown_categories: Vec<BreakdownCategory>,
    pub description:         String,
    pub maintenance_rating:  u8,                 // 1 – 5
    pub created_at:          String,             // RFC 3339, UTC
}

/// Submission payload, without id or timestamp.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReportInput {
    pub engine_id:           String,
    pub user_id:             String,
    pub mileage:             f64,
    pub mileage_unit:        MileageUnit,
    pub usage_style:         UsageStyle,
    pub usage_type:          UsageType,
    pub has_breakdowns:      bool,
    pub breakdown_categories: Vec<BreakdownCategory>,
    #[serde(default)]
    pub description:         String,
    pub maintenance_rating:  u8,
}

/// A report exactly as it sits in storage or in a legacy JSON export, before
/// any enum label has been checked. Keys are camelCase to match the exports.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawReport {
    pub id:                  String,
    pub engine_id:           String,
    pub user_id:             String,
    pub mileage:             f64,
    pub mileage_unit:        String,
    pub usage_style:         String,
    pub usage_type:          String,
    pub has_breakdowns:      bool,
    #[serde(default)]
    pub breakdown_categories: Vec<String>,
    #[serde(default)]
    pub description:         String,
    pub maintenance_rating:  i64,
    pub created_at:          String,
}

// ---------------------------------------------------------------------------
// Builds
// ---------------------------------------------------------------------------

/// A user-authored parts configuration around one catalog engine.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Build {
    pub id:          String,
    pub user_id:     String,
    pub user_name:   String,
    pub name:        String,
    pub engine_id:   String,
    pub frame:       String,
    pub carburetor:  String,
    pub exhaust:     String,
    pub gears:       String,          // e.g. "13/43"
    pub description: String,
    pub photos:      Vec<String>,     // file paths or URLs
    pub created_at:  String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BuildInput {
    pub user_id:     String,
    pub user_name:   String,
    pub name:        String,
    pub engine_id:   String,
    #[serde(default)]
    pub frame:       String,
    #[serde(default)]
    pub carburetor:  String,
    #[serde(default)]
    pub exhaust:     String,
    #[serde(default)]
    pub gears:       String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub photos:      Vec<String>,
}

// ---------------------------------------------------------------------------
// Engines
// ---------------------------------------------------------------------------

/// Catalog engine. `reliability_index` and `reports_count` are derived from
/// the report set whenever the active list is materialized; they are never
/// written to the database.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Engine {
    pub id:                String,
    pub name:              String,
    pub index:             String,          // manufacturer code, e.g. "YX150"
    pub brand:             String,
    pub volume:            u32,             // cc
    pub stroke:            StrokeType,
    pub cooling:           CoolingType,
    pub power:             f64,             // hp
    pub torque:            f64,             // Nm
    pub valves:            u8,
    pub timing_type:       String,
    pub fuel_system:       String,
    pub description:       String,
    pub status:            EngineStatus,
    pub author_id:         Option<String>,
    pub moderator_comment: Option<String>,
    pub created_at:        Option<String>,
    pub views:             Option<u64>,
    pub reliability_index: Option<u8>,
    pub reports_count:     Option<u32>,
}

/// User contribution payload for a new catalog engine.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EngineInput {
    pub name:        String,
    pub index:       String,
    pub brand:       String,
    pub volume:      u32,
    pub stroke:      StrokeType,
    pub cooling:     CoolingType,
    pub power:       f64,
    pub torque:      f64,
    pub valves:      u8,
    #[serde(default)]
    pub timing_type: String,
    #[serde(default)]
    pub fuel_system: String,
    #[serde(default)]
    pub description: String,
}

// ---------------------------------------------------------------------------
// Stats / leaderboards
// ---------------------------------------------------------------------------

/// Most frequent failure cause, or the "no data" sentinel when an engine has
/// no failure reports.
///
/// RUST NOTE: `into` / `try_from` make serde go through `String`, so the JSON
/// form is either a category label or the literal `"no data"`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(into = "String", try_from = "String")]
pub enum TopFailureReason {
    Category(BreakdownCategory),
    NoData,
}

impl TopFailureReason {
    pub const NO_DATA: &'static str = "no data";

    pub fn as_str(&self) -> &'static str {
        match self {
            TopFailureReason::Category(c) => c.as_str(),
            TopFailureReason::NoData      => Self::NO_DATA,
        }
    }
}

impl fmt::Display for TopFailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<TopFailureReason> for String {
    fn from(r: TopFailureReason) -> Self {
        r.as_str().to_string()
    }
}

impl TryFrom<String> for TopFailureReason {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s == Self::NO_DATA {
            return Ok(TopFailureReason::NoData);
        }
        BreakdownCategory::parse(&s)
            .map(TopFailureReason::Category)
            .ok_or_else(|| format!("unknown failure reason: {s}"))
    }
}

/// Per-engine aggregate. Pure function of (engine, all reports, all builds);
/// recomputed on every query and never persisted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EngineStats {
    pub engine_id:              String,
    pub engine_name:            String,
    pub brand:                  String,
    pub owners_count:           u32,
    pub builds_count:           u32,
    pub avg_mileage_to_failure: u64,
    pub failure_rate:           u32,     // %
    pub top_failure_reason:     TopFailureReason,
    pub reliability_score:      u8,      // 0 – 100
    pub popularity_score:       u64,     // relative ordering only
}

/// Detail-page summary of one engine's reports.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReportSummary {
    pub total:              u32,
    pub no_breakdowns:      u32,
    pub avg_mileage:        f64,
    pub breakdown_dist:     Vec<CategoryCount>,
}

/// A category → count pair used for chart data.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CategoryCount {
    pub category: BreakdownCategory,
    pub count:    u32,
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Result of importing a legacy JSON report export.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ImportOutcome {
    pub imported:  u32,
    pub skipped:   u32,              // ids already present
    pub rejected:  Vec<RejectedRecord>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RejectedRecord {
    pub position: usize,             // index in the imported array
    pub id:       Option<String>,
    pub reason:   String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_canonical_and_legacy_forms() {
        assert_eq!(BreakdownCategory::parse("Timing"), Some(BreakdownCategory::Timing));
        assert_eq!(BreakdownCategory::parse("ГРМ"), Some(BreakdownCategory::Timing));
        assert_eq!(MileageUnit::parse("h"), Some(MileageUnit::Hours));
        assert_eq!(UsageStyle::parse("Жёсткий / Спорт"), Some(UsageStyle::Aggressive));
        assert_eq!(EngineStatus::parse("approved"), Some(EngineStatus::Approved));
        assert_eq!(BreakdownCategory::parse("Carburetor"), None);
    }

    #[test]
    fn every_category_round_trips_through_as_str() {
        for c in BreakdownCategory::ALL {
            assert_eq!(BreakdownCategory::parse(c.as_str()), Some(*c));
        }
    }

    #[test]
    fn top_failure_reason_serializes_as_plain_string() {
        let json = serde_json::to_string(&TopFailureReason::NoData).unwrap();
        assert_eq!(json, "\"no data\"");

        let json = serde_json::to_string(&TopFailureReason::Category(BreakdownCategory::Clutch)).unwrap();
        assert_eq!(json, "\"Clutch\"");

        let back: TopFailureReason = serde_json::from_str("\"Clutch\"").unwrap();
        assert_eq!(back, TopFailureReason::Category(BreakdownCategory::Clutch));
    }
}
