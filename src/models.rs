//! Data models and structures for EcoLlajta.
//!
//! This module contains the production stages, the timing configuration
//! used to size them, and the allocation results produced by the optimizer.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AllocationError;

/// Workers needed to staff every stage at its minimum simultaneously.
pub const MIN_TOTAL_WORKERS: u32 = 9;

/// Default upper bound on the number of molds that may be provisioned.
pub const DEFAULT_MAX_MOLDS: u32 = 40;

/// Molds available before any optimization takes place.
pub const INITIAL_MOLDS: u32 = 5;

/// One of the six sequential steps of pot production.
///
/// Declaration order is the processing order and the tie-break order used
/// when two stages are equally slow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Grinding,
    Measuring,
    Greasing,
    MixingPouring,
    Drying,
    Unmolding,
}

impl StageKind {
    /// All stages in processing order.
    pub const ALL: [StageKind; 6] = [
        StageKind::Grinding,
        StageKind::Measuring,
        StageKind::Greasing,
        StageKind::MixingPouring,
        StageKind::Drying,
        StageKind::Unmolding,
    ];

    /// Position of the stage in [`StageKind::ALL`].
    pub fn index(&self) -> usize {
        match self {
            StageKind::Grinding => 0,
            StageKind::Measuring => 1,
            StageKind::Greasing => 2,
            StageKind::MixingPouring => 3,
            StageKind::Drying => 4,
            StageKind::Unmolding => 5,
        }
    }

    /// Human-readable stage name.
    pub fn name(&self) -> &'static str {
        match self {
            StageKind::Grinding => "Grinding",
            StageKind::Measuring => "Measuring",
            StageKind::Greasing => "Greasing",
            StageKind::MixingPouring => "Mixing-Pouring",
            StageKind::Drying => "Drying",
            StageKind::Unmolding => "Unmolding",
        }
    }

    /// Label of the parallel equipment unit used by this stage.
    pub fn equipment_name(&self) -> &'static str {
        match self {
            StageKind::Grinding => "Mill",
            StageKind::Measuring => "Scale",
            StageKind::Greasing => "Molds",
            StageKind::MixingPouring => "Bowl",
            StageKind::Drying => "Occupied molds",
            StageKind::Unmolding => "Table",
        }
    }

    /// Workers required for the stage to operate at all.
    pub fn min_workers(&self) -> u32 {
        match self {
            StageKind::Greasing => 1,
            StageKind::Drying => 0,
            _ => 2,
        }
    }

    /// Workers needed to run one additional equipment unit.
    pub fn workers_per_equip(&self) -> u32 {
        match self {
            StageKind::Greasing => 1,
            StageKind::Drying => 0,
            _ => 2,
        }
    }

    /// Whether the stage duration ignores its equipment count.
    ///
    /// Drying depends on how many molds are in flight, not on equipment
    /// scaling, so it is never picked as a bottleneck.
    pub fn is_fixed(&self) -> bool {
        matches!(self, StageKind::Drying)
    }

    /// Whether the stage's equipment is the shared mold pool.
    pub fn uses_molds(&self) -> bool {
        matches!(self, StageKind::Greasing | StageKind::Drying)
    }

    /// Parses a stage key as used in timing files.
    ///
    /// Accepts the snake_case English key and the original Spanish key,
    /// case-insensitively.
    ///
    /// # Example
    ///
    /// ```
    /// use ecollajta::models::StageKind;
    ///
    /// assert_eq!(StageKind::from_key("grinding"), Some(StageKind::Grinding));
    /// assert_eq!(StageKind::from_key("Secado"), Some(StageKind::Drying));
    /// assert_eq!(StageKind::from_key("polishing"), None);
    /// ```
    pub fn from_key(key: &str) -> Option<StageKind> {
        match key.trim().to_lowercase().as_str() {
            "grinding" | "triturado" => Some(StageKind::Grinding),
            "measuring" | "medicion" | "medición" => Some(StageKind::Measuring),
            "greasing" | "engrase" => Some(StageKind::Greasing),
            "mixing" | "mixing_pouring" | "mezcla" => Some(StageKind::MixingPouring),
            "drying" | "secado" => Some(StageKind::Drying),
            "unmolding" | "desmolde" => Some(StageKind::Unmolding),
            _ => None,
        }
    }
}

/// Optional per-stage timing overrides, in minutes.
///
/// Every stage time is per unit except drying, which is the duration of one
/// drying cycle. Missing, negative or non-numeric entries fall back to the
/// defaults in [`StageTimings`]. Unknown keys are ignored.
///
/// # Example
///
/// ```
/// use ecollajta::models::TimingConfig;
///
/// let config: TimingConfig = serde_json::from_str(r#"{"grinding": 2.0, "mezcla": "fast"}"#).unwrap();
/// let timings = config.resolve();
///
/// assert_eq!(timings.grinding, 2.0);
/// assert_eq!(timings.mixing, 1.32);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default, alias = "triturado", deserialize_with = "lenient_minutes", skip_serializing_if = "Option::is_none")]
    pub grinding: Option<f64>,
    #[serde(default, alias = "medicion", alias = "medición", deserialize_with = "lenient_minutes", skip_serializing_if = "Option::is_none")]
    pub measuring: Option<f64>,
    #[serde(default, alias = "engrase", deserialize_with = "lenient_minutes", skip_serializing_if = "Option::is_none")]
    pub greasing: Option<f64>,
    #[serde(default, alias = "mezcla", alias = "mixing_pouring", deserialize_with = "lenient_minutes", skip_serializing_if = "Option::is_none")]
    pub mixing: Option<f64>,
    #[serde(default, alias = "secado", deserialize_with = "lenient_minutes", skip_serializing_if = "Option::is_none")]
    pub drying: Option<f64>,
    #[serde(default, alias = "desmolde", deserialize_with = "lenient_minutes", skip_serializing_if = "Option::is_none")]
    pub unmolding: Option<f64>,
}

/// Accepts any JSON value, keeping only finite non-negative numbers.
fn lenient_minutes<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()).and_then(valid_minutes))
}

fn valid_minutes(minutes: f64) -> Option<f64> {
    if minutes.is_finite() && minutes >= 0.0 {
        Some(minutes)
    } else {
        None
    }
}

impl TimingConfig {
    /// Sets the override for one stage. Invalid values clear it.
    pub fn set(&mut self, stage: StageKind, minutes: f64) {
        let minutes = valid_minutes(minutes);
        match stage {
            StageKind::Grinding => self.grinding = minutes,
            StageKind::Measuring => self.measuring = minutes,
            StageKind::Greasing => self.greasing = minutes,
            StageKind::MixingPouring => self.mixing = minutes,
            StageKind::Drying => self.drying = minutes,
            StageKind::Unmolding => self.unmolding = minutes,
        }
    }

    /// Overlays every override present in `other` on top of `self`.
    pub fn merge(&mut self, other: &TimingConfig) {
        let pairs = [
            (StageKind::Grinding, other.grinding),
            (StageKind::Measuring, other.measuring),
            (StageKind::Greasing, other.greasing),
            (StageKind::MixingPouring, other.mixing),
            (StageKind::Drying, other.drying),
            (StageKind::Unmolding, other.unmolding),
        ];
        for (stage, minutes) in pairs {
            if let Some(minutes) = minutes {
                self.set(stage, minutes);
            }
        }
    }

    /// Fills every missing override with its default.
    pub fn resolve(&self) -> StageTimings {
        let defaults = StageTimings::default();
        StageTimings {
            grinding: self.grinding.unwrap_or(defaults.grinding),
            measuring: self.measuring.unwrap_or(defaults.measuring),
            greasing: self.greasing.unwrap_or(defaults.greasing),
            mixing: self.mixing.unwrap_or(defaults.mixing),
            drying: self.drying.unwrap_or(defaults.drying),
            unmolding: self.unmolding.unwrap_or(defaults.unmolding),
        }
    }
}

/// Concrete stage timings in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StageTimings {
    /// Grinding eggshells, per unit
    pub grinding: f64,
    /// Weighing ingredients, per unit
    pub measuring: f64,
    /// Greasing a mold, per unit
    pub greasing: f64,
    /// Mixing and pouring into molds, per unit
    pub mixing: f64,
    /// One full drying cycle
    pub drying: f64,
    /// Unmolding, per unit
    pub unmolding: f64,
}

impl Default for StageTimings {
    fn default() -> Self {
        StageTimings {
            grinding: 1.8,
            measuring: 1.17,
            greasing: 0.25,
            mixing: 1.32,
            drying: 35.0,
            unmolding: 0.18,
        }
    }
}

impl StageTimings {
    /// Minutes configured for the given stage.
    pub fn minutes(&self, stage: StageKind) -> f64 {
        match stage {
            StageKind::Grinding => self.grinding,
            StageKind::Measuring => self.measuring,
            StageKind::Greasing => self.greasing,
            StageKind::MixingPouring => self.mixing,
            StageKind::Drying => self.drying,
            StageKind::Unmolding => self.unmolding,
        }
    }
}

/// Working state of a stage during one allocation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub kind: StageKind,
    /// Total raw work in minutes (zero for drying, computed from cycles)
    pub base_time: f64,
    pub min_workers: u32,
    pub workers_per_equip: u32,
    /// Parallel equipment units currently assigned
    pub equip: u32,
    pub fixed: bool,
}

impl Stage {
    /// Builds a stage sized for `units` pots with `molds` molds in flight.
    pub fn new(kind: StageKind, units: u32, timings: &StageTimings, molds: u32) -> Self {
        let base_time = if kind.is_fixed() {
            0.0
        } else {
            timings.minutes(kind) * units as f64
        };
        Stage {
            kind,
            base_time,
            min_workers: kind.min_workers(),
            workers_per_equip: kind.workers_per_equip(),
            equip: if kind.uses_molds() { molds } else { 1 },
            fixed: kind.is_fixed(),
        }
    }
}

/// Final assignment for one stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageResult {
    pub stage: StageKind,
    pub name: String,
    pub workers: u32,
    pub min_workers: u32,
    pub equipment: u32,
    pub equipment_name: String,
    /// Stage duration in minutes, rounded to two decimals
    pub time: f64,
}

/// Raw materials needed for a production run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Materials {
    /// Ground eggshell, kg
    pub eggshell_kg: f64,
    /// Sodium alginate binder, kg
    pub alginate_kg: f64,
    /// Water, litres
    pub water_l: f64,
    /// Mold release oil, litres
    pub oil_l: f64,
}

/// A successful allocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationPlan {
    /// Per-stage results in processing order
    pub stages: Vec<StageResult>,
    /// Sum of the stage durations in minutes, rounded to two decimals
    pub total_time: f64,
    /// Workers left unassigned once no further improvement was possible
    pub leftover_workers: u32,
    /// Molds to provision
    pub molds_required: u32,
    pub materials: Materials,
}

impl AllocationPlan {
    /// Looks up the result for one stage.
    pub fn stage(&self, kind: StageKind) -> Option<&StageResult> {
        self.stages.iter().find(|s| s.stage == kind)
    }

    /// Total workers assigned across all stages.
    pub fn assigned_workers(&self) -> u32 {
        self.stages.iter().map(|s| s.workers).sum()
    }
}

/// Serialisable outcome of an optimization, success or failure.
///
/// On failure `error` holds the message, the stage list is empty and every
/// numeric field is zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationReport {
    pub error: Option<String>,
    pub stages: Vec<StageResult>,
    pub total_time: f64,
    pub leftover_workers: u32,
    pub molds_required: u32,
    pub materials: Option<Materials>,
}

impl From<Result<AllocationPlan, AllocationError>> for OptimizationReport {
    fn from(result: Result<AllocationPlan, AllocationError>) -> Self {
        match result {
            Ok(plan) => OptimizationReport {
                error: None,
                stages: plan.stages,
                total_time: plan.total_time,
                leftover_workers: plan.leftover_workers,
                molds_required: plan.molds_required,
                materials: Some(plan.materials),
            },
            Err(err) => OptimizationReport::failure(err.to_string()),
        }
    }
}

impl OptimizationReport {
    /// A failed report carrying only `message`.
    pub fn failure(message: impl Into<String>) -> Self {
        OptimizationReport {
            error: Some(message.into()),
            stages: vec![],
            total_time: 0.0,
            leftover_workers: 0,
            molds_required: 0,
            materials: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
