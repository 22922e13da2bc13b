//! Worker and equipment allocation for the EcoLlajta production line.
//!
//! This module contains the core optimization logic: a greedy heuristic that
//! repeatedly adds equipment to the slowest stage, plus a special case that
//! grows the shared mold pool while drying outlasts mixing.
//!
//! The heuristic is not guaranteed to be optimal. In particular, preferring
//! molds whenever drying is slower than mixing can spend workers on molds
//! that no longer shorten the drying cycle count.

use tracing::{debug, info};

use crate::error::AllocationError;
use crate::models::{
    AllocationPlan, Materials, Stage, StageKind, StageResult, StageTimings, INITIAL_MOLDS,
    MIN_TOTAL_WORKERS,
};

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Total drying time for `units` pots when `molds` can dry at once.
///
/// Only `molds` pots dry simultaneously, so drying runs in sequential
/// cycles of `cycle_minutes` each.
///
/// # Example
///
/// ```
/// use ecollajta::optimizer::drying_time;
///
/// assert_eq!(drying_time(23, 5, 35.0), 175.0);
/// assert_eq!(drying_time(20, 20, 35.0), 35.0);
/// ```
pub fn drying_time(units: u32, molds: u32, cycle_minutes: f64) -> f64 {
    let cycles = units.div_ceil(molds.max(1));
    cycles as f64 * cycle_minutes
}

/// Current duration of a stage in minutes.
///
/// # Arguments
///
/// * `stage` - The stage to evaluate
/// * `units` - Number of pots being produced
/// * `molds` - Molds currently in flight
/// * `timings` - Resolved stage timings (drying cycle length comes from here)
pub fn stage_time(stage: &Stage, units: u32, molds: u32, timings: &StageTimings) -> f64 {
    if stage.kind == StageKind::Drying {
        return drying_time(units, molds, timings.drying);
    }
    if stage.fixed {
        return stage.base_time;
    }
    stage.base_time / stage.equip.max(1) as f64
}

/// Calculates the raw materials for `units` pots.
///
/// # Example
///
/// ```
/// use ecollajta::optimizer::calculate_materials;
///
/// let materials = calculate_materials(100);
/// assert_eq!(materials.eggshell_kg, 17.5);
/// assert_eq!(materials.alginate_kg, 1.8);
/// ```
pub fn calculate_materials(units: u32) -> Materials {
    let units = units as f64;
    Materials {
        eggshell_kg: round2(units * 0.175),
        alginate_kg: round2(units * 0.018),
        water_l: round2(units * 0.14),
        oil_l: round2(units * 0.01),
    }
}

/// Index of the slowest stage that can still take more equipment.
///
/// Drying is never a candidate, and greasing drops out once the mold pool
/// is at `max_molds`. Ties go to the earliest stage.
fn find_bottleneck(
    stages: &[Stage],
    units: u32,
    molds: u32,
    max_molds: u32,
    timings: &StageTimings,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, stage) in stages.iter().enumerate() {
        if stage.fixed || (stage.kind.uses_molds() && molds >= max_molds) {
            continue;
        }
        let time = stage_time(stage, units, molds, timings);
        match best {
            Some((_, best_time)) if time <= best_time => {}
            _ => best = Some((i, time)),
        }
    }
    best.map(|(i, _)| i)
}

/// Distributes workers and equipment across the production stages.
///
/// Every stage first receives its minimum crew. Remaining workers are then
/// spent one step at a time:
///
/// - While molds are below `max_molds` and drying takes longer than mixing,
///   one worker is spent on an extra mold, which shortens both greasing and
///   the number of drying cycles.
/// - Otherwise the slowest stage (excluding drying) receives one more
///   equipment unit together with the workers needed to run it.
///
/// The loop stops when no workers remain, no stage can take more equipment,
/// or the bottleneck needs more workers than are left.
///
/// # Arguments
///
/// * `units` - Number of pots to produce
/// * `total_workers` - Workers available
/// * `timings` - Resolved stage timings
/// * `max_molds` - Upper bound on molds that may be provisioned
///
/// # Errors
///
/// Returns [`AllocationError::InsufficientWorkers`] when fewer than
/// [`MIN_TOTAL_WORKERS`] workers are available.
///
/// # Example
///
/// ```
/// use ecollajta::models::{StageTimings, DEFAULT_MAX_MOLDS};
/// use ecollajta::optimizer::allocate;
///
/// let plan = allocate(20, 11, &StageTimings::default(), DEFAULT_MAX_MOLDS).unwrap();
/// assert_eq!(plan.leftover_workers, 0);
/// assert_eq!(plan.molds_required, 7);
///
/// assert!(allocate(20, 8, &StageTimings::default(), DEFAULT_MAX_MOLDS).is_err());
/// ```
pub fn allocate(
    units: u32,
    total_workers: u32,
    timings: &StageTimings,
    max_molds: u32,
) -> Result<AllocationPlan, AllocationError> {
    if total_workers < MIN_TOTAL_WORKERS {
        return Err(AllocationError::InsufficientWorkers {
            available: total_workers,
            required: MIN_TOTAL_WORKERS,
        });
    }

    let mut molds = units.min(INITIAL_MOLDS).max(1);

    let mut stages: Vec<Stage> = StageKind::ALL
        .iter()
        .map(|&kind| Stage::new(kind, units, timings, molds))
        .collect();
    let mut allocation: Vec<u32> = stages.iter().map(|s| s.min_workers).collect();

    let used: u32 = allocation.iter().sum();
    let mut remaining = total_workers
        .checked_sub(used)
        .ok_or(AllocationError::InsufficientWorkers {
            available: total_workers,
            required: used,
        })?;

    let greasing = StageKind::Greasing.index();
    let drying = StageKind::Drying.index();
    let mixing = StageKind::MixingPouring.index();

    while remaining > 0 {
        if molds < max_molds {
            let drying_minutes = stage_time(&stages[drying], units, molds, timings);
            let mixing_minutes = stage_time(&stages[mixing], units, molds, timings);

            if drying_minutes > mixing_minutes {
                molds += 1;
                remaining -= 1;
                allocation[greasing] += 1;
                stages[greasing].equip = molds;
                stages[drying].equip = molds;
                debug!(molds, remaining, drying_minutes, mixing_minutes, "added mold");
                continue;
            }
        }

        let Some(bottleneck) = find_bottleneck(&stages, units, molds, max_molds, timings) else {
            break;
        };
        let needed = stages[bottleneck].workers_per_equip;
        if needed == 0 || remaining < needed {
            break;
        }

        // Greasing equipment is the mold pool itself.
        if stages[bottleneck].kind.uses_molds() {
            molds += 1;
            stages[greasing].equip = molds;
            stages[drying].equip = molds;
        } else {
            stages[bottleneck].equip += 1;
        }
        allocation[bottleneck] += needed;
        remaining -= needed;
        debug!(
            stage = stages[bottleneck].kind.name(),
            equip = stages[bottleneck].equip,
            remaining,
            "relieved bottleneck"
        );
    }

    let results: Vec<StageResult> = stages
        .iter()
        .zip(&allocation)
        .map(|(stage, &workers)| StageResult {
            stage: stage.kind,
            name: stage.kind.name().to_string(),
            workers,
            min_workers: stage.min_workers,
            equipment: if stage.kind.uses_molds() { molds } else { stage.equip },
            equipment_name: stage.kind.equipment_name().to_string(),
            time: round2(stage_time(stage, units, molds, timings)),
        })
        .collect();

    let total_time = round2(results.iter().map(|r| r.time).sum());

    info!(units, total_workers, total_time, leftover = remaining, molds, "allocation complete");

    Ok(AllocationPlan {
        stages: results,
        total_time,
        leftover_workers: remaining,
        molds_required: molds,
        materials: calculate_materials(units),
    })
}
