//! Tests for the allocation heuristic.

use ecollajta::error::AllocationError;
use ecollajta::models::{StageKind, StageTimings, DEFAULT_MAX_MOLDS, MIN_TOTAL_WORKERS};
use ecollajta::optimizer::{allocate, calculate_materials, drying_time, round2};

fn defaults() -> StageTimings {
    StageTimings::default()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn test_insufficient_workers() {
    for workers in 0..MIN_TOTAL_WORKERS {
        let result = allocate(20, workers, &defaults(), DEFAULT_MAX_MOLDS);
        assert_eq!(
            result,
            Err(AllocationError::InsufficientWorkers {
                available: workers,
                required: 9
            })
        );
    }
}

#[test]
fn test_minimum_crew_matches_stage_minimums() {
    let sum: u32 = StageKind::ALL.iter().map(|s| s.min_workers()).sum();
    assert_eq!(sum, MIN_TOTAL_WORKERS);
}

#[test]
fn test_exact_minimum_crew_has_no_refinement() {
    let plan = allocate(23, 9, &defaults(), DEFAULT_MAX_MOLDS).unwrap();

    assert_eq!(plan.leftover_workers, 0);
    assert_eq!(plan.molds_required, 5);
    for stage in &plan.stages {
        assert_eq!(stage.workers, stage.min_workers);
    }
    // ceil(23 / 5) = 5 cycles
    assert_close(plan.stage(StageKind::Drying).unwrap().time, 175.0);
}

#[test]
fn test_golden_twenty_pots_eleven_workers() {
    let plan = allocate(20, 11, &defaults(), DEFAULT_MAX_MOLDS).unwrap();

    // Both spare workers go to molds: drying (140) outlasts mixing (26.4)
    assert_eq!(plan.leftover_workers, 0);
    assert_eq!(plan.molds_required, 7);

    let times: Vec<f64> = plan.stages.iter().map(|s| s.time).collect();
    let expected = [36.0, 23.4, 0.71, 26.4, 105.0, 3.6];
    for (actual, expected) in times.iter().zip(expected) {
        assert_close(*actual, expected);
    }
    assert_close(plan.total_time, 195.11);

    let workers: Vec<u32> = plan.stages.iter().map(|s| s.workers).collect();
    assert_eq!(workers, vec![2, 2, 3, 2, 0, 2]);
    assert_eq!(plan.assigned_workers(), 11);
}

#[test]
fn test_stage_order_and_labels() {
    let plan = allocate(20, 11, &defaults(), DEFAULT_MAX_MOLDS).unwrap();

    let kinds: Vec<StageKind> = plan.stages.iter().map(|s| s.stage).collect();
    assert_eq!(kinds, StageKind::ALL.to_vec());
    assert_eq!(plan.stages[0].name, "Grinding");
    assert_eq!(plan.stages[0].equipment_name, "Mill");
    assert_eq!(plan.stages[4].equipment_name, "Occupied molds");
}

#[test]
fn test_drying_reports_mold_count() {
    let plan = allocate(20, 11, &defaults(), DEFAULT_MAX_MOLDS).unwrap();
    let drying = plan.stage(StageKind::Drying).unwrap();
    let greasing = plan.stage(StageKind::Greasing).unwrap();

    assert_eq!(drying.workers, 0);
    assert_eq!(drying.equipment, plan.molds_required);
    assert_eq!(greasing.equipment, plan.molds_required);
}

#[test]
fn test_generic_bottleneck_reduction_with_mold_cap() {
    // Cap of 5 molds blocks the mold path, so every spare worker goes to
    // the slowest equipment-scaled stage.
    let plan = allocate(20, 30, &defaults(), 5).unwrap();

    assert_eq!(plan.molds_required, 5);
    assert_eq!(plan.leftover_workers, 1);

    let workers: Vec<u32> = plan.stages.iter().map(|s| s.workers).collect();
    assert_eq!(workers, vec![10, 8, 1, 8, 0, 2]);

    let equipment: Vec<u32> = plan.stages.iter().map(|s| s.equipment).collect();
    assert_eq!(equipment, vec![5, 4, 5, 4, 5, 1]);

    assert_close(plan.stage(StageKind::Grinding).unwrap().time, 7.2);
    assert_close(plan.stage(StageKind::Measuring).unwrap().time, 5.85);
    assert_close(plan.stage(StageKind::MixingPouring).unwrap().time, 6.6);
    assert_close(plan.total_time, 164.25);
}

#[test]
fn test_bottleneck_tie_goes_to_earlier_stage() {
    // Grinding and measuring take the same time; grinding is declared first.
    let timings = StageTimings {
        grinding: 2.0,
        measuring: 2.0,
        ..defaults()
    };
    let plan = allocate(20, 11, &timings, 5).unwrap();

    assert_eq!(plan.stage(StageKind::Grinding).unwrap().workers, 4);
    assert_eq!(plan.stage(StageKind::Measuring).unwrap().workers, 2);
    assert_eq!(plan.leftover_workers, 0);
}

#[test]
fn test_leftover_when_bottleneck_needs_more_workers() {
    // One spare worker cannot staff a second mill.
    let plan = allocate(20, 10, &defaults(), 5).unwrap();

    assert_eq!(plan.leftover_workers, 1);
    assert_eq!(plan.assigned_workers(), 9);
}

#[test]
fn test_mold_preference_is_a_heuristic() {
    // With 5 pots a single drying cycle is already reached, yet drying still
    // outlasts mixing so spare workers keep going to molds.
    let plan = allocate(5, 12, &defaults(), DEFAULT_MAX_MOLDS).unwrap();

    assert_eq!(plan.molds_required, 8);
    assert_close(plan.stage(StageKind::Drying).unwrap().time, 35.0);
    assert_eq!(plan.stage(StageKind::Grinding).unwrap().workers, 2);
}

#[test]
fn test_mold_cap_is_respected() {
    let plan = allocate(200, 100, &defaults(), 12).unwrap();
    assert!(plan.molds_required <= 12);
    assert_eq!(plan.stage(StageKind::Drying).unwrap().equipment, plan.molds_required);
}

#[test]
fn test_allocation_invariants() {
    for units in [1, 5, 20, 57, 150] {
        for workers in 9..60 {
            let plan = allocate(units, workers, &defaults(), DEFAULT_MAX_MOLDS).unwrap();
            assert!(plan.assigned_workers() + plan.leftover_workers <= workers);
            for stage in &plan.stages {
                assert!(stage.workers >= stage.min_workers, "{} under-staffed", stage.name);
                assert!(stage.equipment >= 1);
            }
        }
    }
}

#[test]
fn test_more_workers_never_slower() {
    for units in [1, 7, 20, 64, 300] {
        let mut previous = f64::INFINITY;
        for workers in 9..80 {
            let plan = allocate(units, workers, &defaults(), DEFAULT_MAX_MOLDS).unwrap();
            assert!(
                plan.total_time <= previous + 1e-9,
                "{} pots: {} workers took {} > {}",
                units,
                workers,
                plan.total_time,
                previous
            );
            previous = plan.total_time;
        }
    }
}

#[test]
fn test_more_units_never_faster() {
    for workers in [9, 11] {
        let mut previous = 0.0;
        for units in 1..=120 {
            let plan = allocate(units, workers, &defaults(), DEFAULT_MAX_MOLDS).unwrap();
            assert!(
                plan.total_time + 1e-9 >= previous,
                "{} workers: {} pots took {} < {}",
                workers,
                units,
                plan.total_time,
                previous
            );
            previous = plan.total_time;
        }
    }
}

#[test]
fn test_allocation_is_deterministic() {
    let first = allocate(37, 23, &defaults(), DEFAULT_MAX_MOLDS).unwrap();
    let second = allocate(37, 23, &defaults(), DEFAULT_MAX_MOLDS).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_zero_units() {
    let plan = allocate(0, 11, &defaults(), DEFAULT_MAX_MOLDS).unwrap();
    assert_close(plan.total_time, 0.0);
    assert_eq!(plan.molds_required, 1);
}

#[test]
fn test_drying_time_batches() {
    assert_close(drying_time(23, 5, 35.0), 5.0 * 35.0);
    assert_close(drying_time(23, 5, 17.0), 85.0);
    assert_close(drying_time(5, 5, 35.0), 35.0);
    assert_close(drying_time(0, 5, 35.0), 0.0);
}

#[test]
fn test_materials_scale_linearly() {
    let materials = calculate_materials(100);
    assert_close(materials.eggshell_kg, 17.5);
    assert_close(materials.alginate_kg, 1.8);
    assert_close(materials.water_l, 14.0);
    assert_close(materials.oil_l, 1.0);

    let none = calculate_materials(0);
    assert_close(none.eggshell_kg, 0.0);
}

#[test]
fn test_plan_includes_materials() {
    let plan = allocate(100, 9, &defaults(), DEFAULT_MAX_MOLDS).unwrap();
    assert_eq!(plan.materials, calculate_materials(100));
}

#[test]
fn test_round2() {
    assert_close(round2(0.714285), 0.71);
    assert_close(round2(1.006), 1.01);
    assert_close(round2(195.11), 195.11);
}

#[test]
fn test_capped_mold_pool_leaves_other_stages_eligible() {
    // Greasing becomes the slowest stage once the others are relieved, but
    // with the pool at its cap the spare workers go to the remaining stages.
    let plan = allocate(20, 200, &defaults(), 5).unwrap();

    assert_eq!(plan.molds_required, 5);
    let greasing = plan.stage(StageKind::Greasing).unwrap();
    assert_eq!(greasing.workers, 1);
    assert_eq!(greasing.equipment, 5);

    // Every other candidate needs 2 workers per unit and 191 are spare
    assert_eq!(plan.leftover_workers, 1);
    assert_eq!(plan.assigned_workers(), 199);
    for kind in [
        StageKind::Grinding,
        StageKind::Measuring,
        StageKind::MixingPouring,
        StageKind::Unmolding,
    ] {
        assert!(plan.stage(kind).unwrap().time < greasing.time);
    }
}

#[test]
fn test_greasing_bottleneck_grows_mold_pool() {
    let timings = StageTimings {
        greasing: 5.0,
        drying: 1.0,
        ..defaults()
    };
    let plan = allocate(20, 17, &timings, DEFAULT_MAX_MOLDS).unwrap();

    let greasing = plan.stage(StageKind::Greasing).unwrap();
    let drying = plan.stage(StageKind::Drying).unwrap();

    assert_eq!(plan.molds_required, 6);
    assert_eq!(greasing.workers, 2);
    assert_eq!(greasing.equipment, 6);
    assert_close(greasing.time, 16.67);
    assert_eq!(drying.equipment, 6);
    // ceil(20 / 6) = 4 cycles of 1 minute
    assert_close(drying.time, 4.0);
    assert_eq!(plan.leftover_workers, 1);
}
