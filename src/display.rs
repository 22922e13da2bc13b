//! Display and formatting utilities for EcoLlajta.
//!
//! This module provides functions for printing allocation plans to the
//! terminal in a readable format.

use crate::models::{AllocationPlan, Materials};
use crate::optimizer::round2;

/// Formats a duration in minutes to a human-readable string.
///
/// # Arguments
///
/// * `minutes` - Duration in minutes
///
/// # Returns
///
/// A formatted string like "3h 15m", "26.4 min" or "0.71 min"
///
/// # Example
///
/// ```
/// use ecollajta::display::format_minutes;
///
/// assert_eq!(format_minutes(195.0), "3h 15m");
/// assert_eq!(format_minutes(26.4), "26.4 min");
/// assert_eq!(format_minutes(120.0), "2h 0m");
/// ```
pub fn format_minutes(minutes: f64) -> String {
    let minutes = round2(minutes);
    if minutes >= 60.0 {
        let whole = minutes.round() as u64;
        format!("{}h {}m", whole / 60, whole % 60)
    } else {
        let text = format!("{:.2}", minutes);
        let text = text.trim_end_matches('0').trim_end_matches('.');
        format!("{} min", text)
    }
}

/// Displays a complete allocation plan to stdout.
///
/// This function prints:
/// - The per-stage assignment table
/// - Summary statistics (total time, leftover workers, molds)
/// - The materials bill
pub fn display_plan(plan: &AllocationPlan) {
    println!();
    println!("+================================================================+");
    println!("|            ECOLLAJTA PRODUCTION ALLOCATION RESULTS            |");
    println!("+================================================================+");
    println!();

    println!("[STAGE ASSIGNMENT]");
    println!("----------------------------------------------------------------");
    println!(
        "{:<16} {:>8} {:>6} {:>6}  {:<15} {:>8}",
        "Stage", "Workers", "Min", "Equip", "Equipment", "Minutes"
    );
    println!("----------------------------------------------------------------");
    for stage in &plan.stages {
        println!(
            "{:<16} {:>8} {:>6} {:>6}  {:<15} {:>8.2}",
            stage.name,
            stage.workers,
            stage.min_workers,
            stage.equipment,
            stage.equipment_name,
            stage.time
        );
    }

    println!();
    println!("[SUMMARY]");
    println!("----------------------------------------------------------------");
    println!(
        "  Total Time:       {:.2} min ({})",
        plan.total_time,
        format_minutes(plan.total_time)
    );
    println!("  Workers Assigned: {}", plan.assigned_workers());
    println!("  Leftover Workers: {}", plan.leftover_workers);
    println!("  Molds Required:   {}", plan.molds_required);

    if let Some(slowest) = plan
        .stages
        .iter()
        .max_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(std::cmp::Ordering::Equal))
    {
        println!("  Slowest Stage:    {} ({})", slowest.name, format_minutes(slowest.time));
    }

    display_materials(&plan.materials);
    println!();
}

/// Displays the raw materials bill.
pub fn display_materials(materials: &Materials) {
    println!();
    println!("[MATERIALS]");
    println!("----------------------------------------------------------------");
    println!("  Eggshell:         {:.2} kg", materials.eggshell_kg);
    println!("  Alginate:         {:.2} kg", materials.alginate_kg);
    println!("  Water:            {:.2} L", materials.water_l);
    println!("  Oil:              {:.2} L", materials.oil_l);
}
