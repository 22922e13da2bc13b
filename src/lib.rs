//! # EcoLlajta
//!
//! A command-line tool and library for allocating workers and equipment on
//! the EcoLlajta production line, which molds biodegradable pots from
//! ground eggshell and alginate.
//!
//! Production runs through six sequential stages: grinding, measuring,
//! greasing, mixing-pouring, drying and unmolding. Given a number of pots and
//! the workers available, the optimizer decides how many workers and how
//! much parallel equipment each stage gets so the total production time is
//! as short as the greedy heuristic can make it.
//!
//! ## Modules
//!
//! - [`models`] - Stages, timing configuration and allocation results
//! - [`data`] - Timing configuration loading (CSV and JSON)
//! - [`optimizer`] - The allocation heuristic and materials bill
//! - [`display`] - Output formatting and display utilities
//! - [`error`] - Error types
//! - [`wasm`] - JSON bindings for the web form
//!
//! ## Example Usage
//!
//! ```
//! use ecollajta::{
//!     models::{TimingConfig, DEFAULT_MAX_MOLDS},
//!     optimizer::allocate,
//! };
//!
//! let timings = TimingConfig::default().resolve();
//!
//! // 20 pots with 11 workers
//! let plan = allocate(20, 11, &timings, DEFAULT_MAX_MOLDS).unwrap();
//!
//! assert!(plan.assigned_workers() + plan.leftover_workers <= 11);
//! println!("Total time: {} min", plan.total_time);
//! ```
//!
//! ## Drying
//!
//! Drying does not speed up with more workers. Only as many pots as there
//! are molds can dry at once, so the drying stage takes
//! `ceil(pots / molds)` cycles. The optimizer therefore buys extra molds
//! while drying is slower than mixing.

pub mod data;
pub mod display;
pub mod error;
pub mod models;
pub mod optimizer;
pub mod wasm;
