//! Data side of the dashboard chart plugins (waterfall, weighted tree).
//!
//! The host hands each plugin field metadata, query rows and option values;
//! this crate validates the query shape and turns the rows into chart-ready
//! structures. Drawing is left to the host-side renderer.
//!
//! Start at [`chart::Registry`] for the full update cycle, or call
//! [`waterfall::compute_bars`] / [`tree::build_tree`] directly.

#![deny(missing_docs)]

pub mod chart;
pub mod config;
pub mod fields;
pub mod format;
pub mod table;
pub mod tree;
pub mod validate;
pub mod waterfall;
