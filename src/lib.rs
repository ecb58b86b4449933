//! Core library for the reward-tally command line application.
//!
//! The library aggregates partitioned reward exports into two artifacts: an
//! on-chain table of token amounts and eligibility flags per address, and a
//! display table of tiers per category. Row checks live under [`validate`],
//! the accumulation rules in [`aggregate`], file adapters under [`io`], the
//! fixed export layout in [`sources`], and the end-to-end pass in [`run`].

pub mod aggregate;
pub mod error;
pub mod io;
pub mod model;
pub mod run;
pub mod sources;
pub mod validate;

pub use error::{Result, ToolError};
