//! Time-series utilities for the half-hour pipeline.
//!
//! Modules include:
//! - `slot`: floor instants to canonical half-hour slots and bucket observations
//! - `align`: merge several series onto one row per slot
//! - `normalize`: min-max scaling over the observed window
/// Series alignment under a [`JoinPolicy`](crate::JoinPolicy).
pub mod align;
/// Min-max normalization.
pub mod normalize;
/// Half-hour slot flooring and bucketing.
pub mod slot;
