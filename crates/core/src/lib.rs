//! Domain logic for the chart generation service.
//!
//! Everything here is free of HTTP concerns: subprocess management lives in
//! [`scripting`], the plotting harness and result interpretation in
//! [`chart`].

pub mod chart;
pub mod error;
pub mod scripting;
