//! Route tree.
//!
//! ```text
//! GET  /health           service + interpreter health
//! GET  /                 editor page
//! POST /generate-chart   run code, return image / message / error
//! ```

pub mod chart;
pub mod health;
