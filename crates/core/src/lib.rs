//! Pure domain rules for the DevAlign staffing platform.
//!
//! Everything in this crate is side-effect free: shared id/timestamp
//! aliases, the domain error taxonomy, role and status constants, and the
//! three rules with real decision content: staffing partition, tech-lead
//! capacity, and skill-transfer aggregation. Persistence lives in
//! `devalign-db`, delivery in `devalign-events`.

pub mod error;
pub mod roles;
pub mod skills;
pub mod staffing;
pub mod status;
pub mod tech_lead;
pub mod types;
