//! loan-models: training and evaluation of loan risk models.
//!
//! This crate trains two models on LendingClub-style loan data — a "bad
//! loan" binary classifier and an "interest rate" regressor — then scores a
//! held-out validation frame, builds an empirical ROC curve with a Gini
//! coefficient, and writes a chart plus JSON summary records.
//!
//! Model fitting is delegated to pluggable backends behind the `LoanModel`
//! trait. The default build ships a pure-Rust gradient-boosting backend;
//! random-forest and deep-learning backends are behind feature flags to
//! avoid pulling in their dependencies unless explicitly enabled.
pub mod config;
pub mod curves;
pub mod data_handling;
pub mod error;
pub mod models;
pub mod report;
pub mod scoring;
pub mod trainer;
