//! quizflow-core: Quiz attempt engine, collaborator traits, and scoring
//! reconciliation.
//!
//! This crate defines the data model, the answer-selection and navigation
//! state machines, and the reconciliation of locally held answers with the
//! grading authority's response that the rest of quizflow builds on.

pub mod attempt;
pub mod error;
pub mod grading;
pub mod model;
pub mod navigation;
pub mod parser;
pub mod reconcile;
pub mod result;
pub mod selection;
pub mod traits;
