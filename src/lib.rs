// Chisel: chi-squared term selection for labeled text corpora.
//
// This is the library root. Each module corresponds to one stage of the
// selection pipeline or one of its collaborators.

pub mod config;
pub mod contingency;
pub mod corpus;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod runtime;
pub mod scoring;
pub mod selection;
pub mod text;
