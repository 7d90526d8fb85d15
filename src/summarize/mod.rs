//! Document summarizer
//!
//! Turns each Markdown document in a directory into a short list of the
//! high-level questions it answers, collected into one Markdown report.

pub mod meta_questions;

pub use meta_questions::{generation_params, MetaQuestionGenerator, SummaryReport};
