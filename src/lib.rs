//! Scorelens: Student Performance Analytics
//!
//! A library for loading a student performance dataset, filtering it by
//! categorical factors, and deriving the summary metrics, score bands,
//! correlations and insights an analytics dashboard shows.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
