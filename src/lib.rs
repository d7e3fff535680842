//! Palingua - Pali translation service backed by a hosted generative-model API
//!
//! Serves a single-page translation form and a small JSON API. Each
//! submission resolves one credential and one model variant, interpolates the
//! passage into an instruction template, performs a single remote generation
//! call, and memoizes the result by the exact passage string.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod generation;
pub mod handlers;
pub mod middleware;
pub mod prompt;
pub mod resolver;
pub mod telemetry;
