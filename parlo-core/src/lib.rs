//! Core library for Parlo, a personalized English learning path generator.
//!
//! The crate is organised around three seams:
//!
//! - [`llm`] defines the [`llm::GenerationProvider`] port plus the Ollama and
//!   OpenAI-compatible backends that produce structured JSON content.
//! - [`store`] defines the [`store::ContentStore`] port plus in-memory and
//!   JSON-file implementations that hold profiles, paths, lessons and
//!   vocabulary collections.
//! - [`pipeline`] drives the four-stage generation workflow (outline, lesson
//!   content, vocabulary, phrases) against those two ports.

pub mod config;
pub mod llm;
pub mod model;
pub mod pipeline;
pub mod store;

pub use config::AppConfig;
pub use pipeline::PathGenerator;
