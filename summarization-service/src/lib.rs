//! summarization-service: generative summaries for Looker dashboards.
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod prompts;
pub mod services;
pub mod startup;
