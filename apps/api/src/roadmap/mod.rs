// Career Roadmap Tracker
// Store, progress calculator, free-text parser and the mutation API on top.
// All LLM calls go through llm_client via the advisor.

pub mod advisor;
pub mod handlers;
pub mod models;
pub mod parser;
pub mod pg_store;
pub mod progress;
pub mod prompts;
pub mod service;
pub mod store;
