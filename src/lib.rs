//! Docent: codebase tutorial generator
//!
//! Runs a fixed pipeline of LLM analysis passes over a project's files and
//! turns the results into an ordered set of beginner-friendly tutorial
//! chapters plus an index with a dependency diagram. Every external call
//! goes through a content-addressed response cache, so re-running over
//! unchanged inputs is free.

pub mod cli;
pub mod core;
pub mod extract;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod schema;
