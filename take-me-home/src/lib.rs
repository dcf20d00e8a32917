//! Ferry-aware route planner.
//!
//! Answers: "Leaving now, which way home is fastest, and how likely am I to
//! miss the boat?" Candidate routes are chains of drive and ferry legs; each
//! is evaluated against its sailing schedule, scored, and ranked.

pub mod cache;
pub mod config;
pub mod domain;
pub mod live;
pub mod planner;
pub mod providers;
pub mod scoring;
pub mod web;
