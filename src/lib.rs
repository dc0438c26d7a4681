//! TIPSTER — Telegram value-betting tips bot
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod bot;
pub mod config;
pub mod engine;
pub mod llm;
pub mod odds;
pub mod presenter;
pub mod strategy;
pub mod types;
