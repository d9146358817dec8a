//! Backend for a local AI-marketing agency site: contact and lead-magnet capture backed by a
//! relational store, plus the scripted chat widget that runs on the landing pages.

pub mod chatbot;
pub mod config;
pub mod error;
pub mod submissions;
pub mod telemetry;
