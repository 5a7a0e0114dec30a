//! Hospital front-desk chat assistant.
//!
//! [`session::ChatSession`] owns a conversation and answers each send with
//! [`resolver::Resolver`], which prefers local keyword rules and otherwise
//! asks a remote model (Gemini by default), falling back to canned replies
//! whenever the remote side misbehaves.

pub mod ai;
pub mod config;
pub mod document;
pub mod resolver;
pub mod rules;
pub mod session;
pub mod types;
