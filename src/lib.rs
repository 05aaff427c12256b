//! Skirmish - World-State Core Library
//!
//! This crate provides the mutable-state core shared by the Skirmish
//! multiplayer server:
//! - Integer grid vectors and angular math between actors
//! - Entities with race-free health/mana mutation across worker threads
//! - Players with currency, an owned inventory, and the leveling state machine
//! - Packet send/receive events with ordered, failure-isolated dispatch
//! - An explicit scenario runner for server-level test orchestration
//!
//! Transport, wire formats, persistence, and the item catalog live in the
//! surrounding server crates; this core only carries the identities and
//! capabilities it needs from them (`ProtocolRef`, `MessageSink`).

pub mod config;
pub mod constants;
pub mod entity;
pub mod error;
pub mod events;
pub mod harness;
pub mod logging;
pub mod math;
pub mod player;
