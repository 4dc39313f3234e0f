//! # Connect Four
//!
//! Connect Four against a computer opponent that picks its moves with
//! depth-limited minimax search and alpha-beta pruning.
//!
//! ## Modules
//!
//! - [`game`] — Core game logic: board, player, game state
//! - [`ai`] — Static evaluator and minimax search
//! - [`config`] — Difficulty presets, TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
