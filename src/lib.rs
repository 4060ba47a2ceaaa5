// src/lib.rs

#[macro_use]
pub mod macros;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;

pub mod conformer;
pub mod gui;
pub mod log;
pub mod progress;
pub mod resolve;
pub mod results;
pub mod store;

pub use conformer::{ Conformer, Team, TeamId };
pub use resolve::{ ConsoleResolver, RejectResolver, Resolution, Resolver, ScriptedResolver };
