// blockclean/src/lib.rs
//! # BlockClean CLI Application
//!
//! This crate provides the command-line interface for `blockclean-core`: it
//! validates block documents against a schema and writes out sanitized blocks.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
