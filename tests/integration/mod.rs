//! Integration tests module
//!
//! This module contains the integration tests for the uplift CLI commands.

pub mod common;
pub mod compare;
pub mod config;
pub mod install;
pub mod releases;
