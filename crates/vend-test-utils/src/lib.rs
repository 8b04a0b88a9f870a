//! Shared test utilities for the vend workspace.
//!
//! This crate provides standardised test fixtures so the crate test suites
//! do not each grow their own git setup code. It is a dev-dependency only.
//!
//! # Modules
//!
//! - [`git`]: git repository fixtures, including [`git::OriginRepo`], an
//!   upstream repository with commits, tags and branches to clone from
//! - [`workspace`]: [`workspace::TestWorkspace`] builder for a project
//!   directory with a `vend.yml` manifest

pub mod git;
pub mod workspace;
