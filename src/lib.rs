//! folio: backend for a personal portfolio site.
//!
//! Visitors submit reviews and contact requests; the owner uploads projects
//! and skills. List reads go through a shared expiring cache.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
