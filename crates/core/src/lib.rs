//! Core business logic for Domus.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `wallet` - Per-user balance with guarded withdrawals
//! - `billing` - Bill categories, receipt numbers, subscription terms
//! - `auth` - Account roles and password hashing
//! - `profile` - Role-specific profile validation
//! - `catalog` - Service definitions, activation and request lifecycle
//! - `engagement` - Announcement audiences, issue reports, contracts

pub mod auth;
pub mod billing;
pub mod catalog;
pub mod engagement;
pub mod profile;
pub mod wallet;
