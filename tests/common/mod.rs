#![allow(unused_imports)]
//! Shared test utilities for integration tests.
//!
//! # Modules
//!
//! - `fixtures`: on-disk source trees and the `shop` type registry
//! - `assertions`: assertion helpers over coverage reports

pub mod assertions;
pub mod fixtures;

pub use assertions::{assert_method_status, assert_ok, method_outcomes};
pub use fixtures::{quiet_config, shop, CallLog, Shop, SourceTree, SHOP_TYPES};
