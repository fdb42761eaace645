//! Integration tests for storerate
//!
//! These tests verify the interaction between multiple components
//! and test real system behavior without mocking.

pub mod authorization_flow_tests;
pub mod config_validation_tests;
pub mod database_tests;
