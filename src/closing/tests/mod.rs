//! Unit and service tests for the closing workflow.

mod case_tests;
