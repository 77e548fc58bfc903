//! Unit tests for the connection bounded context.

mod negotiator_tests;
mod trust_tests;
