//! The integration tests, each registered with the test inventory

mod access;
mod mint;
mod timelock;
