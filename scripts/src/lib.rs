//! Scripts for deploying, migrating and administering the kitchen game contracts.

#![deny(missing_docs)]

pub mod admin;
pub mod artifacts;
pub mod cli;
mod commands;
pub mod config;
pub mod constants;
pub mod context;
pub mod deployments;
pub mod errors;
pub mod migrations;
pub mod proxy;
#[allow(missing_docs)]
pub mod solidity;
pub mod timelock;
pub mod types;
pub mod utils;
