#![allow(clippy::too_many_arguments)]

pub mod error;
pub mod validation;
pub mod model;
pub mod db;
pub mod auth;
pub mod token;
pub mod ops;
pub mod queries;
pub mod signup;
pub mod config;
pub mod logging;
pub mod seed;
pub mod cli;
