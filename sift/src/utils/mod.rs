//! Utility functions shared by the compiler and its adapters

pub mod decode;
pub mod sql;
pub mod time;
