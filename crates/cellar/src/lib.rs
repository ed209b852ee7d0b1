#![allow(clippy::missing_errors_doc)]

pub mod cli;
