// Library root: exposes the application modules so the binary and the
// integration tests share one API.

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod db;
pub mod export;
