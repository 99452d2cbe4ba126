//! `mockall` doubles of the repository functions, for tests in crates that
//! sit on top of the database layer.

pub mod repositories;
