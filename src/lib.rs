//! A package index for Python distributions.
//!
//! Packages own releases; releases own files and dependency rows. Every time
//! a release is created its package's releases are re-ranked so that `order`
//! reflects version order, with unparseable ("dated") versions first.

pub mod commands;
pub mod domain;
pub mod error;
pub mod runtime;
pub mod storage;
pub mod store;
pub mod urls;
pub mod version;
