//! Infrastructure Layer - PostgreSQL record store

pub mod postgres;
