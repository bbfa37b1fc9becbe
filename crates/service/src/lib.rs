//! `worklog-service` — the operation surface behind the RPC interface.
//!
//! Composes the access-control registry, profile store, and ledger store, and
//! applies the authorization policy to every call. Transport layers (HTTP,
//! tests) talk to [`WorklogService`] only.

pub mod facade;

pub use facade::WorklogService;
