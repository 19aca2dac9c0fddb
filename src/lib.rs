//! # DSOG Franchise Portal
//!
//! `dsog-portal` is the command-line client for the DSOG franchise portal. It
//! signs franchisees in (password or Google Sign-In), keeps the resulting
//! session on disk, and wraps the backend operations franchisees use day to
//! day: products, orders, marketing materials, operational updates and stats.
//!
//! ## Google Sign-In gate
//!
//! Before a Google credential is forwarded to the backend, its payload is
//! decoded (the signature is **not** verified here; the backend does that) and
//! the identity is checked against a static allow-list of emails and domains.
//! See [`portal::gate`] for the exact precedence rules.
//!
//! ## Backend
//!
//! The backend is a single URL that dispatches on an `action` query parameter.
//! Every response is a JSON envelope with a `success` flag and an optional
//! `message`.

pub mod cli;
pub mod portal;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
