//! Khamsa Travels blog library.
//!
//! A small travel blog: public post listing and search, a visitor feedback
//! form, and a password-gated admin area for writing posts and reading
//! feedback. Posts live in a JSON document; feedback and admin sessions live
//! in SQLite.

pub mod auth;
pub mod components;
pub mod config;
pub mod db;
pub mod feedback;
pub mod posts;
pub mod uploads;
pub mod web;
