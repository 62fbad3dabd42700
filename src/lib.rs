//! School environment survey service.
//!
//! Collects questionnaire answers from guardians, teachers and students,
//! stores each submission as one row in Postgres, and serves a school-name
//! autocomplete over the school directory table.
//!
//! The server side lives in [`server`], [`routes`] and [`db`]. The client
//! side, used by the questionnaire front end, lives in [`form`], [`client`]
//! and [`autocomplete`].

pub mod autocomplete;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod form;
pub mod models;
pub mod questionnaire;
pub mod routes;
pub mod server;
pub mod state;
