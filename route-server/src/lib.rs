//! Transit route matching server.
//!
//! A web application that answers: "which bus line, or which pair of lines
//! with one transfer, takes me from this neighborhood to that one?"

pub mod catalog;
pub mod config;
pub mod domain;
pub mod geometry;
pub mod matcher;
pub mod regions;
pub mod sessions;
pub mod stops;
pub mod web;
