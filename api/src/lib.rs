//! HTTP host for the Garage authentication core
//!
//! Exposes login for users and workshops and refresh token rotation over
//! actix-web. Library exports exist for the integration tests.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod routes;
