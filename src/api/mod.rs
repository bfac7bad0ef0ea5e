// API routes and handlers

pub mod auth;
pub mod health;
pub mod plan;
pub mod profile;
pub mod routes;
pub mod tools;
