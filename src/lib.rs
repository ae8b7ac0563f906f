pub mod auth;
pub mod catalog;
pub mod config;
pub mod controllers;
pub mod db;
pub mod email;
pub mod error;
pub mod markdown;
pub mod middlewares;
pub mod model;
pub mod routes;
pub mod startup;
pub mod state;
pub mod telemetry;
pub mod title;
