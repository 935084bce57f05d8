pub mod auth;
pub mod catalog;
pub mod config;
pub mod controllers;
pub mod db;
pub mod deadline;
pub mod error;
pub mod favorites;
pub mod middlewares;
pub mod model;
pub mod response;
pub mod routes;
pub mod startup;
pub mod state;
pub mod telemetry;
