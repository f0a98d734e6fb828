//! Front end for the Job and Sales entities of the REST backend.
//!
//! - `rest_client`: the one HTTP client, endpoint computation, request options
//! - `models`: entity shapes, form adapters and field validation
//! - `entities`: entity services, routing resolver, list/update/delete controllers
//! - `routes`: route table, route snapshots and navigation history
//! - `cli`: terminal front end driving the routes

pub mod cli;
pub mod config;
pub mod entities;
pub mod errors;
pub mod models;
pub mod rest_client;
pub mod routes;

#[cfg(test)]
mod testing;
