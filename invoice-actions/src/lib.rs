//! Invoice Actions - validated invoice form mutations with listing revalidation
//! and credential sign-in.

pub mod actions;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
