//! Web dashboard layer for browser-based UI.
//!
//! Pages are server-rendered Askama templates. Charts are drawn client side:
//! each page fetches its payloads from `/api/charts/*` and hands them to
//! Plotly.
//!
//! # Modules
//!
//! - [`handlers`] - Template rendering handlers
//! - [`routes`] - Dashboard route configuration

pub mod handlers;
pub mod routes;
