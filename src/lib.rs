// SPDX-License-Identifier: MIT

//! FitTrack: fitness tracking backend API
//!
//! This crate provides the backend API for tracking workouts, activities,
//! nutrition, and social challenges, backed by Firestore.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod response;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{Mailer, TokenIssuer};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub mailer: Mailer,
    pub tokens: TokenIssuer,
}
