//! # Ratoncito - adventure client for the Ratoncito Pérez Madrid scavenger hunt
//!
//! Ratoncito is the orchestration layer behind a children's treasure hunt
//! through Madrid. It asks a remote backend for adventures, routes and
//! challenges, and keeps the experience going with hand-authored content
//! whenever that backend is slow, down or empty.
//!
//! ## Features
//!
//! - **Adventure start**: narrative for the family's current position.
//! - **Route generation**: multi-category itineraries with synonym broadening and local place tables.
//! - **Challenges**: story, curiosity and challenge fetched concurrently, each degrading on its own.
//! - **Answer validation**: local heuristic scoring with best-effort family gamification.
//! - **Chat**: conversation with the Ratoncito character, history owned by the caller.
//! - **Progress tracking**: completed places, current stop and percentage for the active route.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ratoncito::adventure::AdventureClient;
//! use ratoncito::api::HttpBackend;
//! use ratoncito::config::Config;
//! use ratoncito::model::Coordinates;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let client = AdventureClient::new(HttpBackend::new(config.api.clone()), config.adventure);
//!
//!     let challenge = client.generate_challenge("Plaza Mayor", &[6, 8], None).await;
//!     println!("{} ({})", challenge.challenge, challenge.difficulty);
//!
//!     let adventure = client.start_adventure(Coordinates::new(40.4168, -3.7038), &[6, 8]).await;
//!     println!("{}", adventure.story);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`adventure`] - Client operations: adventure, routes, challenges, family, chat
//! - [`api`] - Backend trait, HTTP implementation and response envelope parsing
//! - [`content`] - Local fallback content and place catalogs
//! - [`tracker`] - Route progress bookkeeping
//! - [`config`] - Configuration file and environment overrides
//! - [`validation`] - Coordinate and age checks
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐
//! │ AdventureClient │ ──▶ │ Content registry│ ← fallback text and place tables
//! └─────────────────┘     └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │ Backend trait   │ ← HttpBackend (reqwest) or test doubles
//! └─────────────────┘
//! ```

pub mod adventure;
pub mod api;
pub mod config;
pub mod content;
pub mod logutil;
pub mod metrics;
pub mod model;
pub mod tracker;
pub mod validation;
