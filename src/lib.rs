//! postgate - share posts with moderated image uploads
//!
//! The library is organised around the [`submit`] engine, which publishes a
//! post and then uploads its optional image through a moderation gate,
//! reporting phase and transfer progress to an observer.

pub mod auth;
pub mod config;
pub mod error;
pub mod moderation;
pub mod service;
pub mod submit;
pub mod types;
