//! HTTP request handlers
//!
//! This module organizes all handlers into logical groups:
//! - `api` - Health check, speech synthesis, provider info and JSON label processing
//! - `form` - Multipart form parsing shared by the page and the API
//! - `page` - Server-rendered page, upload processing and reset

pub mod api;
pub mod form;
pub mod page;
