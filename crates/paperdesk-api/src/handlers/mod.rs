//! HTTP handlers for paperdesk-api.

pub mod ask;
pub mod status;
pub mod ui;
