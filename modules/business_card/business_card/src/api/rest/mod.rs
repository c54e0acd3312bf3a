//! JSON API: profile, public cards, QR image and the send-card endpoint.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod routes;

#[cfg(test)]
mod dto_test;
