//! End-to-end gateway tests
//!
//! Each test builds the real application router around a real provider
//! adapter whose upstream (Keycloak or Supabase) is a local mock server.

#![allow(dead_code)]

mod common;
mod keycloak;
mod selection;
mod supabase;
