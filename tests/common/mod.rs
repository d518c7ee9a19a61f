//! Common test utilities for metmasker.
//!
//! This module provides fixture writers and assertions shared by the integration tests.

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;
pub mod image_utils;
