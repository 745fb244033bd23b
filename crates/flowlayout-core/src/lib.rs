//! Flowlayout Core Types
//!
//! This crate provides the foundational geometry shared by the Flowlayout
//! engine and its command-line front end:
//!
//! - **Geometry**: [`geometry::Vector2`], [`geometry::Size`] and
//!   [`geometry::Bounds`]

pub mod geometry;
