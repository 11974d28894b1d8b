//! Integration test crate for Montage.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It drives the editing session end to end over real timeline documents.

#[cfg(test)]
mod editing;

#[cfg(test)]
mod persistence;

#[cfg(test)]
mod properties;
