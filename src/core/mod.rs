// src/core/mod.rs

pub mod converter;
/// `Registry::execute` and its options and errors.
pub mod dispatcher;
pub mod lexer;
/// Command registry, descriptors, verbs and signature validation.
pub mod registry;
