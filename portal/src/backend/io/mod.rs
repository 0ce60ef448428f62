//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain. Translates JSON and
//! multipart requests into domain commands, and domain results and errors
//! into HTTP responses. Holds no business rules of its own.

pub mod rest;
