//! Driven adapters: everything the domain calls out to.

pub mod persistence;
