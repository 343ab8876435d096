//! Generational support: the remembered-set write barrier and the remembered set.

pub mod barrier;
pub mod remset;
