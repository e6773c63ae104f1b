//! Waardetypes en meta-informatie waarmee componenten worden gevoed.

pub mod node;
pub mod value;
