pub mod table;

pub use table::{genetic_code, GeneticCode};
