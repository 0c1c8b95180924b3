// mod.rs - Genotype file format loaders

pub mod structure;

pub use structure::{StructureParser, SNP_MISSING};
