pub mod cache;
pub mod dto;
pub mod handler;
pub mod normalizer;
pub mod similarity;
pub mod taxonomy;

pub use normalizer::{
    CategoryNormalizer, CategoryService, MatchSource, Normalized, UnresolvedReason, UNKNOWN_LABEL,
};
pub use taxonomy::{CategoryRecord, Taxonomy, TaxonomyError, TaxonomyKind};
