pub mod hash;
pub mod iterator;

pub use hash::{inthash64, seeded_hash};
pub use iterator::{revcomp, KmerIterator, MAX_K};
