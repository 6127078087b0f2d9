pub mod cbf;
pub mod kmer_counter;
pub mod vector;

pub use cbf::CountingBloomFilter;
pub use kmer_counter::KmerCounter;
pub use vector::{CountVector, SaturatingCounter};
