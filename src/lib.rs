//! k-mer frequency spectra: a streaming enumerator and counting engine,
//! and a cross-sample aggregator that turns many persisted count vectors
//! into normalised, covariance and correlation matrices.

pub mod collection;
pub mod counter;
pub mod error;
pub mod io;
pub mod kmer;
pub mod matrix;
pub mod persist;
pub mod stats;
pub mod util;

pub use collection::SampleCollection;
pub use counter::{CountVector, CountingBloomFilter, KmerCounter, SaturatingCounter};
pub use error::{Error, Result};
pub use kmer::KmerIterator;
pub use util::BoundedMinHeap;
