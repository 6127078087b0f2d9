pub mod seq;

pub use seq::SeqSource;
