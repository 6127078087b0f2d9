pub mod minheap;

pub use minheap::BoundedMinHeap;
