//! Change notifier implementations.

mod memory;

pub use memory::MemoryChangeNotifier;
