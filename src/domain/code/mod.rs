//! Product codes: format checking and allocation of the next free code.

pub mod allocator;
pub mod format;

pub use allocator::allocate;
pub use format::is_valid_format;
