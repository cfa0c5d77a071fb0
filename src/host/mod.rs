//! The host runtime boundary: value model, prototype-chained objects with a
//! native-state slot, native class registration, lookup operations that
//! drive the lazy-resolution hooks, and the collected heap.

pub mod bytes_object;
pub mod class;
pub mod context;
pub mod error;
pub mod function_object;
pub mod heap;
pub mod object;
pub mod object_property;
pub mod operations;
pub mod symbol;
pub mod value;
