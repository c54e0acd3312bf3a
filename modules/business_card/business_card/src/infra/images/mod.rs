//! Image storage backends.

mod inline;
mod object;

pub use inline::InlineImageStore;
pub use object::ObjectImageStore;
