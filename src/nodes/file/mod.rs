//! Text-resource I/O nodes
//!
//! Both kinds bind to a named text resource served by the injected
//! [`TextStore`](crate::resources::TextStore) adapter instead of touching an
//! environment directly.

pub mod input;
pub mod output;

pub use input::TextFileInputNodeFactory;
pub use output::TextFileOutputNodeFactory;
