//! Plain-text helpers used by the help renderer.

mod dedent;
mod wrap;

pub use dedent::dedent;
pub use wrap::{fill, reflow, wrap};
