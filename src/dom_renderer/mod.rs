pub mod display;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub mod dom;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub use dom::{DomAffordance, DomClick};
