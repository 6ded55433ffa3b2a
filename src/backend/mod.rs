pub mod adapter;
pub mod headless;
#[cfg(feature = "wasm")]
pub mod web;

pub use adapter::{AdapterMap, MapAdapter};
pub use headless::HeadlessMap;
#[cfg(feature = "wasm")]
pub use web::{JsMapAdapter, NodeMap, WebMap};
