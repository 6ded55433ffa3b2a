pub mod popup;

pub use popup::{ActivePopup, PopupSlot};
