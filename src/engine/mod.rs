pub mod async_call;
pub mod controller;
pub mod state;

pub use controller::LikeToggleController;
