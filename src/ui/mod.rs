pub mod affordance;
pub mod event;
pub mod mount;

pub use affordance::{Affordance, ButtonPair, ClickEvent, ClickHandler, MemoryButton, MemoryClick};
pub use event::{EventQueue, UIEvent};
pub use mount::MountRegistry;
