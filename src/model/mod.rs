pub mod ids;
pub mod user;
pub mod event;
pub mod guest_list;
pub mod link;

// Re-exports for convenience
pub use ids::Id;
pub use user::{Organization, User};
pub use event::{Event, EventForm, Venue};
pub use guest_list::{Guest, GuestList, GuestListInput};
pub use link::{Link, LinkConsumption, LinkDetails, NewLink};
