pub mod reconcile;
pub mod user_ops;
pub mod venue_ops;
pub mod event_ops;
pub mod guest_list_ops;
pub mod guest_ops;
pub mod link_ops;
