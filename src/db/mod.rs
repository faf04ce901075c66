pub mod schema;
pub mod user_repo;
pub mod venue_repo;
pub mod event_repo;
pub mod guest_list_repo;
pub mod guest_repo;
pub mod link_repo;
