pub mod event_queries;
pub mod guest_list_queries;
pub mod link_queries;
