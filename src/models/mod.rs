pub mod activity_log;
pub mod events;
pub mod group_members;
pub mod groups;
pub mod quotes;
pub mod users;
pub mod vendors;
