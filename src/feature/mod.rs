pub mod fetch;
pub mod logic_apps;
pub mod master_ids;
pub mod providers;
pub mod task_feed;
