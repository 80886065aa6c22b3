pub mod agent;
pub mod distribution;
pub mod list_item;
