pub mod events;
pub mod hierarchy;
pub mod layout;
