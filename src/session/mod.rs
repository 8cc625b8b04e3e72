pub mod events;
pub mod navigation;
pub mod wizard;
