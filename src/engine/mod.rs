pub mod binder;
pub mod registry;
pub mod render_model;
pub mod renderer;
