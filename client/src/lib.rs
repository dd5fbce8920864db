mod app;
mod dom;
mod logging;
mod render;
mod state;
mod surface;

pub use app::{run, InkEditor};
