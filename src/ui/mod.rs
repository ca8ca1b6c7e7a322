pub mod app;
pub mod components;
pub mod events;
pub mod theme;

pub use app::App;
pub use events::AppEvent;
