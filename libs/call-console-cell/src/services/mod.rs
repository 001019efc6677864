pub mod console;
pub mod view;

pub use console::CallConsole;
pub use view::render_page;
