pub mod views;

pub use views::session_view::SessionView;
pub use views::View;
