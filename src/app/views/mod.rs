pub mod session_view;

use std::fmt;

use crate::session::SessionState;

pub trait View {
    fn draw(&mut self, out: &mut dyn fmt::Write, state: &SessionState) -> fmt::Result;
}
