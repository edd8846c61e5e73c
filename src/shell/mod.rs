pub mod session;
pub mod terminal;

pub use session::{PtyResizer, ShellRequest, ShellSession};
pub use terminal::{watch_resizes, RawModeGuard, TerminalSize};
