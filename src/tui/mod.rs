//! Interactive terminal dashboard for a finished measurement run.

pub mod app;
pub mod ui;

use std::io;

pub use app::Dashboard;

/// Whether stdout is attached to a terminal the dashboard can take over
pub fn stdout_is_terminal() -> bool {
	// SAFETY: isatty only inspects the descriptor
	unsafe { libc::isatty(libc::STDOUT_FILENO) == 1 }
}

/// Opens the dashboard if stdout is a terminal
pub fn show_dashboard(dashboard: &mut Dashboard<'_>) -> io::Result<()> {
	if !stdout_is_terminal() {
		return Err(io::Error::new(
			io::ErrorKind::Unsupported,
			"the dashboard needs an interactive terminal on stdout",
		));
	}
	dashboard.run()
}
