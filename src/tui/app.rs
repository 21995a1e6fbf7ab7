use std::io;
use std::panic::{self, PanicHookInfo};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
	event::{self, Event, KeyCode, KeyEventKind},
	execute,
	terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use crate::constants::DASHBOARD_POLL_INTERVAL_MS;
use crate::metrics::{Metrics, calculate_metrics};
use crate::series::TimeSeries;

/// Dashboard state: a read-only view of the recorded series and its metrics
pub struct Dashboard<'a> {
	series: &'a TimeSeries,
	metrics: Option<Metrics>,
	total_power: Vec<f64>,
	running: bool,
}

impl<'a> Dashboard<'a> {
	pub fn new(series: &'a TimeSeries) -> Self {
		Self {
			series,
			metrics: calculate_metrics(series),
			total_power: series.total_power(),
			running: true,
		}
	}

	/// Takes over the terminal until the user presses `q` or `Esc`
	pub fn run(&mut self) -> io::Result<()> {
		enable_raw_mode()?;
		let mut stdout = io::stdout();
		execute!(stdout, EnterAlternateScreen)?;
		let backend = CrosstermBackend::new(stdout);
		let mut terminal = Terminal::new(backend)?;

		let hook = PanicHookGuard::install(restore_terminal);

		self.running = true;
		let result = self.run_loop(&mut terminal);

		drop(hook);
		disable_raw_mode()?;
		execute!(terminal.backend_mut(), LeaveAlternateScreen, crossterm::cursor::Show)?;

		result
	}

	fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
		while self.running {
			terminal.draw(|f| super::ui::draw(f, self))?;

			if event::poll(Duration::from_millis(DASHBOARD_POLL_INTERVAL_MS))?
				&& let Event::Key(key) = event::read()?
				&& key.kind == KeyEventKind::Press
			{
				self.handle_key(key.code);
			}
		}

		Ok(())
	}

	pub fn handle_key(&mut self, key: KeyCode) {
		if matches!(key, KeyCode::Char('q') | KeyCode::Esc) {
			self.running = false;
		}
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn series(&self) -> &TimeSeries {
		self.series
	}

	pub fn metrics(&self) -> Option<&Metrics> {
		self.metrics.as_ref()
	}

	pub fn total_power(&self) -> &[f64] {
		&self.total_power
	}
}

fn restore_terminal() {
	let _ = disable_raw_mode();
	let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
}

type PanicHook = dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static;

/// Runs `cleanup` before the current panic hook while alive
///
/// Dropping the guard hands the panic hook back to the one that was installed before.
struct PanicHookGuard {
	previous: Option<Arc<PanicHook>>,
}

impl PanicHookGuard {
	fn install(cleanup: fn()) -> Self {
		let previous: Arc<PanicHook> = Arc::from(panic::take_hook());
		let chained = Arc::clone(&previous);
		panic::set_hook(Box::new(move |info| {
			cleanup();
			chained(info);
		}));

		Self {
			previous: Some(previous),
		}
	}
}

impl Drop for PanicHookGuard {
	fn drop(&mut self) {
		// set_hook panics when called during unwinding
		if std::thread::panicking() {
			return;
		}
		if let Some(previous) = self.previous.take() {
			panic::set_hook(Box::new(move |info| previous(info)));
		}
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicUsize, Ordering};

	use super::*;

	#[test]
	fn panic_hook_is_handed_back_after_the_dashboard() {
		static PREVIOUS_CALLS: AtomicUsize = AtomicUsize::new(0);
		static CLEANUPS: AtomicUsize = AtomicUsize::new(0);

		let original = panic::take_hook();
		panic::set_hook(Box::new(|_| {
			PREVIOUS_CALLS.fetch_add(1, Ordering::SeqCst);
		}));

		{
			let _hook = PanicHookGuard::install(|| {
				CLEANUPS.fetch_add(1, Ordering::SeqCst);
			});
			let _ = panic::catch_unwind(|| panic!("while drawing"));
		}
		let _ = panic::catch_unwind(|| panic!("after the dashboard"));

		panic::set_hook(original);

		assert_eq!(CLEANUPS.load(Ordering::SeqCst), 1);
		assert_eq!(PREVIOUS_CALLS.load(Ordering::SeqCst), 2);
	}

	#[test]
	fn quits_on_q_and_escape() {
		let series = TimeSeries::new();

		let mut dashboard = Dashboard::new(&series);
		dashboard.handle_key(KeyCode::Char('x'));
		assert!(dashboard.is_running());
		dashboard.handle_key(KeyCode::Char('q'));
		assert!(!dashboard.is_running());

		let mut dashboard = Dashboard::new(&series);
		dashboard.handle_key(KeyCode::Esc);
		assert!(!dashboard.is_running());
	}

	#[test]
	fn metrics_are_computed_once_from_the_series() {
		let mut series = TimeSeries::new();
		series.push(0.0, [("a", 1.0)].into_iter().collect()).unwrap();
		series.push(1.0, [("a", 3.0)].into_iter().collect()).unwrap();

		let dashboard = Dashboard::new(&series);
		assert_eq!(dashboard.total_power(), [1.0, 3.0]);
		assert_eq!(dashboard.metrics().map(|m| m.max_power), Some(3.0));
		assert_eq!(dashboard.series().len(), 2);

		assert!(Dashboard::new(&TimeSeries::new()).metrics().is_none());
	}
}
