use fern::Dispatch;
use log::{LevelFilter, SetLoggerError};

/// Map the number of `-v` flags to a log level.
///
/// Progress lines are not log records, so the default only lets
/// warnings and errors through.
pub fn level_from_occurrences(occurrences: u8) -> LevelFilter {
	match occurrences {
		0 => LevelFilter::Warn,
		1 => LevelFilter::Debug,
		_ => LevelFilter::Trace,
	}
}

/// Install a stderr logger at the given level.
pub fn init_logger(level: LevelFilter) -> Result<(), SetLoggerError> {
	Dispatch::new()
		.format(|out, message, record| {
			out.finish(format_args!(
				"[{} {}] {}",
				record.level(),
				record.target(),
				message
			))
		})
		.level(level)
		.chain(std::io::stderr())
		.apply()?;

	log::debug!("logger initialized at level {level}");
	Ok(())
}
