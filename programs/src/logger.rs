use std::io::Write;

use log::{self, Level, LevelFilter, Log, Metadata, Record};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Writes log messages to stderr, with the level in color the same way fatal errors are printed.
pub struct Logger {
    level: LevelFilter,
    color: ColorChoice,
}

impl Logger {
    pub fn install(level: LevelFilter, color: ColorChoice) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(Logger { level, color }))?;
        log::set_max_level(level);
        Ok(())
    }

    fn write(&self, record: &Record) -> ::std::io::Result<()> {
        let mut stderr = StandardStream::stderr(self.color);
        let (label, color) = match record.level() {
            Level::Error => ("error", Some(Color::Red)),
            Level::Warn => ("warning", Some(Color::Yellow)),
            Level::Info => ("", None),
            Level::Debug | Level::Trace => ("debug", Some(Color::Cyan)),
        };
        if !label.is_empty() {
            stderr.set_color(ColorSpec::new().set_fg(color).set_bold(true))?;
            write!(&mut stderr, "{}: ", label)?;
            stderr.set_color(&ColorSpec::new())?;
        }
        writeln!(&mut stderr, "{}", record.args())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.target().starts_with("bspshaders")
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            // Nowhere left to complain to if stderr is gone
            drop(self.write(record));
        }
    }

    fn flush(&self) {}
}
