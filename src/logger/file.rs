/// File persistence for log lines
///
/// One append-only file per process at `<directory>/burnswap.log`.
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

pub const LOG_FILE_NAME: &str = "burnswap.log";

static LOG_WRITER: OnceCell<Mutex<BufWriter<File>>> = OnceCell::new();

pub fn init_file_logging(directory: &str) -> Result<(), String> {
    fs::create_dir_all(directory)
        .map_err(|e| format!("Failed to create log directory '{}': {}", directory, e))?;

    let path = Path::new(directory).join(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| format!("Failed to open log file '{}': {}", path.display(), e))?;

    LOG_WRITER
        .set(Mutex::new(BufWriter::new(file)))
        .map_err(|_| "File logging already initialized".to_string())
}

/// Appends one line; silently a no-op when file logging is off
pub fn write_to_file(line: &str) {
    if let Some(writer) = LOG_WRITER.get() {
        let mut writer = writer.lock();
        let _ = writeln!(writer, "{}", line);
    }
}

pub fn flush_file_logging() {
    if let Some(writer) = LOG_WRITER.get() {
        let _ = writer.lock().flush();
    }
}
