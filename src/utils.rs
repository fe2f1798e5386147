use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::JsValue;

pub fn set_panic_hook() {
    // When the `console_error_panic_hook` feature is enabled, we can call the
    // `set_panic_hook` function at least once during initialization, and then
    // we will get better error messages if our code ever panics.
    //
    // For more details see
    // https://github.com/rustwasm/console_error_panic_hook#readme
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// `log` backend that writes records to the browser's developer console, picking the console
/// method that matches the record's level. Filtering follows `log::max_level()`.
pub struct ConsoleLogger;

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
static CONSOLE_LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = JsValue::from_str(&format!(
            "[{}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        ));
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug => web_sys::console::debug_1(&line),
            Level::Trace => web_sys::console::log_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Route `log` records at or above `level` to the browser console. Only the first call installs
/// the logger; later calls are ignored. Use [`set_log_level`] to change the level afterwards.
pub fn init_console_logger(level: LevelFilter) {
    // The console only exists inside a browser.
    #[cfg(target_arch = "wasm32")]
    {
        if log::set_logger(&CONSOLE_LOGGER).is_ok() {
            log::set_max_level(level);
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    let _ = level;
}

/// Change the maximum level of records that are logged. `level` is one of `off`, `error`,
/// `warn`, `info`, `debug` or `trace`, case insensitive.
pub fn set_log_level(level: &str) -> Result<LevelFilter, String> {
    let filter = level
        .parse::<LevelFilter>()
        .map_err(|_| format!("unknown log level {:?}", level))?;
    log::set_max_level(filter);
    Ok(filter)
}
