//! Logging to the browser console.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "blogdesk=info";

/// Filter for the console subscriber. `directives` falls back to
/// [`DEFAULT_FILTER`] when empty or invalid.
pub fn filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(target_arch = "wasm32")]
pub use console::init_logging;

#[cfg(target_arch = "wasm32")]
mod console {
    use std::io;
    use tracing::{Level, Metadata};
    use tracing_subscriber::fmt::MakeWriter;

    /// Install the panic hook and a console-backed `tracing` subscriber.
    /// Safe to call more than once.
    pub fn init_logging(directives: Option<&str>) {
        console_error_panic_hook::set_once();

        let _ = tracing_subscriber::fmt()
            .with_env_filter(super::filter(directives))
            .with_writer(ConsoleMakeWriter)
            .with_ansi(false)
            .without_time()
            .try_init();
    }

    struct ConsoleMakeWriter;

    /// Buffers one formatted event and hands it to `console` when dropped.
    struct ConsoleWriter {
        level: Level,
        buffer: Vec<u8>,
    }

    impl io::Write for ConsoleWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Drop for ConsoleWriter {
        fn drop(&mut self) {
            let text = String::from_utf8_lossy(&self.buffer);
            let line = wasm_bindgen::JsValue::from_str(text.trim_end());
            match self.level {
                Level::ERROR => web_sys::console::error_1(&line),
                Level::WARN => web_sys::console::warn_1(&line),
                Level::INFO => web_sys::console::info_1(&line),
                _ => web_sys::console::debug_1(&line),
            }
        }
    }

    impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
        type Writer = ConsoleWriter;

        fn make_writer(&'a self) -> Self::Writer {
            ConsoleWriter {
                level: Level::INFO,
                buffer: Vec::new(),
            }
        }

        fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
            ConsoleWriter {
                level: *meta.level(),
                buffer: Vec::new(),
            }
        }
    }
}

/// Native builds log through whatever subscriber the host installed.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging(_directives: Option<&str>) {}
