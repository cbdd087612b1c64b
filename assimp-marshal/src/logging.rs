//! Routing Assimp's own log output into Rust
//!
//! The marshalers log through the `log` facade directly. Assimp's internal
//! logger is separate: attach a [`LogStream`] (feature `system`) to receive its
//! messages, or use [`attach_log_crate_stream`] to forward them to `log` under
//! the `assimp` target.

use std::sync::{Arc, Mutex};

/// Log levels Assimp tags its messages with
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

/// Split an Assimp log line (`"Warn,  T0: message\n"`) into level and text.
///
/// Lines without a recognized prefix are reported at `Info`.
pub fn parse_message(message: &str) -> (LogLevel, &str) {
    const PREFIXES: [(&str, LogLevel); 4] = [
        ("Debug,", LogLevel::Debug),
        ("Info,", LogLevel::Info),
        ("Warn,", LogLevel::Warn),
        ("Error,", LogLevel::Error),
    ];

    let (level, rest) = PREFIXES
        .iter()
        .find_map(|(prefix, level)| message.strip_prefix(prefix).map(|rest| (*level, rest)))
        .unwrap_or((LogLevel::Info, message));

    let rest = rest.trim();
    // Drop the "T<thread id>: " tag.
    let rest = rest
        .strip_prefix('T')
        .and_then(|r| r.split_once(": "))
        .filter(|(id, _)| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
        .map_or(rest, |(_, text)| text);

    (level, rest)
}

/// Receiver for Assimp log messages
pub trait LogStream: Send + Sync {
    fn write(&mut self, message: &str);
}

/// Collects messages in memory
#[derive(Debug, Default)]
pub struct MemoryLogStream {
    messages: Vec<String>,
}

impl MemoryLogStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl LogStream for MemoryLogStream {
    fn write(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

/// Forwards messages to the `log` facade at the level Assimp tagged them with
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCrateStream;

impl LogStream for LogCrateStream {
    fn write(&mut self, message: &str) {
        let (level, text) = parse_message(message);
        log::log!(target: "assimp", log::Level::from(level), "{text}");
    }
}

/// Shared handle to a stream, as passed to [`Logger::attach_stream`]
pub type SharedLogStream = Arc<Mutex<dyn LogStream>>;

#[cfg(feature = "system")]
pub use attached::{
    Logger, attach_log_crate_stream, detach_all_streams, enable_verbose_logging, global_logger,
};

#[cfg(feature = "system")]
mod attached {
    use std::ffi::CStr;
    use std::os::raw::c_char;
    use std::sync::{Arc, Mutex, OnceLock, PoisonError};

    use super::{LogCrateStream, SharedLogStream};
    use crate::sys;

    /// Heap box handed to Assimp as the callback's user pointer
    struct StreamBox {
        stream: SharedLogStream,
    }

    struct OwnedLogStream {
        ai_stream: sys::aiLogStream,
        user: *mut StreamBox,
        stream: SharedLogStream,
    }

    /// Streams attached to Assimp's logger, detached on drop
    pub struct Logger {
        streams: Vec<OwnedLogStream>,
    }

    // The raw pointers are owned boxes only touched by Assimp's callback and by
    // this type's methods.
    unsafe impl Send for Logger {}

    impl Logger {
        pub fn new() -> Self {
            Self {
                streams: Vec::new(),
            }
        }

        pub fn attach_stream(&mut self, stream: SharedLogStream) {
            let user = Box::into_raw(Box::new(StreamBox {
                stream: Arc::clone(&stream),
            }));
            let ai_stream = sys::aiLogStream {
                callback: Some(log_callback),
                user: user as *mut c_char,
            };

            unsafe { sys::aiAttachLogStream(&ai_stream) };

            self.streams.push(OwnedLogStream {
                ai_stream,
                user,
                stream,
            });
        }

        /// Detach `stream`; returns false if it was not attached here
        pub fn detach_stream(&mut self, stream: &SharedLogStream) -> bool {
            let Some(pos) = self
                .streams
                .iter()
                .position(|s| Arc::ptr_eq(&s.stream, stream))
            else {
                return false;
            };
            let owned = self.streams.remove(pos);
            unsafe {
                sys::aiDetachLogStream(&owned.ai_stream);
                drop(Box::from_raw(owned.user));
            }
            true
        }

        /// Detach every stream this logger attached. Streams owned by other
        /// loggers stay attached.
        pub fn detach_all_streams(&mut self) {
            for owned in self.streams.drain(..) {
                unsafe {
                    sys::aiDetachLogStream(&owned.ai_stream);
                    drop(Box::from_raw(owned.user));
                }
            }
        }

        pub fn enable_verbose_logging(&self, enable: bool) {
            unsafe {
                sys::aiEnableVerboseLogging(if enable { sys::AI_TRUE } else { sys::AI_FALSE })
            };
        }

        pub fn stream_count(&self) -> usize {
            self.streams.len()
        }
    }

    impl Default for Logger {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Drop for Logger {
        fn drop(&mut self) {
            self.detach_all_streams();
        }
    }

    /// Never unwinds into Assimp: panics in a stream are swallowed.
    unsafe extern "C" fn log_callback(message: *const c_char, user: *mut c_char) {
        if message.is_null() || user.is_null() {
            return;
        }
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let text = unsafe { CStr::from_ptr(message) }.to_string_lossy();
            let boxed = unsafe { &*(user as *const StreamBox) };
            let mut stream = boxed.stream.lock().unwrap_or_else(PoisonError::into_inner);
            stream.write(&text);
        }));
    }

    static GLOBAL_LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

    /// Process-wide logger
    pub fn global_logger() -> &'static Mutex<Logger> {
        GLOBAL_LOGGER.get_or_init(|| Mutex::new(Logger::new()))
    }

    /// Forward Assimp's log to the `log` facade
    pub fn attach_log_crate_stream() -> SharedLogStream {
        let stream: SharedLogStream = Arc::new(Mutex::new(LogCrateStream));
        global_logger()
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .attach_stream(Arc::clone(&stream));
        stream
    }

    pub fn enable_verbose_logging(enable: bool) {
        global_logger()
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .enable_verbose_logging(enable);
    }

    /// Detach the streams attached through [`global_logger`]
    pub fn detach_all_streams() {
        global_logger()
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .detach_all_streams();
    }

}
