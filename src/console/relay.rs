//! One-to-many relay for console output.
//!
//! The relay is an explicitly constructed sink handed to the console; there is
//! no process-wide instance. Receivers are either writer streams (stdout, a
//! file, a capture buffer) or string callbacks. A receiver attached twice gets
//! every message twice. Callbacks are always delivered before streams.
//!
//! A stream that fails is logged and detached; the remaining receivers keep
//! getting output. Only losing the last receiver is reported as an error.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

type Callback = Box<dyn FnMut(&str) + Send>;
type Stream = Box<dyn Write + Send>;

/// Fan-out sink mirroring each message to every attached receiver.
#[derive(Default)]
pub struct OutputRelay {
    callbacks: Vec<Callback>,
    streams: Vec<Stream>,
}

impl OutputRelay {
    /// Create a relay with no receivers; messages are dropped until one is added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a relay that writes to process stdout.
    pub fn stdout() -> Self {
        let mut relay = Self::new();
        relay.add_stream(io::stdout());
        relay
    }

    /// Attach a writer that receives every subsequent message.
    pub fn add_stream(&mut self, stream: impl Write + Send + 'static) {
        self.streams.push(Box::new(stream));
    }

    /// Attach a callback invoked with every subsequent message.
    pub fn add_callback(&mut self, callback: impl FnMut(&str) + Send + 'static) {
        self.callbacks.push(Box::new(callback));
    }

    /// Number of attached receivers of either kind.
    pub fn receiver_count(&self) -> usize {
        self.callbacks.len() + self.streams.len()
    }

    /// Deliver one message to every receiver.
    ///
    /// Streams that fail are detached. Errors only when that leaves the
    /// relay with no receivers at all.
    pub fn relay(&mut self, message: &str) -> io::Result<()> {
        for callback in &mut self.callbacks {
            callback(message);
        }
        self.for_each_stream(|stream| stream.write_all(message.as_bytes()))
    }

    fn for_each_stream<F>(&mut self, mut op: F) -> io::Result<()>
    where
        F: FnMut(&mut Stream) -> io::Result<()>,
    {
        let mut last_err = None;
        self.streams.retain_mut(|stream| match op(stream) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "detaching failed output stream");
                last_err = Some(e);
                false
            }
        });
        match last_err {
            Some(e) if self.receiver_count() == 0 => Err(e),
            _ => Ok(()),
        }
    }
}

impl Write for OutputRelay {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.relay(&String::from_utf8_lossy(buf))?;
        Ok(buf.len())
    }

    /// Flushes streams only; callbacks have nothing to flush.
    fn flush(&mut self) -> io::Result<()> {
        self.for_each_stream(|stream| stream.flush())
    }
}

impl fmt::Debug for OutputRelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputRelay")
            .field("callbacks", &self.callbacks.len())
            .field("streams", &self.streams.len())
            .finish()
    }
}

/// Shared in-memory receiver; clones observe the same buffer.
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    inner: Arc<Mutex<String>>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything captured so far.
    pub fn contents(&self) -> String {
        self.lock().clone()
    }

    /// Drop captured text.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, String> {
        // A panicked writer cannot leave a String in an invalid state.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().push_str(&String::from_utf8_lossy(buf));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Writer that always fails, for delivery-isolation checks.
    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn empty_relay_drops_messages() {
        let mut relay = OutputRelay::new();
        assert_eq!(relay.receiver_count(), 0);
        relay.relay("nobody listens").unwrap();
    }

    #[test]
    fn relay_mirrors_to_streams_and_callbacks() {
        let capture = CaptureBuffer::new();
        let seen = CaptureBuffer::new();
        let mut seen_writer = seen.clone();

        let mut relay = OutputRelay::new();
        relay.add_stream(capture.clone());
        relay.add_callback(move |msg| {
            seen_writer.write_all(msg.as_bytes()).unwrap();
        });
        relay.relay("hello ").unwrap();
        write!(relay, "world").unwrap();

        assert_eq!(capture.contents(), "hello world");
        assert_eq!(seen.contents(), "hello world");
        assert_eq!(relay.receiver_count(), 2);
    }

    #[test]
    fn receiver_added_twice_gets_message_twice() {
        let capture = CaptureBuffer::new();
        let mut relay = OutputRelay::new();
        relay.add_stream(capture.clone());
        relay.add_stream(capture.clone());
        relay.relay("x").unwrap();
        assert_eq!(capture.contents(), "xx");
    }

    #[test]
    fn callbacks_run_before_streams() {
        let order = CaptureBuffer::new();
        let mut from_callback = order.clone();
        let mut relay = OutputRelay::new();
        // Stream attached first, callback second: callback output still leads.
        relay.add_stream(order.clone());
        relay.add_callback(move |_| {
            from_callback.write_all(b"[cb]").unwrap();
        });
        relay.relay("msg").unwrap();
        assert_eq!(order.contents(), "[cb]msg");
    }

    #[test]
    fn failing_stream_is_detached_and_others_keep_receiving() {
        let capture = CaptureBuffer::new();
        let mut relay = OutputRelay::new();
        relay.add_stream(BrokenPipe);
        relay.add_stream(capture.clone());
        relay.relay("still ").unwrap();
        assert_eq!(relay.receiver_count(), 1);
        relay.relay("delivered").unwrap();
        relay.flush().unwrap();
        assert_eq!(capture.contents(), "still delivered");
    }

    #[test]
    fn losing_the_last_receiver_is_an_error() {
        let mut relay = OutputRelay::new();
        relay.add_stream(BrokenPipe);
        let err = relay.relay("lost").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(relay.receiver_count(), 0);
    }

    #[test]
    fn callback_keeps_relay_alive_when_streams_fail() {
        let seen = CaptureBuffer::new();
        let mut writer = seen.clone();
        let mut relay = OutputRelay::new();
        relay.add_callback(move |msg| writer.write_all(msg.as_bytes()).unwrap());
        relay.add_stream(BrokenPipe);
        relay.relay("ok").unwrap();
        assert_eq!(seen.contents(), "ok");
    }

    #[test]
    fn capture_clear_resets_contents() {
        let mut capture = CaptureBuffer::new();
        capture.write_all(b"abc").unwrap();
        capture.clear();
        assert_eq!(capture.contents(), "");
    }
}
