//! Display primitives and the sinks that show them.

/// One display primitive
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Glyph {
    /// Print a byte and advance the cursor
    Char(u8),
    /// Move the cursor back one cell and blank it
    EraseLast,
    /// Move the cursor back one cell
    CursorLeft,
}

/// Consumer of display primitives, one call per primitive.
pub trait RenderSink {
    fn emit(&mut self, glyph: Glyph);
}

impl<F: FnMut(Glyph)> RenderSink for F {
    fn emit(&mut self, glyph: Glyph) {
        self(glyph)
    }
}

const BACKSPACE: u8 = 0x08;

/// Render sink for a serial line or terminal
///
/// `EraseLast` becomes backspace, space, backspace and `CursorLeft` a plain
/// backspace. Write errors are counted rather than propagated since the
/// console has nowhere to report them.
pub struct SerialSink<W: embedded_io::Write> {
    output: W,
    crlf: bool,
    errors: usize,
}

impl<W: embedded_io::Write> SerialSink<W> {
    pub fn new(output: W) -> Self {
        Self {
            output,
            crlf: false,
            errors: 0,
        }
    }

    /// Emit `\r\n` for every `\n`, for terminals in raw mode.
    pub fn with_crlf(mut self) -> Self {
        self.crlf = true;
        self
    }

    /// Number of failed writes so far
    pub fn errors(&self) -> usize {
        self.errors
    }

    /// Consume the sink and return the wrapped output.
    pub fn take(self) -> W {
        self.output
    }

    fn write(&mut self, bytes: &[u8]) {
        let result = self
            .output
            .write_all(bytes)
            .and_then(|()| self.output.flush());

        if let Err(err) = result {
            use embedded_io::Error;

            self.errors += 1;

            if self.errors == 1 {
                log::warn!("console output failed: {:?}", err.kind());
            }
        }
    }
}

impl<W: embedded_io::Write> RenderSink for SerialSink<W> {
    fn emit(&mut self, glyph: Glyph) {
        match glyph {
            Glyph::Char(b'\n') if self.crlf => self.write(b"\r\n"),
            Glyph::Char(byte) => self.write(&[byte]),
            Glyph::EraseLast => self.write(&[BACKSPACE, b' ', BACKSPACE]),
            Glyph::CursorLeft => self.write(&[BACKSPACE]),
        }
    }
}

#[cfg(any(test, feature = "std"))]
pub mod std_io {
    //! Output wrapper for `std`. Requires feature `std`.

    use std::io::{Stdout, Write};

    /// Wrapper for std::io::stdout
    pub struct StdoutWrapper(Stdout);

    impl StdoutWrapper {
        pub fn new() -> Self {
            Self(std::io::stdout())
        }
    }

    impl Default for StdoutWrapper {
        fn default() -> Self {
            Self::new()
        }
    }

    impl embedded_io::ErrorType for StdoutWrapper {
        type Error = embedded_io::ErrorKind;
    }

    impl embedded_io::Write for StdoutWrapper {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            self.0.write(buf).map_err(|e| e.kind().into())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.0.flush().map_err(|e| e.kind().into())
        }
    }
}
