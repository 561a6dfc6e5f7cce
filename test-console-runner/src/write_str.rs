// Copyright (c) The test-console Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! String-only writers.
//!
//! Console output from commands always goes through [`WriteStr`], so that the same code can write
//! to stdout in the prompt and to a `String` in tests. Unlike [`std::fmt::Write`], errors are
//! reported as [`std::io::Error`].

use std::{
    fmt,
    io::{self, BufWriter, Stdout, Write},
};

/// A writer that only accepts valid UTF-8.
pub trait WriteStr {
    /// Writes a string.
    fn write_str(&mut self, s: &str) -> io::Result<()>;

    /// Flushes any buffered output.
    fn write_str_flush(&mut self) -> io::Result<()>;

    /// Writes formatted output. This is what `write!` and `writeln!` call.
    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        // Adapted from the `write_fmt` implementation for `std::io::Write`, used under the terms
        // of the MIT and Apache-2.0 licenses. Bridges fmt::Write to this trait, keeping the first
        // I/O error around.
        struct Adapter<'a, T: ?Sized> {
            inner: &'a mut T,
            error: io::Result<()>,
        }

        impl<T: ?Sized + WriteStr> fmt::Write for Adapter<'_, T> {
            fn write_str(&mut self, s: &str) -> fmt::Result {
                self.inner.write_str(s).map_err(|error| {
                    self.error = Err(error);
                    fmt::Error
                })
            }
        }

        let mut adapter = Adapter {
            inner: self,
            error: Ok(()),
        };
        match fmt::write(&mut adapter, args) {
            Ok(()) => Ok(()),
            Err(_) if adapter.error.is_err() => adapter.error,
            Err(_) => Err(io::Error::other("formatter error")),
        }
    }
}

impl WriteStr for String {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.push_str(s);
        Ok(())
    }

    fn write_str_flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl WriteStr for Stdout {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.write_all(s.as_bytes())
    }

    fn write_str_flush(&mut self) -> io::Result<()> {
        self.flush()
    }
}

impl<W: Write> WriteStr for BufWriter<W> {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.write_all(s.as_bytes())
    }

    fn write_str_flush(&mut self) -> io::Result<()> {
        self.flush()
    }
}

impl<T: WriteStr + ?Sized> WriteStr for &mut T {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        (**self).write_str(s)
    }

    fn write_str_flush(&mut self) -> io::Result<()> {
        (**self).write_str_flush()
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        (**self).write_fmt(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_into_string() {
        let mut out = String::new();
        write!(out, "{} > ", "unit_tests").unwrap();
        writeln!(&mut out, "done").unwrap();
        assert_eq!(out, "unit_tests > done\n");
    }

    #[test]
    fn formats_into_buffered_writer() {
        let mut out = BufWriter::new(Vec::new());
        WriteStr::write_str(&mut out, "@smoke\n").unwrap();
        out.write_str_flush().unwrap();
        assert_eq!(out.get_ref().as_slice(), b"@smoke\n");
    }

    struct BrokenPipe;

    impl WriteStr for BrokenPipe {
        fn write_str(&mut self, _s: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "console closed"))
        }

        fn write_str_flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn formatting_keeps_io_error() {
        let error = writeln!(BrokenPipe, "Running {}", "@smoke").unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(error.to_string(), "console closed");
    }
}
