//! Human-readable diagnostic dump
//!
//! The format is for eyes only and carries no stability guarantee:
//!
//! ```text
//!
//! -------------------------
//! Stack Info:
//!
//! Stack size: 1
//! Stack capacity: 8
//!
//! 00000000  2a 00 00 00 00 00 00 00
//! 00000008  ff f0 de ee ed 00 00 00
//! ...
//!
//! -------------------------
//! ```
//!
//! Dumping only requires an initialized handle; guards and digest are not
//! checked, so a corrupted stack can still be inspected.

use std::fmt::Write as _;
use std::io::Write;

use crate::error::{StackError, StackResult};
use crate::layout::ELEMENT_SIZE;
use crate::stack::GuardedStack;

const RULE: &str = "-------------------------";

impl GuardedStack {
    /// Write a report to the handle's default diagnostic sink.
    pub fn dump(&mut self) -> StackResult<()> {
        let report = self.report()?;
        let sink = self.sink.as_mut().ok_or(StackError::NotInitialized)?;
        sink.write_all(report.as_bytes())
            .and_then(|()| sink.flush())
            .map_err(|err| StackError::dump_failed(&err))
    }

    /// Write a report to `out`.
    pub fn dump_to<W: Write + ?Sized>(&self, out: &mut W) -> StackResult<()> {
        let report = self.report()?;
        out.write_all(report.as_bytes())
            .map_err(|err| StackError::dump_failed(&err))
    }

    /// Render the report without writing it anywhere.
    ///
    /// Verbose output (addresses and all four guards) follows the
    /// `verbose_dump` setting.
    pub fn report(&self) -> StackResult<String> {
        self.ensure_initialized()?;

        let mut out = String::new();
        // writing to a String cannot fail
        let _ = self.render(&mut out);
        Ok(out)
    }

    fn render(&self, out: &mut String) -> std::fmt::Result {
        write!(out, "\n{RULE}\n")?;
        write!(out, "Stack Info:\n\n")?;
        write!(
            out,
            "Stack size: {}\nStack capacity: {}\n\n",
            self.len, self.capacity
        )?;

        for (index, element) in self.buffer.elements().iter().enumerate() {
            write!(out, "{:08x}  ", index * ELEMENT_SIZE)?;
            for byte in element.to_ne_bytes() {
                write!(out, "{byte:02x} ")?;
            }
            out.push('\n');
        }

        if self.config.verbose_dump {
            out.push('\n');
            writeln!(out, "Stack handle address:\t\t{:p}", core::ptr::from_ref(self))?;
            writeln!(out, "Stack data address:\t\t{:p}", self.buffer.data_ptr())?;
            writeln!(out, "Front structural guard:\t\t{:#X}", self.front_guard)?;
            writeln!(out, "Back structural guard:\t\t{:#X}", self.back_guard)?;
            writeln!(out, "Front data guard:\t\t{:#X}", self.buffer.front_guard())?;
            match self.buffer.back_guard_at(self.capacity) {
                Some(guard) => writeln!(out, "Back data guard:\t\t{guard:#X}")?,
                None => writeln!(out, "Back data guard:\t\t<out of bounds>")?,
            }
            writeln!(out, "Generation:\t\t\t{}", self.generation)?;
        }

        write!(out, "\n{RULE}\n")
    }
}
