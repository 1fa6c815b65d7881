use std::ops::{Deref, DerefMut};

const INDENT_UNIT: &str = "    ";

/// Line-oriented text builder with nested indentation scopes
#[derive(Debug, Default)]
pub struct IdlWriter {
    buffer: String,
    depth: usize,
}

impl IdlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `line` at the current depth. Empty lines carry no indentation.
    pub fn write_line(&mut self, line: &str) {
        if !line.is_empty() {
            for _ in 0..self.depth {
                self.buffer.push_str(INDENT_UNIT);
            }
            self.buffer.push_str(line);
        }
        self.buffer.push('\n');
    }

    pub fn blank_line(&mut self) {
        self.write_line("");
    }

    /// Enter one indentation level until the returned guard is dropped
    pub fn indent(&mut self) -> Indent<'_> {
        self.depth += 1;
        Indent { writer: self }
    }

    /// Write `header {`, run `body` one level deeper, then close with `};`
    pub fn block(&mut self, header: &str, body: impl FnOnce(&mut IdlWriter)) {
        self.write_line(&format!("{} {{", header));
        body(&mut *self.indent());
        self.write_line("};");
    }

    /// Fallible [`IdlWriter::block`]. The close line is skipped when `body` fails.
    pub fn try_block<E>(
        &mut self,
        header: &str,
        body: impl FnOnce(&mut IdlWriter) -> Result<(), E>,
    ) -> Result<(), E> {
        self.write_line(&format!("{} {{", header));
        {
            let mut inner = self.indent();
            body(&mut *inner)?;
        }
        self.write_line("};");
        Ok(())
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn code(&self) -> &str {
        &self.buffer
    }

    pub fn into_code(self) -> String {
        self.buffer
    }
}

/// Scope guard returned by [`IdlWriter::indent`]; restores the depth on drop
#[derive(Debug)]
pub struct Indent<'w> {
    writer: &'w mut IdlWriter,
}

impl Deref for Indent<'_> {
    type Target = IdlWriter;

    fn deref(&self) -> &IdlWriter {
        self.writer
    }
}

impl DerefMut for Indent<'_> {
    fn deref_mut(&mut self) -> &mut IdlWriter {
        self.writer
    }
}

impl Drop for Indent<'_> {
    fn drop(&mut self) {
        self.writer.depth -= 1;
    }
}
