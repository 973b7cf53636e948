//! Streaming CSS writer.
//!
//! A rule's head is written lazily, right before its first declaration, so
//! rules without declarations never produce `{}`. Nested rules are written
//! as separate blocks; the enclosing block is closed around them and
//! reopened if more declarations follow.

use std::io::Write;

use zuss_ast::Value;

use crate::Result;

/// Open/closed state of one rule's output block.
#[derive(Debug)]
pub struct RuleBlock {
    head: String,
    open: bool,
}

impl RuleBlock {
    pub fn new(head: String) -> Self {
        Self { head, open: false }
    }
}

/// Writes rule blocks and declarations to an [`std::io::Write`] sink.
pub struct StyleEmitter<W: Write> {
    out: W,
    blocks_written: usize,
}

impl<W: Write> StyleEmitter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            blocks_written: 0,
        }
    }

    /// Number of `{` blocks opened so far.
    pub fn blocks_written(&self) -> usize {
        self.blocks_written
    }

    /// Write `\tproperty: v1 v2;`, opening the block first if needed.
    pub fn declaration(
        &mut self,
        block: &mut RuleBlock,
        property: &str,
        values: &[Value],
    ) -> Result<()> {
        if !block.open {
            writeln!(self.out, "{}{{", block.head)?;
            block.open = true;
            self.blocks_written += 1;
        }

        let mut line = format!("\t{property}:");
        for value in values {
            line.push(' ');
            line.push_str(&value.to_string());
        }
        line.push_str(";\n");
        self.out.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Close the block if it is open. It reopens on the next declaration.
    pub fn close(&mut self, block: &mut RuleBlock) -> Result<()> {
        if block.open {
            self.out.write_all(b"}\n")?;
            block.open = false;
        }
        Ok(())
    }

    /// Flush and release the sink.
    pub fn finish(mut self) -> std::io::Result<()> {
        self.out.flush()
    }
}
