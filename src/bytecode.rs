// sav - a library for writing SPSS system files.
// Copyright (C) 2025 Free Software Foundation, Inc.
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later
// version.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program.  If not, see <http://www.gnu.org/licenses/>.

//! Bytecode compression for case data.
//!
//! Compressed case data is a stream of command blocks.  Each block is 8
//! one-byte opcodes followed, in the same order, by the operand payloads
//! those opcodes call for:
//!
//! - 0: padding at the end of the stream, ignored on read.
//! - 1 through 251: a number equal to the opcode minus the compression
//!   bias.
//! - 252: end of file.
//! - 253: an uncompressed number or an 8-byte string chunk, in an 8-byte
//!   operand.
//! - 254: a string chunk of 8 spaces.
//! - 255: the system-missing value.
//!
//! The compressor writes whole blocks only: the sink sees 8 opcodes and
//! their operands at a time, plus one final padded block on flush.

use std::{io::Write, iter::repeat_n};

use binrw::BinResult;

const PADDING: u8 = 0;
const LITERAL: u8 = 253;
const BLANKS: u8 = 254;
const SYSMIS: u8 = 255;

/// Encodes case values into the compressed bytecode stream.
pub struct Compressor {
    bias: f64,
    opcodes: Vec<u8>,
    operands: Vec<u8>,
}

impl Compressor {
    /// Creates a compressor with the given compression `bias`.
    pub fn new(bias: f64) -> Self {
        Self {
            bias,
            opcodes: Vec::with_capacity(8),
            operands: Vec::with_capacity(64),
        }
    }

    fn emit_block<W>(&mut self, writer: &mut W) -> BinResult<()>
    where
        W: Write,
    {
        if !self.opcodes.is_empty() {
            self.opcodes.resize(8, PADDING);
            writer.write_all(&self.opcodes)?;
            writer.write_all(&self.operands)?;
            self.opcodes.clear();
            self.operands.clear();
        }
        Ok(())
    }

    fn opcode<W>(&mut self, writer: &mut W, opcode: u8) -> BinResult<()>
    where
        W: Write,
    {
        if self.opcodes.len() >= 8 {
            self.emit_block(writer)?;
        }
        self.opcodes.push(opcode);
        Ok(())
    }

    /// Writes the number `number`.
    ///
    /// An integer that fits the biased opcode range becomes a single
    /// opcode; everything else is an opcode 253 literal follow.
    pub fn number<W>(&mut self, writer: &mut W, number: f64) -> BinResult<()>
    where
        W: Write,
    {
        if number == number.trunc() && (1.0 - self.bias..=251.0 - self.bias).contains(&number) {
            self.opcode(writer, (number + self.bias) as u8)
        } else {
            self.opcode(writer, LITERAL)?;
            self.operands.extend_from_slice(&number.to_le_bytes());
            Ok(())
        }
    }

    /// Writes the system-missing value.
    pub fn missing<W>(&mut self, writer: &mut W) -> BinResult<()>
    where
        W: Write,
    {
        self.opcode(writer, SYSMIS)
    }

    /// Writes `s` as exactly `n_chunks` 8-byte chunks.  Chunks past the end
    /// of `s`, and the tail of a partial chunk, are filled with spaces.
    pub fn string<W>(&mut self, writer: &mut W, mut s: &[u8], n_chunks: usize) -> BinResult<()>
    where
        W: Write,
    {
        for _ in 0..n_chunks {
            let (chunk, rest) = s.split_at(s.len().min(8));
            s = rest;
            if chunk.iter().all(|byte| *byte == b' ') {
                self.opcode(writer, BLANKS)?;
            } else {
                self.opcode(writer, LITERAL)?;
                self.operands.extend_from_slice(chunk);
                self.operands.extend(repeat_n(b' ', 8 - chunk.len()));
            }
        }
        Ok(())
    }

    /// Emits the final, partial command block, padded with zero opcodes.
    pub fn flush<W>(&mut self, writer: &mut W) -> BinResult<()>
    where
        W: Write,
    {
        self.emit_block(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::Compressor;

    fn compressed(f: impl FnOnce(&mut Compressor, &mut Vec<u8>)) -> Vec<u8> {
        let mut compressor = Compressor::new(100.0);
        let mut out = Vec::new();
        f(&mut compressor, &mut out);
        compressor.flush(&mut out).unwrap();
        out
    }

    #[test]
    fn biased_integers() {
        let out = compressed(|c, w| {
            for number in [-99.0, 0.0, 42.0, 151.0] {
                c.number(w, number).unwrap();
            }
        });
        assert_eq!(out, vec![1, 100, 142, 251, 0, 0, 0, 0]);
    }

    #[test]
    fn literal_numbers() {
        for number in [0.5, -100.0, 152.0, 1.0e100] {
            let out = compressed(|c, w| c.number(w, number).unwrap());
            let mut expected = vec![253, 0, 0, 0, 0, 0, 0, 0];
            expected.extend_from_slice(&number.to_le_bytes());
            assert_eq!(out, expected, "for {number}");
        }
    }

    #[test]
    fn missing() {
        assert_eq!(
            compressed(|c, w| c.missing(w).unwrap()),
            vec![255, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn strings() {
        let out = compressed(|c, w| c.string(w, b"ok", 1).unwrap());
        assert_eq!(out[..8], [253, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&out[8..], b"ok      ");

        // Blank and trailing chunks compress to opcode 254 with no operand.
        let out = compressed(|c, w| c.string(w, b"exactly8bytes", 3).unwrap());
        assert_eq!(out[..8], [253, 253, 254, 0, 0, 0, 0, 0]);
        assert_eq!(&out[8..], b"exactly8bytes   ");

        let out = compressed(|c, w| c.string(w, b"        ", 1).unwrap());
        assert_eq!(out, vec![254, 0, 0, 0, 0, 0, 0, 0]);
    }

    /// 251 copies of the value 100 compress to nothing but opcode 200: 31
    /// full blocks and a final padded one, with no operand bytes at all.
    #[test]
    fn full_blocks() {
        let out = compressed(|c, w| {
            for _ in 0..251 {
                c.number(w, 100.0).unwrap();
            }
        });
        assert_eq!(out.len(), 251usize.div_ceil(8) * 8);
        for (i, byte) in out.iter().enumerate() {
            let expected = if i < 251 { 200 } else { 0 };
            assert_eq!(*byte, expected, "at offset {i}");
        }
    }

    #[test]
    fn operands_follow_their_block() {
        let out = compressed(|c, w| {
            for _ in 0..9 {
                c.number(w, 0.25).unwrap();
            }
        });
        // First block: 8 literal opcodes, then their 8 operands.
        assert_eq!(out[..8], [253; 8]);
        assert_eq!(out[8..16], 0.25f64.to_le_bytes());
        assert_eq!(out.len(), 8 + 64 + 8 + 8);
        // Second block: one literal opcode padded out, then one operand.
        assert_eq!(out[72..80], [253, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(out[80..], 0.25f64.to_le_bytes());
    }
}
