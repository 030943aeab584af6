// Pattern compiler: source text → AST → flat program.

mod ast;
mod lower;
mod parser;

pub use ast::{Ast, BackrefTarget, GroupKind};

use crate::matcher::encoding::RegexEncoding;
use crate::options::Options;
use crate::program::{CaptureTable, Program};
use crate::regex_error::{RegexError, RegexResult};

/// Compile raw pattern bytes under `encoding` into a program and its
/// capture table.
pub fn compile(
    source: &[u8],
    options: Options,
    encoding: RegexEncoding,
) -> RegexResult<(Program, CaptureTable)> {
    if !encoding.validate(source) {
        return Err(RegexError::Encoding(
            "pattern is not valid in its encoding".to_string(),
        ));
    }
    let chars = decode_source(source, encoding);
    let ast = parser::parse_pattern(&chars, options)?;
    lower::lower(&ast, options, encoding)
}

fn decode_source(source: &[u8], encoding: RegexEncoding) -> Vec<char> {
    let mut chars = Vec::with_capacity(source.len());
    let mut at = 0;
    while let Some((c, width)) = encoding.decode(source, at) {
        chars.push(c);
        at += width;
    }
    chars
}
