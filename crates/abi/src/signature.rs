//! Parser for human-readable function signatures.
//!
//! Accepts the canonical form (`transfer(address,uint256)`) as well as the
//! Solidity-like forms used in tooling, e.g.
//! `function allowance(address owner) external view returns (uint256)`.

use crate::{AbiError, AbiResult, MethodDescriptor, ParamType};

/// Words that may follow the parameter list and carry no ABI meaning.
const MODIFIERS: &[&str] = &[
    "external",
    "public",
    "internal",
    "view",
    "pure",
    "payable",
    "nonpayable",
    "constant",
];

/// Parses a function signature into a method descriptor
pub fn parse_signature(text: &str) -> AbiResult<MethodDescriptor> {
    let mut parser = Parser::new(text);
    parser.skip_ws();

    let mut name = parser
        .ident()
        .ok_or_else(|| parser.error("expected function name"))?;
    if name == "function" {
        parser.skip_ws();
        name = parser
            .ident()
            .ok_or_else(|| parser.error("expected function name"))?;
    }

    parser.skip_ws();
    let inputs = parser.param_list()?;
    let mut outputs = Vec::new();
    let mut seen_returns = false;

    loop {
        parser.skip_ws();
        if parser.at_end() {
            break;
        }
        if parser.eat(b';') {
            parser.skip_ws();
            if !parser.at_end() {
                return Err(parser.error("unexpected input after ';'"));
            }
            break;
        }

        let word_start = parser.pos;
        match parser.ident() {
            Some("returns") if !seen_returns => {
                seen_returns = true;
                parser.skip_ws();
                outputs = parser.param_list()?;
            }
            Some(word) if MODIFIERS.contains(&word) => {}
            Some(word) => {
                let reason = format!("unexpected '{word}'");
                parser.pos = word_start;
                return Err(parser.error(reason));
            }
            None => return Err(parser.error("unexpected character")),
        }
    }

    Ok(MethodDescriptor::new(name, inputs, outputs))
}

/// Parses a single type such as `uint256[]` or `(address,bool)`
pub(crate) fn parse_type(text: &str) -> AbiResult<ParamType> {
    let mut parser = Parser::new(text);
    parser.skip_ws();
    let ty = parser.ty()?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(parser.error("unexpected input after type"));
    }
    Ok(ty)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn error(&self, reason: impl Into<String>) -> AbiError {
        AbiError::SignatureParse {
            signature: self.src.to_string(),
            position: self.pos,
            reason: reason.into(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8) -> AbiResult<()> {
        if self.eat(byte) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", byte as char)))
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn ident(&mut self) -> Option<&'a str> {
        let start = self.pos;
        match self.peek() {
            Some(b) if b.is_ascii_alphabetic() || b == b'_' || b == b'$' => self.pos += 1,
            _ => return None,
        }
        while matches!(self.peek(), Some(b) if b.is_ascii_alphanumeric() || b == b'_' || b == b'$')
        {
            self.pos += 1;
        }
        Some(&self.src[start..self.pos])
    }

    fn number(&mut self) -> AbiResult<usize> {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        let digits = &self.src[start..self.pos];
        if digits.is_empty() {
            return Err(self.error("expected a number"));
        }
        digits.parse().map_err(|_| {
            let mut at = Parser::new(self.src);
            at.pos = start;
            at.error(format!("number '{digits}' out of range"))
        })
    }

    /// `(` [param (`,` param)*] `)`
    fn param_list(&mut self) -> AbiResult<Vec<ParamType>> {
        self.expect(b'(')?;
        self.skip_ws();
        let mut params = Vec::new();
        if self.eat(b')') {
            return Ok(params);
        }
        loop {
            self.skip_ws();
            params.push(self.param()?);
            self.skip_ws();
            if self.eat(b',') {
                continue;
            }
            if self.eat(b')') {
                return Ok(params);
            }
            return Err(if self.at_end() {
                self.error("unbalanced parentheses")
            } else {
                self.error("expected ',' or ')'")
            });
        }
    }

    /// A type optionally followed by a data location and a name.
    fn param(&mut self) -> AbiResult<ParamType> {
        let ty = self.ty()?;
        loop {
            self.skip_ws();
            if self.ident().is_none() {
                return Ok(ty);
            }
        }
    }

    fn ty(&mut self) -> AbiResult<ParamType> {
        let mut ty = self.base_type()?;
        while self.eat(b'[') {
            if self.eat(b']') {
                ty = ParamType::Array(Box::new(ty));
                continue;
            }
            let len_pos = self.pos;
            let len = self.number()?;
            if len == 0 {
                self.pos = len_pos;
                return Err(self.error("fixed array length must be positive"));
            }
            self.expect(b']')?;
            ty = ParamType::FixedArray(Box::new(ty), len);
            if ty.head_size().is_none() {
                self.pos = len_pos;
                return Err(self.error(format!("fixed array length {len} too large")));
            }
        }
        Ok(ty)
    }

    fn tuple(&mut self) -> AbiResult<ParamType> {
        let start = self.pos;
        let types = self.param_list()?;
        if types.is_empty() {
            self.pos = start;
            return Err(self.error("empty tuple type"));
        }
        Ok(ParamType::Tuple(types))
    }

    fn base_type(&mut self) -> AbiResult<ParamType> {
        if self.peek() == Some(b'(') {
            return self.tuple();
        }

        let start = self.pos;
        let word = self.ident().ok_or_else(|| self.error("expected a type"))?;
        let ty = match word {
            "address" => Some(ParamType::Address),
            "bool" => Some(ParamType::Bool),
            "string" => Some(ParamType::String),
            "bytes" => Some(ParamType::Bytes),
            "uint" => Some(ParamType::Uint(256)),
            "int" => Some(ParamType::Int(256)),
            "tuple" if self.peek() == Some(b'(') => return self.tuple(),
            _ => sized_type(word),
        };

        ty.ok_or_else(|| {
            let mut at = Parser::new(self.src);
            at.pos = start;
            at.error(format!("unknown type '{word}'"))
        })
    }
}

fn sized_type(word: &str) -> Option<ParamType> {
    let (prefix, digits) = word.split_at(word.find(|c: char| c.is_ascii_digit())?);
    if digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let size: usize = digits.parse().ok()?;
    match prefix {
        "uint" if size % 8 == 0 && (8..=256).contains(&size) => Some(ParamType::Uint(size)),
        "int" if size % 8 == 0 && (8..=256).contains(&size) => Some(ParamType::Int(size)),
        "bytes" if (1..=32).contains(&size) => Some(ParamType::FixedBytes(size)),
        _ => None,
    }
}
