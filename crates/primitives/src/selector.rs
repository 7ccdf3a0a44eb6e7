//! Function selectors and their canonical signatures.
//!
//! A selector is the first four bytes of `sha256(canonical_signature)`. The
//! canonical form strips whitespace and expands the integer aliases, so
//! `setPrice(uint, int, int, int)` and `setPrice(uint256,int256,int256,int256)`
//! resolve to the same dispatch key.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Malformed function signature.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
	#[error("signature is missing a parameter list: {0:?}")]
	MissingParams(String),
	#[error("invalid function name in signature: {0:?}")]
	InvalidName(String),
	#[error("unbalanced brackets in signature: {0:?}")]
	Unbalanced(String),
	#[error("empty parameter type in signature: {0:?}")]
	EmptyParameter(String),
	#[error("unexpected character {ch:?} in signature: {sig:?}")]
	UnexpectedChar { sig: String, ch: char },
}

/// A function signature in canonical form, e.g. `getPrice(int256,int256,int256)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature {
	canonical: String,
	name_len: usize,
}

impl Signature {
	/// Parses and normalizes a human-written signature.
	pub fn parse(raw: &str) -> Result<Self, SignatureError> {
		let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
		let open = compact
			.find('(')
			.ok_or_else(|| SignatureError::MissingParams(raw.to_string()))?;
		if !compact.ends_with(')') {
			return Err(SignatureError::MissingParams(raw.to_string()));
		}

		let name = &compact[..open];
		if !is_identifier(name) {
			return Err(SignatureError::InvalidName(raw.to_string()));
		}

		let params = normalize_params(&compact[open..], raw)?;
		let mut canonical = String::with_capacity(name.len() + params.len());
		canonical.push_str(name);
		canonical.push_str(&params);
		Ok(Self {
			canonical,
			name_len: name.len(),
		})
	}

	pub fn name(&self) -> &str {
		&self.canonical[..self.name_len]
	}

	/// Parameter list including the enclosing parentheses.
	pub fn params(&self) -> &str {
		&self.canonical[self.name_len..]
	}

	pub fn as_str(&self) -> &str {
		&self.canonical
	}

	pub fn selector(&self) -> Selector {
		Selector::from_signature(self)
	}
}

impl fmt::Display for Signature {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.canonical)
	}
}

fn is_identifier(name: &str) -> bool {
	let mut chars = name.chars();
	match chars.next() {
		Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
		_ => return false,
	}
	chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Walks `(..)` expanding type aliases and checking bracket structure.
fn normalize_params(params: &str, raw: &str) -> Result<String, SignatureError> {
	let mut depth = 0usize;
	for (idx, ch) in params.char_indices() {
		match ch {
			'(' => depth += 1,
			')' => {
				depth = depth
					.checked_sub(1)
					.ok_or_else(|| SignatureError::Unbalanced(raw.to_string()))?;
				// The parameter list closes exactly once, at the end.
				if depth == 0 && idx + 1 != params.len() {
					return Err(SignatureError::Unbalanced(raw.to_string()));
				}
			}
			_ => {}
		}
	}

	let mut out = String::with_capacity(params.len() + 16);
	let mut stack: Vec<char> = Vec::new();
	let mut word = String::new();
	let mut prev = '\0';

	for ch in params.chars() {
		if ch.is_ascii_alphanumeric() {
			word.push(ch);
			prev = ch;
			continue;
		}
		flush_word(&mut word, &mut out);

		match ch {
			'(' | '[' => stack.push(ch),
			')' => {
				if stack.pop() != Some('(') {
					return Err(SignatureError::Unbalanced(raw.to_string()));
				}
				if prev == ',' {
					return Err(SignatureError::EmptyParameter(raw.to_string()));
				}
			}
			']' => {
				if stack.pop() != Some('[') {
					return Err(SignatureError::Unbalanced(raw.to_string()));
				}
			}
			',' => {
				if prev == ',' || prev == '(' {
					return Err(SignatureError::EmptyParameter(raw.to_string()));
				}
			}
			_ => {
				return Err(SignatureError::UnexpectedChar {
					sig: raw.to_string(),
					ch,
				});
			}
		}
		out.push(ch);
		prev = ch;
	}
	flush_word(&mut word, &mut out);

	if !stack.is_empty() {
		return Err(SignatureError::Unbalanced(raw.to_string()));
	}
	Ok(out)
}

fn flush_word(word: &mut String, out: &mut String) {
	if word.is_empty() {
		return;
	}
	out.push_str(match word.as_str() {
		"uint" => "uint256",
		"int" => "int256",
		"byte" => "bytes1",
		other => other,
	});
	word.clear();
}

/// Four-byte dispatch key derived from a canonical signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Selector([u8; 4]);

impl Selector {
	pub const fn from_bytes(bytes: [u8; 4]) -> Self {
		Self(bytes)
	}

	/// Parses `signature` and derives its selector.
	pub fn of(signature: &str) -> Result<Self, SignatureError> {
		Signature::parse(signature).map(|sig| Self::from_signature(&sig))
	}

	pub fn from_signature(signature: &Signature) -> Self {
		let digest = Sha256::digest(signature.as_str().as_bytes());
		Self([digest[0], digest[1], digest[2], digest[3]])
	}

	pub const fn as_bytes(&self) -> &[u8; 4] {
		&self.0
	}
}

impl fmt::Display for Selector {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{}", hex::encode(self.0))
	}
}

impl fmt::Debug for Selector {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Selector(0x{})", hex::encode(self.0))
	}
}

/// ERC-165 style interface identifier: XOR of every selector in the interface.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InterfaceId([u8; 4]);

impl InterfaceId {
	pub const fn from_bytes(bytes: [u8; 4]) -> Self {
		Self(bytes)
	}

	pub fn from_selectors<I>(selectors: I) -> Self
	where
		I: IntoIterator<Item = Selector>,
	{
		let mut acc = [0u8; 4];
		for selector in selectors {
			for (a, b) in acc.iter_mut().zip(selector.0) {
				*a ^= b;
			}
		}
		Self(acc)
	}

	/// Interface id of a list of signatures.
	pub fn of(signatures: &[&str]) -> Result<Self, SignatureError> {
		let selectors = signatures
			.iter()
			.map(|sig| Selector::of(sig))
			.collect::<Result<Vec<_>, _>>()?;
		Ok(Self::from_selectors(selectors))
	}
}

impl From<Selector> for InterfaceId {
	fn from(selector: Selector) -> Self {
		Self(selector.0)
	}
}

impl fmt::Display for InterfaceId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{}", hex::encode(self.0))
	}
}

impl fmt::Debug for InterfaceId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "InterfaceId(0x{})", hex::encode(self.0))
	}
}
