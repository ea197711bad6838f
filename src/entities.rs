/*!
# Entity reference resolution

Holds the table of general entities declared in the DOCTYPE internal subset
and the machinery to expand references to them, including references nested
inside replacement text.

The five predefined entities (`&lt;`, `&gt;`, `&amp;`, `&apos;`, `&quot;`)
are resolved through [`resolve_predefined`] before any table lookup takes
place and can therefore not be shadowed by declarations.
*/
use std::collections::HashMap;

use smartstring::alias::String as SmartString;

use crate::error::{LimitError, WFError};

/// Radix of a character reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CharRefRadix {
	Decimal,
	Hexadecimal,
}

/// Resolution failure during entity expansion.
///
/// Carries no position; the lexer attaches the position of the reference
/// which triggered the expansion.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ExpandError {
	Wf(WFError),
	Limit(LimitError),
}

impl From<WFError> for ExpandError {
	fn from(other: WFError) -> Self {
		Self::Wf(other)
	}
}

impl From<LimitError> for ExpandError {
	fn from(other: LimitError) -> Self {
		Self::Limit(other)
	}
}

/// Resolve one of the five predefined entities to its replacement byte.
pub fn resolve_predefined(name: &[u8]) -> Option<u8> {
	match name {
		b"amp" => Some(b'&'),
		b"lt" => Some(b'<'),
		b"gt" => Some(b'>'),
		b"apos" => Some(b'\''),
		b"quot" => Some(b'"'),
		_ => None,
	}
}

/// Resolve a character reference body (digits only, without `&#`/`&#x` and
/// `;`) and append its UTF-8 encoding to `into`.
///
/// The referenced codepoint must be a valid XML 1.0 `Char`.
pub fn resolve_char_reference(
	s: &str,
	radix: CharRefRadix,
	into: &mut Vec<u8>,
) -> Result<(), WFError> {
	let radix = match radix {
		CharRefRadix::Decimal => 10,
		CharRefRadix::Hexadecimal => 16,
	};
	let codepoint = match u32::from_str_radix(s, radix) {
		Ok(v) => v,
		Err(_) => return Err(WFError::InvalidSyntax("malformed character reference")),
	};
	let ch = match std::char::from_u32(codepoint) {
		Some(ch) => ch,
		None => {
			return Err(WFError::InvalidChar(
				crate::errctx::ERRCTX_UNKNOWN,
				codepoint,
				true,
			))
		}
	};
	if !crate::selectors::CharSelector::select(&crate::selectors::CLASS_XML_NONCHAR, ch) {
		let mut buf = [0u8; 4];
		let s = ch.encode_utf8(&mut buf[..]);
		into.extend_from_slice(s.as_bytes());
		Ok(())
	} else {
		Err(WFError::InvalidChar(
			crate::errctx::ERRCTX_UNKNOWN,
			codepoint,
			true,
		))
	}
}

/**
# Table of declared general entities

Populated from `<!ENTITY name "replacement">` declarations in the DOCTYPE
internal subset. Replacement text is stored raw; references inside it are
expanded at use time via [`EntityTable::expand_into`], which bounds the
nesting depth, detects cycles through an active-name set and caps the
produced output.
*/
pub struct EntityTable {
	map: HashMap<SmartString, String>,
}

impl EntityTable {
	/// Create an empty table.
	///
	/// The predefined entities are not stored here; they are resolved in a
	/// fast path before the table is consulted (see [`resolve_predefined`]).
	pub fn new() -> EntityTable {
		EntityTable {
			map: HashMap::new(),
		}
	}

	/// Declare an entity.
	///
	/// Per XML 1.0 § 4.2, the first declaration of a name is binding; a
	/// repeated declaration is ignored. Returns whether the declaration was
	/// recorded.
	pub fn declare(&mut self, name: &str, replacement: &str) -> bool {
		if resolve_predefined(name.as_bytes()).is_some() || self.map.contains_key(name) {
			return false;
		}
		self.map.insert(name.into(), replacement.into());
		true
	}

	/// Look up the raw (unexpanded) replacement text of an entity.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.map.get(name).map(|s| s.as_str())
	}

	/// Number of declared entities.
	pub fn len(&self) -> usize {
		self.map.len()
	}

	/// Expand the entity `name` into `out`, recursively resolving
	/// references inside the replacement text.
	///
	/// `max_depth` bounds the number of simultaneously active expansions,
	/// `max_output` bounds the total size of `out`.
	pub(crate) fn expand_into(
		&self,
		name: &str,
		max_depth: usize,
		max_output: usize,
		out: &mut Vec<u8>,
	) -> Result<(), ExpandError> {
		let mut active: Vec<SmartString> = Vec::new();
		self.expand_inner(name, max_depth, max_output, &mut active, out)
	}

	fn expand_inner(
		&self,
		name: &str,
		max_depth: usize,
		max_output: usize,
		active: &mut Vec<SmartString>,
		out: &mut Vec<u8>,
	) -> Result<(), ExpandError> {
		if active.iter().any(|n| n == name) {
			return Err(WFError::RecursiveEntity.into());
		}
		if active.len() >= max_depth {
			return Err(LimitError::EntityExpansionTooDeep.into());
		}
		let replacement = match self.get(name) {
			Some(r) => r,
			None => return Err(WFError::UndeclaredEntity.into()),
		};
		active.push(name.into());
		let mut rest = replacement;
		loop {
			let pos = match rest.find(|c| c == '&' || c == '%') {
				Some(pos) => pos,
				None => {
					Self::emit(&rest.as_bytes(), max_output, out)?;
					break;
				}
			};
			Self::emit(&rest.as_bytes()[..pos], max_output, out)?;
			if rest.as_bytes()[pos] == b'%' {
				return Err(
					WFError::InvalidSyntax("parameter entity reference in replacement text")
						.into(),
				);
			}
			let tail = &rest[pos + 1..];
			let semi = match tail.find(';') {
				Some(semi) => semi,
				None => {
					return Err(
						WFError::InvalidSyntax("unterminated reference in replacement text")
							.into(),
					)
				}
			};
			let body = &tail[..semi];
			if let Some(digits) = body.strip_prefix("#x") {
				resolve_char_reference(digits, CharRefRadix::Hexadecimal, out)?;
			} else if let Some(digits) = body.strip_prefix('#') {
				resolve_char_reference(digits, CharRefRadix::Decimal, out)?;
			} else if let Some(b) = resolve_predefined(body.as_bytes()) {
				Self::emit(&[b], max_output, out)?;
			} else {
				self.expand_inner(body, max_depth, max_output, active, out)?;
			}
			if out.len() > max_output {
				return Err(LimitError::EntityExpansionTooLarge.into());
			}
			rest = &tail[semi + 1..];
		}
		active.pop();
		Ok(())
	}

	fn emit(bytes: &[u8], max_output: usize, out: &mut Vec<u8>) -> Result<(), ExpandError> {
		if out.len() + bytes.len() > max_output {
			return Err(LimitError::EntityExpansionTooLarge.into());
		}
		out.extend_from_slice(bytes);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn expand(t: &EntityTable, name: &str) -> Result<String, ExpandError> {
		let mut out = Vec::new();
		t.expand_into(name, 16, 8192, &mut out)?;
		Ok(String::from_utf8(out).unwrap())
	}

	#[test]
	fn predefined_entities_resolve_to_single_bytes() {
		assert_eq!(resolve_predefined(b"amp"), Some(b'&'));
		assert_eq!(resolve_predefined(b"lt"), Some(b'<'));
		assert_eq!(resolve_predefined(b"gt"), Some(b'>'));
		assert_eq!(resolve_predefined(b"apos"), Some(b'\''));
		assert_eq!(resolve_predefined(b"quot"), Some(b'"'));
		assert_eq!(resolve_predefined(b"copy"), None);
	}

	#[test]
	fn declare_and_expand_simple() {
		let mut t = EntityTable::new();
		assert!(t.declare("greeting", "hello"));
		assert_eq!(expand(&t, "greeting").unwrap(), "hello");
	}

	#[test]
	fn first_declaration_wins() {
		let mut t = EntityTable::new();
		assert!(t.declare("e", "one"));
		assert!(!t.declare("e", "two"));
		assert_eq!(expand(&t, "e").unwrap(), "one");
	}

	#[test]
	fn predefined_entities_cannot_be_shadowed() {
		let mut t = EntityTable::new();
		assert!(!t.declare("lt", "not-less-than"));
		assert!(t.get("lt").is_none());
	}

	#[test]
	fn nested_references_are_expanded() {
		let mut t = EntityTable::new();
		t.declare("inner", "world");
		t.declare("outer", "hello &inner;!");
		assert_eq!(expand(&t, "outer").unwrap(), "hello world!");
	}

	#[test]
	fn char_and_predefined_references_in_replacement() {
		let mut t = EntityTable::new();
		t.declare("e", "&#60;a&gt; &#x26;");
		assert_eq!(expand(&t, "e").unwrap(), "<a> &");
	}

	#[test]
	fn undeclared_entity_is_an_error() {
		let t = EntityTable::new();
		assert_eq!(
			expand(&t, "nope").err().unwrap(),
			ExpandError::Wf(WFError::UndeclaredEntity)
		);
	}

	#[test]
	fn direct_cycle_is_detected() {
		let mut t = EntityTable::new();
		t.declare("a", "&a;");
		assert_eq!(
			expand(&t, "a").err().unwrap(),
			ExpandError::Wf(WFError::RecursiveEntity)
		);
	}

	#[test]
	fn indirect_cycle_is_detected() {
		let mut t = EntityTable::new();
		t.declare("a", "x&b;");
		t.declare("b", "y&a;");
		assert_eq!(
			expand(&t, "a").err().unwrap(),
			ExpandError::Wf(WFError::RecursiveEntity)
		);
	}

	#[test]
	fn expansion_depth_is_bounded() {
		let mut t = EntityTable::new();
		t.declare("e0", "leaf");
		for i in 1..8 {
			let name = format!("e{}", i);
			let replacement = format!("&e{};", i - 1);
			t.declare(&name, &replacement);
		}
		let mut out = Vec::new();
		assert!(t.expand_into("e7", 16, 8192, &mut out).is_ok());
		out.clear();
		assert_eq!(
			t.expand_into("e7", 4, 8192, &mut out).err().unwrap(),
			ExpandError::Limit(LimitError::EntityExpansionTooDeep)
		);
	}

	#[test]
	fn expansion_output_is_bounded() {
		let mut t = EntityTable::new();
		t.declare("lol", "0123456789");
		t.declare("lol2", "&lol;&lol;&lol;&lol;");
		t.declare("lol3", "&lol2;&lol2;&lol2;&lol2;");
		let mut out = Vec::new();
		assert_eq!(
			t.expand_into("lol3", 16, 64, &mut out).err().unwrap(),
			ExpandError::Limit(LimitError::EntityExpansionTooLarge)
		);
	}

	#[test]
	fn bare_ampersand_in_replacement_is_an_error() {
		let mut t = EntityTable::new();
		t.declare("e", "a & b");
		assert!(matches!(
			expand(&t, "e").err().unwrap(),
			ExpandError::Wf(WFError::InvalidSyntax(_))
		));
	}

	#[test]
	fn parameter_entity_reference_in_replacement_is_an_error() {
		let mut t = EntityTable::new();
		t.declare("e", "a %pe; b");
		assert!(matches!(
			expand(&t, "e").err().unwrap(),
			ExpandError::Wf(WFError::InvalidSyntax(_))
		));
	}

	#[test]
	fn char_reference_to_invalid_codepoint_is_an_error() {
		let mut t = EntityTable::new();
		t.declare("e", "&#0;");
		assert!(matches!(
			expand(&t, "e").err().unwrap(),
			ExpandError::Wf(WFError::InvalidChar(_, 0, true))
		));
	}
}
