/*!
# Byte-level selectors for bulk scanning

The lexer scans runs of bytes with selectors which are conservative
supersets of the corresponding codepoint classes: a byte selector must
accept every UTF-8 byte of every codepoint in the class. Final validation
against the codepoint classes happens when the accumulated bytes are turned
into [`Name`](crate::strings::Name) or [`CData`](crate::strings::CData)
values.
*/
#[cfg(test)]
use crate::selectors::{CharSelector, CodepointRange, CodepointRanges, CLASS_XML_NAMESTART};

pub trait ByteSelect {
	fn select(&self, b: u8) -> bool;
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ByteRange(pub(crate) u8, pub(crate) u8);

impl ByteSelect for ByteRange {
	fn select(&self, b: u8) -> bool {
		self.0 <= b && b <= self.1
	}
}

impl ByteSelect for u8 {
	fn select(&self, b: u8) -> bool {
		b == *self
	}
}

impl ByteSelect for &'_ [u8] {
	fn select(&self, b: u8) -> bool {
		for r in *self {
			if *r == b {
				return true;
			}
		}
		false
	}
}

impl ByteSelect for &'_ [ByteRange] {
	fn select(&self, b: u8) -> bool {
		for r in *self {
			if r.select(b) {
				return true;
			}
		}
		false
	}
}

pub struct AnyByte();

impl ByteSelect for AnyByte {
	fn select(&self, _b: u8) -> bool {
		true
	}
}

pub static CLASS_XML_NAMESTART_BYTE: &'static [ByteRange] = &[
	ByteRange(b':', b':'),
	ByteRange(b'A', b'Z'),
	ByteRange(b'_', b'_'),
	ByteRange(b'a', b'z'),
	// and now essentially all utf8 start bytes
	ByteRange(b'\xc3', b'\xf7'),
];

pub static CLASS_XML_NAME_BYTE: &'static [ByteRange] = &[
	ByteRange(b':', b':'),
	ByteRange(b'-', b'-'),
	ByteRange(b'.', b'.'),
	ByteRange(b'A', b'Z'),
	ByteRange(b'_', b'_'),
	ByteRange(b'0', b'9'),
	ByteRange(b'a', b'z'),
	ByteRange(b'\x80', b'\xff'),
];

/// Bytes which may belong to a codepoint outside the XML `Char` production.
///
/// Matching one of these is not proof of an invalid document; it merely
/// forces the slow path which validates the codepoint.
pub static CLASS_XML_MAY_NONCHAR_BYTE: &'static [ByteRange] = &[
	ByteRange(b'\x00', b'\x08'),
	ByteRange(b'\x0b', b'\x0c'),
	ByteRange(b'\x0e', b'\x1f'),
];

/// Valid bytes for XML character data minus delimiters (XML 1.0 § 2.4 \[14\])
///
/// The following chars are excluded:
///
/// - `'\r'`, because that gets folded into a line feed (`\n`) on input
/// - `'&'`, because that may start an entity or character reference
/// - `'<'`, because that may start an element or CDATA section
/// - `']'`, because the sequence `]]>` is not allowed verbatimly in
///   character data
pub static CLASS_XML_TEXT_DELIMITED_BYTE: &'static [ByteRange] = &[
	ByteRange(b'\x09', b'\x0a'),
	ByteRange(b'\x20', b'\x25'), // excludes &
	ByteRange(b'\x27', b'\x3b'), // excludes <
	ByteRange(b'\x3d', b'\x5c'), // excludes ]
	ByteRange(b'\x5e', b'\x7f'),
	ByteRange(b'\x80', b'\xff'),
];

// XML 1.0 § 2.4 [14]
pub static CLASS_XML_CDATA_SECTION_DELIMITED_BYTE: &'static [ByteRange] = &[
	ByteRange(b'\x09', b'\x0a'),
	// excluding CR as that gets folded to LF
	ByteRange(b'\x20', b'\x5c'), // excludes ]
	ByteRange(b'\x5e', b'\x7f'),
	ByteRange(b'\x80', b'\xff'),
];

/// Comment contents minus `'-'` (end detection) and `'\r'` (folding).
pub static CLASS_XML_COMMENT_DELIMITED_BYTE: &'static [ByteRange] = &[
	ByteRange(b'\x09', b'\x0a'),
	ByteRange(b'\x20', b'\x2c'), // excludes -
	ByteRange(b'\x2e', b'\x7f'),
	ByteRange(b'\x80', b'\xff'),
];

/// Processing instruction data minus `'?'` (end detection) and `'\r'`
/// (folding).
pub static CLASS_XML_PI_DELIMITED_BYTE: &'static [ByteRange] = &[
	ByteRange(b'\x09', b'\x0a'),
	ByteRange(b'\x20', b'\x3e'), // excludes ?
	ByteRange(b'\x40', b'\x7f'),
	ByteRange(b'\x80', b'\xff'),
];

/// XML whitespace
pub static CLASS_XML_SPACE_BYTE: &'static [u8] = b" \t\r\n";

// XML 1.0 § 2.3 [10]
pub const CLASS_XML_CDATA_ATT_APOS_DELIMITED_BYTE: &'static [ByteRange] = &[
	// exclude all whitespace except normal space because those get
	// converted into spaces
	ByteRange(b'\x20', b'\x25'), // excludes &, '
	ByteRange(b'\x28', b'\x3b'), // excludes <
	ByteRange(b'\x3d', b'\xff'),
];

// XML 1.0 § 2.3 [10]
pub const CLASS_XML_CDATA_ATT_QUOT_DELIMITED_BYTE: &'static [ByteRange] = &[
	// exclude all whitespace except normal space because those get
	// converted into spaces
	ByteRange(b'\x20', b'\x21'), // excludes "
	ByteRange(b'\x23', b'\x25'), // excludes &
	ByteRange(b'\x27', b'\x3b'), // excludes <
	ByteRange(b'\x3d', b'\xff'),
];

// XML 1.0 § 2.3 [9] EntityValue; references stay raw in the stored
// replacement text, so '&' and '%' are ordinary bytes here
pub const CLASS_XML_ENTITY_VALUE_APOS_DELIMITED_BYTE: &'static [ByteRange] = &[
	ByteRange(b'\x09', b'\x0a'),
	ByteRange(b'\x20', b'\x26'), // excludes '
	ByteRange(b'\x28', b'\xff'),
];

// XML 1.0 § 2.3 [9]
pub const CLASS_XML_ENTITY_VALUE_QUOT_DELIMITED_BYTE: &'static [ByteRange] = &[
	ByteRange(b'\x09', b'\x0a'),
	ByteRange(b'\x20', b'\x21'), // excludes "
	ByteRange(b'\x23', b'\xff'),
];

// SystemLiteral / PubidLiteral contents (XML 1.0 § 2.3 [11] [12]),
// accepted permissively and discarded; no CR folding needed
pub const CLASS_XML_LITERAL_APOS_DELIMITED_BYTE: &'static [ByteRange] = &[
	ByteRange(b'\x09', b'\x0a'),
	ByteRange(b'\x0d', b'\x0d'),
	ByteRange(b'\x20', b'\x26'), // excludes '
	ByteRange(b'\x28', b'\xff'),
];

pub const CLASS_XML_LITERAL_QUOT_DELIMITED_BYTE: &'static [ByteRange] = &[
	ByteRange(b'\x09', b'\x0a'),
	ByteRange(b'\x0d', b'\x0d'),
	ByteRange(b'\x20', b'\x21'), // excludes "
	ByteRange(b'\x23', b'\xff'),
];

/// Bytes skipped inside an internal-subset declaration which is being
/// discarded; stops at `'>'` and at quotes (quoted literals may contain
/// `'>'`).
pub const CLASS_XML_SUBSET_SKIP_DELIMITED_BYTE: &'static [ByteRange] = &[
	ByteRange(b'\x09', b'\x0a'),
	ByteRange(b'\x0d', b'\x0d'),
	ByteRange(b'\x20', b'\x21'), // excludes "
	ByteRange(b'\x23', b'\x26'), // excludes '
	ByteRange(b'\x28', b'\x3d'), // excludes >
	ByteRange(b'\x3f', b'\xff'),
];

/// Valid XML decimal characters (for character references)
pub static CLASS_XML_DECIMAL_DIGIT_BYTE: ByteRange = ByteRange(b'0', b'9');

/// Valid XML hexadecimal characters (for character references)
pub static CLASS_XML_HEXADECIMAL_DIGIT_BYTE: &'static [ByteRange] = &[
	CLASS_XML_DECIMAL_DIGIT_BYTE,
	ByteRange(b'a', b'f'),
	ByteRange(b'A', b'F'),
];
