/*!
# Error types

This module holds the error types returned by the various functions of this
crate, as well as the [`TextPosition`] locator attached to every fatal
parsing error.
*/
use std::error;
use std::fmt;
use std::io;
use std::ops::Deref;
use std::result::Result as StdResult;
use std::sync::Arc;

use smartstring::alias::String as SmartString;

pub use crate::errctx::*;

/// Line/column position in the source byte stream.
///
/// Both fields are 1-based. Line counting follows XML 1.0 end-of-line
/// handling: a CR, an LF or a CRLF pair each terminate exactly one line.
/// Columns count bytes, not codepoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPosition {
	pub line: u32,
	pub column: u32,
}

impl TextPosition {
	/// Position of the first byte of a document.
	pub const fn start() -> TextPosition {
		TextPosition { line: 1, column: 1 }
	}

	pub const fn new(line: u32, column: u32) -> TextPosition {
		TextPosition {
			line: line,
			column: column,
		}
	}
}

impl fmt::Display for TextPosition {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}:{}", self.line, self.column)
	}
}

/// Violation of a well-formedness constraint or the XML 1.0 grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum WFError {
	/// End-of-file encountered during a construct where more data was
	/// expected.
	///
	/// The contents are implementation details.
	InvalidEof(&'static str),

	/// Attempt to refer to an undeclared entity.
	///
	/// **Note**: May also be emitted in some cases of malformed references,
	/// as the lexer is conservative about how many bytes it reads to
	/// interpret a reference.
	UndeclaredEntity,

	/// An entity expansion refers to an entity which is currently being
	/// expanded.
	RecursiveEntity,

	/// Unicode codepoint which is not allowed in XML 1.0 encountered.
	///
	/// The contents are implementation details.
	InvalidChar(&'static str, u32, bool),

	/// Unicode codepoint which was not expected at that point in the
	/// grammar.
	///
	/// The contents are implementation details.
	UnexpectedChar(&'static str, char, Option<&'static [&'static str]>),

	/// Byte which was not expected at that point in the grammar.
	///
	/// The contents are implementation details.
	UnexpectedByte(&'static str, u8, Option<&'static [&'static str]>),

	/// Generalized invalid syntactic construct which does not fit into any
	/// of the other categories.
	///
	/// The contents are implementation details.
	InvalidSyntax(&'static str),

	/// Token was not expected by the parser at that point in the grammar.
	///
	/// The contents are implementation details.
	UnexpectedToken(&'static str, &'static str, Option<&'static [&'static str]>),

	/// Attribute was declared multiple times in the same element.
	DuplicateAttribute,

	/// Ending tag name does not match the open element.
	ElementMismatch {
		expected: SmartString,
		actual: SmartString,
	},
}

impl error::Error for WFError {}

impl ErrorWithContext for WFError {
	fn with_context(self, ctx: &'static str) -> WFError {
		match self {
			WFError::InvalidEof(_) => WFError::InvalidEof(ctx),
			WFError::InvalidChar(_, cp, fromref) => WFError::InvalidChar(ctx, cp, fromref),
			WFError::UnexpectedChar(_, ch, alt) => WFError::UnexpectedChar(ctx, ch, alt),
			WFError::UnexpectedByte(_, b, alt) => WFError::UnexpectedByte(ctx, b, alt),
			WFError::UnexpectedToken(_, tok, alt) => WFError::UnexpectedToken(ctx, tok, alt),
			other => other,
		}
	}
}

fn write_alternatives<'f>(
	f: &'f mut fmt::Formatter,
	opts: &'static [&'static str],
) -> fmt::Result {
	f.write_str(" (expected ")?;
	if opts.len() == 1 {
		f.write_str(opts[0])?;
	} else {
		f.write_str("one of: ")?;
		for (i, opt) in opts.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			f.write_str(*opt)?;
		}
	}
	f.write_str(")")
}

impl fmt::Display for WFError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			WFError::InvalidEof(ctx) => write!(f, "invalid eof {}", ctx),
			WFError::UndeclaredEntity => f.write_str("use of undeclared entity"),
			WFError::RecursiveEntity => f.write_str("recursive entity definition"),
			WFError::InvalidChar(ctx, cp, false) => {
				write!(f, "invalid codepoint U+{:x} {}", cp, ctx)
			}
			WFError::InvalidChar(ctx, cp, true) => write!(
				f,
				"character reference expanded to invalid codepoint U+{:x} {}",
				cp, ctx
			),
			WFError::UnexpectedChar(ctx, ch, Some(opts)) if opts.len() > 0 => {
				write!(f, "U+{:x} not allowed {}", *ch as u32, ctx)?;
				write_alternatives(f, opts)
			}
			WFError::UnexpectedByte(ctx, b, Some(opts)) if opts.len() > 0 => {
				write!(f, "0x{:x} not allowed {}", *b, ctx)?;
				write_alternatives(f, opts)
			}
			WFError::UnexpectedChar(ctx, ch, _) => {
				write!(f, "U+{:x} not allowed {}", *ch as u32, ctx)
			}
			WFError::UnexpectedByte(ctx, b, _) => write!(f, "0x{:x} not allowed {}", *b, ctx),
			WFError::InvalidSyntax(msg) => write!(f, "invalid syntax: {}", msg),
			WFError::UnexpectedToken(ctx, tok, Some(opts)) if opts.len() > 0 => {
				write!(f, "unexpected {} token {}", tok, ctx)?;
				write_alternatives(f, opts)
			}
			WFError::UnexpectedToken(ctx, tok, _) => write!(f, "unexpected {} token {}", tok, ctx),
			WFError::DuplicateAttribute => f.write_str("duplicate attribute"),
			WFError::ElementMismatch { expected, actual } => write!(
				f,
				"end tag '{}' does not match open element '{}'",
				actual, expected
			),
		}
	}
}

/// A configured resource limit was exceeded.
///
/// Limits are configured through
/// [`ParserConfig`](crate::driver::ParserConfig) (or, at the component
/// level, [`LexerOptions`](crate::lexer::LexerOptions) and
/// [`ParserOptions`](crate::parser::ParserOptions)).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitError {
	/// An XML Name exceeded the name length limit.
	NameTooLong,
	/// An attribute value exceeded the text length limit.
	AttributeValueTooLong,
	/// A comment exceeded the text length limit.
	CommentTooLong,
	/// Processing instruction data exceeded the text length limit.
	ProcessingInstructionTooLong,
	/// An entity replacement text exceeded the text length limit.
	EntityValueTooLong,
	/// Entity expansion nested deeper than the configured bound.
	EntityExpansionTooDeep,
	/// A single entity expansion produced more text than the text length
	/// limit allows.
	EntityExpansionTooLarge,
	/// Elements nested deeper than the configured bound.
	NestingTooDeep,
	/// The serialized element path exceeded the path buffer limit.
	PathTooLong,
	/// A start tag carried more attributes than the configured bound.
	AttributeCountExceeded,
}

impl error::Error for LimitError {}

impl fmt::Display for LimitError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			LimitError::NameTooLong => f.write_str("name too long"),
			LimitError::AttributeValueTooLong => f.write_str("attribute value too long"),
			LimitError::CommentTooLong => f.write_str("comment too long"),
			LimitError::ProcessingInstructionTooLong => {
				f.write_str("processing instruction too long")
			}
			LimitError::EntityValueTooLong => f.write_str("entity replacement text too long"),
			LimitError::EntityExpansionTooDeep => f.write_str("entity expansion too deep"),
			LimitError::EntityExpansionTooLarge => {
				f.write_str("entity expansion result too large")
			}
			LimitError::NestingTooDeep => f.write_str("element nesting too deep"),
			LimitError::PathTooLong => f.write_str("element path too long"),
			LimitError::AttributeCountExceeded => f.write_str("too many attributes"),
		}
	}
}

/// [`std::sync::Arc`]-based wrapper around [`std::io::Error`] to allow
/// cloning.
#[derive(Clone)]
pub struct IOErrorWrapper(Arc<io::Error>);

impl IOErrorWrapper {
	fn wrap(e: io::Error) -> IOErrorWrapper {
		IOErrorWrapper(Arc::new(e))
	}
}

impl fmt::Debug for IOErrorWrapper {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		fmt::Debug::fmt(&**self, f)
	}
}

impl fmt::Display for IOErrorWrapper {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		fmt::Display::fmt(&**self, f)
	}
}

impl PartialEq for IOErrorWrapper {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl AsRef<io::Error> for IOErrorWrapper {
	fn as_ref(&self) -> &io::Error {
		&*self.0
	}
}

impl Deref for IOErrorWrapper {
	type Target = io::Error;

	fn deref(&self) -> &io::Error {
		&*self.0
	}
}

impl std::borrow::Borrow<io::Error> for IOErrorWrapper {
	fn borrow(&self) -> &io::Error {
		&*self.0
	}
}

/// Error types which may be returned from the parser or lexer.
///
/// With the exception of [`Error::IO`], all errors are fatal and will be
/// returned indefinitely from the parser or lexer after the first encounter,
/// with an unchanged [`TextPosition`].
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
	/// An I/O error was encountered.
	///
	/// I/O errors are not fatal and may be retried. This is especially
	/// important for (but not limited to)
	/// [`std::io::ErrorKind::WouldBlock`] errors, which signal that more
	/// data needs to be fed before parsing can proceed.
	///
	/// **Note:** When an unexpected end-of-file situation is encountered
	/// during parsing or lexing, that is signalled using
	/// [`Error::NotWellFormed`] instead of a
	/// [`std::io::ErrorKind::UnexpectedEof`] error.
	IO(IOErrorWrapper),

	/// A violation of the XML 1.0 grammar or a well-formedness constraint
	/// was encountered, at the given position.
	NotWellFormed(WFError, TextPosition),

	/// A configured resource limit was exceeded at the given position.
	LimitExceeded(LimitError, TextPosition),

	/// An invalid UTF-8 byte was encountered during decoding, at the given
	/// position.
	InvalidUtf8Byte(u8, TextPosition),

	/// The event handler requested an abort; parsing cannot be resumed.
	Aborted,

	/// The parser was closed before the document was complete.
	PrematureClose,
}

pub type Result<T> = StdResult<T, Error>;

pub(crate) trait ErrorWithContext {
	fn with_context(self, ctx: &'static str) -> Self;
}

impl Error {
	pub fn io(e: io::Error) -> Error {
		Error::IO(IOErrorWrapper::wrap(e))
	}

	pub(crate) fn wfeof(ctx: &'static str, at: TextPosition) -> Error {
		Error::NotWellFormed(WFError::InvalidEof(ctx), at)
	}

	/// Return the position the error refers to, if it carries one.
	///
	/// The position points at the first byte the parser could not accept.
	/// [`Error::IO`], [`Error::Aborted`] and [`Error::PrematureClose`] are
	/// not tied to a stream position.
	pub fn position(&self) -> Option<TextPosition> {
		match self {
			Error::NotWellFormed(_, at) => Some(*at),
			Error::LimitExceeded(_, at) => Some(*at),
			Error::InvalidUtf8Byte(_, at) => Some(*at),
			Error::IO(_) | Error::Aborted | Error::PrematureClose => None,
		}
	}
}

impl ErrorWithContext for Error {
	fn with_context(self, ctx: &'static str) -> Self {
		match self {
			Self::NotWellFormed(wf, at) => Self::NotWellFormed(wf.with_context(ctx), at),
			other => other,
		}
	}
}

impl From<io::Error> for Error {
	fn from(e: io::Error) -> Error {
		Error::io(e)
	}
}

impl fmt::Display for Error {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Error::NotWellFormed(e, at) => write!(f, "not-well-formed at {}: {}", at, e),
			Error::LimitExceeded(e, at) => write!(f, "limit exceeded at {}: {}", at, e),
			Error::InvalidUtf8Byte(b, at) => {
				write!(f, "invalid utf-8 byte at {}: \\x{:02x}", at, b)
			}
			Error::IO(e) => write!(f, "I/O error: {}", e),
			Error::Aborted => f.write_str("parsing aborted by event handler"),
			Error::PrematureClose => f.write_str("parser closed before end of document"),
		}
	}
}

impl error::Error for Error {
	fn source(&self) -> Option<&(dyn error::Error + 'static)> {
		match self {
			Error::IO(e) => Some(&**e),
			Error::NotWellFormed(e, _) => Some(e),
			Error::LimitExceeded(e, _) => Some(e),
			Error::InvalidUtf8Byte(..) | Error::Aborted | Error::PrematureClose => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn element_mismatch_cites_both_names() {
		let e = WFError::ElementMismatch {
			expected: "a".into(),
			actual: "b".into(),
		};
		let s = format!("{}", e);
		assert!(s.contains("'a'"));
		assert!(s.contains("'b'"));
	}

	#[test]
	fn error_position_is_carried() {
		let e = Error::NotWellFormed(WFError::DuplicateAttribute, TextPosition::new(3, 14));
		assert_eq!(e.position().unwrap(), TextPosition::new(3, 14));
		assert!(Error::Aborted.position().is_none());
	}

	#[test]
	fn with_context_rewrites_eof_context() {
		let e = Error::wfeof(ERRCTX_TEXT, TextPosition::start());
		match e.with_context(ERRCTX_COMMENT) {
			Error::NotWellFormed(WFError::InvalidEof(ctx), _) => {
				assert_eq!(ctx, ERRCTX_COMMENT)
			}
			other => panic!("unexpected error: {:?}", other),
		}
	}
}
