/*!
# Error context strings

Static context fragments used in error messages. They are phrased so that
they read naturally after the error description, e.g.
`"invalid eof inside comment"`.
*/

pub const ERRCTX_UNKNOWN: &'static str = "in unknown context";
pub const ERRCTX_DOCBEGIN: &'static str = "at beginning of document";
pub const ERRCTX_DOCEND: &'static str = "at end of document";
pub const ERRCTX_TEXT: &'static str = "in text";
pub const ERRCTX_ELEMENT: &'static str = "in element";
pub const ERRCTX_ELEMENT_FOOT: &'static str = "in element footer";
pub const ERRCTX_ELEMENT_CLOSE: &'static str = "in element closure";
pub const ERRCTX_NAME: &'static str = "in name";
pub const ERRCTX_NAMESTART: &'static str = "at start of name";
pub const ERRCTX_ATTVAL: &'static str = "in attribute value";
pub const ERRCTX_REF: &'static str = "in reference";
pub const ERRCTX_XML_DECL: &'static str = "in XML declaration";
pub const ERRCTX_XML_DECL_END: &'static str = "at end of XML declaration";
pub const ERRCTX_CDATA_SECTION: &'static str = "inside CDATA section";
pub const ERRCTX_CDATA_SECTION_START: &'static str = "at start of CDATA section";
pub const ERRCTX_COMMENT: &'static str = "inside comment";
pub const ERRCTX_PI: &'static str = "in processing instruction";
pub const ERRCTX_PI_TARGET: &'static str = "in processing instruction target";
pub const ERRCTX_DOCTYPE: &'static str = "in document type declaration";
pub const ERRCTX_ENTITY_DECL: &'static str = "in entity declaration";
pub const ERRCTX_NOTATION_DECL: &'static str = "in notation declaration";
