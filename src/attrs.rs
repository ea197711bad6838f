/*!
# Per-element attribute storage

One [`Attributes`] table is built for every start tag and handed to the
consumer inside the
[`StartElement`](crate::parser::Event::StartElement) event. Attribute order
is document order. Names within one table are unique; the table rejects
duplicates at insertion time.
*/
use std::fmt;
use std::slice;

use crate::error::WFError;
use crate::strings::{CData, CDataStr, Name, NameStr};

/// A single attribute name/value pair.
///
/// The value is stored post-normalization: surrounding quotes stripped,
/// whitespace folded to spaces, references expanded.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
	pub name: Name,
	pub value: CData,
}

/// Ordered collection of the attributes of one start tag.
#[derive(Clone, PartialEq)]
pub struct Attributes {
	items: Vec<Attribute>,
}

impl Attributes {
	pub fn new() -> Attributes {
		Attributes { items: Vec::new() }
	}

	/// Append an attribute.
	///
	/// Fails with [`WFError::DuplicateAttribute`] if the name is already
	/// present. The configured slot limit is enforced by the caller, which
	/// knows the configuration.
	pub(crate) fn push(&mut self, name: Name, value: CData) -> Result<(), WFError> {
		if self.items.iter().any(|a| a.name == name) {
			return Err(WFError::DuplicateAttribute);
		}
		self.items.push(Attribute {
			name: name,
			value: value,
		});
		Ok(())
	}

	/// Number of attributes.
	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Access an attribute by index, in document order.
	pub fn get(&self, i: usize) -> Option<&Attribute> {
		self.items.get(i)
	}

	/// Look up an attribute value by name.
	pub fn value_of<T: AsRef<NameStr>>(&self, name: T) -> Option<&CDataStr> {
		let name = name.as_ref();
		self.items
			.iter()
			.find(|a| *a.name == *name)
			.map(|a| &*a.value)
	}

	pub fn iter(&self) -> slice::Iter<'_, Attribute> {
		self.items.iter()
	}
}

impl<'x> IntoIterator for &'x Attributes {
	type Item = &'x Attribute;
	type IntoIter = slice::Iter<'x, Attribute>;

	fn into_iter(self) -> Self::IntoIter {
		self.items.iter()
	}
}

impl fmt::Debug for Attributes {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.debug_list().entries(self.items.iter()).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::convert::TryInto;

	fn name(s: &str) -> Name {
		s.try_into().unwrap()
	}

	fn value(s: &str) -> CData {
		s.try_into().unwrap()
	}

	#[test]
	fn push_preserves_document_order() {
		let mut attrs = Attributes::new();
		attrs.push(name("b"), value("2")).unwrap();
		attrs.push(name("a"), value("1")).unwrap();
		assert_eq!(attrs.len(), 2);
		assert_eq!(attrs.get(0).unwrap().name, "b");
		assert_eq!(attrs.get(1).unwrap().name, "a");
	}

	#[test]
	fn duplicate_name_is_rejected() {
		let mut attrs = Attributes::new();
		attrs.push(name("x"), value("1")).unwrap();
		assert_eq!(
			attrs.push(name("x"), value("2")).err().unwrap(),
			WFError::DuplicateAttribute
		);
		assert_eq!(attrs.len(), 1);
		assert_eq!(&*attrs.value_of(&*name("x")).unwrap(), "1");
	}

	#[test]
	fn value_lookup_by_name() {
		let mut attrs = Attributes::new();
		attrs.push(name("x"), value("foo")).unwrap();
		attrs.push(name("xmlns:y"), value("urn:example")).unwrap();
		assert_eq!(&*attrs.value_of(&*name("xmlns:y")).unwrap(), "urn:example");
		assert!(attrs.value_of(&*name("z")).is_none());
	}

	#[test]
	fn iteration_yields_pairs() {
		let mut attrs = Attributes::new();
		attrs.push(name("a"), value("1")).unwrap();
		attrs.push(name("b"), value("2")).unwrap();
		let collected: Vec<(String, String)> = attrs
			.iter()
			.map(|a| (a.name.to_string(), a.value.to_string()))
			.collect();
		assert_eq!(
			collected,
			vec![
				("a".to_string(), "1".to_string()),
				("b".to_string(), "2".to_string())
			]
		);
	}
}
