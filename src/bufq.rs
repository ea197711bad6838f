use std::io;

pub const ERR_NODATA: &'static str = "no data in buffer";

/// Default capacity used by [`FeedBuffer::new`].
pub const DEFAULT_CAPACITY: usize = 1024;

/**
# Fixed-capacity ring buffer between a byte producer and the lexer.

The FeedBuffer acts as a [`std::io::BufRead`]. The data which is to be read
from it must be provided using the [`FeedBuffer::push()`] method, which
copies as many bytes as currently fit and reports how many were accepted.
The producer is expected to retry rejected bytes after the consumer made
progress.

Storage is allocated once at construction and never grows; this bounds the
memory held between a transport and the parser.

When more data is being read than being pushed, a
[`std::io::ErrorKind::WouldBlock`] I/O error is returned.

## Example

```
use std::io::{BufRead, ErrorKind};
use sxml::FeedBuffer;
let mut buf = FeedBuffer::with_capacity(4);
// only four bytes fit
assert_eq!(buf.push(b"foobar"), 4);
assert_eq!(buf.fill_buf().unwrap(), b"foob");
buf.consume(4);
// buffer is now empty, will get WouldBlock
assert!(buf.fill_buf().err().unwrap().kind() == ErrorKind::WouldBlock);
// rejected bytes can be pushed now
assert_eq!(buf.push(b"ar"), 2);
buf.push_eof();
assert_eq!(buf.fill_buf().unwrap(), b"ar");
buf.consume(2);
// zero-length window on eof
assert_eq!(buf.fill_buf().unwrap(), b"");
```
*/
pub struct FeedBuffer {
	storage: Box<[u8]>,
	head: usize,
	len: usize,
	eof: bool,
}

impl FeedBuffer {
	/// Create a new buffer with the [`DEFAULT_CAPACITY`].
	pub fn new() -> FeedBuffer {
		Self::with_capacity(DEFAULT_CAPACITY)
	}

	/// Create a new buffer with the given capacity.
	///
	/// # Panics
	///
	/// If `capacity` is zero.
	pub fn with_capacity(capacity: usize) -> FeedBuffer {
		assert!(capacity > 0, "feed buffer capacity must not be zero");
		FeedBuffer {
			storage: vec![0u8; capacity].into_boxed_slice(),
			head: 0,
			len: 0,
			eof: false,
		}
	}

	/// Copy as much of `data` as currently fits into the buffer and return
	/// the number of bytes accepted.
	///
	/// The count is `min(data.len(), free())`. This never blocks and never
	/// reallocates; a short count is the backpressure signal to the
	/// producer.
	///
	/// # Panics
	///
	/// If [`FeedBuffer::push_eof`] has been called.
	pub fn push(&mut self, data: &[u8]) -> usize {
		if self.eof {
			panic!("cannot push behind eof");
		}
		let cap = self.storage.len();
		let to_copy = data.len().min(cap - self.len);
		let mut write = (self.head + self.len) % cap;
		for b in &data[..to_copy] {
			self.storage[write] = *b;
			write = (write + 1) % cap;
		}
		self.len += to_copy;
		to_copy
	}

	/// Number of bytes which have been pushed but not consumed yet.
	pub fn len(&self) -> usize {
		self.len
	}

	/// Total capacity of the buffer.
	pub fn capacity(&self) -> usize {
		self.storage.len()
	}

	/// Number of bytes [`FeedBuffer::push`] would currently accept.
	pub fn free(&self) -> usize {
		self.storage.len() - self.len
	}

	/// Push an end-of-file marker to the buffer.
	///
	/// After an end-of-file marker has been pushed, it is not possible to
	/// push further data. Once the [`FeedBuffer`] is then depleted, it will
	/// signal EOF to the consumer instead of `WouldBlock`.
	pub fn push_eof(&mut self) {
		self.eof = true;
	}

	/// Return whether the end-of-file marker has been pushed already.
	///
	/// [`FeedBuffer::push()`] will panic if this function returns true.
	pub fn eof_pushed(&self) -> bool {
		self.eof
	}

	/// Drop all buffered contents immediately.
	///
	/// This resets the length to 0 and causes all future reads to return
	/// either WouldBlock (if [`FeedBuffer::push_eof`] has not been called
	/// yet) or eof.
	pub fn clear(&mut self) {
		self.head = 0;
		self.len = 0;
	}
}

impl io::BufRead for FeedBuffer {
	/// Return the contiguous readable window.
	///
	/// The window only extends up to the end of the ring storage; callers
	/// need to be prepared to see short windows even though more data is
	/// buffered behind the wrap.
	///
	/// If no data is currently available and the end-of-file has not been
	/// reached yet, [`std::io::ErrorKind::WouldBlock`] is returned.
	fn fill_buf(&mut self) -> io::Result<&[u8]> {
		if self.len == 0 {
			return if self.eof {
				Ok(&[])
			} else {
				Err(io::Error::new(io::ErrorKind::WouldBlock, ERR_NODATA))
			};
		}
		let end = (self.head + self.len).min(self.storage.len());
		Ok(&self.storage[self.head..end])
	}

	/// Skip forward by `amt` bytes.
	///
	/// # Panics
	///
	/// If `amt` is larger than what `fill_buf()` would return.
	fn consume(&mut self, amt: usize) {
		if amt == 0 {
			return;
		}
		let window = (self.head + self.len).min(self.storage.len()) - self.head;
		if amt > window {
			panic!("attempt to consume beyond end of buffer");
		}
		self.head = (self.head + amt) % self.storage.len();
		self.len -= amt;
		if self.len == 0 {
			self.head = 0;
		}
	}
}

impl io::Read for FeedBuffer {
	/// Read from the buffer.
	///
	/// The read will return bytes up to the ring wrap at most; this means
	/// that a short read is **not** an indicator for an impending
	/// end-of-file (this is within the [`std::io::Read`] contract).
	fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
		use io::BufRead;
		let window = self.fill_buf()?;
		let to_read = window.len().min(dst.len());
		dst[..to_read].copy_from_slice(&window[..to_read]);
		self.consume(to_read);
		Ok(to_read)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::{BufRead, Read};

	#[test]
	fn feedbuffer_accepts_up_to_capacity() {
		let mut buf = FeedBuffer::with_capacity(8);
		assert_eq!(buf.push(b"foo"), 3);
		assert_eq!(buf.len(), 3);
		assert_eq!(buf.push(b"barbaz"), 5);
		assert_eq!(buf.len(), 8);
		assert_eq!(buf.free(), 0);
		assert_eq!(buf.push(b"x"), 0);
	}

	#[test]
	fn feedbuffer_read_sequentially() {
		let mut buf = FeedBuffer::with_capacity(16);
		buf.push(b"foobar");
		let mut out = [0u8; 3];
		assert_eq!(buf.read(&mut out[..]).unwrap(), 3);
		assert_eq!(&out[..], b"foo");
		assert_eq!(buf.read(&mut out[..]).unwrap(), 3);
		assert_eq!(&out[..], b"bar");
	}

	#[test]
	fn feedbuffer_read_returns_wouldblock_at_end() {
		let mut buf = FeedBuffer::with_capacity(16);
		buf.push(b"foo");
		let mut out = [0u8; 4];
		assert_eq!(buf.read(&mut out[..]).unwrap(), 3);
		assert_eq!(
			buf.read(&mut out[..]).err().unwrap().kind(),
			io::ErrorKind::WouldBlock
		);
	}

	#[test]
	fn feedbuffer_read_returns_eof_at_end_if_eof_has_been_set() {
		let mut buf = FeedBuffer::with_capacity(16);
		buf.push(b"foo");
		buf.push_eof();
		let mut out = [0u8; 4];
		assert_eq!(buf.read(&mut out[..]).unwrap(), 3);
		assert_eq!(buf.read(&mut out[..]).unwrap(), 0);
	}

	#[test]
	fn feedbuffer_returns_eof_flag() {
		let mut buf = FeedBuffer::with_capacity(4);
		assert!(!buf.eof_pushed());
		buf.push_eof();
		assert!(buf.eof_pushed());
	}

	#[test]
	#[should_panic(expected = "cannot push behind eof")]
	fn feedbuffer_does_not_allow_pushing_after_eof() {
		let mut buf = FeedBuffer::with_capacity(4);
		buf.push(b"f");
		buf.push_eof();
		buf.push(b"x");
	}

	#[test]
	fn feedbuffer_wraps_around() {
		let mut buf = FeedBuffer::with_capacity(4);
		assert_eq!(buf.push(b"abcd"), 4);
		buf.consume(3);
		// three slots free again, write wraps past the end of storage
		assert_eq!(buf.push(b"efg"), 3);
		assert_eq!(buf.len(), 4);
		// first window ends at the wrap
		assert_eq!(buf.fill_buf().unwrap(), b"d");
		buf.consume(1);
		assert_eq!(buf.fill_buf().unwrap(), b"efg");
		buf.consume(3);
		assert_eq!(buf.len(), 0);
	}

	#[test]
	fn feedbuffer_fill_buf_does_not_consume() {
		let mut buf = FeedBuffer::with_capacity(8);
		buf.push(b"foo");
		assert_eq!(buf.fill_buf().unwrap(), b"foo");
		assert_eq!(buf.fill_buf().unwrap(), b"foo");
	}

	#[test]
	fn feedbuffer_fill_buf_works_with_consume() {
		let mut buf = FeedBuffer::with_capacity(8);
		buf.push(b"foobar");
		assert_eq!(buf.fill_buf().unwrap(), b"foobar");
		buf.consume(1);
		assert_eq!(buf.fill_buf().unwrap(), b"oobar");
		buf.consume(5);
		buf.push(b"2342");
		assert_eq!(buf.fill_buf().unwrap(), b"2342");
	}

	#[test]
	fn feedbuffer_fill_buf_at_eof_returns_empty_window() {
		let mut buf = FeedBuffer::with_capacity(8);
		buf.push(b"foo");
		buf.push_eof();
		buf.consume(3);
		assert_eq!(buf.fill_buf().unwrap(), b"");
	}

	#[test]
	fn feedbuffer_fill_buf_with_empty_buffer_returns_wouldblock() {
		let mut buf = FeedBuffer::with_capacity(8);
		buf.push(b"foo");
		buf.consume(3);
		assert_eq!(
			buf.fill_buf().err().unwrap().kind(),
			io::ErrorKind::WouldBlock
		);
	}

	#[test]
	#[should_panic(expected = "attempt to consume beyond end of buffer")]
	fn feedbuffer_consume_beyond_window_panics() {
		let mut buf = FeedBuffer::with_capacity(8);
		buf.push(b"foo");
		buf.consume(4);
	}

	#[test]
	fn feedbuffer_zero_sized_consume_with_empty_buffer_is_valid() {
		let mut buf = FeedBuffer::with_capacity(8);
		buf.consume(0);
	}

	#[test]
	fn feedbuffer_empty_after_clear() {
		let mut buf = FeedBuffer::with_capacity(8);
		buf.push(b"foo");
		buf.clear();
		assert_eq!(buf.len(), 0);
		assert_eq!(
			buf.fill_buf().err().unwrap().kind(),
			io::ErrorKind::WouldBlock
		);
	}

	#[test]
	fn feedbuffer_eof_survives_clear() {
		let mut buf = FeedBuffer::with_capacity(8);
		buf.push(b"foo");
		buf.push_eof();
		buf.clear();
		assert_eq!(buf.fill_buf().unwrap(), b"");
	}

	#[test]
	fn feedbuffer_push_reports_partial_acceptance_across_wrap() {
		let mut buf = FeedBuffer::with_capacity(5);
		assert_eq!(buf.push(b"abcde"), 5);
		buf.consume(2);
		assert_eq!(buf.push(b"fgh"), 2);
		let mut collected = Vec::new();
		loop {
			let window = match buf.fill_buf() {
				Ok(w) => w.to_vec(),
				Err(_) => break,
			};
			if window.is_empty() {
				break;
			}
			collected.extend_from_slice(&window);
			let n = window.len();
			buf.consume(n);
		}
		assert_eq!(&collected[..], b"cdefg");
	}
}
