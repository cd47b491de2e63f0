//! Fixed-capacity transfer buffers
//!
//! Both buffers keep `cursor <= length <= capacity`. The transmit buffer
//! owns its bytes up front and hands them out one at a time; the receive
//! buffer knows how many bytes were requested and fills up as they arrive.

use heapless::Vec;

/// Outgoing bytes for the current transaction
#[derive(Debug, Clone)]
pub struct TxBuffer<const N: usize> {
    data: Vec<u8, N>,
    cursor: usize,
}

impl<const N: usize> Default for TxBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TxBuffer<N> {
    /// Capacity in bytes
    pub const CAPACITY: usize = N;

    /// Create an empty buffer
    pub const fn new() -> Self {
        Self {
            data: Vec::new(),
            cursor: 0,
        }
    }

    /// Replace the contents and rewind the cursor
    ///
    /// Returns `false` (buffer untouched) if `bytes` is longer than `N`.
    pub fn load(&mut self, bytes: &[u8]) -> bool {
        if bytes.len() > N {
            return false;
        }
        self.data.clear();
        // Length checked above
        let _ = self.data.extend_from_slice(bytes);
        self.cursor = 0;
        true
    }

    /// Take the next unsent byte
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = self.data.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(byte)
    }

    /// Number of bytes still to be sent
    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// Logical length
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if there is nothing to send
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes handed out so far
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

/// Incoming bytes for the current transaction
#[derive(Debug, Clone)]
pub struct RxBuffer<const N: usize> {
    data: Vec<u8, N>,
    expected: usize,
}

impl<const N: usize> Default for RxBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RxBuffer<N> {
    /// Capacity in bytes
    pub const CAPACITY: usize = N;

    /// Create an empty buffer
    pub const fn new() -> Self {
        Self {
            data: Vec::new(),
            expected: 0,
        }
    }

    /// Discard old data and expect `count` new bytes
    ///
    /// Returns `false` (buffer untouched) if `count` is larger than `N`.
    pub fn expect(&mut self, count: usize) -> bool {
        if count > N {
            return false;
        }
        self.data.clear();
        self.expected = count;
        true
    }

    /// Store the next received byte
    ///
    /// Returns `false` and drops the byte once `expected` bytes are stored.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.data.len() >= self.expected {
            return false;
        }
        self.data.push(byte).is_ok()
    }

    /// Number of bytes still to come
    pub fn remaining(&self) -> usize {
        self.expected - self.data.len()
    }

    /// Requested length
    pub fn len(&self) -> usize {
        self.expected
    }

    /// Check if no bytes were requested
    pub fn is_empty(&self) -> bool {
        self.expected == 0
    }

    /// Bytes stored so far
    pub fn cursor(&self) -> usize {
        self.data.len()
    }

    /// Bytes received so far, in arrival order
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}
