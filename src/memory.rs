//! Word-level accessors for the block a map lives in.
//!
//! The map only ever needs to read and write whole 64-bit words at byte
//! addresses, zero a range once at construction, and let the owner of the
//! block move it before first use. Everything else is built on top of those.

use std::{marker::PhantomData, ops::Range, ptr::NonNull};

pub const WORD_SIZE: u64 = 8;

pub trait Memory {
    fn read_long(&self, addr: u64) -> i64;

    fn write_long(&mut self, addr: u64, value: i64);

    /// Sets every byte in `[addr, addr + size)` to zero.
    fn fill_zero(&mut self, addr: u64, size: u64);

    /// Takes ownership of the block at `addr`, resized to `size` bytes, and
    /// returns its address from now on. Accessors that never move memory keep
    /// the default.
    fn reallocate(&mut self, addr: u64, _size: u64) -> u64 {
        addr
    }
}

impl<M: Memory + ?Sized> Memory for &mut M {
    fn read_long(&self, addr: u64) -> i64 {
        (**self).read_long(addr)
    }

    fn write_long(&mut self, addr: u64, value: i64) {
        (**self).write_long(addr, value)
    }

    fn fill_zero(&mut self, addr: u64, size: u64) {
        (**self).fill_zero(addr, size)
    }

    fn reallocate(&mut self, addr: u64, size: u64) -> u64 {
        (**self).reallocate(addr, size)
    }
}

fn byte_range(start: u64, len: usize, addr: u64, size: u64) -> Range<usize> {
    let offset = addr.checked_sub(start).map(|o| o as usize);
    let end = offset.and_then(|o| o.checked_add(size as usize));
    match (offset, end) {
        (Some(offset), Some(end)) if end <= len => offset..end,
        _ => panic!(
            "Access of {size} bytes at {addr:#x} outside of block [{start:#x}, {:#x})",
            start + len as u64
        ),
    }
}

/// A block owned by the process heap, addressed as if it started at `base`.
#[derive(Debug, Clone)]
pub struct HeapMemory {
    base: u64,
    bytes: Vec<u8>,
}

impl HeapMemory {
    pub fn new(base: u64, size: usize) -> HeapMemory {
        HeapMemory {
            base,
            bytes: vec![0; size],
        }
    }

    pub fn base(&self) -> u64 {
        self.base
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Memory for HeapMemory {
    fn read_long(&self, addr: u64) -> i64 {
        let range = byte_range(self.base, self.bytes.len(), addr, WORD_SIZE);
        let mut word = [0; WORD_SIZE as usize];
        word.copy_from_slice(&self.bytes[range]);
        i64::from_ne_bytes(word)
    }

    fn write_long(&mut self, addr: u64, value: i64) {
        let range = byte_range(self.base, self.bytes.len(), addr, WORD_SIZE);
        self.bytes[range].copy_from_slice(&value.to_ne_bytes());
    }

    fn fill_zero(&mut self, addr: u64, size: u64) {
        let range = byte_range(self.base, self.bytes.len(), addr, size);
        self.bytes[range].fill(0);
    }

    fn reallocate(&mut self, addr: u64, size: u64) -> u64 {
        assert_eq!(
            addr, self.base,
            "Tried to reallocate {addr:#x}, but this block lives at {:#x}",
            self.base
        );
        self.bytes.resize(size as usize, 0);
        self.base
    }
}

/// A block somebody else mapped: shared memory, an mmap, a slice of an arena.
///
/// Addresses are the real addresses of the bytes. Every access is checked
/// against the block bounds before the pointer is touched.
#[derive(Debug)]
pub struct RawMemory<'a> {
    ptr: NonNull<u8>,
    len: usize,
    _block: PhantomData<&'a mut [u8]>,
}

impl<'a> RawMemory<'a> {
    pub fn from_slice(block: &'a mut [u8]) -> RawMemory<'a> {
        let len = block.len();
        RawMemory {
            ptr: NonNull::from(block).cast(),
            len,
            _block: PhantomData,
        }
    }

    /// # Safety
    /// `ptr` must be non-null and valid for reads and writes of `len` bytes
    /// for `'a`, and nothing else may access those bytes while this exists.
    pub unsafe fn from_raw_parts(ptr: *mut u8, len: usize) -> RawMemory<'a> {
        RawMemory {
            ptr: NonNull::new_unchecked(ptr),
            len,
            _block: PhantomData,
        }
    }

    pub fn address(&self) -> u64 {
        self.ptr.as_ptr() as u64
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn checked(&self, addr: u64, size: u64) -> *mut u8 {
        let range = byte_range(self.address(), self.len, addr, size);
        // In bounds of the block handed over at construction.
        unsafe { self.ptr.as_ptr().add(range.start) }
    }
}

impl Memory for RawMemory<'_> {
    fn read_long(&self, addr: u64) -> i64 {
        let p = self.checked(addr, WORD_SIZE);
        unsafe { p.cast::<i64>().read_unaligned() }
    }

    fn write_long(&mut self, addr: u64, value: i64) {
        let p = self.checked(addr, WORD_SIZE);
        unsafe { p.cast::<i64>().write_unaligned(value) }
    }

    fn fill_zero(&mut self, addr: u64, size: u64) {
        let p = self.checked(addr, size);
        unsafe { p.write_bytes(0, size as usize) }
    }
}
