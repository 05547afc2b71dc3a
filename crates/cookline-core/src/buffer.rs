//! Caller-owned destination buffers and the encodings they are filled in.
//!
//! A read never holds the address of its destination. It holds a
//! [`BufferHandle`], and the host resolves that handle through
//! [`UserBuffers`] only for the duration of a delivery. When the host moves
//! a buffer while a read is parked, it tells the read with
//! [`ReadData::migrate_buffers`](crate::read_data::ReadData::migrate_buffers),
//! which is a pure handle rewrite.

use std::collections::HashMap;

/// Opaque identity of a destination buffer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferHandle(u64);

impl BufferHandle {
    /// Wrap a raw slot id. Hosts with their own slot scheme use this.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw slot id.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Destination descriptor held by a read: which slot, and how many bytes
/// the caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destination {
    pub handle: BufferHandle,
    pub capacity: usize,
}

impl Destination {
    pub fn new(handle: BufferHandle, capacity: usize) -> Self {
        Self { handle, capacity }
    }
}

/// Resolves buffer handles to writable memory.
pub trait UserBuffers {
    /// The bytes behind `handle`, or `None` if the slot no longer exists.
    fn slot_mut(&mut self, handle: BufferHandle) -> Option<&mut [u8]>;
}

/// A simple host-side slot store.
///
/// Slots are plain byte vectors. [`relocate`](BufferStore::relocate) models
/// the host moving a buffer to a new allocation: the contents are carried
/// over, the old handle dies and a new one is returned.
#[derive(Debug, Default)]
pub struct BufferStore {
    slots: HashMap<BufferHandle, Vec<u8>>,
    next: u64,
}

impl BufferStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a zeroed slot of `capacity` bytes.
    pub fn allocate(&mut self, capacity: usize) -> BufferHandle {
        let handle = self.fresh_handle();
        self.slots.insert(handle, vec![0; capacity]);
        handle
    }

    /// Move the slot to a new allocation of `new_capacity` bytes.
    ///
    /// Existing contents are copied (truncated if the new slot is smaller).
    /// Returns `None` if `old` is not a live slot.
    pub fn relocate(&mut self, old: BufferHandle, new_capacity: usize) -> Option<BufferHandle> {
        let mut bytes = self.slots.remove(&old)?;
        bytes.resize(new_capacity, 0);
        let handle = self.fresh_handle();
        self.slots.insert(handle, bytes);
        Some(handle)
    }

    /// Read-only view of a slot.
    pub fn get(&self, handle: BufferHandle) -> Option<&[u8]> {
        self.slots.get(&handle).map(Vec::as_slice)
    }

    /// Drop a slot and return its bytes.
    pub fn release(&mut self, handle: BufferHandle) -> Option<Vec<u8>> {
        self.slots.remove(&handle)
    }

    /// Number of live slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn fresh_handle(&mut self) -> BufferHandle {
        self.next += 1;
        BufferHandle(self.next)
    }
}

impl UserBuffers for BufferStore {
    fn slot_mut(&mut self, handle: BufferHandle) -> Option<&mut [u8]> {
        self.slots.get_mut(&handle).map(Vec::as_mut_slice)
    }
}

/// Character encoding requested by the reading client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// One byte per ASCII character (UTF-8).
    #[default]
    Narrow,
    /// UTF-16, little endian.
    Wide,
}

/// Result of transcoding text into a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transcoded {
    /// Characters fully written.
    pub chars: usize,
    /// Bytes written.
    pub bytes: usize,
}

impl Encoding {
    /// Encode `text` into `dest`, stopping before the first character that
    /// would not fit. A character is never split.
    pub fn transcode_into(self, text: &str, dest: &mut [u8]) -> Transcoded {
        let mut out = Transcoded::default();
        for c in text.chars() {
            let written = match self {
                Encoding::Narrow => {
                    let len = c.len_utf8();
                    if out.bytes + len > dest.len() {
                        break;
                    }
                    c.encode_utf8(&mut dest[out.bytes..out.bytes + len]);
                    len
                }
                Encoding::Wide => {
                    let mut units = [0u16; 2];
                    let units = c.encode_utf16(&mut units);
                    let len = units.len() * 2;
                    if out.bytes + len > dest.len() {
                        break;
                    }
                    for (i, unit) in units.iter().enumerate() {
                        let at = out.bytes + i * 2;
                        dest[at..at + 2].copy_from_slice(&unit.to_le_bytes());
                    }
                    len
                }
            };
            out.bytes += written;
            out.chars += 1;
        }
        out
    }

    /// Bytes needed to hold `text` in this encoding.
    pub fn encoded_len(self, text: &str) -> usize {
        match self {
            Encoding::Narrow => text.len(),
            Encoding::Wide => text.encode_utf16().count() * 2,
        }
    }
}
