use std::fmt;

use tracing::{field, trace_span, Level};

use crate::{
    arena::{Layout, Node, NodeAddr, NodeArena},
    error::MapError,
    memory::Memory,
    options::MapOptions,
};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct MapStats {
    pub primary_slots: u64,
    pub primary_used: u64,
    pub overflow_slots: u64,
    pub overflow_used: u64,
}

impl MapStats {
    pub fn len(&self) -> u64 {
        self.primary_used + self.overflow_used
    }

    pub fn capacity(&self) -> u64 {
        self.primary_slots + self.overflow_slots
    }

    pub fn load(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }
}

impl fmt::Display for MapStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Primary: {}/{}", self.primary_used, self.primary_slots)?;
        writeln!(f, "Overflow: {}/{}", self.overflow_used, self.overflow_slots)?;
        writeln!(f, "Entries: {}", self.len())?;
        write!(f, "Load: {:.3}", self.load())
    }
}

/// A fixed-capacity `i64 -> i64` map living entirely inside one memory block.
///
/// The block is split into a table of primary slots, addressed by the key
/// modulo the slot count, and an overflow area that collision chains grow
/// into. Nothing is ever removed and the block never grows, so running out of
/// overflow slots is final for this block.
///
/// A stored value of `0` reads back the same as a missing key through
/// [`LongLongMap::get`]; use [`LongLongMap::find`] to tell them apart.
#[derive(Debug)]
pub struct LongLongMap<M> {
    arena: NodeArena<M>,
    primary_used: u64,
}

impl<M: Memory> LongLongMap<M> {
    pub fn new(memory: M, address: u64, size: u64) -> Result<LongLongMap<M>, MapError> {
        LongLongMap::with_options(memory, address, size, &MapOptions::default())
    }

    pub fn with_options(
        memory: M,
        address: u64,
        size: u64,
        options: &MapOptions,
    ) -> Result<LongLongMap<M>, MapError> {
        let layout = Layout::plan(size, options.overflow_divisor)?;
        let arena = NodeArena::init(memory, address, layout);
        tracing::event!(
            Level::DEBUG,
            base = arena.base(),
            primary_slots = layout.primary_slots,
            overflow_slots = layout.overflow_slots,
            "Initialized map block"
        );
        Ok(LongLongMap {
            arena,
            primary_used: 0,
        })
    }

    /// Stores `value` under `key`.
    ///
    /// Returns the value it replaced when `key` owns its primary slot, and `0`
    /// when the key is new. Only the primary slot is compared: a key that
    /// already sits further down a collision chain gets a second node at the
    /// end of that chain, and [`LongLongMap::get`] keeps returning the first.
    pub fn put(&mut self, key: i64, value: i64) -> Result<i64, MapError> {
        let head = self.arena.slot(key);
        match self.arena.read(head) {
            Node::Empty => {
                self.arena.write(
                    head,
                    &Node::Occupied {
                        key,
                        value,
                        next: None,
                    },
                );
                self.primary_used += 1;
                Ok(0)
            }
            Node::Occupied {
                key: stored,
                value: previous,
                ..
            } if stored == key => {
                self.arena.set_value(head, value);
                Ok(previous)
            }
            Node::Occupied { .. } => {
                self.append(head, key, value)?;
                Ok(0)
            }
        }
    }

    fn append(&mut self, head: NodeAddr, key: i64, value: i64) -> Result<(), MapError> {
        let Some(node) = self.arena.allocate() else {
            let stats = self.stats();
            tracing::event!(Level::ERROR, key = key, slot = %head, stats = %stats, "Out of overflow slots");
            return Err(MapError::OutOfCapacity {
                primary_slots: stats.primary_slots,
                overflow_used: stats.overflow_used,
                overflow_slots: stats.overflow_slots,
            });
        };

        let span = trace_span!("chain tail", slot = %head, length = field::Empty).entered();
        let mut tail = head;
        let mut length = 0u64;
        for (addr, _, _) in self.arena.chain(head) {
            tail = addr;
            length += 1;
        }
        span.record("length", length);
        drop(span);

        self.arena.write(
            node,
            &Node::Occupied {
                key,
                value,
                next: None,
            },
        );
        self.arena.link(tail, node);
        Ok(())
    }

    /// Returns the value stored under `key`, or `0` if there is none.
    pub fn get(&self, key: i64) -> i64 {
        self.find(key).unwrap_or(0)
    }

    /// Returns the value stored under `key`, if any.
    pub fn find(&self, key: i64) -> Option<i64> {
        let head = self.arena.slot(key);
        let span = trace_span!("lookup", key = key, slot = %head).entered();
        let found = self
            .arena
            .chain(head)
            .find(|&(_, stored, _)| stored == key)
            .map(|(_, _, value)| value);
        drop(span);
        found
    }

    pub fn contains_key(&self, key: i64) -> bool {
        self.find(key).is_some()
    }

    /// Every `(key, value)` sharing `key`'s primary slot, in chain order.
    pub fn chain(&self, key: i64) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.arena
            .chain(self.arena.slot(key))
            .map(|(_, key, value)| (key, value))
    }

    /// Number of nodes in use, including duplicates left by [`LongLongMap::put`].
    pub fn len(&self) -> u64 {
        self.primary_used + self.arena.overflow_used()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> u64 {
        self.arena.primary_slots() + self.arena.overflow_slots()
    }

    pub fn primary_slots(&self) -> u64 {
        self.arena.primary_slots()
    }

    pub fn overflow_slots(&self) -> u64 {
        self.arena.overflow_slots()
    }

    pub fn overflow_used(&self) -> u64 {
        self.arena.overflow_used()
    }

    pub fn overflow_remaining(&self) -> u64 {
        self.arena.overflow_slots() - self.arena.overflow_used()
    }

    pub fn base_address(&self) -> u64 {
        self.arena.base()
    }

    pub fn memory(&self) -> &M {
        self.arena.memory()
    }

    pub fn stats(&self) -> MapStats {
        MapStats {
            primary_slots: self.arena.primary_slots(),
            primary_used: self.primary_used,
            overflow_slots: self.arena.overflow_slots(),
            overflow_used: self.arena.overflow_used(),
        }
    }
}
