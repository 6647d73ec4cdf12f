use std::fmt;

use crate::{
    error::MapError,
    memory::{Memory, WORD_SIZE},
};

// Layout of a node:
//      0..8  key
//     8..16  value
//    16..24  next: 0 never used, -1 end of chain, otherwise the next node
pub const NODE_SIZE: u64 = 3 * WORD_SIZE;

const NEVER_USED: i64 = 0;
const END_OF_CHAIN: i64 = -1;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeAddr(u64);

impl NodeAddr {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Node {
    Empty,
    Occupied {
        key: i64,
        value: i64,
        next: Option<NodeAddr>,
    },
}

/// How a block of a given size is carved into primary and overflow slots.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Layout {
    pub size: u64,
    pub primary_slots: u64,
    pub overflow_slots: u64,
}

impl Layout {
    pub fn plan(size: u64, overflow_divisor: u64) -> Result<Layout, MapError> {
        let cells = size / NODE_SIZE;
        let overflow_slots = cells.checked_div(overflow_divisor).unwrap_or(0);
        let primary_slots = cells - overflow_slots;
        if primary_slots == 0 || overflow_slots == 0 {
            return Err(MapError::InvalidCapacity {
                size,
                primary_slots,
                overflow_slots,
            });
        }
        Ok(Layout {
            size,
            primary_slots,
            overflow_slots,
        })
    }
}

/// Fixed-size node records laid out back to back in a [`Memory`] block.
///
/// Handles are only ever produced by the arena itself, and every read or
/// write checks that the handle names a node boundary inside the block.
#[derive(Debug)]
pub struct NodeArena<M> {
    memory: M,
    base: u64,
    primary_slots: u64,
    overflow_slots: u64,
    overflow_used: u64,
}

macro_rules! node_field {
    ($field:ident, $offset:expr) => {
        paste::paste! {
            fn [<read_ $field>](&self, addr: NodeAddr) -> i64 {
                self.memory.read_long(addr.0 + $offset)
            }
            fn [<write_ $field>](&mut self, addr: NodeAddr, v: i64) {
                self.memory.write_long(addr.0 + $offset, v)
            }
        }
    };
}

impl<M: Memory> NodeArena<M> {
    /// Takes over the block at `address` and zeroes all of it.
    pub fn init(mut memory: M, address: u64, layout: Layout) -> NodeArena<M> {
        let base = memory.reallocate(address, layout.size);
        memory.fill_zero(base, layout.size);
        NodeArena {
            memory,
            base,
            primary_slots: layout.primary_slots,
            overflow_slots: layout.overflow_slots,
            overflow_used: 0,
        }
    }

    node_field!(key, 0);
    node_field!(value, WORD_SIZE);
    node_field!(next, 2 * WORD_SIZE);

    pub fn base(&self) -> u64 {
        self.base
    }

    pub fn primary_slots(&self) -> u64 {
        self.primary_slots
    }

    pub fn overflow_slots(&self) -> u64 {
        self.overflow_slots
    }

    pub fn overflow_used(&self) -> u64 {
        self.overflow_used
    }

    pub fn overflow_start(&self) -> u64 {
        self.base + self.primary_slots * NODE_SIZE
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn slot_index(&self, key: i64) -> u64 {
        key.unsigned_abs() % self.primary_slots
    }

    pub fn slot(&self, key: i64) -> NodeAddr {
        NodeAddr(self.base + self.slot_index(key) * NODE_SIZE)
    }

    fn check(&self, addr: NodeAddr) {
        let end = self.overflow_start() + self.overflow_slots * NODE_SIZE;
        assert!(
            addr.0 >= self.base && addr.0 < end && (addr.0 - self.base) % NODE_SIZE == 0,
            "Node address {addr} is not a node of the block at {:#x}",
            self.base
        );
    }

    pub fn read(&self, addr: NodeAddr) -> Node {
        self.check(addr);
        let next = match self.read_next(addr) {
            NEVER_USED => return Node::Empty,
            END_OF_CHAIN => None,
            raw => Some(NodeAddr(raw as u64)),
        };
        Node::Occupied {
            key: self.read_key(addr),
            value: self.read_value(addr),
            next,
        }
    }

    pub fn write(&mut self, addr: NodeAddr, node: &Node) {
        self.check(addr);
        match *node {
            Node::Empty => {
                self.write_key(addr, 0);
                self.write_value(addr, 0);
                self.write_next(addr, NEVER_USED);
            }
            Node::Occupied { key, value, next } => {
                self.write_key(addr, key);
                self.write_value(addr, value);
                self.write_next(addr, next.map_or(END_OF_CHAIN, |n| n.0 as i64));
            }
        }
    }

    pub fn set_value(&mut self, addr: NodeAddr, value: i64) {
        self.check(addr);
        self.write_value(addr, value);
    }

    pub fn link(&mut self, tail: NodeAddr, next: NodeAddr) {
        self.check(tail);
        self.check(next);
        self.write_next(tail, next.0 as i64);
    }

    /// Hands out the next unused overflow slot, or `None` once all are taken.
    pub fn allocate(&mut self) -> Option<NodeAddr> {
        if self.overflow_used >= self.overflow_slots {
            return None;
        }
        let addr = NodeAddr(self.overflow_start() + self.overflow_used * NODE_SIZE);
        self.overflow_used += 1;
        Some(addr)
    }

    pub fn chain(&self, head: NodeAddr) -> Chain<'_, M> {
        Chain {
            arena: self,
            cursor: Some(head),
        }
    }
}

/// Walks a collision chain from its primary slot, yielding each occupied node.
pub struct Chain<'a, M> {
    arena: &'a NodeArena<M>,
    cursor: Option<NodeAddr>,
}

impl<M: Memory> Iterator for Chain<'_, M> {
    type Item = (NodeAddr, i64, i64);

    fn next(&mut self) -> Option<Self::Item> {
        let addr = self.cursor?;
        match self.arena.read(addr) {
            Node::Empty => {
                self.cursor = None;
                None
            }
            Node::Occupied { key, value, next } => {
                self.cursor = next;
                Some((addr, key, value))
            }
        }
    }
}
