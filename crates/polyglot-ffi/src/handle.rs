//! Generational handle table backing the string handle API.
//!
//! A handle packs a slot index (high 32 bits) with the generation the slot
//! had when the value went in (low 32 bits). Generations start at 1, so a
//! zeroed handle variable never names a live string. Releasing a value moves
//! its slot to the next generation, and every later use of the old handle
//! misses.

use std::num::NonZeroU32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Key {
    slot: u32,
    generation: NonZeroU32,
}

impl Key {
    fn pack(self) -> u64 {
        (u64::from(self.slot) << 32) | u64::from(self.generation.get())
    }

    fn unpack(raw: u64) -> Option<Self> {
        Some(Self {
            slot: (raw >> 32) as u32,
            generation: NonZeroU32::new(raw as u32)?,
        })
    }
}

enum Entry<T> {
    Occupied { generation: NonZeroU32, value: T },
    Vacant,
    // Generation space used up. Never handed out again.
    Retired,
}

/// Owns values on behalf of C callers, addressed by opaque `u64` handles.
pub(crate) struct HandleTable<T> {
    entries: Vec<Entry<T>>,
    /// Keys ready to issue for vacant slots, generation already bumped.
    vacant: Vec<Key>,
    live: usize,
}

impl<T> HandleTable<T> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            vacant: Vec::new(),
            live: 0,
        }
    }

    /// Take ownership of `value` and return its handle.
    pub fn insert(&mut self, value: T) -> u64 {
        let key = self.vacant.pop().unwrap_or_else(|| {
            let slot = self.entries.len() as u32;
            self.entries.push(Entry::Vacant);
            Key {
                slot,
                generation: NonZeroU32::MIN,
            }
        });
        self.entries[key.slot as usize] = Entry::Occupied {
            generation: key.generation,
            value,
        };
        self.live += 1;
        key.pack()
    }

    /// Borrow the value behind `handle`, or `None` if it is stale or unknown.
    pub fn get(&self, handle: u64) -> Option<&T> {
        let key = Key::unpack(handle)?;
        match self.entries.get(key.slot as usize)? {
            Entry::Occupied { generation, value } if *generation == key.generation => Some(value),
            _ => None,
        }
    }

    /// Release `handle`, handing its value back.
    ///
    /// `None` for a stale or unknown handle, so releasing twice is harmless.
    pub fn remove(&mut self, handle: u64) -> Option<T> {
        let key = Key::unpack(handle)?;
        let entry = self.entries.get_mut(key.slot as usize)?;
        if !matches!(entry, Entry::Occupied { generation, .. } if *generation == key.generation) {
            return None;
        }

        let next = key.generation.checked_add(1);
        let vacated = if next.is_some() {
            Entry::Vacant
        } else {
            Entry::Retired
        };
        let Entry::Occupied { value, .. } = std::mem::replace(entry, vacated) else {
            return None;
        };
        if let Some(generation) = next {
            self.vacant.push(Key {
                slot: key.slot,
                generation,
            });
        }
        self.live -= 1;
        Some(value)
    }

    /// Number of values currently owned by the table.
    pub fn len(&self) -> usize {
        self.live
    }
}
