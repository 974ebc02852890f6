//! Enum-keyed animation tables
//!
//! The simulation only needs each sequence's length to pick a frame index;
//! pixels stay with the host. Tables are built once at load time and a
//! missing sequence fails the build instead of a lookup mid-game.

use std::marker::PhantomData;

use crate::error::SimError;

/// A closed set of animation keys
pub trait AnimationKey: Copy + std::fmt::Debug + 'static {
    /// Every key, in index order
    const ALL: &'static [Self];

    fn index(self) -> usize;
}

/// Frame-sequence lengths for every key of `K`
#[derive(Debug, Clone)]
pub struct AnimationTable<K: AnimationKey> {
    lengths: Vec<usize>,
    _key: PhantomData<K>,
}

impl<K: AnimationKey> AnimationTable<K> {
    /// Resolve every key through `lookup`; a missing or empty sequence is fatal
    pub fn build<F>(mut lookup: F) -> Result<Self, SimError>
    where
        F: FnMut(K) -> Option<usize>,
    {
        let mut lengths = vec![0; K::ALL.len()];
        for &key in K::ALL {
            match lookup(key) {
                Some(len) if len > 0 => lengths[key.index()] = len,
                _ => return Err(SimError::missing(format!("frame sequence {key:?}"))),
            }
        }
        Ok(Self {
            lengths,
            _key: PhantomData,
        })
    }

    /// Every sequence has `len` frames
    pub fn uniform(len: usize) -> Self {
        Self {
            lengths: vec![len.max(1); K::ALL.len()],
            _key: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self, key: K) -> usize {
        self.lengths[key.index()]
    }

    /// Frame to show after `counter` ticks, holding each frame `hold` ticks
    #[inline]
    pub fn frame_index(&self, key: K, counter: u32, hold: u32) -> usize {
        (counter / hold.max(1)) as usize % self.len(key)
    }
}
