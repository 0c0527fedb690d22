//! RNG module - piece catalog and random kind generation
//!
//! Boards never reach for a global random source. Every board owns a
//! [`PieceSource`], so the same seed (or the same script) always produces the
//! same fills and refills.
//!
//! - [`SimpleRng`]: tiny LCG used for seeding, deterministic across platforms
//! - [`PieceCatalog`]: uniform draw from the enabled piece kinds
//! - [`SequenceSource`]: cycles through a fixed list, for tests and replays

use arrayvec::ArrayVec;

use crate::types::{PieceKind, MIN_PIECE_KINDS};
use crate::BoardError;

/// Draws tried by the default [`PieceSource::next_kind_avoiding`]
const AVOIDING_DRAWS: usize = 16;

/// Anything that can hand out the next piece kind
pub trait PieceSource {
    fn next_kind(&mut self) -> PieceKind;

    /// Next kind that is not in `avoid`, or `None` if the source cannot offer one.
    fn next_kind_avoiding(&mut self, avoid: &[PieceKind]) -> Option<PieceKind> {
        (0..AVOIDING_DRAWS)
            .map(|_| self.next_kind())
            .find(|kind| !avoid.contains(kind))
    }
}

impl<S: PieceSource + ?Sized> PieceSource for Box<S> {
    fn next_kind(&mut self) -> PieceKind {
        (**self).next_kind()
    }

    fn next_kind_avoiding(&mut self, avoid: &[PieceKind]) -> Option<PieceKind> {
        (**self).next_kind_avoiding(avoid)
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of an LCG cycle with a short period.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// The enabled piece kinds plus the RNG that draws from them
#[derive(Debug, Clone)]
pub struct PieceCatalog {
    kinds: ArrayVec<PieceKind, 5>,
    rng: SimpleRng,
    seed: u32,
}

impl PieceCatalog {
    /// Catalog over `kinds` (duplicates dropped, order kept).
    ///
    /// Fewer than three distinct kinds cannot reliably produce a match-free
    /// board and is rejected.
    pub fn new(kinds: &[PieceKind], seed: u32) -> Result<Self, BoardError> {
        let mut enabled = ArrayVec::new();
        for &kind in kinds {
            if !enabled.contains(&kind) {
                enabled.push(kind);
            }
        }
        if enabled.len() < MIN_PIECE_KINDS {
            return Err(BoardError::TooFewKinds {
                found: enabled.len(),
                min: MIN_PIECE_KINDS,
            });
        }
        Ok(Self {
            kinds: enabled,
            rng: SimpleRng::new(seed),
            seed,
        })
    }

    /// All five kinds
    pub fn standard(seed: u32) -> Self {
        Self {
            kinds: ArrayVec::from(PieceKind::ALL),
            rng: SimpleRng::new(seed),
            seed,
        }
    }

    pub fn kinds(&self) -> &[PieceKind] {
        &self.kinds
    }

    /// Seed the catalog was created with
    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl PieceSource for PieceCatalog {
    fn next_kind(&mut self) -> PieceKind {
        let idx = self.rng.next_range(self.kinds.len() as u32) as usize;
        self.kinds[idx]
    }

    /// Uniform draw over the enabled kinds left after removing `avoid`
    fn next_kind_avoiding(&mut self, avoid: &[PieceKind]) -> Option<PieceKind> {
        let allowed: ArrayVec<PieceKind, 5> = self
            .kinds
            .iter()
            .copied()
            .filter(|kind| !avoid.contains(kind))
            .collect();
        if allowed.is_empty() {
            return None;
        }
        let idx = self.rng.next_range(allowed.len() as u32) as usize;
        Some(allowed[idx])
    }
}

/// Replays a fixed list of kinds, wrapping around at the end
#[derive(Debug, Clone)]
pub struct SequenceSource {
    kinds: Vec<PieceKind>,
    next: usize,
}

impl SequenceSource {
    /// An empty list falls back to the standard order.
    pub fn new(kinds: Vec<PieceKind>) -> Self {
        let kinds = if kinds.is_empty() {
            PieceKind::ALL.to_vec()
        } else {
            kinds
        };
        Self { kinds, next: 0 }
    }

    /// Parse a list of piece letters, e.g. `"RGBW"`. Unknown letters are skipped.
    pub fn from_letters(letters: &str) -> Self {
        Self::new(letters.chars().filter_map(PieceKind::from_char).collect())
    }

    /// Number of kinds handed out so far
    pub fn drawn(&self) -> usize {
        self.next
    }
}

impl PieceSource for SequenceSource {
    fn next_kind(&mut self) -> PieceKind {
        let kind = self.kinds[self.next % self.kinds.len()];
        self.next += 1;
        kind
    }

    /// Skips ahead through at most one full cycle of the script
    fn next_kind_avoiding(&mut self, avoid: &[PieceKind]) -> Option<PieceKind> {
        (0..self.kinds.len())
            .map(|_| self.next_kind())
            .find(|kind| !avoid.contains(kind))
    }
}
