use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::PieceKind;

/// Smallest color index a spawned piece can carry.
pub const MIN_PIECE_COLOR: u8 = 1;
/// Largest color index a spawned piece can carry.
pub const MAX_PIECE_COLOR: u8 = 4;

/// A piece waiting to spawn: its kind and the color its cells are stamped with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueuedPiece {
    pub kind: PieceKind,
    pub color: u8,
}

/// Generates pieces independently and uniformly, with one piece of preview.
///
/// Unlike a bag randomizer, every draw picks any of the seven kinds with equal
/// probability, so droughts are possible. The generator is driven by a seeded
/// [`Pcg32`], so the same seed always yields the same sequence.
///
/// # Example
///
/// ```
/// use cognito_engine::PieceBuffer;
///
/// let mut a = PieceBuffer::with_seed(42);
/// let mut b = PieceBuffer::with_seed(42);
/// for _ in 0..10 {
///     assert_eq!(a.pop_next(), b.pop_next());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PieceBuffer {
    rng: Pcg32,
    next: QueuedPiece,
}

impl PieceBuffer {
    /// Creates a buffer seeded from the thread-local generator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let next = Self::draw(&mut rng);
        Self { rng, next }
    }

    fn draw(rng: &mut Pcg32) -> QueuedPiece {
        QueuedPiece {
            kind: rng.random(),
            color: rng.random_range(MIN_PIECE_COLOR..=MAX_PIECE_COLOR),
        }
    }

    /// Takes the previewed piece and draws a new preview.
    pub fn pop_next(&mut self) -> QueuedPiece {
        let fresh = Self::draw(&mut self.rng);
        std::mem::replace(&mut self.next, fresh)
    }
}

impl Default for PieceBuffer {
    fn default() -> Self {
        Self::new()
    }
}
