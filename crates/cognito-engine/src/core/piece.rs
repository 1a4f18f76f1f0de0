use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Column of the 4×4 anchor block when a piece spawns.
pub const PIECE_SPAWN_X: i32 = 5;
/// Row of the 4×4 anchor block when a piece spawns.
pub const PIECE_SPAWN_Y: i32 = 0;

/// A falling piece: kind, rotation index and the position of its 4×4 anchor block.
///
/// Pieces are immutable - movement and rotation operations return new `Piece` instances.
/// Positions are signed because some rotations leave the leftmost columns of the
/// anchor block empty, so the anchor may sit left of column 0 while every occupied
/// cell is still inside the board.
///
/// # Coordinate System
///
/// - `x` increases rightward (columns), `y` increases downward (rows)
/// - `(0, 0)` is the top-left cell of the board
/// - Occupied cells are `(x + dx, y + dy)` for each offset of the current [`PieceMask`]
///
/// # Example
///
/// ```
/// use cognito_engine::{Piece, PieceKind};
///
/// let piece = Piece::new(PieceKind::T);
/// let moved = piece.right();
/// let rotated = moved.rotated();
/// assert_eq!(rotated.x(), 6);
/// assert_eq!(rotated.rotation(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    rotation: usize,
    x: i32,
    y: i32,
}

impl Piece {
    /// Creates a piece at the spawn pose (rotation 0, `x = 5`, `y = 0`).
    #[must_use]
    pub const fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: 0,
            x: PIECE_SPAWN_X,
            y: PIECE_SPAWN_Y,
        }
    }

    /// Creates a piece at an arbitrary pose.
    ///
    /// The rotation index is reduced modulo the kind's rotation count, so
    /// out-of-range indices reported by a host map onto a valid variant.
    #[must_use]
    pub fn with_pose(kind: PieceKind, rotation: usize, x: i32, y: i32) -> Self {
        Self {
            kind,
            rotation: rotation % kind.rotation_count(),
            x,
            y,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn rotation(&self) -> usize {
        self.rotation
    }

    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    #[must_use]
    pub fn mask(&self) -> PieceMask {
        self.kind.mask(self.rotation)
    }

    /// Returns the absolute `(x, y)` cells covered by this piece.
    #[must_use]
    pub fn occupied_positions(&self) -> ArrayVec<(i32, i32), 4> {
        self.mask()
            .offsets()
            .map(|(dx, dy)| (self.x + dx, self.y + dy))
            .collect()
    }

    #[must_use]
    pub const fn left(&self) -> Self {
        self.shifted(-1, 0)
    }

    #[must_use]
    pub const fn right(&self) -> Self {
        self.shifted(1, 0)
    }

    #[must_use]
    pub const fn down(&self) -> Self {
        self.shifted(0, 1)
    }

    #[must_use]
    pub const fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            kind: self.kind,
            rotation: self.rotation,
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Returns the piece turned to the next rotation variant, wrapping around.
    ///
    /// This is the only rotation the host supports: there is no counter-rotation
    /// and no wall kick.
    #[must_use]
    pub fn rotated(&self) -> Self {
        self.with_rotation(self.rotation + 1)
    }

    #[must_use]
    pub fn with_rotation(&self, rotation: usize) -> Self {
        Self::with_pose(self.kind, rotation, self.x, self.y)
    }

    #[must_use]
    pub const fn with_x(&self, x: i32) -> Self {
        Self { x, ..*self }
    }

    #[must_use]
    pub const fn with_y(&self, y: i32) -> Self {
        Self { y, ..*self }
    }
}

/// Occupied cells of one rotation variant within the 4×4 anchor block.
///
/// Each entry is a cell index `i * 4 + j`, where `i` is the row offset and `j`
/// the column offset from the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceMask([u8; 4]);

impl PieceMask {
    #[must_use]
    pub const fn new(cells: [u8; 4]) -> Self {
        let mut i = 0;
        while i < 4 {
            assert!(cells[i] < 16, "mask cells must lie in the 4x4 block");
            i += 1;
        }
        Self(cells)
    }

    #[must_use]
    pub const fn cells(self) -> [u8; 4] {
        self.0
    }

    /// Returns `(dx, dy)` offsets of the occupied cells.
    pub fn offsets(self) -> impl Iterator<Item = (i32, i32)> {
        self.0
            .into_iter()
            .map(|idx| (i32::from(idx % 4), i32::from(idx / 4)))
    }

    /// Smallest and largest column offsets covered by this mask.
    #[must_use]
    pub fn column_span(self) -> (i32, i32) {
        self.offsets()
            .fold((i32::MAX, i32::MIN), |(lo, hi), (dx, _)| {
                (lo.min(dx), hi.max(dx))
            })
    }

    /// Legal anchor columns for this mask on a board `cols` wide (inclusive bounds).
    #[must_use]
    pub fn x_range(self, cols: usize) -> (i32, i32) {
        let (lo, hi) = self.column_span();
        let cols = i32::try_from(cols).unwrap_or(i32::MAX);
        (-lo, cols - 1 - hi)
    }
}

/// The seven piece kinds, in the host's shape-list order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    I = 0,
    Z = 1,
    S = 2,
    L = 3,
    J = 4,
    T = 5,
    O = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece kinds (7).
    pub const LEN: usize = 7;

    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::I,
        PieceKind::Z,
        PieceKind::S,
        PieceKind::L,
        PieceKind::J,
        PieceKind::T,
        PieceKind::O,
    ];

    /// Rotation variants of this kind, in rotation-index order.
    #[must_use]
    pub fn masks(self) -> &'static [PieceMask] {
        SHAPE_TABLE.masks(self)
    }

    #[must_use]
    pub fn rotation_count(self) -> usize {
        self.masks().len()
    }

    /// Returns the mask of a rotation index, reduced modulo the rotation count.
    #[must_use]
    pub fn mask(self, rotation: usize) -> PieceMask {
        let masks = self.masks();
        masks[rotation % masks.len()]
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use cognito_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::Z => 'Z',
            PieceKind::S => 'S',
            PieceKind::L => 'L',
            PieceKind::J => 'J',
            PieceKind::T => 'T',
            PieceKind::O => 'O',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use cognito_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('O'), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_char('o'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'Z' => Some(PieceKind::Z),
            'S' => Some(PieceKind::S),
            'L' => Some(PieceKind::L),
            'J' => Some(PieceKind::J),
            'T' => Some(PieceKind::T),
            'O' => Some(PieceKind::O),
            _ => None,
        }
    }

    /// Parses a piece kind from its name as sent by the host (`"I"`, `"T"`, ...).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Self::from_char(c)
    }
}

/// Versioned registry of every piece's rotation variants.
///
/// Placement search, reachability validation, action translation and the
/// host simulation all read shapes from [`SHAPE_TABLE`]; there is no other copy.
#[derive(Debug)]
pub struct ShapeTable {
    version: u32,
    shapes: [&'static [PieceMask]; PieceKind::LEN],
}

impl ShapeTable {
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    #[must_use]
    pub const fn masks(&self, kind: PieceKind) -> &'static [PieceMask] {
        self.shapes[kind as usize]
    }
}

const fn m(cells: [u8; 4]) -> PieceMask {
    PieceMask::new(cells)
}

pub static SHAPE_TABLE: ShapeTable = ShapeTable {
    version: 1,
    shapes: [
        // I-piece
        &[m([1, 5, 9, 13]), m([4, 5, 6, 7])],
        // Z-piece
        &[m([4, 5, 9, 10]), m([2, 6, 5, 9])],
        // S-piece
        &[m([6, 7, 9, 10]), m([1, 5, 6, 10])],
        // L-piece
        &[
            m([1, 2, 5, 9]),
            m([0, 4, 5, 6]),
            m([1, 5, 9, 8]),
            m([4, 5, 6, 10]),
        ],
        // J-piece
        &[
            m([1, 2, 6, 10]),
            m([5, 6, 7, 9]),
            m([2, 6, 10, 11]),
            m([3, 5, 6, 7]),
        ],
        // T-piece
        &[
            m([1, 4, 5, 6]),
            m([1, 4, 5, 9]),
            m([4, 5, 6, 9]),
            m([1, 5, 6, 9]),
        ],
        // O-piece
        &[m([1, 2, 5, 6])],
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_counts() {
        let counts: Vec<_> = PieceKind::ALL.iter().map(|k| k.rotation_count()).collect();
        assert_eq!(counts, [2, 2, 2, 4, 4, 4, 1]);
    }

    #[test]
    fn test_every_mask_has_four_distinct_cells() {
        for kind in PieceKind::ALL {
            for mask in kind.masks() {
                let mut cells = mask.cells();
                cells.sort_unstable();
                assert!(
                    cells.windows(2).all(|w| w[0] != w[1]),
                    "{kind:?} has duplicate cells: {cells:?}",
                );
            }
        }
    }

    #[test]
    fn test_rotation_wraps() {
        let piece = Piece::new(PieceKind::I);
        assert_eq!(piece.rotated().rotation(), 1);
        assert_eq!(piece.rotated().rotated().rotation(), 0);
        assert_eq!(Piece::new(PieceKind::O).rotated().rotation(), 0);
        assert_eq!(
            Piece::with_pose(PieceKind::T, 6, 0, 0).rotation(),
            2,
            "rotation index is reduced modulo the variant count",
        );
    }

    #[test]
    fn test_x_range() {
        // vertical I occupies column offset 1 only
        assert_eq!(PieceKind::I.mask(0).x_range(15), (-1, 13));
        // horizontal I occupies column offsets 0..=3
        assert_eq!(PieceKind::I.mask(1).x_range(15), (0, 11));
        // O occupies column offsets 1..=2
        assert_eq!(PieceKind::O.mask(0).x_range(10), (-1, 7));
    }

    #[test]
    fn test_occupied_positions() {
        let piece = Piece::with_pose(PieceKind::O, 0, 2, 3);
        let mut cells = piece.occupied_positions().into_iter().collect::<Vec<_>>();
        cells.sort_unstable();
        assert_eq!(cells, [(3, 3), (3, 4), (4, 3), (4, 4)]);
    }

    #[test]
    fn test_piece_kind_name_parsing() {
        for kind in PieceKind::ALL {
            let name = kind.as_char().to_string();
            assert_eq!(PieceKind::from_name(&name), Some(kind));
        }
        assert_eq!(PieceKind::from_name(""), None);
        assert_eq!(PieceKind::from_name("II"), None);
        assert_eq!(PieceKind::from_name("X"), None);
    }

    #[test]
    fn test_shape_table_version() {
        assert_eq!(SHAPE_TABLE.version(), 1);
        assert!(std::ptr::eq(PieceKind::L.masks(), SHAPE_TABLE.masks(PieceKind::L)));
    }
}
