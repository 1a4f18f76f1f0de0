/// Lines needed to advance one level.
pub const LINES_PER_LEVEL: usize = 5;

/// Game statistics: lines cleared, pieces locked, and the derived level.
///
/// The host scores one point per cleared line, so [`GameStats::score`] and
/// [`GameStats::total_cleared_lines`] always agree.
///
/// # Example
///
/// ```
/// use cognito_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(3);
/// stats.complete_piece_drop(2);
///
/// assert_eq!(stats.score(), 5);
/// assert_eq!(stats.level(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    completed_pieces: usize,
    total_cleared_lines: usize,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            completed_pieces: 0,
            total_cleared_lines: 0,
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.total_cleared_lines
    }

    /// Current level: starts at 1 and rises by one every [`LINES_PER_LEVEL`] lines.
    #[must_use]
    pub const fn level(&self) -> usize {
        1 + self.total_cleared_lines / LINES_PER_LEVEL
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Records one locked piece that cleared `cleared_lines` rows.
    pub const fn complete_piece_drop(&mut self, cleared_lines: usize) {
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_progression() {
        let mut stats = GameStats::new();
        assert_eq!(stats.level(), 1);
        for _ in 0..4 {
            stats.complete_piece_drop(1);
        }
        assert_eq!(stats.level(), 1);
        stats.complete_piece_drop(1);
        assert_eq!(stats.level(), 2);
        stats.complete_piece_drop(4);
        stats.complete_piece_drop(1);
        assert_eq!(stats.total_cleared_lines(), 10);
        assert_eq!(stats.level(), 3);
        assert_eq!(stats.completed_pieces(), 7);
    }
}
