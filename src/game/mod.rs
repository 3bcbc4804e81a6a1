use std::{fmt, str::FromStr};

use itertools::Itertools as _;
use rand::{Rng as _, SeedableRng as _, rngs::SmallRng, seq::IndexedRandom as _};
use thiserror::Error;

use crate::board::{Board, Direction, InvalidBoardSize, ParseDirectionError};

pub mod console;

/// Tile values a spawn draws from, uniformly. Four twos to one four.
const SPAWN_VALUES: [u64; 5] = [2, 2, 2, 2, 4];

pub struct Game {
    board: Board,
    rounds: u64,
    rng: SmallRng,
}

impl Game {
    /// Creates a `size` by `size` game seeded with `size` starting tiles.
    ///
    /// # Errors
    /// Returns an `InvalidBoardSize` error if `size` is zero.
    pub fn new(size: usize) -> Result<Self, InvalidBoardSize> {
        Self::with_rng(size, SmallRng::from_rng(&mut rand::rng()))
    }

    /// Like [`Game::new`], but fully reproducible: the same seed produces the
    /// same starting tiles and the same spawns on every later move.
    pub fn from_seed(size: usize, seed: u64) -> Result<Self, InvalidBoardSize> {
        Self::with_rng(size, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(size: usize, rng: SmallRng) -> Result<Self, InvalidBoardSize> {
        let mut game = Self {
            board: Board::new(size)?,
            rounds: 0,
            rng,
        };

        game.spawn_tiles(size);
        Ok(game)
    }

    /// Requests a move. On a terminal board the request is ignored and
    /// `false` is returned. Otherwise the board is shifted, one tile is
    /// spawned, the move counter is incremented and `true` is returned,
    /// whether or not the shift changed any cell.
    pub fn pack(&mut self, direction: Direction) -> bool {
        if self.board.is_terminal() {
            log::trace!("pack {direction} ignored, board is terminal");
            return false;
        }

        let changed = self.board.shift(direction);
        log::trace!("pack {direction}, changed: {changed}");

        self.spawn_tiles(1);
        self.rounds += 1;

        true
    }

    /// Issues `plays` move requests, cycling through the strategy's
    /// directions from its start. Each request goes through [`Game::pack`]
    /// unchanged, so requests against a terminal board are ignored.
    pub fn auto(&mut self, strategy: &Strategy, plays: usize) {
        for i in 0..plays {
            self.pack(strategy.direction(i));
        }
    }

    // Independent placement attempts. An attempt on a full board changes
    // nothing; a tile placed by one attempt is visible to the next.
    fn spawn_tiles(&mut self, count: usize) {
        for _ in 0..count {
            let empties = self.board.empty_cells();

            let Some(&index) = empties.choose(&mut self.rng) else {
                continue;
            };

            let value = SPAWN_VALUES[self.rng.random_range(0..SPAWN_VALUES.len())];
            self.board.set_flat(index, value);
            log::trace!("spawned {value} at cell {index}");
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn is_terminal(&self) -> bool {
        self.board.is_terminal()
    }

    pub fn score(&self) -> u64 {
        self.board.score()
    }

    pub fn max_tile(&self) -> u64 {
        self.board.max_tile()
    }

    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    pub fn values(&self) -> &[u64] {
        self.board.values()
    }
}

#[derive(Debug, Error)]
pub enum ParseStrategyError {
    #[error("strategy contains no directions")]
    Empty,
    #[error(transparent)]
    Direction(#[from] ParseDirectionError),
}

/// A non-empty cycle of directions for automated play, written `l-u-r-d`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strategy {
    directions: Vec<Direction>,
}

impl Strategy {
    pub fn new(directions: Vec<Direction>) -> Result<Self, ParseStrategyError> {
        if directions.is_empty() {
            return Err(ParseStrategyError::Empty);
        }

        Ok(Self { directions })
    }

    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    /// Direction for the `index`-th request of a run.
    pub fn direction(&self, index: usize) -> Direction {
        self.directions[index % self.directions.len()]
    }
}

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let directions = s
            .split('-')
            .map(Direction::from_str)
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(directions)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.directions.iter().format("-"))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn count_tiles(board: &Board) -> usize {
        board.size() * board.size() - board.count_empty()
    }

    #[test]
    fn test_new_game_is_seeded() {
        for size in 1..7 {
            let game = Game::new(size).unwrap();

            assert_eq!(game.rounds(), 0);
            assert_eq!(count_tiles(game.board()), size);
            assert!(game.values().iter().all(|&cell| matches!(cell, 0 | 2 | 4)));

            if size > 1 {
                assert!(!game.is_terminal());
            }
        }
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = Game::from_seed(4, 123).unwrap();
        let mut b = Game::from_seed(4, 123).unwrap();

        assert_eq!(a.values(), b.values());

        for direction in [Direction::Left, Direction::Up, Direction::Left] {
            assert_eq!(a.pack(direction), b.pack(direction));
            assert_eq!(a.values(), b.values());
        }

        assert_eq!(a.rounds(), b.rounds());
        assert_eq!(a.score(), b.score());
    }

    #[test]
    fn test_pack_is_shift_plus_one_spawn() {
        for seed in 0..20 {
            let mut game = Game::from_seed(4, seed).unwrap();
            let strategy: Strategy = "l-u-r-d".parse().unwrap();

            for i in 0..50 {
                if game.is_terminal() {
                    break;
                }

                let direction = strategy.direction(i);
                let mut expected = game.board().clone();
                expected.shift(direction);

                let rounds = game.rounds();
                assert!(game.pack(direction));
                assert_eq!(game.rounds(), rounds + 1);

                // The packed board is the shifted board plus at most one
                // fresh tile on a previously empty cell.
                let spawned: Vec<usize> = (0..expected.values().len())
                    .filter(|&cell| expected.values()[cell] != game.values()[cell])
                    .collect();

                if expected.count_empty() == 0 {
                    assert!(spawned.is_empty());
                    assert_eq!(game.score(), expected.score());
                } else {
                    assert_eq!(spawned.len(), 1);
                    assert_eq!(expected.values()[spawned[0]], 0);
                    assert!(matches!(game.values()[spawned[0]], 2 | 4));

                    // The score moves by exactly the spawned value.
                    assert_eq!(game.score(), expected.score() + game.values()[spawned[0]]);
                }
            }
        }
    }

    #[test]
    fn test_unchanged_shift_still_counts() {
        // On a 2-tile 2x2 board most seeds leave some direction with nothing
        // to move; the request must still spawn and count.
        for seed in 0..64 {
            let mut game = Game::from_seed(2, seed).unwrap();

            let Some(direction) = Direction::ALL
                .into_iter()
                .find(|&direction| !game.board().clone().shift(direction))
            else {
                continue;
            };

            let before = game.values().to_vec();
            assert!(game.pack(direction));
            assert_eq!(game.rounds(), 1);

            let spawned: Vec<usize> = (0..before.len())
                .filter(|&cell| before[cell] != game.values()[cell])
                .collect();

            assert_eq!(spawned.len(), 1);
            assert_eq!(before[spawned[0]], 0);
            assert!(matches!(game.values()[spawned[0]], 2 | 4));

            return;
        }

        panic!("no seed produced a board with an idle direction");
    }

    #[test]
    fn test_terminal_board_ignores_requests() {
        // A 1x1 game is terminal as soon as its starting tile lands.
        let mut game = Game::from_seed(1, 0).unwrap();
        assert!(game.is_terminal());

        let before = game.values().to_vec();

        for direction in Direction::ALL {
            assert!(!game.pack(direction));
        }

        assert_eq!(game.values(), before);
        assert_eq!(game.rounds(), 0);
    }

    #[test]
    fn test_auto_matches_manual_packs() {
        let strategy: Strategy = "l-u".parse().unwrap();

        let mut batch = Game::from_seed(4, 99).unwrap();
        batch.auto(&strategy, 5);

        let mut manual = Game::from_seed(4, 99).unwrap();
        for direction in [
            Direction::Left,
            Direction::Up,
            Direction::Left,
            Direction::Up,
            Direction::Left,
        ] {
            manual.pack(direction);
        }

        assert_eq!(batch.values(), manual.values());
        assert_eq!(batch.rounds(), manual.rounds());
    }

    #[test]
    fn test_auto_plays_to_terminal() {
        let strategy: Strategy = "l-u-r-d".parse().unwrap();
        let mut game = Game::from_seed(2, 7).unwrap();

        // Every accepted move spawns a tile, so the score grows until the
        // board locks up; 2x2 boards lock up well within this bound.
        for _ in 0..4096 {
            if game.is_terminal() {
                break;
            }

            game.auto(&strategy, strategy.directions().len());
        }

        assert!(game.is_terminal());
        assert!(game.rounds() > 0);
        assert_eq!(game.board().count_empty(), 0);
    }

    #[test]
    fn test_spawn_values() {
        let mut seen = [false; 2];

        for seed in 0..100 {
            let game = Game::from_seed(3, seed).unwrap();

            for &cell in game.values() {
                match cell {
                    0 => {}
                    2 => seen[0] = true,
                    4 => seen[1] = true,
                    other => panic!("unexpected starting tile {other}"),
                }
            }
        }

        assert!(seen[0] && seen[1]);
    }

    #[test]
    fn test_strategy_parsing() {
        let strategy: Strategy = "l-u-r-d".parse().unwrap();
        assert_eq!(
            strategy.directions(),
            [
                Direction::Left,
                Direction::Up,
                Direction::Right,
                Direction::Down
            ]
        );
        assert_eq!(strategy.to_string(), "l-u-r-d");

        let cycle: Strategy = "l-r".parse().unwrap();
        assert_eq!(cycle.direction(0), Direction::Left);
        assert_eq!(cycle.direction(1), Direction::Right);
        assert_eq!(cycle.direction(2), Direction::Left);
        assert_eq!(cycle.direction(5), Direction::Right);

        assert!("".parse::<Strategy>().is_err());
        assert!("l-x".parse::<Strategy>().is_err());
        assert!("l-".parse::<Strategy>().is_err());
        assert!(matches!(
            Strategy::new(vec![]),
            Err(ParseStrategyError::Empty)
        ));
    }

    #[test]
    fn test_single_letter_strategy() {
        let strategy: Strategy = "d".parse().unwrap();
        assert_eq!(strategy.direction(17), Direction::Down);
        assert_eq!(strategy.to_string(), "d");
    }
}
