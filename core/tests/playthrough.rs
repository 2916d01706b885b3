use std::collections::BTreeSet;

use rand::prelude::*;
use sweepkb_core::*;

/// Truthful board used only to answer the agent's moves.
struct Board {
    grid: Grid,
    mines: BTreeSet<Coord2>,
}

impl Board {
    fn random(size: Coord2, mine_count: usize, seed: u64) -> Self {
        let grid = Grid::new(size.0, size.1).unwrap();
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut mines = BTreeSet::new();
        while mines.len() < mine_count {
            mines.insert((
                rng.random_range(0..size.0),
                rng.random_range(0..size.1),
            ));
        }
        Self { grid, mines }
    }

    fn adjacent_mines(&self, cell: Coord2) -> u8 {
        self.grid
            .neighbors(cell)
            .filter(|pos| self.mines.contains(pos))
            .count() as u8
    }
}

#[derive(Debug, PartialEq)]
enum Ending {
    Won,
    HitMine,
}

/// Plays until the agent runs out of moves or reveals a mine, checking soundness after every step.
fn play(board: &Board, config: AgentConfig) -> (Agent, Ending) {
    let mut agent = Agent::with_config(config).unwrap();
    let mut previous = (BTreeSet::new(), BTreeSet::new(), BTreeSet::new());

    loop {
        let safe_move = agent.next_safe_move();
        if let Some(cell) = safe_move {
            assert!(!board.mines.contains(&cell), "{cell:?} was proven safe");
        }
        let Some(cell) = safe_move.or_else(|| agent.next_guess_move()) else {
            return (agent, Ending::Won);
        };
        if board.mines.contains(&cell) {
            return (agent, Ending::HitMine);
        }

        agent.observe(cell, board.adjacent_mines(cell)).unwrap();

        let mines = agent.known_mines();
        let safes = agent.known_safes();
        let moves = agent.moves_made();

        assert!(mines.is_disjoint(&safes));
        assert!(mines.is_subset(&board.mines));
        assert!(safes.is_disjoint(&board.mines));
        assert!(moves.is_subset(&safes));

        assert!(previous.0.is_subset(&mines));
        assert!(previous.1.is_subset(&safes));
        assert!(previous.2.is_subset(&moves));
        previous = (mines, safes, moves);

        for sentence in agent.knowledge().iter() {
            assert!(!sentence.is_empty());
            assert!(usize::from(sentence.count()) <= sentence.len(), "{sentence}");
            let actual = sentence
                .cells()
                .iter()
                .filter(|cell| board.mines.contains(cell))
                .count();
            assert_eq!(actual, usize::from(sentence.count()), "{sentence} is false");
        }
    }
}

#[test]
fn deductions_stay_sound_across_random_games() {
    for seed in 0..40 {
        let board = Board::random((8, 8), 10, seed);
        let (agent, ending) = play(&board, AgentConfig::new((8, 8), seed));

        if ending == Ending::Won {
            assert_eq!(agent.known_mines(), board.mines);
            assert!(agent.is_finished());
        }
    }
}

#[test]
fn fixed_point_games_stay_sound() {
    for seed in 0..40 {
        let board = Board::random((9, 12), 16, seed);
        let config = AgentConfig::new((9, 12), seed).with_extraction(ExtractionPolicy::FixedPoint);

        play(&board, config);
    }
}

#[test]
fn mine_free_board_is_cleared_after_one_guess() {
    let board = Board {
        grid: Grid::new(5, 5).unwrap(),
        mines: BTreeSet::new(),
    };

    let (agent, ending) = play(&board, AgentConfig::new((5, 5), 3));

    assert_eq!(ending, Ending::Won);
    assert_eq!(agent.moves_made().len(), 25);
    assert!(agent.knowledge().is_empty());
}

#[test]
fn single_safe_cell_board_is_won_in_one_guess() {
    let grid = Grid::new(3, 3).unwrap();
    let board = Board {
        grid,
        mines: grid.cells().filter(|&cell| cell != (1, 1)).collect(),
    };
    let mut agent = Agent::new(3, 3).unwrap();

    agent.observe((1, 1), board.adjacent_mines((1, 1))).unwrap();

    assert_eq!(agent.known_mines(), board.mines);
    assert_eq!(agent.next_safe_move(), None);
    assert_eq!(agent.next_guess_move(), None);
    assert!(agent.is_finished());
}
