use kurosuwado_core::{Direction, Entry, NavError, NavigationState, Puzzle, Square};

// 3x3 board with one across and one down entry crossing at (0, 0):
//   C A T
//   A # #
//   B # #
fn cross_puzzle() -> Puzzle {
    let grid = vec![
        vec![
            Square::Letter('C'),
            Square::Letter('A'),
            Square::Letter('T'),
        ],
        vec![Square::Letter('A'), Square::Block, Square::Block],
        vec![Square::Letter('B'), Square::Block, Square::Block],
    ];
    Puzzle {
        title: "Cross".to_string(),
        author: "test".to_string(),
        date: "2022-01-04".to_string(),
        height: 3,
        width: 3,
        grid,
        entries: vec![
            Entry {
                name: "A01".to_string(),
                clue: "Feline".to_string(),
                cells: vec![(0, 0), (0, 1), (0, 2)],
            },
            Entry {
                name: "D01".to_string(),
                clue: "Taxi".to_string(),
                cells: vec![(0, 0), (1, 0), (2, 0)],
            },
        ],
    }
}

fn loading_puzzle() -> Puzzle {
    let letters = ['L', 'O', 'A', 'D', 'I', 'N', 'G'];
    Puzzle {
        title: "Loading".to_string(),
        author: "test".to_string(),
        date: "2022-01-04".to_string(),
        height: 1,
        width: 7,
        grid: vec![letters.iter().map(|&ch| Square::Letter(ch)).collect()],
        entries: vec![Entry {
            name: "A01".to_string(),
            clue: "Seen while waiting".to_string(),
            cells: (0..7).map(|col| (0, col)).collect(),
        }],
    }
}

#[test]
fn cross_puzzle_validates() {
    cross_puzzle().validate().expect("valid puzzle");
    loading_puzzle().validate().expect("valid puzzle");
}

#[test]
fn go_to_cell_reaches_every_unblocked_cell() {
    let puzzle = cross_puzzle();
    let state = NavigationState::default();
    for row in 0..puzzle.height {
        for col in 0..puzzle.width {
            if puzzle.is_blocked(row, col) {
                continue;
            }
            let next = state.go_to_cell(&puzzle, row, col).expect("unblocked cell");
            assert_eq!(next.position(&puzzle), (row, col));
        }
    }
}

#[test]
fn go_to_cell_fails_on_blocked_cells() {
    let puzzle = cross_puzzle();
    let state = NavigationState::default();
    assert_eq!(state.go_to_cell(&puzzle, 1, 1), Err(NavError::InvalidCell));
    assert_eq!(state.go_to_cell(&puzzle, 2, 2), Err(NavError::InvalidCell));
}

#[test]
fn go_to_entry_matches_exact_names_only() {
    let puzzle = cross_puzzle();
    let state = NavigationState::default();
    let down = state.go_to_entry(&puzzle, "D01").expect("known entry");
    assert_eq!(down, NavigationState { entry: 1, cell: 0 });
    assert_eq!(
        state.go_to_entry(&puzzle, "D1"),
        Err(NavError::EntryNotFound)
    );
}

#[test]
fn clicking_the_active_intersection_toggles_orientation() {
    let puzzle = cross_puzzle();
    let across = NavigationState::default();
    assert_eq!(across.position(&puzzle), (0, 0));

    let down = across.go_to_cell(&puzzle, 0, 0).expect("intersection");
    assert_eq!(down.entry, 1);
    assert_eq!(down.position(&puzzle), (0, 0));

    let back = down.go_to_cell(&puzzle, 0, 0).expect("intersection");
    assert_eq!(back, across);
}

#[test]
fn clicking_elsewhere_keeps_the_current_orientation() {
    let puzzle = cross_puzzle();
    let down = NavigationState { entry: 1, cell: 2 };
    // (0, 0) intersects both entries; coming from elsewhere in the down
    // entry the down entry must win.
    let next = down.go_to_cell(&puzzle, 0, 0).expect("intersection");
    assert_eq!(next.entry, 1);
    assert_eq!(next.cell, 0);
}

#[test]
fn single_entry_cells_switch_orientation_implicitly() {
    let puzzle = cross_puzzle();
    let down = NavigationState { entry: 1, cell: 1 };
    let next = down.go_to_cell(&puzzle, 0, 2).expect("edge cell");
    assert_eq!(next.entry, 0);
    assert_eq!(next.cell, 2);
}

#[test]
fn letter_advance_wraps_to_the_next_entry() {
    let puzzle = cross_puzzle();
    let state = NavigationState { entry: 0, cell: 2 };
    let next = state.advance_for_letter(&puzzle);
    assert_eq!(next, NavigationState { entry: 1, cell: 0 });

    let last = NavigationState { entry: 1, cell: 2 };
    assert_eq!(
        last.advance_for_letter(&puzzle),
        NavigationState { entry: 0, cell: 0 }
    );
}

#[test]
fn backspace_wraps_to_the_previous_entry_last_cell() {
    let puzzle = cross_puzzle();
    let state = NavigationState::default();
    let next = state.retreat_for_backspace(&puzzle);
    assert_eq!(next, NavigationState { entry: 1, cell: 2 });
}

#[test]
fn advance_then_retreat_is_identity() {
    let puzzle = cross_puzzle();
    for entry in 0..puzzle.entries.len() {
        for cell in 0..puzzle.entries[entry].cells.len() {
            let state = NavigationState { entry, cell };
            assert_eq!(
                state.advance_for_letter(&puzzle).retreat_for_backspace(&puzzle),
                state
            );
        }
    }
}

#[test]
fn tab_cycles_entries_in_load_order() {
    let puzzle = cross_puzzle();
    let state = NavigationState::default();
    let second = state.next_entry(&puzzle);
    assert_eq!(second, NavigationState { entry: 1, cell: 0 });
    let wrapped = second.next_entry(&puzzle);
    assert_eq!(wrapped, NavigationState { entry: 0, cell: 0 });
}

#[test]
fn directional_move_skips_blocked_cells() {
    let puzzle = cross_puzzle();
    let state = NavigationState { entry: 1, cell: 1 }; // (1, 0)
    let down = state.step_directional(&puzzle, Direction::Down);
    assert_eq!(down.position(&puzzle), (2, 0));
    // Right from (1, 0): (1, 1) and (1, 2) are blocked, the lap ends
    // before re-reaching the origin, so the state is unchanged.
    let right = state.step_directional(&puzzle, Direction::Right);
    assert_eq!(right, state);
}

#[test]
fn directional_move_wraps_around_the_board() {
    let puzzle = cross_puzzle();
    let state = NavigationState { entry: 0, cell: 2 }; // (0, 2)
    let right = state.step_directional(&puzzle, Direction::Right);
    assert_eq!(right.position(&puzzle), (0, 0));
}

#[test]
fn directional_move_terminates_on_degenerate_dimensions() {
    let puzzle = loading_puzzle();
    let state = NavigationState::default();
    // Height 1: a vertical lap has no candidate cells at all.
    let up = state.step_directional(&puzzle, Direction::Up);
    assert_eq!(up, state);
    let down = state.step_directional(&puzzle, Direction::Down);
    assert_eq!(down, state);
}

#[test]
fn toggle_orientation_is_a_noop_without_a_crossing_entry() {
    let puzzle = loading_puzzle();
    let state = NavigationState { entry: 0, cell: 3 };
    assert_eq!(state.toggle_orientation(&puzzle), state);
}
