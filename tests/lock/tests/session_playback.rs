//! Editing session boundary: cache invalidation, playback navigation and
//! the per-cell presentation codes.

use pathtrace_harness::{render_cells, CellState, EditSession, GridView, DEFAULT_GRID_SIZE};
use pathtrace_kernel::grid::{Cell, GridError};
use pathtrace_search::{SearchPolicy, TerminationReason, TraceError};

fn session_3x3() -> EditSession {
    let mut session = EditSession::new(3).unwrap();
    session.set_start(Cell::new(0, 0)).unwrap();
    session.set_goal(Cell::new(2, 2)).unwrap();
    session
}

#[test]
fn default_session_is_fifty_wide() {
    let session = EditSession::new(DEFAULT_GRID_SIZE).unwrap();
    assert_eq!(session.grid().size(), 50);
    assert_eq!(session.grid().cell_count(), 2500);
    assert!(session.result().is_none());
}

#[test]
fn every_changing_mutation_invalidates() {
    type Mutation = fn(&mut EditSession);
    let mutations: [(&str, Mutation); 6] = [
        ("toggle_wall", |s| {
            s.toggle_wall(Cell::new(1, 1)).unwrap();
        }),
        ("set_wall", |s| {
            s.set_wall(Cell::new(0, 2), true).unwrap();
        }),
        ("bulk_set", |s| {
            s.bulk_set(&[Cell::new(1, 0), Cell::new(1, 2)], true).unwrap();
        }),
        ("randomize", |s| s.randomize(0.4).unwrap()),
        ("set_goal", |s| s.set_goal(Cell::new(2, 1)).unwrap()),
        ("clear", EditSession::clear),
    ];
    for (name, mutate) in mutations {
        let mut session = session_3x3();
        session.run().unwrap();
        mutate(&mut session);
        assert!(session.result().is_none(), "{name} kept a stale result");
        assert!(session.cursor().is_none(), "{name} kept a stale cursor");
    }
}

#[test]
fn run_error_propagates_occupied_endpoint() {
    let mut session = session_3x3();
    assert_eq!(
        session.set_wall(Cell::new(2, 2), true),
        Err(GridError::OccupiedEndpoint {
            endpoint: pathtrace_kernel::grid::Endpoint::Goal,
            cell: Cell::new(2, 2),
        })
    );
    session.clear();
    assert!(session.run().is_err());
}

#[test]
fn playback_scrubs_forward_and_back() {
    let mut session = session_3x3();
    let frame_count = session.run().unwrap().frames().len();
    let cursor = session.cursor_mut().unwrap();

    assert_eq!(cursor.prev(), 0);
    for expected in 1..frame_count {
        assert_eq!(cursor.next(), expected);
    }
    assert_eq!(cursor.next(), frame_count - 1, "next clamps at the last frame");
    assert_eq!(
        cursor.goto(frame_count),
        Err(TraceError::OutOfRange {
            index: frame_count,
            len: frame_count
        })
    );
    assert_eq!(cursor.goto(2), Ok(2));
    assert_eq!(session.current_frame(), session.frame_at(2).ok());
}

#[test]
fn view_codes_follow_the_cursor() {
    let mut session = session_3x3();
    session.set_wall(Cell::new(1, 1), true).unwrap();
    session.run().unwrap();

    let initial = session.view();
    assert_eq!(initial.codes(), vec![2, 0, 0, 0, 1, 0, 0, 0, 3]);

    // Frame 1: start settled, its free neighbours (1,0) and (0,1) open.
    session.cursor_mut().unwrap().next();
    let view = session.view();
    assert_eq!(view.frame_index, Some(1));
    assert_eq!(view.cells[1], CellState::Frontier);
    assert_eq!(view.cells[3], CellState::Frontier);
    assert_eq!(view.cells[0], CellState::Start, "endpoints take precedence");

    session.cursor_mut().unwrap().goto_end();
    let last = session.view();
    assert_eq!(last.partial_path, last.path);
    assert_eq!(last.termination, Some("goal_reached"));
    let json = last.to_json_value();
    assert_eq!(json["size"], 3);
    assert_eq!(json["path"][0], 0);
    assert_eq!(json["path"][4], 8);
}

#[test]
fn render_cells_marks_visited() {
    let mut session = session_3x3();
    session.run().unwrap();
    let frame = session.frame_at(2).unwrap();
    let cells = render_cells(session.grid(), Some(frame));
    let visited = cells.iter().filter(|&&c| c == CellState::Visited).count();
    // Frame 2 has settled start and one more cell; start renders as Start.
    assert_eq!(visited, 1);
}

#[test]
fn policy_change_applies_to_next_run() {
    let mut session = session_3x3();
    session.set_policy(SearchPolicy { max_steps: 1 });
    let result = session.run().unwrap();
    assert_eq!(
        result.termination,
        TerminationReason::StepLimitExceeded { limit: 1 }
    );
    let view: GridView = session.view();
    assert_eq!(view.termination, Some("step_limit_exceeded"));
}
