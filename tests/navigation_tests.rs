// Navigation state machine tests over generated traces

use gorou::grouping::GroupBy;
use gorou::model::{Frame, GoRoutine, Trace};
use gorou::navigation::{Depth, NavEvent, Navigator, Row};
use rstest::rstest;

/// `groups` buckets with `per_group` goroutines each, bucketed by status
fn trace(groups: usize, per_group: usize) -> Trace {
    let mut trace = Trace::default();
    let mut id = 1;
    for g in 0..groups {
        for _ in 0..per_group {
            let mut goroutine = GoRoutine::new(id, format!("status {}", g));
            goroutine.stack.push(Frame {
                package: "github.com/acme/app".to_string(),
                function: format!("f{}", id),
                file: "/src/app.go".to_string(),
                line: id,
                ..Frame::default()
            });
            trace.goroutines.push(goroutine);
            id += 1;
        }
    }
    trace
}

#[rstest]
#[case(1, 1)]
#[case(3, 2)]
#[case(5, 1)]
fn test_next_never_passes_last_group(#[case] groups: usize, #[case] per_group: usize) {
    let trace = trace(groups, per_group);
    let mut navigator = Navigator::new(&trace, GroupBy::Status, None, |_: Option<&GoRoutine>| {});
    for _ in 0..groups + 3 {
        navigator.handle(NavEvent::Next);
        assert!(navigator.group_index() < groups);
    }
    assert_eq!(navigator.group_index(), groups - 1);
}

#[rstest]
#[case(GroupBy::Age)]
#[case(GroupBy::Stack)]
#[case(GroupBy::Status)]
fn test_grouped_start_state(#[case] mode: GroupBy) {
    let trace = trace(2, 2);
    let mut calls = 0;
    let navigator = Navigator::new(&trace, mode, None, |_: Option<&GoRoutine>| calls += 1);
    assert_eq!(navigator.depth(), Depth::GroupList);
    assert_eq!(navigator.thread_index(), None);
    assert_eq!(navigator.selected(), None);
    drop(navigator);
    assert_eq!(calls, 0);
}

#[rstest]
#[case(0, Some(1))]
#[case(2, Some(3))]
#[case(9, None)]
fn test_point_select_in_thread_list(#[case] row: usize, #[case] expected: Option<u64>) {
    let trace = trace(1, 4);
    let mut events = Vec::new();
    let mut navigator = Navigator::new(&trace, GroupBy::None, None, |g: Option<&GoRoutine>| {
        events.push(g.map(|g| g.id))
    });
    navigator.handle(NavEvent::PointSelect(Some(row)));
    let expected_selected = expected.or(Some(1));
    assert_eq!(navigator.selected().map(|g| g.id), expected_selected);
    drop(navigator);

    // initial emission, plus one more when the click changed the selection
    let mut wanted = vec![Some(1)];
    if expected.is_some_and(|id| id != 1) {
        wanted.push(expected);
    }
    assert_eq!(events, wanted);
}

#[test]
fn test_point_select_group_row_enters_it() {
    let trace = trace(3, 2);
    let mut events = Vec::new();
    let mut navigator = Navigator::new(&trace, GroupBy::Status, None, |g: Option<&GoRoutine>| {
        events.push(g.map(|g| g.id))
    });
    navigator.handle(NavEvent::PointSelect(Some(2)));
    assert_eq!(navigator.depth(), Depth::ThreadList);
    assert_eq!(navigator.group_index(), 2);
    assert_eq!(navigator.selected().map(|g| g.id), Some(5));
    drop(navigator);
    assert_eq!(events, vec![Some(5)]);
}

#[test]
fn test_thread_rows_show_focus_package() {
    let mut trace = trace(1, 1);
    trace.goroutines[0].stack.insert(
        0,
        Frame {
            package: "runtime".to_string(),
            function: "gopark".to_string(),
            file: "/go/src/runtime/proc.go".to_string(),
            line: 363,
            ..Frame::default()
        },
    );

    let navigator = Navigator::new(&trace, GroupBy::None, None, |_: Option<&GoRoutine>| {});
    assert!(matches!(
        navigator.rows()[0],
        Row::Thread { function: "gopark", .. }
    ));

    let navigator = Navigator::new(
        &trace,
        GroupBy::None,
        Some("acme".to_string()),
        |_: Option<&GoRoutine>| {},
    );
    match &navigator.rows()[0] {
        Row::Thread {
            package, function, ..
        } => {
            assert_eq!(*package, "app");
            assert_eq!(*function, "f1");
        }
        other => panic!("Expected a thread row, got {:?}", other),
    }
}
