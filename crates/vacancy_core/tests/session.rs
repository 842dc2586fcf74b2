use pretty_assertions::assert_eq;
use vacancy_core::{MaxPages, SearchSession, SessionError, SessionState};

fn session(first: u32) -> SearchSession {
    SearchSession::new(
        "https://jobs.example",
        "/search?text={query}&page={page}",
        "rust developer",
        first,
    )
}

fn visit(session: &mut SearchSession, page: u32) {
    session.start_fetch(page).unwrap();
    session.start_parse(page).unwrap();
    session.complete_page(page).unwrap();
}

#[test]
fn page_path_encodes_query() {
    let session = session(0);
    assert_eq!(session.page_path(3), "/search?text=rust+developer&page=3");
}

#[test]
fn only_first_page_before_max_is_known() {
    let mut session = session(1);
    assert_eq!(session.max_pages(), MaxPages::Unbounded);
    assert_eq!(session.next_page(), Some(1));
    visit(&mut session, 1);
    assert_eq!(session.next_page(), None);
    assert!(!session.is_done());
}

#[test]
fn visits_pages_in_order_until_bound() {
    let mut session = session(0);
    let mut visited = Vec::new();

    visit(&mut session, 0);
    visited.push(0);
    session.resolve_max_pages(5).unwrap();
    assert_eq!(session.remaining_pages(), 1..5);

    while let Some(page) = session.next_page() {
        visit(&mut session, page);
        visited.push(page);
    }

    assert_eq!(visited, vec![0, 1, 2, 3, 4]);
    assert!(session.is_done());
    let progress = session.progress();
    assert_eq!((progress.page, progress.last_page), (4, Some(4)));
}

#[test]
fn max_pages_is_write_once() {
    let mut session = session(0);
    visit(&mut session, 0);
    session.resolve_max_pages(3).unwrap();
    assert_eq!(
        session.resolve_max_pages(9),
        Err(SessionError::MaxPagesAlreadyResolved(3))
    );
    assert_eq!(session.max_pages(), MaxPages::Known(3));
}

#[test]
fn single_page_result_finishes_immediately() {
    let mut session = session(1);
    visit(&mut session, 1);
    let max = session.resolve_max_pages(0).unwrap();
    assert_eq!(max, 2);
    assert!(session.is_done());
    assert_eq!(session.remaining_pages(), 2..2);
}

#[test]
fn out_of_order_fetch_is_rejected() {
    let mut session = session(0);
    visit(&mut session, 0);
    session.resolve_max_pages(4).unwrap();
    assert_eq!(
        session.start_fetch(2),
        Err(SessionError::OutOfOrder {
            expected: Some(1),
            got: 2
        })
    );
}

#[test]
fn failure_is_recorded() {
    let mut session = session(0);
    session.start_fetch(0).unwrap();
    session.fail(0);
    assert_eq!(session.state(), SessionState::Failed(0));
    assert!(!session.is_done());
}
