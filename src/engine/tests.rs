use proptest::prelude::*;

use super::*;

use crate::model::strategies::arb_step;
use crate::model::{Position, Selection, Step, StepKind, TourDefinition, ViewContext};
use crate::publish::RecordingSink;

fn repo() -> RepositoryIdentity {
    RepositoryIdentity::new("github.com/acme/widgets").unwrap()
}

fn repo_tour(title: &str, steps: Vec<Step>) -> RepoTour {
    RepoTour {
        path: format!(".tours/{}.tour", title.to_lowercase()),
        name: title.to_lowercase(),
        tour: TourDefinition {
            title: title.to_string(),
            description: None,
            steps,
        },
    }
}

fn content(description: &str) -> Step {
    Step {
        description: description.into(),
        ..Step::default()
    }
}

fn file(description: &str, path: &str) -> Step {
    Step {
        file: Some(path.into()),
        ..content(description)
    }
}

fn line(description: &str, path: &str, line: u32) -> Step {
    Step {
        line: Some(line),
        ..file(description, path)
    }
}

fn directory(description: &str, path: &str) -> Step {
    Step {
        directory: Some(path.into()),
        ..content(description)
    }
}

fn engine_with(tours: Vec<RepoTour>) -> Engine<RecordingSink> {
    let mut engine = Engine::new(RecordingSink::new());
    let request = engine.begin_discovery(repo());
    engine.discovery_completed(tours, request);
    engine
}

fn context(engine: &Engine<RecordingSink>) -> &ViewContext {
    engine.sink().latest_context().unwrap()
}

fn publications(engine: &Engine<RecordingSink>) -> usize {
    engine.sink().contexts.len() + engine.sink().panel_bodies.len()
}

fn assert_neighbour_flags_exclusive(context: &ViewContext) {
    assert!(!(context.show_prev_step_same_location() && context.show_prev_step_new_location()));
    assert!(!(context.show_next_step_same_location() && context.show_next_step_new_location()));
    if !context.show_prev_step_new_location() {
        assert!(context.prev_step_address().is_empty());
    }
    if !context.show_next_step_new_location() {
        assert!(context.next_step_address().is_empty());
    }
}

fn scenario_tour() -> RepoTour {
    repo_tour("T", vec![file("a", "x.md"), line("b", "x.md", 5)])
}

// ── Tours and steps ──

#[test]
fn walks_file_then_line_tour_to_completion() {
    let mut engine = engine_with(vec![scenario_tour()]);

    engine.start_tour(0);
    assert_eq!(engine.state(), TourState::Touring { tour: 0, step: 0 });
    let ctx = context(&engine);
    assert!(!ctx.show_prev_step_same_location() && !ctx.show_prev_step_new_location());
    assert!(ctx.show_next_step_new_location());
    assert!(!ctx.show_next_step_same_location());
    assert_eq!(
        ctx.next_step_address(),
        "/github.com/acme/widgets/-/blob/x.md#L5&tab=codeTour"
    );
    assert!(!ctx.show_complete_tour);
    assert_neighbour_flags_exclusive(ctx);

    engine.advance(Direction::Next);
    assert_eq!(engine.state(), TourState::Touring { tour: 0, step: 1 });
    let ctx = context(&engine);
    assert!(ctx.show_prev_step_new_location());
    assert_eq!(
        ctx.prev_step_address(),
        "/github.com/acme/widgets/-/blob/x.md&tab=codeTour"
    );
    assert!(!ctx.show_next_step_same_location() && !ctx.show_next_step_new_location());
    assert!(ctx.show_complete_tour);

    engine.advance(Direction::Next);
    assert_eq!(engine.state(), TourState::Browsing);
    let ctx = context(&engine);
    assert!(ctx.tour_completed);
    assert!(ctx.active_tour.is_none() && ctx.active_step.is_none());
    assert!(!ctx.show_prev_step_new_location() && !ctx.show_next_step_new_location());
}

#[test]
fn start_publishes_first_step_body() {
    let mut engine = engine_with(vec![scenario_tour()]);
    engine.start_tour(0);

    let body = engine.sink().latest_panel_body().unwrap();
    assert!(body.starts_with("## T\n\n**Step 1 of 2**"));
    assert!(body.ends_with('a'));

    let ctx = context(&engine);
    assert_eq!(ctx.active_tour, Some(0));
    assert_eq!(ctx.active_tour_title.as_deref(), Some("T"));
    assert_eq!(ctx.active_step, Some(0));
    assert_eq!(ctx.step_count, Some(2));
}

#[test]
fn previous_of_first_step_is_noop() {
    let mut engine = engine_with(vec![scenario_tour()]);
    engine.start_tour(0);
    let before = publications(&engine);

    engine.advance(Direction::Previous);

    assert_eq!(engine.state(), TourState::Touring { tour: 0, step: 0 });
    assert_eq!(publications(&engine), before);
}

#[test]
fn previous_returns_to_earlier_step() {
    let mut engine = engine_with(vec![scenario_tour()]);
    engine.start_tour(0);
    engine.advance(Direction::Next);
    engine.advance(Direction::Previous);

    assert_eq!(engine.state(), TourState::Touring { tour: 0, step: 0 });
    assert!(!context(&engine).show_prev_step_new_location());
}

#[test]
fn commands_outside_a_tour_are_ignored() {
    let mut engine = engine_with(vec![scenario_tour()]);
    let before = publications(&engine);

    engine.advance(Direction::Next);
    engine.advance(Direction::Previous);
    engine.complete_tour();
    engine.observed_location_changed(ObservedLocation::file("x.md"));

    assert_eq!(engine.state(), TourState::Browsing);
    assert_eq!(publications(&engine), before);
}

#[test]
fn start_with_invalid_index_is_noop() {
    let mut engine = engine_with(vec![scenario_tour()]);
    engine.start_tour(3);
    assert_eq!(engine.state(), TourState::Browsing);
}

#[test]
fn empty_tour_completes_immediately() {
    let mut engine = engine_with(vec![repo_tour("Empty", vec![])]);
    engine.start_tour(0);

    assert_eq!(engine.state(), TourState::Browsing);
    assert!(context(&engine).tour_completed);
}

#[test]
fn explicit_completion_clears_tour_fields() {
    let mut engine = engine_with(vec![scenario_tour()]);
    engine.start_tour(0);
    engine.complete_tour();

    assert_eq!(engine.state(), TourState::Browsing);
    let ctx = context(&engine);
    assert!(!ctx.is_touring());
    assert!(ctx.active_tour_title.is_none() && ctx.step_count.is_none());
    assert!(ctx.next_step_address().is_empty());
    assert!(ctx.workspace_has_one_tour);
    assert_eq!(engine.sink().latest_panel_body(), Some("## T\n\n2 steps"));
}

#[test]
fn content_neighbours_render_in_place() {
    let tour = repo_tour(
        "Mixed",
        vec![file("a", "src/lib.rs"), content("b"), file("c", "src/lib.rs")],
    );
    let mut engine = engine_with(vec![tour]);

    engine.start_tour(0);
    assert!(context(&engine).show_next_step_same_location());

    engine.advance(Direction::Next);
    let ctx = context(&engine);
    assert!(ctx.show_prev_step_new_location());
    assert!(ctx.show_next_step_new_location());
    assert_eq!(
        ctx.next_step_address(),
        "/github.com/acme/widgets/-/blob/src/lib.rs&tab=codeTour"
    );
}

#[test]
fn mid_line_selection_neighbour_links_with_column() {
    let selection = Step {
        file: Some("src/lib.rs".into()),
        selection: Some(Selection {
            start: Position {
                line: 3,
                character: 5,
            },
            end: Position {
                line: 3,
                character: 9,
            },
        }),
        ..content("sel")
    };
    assert_eq!(selection.kind(), StepKind::Selection);

    let mut engine = engine_with(vec![repo_tour(
        "Sel",
        vec![file("start", "README.md"), selection],
    )]);
    engine.start_tour(0);

    assert_eq!(
        context(&engine).next_step_address(),
        "/github.com/acme/widgets/-/blob/src/lib.rs#L3:5&tab=codeTour"
    );
}

// ── Tour selection ──

#[test]
fn two_tours_select_by_ordinal() {
    let mut engine = engine_with(vec![scenario_tour(), repo_tour("U", vec![content("u")])]);
    let ctx = context(&engine);
    assert!(ctx.workspace_has_multiple_tours);
    assert!(!ctx.workspace_has_one_tour);

    engine.select_tour(Some("2"));
    assert_eq!(engine.state(), TourState::Touring { tour: 1, step: 0 });

    let before = publications(&engine);
    engine.select_tour(Some("9"));
    assert_eq!(engine.state(), TourState::Touring { tour: 1, step: 0 });
    assert_eq!(publications(&engine), before);
}

#[test]
fn cancelled_or_garbled_selection_is_noop() {
    let mut engine = engine_with(vec![scenario_tour(), repo_tour("U", vec![content("u")])]);

    engine.select_tour(None);
    engine.select_tour(Some("first"));
    engine.select_tour(Some("0"));

    assert_eq!(engine.state(), TourState::Browsing);
}

#[test]
fn selection_needs_more_than_one_tour() {
    let mut engine = engine_with(vec![scenario_tour()]);
    engine.select_tour(Some("1"));
    assert_eq!(engine.state(), TourState::Browsing);
}

// ── Discovery ──

#[test]
fn engine_starts_idle() {
    let engine = Engine::new(RecordingSink::new());
    assert_eq!(engine.state(), TourState::Idle);
    assert!(engine.sink().contexts.is_empty());
}

#[test]
fn empty_discovery_settles_idle() {
    let engine = engine_with(vec![]);
    assert_eq!(engine.state(), TourState::Idle);
    assert!(!context(&engine).workspace_has_tours);
    assert_eq!(
        engine.sink().latest_panel_body(),
        Some("No code tours found in this repository.")
    );
}

#[test]
fn stale_discovery_results_are_dropped() {
    let mut engine = Engine::new(RecordingSink::new());
    let first = engine.begin_discovery(repo());
    let second = engine.begin_discovery(RepositoryIdentity::new("github.com/acme/other").unwrap());

    engine.discovery_completed(vec![scenario_tour()], first);
    assert_eq!(engine.state(), TourState::Idle);
    assert_eq!(publications(&engine), 0);

    engine.discovery_completed(vec![repo_tour("Other", vec![file("o", "o.rs")])], second);
    assert_eq!(engine.state(), TourState::Browsing);
    assert_eq!(engine.registry().get(0).unwrap().tour.title, "Other");
    assert_eq!(
        engine.registry().repository().unwrap().as_str(),
        "github.com/acme/other"
    );

    let before = publications(&engine);
    engine.discovery_completed(vec![], first);
    engine.discovery_completed(vec![], second);
    assert_eq!(engine.state(), TourState::Browsing);
    assert_eq!(publications(&engine), before);
}

#[test]
fn stale_discovery_does_not_interrupt_a_tour() {
    let mut engine = Engine::new(RecordingSink::new());
    let stale = engine.begin_discovery(repo());
    let fresh = engine.begin_discovery(repo());
    engine.discovery_completed(vec![scenario_tour()], fresh);
    engine.start_tour(0);

    engine.discovery_completed(vec![], stale);

    assert_eq!(engine.state(), TourState::Touring { tour: 0, step: 0 });
}

#[test]
fn rediscovery_ends_active_tour() {
    let mut engine = engine_with(vec![scenario_tour()]);
    engine.start_tour(0);

    let request = engine.begin_discovery(repo());
    engine.discovery_completed(vec![scenario_tour(), scenario_tour()], request);

    assert_eq!(engine.state(), TourState::Browsing);
    let ctx = context(&engine);
    assert!(!ctx.is_touring());
    assert!(!ctx.tour_completed);
    assert!(ctx.workspace_has_multiple_tours);
}

// ── Observed locations ──

fn observed_tour() -> RepoTour {
    repo_tour(
        "Observed",
        vec![
            file("a", "a.rs"),
            line("b", "a.rs", 5),
            directory("c", "src"),
        ],
    )
}

#[test]
fn following_next_link_advances() {
    let mut engine = engine_with(vec![observed_tour()]);
    engine.start_tour(0);

    engine.observed_location_changed(ObservedLocation::cursor("a.rs", 5, 0));
    assert_eq!(engine.state(), TourState::Touring { tour: 0, step: 1 });

    engine.observed_location_changed(ObservedLocation::directory("src"));
    assert_eq!(engine.state(), TourState::Touring { tour: 0, step: 2 });
}

#[test]
fn following_previous_link_retreats() {
    let mut engine = engine_with(vec![observed_tour()]);
    engine.start_tour(0);
    engine.advance(Direction::Next);
    engine.advance(Direction::Next);

    engine.observed_location_changed(ObservedLocation::cursor("a.rs", 5, 0));
    assert_eq!(engine.state(), TourState::Touring { tour: 0, step: 1 });
}

#[test]
fn unrelated_locations_are_ignored() {
    let mut engine = engine_with(vec![observed_tour()]);
    engine.start_tour(0);
    let before = publications(&engine);

    engine.observed_location_changed(ObservedLocation::cursor("a.rs", 9, 0));
    engine.observed_location_changed(ObservedLocation::file("b.rs"));
    engine.observed_location_changed(ObservedLocation::directory("src"));

    assert_eq!(engine.state(), TourState::Touring { tour: 0, step: 0 });
    assert_eq!(publications(&engine), before);
}

#[test]
fn followed_address_matches_target_step() {
    let mut engine = engine_with(vec![observed_tour()]);
    engine.start_tour(0);

    let address = context(&engine).next_step_address().to_string();
    let location = crate::address::parse_address(&address, &repo()).unwrap();
    engine.observed_location_changed(location);

    assert_eq!(engine.state(), TourState::Touring { tour: 0, step: 1 });
}

// ── Atomicity ──

#[test]
fn failed_transition_commits_nothing() {
    let mut engine = Engine::new(RecordingSink::new());
    engine.registry = TourRegistry::new(None, vec![scenario_tour()]);
    engine.state = TourState::Browsing;

    engine.start_tour(0);

    assert_eq!(engine.state(), TourState::Browsing);
    assert_eq!(publications(&engine), 0);
}

proptest! {
    #[test]
    fn published_contexts_stay_consistent(steps in proptest::collection::vec(arb_step(), 0..6)) {
        let count = steps.len();
        let mut engine = engine_with(vec![repo_tour("P", steps)]);

        engine.start_tour(0);
        if count == 0 {
            prop_assert_eq!(engine.state(), TourState::Browsing);
        } else {
            let ctx = context(&engine);
            prop_assert!(!ctx.show_prev_step_same_location() && !ctx.show_prev_step_new_location());
        }

        for expected in 1..=count {
            let ctx = context(&engine).clone();
            assert_neighbour_flags_exclusive(&ctx);
            let no_next = !ctx.show_next_step_same_location() && !ctx.show_next_step_new_location();
            prop_assert_eq!(ctx.show_complete_tour, no_next);

            engine.advance(Direction::Next);
            if expected < count {
                prop_assert_eq!(engine.state(), TourState::Touring { tour: 0, step: expected });
            }
        }

        prop_assert_eq!(engine.state(), TourState::Browsing);
        prop_assert!(context(&engine).tour_completed);
    }
}
