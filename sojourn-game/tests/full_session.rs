//! End-to-end session runs: whole games played through the orchestrator
//! against the scripted generator.

use std::sync::Arc;
use std::time::Duration;

use sojourn_game::{
    ActionId, Archetype, Country, Difficulty, Ending, EventPolicy, GamePhase, GameSession,
    OutcomeKind, Persona, ResultSummary, ScriptedGenerator, TurnOutcome, WeekOutcome,
};

fn persona(archetype: Archetype, country: Country) -> Persona {
    Persona {
        player_name: "Rin".to_string(),
        difficulty: Difficulty::Undergraduate,
        country,
        archetype,
    }
}

fn session(archetype: Archetype, policy: EventPolicy, seed: u64) -> GameSession {
    GameSession::start(
        persona(archetype, Country::Canada),
        Arc::new(ScriptedGenerator::new()),
        seed,
    )
    .with_pacing(Duration::ZERO)
    .with_event_policy(policy)
}

async fn play_to_end(session: &mut GameSession, action: ActionId) -> Ending {
    for _ in 0..200 {
        match session.perform_action(action).await {
            TurnOutcome::Advanced(WeekOutcome::Ended(ending)) => return ending,
            TurnOutcome::Advanced(WeekOutcome::Continuing) => {}
            TurnOutcome::EventRaised { .. } => {
                if let Ok(WeekOutcome::Ended(ending)) = session.resolve_event(0).await {
                    return ending;
                }
            }
            TurnOutcome::Rejected => panic!("turn loop rejected a sequential action"),
        }
    }
    panic!("game never ended within the safety bound");
}

#[tokio::test]
async fn grinding_rest_reaches_the_completion_ending() {
    // Rest keeps stamina and mood topped up, so the run goes the distance.
    let mut session = session(Archetype::HardWorker, EventPolicy::Never, 21);
    let ending = play_to_end(&mut session, ActionId::Rest).await;
    assert_eq!(ending, Ending::Completed);
    assert_eq!(session.state().week, 51);
    assert!(session.state().ending_text.is_some());

    let summary = ResultSummary::from_state(session.state()).unwrap();
    assert_eq!(summary.outcome, OutcomeKind::Completed);
    assert_eq!(summary.weeks_survived, 50);
}

#[tokio::test]
async fn studying_nonstop_burns_out() {
    // Study drains stamina and mood with nothing coming back.
    let mut session = session(Archetype::Nerd, EventPolicy::Never, 4);
    let ending = play_to_end(&mut session, ActionId::Study).await;
    assert!(matches!(ending, Ending::Burnout { .. }));
    assert_eq!(session.state().phase, GamePhase::Ending);
    let summary = ResultSummary::from_state(session.state()).unwrap();
    assert!(!summary.outcome.is_success());
}

#[tokio::test]
async fn rich_kid_spending_spree_hits_the_debt_floor() {
    // The rich kid's rest costs money every week and nothing earns it back,
    // so the bankroll eventually crosses the debt floor.
    let mut session = GameSession::start(
        persona(Archetype::RichKid, Country::Usa),
        Arc::new(ScriptedGenerator::new()),
        9,
    )
    .with_pacing(Duration::ZERO)
    .with_event_policy(EventPolicy::Never);
    let ending = play_to_end(&mut session, ActionId::Rest).await;
    assert!(matches!(ending, Ending::Burnout { .. }));
    assert!(session.state().current_task.is_none());
}

#[tokio::test]
async fn event_heavy_run_still_terminates() {
    let mut session = session(Archetype::SocialButterfly, EventPolicy::Always, 17);
    let ending = play_to_end(&mut session, ActionId::Social).await;
    assert!(matches!(ending, Ending::Completed | Ending::Burnout { .. }));
    assert!(session.state().logs.len() <= 30);
}

#[tokio::test]
async fn logs_stay_capped_over_a_long_run() {
    let mut session = session(Archetype::HardWorker, EventPolicy::Never, 2);
    for _ in 0..45 {
        session.perform_action(ActionId::Rest).await;
    }
    assert!(session.state().logs.len() <= 30);
}

#[tokio::test]
async fn standard_policy_forces_an_event_every_fourth_week() {
    // Weeks 4, 8, 12... always trigger regardless of the random draw.
    let mut session = session(Archetype::HardWorker, EventPolicy::Standard, 1);
    let mut saw_forced_week = false;
    for _ in 0..12 {
        let week = session.state().week;
        match session.perform_action(ActionId::Rest).await {
            TurnOutcome::EventRaised { .. } => {
                if week % 4 == 0 {
                    saw_forced_week = true;
                }
                session.resolve_event(0).await.unwrap();
            }
            TurnOutcome::Advanced(_) => {
                assert_ne!(week % 4, 0, "week {week} must force an event");
            }
            TurnOutcome::Rejected => panic!("unexpected rejection"),
        }
    }
    assert!(saw_forced_week);
}

#[tokio::test]
async fn restart_mid_run_resets_everything() {
    let mut session = session(Archetype::Nerd, EventPolicy::Always, 30);
    session.perform_action(ActionId::Study).await;
    assert!(session.active_event().is_some());
    session.restart();
    assert!(session.active_event().is_none());
    assert!(!session.await_illustration().await);
    assert_eq!(session.state().week, 1);
    assert_eq!(session.state().phase, GamePhase::Playing);
    // A fresh run accepts actions immediately.
    assert_ne!(
        session.perform_action(ActionId::Study).await,
        TurnOutcome::Rejected
    );
}

#[tokio::test]
async fn same_seed_without_events_replays_identically() {
    let mut a = session(Archetype::HardWorker, EventPolicy::Never, 77);
    let mut b = session(Archetype::HardWorker, EventPolicy::Never, 77);
    for action in [
        ActionId::Work,
        ActionId::Study,
        ActionId::Social,
        ActionId::Language,
        ActionId::Rest,
    ] {
        a.perform_action(action).await;
        b.perform_action(action).await;
    }
    assert_eq!(a.state().stats, b.state().stats);
    assert_eq!(a.state().week, b.state().week);
    assert_eq!(a.state().current_task, b.state().current_task);
}
