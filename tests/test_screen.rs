mod common;

use common::{seeded_rng, BOARD};
use num_type::clock::{Clock, ManualClock};
use num_type::config::GameConfig;
use num_type::entities::TargetType;
use num_type::factory::{Screen, Tick};
use num_type::screen::{GameStatus, MainScreen};
use num_type::target::TargetId;
use rand::rngs::StdRng;

fn start(config: &GameConfig, rng: &mut StdRng) -> MainScreen {
    MainScreen::new(config, BOARD, &mut Tick::new(0, rng))
}

fn type_in(screen: &mut MainScreen, value: &str) {
    for digit in value.chars() {
        screen.collector.collect(digit);
    }
}

fn ids(screen: &MainScreen) -> Vec<TargetId> {
    screen.targets().iter().map(|target| target.id()).collect()
}

fn quiet() -> GameConfig {
    GameConfig {
        starting_targets: 0,
        ..GameConfig::default()
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

#[test]
fn game_starts_with_four_timed_targets() {
    let mut rng = seeded_rng();
    let screen = start(&GameConfig::default(), &mut rng);

    assert_eq!(screen.hp(), 10);
    assert_eq!(screen.score(), 0);
    assert!(screen.is_playing());
    assert_eq!(screen.targets().len(), 4);
    assert_eq!(screen.updatable(), ids(&screen).as_slice());
    for (position, target) in screen.targets().iter().enumerate() {
        assert_eq!(target.target_type(), TargetType::Timed);
        assert_eq!(target.value().len(), 2);
        assert_eq!(target.attributes().position, Some(position));
        assert!(target.exists(0));
    }
}

// ── Shooting ──────────────────────────────────────────────────────────────────

#[test]
fn hit_rewards_and_replaces_the_target() {
    let mut rng = seeded_rng();
    let mut screen = start(&GameConfig::default(), &mut rng);
    let shot = screen.targets()[0].id();
    let value = screen.targets()[0].value().to_string();

    type_in(&mut screen, &value);
    screen.shoot(&mut Tick::new(100, &mut rng)).unwrap();

    assert!(screen.score() > 0);
    assert_eq!(screen.score(), screen.score_keeper.points_gained);
    assert_eq!(screen.score_keeper.targets_shot, 1);
    assert!(screen.collector.is_empty());
    assert!(screen.targets()[0].is_garbage());

    let child = screen
        .targets()
        .iter()
        .find(|t| t.target_type() == TargetType::Timed && !t.is_garbage() && !t.exists(100))
        .unwrap();
    assert_eq!(child.attributes().time_to_be_shown, Some(400));
    assert_eq!(child.attributes().position, Some(0));
    assert!(child.exists(400));

    let animation = screen
        .targets()
        .iter()
        .find(|t| t.target_type() == TargetType::DyingAnimation)
        .unwrap();
    assert_eq!(animation.value(), format!("{:+}", screen.score()));
    assert_eq!(animation.attributes().position, Some(0));
    assert_eq!(screen.targets().len(), 6);
    assert_eq!(screen.updatable().len(), 6);

    screen.update(&mut Tick::new(100, &mut rng)).unwrap();
    assert_eq!(screen.targets().len(), 5);
    assert!(!screen.updatable().contains(&shot));
    assert_eq!(screen.updatable(), ids(&screen).as_slice());
}

#[test]
fn dying_animation_is_swept_after_it_plays() {
    let mut rng = seeded_rng();
    let mut screen = start(&GameConfig::default(), &mut rng);
    let clock = ManualClock::new(100);
    let value = screen.targets()[1].value().to_string();

    type_in(&mut screen, &value);
    screen.shoot(&mut Tick::new(clock.now(), &mut rng)).unwrap();
    screen.update(&mut Tick::new(clock.now(), &mut rng)).unwrap();

    clock.advance(299);
    screen.update(&mut Tick::new(clock.now(), &mut rng)).unwrap();
    assert!(screen
        .targets()
        .iter()
        .any(|t| t.target_type() == TargetType::DyingAnimation));

    clock.advance(1);
    screen.update(&mut Tick::new(clock.now(), &mut rng)).unwrap();
    assert!(screen
        .targets()
        .iter()
        .all(|t| t.target_type() == TargetType::Timed));
    assert_eq!(screen.targets().len(), 4);
    assert_eq!(screen.updatable().len(), 4);
}

#[test]
fn miss_costs_a_heart() {
    let mut rng = seeded_rng();
    let mut screen = start(&GameConfig::default(), &mut rng);

    type_in(&mut screen, "0");
    screen.shoot(&mut Tick::new(10, &mut rng)).unwrap();

    assert_eq!(screen.hp(), 9);
    assert_eq!(screen.score_keeper.misses, 1);
    assert_eq!(screen.score(), 0);
    assert!(screen.is_playing());
    assert!(screen.targets().iter().all(|t| !t.is_garbage()));
}

#[test]
fn empty_shot_is_ignored() {
    let mut rng = seeded_rng();
    let mut screen = start(&GameConfig::default(), &mut rng);
    screen.shoot(&mut Tick::new(10, &mut rng)).unwrap();
    assert_eq!(screen.hp(), 10);
    assert_eq!(screen.score_keeper.misses, 0);
    assert_eq!(screen.score_keeper.targets_shot, 0);
}

#[test]
fn pending_target_cannot_be_shot() {
    let mut rng = seeded_rng();
    let mut screen = start(&GameConfig::default(), &mut rng);
    let value = screen.targets()[0].value().to_string();
    type_in(&mut screen, &value);
    screen.shoot(&mut Tick::new(100, &mut rng)).unwrap();
    screen.update(&mut Tick::new(100, &mut rng)).unwrap();

    let child = screen
        .targets()
        .iter()
        .find(|t| !t.exists(100) && t.target_type() == TargetType::Timed)
        .map(|t| t.id())
        .unwrap();
    screen
        .factory_mut()
        .get_mut(child)
        .unwrap()
        .attributes_mut()
        .value = Some("7".to_string());

    type_in(&mut screen, "7");
    screen.shoot(&mut Tick::new(200, &mut rng)).unwrap();
    assert_eq!(screen.score_keeper.misses, 1);
    assert_eq!(screen.hp(), 9);

    type_in(&mut screen, "7");
    screen.shoot(&mut Tick::new(400, &mut rng)).unwrap();
    assert_eq!(screen.score_keeper.targets_shot, 2);
    assert!(screen.factory().get(child).unwrap().is_garbage());
}

#[test]
fn oversized_starting_strength_does_not_crash_the_update() {
    let mut rng = seeded_rng();
    let config = GameConfig {
        starting_strength: 1e19,
        starting_targets: 1,
        ..GameConfig::default()
    };
    let mut screen = start(&config, &mut rng);
    assert_eq!(screen.targets()[0].attributes().time_to_expire, Some(u64::MAX));

    screen.update(&mut Tick::new(10, &mut rng)).unwrap();
    assert!(screen.is_playing());
    assert_eq!(screen.targets().len(), 1);
    assert_eq!(
        screen.targets()[0].calculate_time_left(10),
        Some(u64::MAX - 10)
    );
}

// ── Game end ──────────────────────────────────────────────────────────────────

#[test]
fn expired_targets_lose_the_game() {
    let mut rng = seeded_rng();
    let mut screen = start(&GameConfig::default(), &mut rng);

    screen.update(&mut Tick::new(5_549, &mut rng)).unwrap();
    assert!(screen.is_playing());
    assert_eq!(screen.score(), 0);

    screen.update(&mut Tick::new(5_550, &mut rng)).unwrap();
    assert_eq!(screen.status(), GameStatus::Finished { victory: false });
    assert!(screen.score() < 0);
    assert!(screen.score_keeper.points_lost >= 21);
    assert!(screen.score_keeper.targets_timed_out >= 1);
    assert!(!screen.score_keeper.victory);
}

#[test]
fn reaching_the_victory_points_wins() {
    let mut rng = seeded_rng();
    let config = GameConfig {
        victory_points: 1,
        ..GameConfig::default()
    };
    let mut screen = start(&config, &mut rng);
    let value = screen.targets()[2].value().to_string();

    type_in(&mut screen, &value);
    screen.shoot(&mut Tick::new(1_000, &mut rng)).unwrap();

    assert_eq!(screen.status(), GameStatus::Finished { victory: true });
    assert!(screen.score_keeper.victory);
    assert_eq!(screen.score_keeper.accuracy, 100);
    assert_eq!(screen.score_keeper.effectiveness, 100);
    assert_eq!(screen.score_keeper.time_elapsed, "1 second ");
}

#[test]
fn last_heart_lost_is_defeat() {
    let mut rng = seeded_rng();
    let config = GameConfig {
        starting_hp: 1,
        ..GameConfig::default()
    };
    let mut screen = start(&config, &mut rng);

    type_in(&mut screen, "0");
    screen.shoot(&mut Tick::new(10, &mut rng)).unwrap();

    assert_eq!(screen.hp(), 0);
    assert_eq!(screen.status(), GameStatus::Finished { victory: false });
    assert_eq!(screen.score_keeper.accuracy, 0);
}

#[test]
fn escape_clears_input_then_surrenders() {
    let mut rng = seeded_rng();
    let mut screen = start(&GameConfig::default(), &mut rng);

    type_in(&mut screen, "12");
    screen.clear_or_surrender(50);
    assert!(screen.collector.is_empty());
    assert!(screen.is_playing());

    screen.clear_or_surrender(60);
    assert_eq!(screen.status(), GameStatus::Finished { victory: false });
}

#[test]
fn finished_game_ignores_input_and_time() {
    let mut rng = seeded_rng();
    let mut screen = start(&GameConfig::default(), &mut rng);
    screen.clear_or_surrender(0);
    let before = ids(&screen);

    type_in(&mut screen, "0");
    screen.shoot(&mut Tick::new(10, &mut rng)).unwrap();
    assert_eq!(screen.hp(), 10);
    assert_eq!(screen.score_keeper.misses, 0);

    screen.update(&mut Tick::new(60_000, &mut rng)).unwrap();
    assert_eq!(ids(&screen), before);
    assert_eq!(screen.score(), 0);
}

// ── Score ─────────────────────────────────────────────────────────────────────

#[test]
fn multiplier_scales_the_whole_score() {
    let mut rng = seeded_rng();
    let mut screen = start(&quiet(), &mut rng);
    assert!(screen.targets().is_empty());

    screen.score_change(10, 1.0, 0);
    screen.score_change(5, 2.0, 0);
    assert_eq!(screen.score(), 30);
    assert_eq!(screen.score_keeper.points_gained, 15);
    assert!(screen.is_playing());
}

#[test]
fn negative_changes_count_as_points_lost() {
    let mut rng = seeded_rng();
    let mut screen = start(&quiet(), &mut rng);

    screen.score_change(10, 1.0, 0);
    screen.score_change(-4, 1.0, 0);
    assert_eq!(screen.score(), 6);
    assert_eq!(screen.score_keeper.points_lost, 4);
    assert!(screen.is_playing());

    screen.score_change(-7, 1.0, 0);
    assert_eq!(screen.score(), -1);
    assert_eq!(screen.status(), GameStatus::Finished { victory: false });
    assert_eq!(screen.score_keeper.final_score(), -1);
}
