//! The main game screen: score, HP and the concrete behaviour behind every
//! `Action`.
//!
//! All state changes happen through `&mut self` between frames or inside a
//! trigger chain; the driver owns the clock, the RNG and the terminal.

use crate::color::{Color, Palette};
use crate::config::GameConfig;
use crate::entities::{Action, TargetType, Trigger, ANIMATION_LENGTH};
use crate::error::{GameError, Result};
use crate::factory::{ActionFn, ActionTable, AfterAdder, Board, Screen, TargetFactory, Tick};
use crate::target::{Target, TargetBlueprint, TargetId};

// ── Input collector ───────────────────────────────────────────────────────────

/// Digits typed since the last shot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Collector {
    collected: Vec<char>,
}

impl Collector {
    pub fn collect(&mut self, digit: char) {
        self.collected.push(digit);
    }

    pub fn backspace(&mut self) {
        self.collected.pop();
    }

    /// Returns everything collected so far and clears it.
    pub fn pop(&mut self) -> String {
        self.collected.drain(..).collect()
    }

    pub fn peek(&self) -> String {
        self.collected.iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.collected.is_empty()
    }
}

// ── Score keeping ─────────────────────────────────────────────────────────────

/// Performance statistics for one run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScoreKeeper {
    pub points_gained: i64,
    pub points_lost: i64,
    pub targets_shot: u32,
    pub targets_timed_out: u32,
    pub misses: u32,
    pub time_began: u64,
    pub victory: bool,
    pub accuracy: u32,
    pub effectiveness: u32,
    pub time_elapsed: String,
}

impl ScoreKeeper {
    pub fn begin(&mut self, now: u64) {
        self.time_began = now;
    }

    pub fn finish(&mut self, victory: bool, now: u64) {
        self.victory = victory;
        self.time_elapsed = elapsed_text(now.saturating_sub(self.time_began));
        if self.targets_shot > 0 {
            let shot = self.targets_shot as u64;
            self.accuracy = (100 * shot / (shot + self.misses as u64)) as u32;
            self.effectiveness = (100 * shot / (shot + self.targets_timed_out as u64)) as u32;
        } else {
            self.accuracy = 0;
            self.effectiveness = 0;
        }
    }

    pub fn final_score(&self) -> i64 {
        self.points_gained.saturating_sub(self.points_lost)
    }
}

/// `"2 minutes 5 seconds "`, `"1 second "`; empty under one second.
fn elapsed_text(elapsed_ms: u64) -> String {
    let total_seconds = elapsed_ms / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    let mut text = String::new();
    if minutes > 0 {
        text += &format!("{} minute{} ", minutes, if minutes > 1 { "s" } else { "" });
    }
    if seconds > 0 {
        text += &format!("{} second{} ", seconds, if seconds > 1 { "s" } else { "" });
    }
    text
}

// ── Main screen ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Finished { victory: bool },
}

pub struct MainScreen {
    factory: TargetFactory<MainScreen>,
    /// Targets updated every tick, in admission order.
    updatable: Vec<TargetId>,
    pub collector: Collector,
    pub score_keeper: ScoreKeeper,
    score: i64,
    hp: u32,
    status: GameStatus,
    victory_points: i64,
}

impl Screen for MainScreen {
    fn factory(&self) -> &TargetFactory<Self> {
        &self.factory
    }

    fn factory_mut(&mut self) -> &mut TargetFactory<Self> {
        &mut self.factory
    }
}

impl MainScreen {
    pub fn action_table() -> ActionTable<MainScreen> {
        ActionTable::new(&[
            (Action::Reward, Self::reward as ActionFn<Self>),
            (Action::Penalty, Self::penalty as ActionFn<Self>),
            (Action::Spawn, Self::spawn as ActionFn<Self>),
            (Action::DespawnGood, Self::despawn_good as ActionFn<Self>),
            (Action::DespawnBad, Self::despawn_bad as ActionFn<Self>),
            (Action::DespawnNonentity, Self::despawn_nonentity as ActionFn<Self>),
        ])
    }

    /// Sets up a fresh game with the configured opening targets.
    pub fn new(config: &GameConfig, board: Board, tick: &mut Tick<'_>) -> Self {
        let mut screen = MainScreen {
            factory: TargetFactory::new(
                Self::action_table(),
                Self::after_adder as AfterAdder<Self>,
                board,
            ),
            updatable: Vec::new(),
            collector: Collector::default(),
            score_keeper: ScoreKeeper::default(),
            score: 0,
            hp: config.starting_hp,
            status: GameStatus::Playing,
            victory_points: config.victory_points,
        };
        for _ in 0..config.starting_targets {
            let mut blueprint = TargetBlueprint::of_type(TargetType::Timed);
            blueprint.attributes.strength = Some(config.starting_strength);
            screen.create_target(tick, blueprint);
        }
        screen.score_keeper.begin(tick.now);
        tracing::info!(
            hp = screen.hp,
            targets = config.starting_targets,
            "game started"
        );
        screen
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    pub fn targets(&self) -> &[Target] {
        self.factory.targets()
    }

    pub fn updatable(&self) -> &[TargetId] {
        &self.updatable
    }

    // ── Per-tick ─────────────────────────────────────────────────────────────

    /// Runs every admitted target's timer, then removes what became garbage.
    pub fn update(&mut self, tick: &mut Tick<'_>) -> Result<()> {
        if !self.is_playing() {
            return Ok(());
        }
        let queue = self.updatable.clone();
        for id in queue {
            self.update_target(tick, id)?;
        }
        self.collect_garbage();
        Ok(())
    }

    fn collect_garbage(&mut self) {
        let garbage = self.factory.sweep();
        if !garbage.is_empty() {
            self.updatable.retain(|id| !garbage.contains(id));
        }
    }

    fn after_adder(&mut self, id: TargetId) {
        self.updatable.push(id);
    }

    // ── Player input ─────────────────────────────────────────────────────────

    /// Fires at the first live target matching the typed value, or costs a
    /// heart on a miss. Empty input is ignored.
    pub fn shoot(&mut self, tick: &mut Tick<'_>) -> Result<()> {
        if !self.is_playing() {
            return Ok(());
        }
        let value = self.collector.pop();
        if value.is_empty() {
            return Ok(());
        }
        match self.factory.find_match(&value, tick.now) {
            Some(id) => {
                self.score_keeper.targets_shot += 1;
                self.fire_trigger(tick, id, Trigger::ShotAt)?;
            }
            None => {
                self.score_keeper.misses += 1;
                self.lose_hp(tick.now);
            }
        }
        Ok(())
    }

    /// Escape: clears pending input, or gives up when there is none.
    pub fn clear_or_surrender(&mut self, now: u64) {
        if self.collector.is_empty() {
            self.finish(false, now);
        } else {
            self.collector.pop();
        }
    }

    fn lose_hp(&mut self, now: u64) {
        self.hp = self.hp.saturating_sub(1);
        self.check_end(now);
    }

    /// Applies `value`, then scales the whole score by `multiplier`.
    pub fn score_change(&mut self, value: i64, multiplier: f64, now: u64) {
        if value > 0 {
            self.score_keeper.points_gained = self.score_keeper.points_gained.saturating_add(value);
        } else {
            self.score_keeper.points_lost = self.score_keeper.points_lost.saturating_sub(value);
        }
        self.score = self.score.saturating_add(value);
        if multiplier != 1.0 {
            self.score = (self.score as f64 * multiplier) as i64;
        }
        self.check_end(now);
    }

    fn check_end(&mut self, now: u64) {
        if !self.is_playing() {
            return;
        }
        if self.hp == 0 || self.score < 0 {
            self.finish(false, now);
        } else if self.score >= self.victory_points {
            self.finish(true, now);
        }
    }

    fn finish(&mut self, victory: bool, now: u64) {
        if !self.is_playing() {
            return;
        }
        self.status = GameStatus::Finished { victory };
        self.score_keeper.finish(victory, now);
        tracing::info!(
            victory,
            score = self.score,
            shot = self.score_keeper.targets_shot,
            timed_out = self.score_keeper.targets_timed_out,
            misses = self.score_keeper.misses,
            "game finished"
        );
    }

    // ── Actions ──────────────────────────────────────────────────────────────

    fn requestor(&mut self, id: TargetId) -> Result<&mut Target> {
        self.factory.get_mut(id).ok_or(GameError::UnknownTarget(id))
    }

    fn reward(&mut self, tick: &mut Tick<'_>, requestor: TargetId) -> Result<()> {
        let (value, multiplier) = self.requestor(requestor)?.calculate_reward(tick.now)?;
        self.score_change(value, multiplier, tick.now);
        Ok(())
    }

    fn penalty(&mut self, tick: &mut Tick<'_>, requestor: TargetId) -> Result<()> {
        let (value, multiplier) = self.requestor(requestor)?.calculate_penalty(tick.now)?;
        self.score_change(value, multiplier, tick.now);
        Ok(())
    }

    /// Brings the requestor's successor onto the board after a short delay.
    fn spawn(&mut self, tick: &mut Tick<'_>, requestor: TargetId) -> Result<()> {
        let target = self.requestor(requestor)?;
        if target.is_garbage() {
            return Ok(());
        }
        let Some(spawn) = target.attributes().spawn_blueprint.as_deref() else {
            tracing::warn!(id = %requestor, "spawn requested without a spawn blueprint");
            return Ok(());
        };
        let mut blueprint = spawn.clone();
        blueprint.attributes.time_to_be_shown = Some(tick.now + ANIMATION_LENGTH);
        self.create_target(tick, blueprint);
        Ok(())
    }

    fn despawn_good(&mut self, tick: &mut Tick<'_>, requestor: TargetId) -> Result<()> {
        let target = self.requestor(requestor)?;
        target.mark_garbage();
        let label = target
            .attributes()
            .reward
            .as_ref()
            .map(|reward| reward.display.clone())
            .unwrap_or_default();
        let colors = Palette {
            frame: Color::BLACK,
            bg: target.colors().text,
            text: Color::BLACK,
        };
        let position = target.attributes().position;
        self.create_target(tick, dying_animation(label, colors, position));
        Ok(())
    }

    fn despawn_bad(&mut self, tick: &mut Tick<'_>, requestor: TargetId) -> Result<()> {
        self.score_keeper.targets_timed_out += 1;
        let target = self.requestor(requestor)?;
        target.mark_garbage();
        let label = target
            .attributes()
            .penalty
            .as_ref()
            .map(|penalty| penalty.display.clone())
            .unwrap_or_default();
        let colors = Palette {
            frame: Color::RED,
            bg: Color::DARK_RED,
            text: Color::RED,
        };
        let position = target.attributes().position;
        self.create_target(tick, dying_animation(label, colors, position));
        Ok(())
    }

    fn despawn_nonentity(&mut self, _tick: &mut Tick<'_>, requestor: TargetId) -> Result<()> {
        self.requestor(requestor)?.mark_garbage();
        Ok(())
    }
}

fn dying_animation(label: String, colors: Palette, position: Option<usize>) -> TargetBlueprint {
    let mut blueprint = TargetBlueprint::of_type(TargetType::DyingAnimation);
    let attr = &mut blueprint.attributes;
    attr.value = Some(label);
    attr.colors = Some(colors);
    attr.position = position;
    blueprint
}
