//! Turning skeletal blueprints into live targets, and running their triggers.
//!
//! The controlling screen owns a `TargetFactory` and implements `Screen`.
//! Action callbacks are plain functions over the screen, so a running
//! chain may call back into `create_target` (spawn chains). New targets
//! are appended to the roster; nothing is removed until `sweep`.

use std::fmt;

use rand::{Rng, RngCore};

use crate::color::{Color, Palette};
use crate::entities::{
    Action, PenaltyStrategy, RewardStrategy, TargetType, Trigger, ValueStrategy,
    ANIMATION_LENGTH, MAX_STRENGTH, STRENGTH_INCREASE,
};
use crate::error::{GameError, Result};
use crate::target::{Positionable, Target, TargetBlueprint, TargetId};
use crate::value_changer::ValueChanger;

/// Minimum average channel value of a generated text colour.
const MINIMUM_AVERAGE: i32 = 125;

/// Longest numeral that still fits in a `u64`.
const MAX_NUMERAL_LENGTH: usize = 18;

// ── Per-pass context ──────────────────────────────────────────────────────────

/// One reading of the shared clock plus the random source, for one pass.
pub struct Tick<'a> {
    pub now: u64,
    pub rng: &'a mut dyn RngCore,
}

impl<'a> Tick<'a> {
    pub fn new(now: u64, rng: &'a mut dyn RngCore) -> Self {
        Tick { now, rng }
    }
}

// ── Board layout ──────────────────────────────────────────────────────────────

/// Where targets go. Row 0 is reserved for the input box; target
/// position `p` sits on row `p + 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Board {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub row_height: u16,
    pub spacer: u16,
}

impl Board {
    pub fn slot_origin(&self, position: usize) -> (u16, u16) {
        let rows = u16::try_from(position + 1).unwrap_or(u16::MAX);
        let add_y = (self.row_height + self.spacer).saturating_mul(rows);
        (self.x, self.y.saturating_add(add_y))
    }
}

// ── Action table ──────────────────────────────────────────────────────────────

/// Concrete behaviour behind an `Action`, invoked with the requesting target.
pub type ActionFn<S> = fn(&mut S, &mut Tick<'_>, TargetId) -> Result<()>;

/// Called once for every new target so the screen can admit it to its queues.
pub type AfterAdder<S> = fn(&mut S, TargetId);

/// One slot per `Action`. Slots left unbound fail with
/// `GameError::ActionNotImplemented` the moment they are invoked.
pub struct ActionTable<S> {
    slots: [Option<ActionFn<S>>; Action::COUNT],
}

impl<S> ActionTable<S> {
    pub fn new(bindings: &[(Action, ActionFn<S>)]) -> Self {
        let mut slots = [None; Action::COUNT];
        for &(action, function) in bindings {
            slots[action.index()] = Some(function);
        }
        ActionTable { slots }
    }

    pub fn is_bound(&self, action: Action) -> bool {
        self.slots[action.index()].is_some()
    }

    pub fn resolve(&self, action: Action) -> Result<ActionFn<S>> {
        self.slots[action.index()].ok_or(GameError::ActionNotImplemented(action))
    }
}

impl<S> Clone for ActionTable<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for ActionTable<S> {}

impl<S> fmt::Debug for ActionTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound: Vec<Action> = Action::ALL
            .into_iter()
            .filter(|&action| self.is_bound(action))
            .collect();
        f.debug_struct("ActionTable").field("bound", &bound).finish()
    }
}

// ── Factory ───────────────────────────────────────────────────────────────────

pub struct TargetFactory<S> {
    targets: Vec<Target>,
    actions: ActionTable<S>,
    after_adder: AfterAdder<S>,
    board: Board,
    next_id: u64,
}

impl<S> TargetFactory<S> {
    pub fn new(actions: ActionTable<S>, after_adder: AfterAdder<S>, board: Board) -> Self {
        TargetFactory {
            targets: Vec::new(),
            actions,
            after_adder,
            board,
            next_id: 0,
        }
    }

    /// The roster, in creation order.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn get(&self, id: TargetId) -> Option<&Target> {
        self.targets.iter().find(|target| target.id() == id)
    }

    pub fn get_mut(&mut self, id: TargetId) -> Option<&mut Target> {
        self.targets.iter_mut().find(|target| target.id() == id)
    }

    /// First existing target, in roster order, whose value is `value`.
    pub fn find_match(&self, value: &str, now: u64) -> Option<TargetId> {
        self.targets
            .iter()
            .find(|target| target.exists(now) && target.matches(value))
            .map(Target::id)
    }

    /// Removes every garbage target and returns their ids.
    ///
    /// Collects first and removes afterwards; callers must not run this
    /// while a trigger chain is in flight.
    pub fn sweep(&mut self) -> Vec<TargetId> {
        let garbage: Vec<TargetId> = self
            .targets
            .iter()
            .filter(|target| target.is_garbage())
            .map(Target::id)
            .collect();
        if !garbage.is_empty() {
            self.targets.retain(|target| !target.is_garbage());
            tracing::debug!(removed = garbage.len(), left = self.targets.len(), "swept garbage targets");
        }
        garbage
    }

    fn build(&mut self, tick: &mut Tick<'_>, mut blueprint: TargetBlueprint) -> TargetId {
        let attributes = &mut blueprint.attributes;
        if attributes.position.is_none() {
            attributes.position = Some(self.targets.len());
        }

        let mut blueprint = complete(blueprint, &mut *tick.rng);
        let attributes = &mut blueprint.attributes;
        attributes.width = Some(self.board.width);

        if attributes.value_strategy == Some(ValueStrategy::RandomByStrength) {
            let length = attributes.strength.unwrap_or(0.0).max(0.0) as usize;
            attributes.value = Some(random_length(length, &mut *tick.rng));
        }

        let id = TargetId(self.next_id);
        self.next_id += 1;

        let mut target = Target::new(id, &blueprint, tick.now);
        let position = blueprint.attributes.position.unwrap_or_default();
        let (x, y) = self.board.slot_origin(position);
        target.set_position(x, y);
        target.set_height(self.board.row_height);

        tracing::debug!(
            %id,
            kind = ?target.target_type(),
            value = target.value(),
            position,
            "target created"
        );
        self.targets.push(target);
        id
    }
}

// ── Screen: the controlling collaborator ──────────────────────────────────────

/// Implemented by whatever owns the factory and the action behaviour.
pub trait Screen: Sized {
    fn factory(&self) -> &TargetFactory<Self>;
    fn factory_mut(&mut self) -> &mut TargetFactory<Self>;

    /// Completes `blueprint`, puts the new target on the roster, then hands
    /// it to the screen's after-adder.
    fn create_target(&mut self, tick: &mut Tick<'_>, blueprint: TargetBlueprint) -> TargetId {
        let id = self.factory_mut().build(tick, blueprint);
        let after_adder = self.factory().after_adder;
        after_adder(self, id);
        id
    }

    /// Runs the chain bound to `trigger`, in order, with `id` as requestor.
    ///
    /// Does nothing for targets that do not exist (pending, garbage or gone).
    /// The chain is fixed when firing starts and runs to its end even if an
    /// action marks the requestor as garbage. Returns how many actions ran.
    fn fire_trigger(&mut self, tick: &mut Tick<'_>, id: TargetId, trigger: Trigger) -> Result<usize> {
        let chain = match self.factory().get(id) {
            Some(target) if target.exists(tick.now) => target.actions_for(trigger).to_vec(),
            _ => return Ok(0),
        };
        tracing::debug!(%id, ?trigger, ?chain, "firing trigger");

        let actions = self.factory().actions;
        for &action in &chain {
            let perform = actions.resolve(action)?;
            perform(self, tick, id)?;
        }
        Ok(chain.len())
    }

    /// Per-tick timer check: fires `TimeExpired` once the timer runs out.
    /// Returns whether it fired.
    fn update_target(&mut self, tick: &mut Tick<'_>, id: TargetId) -> Result<bool> {
        let due = match self.factory_mut().get_mut(id) {
            Some(target) if target.exists(tick.now) && target.is_due_to_expire(tick.now) => {
                target.latch_expiry();
                true
            }
            _ => false,
        };
        if due {
            self.fire_trigger(tick, id, Trigger::TimeExpired)?;
        }
        Ok(due)
    }
}

// ── Blueprint completion ──────────────────────────────────────────────────────

/// Fills in behaviour for the blueprint's target type; untyped means `Normal`.
pub fn complete<R: Rng + ?Sized>(blueprint: TargetBlueprint, rng: &mut R) -> TargetBlueprint {
    match blueprint.attributes.target_type.unwrap_or_default() {
        TargetType::Normal => complete_normal(blueprint, rng),
        TargetType::Timed => complete_timed(blueprint, rng),
        TargetType::DyingAnimation => complete_dying_animation(blueprint),
    }
}

/// Untimed target worth a flat reward; shooting it spawns a timed one.
pub fn complete_normal<R: Rng + ?Sized>(mut blueprint: TargetBlueprint, rng: &mut R) -> TargetBlueprint {
    blueprint.events.insert(
        Trigger::ShotAt,
        vec![Action::Reward, Action::Spawn, Action::DespawnGood],
    );

    let attr = &mut blueprint.attributes;
    let text = random_text_color(rng);
    attr.colors = Some(Palette {
        frame: text,
        bg: Color::BLACK,
        text,
    });
    attr.value_strategy = Some(ValueStrategy::RandomByStrength);
    attr.reward = Some(ValueChanger::new(RewardStrategy::HardSet, 10.0, 0.0, 1.0));
    attr.penalty = Some(ValueChanger::new(PenaltyStrategy::HardSet, -1.0, 0.0, 1.0));

    let mut spawn = TargetBlueprint::of_type(TargetType::Timed);
    spawn.attributes.strength = Some(4.0);
    spawn.attributes.position = attr.position;
    attr.spawn_blueprint = Some(Box::new(spawn));

    blueprint
}

/// Target on a timer: shooting it early pays more, letting it expire costs
/// points. Either way it is replaced by a slightly stronger one.
pub fn complete_timed<R: Rng + ?Sized>(mut blueprint: TargetBlueprint, rng: &mut R) -> TargetBlueprint {
    blueprint.events.insert(
        Trigger::ShotAt,
        vec![Action::Reward, Action::Spawn, Action::DespawnGood],
    );
    blueprint.events.insert(
        Trigger::TimeExpired,
        vec![Action::Spawn, Action::Penalty, Action::DespawnBad],
    );

    let attr = &mut blueprint.attributes;
    attr.colors = Some(Palette {
        frame: Color::WHITE,
        bg: Color::BLACK,
        text: random_text_color(rng),
    });
    attr.value_strategy = Some(ValueStrategy::RandomByStrength);

    let s = attr.strength.unwrap_or(0.0);
    let stiff = (20.0 * (s - 3.0) * (1.0 + s / 10.0)).max(1.0);
    attr.reward = Some(ValueChanger::new(RewardStrategy::TimeLeft, stiff, 20.0 + 10.0 * s, 1.0));
    attr.penalty = Some(ValueChanger::new(PenaltyStrategy::HardSet, -(s * s), -5.0 * s, 1.0));
    attr.time_to_expire = Some(((s + 1.0) * 1500.0).round().max(0.0) as u64);

    let mut spawn = TargetBlueprint::of_type(TargetType::Timed);
    spawn.attributes.strength = Some((s + STRENGTH_INCREASE).min(MAX_STRENGTH));
    spawn.attributes.position = attr.position;
    attr.spawn_blueprint = Some(Box::new(spawn));

    blueprint
}

/// Cosmetic leftover of a despawned target; its value is preset by the caller.
pub fn complete_dying_animation(mut blueprint: TargetBlueprint) -> TargetBlueprint {
    blueprint
        .events
        .insert(Trigger::TimeExpired, vec![Action::DespawnNonentity]);
    let attr = &mut blueprint.attributes;
    attr.value_strategy = Some(ValueStrategy::Preset);
    attr.time_to_expire = Some(ANIMATION_LENGTH);
    blueprint
}

// ── Randomness ────────────────────────────────────────────────────────────────

/// Random decimal numeral with exactly `length` digits and no leading zero.
/// Lengths below 1 are treated as 1.
pub fn random_length<R: Rng + ?Sized>(length: usize, rng: &mut R) -> String {
    let length = length.clamp(1, MAX_NUMERAL_LENGTH) as u32;
    let low = 10u64.pow(length - 1);
    let high = 10u64.pow(length) - 1;
    rng.gen_range(low..=high).to_string()
}

/// Readable text colour: average channel at least `MINIMUM_AVERAGE`, red
/// capped well below the strongest of green and blue.
pub fn random_text_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    let green = rng.gen_range(0..=255);
    let blue = rng.gen_range((2 * MINIMUM_AVERAGE - green).max(0)..=255);
    let red = rng.gen_range(0..=(green.max(blue) as f64 * 0.66) as i32);

    let mut channels = [red as f64, green as f64, blue as f64];
    let target_sum = (3 * MINIMUM_AVERAGE) as f64;
    let mut below_min = target_sum - channels.iter().sum::<f64>();
    while below_min > 1.0 {
        for channel in channels.iter_mut() {
            *channel = (*channel + (below_min / 3.0).min(255.0 - *channel)).round_ties_even();
        }
        below_min = target_sum - channels.iter().sum::<f64>();
    }

    let [r, g, b] = channels.map(|c| c.clamp(0.0, 255.0) as u8);
    Color::rgb(r, g, b)
}
