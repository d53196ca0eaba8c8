//! Blueprints and the live targets built from them.
//!
//! A target moves through three states: pending (before `time_to_be_shown`),
//! active, and garbage. Garbage is terminal; the owning screen removes
//! garbage targets from the roster in its own sweep.

use std::collections::BTreeMap;
use std::fmt;

use crate::color::Palette;
use crate::entities::{Action, Attribute, TargetType, Trigger, ValueStrategy};
use crate::error::Result;
use crate::value_changer::{TimeLeft, ValueChanger};

pub type Events = BTreeMap<Trigger, Vec<Action>>;

// ── Attributes ────────────────────────────────────────────────────────────────

/// The closed attribute set. Absent optional keys are `None`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attributes {
    pub garbage: bool,
    pub value_strategy: Option<ValueStrategy>,
    pub time_created: Option<u64>,
    pub time_to_be_shown: Option<u64>,
    /// Lifetime in ms, counted from `time_created`.
    pub time_to_expire: Option<u64>,
    pub reward: Option<ValueChanger>,
    pub penalty: Option<ValueChanger>,
    pub strength: Option<f64>,
    pub spawn_blueprint: Option<Box<TargetBlueprint>>,
    pub colors: Option<Palette>,
    pub width: Option<u16>,
    pub target_type: Option<TargetType>,
    pub value: Option<String>,
    pub position: Option<usize>,
}

impl Attributes {
    pub fn contains(&self, key: Attribute) -> bool {
        match key {
            Attribute::Garbage => true,
            Attribute::ValueStrategy => self.value_strategy.is_some(),
            Attribute::TimeCreated => self.time_created.is_some(),
            Attribute::TimeToBeShown => self.time_to_be_shown.is_some(),
            Attribute::TimeToExpire => self.time_to_expire.is_some(),
            Attribute::Reward => self.reward.is_some(),
            Attribute::Penalty => self.penalty.is_some(),
            Attribute::Strength => self.strength.is_some(),
            Attribute::SpawnBlueprint => self.spawn_blueprint.is_some(),
            Attribute::Colors => self.colors.is_some(),
            Attribute::TargetType => self.target_type.is_some(),
            Attribute::Width => self.width.is_some(),
            Attribute::Value => self.value.is_some(),
            Attribute::Position => self.position.is_some(),
        }
    }
}

// ── Blueprint ─────────────────────────────────────────────────────────────────

/// Template for exactly one target: trigger bindings plus attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct TargetBlueprint {
    pub events: Events,
    pub attributes: Attributes,
}

impl TargetBlueprint {
    /// Builds a blueprint from its own copies of `events` and `attributes`;
    /// the caller's maps stay independent of it. A missing value strategy
    /// defaults to `Preset`.
    pub fn new(events: &Events, attributes: &Attributes) -> Self {
        let mut attributes = attributes.clone();
        attributes.value_strategy.get_or_insert(ValueStrategy::Preset);
        TargetBlueprint {
            events: events.clone(),
            attributes,
        }
    }

    /// Shorthand for an empty blueprint of the given type.
    pub fn of_type(target_type: TargetType) -> Self {
        let mut blueprint = TargetBlueprint::default();
        blueprint.attributes.target_type = Some(target_type);
        blueprint
    }
}

impl Default for TargetBlueprint {
    fn default() -> Self {
        TargetBlueprint::new(&Events::new(), &Attributes::default())
    }
}

// ── Placement ─────────────────────────────────────────────────────────────────

/// Things the presentation layer can move around the board.
pub trait Positionable {
    fn set_position(&mut self, x: u16, y: u16);
    fn position(&self) -> (u16, u16);
}

/// Screen rectangle of a target, in terminal cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Placement {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Positionable for Placement {
    fn set_position(&mut self, x: u16, y: u16) {
        self.x = x;
        self.y = y;
    }

    fn position(&self) -> (u16, u16) {
        (self.x, self.y)
    }
}

// ── Countdown ─────────────────────────────────────────────────────────────────

/// A target's timer as seen at one instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Countdown {
    pub created: u64,
    pub to_expire: Option<u64>,
    pub now: u64,
}

impl Countdown {
    /// Milliseconds until expiry, floored at 0; `None` for targets without a timer.
    pub fn time_left(&self) -> Option<u64> {
        self.to_expire
            .map(|lifetime| self.created.saturating_add(lifetime).saturating_sub(self.now))
    }
}

impl TimeLeft for Countdown {
    /// Untimed targets always have their whole time left.
    fn time_percentage_left(&self) -> f64 {
        match (self.to_expire, self.time_left()) {
            (Some(0), _) => 0.0,
            (Some(lifetime), Some(left)) => left as f64 / lifetime as f64,
            _ => 1.0,
        }
    }
}

// ── Target ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u64);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A live entity on the board. Only `TargetFactory` creates these.
#[derive(Clone, Debug)]
pub struct Target {
    id: TargetId,
    events: Events,
    attributes: Attributes,
    placement: Placement,
    expiry_fired: bool,
}

impl Target {
    pub(crate) fn new(id: TargetId, blueprint: &TargetBlueprint, now: u64) -> Self {
        let mut attributes = blueprint.attributes.clone();
        attributes.time_created = Some(now);
        attributes.garbage = false;
        attributes.time_to_be_shown.get_or_insert(0);
        let placement = Placement {
            width: attributes.width.unwrap_or_default(),
            ..Placement::default()
        };
        Target {
            id,
            events: blueprint.events.clone(),
            attributes,
            placement,
            expiry_fired: false,
        }
    }

    pub fn id(&self) -> TargetId {
        self.id
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    pub fn events(&self) -> &Events {
        &self.events
    }

    /// Ordered action chain bound to `trigger`; empty when unbound.
    pub fn actions_for(&self, trigger: Trigger) -> &[Action] {
        self.events.get(&trigger).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub(crate) fn set_height(&mut self, height: u16) {
        self.placement.height = height;
    }

    pub fn value(&self) -> &str {
        self.attributes.value.as_deref().unwrap_or("")
    }

    pub fn target_type(&self) -> TargetType {
        self.attributes.target_type.unwrap_or_default()
    }

    pub fn colors(&self) -> Palette {
        self.attributes.colors.unwrap_or_default()
    }

    pub fn is_garbage(&self) -> bool {
        self.attributes.garbage
    }

    /// Marks the target for removal. There is no way back.
    pub fn mark_garbage(&mut self) {
        self.attributes.garbage = true;
    }

    pub fn matches(&self, value: &str) -> bool {
        self.attributes.value.as_deref() == Some(value)
    }

    /// Shown and not garbage.
    pub fn exists(&self, now: u64) -> bool {
        !self.attributes.garbage && now >= self.attributes.time_to_be_shown.unwrap_or(0)
    }

    pub fn countdown(&self, now: u64) -> Countdown {
        Countdown {
            created: self.attributes.time_created.unwrap_or(now),
            to_expire: self.attributes.time_to_expire,
            now,
        }
    }

    pub fn calculate_time_left(&self, now: u64) -> Option<u64> {
        self.countdown(now).time_left()
    }

    pub fn calculate_time_percentage_left(&self, now: u64) -> f64 {
        self.countdown(now).time_percentage_left()
    }

    /// `(0, 1.0)` when the target carries no reward.
    pub fn calculate_reward(&mut self, now: u64) -> Result<(i64, f64)> {
        let countdown = self.countdown(now);
        match self.attributes.reward.as_mut() {
            Some(reward) => reward.calculate(&countdown),
            None => Ok((0, 1.0)),
        }
    }

    /// `(0, 1.0)` when the target carries no penalty.
    pub fn calculate_penalty(&mut self, now: u64) -> Result<(i64, f64)> {
        let countdown = self.countdown(now);
        match self.attributes.penalty.as_mut() {
            Some(penalty) => penalty.calculate(&countdown),
            None => Ok((0, 1.0)),
        }
    }

    /// True once per target: when its timer has run out and expiry was not yet fired.
    pub fn is_due_to_expire(&self, now: u64) -> bool {
        !self.expiry_fired && self.calculate_time_left(now) == Some(0)
    }

    pub(crate) fn latch_expiry(&mut self) {
        self.expiry_fired = true;
    }
}

impl Positionable for Target {
    fn set_position(&mut self, x: u16, y: u16) {
        self.placement.set_position(x, y);
    }

    fn position(&self) -> (u16, u16) {
        self.placement.position()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Target with value {}", self.value())
    }
}
