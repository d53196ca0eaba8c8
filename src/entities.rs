//! Closed game vocabularies and tuning constants: pure data, no logic.

// ── Tuning ────────────────────────────────────────────────────────────────────

/// Lifetime of a dying animation, and the delay before a spawned child shows up (ms).
pub const ANIMATION_LENGTH: u64 = 300;

/// Strength gained by each child of a TIMED target.
pub const STRENGTH_INCREASE: f64 = 0.3;

/// Spawned children never get harder than this.
pub const MAX_STRENGTH: f64 = 9.0;

pub const VICTORY_POINTS: i64 = 10_000;

pub const STARTING_HP: u32 = 10;

// ── Triggers & actions ────────────────────────────────────────────────────────

/// Events a target can react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Trigger {
    TimeExpired,
    ShotAt,
}

/// Named effects, bound to concrete behaviour by the controlling screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Reward,
    Penalty,
    Spawn,
    DespawnGood,
    DespawnBad,
    DespawnNonentity,
}

impl Action {
    pub const COUNT: usize = 6;

    pub const ALL: [Action; Action::COUNT] = [
        Action::Reward,
        Action::Penalty,
        Action::Spawn,
        Action::DespawnGood,
        Action::DespawnBad,
        Action::DespawnNonentity,
    ];

    /// Slot of this action in an action table.
    pub const fn index(self) -> usize {
        self as usize
    }
}

// ── Target flavours ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TargetType {
    #[default]
    Normal,
    Timed,
    /// Cosmetic leftover of a despawned target; never interactive.
    DyingAnimation,
}

/// How a target's VALUE is obtained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ValueStrategy {
    /// Supplied by whoever builds the blueprint.
    #[default]
    Preset,
    /// A random numeral with as many digits as the target's strength.
    RandomByStrength,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RewardStrategy {
    HardSet,
    TimeLeft,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PenaltyStrategy {
    HardSet,
    TimeLeft,
}

// ── Attribute keys ────────────────────────────────────────────────────────────

/// Keys of the closed attribute set carried by blueprints and targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    Garbage,
    ValueStrategy,
    TimeCreated,
    TimeToBeShown,
    TimeToExpire,
    Reward,
    Penalty,
    Strength,
    SpawnBlueprint,
    Colors,
    TargetType,
    Width,
    Value,
    Position,
}
