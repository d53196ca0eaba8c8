#![allow(dead_code)]

//! Spy screen that records every action it is asked to perform.

use num_type::entities::Action;
use num_type::error::Result;
use num_type::factory::{ActionFn, ActionTable, AfterAdder, Board, Screen, TargetFactory, Tick};
use num_type::target::TargetId;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub const BOARD: Board = Board {
    x: 2,
    y: 1,
    width: 30,
    row_height: 3,
    spacer: 0,
};

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

pub struct Spy {
    pub factory: TargetFactory<Spy>,
    pub log: Vec<(Action, TargetId)>,
    pub admitted: Vec<TargetId>,
}

impl Screen for Spy {
    fn factory(&self) -> &TargetFactory<Self> {
        &self.factory
    }

    fn factory_mut(&mut self) -> &mut TargetFactory<Self> {
        &mut self.factory
    }
}

impl Spy {
    /// Every action bound; despawns mark the requestor as garbage, the rest only record.
    pub fn new() -> Self {
        Spy::with_actions(&Action::ALL)
    }

    /// Only `bound` actions have an implementation.
    pub fn with_actions(bound: &[Action]) -> Self {
        let all: [(Action, ActionFn<Spy>); Action::COUNT] = [
            (Action::Reward, reward),
            (Action::Penalty, penalty),
            (Action::Spawn, spawn),
            (Action::DespawnGood, despawn_good),
            (Action::DespawnBad, despawn_bad),
            (Action::DespawnNonentity, despawn_nonentity),
        ];
        let bindings: Vec<(Action, ActionFn<Spy>)> = all
            .into_iter()
            .filter(|(action, _)| bound.contains(action))
            .collect();
        Spy {
            factory: TargetFactory::new(ActionTable::new(&bindings), admit as AfterAdder<Spy>, BOARD),
            log: Vec::new(),
            admitted: Vec::new(),
        }
    }

    pub fn actions(&self) -> Vec<Action> {
        self.log.iter().map(|&(action, _)| action).collect()
    }
}

fn admit(spy: &mut Spy, id: TargetId) {
    spy.admitted.push(id);
}

fn record(spy: &mut Spy, action: Action, id: TargetId) {
    spy.log.push((action, id));
}

fn despawn(spy: &mut Spy, action: Action, id: TargetId) {
    record(spy, action, id);
    if let Some(target) = spy.factory.get_mut(id) {
        target.mark_garbage();
    }
}

fn reward(spy: &mut Spy, _: &mut Tick<'_>, id: TargetId) -> Result<()> {
    record(spy, Action::Reward, id);
    Ok(())
}

fn penalty(spy: &mut Spy, _: &mut Tick<'_>, id: TargetId) -> Result<()> {
    record(spy, Action::Penalty, id);
    Ok(())
}

fn spawn(spy: &mut Spy, _: &mut Tick<'_>, id: TargetId) -> Result<()> {
    record(spy, Action::Spawn, id);
    Ok(())
}

fn despawn_good(spy: &mut Spy, _: &mut Tick<'_>, id: TargetId) -> Result<()> {
    despawn(spy, Action::DespawnGood, id);
    Ok(())
}

fn despawn_bad(spy: &mut Spy, _: &mut Tick<'_>, id: TargetId) -> Result<()> {
    despawn(spy, Action::DespawnBad, id);
    Ok(())
}

fn despawn_nonentity(spy: &mut Spy, _: &mut Tick<'_>, id: TargetId) -> Result<()> {
    despawn(spy, Action::DespawnNonentity, id);
    Ok(())
}
