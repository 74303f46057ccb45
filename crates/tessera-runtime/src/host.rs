use hashbrown::HashMap;
use tessera_geom::CellPos;
use tessera_structures::ActorId;

/// Side effects the engine asks of its embedding that are not grid writes.
pub trait Host {
    /// Fire-and-forget audio cue at `at`.
    fn play_sound(&mut self, sound: &str, at: CellPos);
    /// Takes one unit of whatever `actor` is holding.
    fn consume_held_item(&mut self, actor: ActorId);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostEvent {
    Sound { sound: String, at: CellPos },
    ItemConsumed { actor: ActorId, remaining: u32 },
}

/// Host that records every request and tracks held item counts per actor.
#[derive(Default, Debug)]
pub struct RecordingHost {
    pub log: Vec<HostEvent>,
    held: HashMap<ActorId, u32>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn give(&mut self, actor: ActorId, count: u32) {
        *self.held.entry(actor).or_insert(0) += count;
    }

    pub fn held(&self, actor: ActorId) -> u32 {
        self.held.get(&actor).copied().unwrap_or(0)
    }

    pub fn sounds(&self) -> impl Iterator<Item = (&str, CellPos)> {
        self.log.iter().filter_map(|e| match e {
            HostEvent::Sound { sound, at } => Some((sound.as_str(), *at)),
            _ => None,
        })
    }
}

impl Host for RecordingHost {
    fn play_sound(&mut self, sound: &str, at: CellPos) {
        self.log.push(HostEvent::Sound {
            sound: sound.to_string(),
            at,
        });
    }

    fn consume_held_item(&mut self, actor: ActorId) {
        let slot = self.held.entry(actor).or_insert(0);
        *slot = slot.saturating_sub(1);
        let remaining = *slot;
        self.log.push(HostEvent::ItemConsumed { actor, remaining });
    }
}
