use chrono::Utc;
use grants_types::{IdClock, Message, Panel, Session, SessionRecord, SessionSummary};

use crate::config::EngineConfig;
use crate::migration::migrate;

/// A stored session, either live or still in the shape it was loaded in
enum Slot {
    Ready(Session),
    Pending(SessionRecord),
}

impl Slot {
    fn id(&self) -> &str {
        match self {
            Slot::Ready(session) => &session.id,
            Slot::Pending(record) => &record.id,
        }
    }

    fn preview(&self, default_title: &str) -> Session {
        match self {
            Slot::Ready(session) => session.clone(),
            Slot::Pending(record) => migrate(record.clone(), default_title),
        }
    }
}

/// Ordered session collection plus the active-session reference
///
/// Newest sessions come first. Imported records stay in their loaded shape
/// until first selected or mutated, where they are migrated exactly once.
pub struct SessionStore {
    slots: Vec<Slot>,
    active: Option<String>,
    ids: IdClock,
    config: EngineConfig,
}

impl SessionStore {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            slots: Vec::new(),
            active: None,
            ids: IdClock::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn next_id(&mut self) -> String {
        self.ids.next_id()
    }

    /// Reserve `count` consecutive ids and return the first
    pub fn reserve_ids(&mut self, count: usize) -> u64 {
        self.ids.reserve(count)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Create a session seeded with one welcome message per panel and make it active
    pub fn create_session(&mut self) -> Session {
        let id = self.next_id();
        let search_welcome = Message::system(self.next_id(), Panel::Search, self.config.search_welcome.clone());
        let document_welcome =
            Message::system(self.next_id(), Panel::Document, self.config.document_welcome.clone());

        let session = Session::new(id, self.config.default_title.clone(), Utc::now())
            .append_to(Panel::Search, search_welcome)
            .append_to(Panel::Document, document_welcome);

        self.slots.insert(0, Slot::Ready(session.clone()));
        self.active = Some(session.id.clone());
        tracing::info!(session_id = %session.id, "Session created");

        session
    }

    /// Make `id` the active session, migrating it if needed
    ///
    /// On a miss the active reference is cleared and `None` returned.
    pub fn select_session(&mut self, id: &str) -> Option<&Session> {
        let Some(index) = self.position(id) else {
            tracing::debug!(session_id = %id, "Selected unknown session");
            self.active = None;
            return None;
        };

        self.active = Some(id.to_string());
        self.materialize(index)
    }

    /// Remove a session; returns whether anything was removed
    pub fn delete_session(&mut self, id: &str) -> bool {
        let before = self.slots.len();
        self.slots.retain(|slot| slot.id() != id);
        let removed = self.slots.len() != before;

        if self.active.as_deref() == Some(id) {
            self.active = None;
        }
        if removed {
            tracing::info!(session_id = %id, "Session deleted");
        }

        removed
    }

    /// Store a loaded record at the back of the collection, unmigrated
    ///
    /// A blank or already used id is replaced with a fresh one.
    pub fn import(&mut self, mut record: SessionRecord) -> String {
        if record.id.trim().is_empty() || self.position(&record.id).is_some() {
            record.id = self.next_id();
        }
        let id = record.id.clone();
        self.slots.push(Slot::Pending(record));
        tracing::info!(session_id = %id, "Session imported");
        id
    }

    pub fn sessions(&self) -> Vec<SessionSummary> {
        self.slots
            .iter()
            .map(|slot| slot.preview(&self.config.default_title).summary())
            .collect()
    }

    pub fn session(&self, id: &str) -> Option<Session> {
        self.slots
            .iter()
            .find(|slot| slot.id() == id)
            .map(|slot| slot.preview(&self.config.default_title))
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active(&self) -> Option<Session> {
        self.active_id().and_then(|id| self.session(id))
    }

    /// Replace session `id` with `f(current)`
    pub fn update<F>(&mut self, id: &str, f: F) -> Option<&Session>
    where
        F: FnOnce(Session) -> Session,
    {
        let index = self.position(id)?;
        let slot = &mut self.slots[index];
        let current = match slot {
            Slot::Ready(session) => session.clone(),
            Slot::Pending(record) => migrate(record.clone(), &self.config.default_title),
        };
        *slot = Slot::Ready(f(current));

        match slot {
            Slot::Ready(session) => Some(session),
            Slot::Pending(_) => None,
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.slots.iter().position(|slot| slot.id() == id)
    }

    fn materialize(&mut self, index: usize) -> Option<&Session> {
        let slot = self.slots.get_mut(index)?;
        if let Slot::Pending(record) = slot {
            let session = migrate(std::mem::take(record), &self.config.default_title);
            tracing::debug!(session_id = %session.id, "Migrated loaded session");
            *slot = Slot::Ready(session);
        }

        match slot {
            Slot::Ready(session) => Some(session),
            Slot::Pending(_) => None,
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
