//! Ownership registry
//!
//! Tracks every container that may capture the wheel and which one (if any)
//! currently owns it. Lower priority values win; a container's priority is
//! its document-space top edge at registration time.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use smallvec::SmallVec;

use scrim_core::surface::SharedSurface;

/// Identifies a registered container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(u64);

impl ContainerId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "container#{}", self.0)
    }
}

/// How a container consumes wheel motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WheelMode {
    /// Vertical wheel scrolls vertically, horizontal wheel horizontally
    #[default]
    Natural,
    /// Vertical wheel motion scrolls horizontally (down moves right)
    HorizontalOnly,
}

/// Per-container state shared between the registry and its handle
#[derive(Debug, Default)]
pub struct HijackState {
    progress: Cell<f32>,
    hijacked: Cell<bool>,
    retired: Cell<bool>,
}

impl HijackState {
    pub fn progress(&self) -> f32 {
        self.progress.get()
    }

    pub(crate) fn set_progress(&self, progress: f32) {
        self.progress.set(progress.clamp(0.0, 1.0));
    }

    /// Whether the last gesture routed to this container was intercepted
    pub fn is_hijacked(&self) -> bool {
        self.hijacked.get()
    }

    pub(crate) fn set_hijacked(&self, hijacked: bool) {
        self.hijacked.set(hijacked);
    }

    /// The handle went away while the registry was borrowed; the entry is
    /// ignored from now on and removed on the next registry update
    pub(crate) fn retire(&self) {
        self.retired.set(true);
    }

    pub fn is_retired(&self) -> bool {
        self.retired.get()
    }
}

/// A registered container
#[derive(Clone)]
pub struct RegistryEntry {
    pub surface: SharedSurface,
    pub priority: f32,
    pub mode: WheelMode,
    pub state: Rc<HijackState>,
}

/// Shared handle to a registry
pub type SharedRegistry = Rc<RefCell<OwnershipRegistry>>;

/// Registered containers and the single active owner
#[derive(Default)]
pub struct OwnershipRegistry {
    entries: IndexMap<ContainerId, RegistryEntry>,
    active: Option<ContainerId>,
    next_id: u64,
}

impl OwnershipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// New registry behind a shared handle
    pub fn shared() -> SharedRegistry {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Allocate an id that has never been used by this registry
    pub fn allocate_id(&mut self) -> ContainerId {
        self.next_id += 1;
        ContainerId(self.next_id)
    }

    /// Insert or replace the entry for `id`
    pub fn register(&mut self, id: ContainerId, entry: RegistryEntry) {
        self.purge_retired();
        tracing::debug!(%id, priority = entry.priority, mode = ?entry.mode, "container registered");
        self.entries.insert(id, entry);
    }

    /// Remove `id`, clearing the active slot if it owned the wheel
    pub fn unregister(&mut self, id: ContainerId) -> Option<RegistryEntry> {
        self.purge_retired();
        let removed = self.entries.shift_remove(&id);
        if self.active == Some(id) {
            self.active = None;
            tracing::debug!(%id, "wheel owner unregistered");
        }
        removed
    }

    pub fn is_active(&self, id: ContainerId) -> bool {
        self.active() == Some(id)
    }

    pub fn active(&self) -> Option<ContainerId> {
        self.active.filter(|id| self.contains(*id))
    }

    pub fn contains(&self, id: ContainerId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: ContainerId) -> Option<&RegistryEntry> {
        self.entries.get(&id).filter(|entry| !entry.state.is_retired())
    }

    pub fn priority(&self, id: ContainerId) -> Option<f32> {
        self.get(id).map(|entry| entry.priority)
    }

    pub fn len(&self) -> usize {
        self.live().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn live(&self) -> impl Iterator<Item = (&ContainerId, &RegistryEntry)> + '_ {
        self.entries.iter().filter(|(_, entry)| !entry.state.is_retired())
    }

    /// Drop entries whose handles went away while the registry was borrowed
    fn purge_retired(&mut self) {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.state.is_retired());
        if self.entries.len() != before {
            tracing::debug!(removed = before - self.entries.len(), "retired containers purged");
        }
        if self.active.is_some_and(|id| !self.entries.contains_key(&id)) {
            self.active = None;
        }
    }

    /// Entries by ascending priority; ties keep registration order
    pub fn by_priority(&self) -> SmallVec<[(ContainerId, RegistryEntry); 8]> {
        let mut ordered: SmallVec<[(ContainerId, RegistryEntry); 8]> = self
            .live()
            .map(|(id, entry)| (*id, entry.clone()))
            .collect();
        ordered.sort_by(|a, b| a.1.priority.total_cmp(&b.1.priority));
        ordered
    }

    /// Ask for wheel ownership
    ///
    /// Granted when nobody owns the wheel or the requester's priority is
    /// strictly lower than the owner's. Unregistered ids are always denied.
    pub(crate) fn request_activation(&mut self, id: ContainerId) -> bool {
        self.purge_retired();
        let Some(priority) = self.priority(id) else {
            return false;
        };
        let granted = match self.active {
            None => true,
            Some(owner) if owner == id => return true,
            Some(owner) => self
                .priority(owner)
                .map_or(true, |owner_priority| priority < owner_priority),
        };
        if granted {
            tracing::debug!(
                %id,
                previous = ?self.active.map(|owner| owner.raw()),
                "wheel ownership granted"
            );
            self.active = Some(id);
        }
        granted
    }

    /// Give up ownership if `id` holds it
    pub(crate) fn release(&mut self, id: ContainerId) -> bool {
        self.purge_retired();
        if self.active == Some(id) {
            tracing::debug!(%id, "wheel ownership released");
            self.active = None;
            true
        } else {
            false
        }
    }
}

impl fmt::Debug for OwnershipRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnershipRegistry")
            .field("containers", &self.len())
            .field("active", &self.active())
            .finish()
    }
}
