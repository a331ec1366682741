use crate::signal::Signal;
use crate::slot::SlotId;

/// A scoped connection, returned by [`Signal::connect_scoped`].
///
/// Disconnects its slot when dropped. The guard only remembers the slot's identity, so if the
/// slot is disconnected and connected again in the meantime, dropping the guard removes the
/// newer connection.
#[must_use = "dropping the guard disconnects the slot immediately"]
pub struct ConnectionGuard<'g, 's, Args> {
    signal: &'g Signal<'s, Args>,
    id: SlotId,
}

impl<'g, 's, Args> ConnectionGuard<'g, 's, Args> {
    pub(crate) fn new(signal: &'g Signal<'s, Args>, id: SlotId) -> Self { Self { signal, id } }

    /// Identity of the guarded slot
    pub fn id(&self) -> SlotId { self.id }

    /// Keeps the slot connected beyond the guard's lifetime
    pub fn release(self) -> SlotId {
        let id = self.id;
        std::mem::forget(self);
        id
    }
}

impl<'g, 's, Args> Drop for ConnectionGuard<'g, 's, Args> {
    fn drop(&mut self) { self.signal.disconnect_id(self.id); }
}

impl<'g, 's, Args> std::fmt::Debug for ConnectionGuard<'g, 's, Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.debug_struct("ConnectionGuard").field("id", &self.id).finish() }
}
