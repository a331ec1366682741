use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::Error;
use crate::guard::ConnectionGuard;
use crate::slot::{Delivery, IntoSlot, Receiver, SlotId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Live,
    /// The tracked target died during an emit; removed at the end of that pass
    Expired,
    /// Disconnected while an emit may still hold it in its snapshot
    Detached,
}

struct Entry<'s, Args> {
    id: SlotId,
    receiver: Box<dyn Receiver<Args> + 's>,
    state: Cell<State>,
}

impl<'s, Args> Entry<'s, Args> {
    fn is_live(&self) -> bool { self.state.get() == State::Live && self.receiver.is_live() }

    fn is_expired(&self) -> bool { self.state.get() == State::Expired }

    /// Hands the arguments to the receiver, marking the entry expired if its target is gone
    fn deliver(&self, args: Args) {
        if self.state.get() != State::Live {
            return;
        }
        if self.receiver.receive(args) == Delivery::Expired {
            self.state.set(State::Expired);
        }
    }
}

/// A multicast event with a fixed argument signature.
///
/// `Args` is the tuple of arguments delivered to every slot: `Signal<()>`, `Signal<(i32,)>`,
/// `Signal<(&Cell<i32>, String)>`. Slots are invoked synchronously, in connection order.
/// Slots borrowed by the signal (functors, methods on borrowed owners, chained signals) must
/// outlive `'s`; tracked slots are held weakly and pruned on the emit after their target dies.
///
/// Every operation takes `&self`, so slots may connect, disconnect or emit re-entrantly.
/// Each emit dispatches over the connections present when it started: slots connected during
/// an emit are first invoked by the next one, and slots disconnected during an emit are not
/// invoked if it had not reached them yet.
pub struct Signal<'s, Args> {
    entries: RefCell<Vec<Rc<Entry<'s, Args>>>>,
}

impl<'s, Args> std::fmt::Debug for Signal<'s, Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.debug_struct("Signal").field("slots", &self.size()).finish() }
}

impl<'s, Args> Default for Signal<'s, Args> {
    fn default() -> Self { Self::new() }
}

impl<'s, Args> Signal<'s, Args> {
    /// Creates a signal with no slots
    pub fn new() -> Self { Self { entries: RefCell::new(Vec::new()) } }

    /// Creates a signal with room for `capacity` connections
    pub fn with_capacity(capacity: usize) -> Self { Self { entries: RefCell::new(Vec::with_capacity(capacity)) } }

    pub fn reserve(&self, additional: usize) { self.entries.borrow_mut().reserve(additional) }

    pub fn capacity(&self) -> usize { self.entries.borrow().capacity() }

    /// The identity this signal has when chained as a slot of another signal
    pub fn id(&self) -> SlotId { SlotId::Signal(self as *const Self as usize) }

    /// Connects a slot. Returns false, leaving the signal unchanged, if the slot is already connected.
    pub fn connect<S: IntoSlot<'s, Args>>(&self, slot: S) -> bool { self.try_connect(slot).is_ok() }

    /// Connects a slot, returning its identity
    pub fn try_connect<S: IntoSlot<'s, Args>>(&self, slot: S) -> Result<SlotId, Error> {
        let id = slot.slot_id();
        if self.entries.borrow().iter().any(|entry| entry.id == id) {
            tracing::trace!("rejected duplicate connection of {}", id);
            return Err(Error::AlreadyConnected(id));
        }

        let entry = Rc::new(Entry { id, receiver: slot.into_receiver(), state: Cell::new(State::Live) });
        let mut entries = self.entries.borrow_mut();
        entries.push(entry);
        tracing::trace!("connected {} ({} slots)", id, entries.len());
        Ok(id)
    }

    /// Connects a slot for as long as the returned guard lives.
    /// Returns None if the slot is already connected.
    pub fn connect_scoped<S: IntoSlot<'s, Args>>(&self, slot: S) -> Option<ConnectionGuard<'_, 's, Args>> {
        self.try_connect(slot).ok().map(|id| ConnectionGuard::new(self, id))
    }

    /// Whether a live connection with the slot's identity exists. Never prunes.
    pub fn connected<S: IntoSlot<'s, Args>>(&self, slot: S) -> bool { self.contains(slot.slot_id()) }

    pub fn contains(&self, id: SlotId) -> bool { self.entries.borrow().iter().any(|entry| entry.id == id && entry.is_live()) }

    /// Disconnects a slot. Returns false if it was not connected.
    pub fn disconnect<S: IntoSlot<'s, Args>>(&self, slot: S) -> bool { self.try_disconnect(slot).is_ok() }

    pub fn try_disconnect<S: IntoSlot<'s, Args>>(&self, slot: S) -> Result<SlotId, Error> { self.remove(slot.slot_id()) }

    pub fn disconnect_id(&self, id: SlotId) -> bool { self.remove(id).is_ok() }

    /// Disconnects every slot
    pub fn disconnect_all(&self) {
        let removed = std::mem::take(&mut *self.entries.borrow_mut());
        for entry in &removed {
            entry.state.set(State::Detached);
        }
        if !removed.is_empty() {
            tracing::trace!("disconnected all {} slots", removed.len());
        }
    }

    /// Number of connections, including tracked ones whose target died since the last emit
    pub fn size(&self) -> usize { self.entries.borrow().len() }

    pub fn empty(&self) -> bool { self.entries.borrow().is_empty() }

    pub fn len(&self) -> usize { self.size() }

    pub fn is_empty(&self) -> bool { self.empty() }

    fn remove(&self, id: SlotId) -> Result<SlotId, Error> {
        let removed = {
            let mut entries = self.entries.borrow_mut();
            let position = entries.iter().position(|entry| entry.id == id);
            position.map(|index| entries.remove(index))
        };

        match removed {
            Some(entry) => {
                entry.state.set(State::Detached);
                tracing::trace!("disconnected {}", id);
                Ok(id)
            }
            None => {
                tracing::trace!("{} is not connected", id);
                Err(Error::NotConnected(id))
            }
        }
    }

    /// Removes every entry marked expired by a dispatch pass
    fn prune(&self) {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|entry| !entry.is_expired());
        let pruned = before - entries.len();
        if pruned > 0 {
            tracing::debug!("pruned {} expired slots ({} remaining)", pruned, entries.len());
        }
    }
}

impl<'s, Args: Clone> Signal<'s, Args> {
    /// Sends the packed argument tuple to every live slot in connection order.
    ///
    /// The arguments are cloned for every slot but the last, which receives the original.
    pub fn send(&self, args: Args) {
        // Dispatch over a snapshot so slots can mutate the connection table without holding a borrow
        let snapshot = self.entries.borrow().clone();

        if let Some((last, rest)) = snapshot.split_last() {
            for entry in rest {
                entry.deliver(args.clone());
            }
            last.deliver(args);
        }

        if snapshot.iter().any(|entry| entry.is_expired()) {
            self.prune();
        }
    }
}

macro_rules! emit_arity {
    ($($ty:ident $val:ident),*) => {
        impl<'s, $($ty: Clone),*> Signal<'s, ($($ty,)*)> {
            /// Invokes every live slot with the given arguments, in connection order
            pub fn emit(&self, $($val: $ty),*) { self.send(($($val,)*)) }

            /// Same as [`Signal::emit`]
            pub fn call(&self, $($val: $ty),*) { self.send(($($val,)*)) }
        }
    };
}

emit_arity!();
emit_arity!(A1 a1);
emit_arity!(A1 a1, A2 a2);
emit_arity!(A1 a1, A2 a2, A3 a3);
emit_arity!(A1 a1, A2 a2, A3 a3, A4 a4);
emit_arity!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5);
emit_arity!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6);

// Chaining: a borrowed signal is itself a slot that re-sends the arguments
impl<'a, 't, Args: Clone> IntoSlot<'a, Args> for &'a Signal<'t, Args> {
    fn slot_id(&self) -> SlotId { self.id() }

    fn into_receiver(self) -> Box<dyn Receiver<Args> + 'a> { Box::new(self) }
}

impl<'a, 't, Args: Clone> Receiver<Args> for &'a Signal<'t, Args> {
    fn receive(&self, args: Args) -> Delivery {
        self.send(args);
        Delivery::Delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot;
    use std::rc::Weak;

    fn explode() { panic!("slot failure") }

    fn counter() -> (Rc<Cell<usize>>, Rc<impl Fn()>) {
        let count = Rc::new(Cell::new(0));
        let slot = {
            let count = count.clone();
            Rc::new(move || count.set(count.get() + 1))
        };
        (count, slot)
    }

    #[test]
    fn test_reentrant_connect_is_deferred_to_next_emit() {
        let signal: Rc<Signal<'static, ()>> = Rc::new(Signal::new());
        let (late_count, late) = counter();

        let connector = {
            let signal = Rc::downgrade(&signal);
            let late = late.clone();
            Rc::new(move || {
                if let Some(signal) = signal.upgrade() {
                    signal.connect(slot::tracked(&late));
                }
            })
        };
        assert!(signal.connect(slot::tracked(&connector)));

        signal.emit();
        assert_eq!(late_count.get(), 0);
        assert_eq!(signal.size(), 2);

        signal.emit();
        assert_eq!(late_count.get(), 1);
        assert_eq!(signal.size(), 2);
    }

    #[test]
    fn test_reentrant_disconnect_skips_unvisited_slot() {
        let signal: Rc<Signal<'static, ()>> = Rc::new(Signal::new());
        let (second_count, second) = counter();

        let first = {
            let signal = Rc::downgrade(&signal);
            let second = second.clone();
            Rc::new(move || {
                if let Some(signal) = signal.upgrade() {
                    signal.disconnect(slot::tracked(&second));
                }
            })
        };
        signal.connect(slot::tracked(&first));
        signal.connect(slot::tracked(&second));

        signal.emit();
        assert_eq!(second_count.get(), 0);
        assert_eq!(signal.size(), 1);
    }

    #[test]
    fn test_disconnect_all_during_emit_stops_dispatch() {
        let signal: Rc<Signal<'static, ()>> = Rc::new(Signal::new());
        let (third_count, third) = counter();

        let second = {
            let signal: Weak<Signal<'static, ()>> = Rc::downgrade(&signal);
            Rc::new(move || {
                if let Some(signal) = signal.upgrade() {
                    signal.disconnect_all();
                }
            })
        };
        let (first_count, first) = counter();
        signal.connect(slot::tracked(&first));
        signal.connect(slot::tracked(&second));
        signal.connect(slot::tracked(&third));

        signal.emit();
        assert_eq!(first_count.get(), 1);
        assert_eq!(third_count.get(), 0);
        assert!(signal.empty());
    }

    #[test]
    fn test_nested_emit_prunes_expired_slots() {
        let signal: Rc<Signal<'static, ()>> = Rc::new(Signal::new());
        let depth = Rc::new(Cell::new(0));

        let reemitter = {
            let signal = Rc::downgrade(&signal);
            let depth = depth.clone();
            Rc::new(move || {
                if depth.get() > 0 {
                    return;
                }
                depth.set(1);
                if let Some(signal) = signal.upgrade() {
                    signal.emit();
                }
                depth.set(0);
            })
        };
        let (dead_count, dead) = counter();
        signal.connect(slot::tracked(&reemitter));
        signal.connect(slot::tracked(&dead));
        drop(dead);
        assert_eq!(signal.size(), 2);

        signal.emit();
        assert_eq!(dead_count.get(), 0);
        assert_eq!(signal.size(), 1);
    }

    #[test]
    fn test_liveness_is_checked_without_pruning() {
        let signal: Signal<()> = Signal::new();
        let (_, observer) = counter();
        let id = signal.try_connect(slot::tracked(&observer)).expect("first connection");
        assert!(signal.contains(id));

        drop(observer);
        assert!(!signal.contains(id));
        assert_eq!(signal.size(), 1);

        signal.emit();
        assert!(signal.empty());
    }

    #[test]
    fn test_panicking_slot_leaves_signal_usable() {
        let signal: Signal<()> = Signal::new();
        let (count, observer) = counter();
        signal.connect(slot::function(explode));
        signal.connect(slot::tracked(&observer));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| signal.emit()));
        assert!(result.is_err());
        assert_eq!(count.get(), 0);

        assert!(signal.disconnect(slot::function(explode)));
        signal.emit();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_capacity_hint() {
        let signal: Signal<(i32,)> = Signal::with_capacity(8);
        assert!(signal.capacity() >= 8);
        assert!(signal.empty());
        signal.reserve(32);
        assert!(signal.capacity() >= 32);
    }
}
