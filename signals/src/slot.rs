use std::any::{TypeId, type_name};
use std::mem::size_of;

use crate::handler::{Handler, MethodHandler};
use crate::track::{Track, WeakHandle};

/// The identity of a connection.
///
/// A `SlotId` is recomputed from the same arguments every time a slot is connected,
/// queried or disconnected, so callers never need to hold on to a connection handle.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum SlotId {
    /// A free function, associated function or non-capturing closure, identified by its type
    Function { function: TypeId, name: &'static str },
    /// A handler object identified by its address
    Functor { address: usize, kind: &'static str },
    /// A method bound to an owner
    Method { owner: usize, method: TypeId, name: &'static str },
    /// Another signal chained as a slot
    Signal(usize),
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotId::Function { name, .. } => write!(f, "fn {name}"),
            SlotId::Functor { address, kind } => write!(f, "{kind}@{address:#x}"),
            SlotId::Method { owner, name, .. } => write!(f, "{name}@{owner:#x}"),
            SlotId::Signal(address) => write!(f, "signal@{address:#x}"),
        }
    }
}

/// Outcome of handing arguments to a [`Receiver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// The tracked target is gone and the connection should be pruned
    Expired,
}

/// The type-erased invocation half of a connection.
pub trait Receiver<Args> {
    fn receive(&self, args: Args) -> Delivery;

    /// Whether the target can still be invoked. Only tracked receivers ever report false.
    fn is_live(&self) -> bool { true }
}

/// Trait for types that can be connected to a signal as a slot.
pub trait IntoSlot<'s, Args> {
    /// Identity token used for duplicate detection and disconnection
    fn slot_id(&self) -> SlotId;

    fn into_receiver(self) -> Box<dyn Receiver<Args> + 's>;
}

fn address_of<T: ?Sized>(target: &T) -> usize { target as *const T as *const () as usize }

/// A free function or non-capturing closure. See [`function`].
pub struct Function<F>(F);

/// Connects a free function, associated function or non-capturing closure.
///
/// Function items have a unique zero-sized type each, which is what identifies them.
/// Passing a function pointer or a capturing closure fails to compile.
pub fn function<F: 'static>(f: F) -> Function<F> {
    const { assert!(size_of::<F>() == 0, "slot::function requires a function item or a non-capturing closure") };
    Function(f)
}

impl<'s, F, Args> IntoSlot<'s, Args> for Function<F>
where F: Handler<Args> + 'static
{
    fn slot_id(&self) -> SlotId { SlotId::Function { function: TypeId::of::<F>(), name: type_name::<F>() } }

    fn into_receiver(self) -> Box<dyn Receiver<Args> + 's> { Box::new(self) }
}

impl<F, Args> Receiver<Args> for Function<F>
where F: Handler<Args>
{
    fn receive(&self, args: Args) -> Delivery {
        Handler::handle(&self.0, args);
        Delivery::Delivered
    }
}

/// A handler or closure borrowed for the lifetime of the connection. See [`functor`].
pub struct Functor<'s, F: ?Sized>(&'s F);

/// Connects a handler object or closure by reference. The signal does not own it.
pub fn functor<F: ?Sized>(target: &F) -> Functor<'_, F> { Functor(target) }

impl<'s, F, Args> IntoSlot<'s, Args> for Functor<'s, F>
where F: ?Sized + Handler<Args> + 's
{
    fn slot_id(&self) -> SlotId { SlotId::Functor { address: address_of(self.0), kind: type_name::<F>() } }

    fn into_receiver(self) -> Box<dyn Receiver<Args> + 's> { Box::new(self) }
}

impl<'s, F, Args> Receiver<Args> for Functor<'s, F>
where F: ?Sized + Handler<Args>
{
    fn receive(&self, args: Args) -> Delivery {
        Handler::handle(self.0, args);
        Delivery::Delivered
    }
}

/// A handler observed through a weak handle. See [`tracked`].
pub struct Tracked<W> {
    handle: W,
    address: usize,
}

/// Connects a shared handler without extending its lifetime.
///
/// Once every strong reference is dropped the slot is skipped and pruned on the next emit.
/// The identity is the same as `functor(&*target)`.
pub fn tracked<P: Track>(target: &P) -> Tracked<P::Weak> { Tracked { handle: Track::observe(target), address: Track::address(target) } }

impl<'s, W, Args> IntoSlot<'s, Args> for Tracked<W>
where
    W: WeakHandle + 's,
    W::Target: Handler<Args>,
{
    fn slot_id(&self) -> SlotId { SlotId::Functor { address: self.address, kind: type_name::<W::Target>() } }

    fn into_receiver(self) -> Box<dyn Receiver<Args> + 's> { Box::new(self) }
}

impl<W, Args> Receiver<Args> for Tracked<W>
where
    W: WeakHandle,
    W::Target: Handler<Args>,
{
    fn receive(&self, args: Args) -> Delivery {
        match self.handle.upgrade() {
            Some(target) => {
                Handler::handle(&*target, args);
                Delivery::Delivered
            }
            None => Delivery::Expired,
        }
    }

    fn is_live(&self) -> bool { self.handle.upgrade().is_some() }
}

/// A method bound to a borrowed owner. See [`method`].
pub struct Method<'s, T: ?Sized, M> {
    owner: &'s T,
    method: M,
}

/// Connects `method` bound to `owner`, e.g. `slot::method(&widget, Widget::on_resize)`.
///
/// The method must be a method path or a non-capturing closure taking the owner first.
pub fn method<T: ?Sized, M: 'static>(owner: &T, method: M) -> Method<'_, T, M> {
    const { assert!(size_of::<M>() == 0, "slot::method requires a method path or a non-capturing closure") };
    Method { owner, method }
}

impl<'s, T, M, Args> IntoSlot<'s, Args> for Method<'s, T, M>
where
    T: ?Sized + 's,
    M: MethodHandler<T, Args> + 'static,
{
    fn slot_id(&self) -> SlotId { SlotId::Method { owner: address_of(self.owner), method: TypeId::of::<M>(), name: type_name::<M>() } }

    fn into_receiver(self) -> Box<dyn Receiver<Args> + 's> { Box::new(self) }
}

impl<'s, T, M, Args> Receiver<Args> for Method<'s, T, M>
where
    T: ?Sized,
    M: MethodHandler<T, Args>,
{
    fn receive(&self, args: Args) -> Delivery {
        MethodHandler::handle(&self.method, self.owner, args);
        Delivery::Delivered
    }
}

/// A method bound to an owner observed through a weak handle. See [`tracked_method`].
pub struct TrackedMethod<W, M> {
    handle: W,
    owner: usize,
    method: M,
}

/// Connects `method` bound to a shared `owner` without extending the owner's lifetime.
///
/// The identity is the same as `method(&*owner, method)`.
pub fn tracked_method<P: Track, M: 'static>(owner: &P, method: M) -> TrackedMethod<P::Weak, M> {
    const { assert!(size_of::<M>() == 0, "slot::tracked_method requires a method path or a non-capturing closure") };
    TrackedMethod { handle: Track::observe(owner), owner: Track::address(owner), method }
}

impl<'s, W, M, Args> IntoSlot<'s, Args> for TrackedMethod<W, M>
where
    W: WeakHandle + 's,
    M: MethodHandler<W::Target, Args> + 'static,
{
    fn slot_id(&self) -> SlotId { SlotId::Method { owner: self.owner, method: TypeId::of::<M>(), name: type_name::<M>() } }

    fn into_receiver(self) -> Box<dyn Receiver<Args> + 's> { Box::new(self) }
}

impl<W, M, Args> Receiver<Args> for TrackedMethod<W, M>
where
    W: WeakHandle,
    M: MethodHandler<W::Target, Args>,
{
    fn receive(&self, args: Args) -> Delivery {
        match self.handle.upgrade() {
            Some(owner) => {
                MethodHandler::handle(&self.method, &*owner, args);
                Delivery::Delivered
            }
            None => Delivery::Expired,
        }
    }

    fn is_live(&self) -> bool { self.handle.upgrade().is_some() }
}

/// A channel endpoint that accepts the packed argument tuple.
pub trait Sink<T> {
    fn forward(&self, value: T);
}

impl<T> Sink<T> for std::sync::mpsc::Sender<T> {
    fn forward(&self, value: T) {
        let _ = self.send(value); // Ignore send errors
    }
}

#[cfg(feature = "tokio")]
impl<T> Sink<T> for tokio::sync::mpsc::UnboundedSender<T> {
    fn forward(&self, value: T) {
        let _ = self.send(value); // Ignore send errors
    }
}

/// A borrowed channel sender. See [`sender`].
pub struct Forward<'s, S: ?Sized>(&'s S);

/// Connects a channel sender by reference; every emit sends the argument tuple.
pub fn sender<S: ?Sized>(tx: &S) -> Forward<'_, S> { Forward(tx) }

impl<'s, S, Args> IntoSlot<'s, Args> for Forward<'s, S>
where S: ?Sized + Sink<Args> + 's
{
    fn slot_id(&self) -> SlotId { SlotId::Functor { address: address_of(self.0), kind: type_name::<S>() } }

    fn into_receiver(self) -> Box<dyn Receiver<Args> + 's> { Box::new(self) }
}

impl<'s, S, Args> Receiver<Args> for Forward<'s, S>
where S: ?Sized + Sink<Args>
{
    fn receive(&self, args: Args) -> Delivery {
        self.0.forward(args);
        Delivery::Delivered
    }
}
