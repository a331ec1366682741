use std::ops::Deref;
use std::rc::{self, Rc};
use std::sync::{self, Arc};

/// A shared-ownership pointer whose target a signal can observe without owning it.
pub trait Track {
    type Target: ?Sized;
    type Weak: WeakHandle<Target = Self::Target>;

    /// A non-owning handle to the same allocation
    fn observe(this: &Self) -> Self::Weak;

    /// Address of the shared target, used as its identity
    fn address(this: &Self) -> usize;
}

/// The non-owning half of a [`Track`] pointer.
pub trait WeakHandle {
    type Target: ?Sized;
    type Strong: Deref<Target = Self::Target>;

    /// Returns a strong pointer if the target is still alive
    fn upgrade(&self) -> Option<Self::Strong>;
}

impl<T: ?Sized> Track for Rc<T> {
    type Target = T;
    type Weak = rc::Weak<T>;

    fn observe(this: &Self) -> Self::Weak { Rc::downgrade(this) }

    fn address(this: &Self) -> usize { Rc::as_ptr(this) as *const () as usize }
}

impl<T: ?Sized> WeakHandle for rc::Weak<T> {
    type Target = T;
    type Strong = Rc<T>;

    fn upgrade(&self) -> Option<Rc<T>> { rc::Weak::upgrade(self) }
}

impl<T: ?Sized> Track for Arc<T> {
    type Target = T;
    type Weak = sync::Weak<T>;

    fn observe(this: &Self) -> Self::Weak { Arc::downgrade(this) }

    fn address(this: &Self) -> usize { Arc::as_ptr(this) as *const () as usize }
}

impl<T: ?Sized> WeakHandle for sync::Weak<T> {
    type Target = T;
    type Strong = Arc<T>;

    fn upgrade(&self) -> Option<Arc<T>> { sync::Weak::upgrade(self) }
}
