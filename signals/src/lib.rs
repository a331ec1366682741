/*!
Typed synchronous signals and slots

A [`Signal`] is a multicast event with a fixed argument tuple. Slots of many shapes can be
connected to it, and every emit invokes them in connection order on the calling thread.

# Design requirements:
- Connections are identified by what was connected, not by a handle: connecting, querying and
  disconnecting the same function, (owner, method) pair, object or signal always computes the
  same [`SlotId`], and connecting it twice is a no-op
- The signal never owns its slots. Borrowed slots are checked by the borrow checker, tracked
  slots (`Rc`/`Arc`) are observed through weak handles
- Dead tracked slots are never invoked and are pruned lazily, during the next emit
- Slots may connect, disconnect and emit re-entrantly while an emit is in progress

# Slot shapes

| shape                               | builder                                  | identity                  |
|-------------------------------------|------------------------------------------|---------------------------|
| free / associated function          | `slot::function(f)`                      | the function              |
| handler or closure by reference     | `slot::functor(&f)`                      | object address            |
| tracked handler or closure          | `slot::tracked(&rc)`                     | object address            |
| method on a borrowed owner          | `slot::method(&owner, Type::method)`     | owner address + method    |
| method on a tracked owner           | `slot::tracked_method(&rc, Type::method)`| owner address + method    |
| another signal                      | `&signal`                                | signal address            |
| channel sender                      | `slot::sender(&tx)`                      | sender address            |

# Basic usage

```rust
use fanout_signals::*;
use std::cell::Cell;
use std::rc::Rc;

struct Label {
    text: Cell<i32>,
}

impl Label {
    fn on_change(&self, value: i32) { self.text.set(value) }
}

fn log_change(value: i32) { println!("changed to {value}") }

let label = Label { text: Cell::new(0) };
let changed: Signal<(i32,)> = Signal::new();

assert!(changed.connect(slot::function(log_change)));
assert!(changed.connect(slot::method(&label, Label::on_change)));
assert!(!changed.connect(slot::function(log_change))); // already connected

changed.emit(42);
assert_eq!(label.text.get(), 42);

// tracked slots stop receiving once their owner is gone
let tracked = Rc::new(Label { text: Cell::new(0) });
changed.connect(slot::tracked_method(&tracked, Label::on_change));
assert_eq!(changed.size(), 3);
drop(tracked);
changed.emit(7); // prunes the dead connection
assert_eq!(changed.size(), 2);
```
*/

mod error;
mod guard;
mod handler;
mod signal;
pub mod slot;
mod track;

pub use error::*;
pub use guard::*;
pub use handler::*;
pub use signal::*;
pub use slot::{Delivery, IntoSlot, Receiver, Sink, SlotId};
pub use track::*;
