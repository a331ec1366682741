use crate::slot::SlotId;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("slot {0} is already connected")]
    AlreadyConnected(SlotId),
    #[error("slot {0} is not connected")]
    NotConnected(SlotId),
}
