//! Domain model: entities, identity types, errors, and the ports that
//! adapters implement.

mod catalog;
mod error;
mod identity;
pub mod ports;
mod user;

pub use catalog::{
    Category, CategoryId, EntryName, EntryNameError, Item, ItemChanges, ItemId, NewCategory,
    NewItem, ENTRY_NAME_MAX,
};
pub use error::{Error, ErrorCode};
pub use identity::{
    generate_state_token, ExchangedToken, Profile, SessionIdentity, TokenInfo, STATE_TOKEN_LEN,
};
pub use user::{NewUser, User, UserId, UserValidationError};
