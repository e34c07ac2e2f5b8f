//! Data models for items, live codes, outcomes and exports.

mod code;
mod event;
mod export;
mod item;
mod outcome;

pub use code::{CodeView, DEFAULT_ALERT_THRESHOLD_SECONDS};
pub use event::TotpCodeResult;
pub use export::{ExportItem, ExportJsonData, ExportLogin, LOGIN_ITEM_TYPE};
pub use item::{
    Algorithm, AuthenticatorData, Item, ItemType, UpdateItemRequest, DEFAULT_DIGITS,
    DEFAULT_PERIOD,
};
pub use outcome::{CreateItemResult, DeleteItemResult, ExportDataResult, UpdateItemResult};
