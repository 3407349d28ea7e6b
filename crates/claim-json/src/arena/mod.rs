//! Native arena-backed JSON tree.
//!
//! A [`Document`] owns every node of its tree in one growable arena. Borrowed
//! views ([`ValueRef`], [`ValueMut`]) are `(arena, index)` pairs bound to the
//! lifetime of their owner. Standalone values ([`Value`], [`Sequence`],
//! [`Mapping`]) carry a private arena; inserting them somewhere else copies
//! their nodes into the target arena.
//!
//! ```rust
//! use claim_json::arena::{Document, Mapping, Sequence};
//!
//! let mut payload = Mapping::new();
//! payload.insert("iss", "auth0");
//! payload.insert("aud", Sequence::from_range(["api", "web"]));
//!
//! let document = Document::from(claim_json::arena::Value::from(payload));
//! assert_eq!(document.serialize(), r#"{"iss":"auth0","aud":["api","web"]}"#);
//! ```
mod containers;
mod de;
mod document;
pub(crate) mod node;
mod ser;
mod value;

pub use containers::{Mapping, Sequence};
pub use document::Document;
pub use value::{Elements, Entries, Value, ValueMut, ValueRef};
