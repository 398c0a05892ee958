//! JSON codec subsystem.
//!
//! # Data Flow
//! ```text
//! request body text
//!     → decode.rs (flat object → Object)
//!     → ... prediction pipeline ...
//!     → Value::Object (response document)
//!     → encode.rs (→ JSON text)
//! ```
//!
//! # Design Decisions
//! - No JSON library: the service owns its wire format end to end
//! - Decoder accepts flat objects only; nested values are rejected
//! - Encoder is total and never fails
//! - Objects keep insertion order, which is the output order

pub mod decode;
pub mod encode;
pub mod value;

pub use decode::{decode, MalformedJson};
pub use encode::{encode, encode_into};
pub use value::{Object, Value};
