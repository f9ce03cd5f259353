//! The RLP codec engine (spec.md §4.4): canonical primitives, typed `Kind`s, and a schema
//! `Profiler` that packs/unpacks whole structs and arrays in one pass.

mod kind;
mod primitives;
mod profiler;

pub use kind::{decode_u64, encode_u64, Kind};
pub use primitives::Item;
pub use profiler::{decode, encode, pack, unpack, Field, Schema, Value};
