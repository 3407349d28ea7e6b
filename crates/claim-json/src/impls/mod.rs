mod arena;
mod serde_json;

pub use self::arena::ArenaJson;
pub use self::serde_json::SerdeJson;
