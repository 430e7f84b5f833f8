pub use shakmaty;

pub mod captures;
pub mod pgn;
pub mod pieces;
pub mod record;
