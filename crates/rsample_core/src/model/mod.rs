mod rset;
mod split;

pub use rset::{RSet, numbered_id};
pub use split::{Assessment, RSplit, SplitKind};
