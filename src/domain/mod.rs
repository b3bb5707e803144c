mod account;
mod budget;
mod event;
mod goal;
mod summary;
mod transaction;

pub use account::*;
pub use budget::*;
pub use event::*;
pub use goal::*;
pub use summary::*;
pub use transaction::*;
