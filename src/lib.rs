//! stackdiff core library: profile correlation, diff formatting and table assembly.

mod align;
mod cmd;
mod columns;
mod compare;
mod config;
mod correlate;
mod error;
mod fsutil;
mod layout;
mod profile;
mod report;
mod table;
mod units;

pub use align::*;
pub use cmd::*;
pub use columns::*;
pub use compare::*;
pub use config::*;
pub use correlate::*;
pub use error::*;
pub use fsutil::*;
pub use layout::*;
pub use profile::*;
pub use report::*;
pub use table::*;
pub use units::*;
