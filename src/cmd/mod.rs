mod diff_cmd;
mod print_cmd;

pub use diff_cmd::*;
pub use print_cmd::*;
