//! Terminal output
//!
//! Uses `cliclack` for styled step logs and prompts, falling back to plain
//! tagged lines in CI or when stdout is not a terminal.

mod context;
mod output;
mod prompts;

pub use context::UiContext;
pub use output::{
    intro, key_value, key_value_status, outro_success, outro_warn, remark, section,
    step_error_detail, step_info, step_ok, step_ok_detail, step_warn, step_warn_hint,
};
pub use prompts::confirm;
