//! Command handlers, one module per command group.

pub mod entries;
pub mod init;
pub mod maintenance;
pub mod pin;
pub mod profile;
pub mod status;

pub use entries::{
    handle_checkin, handle_journal_add, handle_journal_list, handle_moods, handle_show,
};
pub use init::handle_init;
pub use maintenance::{handle_completions, handle_export, handle_reset};
pub use pin::{handle_pin_change, handle_pin_remove, handle_pin_set};
pub use profile::{handle_login, handle_logout, handle_register};
pub use status::handle_status;
