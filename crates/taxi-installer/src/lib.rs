mod exposure;
mod fs_utils;
mod install;
mod launcher;
mod layout;
mod receipts;
mod status;
mod types;
mod uninstall;

pub use exposure::{expose_launcher, exposed_launcher_target, remove_exposed_launcher};
pub use fs_utils::{
    move_file, remove_file_if_exists, replace_file_atomically, replace_symlink_atomically,
};
pub use install::install_artifact;
pub use launcher::{
    copy_read_bits_to_execute, make_executable, render_launcher_script, write_launcher,
};
pub use layout::{absolute_path, default_user_home, InstallLayout};
pub use receipts::{current_unix_timestamp, read_install_receipt, write_install_receipt};
pub use status::inspect_install;
pub use types::{
    ArtifactInstall, InstallOutcome, InstallReceipt, InstallState, UninstallResult,
    UninstallStatus,
};
pub use uninstall::uninstall;
