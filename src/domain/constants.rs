pub const DEFAULT_CONFIG_PATH: &str = "/etc/keyscan/config.toml";

pub const DEFAULT_TARGET_GLOBS: &[&str] = &[
    "/home/*/.ssh/authorized_keys",
    "/home/*/.ssh/authorized_keys2",
];

pub const DEFAULT_PERMITTED_KEY_FILES: &[&str] = &["/etc/keyscan/permitted_keys"];

pub const DEFAULT_FORBIDDEN_KEY_FILES: &[&str] = &["/etc/keyscan/forbidden_keys"];

/// Accounts below this uid are treated as system accounts (root, nobody, daemons).
pub const DEFAULT_LOWER_UID_BOUND: u32 = 500;

/// Owner name recorded for reference-list files whose owner cannot be resolved.
pub const UNKNOWN_OWNER: &str = "unknown";
