// src/config/consts.rs

// Durable stores
pub const DEFAULT_STORE_DIR: &str = ".";
pub const TEAMS_FILE: &str = "teams.csv";
pub const CONFORMERS_FILE: &str = "raw_conf.csv";
pub const LOCK_FILE: &str = ".conform.lock";

// Store headers
pub const NAME_COLUMN: &str = "Name";
pub const COLLEGE_COLUMN: &str = "College";
pub const CONFORMED_COLUMN: &str = "Conformed";
pub const TEAMS_HEADER: [&str; 3] = ["ID", NAME_COLUMN, COLLEGE_COLUMN];
pub const CONFORMERS_HEADER: [&str; 2] = ["Raw", CONFORMED_COLUMN];

// Normalization
pub const NBSP: char = '\u{a0}';
pub const PLACEHOLDER: char = '@';
pub const STRIPPED: [char; 3] = ['\'', '"', ','];

// Options / logging
pub const OPTIONS_FILE: &str = "qd_conform.toml";
pub const LOG_FILE: &str = ".store/debug.log";
pub const LOG_LEVEL: &str = "info";
