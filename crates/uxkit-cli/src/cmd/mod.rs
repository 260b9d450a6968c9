pub mod codex;
pub mod init;
pub mod research;
pub mod slash;
pub mod study;
