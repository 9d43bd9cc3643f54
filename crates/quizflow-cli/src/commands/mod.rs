pub mod init;
pub mod output;
pub mod score;
pub mod show;
pub mod take;
pub mod validate;
