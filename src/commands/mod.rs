pub mod call;
pub mod init;
pub mod outline;
pub mod search;
pub mod serve;
pub mod stats;
pub mod unfold;
