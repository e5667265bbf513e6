/// CSV export of analysis results.
pub mod export;
/// Analysis request files.
pub mod request;
