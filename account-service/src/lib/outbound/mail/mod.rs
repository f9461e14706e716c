pub mod smtp;

pub use smtp::SmtpMailNotifier;
