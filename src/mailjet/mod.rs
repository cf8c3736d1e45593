mod client;
mod payload;

pub use client::{AlertSink, DeliveryReceipt, MailjetClient, NotifyError};
