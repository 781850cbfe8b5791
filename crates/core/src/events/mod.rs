mod extractor;

pub use extractor::{extract_notifications, EventError, ObjectNotification};
