/*
 * This module provides the session layer, centered around
 * `PlaygroundSession`, which owns one playground's state and keeps the URL
 * fragment in sync with it. The fragment itself is reached through
 * `LocationOperations`; user-visible errors are queued as `Notification`s.
 * Unit tests for the session are in `session_tests.rs`.
 */
pub mod location;
pub mod notifications;
pub mod session;


pub use location::{InMemoryLocation, LocationOperations};
pub use notifications::{Notification, NotificationSeverity};
pub use session::{FileAction, PlaygroundSession};
