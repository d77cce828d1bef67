pub mod history;
pub mod notifications;
pub mod rules;

pub use history::{AlertLog, TriggeredAlert};
pub use notifications::{ChannelKind, NotificationChannel, NotificationDispatcher};
pub use rules::{AlertRule, AlertRuleSet, AlertRuleType};
