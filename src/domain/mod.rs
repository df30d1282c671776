pub mod common;
pub mod subscription;

pub use common::{Displayable, Identifiable, NamedEntity};
pub use subscription::{Category, Cycle, PaymentPattern, Subscription, TrialWindow};
