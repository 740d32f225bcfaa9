//! Rule system for event filtering.

mod chain;
mod membership_rule;
mod prefix_rule;
mod rule_trait;

pub use chain::RuleChain;
pub use membership_rule::MembershipRule;
pub use prefix_rule::PrefixRule;
pub use rule_trait::Rule;
