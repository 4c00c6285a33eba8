pub mod clock;
pub mod dispatch;
pub mod keywords;
pub mod rain;
pub mod rules;
pub mod scheduler;

pub use dispatch::DispatchService;
pub use rules::RulesEngine;
pub use scheduler::Scheduler;
