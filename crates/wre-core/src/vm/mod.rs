pub mod frame;
pub mod machine;
pub mod memory;
pub mod stack;
pub mod store;
pub mod value;

pub use frame::{CallPhase, CallRecord, Completion, ReturnStatus};
pub use machine::Machine;
pub use store::WordStore;
pub use value::Word;
