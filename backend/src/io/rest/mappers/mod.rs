pub mod contract_mapper;
pub mod reward_mapper;
pub mod task_mapper;
pub mod user_mapper;

pub use contract_mapper::ContractMapper;
pub use reward_mapper::RewardMapper;
pub use task_mapper::TaskMapper;
pub use user_mapper::UserMapper;
