pub mod contract_repository;
pub mod reward_repository;
pub mod session_repository;
pub mod task_repository;
pub mod user_repository;

pub use contract_repository::ContractRepository;
pub use reward_repository::RewardRepository;
pub use session_repository::SessionRepository;
pub use task_repository::TaskRepository;
pub use user_repository::UserRepository;
