mod in_memory_account_repository;
mod pg_account_repository;

pub use in_memory_account_repository::InMemoryAccountRepository;
pub use pg_account_repository::PgAccountRepository;
