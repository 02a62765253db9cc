mod pg_pool;
mod repositories;

pub use repositories::InMemoryAccountRepository;
pub use repositories::PgAccountRepository;

pub use pg_pool::{create_pool, run_migrations};
