mod in_memory_script_repository;
mod pg_script_repository;

pub use in_memory_script_repository::InMemoryScriptRepository;
pub use pg_script_repository::PgScriptRepository;
