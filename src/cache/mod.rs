mod optimistic;
mod query_cache;

pub use optimistic::{remove_from_list, run_optimistic, OptimisticUpdate};
pub use query_cache::{QueryCache, QueryKey};
