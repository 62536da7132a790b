mod config_loading;
mod lru_concurrency;
