pub mod minuet_env;
pub mod wav;
