pub mod particle;
pub mod shooting_star;
pub mod spatial;
