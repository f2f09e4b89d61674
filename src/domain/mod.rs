// Domain layer: publication models and ports (interfaces).

pub mod model;
pub mod ports;
