// Domain layer: core models and ports (interfaces).

pub mod context;
pub mod model;
pub mod ports;
