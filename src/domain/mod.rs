// Domain layer: form/story models and ports (interfaces).

pub mod model;
pub mod ports;
